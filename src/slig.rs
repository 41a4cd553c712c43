//! The sweep-line constructor: builds a [`Rig`] from a [`RegionSet`] in
//! `O(d * N log N + d * K)` by sweeping each axis once and tallying how many
//! axes a candidate pair overlaps on.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use crate::error::Result;
use crate::regionset::RegionSet;
use crate::rig::{canonical, Rig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EventKind {
    Lower,
    Upper,
}

struct Event<'a> {
    value: f64,
    kind: EventKind,
    region: &'a str,
}

/// Orders events by sweep value, breaking ties Lower-before-Upper so that
/// touching endpoints register as overlapping. This tie-break is what this
/// crate treats as authoritative for construction, matching
/// `Interval::is_intersecting` with `inc_bounds = true`, even though that
/// method's own default is `inc_bounds = false`. Ties within the same value
/// and kind fall back to region id for a fully deterministic sweep order.
fn event_order(a: &Event, b: &Event) -> Ordering {
    a.value
        .partial_cmp(&b.value)
        .unwrap_or(Ordering::Equal)
        .then(a.kind.cmp(&b.kind))
        .then(a.region.cmp(b.region))
}

/// Builds the Regional Intersection Graph of every region in `regions`: one
/// node per region, one edge per pair that intersects on every axis.
pub fn build(regions: &RegionSet) -> Result<Rig> {
    let dimension = regions.dimension();
    let mut rig = Rig::new(dimension);
    for region in regions.iter() {
        rig.put_region(region.clone());
    }

    let mut tally: HashMap<(String, String), usize> = HashMap::new();

    for axis in 0..dimension {
        log::debug!("sweeping axis {axis} over {} regions", regions.len());
        let mut events = Vec::with_capacity(regions.len() * 2);
        for region in regions.iter() {
            let factor = region.factors()[axis];
            events.push(Event { value: factor.lower(), kind: EventKind::Lower, region: region.id() });
            events.push(Event { value: factor.upper(), kind: EventKind::Upper, region: region.id() });
        }
        events.sort_by(event_order);

        let mut active: BTreeSet<&str> = BTreeSet::new();
        for event in &events {
            match event.kind {
                EventKind::Lower => {
                    for &other in &active {
                        if other != event.region {
                            let key = canonical(other, event.region);
                            *tally.entry(key).or_insert(0) += 1;
                        }
                    }
                    active.insert(event.region);
                }
                EventKind::Upper => {
                    active.remove(event.region);
                }
            }
        }
    }

    let mut admitted = 0;
    for ((a, b), count) in tally {
        if count == dimension {
            rig.put_intersection(&a, &b)?;
            admitted += 1;
        }
    }
    log::debug!("admitted {admitted} edges over {dimension} axes");

    Ok(rig)
}
