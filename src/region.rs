//! Regions: d-dimensional axis-aligned hyperrectangles with identity and provenance.

use std::collections::BTreeSet;

use serde_json::Value;
use uuid::Uuid;

use crate::error::{Result, RigError};
use crate::interval::Interval;

/// A region's stable unique identifier.
pub type RegionId = String;

fn fresh_id() -> RegionId {
    Uuid::new_v4().to_string()
}

/// A `dimension`-dimensional axis-aligned hyperrectangle.
///
/// Equality and hashing are structural by dimension and factors, *not* by
/// `id`. Two regions with the same bounds but different ids compare equal.
/// Graphs and sets that need identity-based lookup key on `id` directly
/// rather than relying on `Region`'s own `Eq`/`Hash`.
#[derive(Debug, Clone)]
pub struct Region {
    id: RegionId,
    factors: Vec<Interval>,
    originals: BTreeSet<RegionId>,
    data: std::collections::HashMap<String, Value>,
}

impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        self.factors == other.factors
    }
}

impl Region {
    /// Builds a region from explicit lower/upper vertices, generating a
    /// fresh id and `originals = {id}`.
    pub fn new(lower: &[f64], upper: &[f64]) -> Self {
        Self::with_id(lower, upper, fresh_id())
    }

    /// Like [`Region::new`] but with a caller-supplied id.
    ///
    /// # Panics
    /// Panics if `lower.len() != upper.len()` or either is empty. This is a
    /// caller-side invariant violation within a single constructor call, not
    /// a recoverable domain error.
    pub fn with_id(lower: &[f64], upper: &[f64], id: RegionId) -> Self {
        assert_eq!(lower.len(), upper.len(), "lower/upper vertex length mismatch");
        assert!(!lower.is_empty(), "region must have at least one dimension");
        let factors: Vec<Interval> =
            lower.iter().zip(upper.iter()).map(|(&l, &u)| Interval::new(l, u)).collect();
        Region::from_intervals(factors, BTreeSet::from([id.clone()]), id)
    }

    /// Builds a region directly from a factor list, an explicit `originals`
    /// provenance set, and an id.
    pub fn from_intervals(factors: Vec<Interval>, originals: BTreeSet<RegionId>, id: RegionId) -> Self {
        assert!(!factors.is_empty(), "region must have at least one dimension");
        assert!(!originals.is_empty(), "originals must be non-empty");
        Region { id, factors, originals, data: std::collections::HashMap::new() }
    }

    /// Builds a hypercube: every axis uses the same interval.
    pub fn from_interval(interval: Interval, dimension: usize) -> Self {
        assert!(dimension > 0, "dimension must be positive");
        let id = fresh_id();
        let factors = vec![interval; dimension];
        Region::from_intervals(factors, BTreeSet::from([id.clone()]), id)
    }

    /// Constructs the common intersection of two or more regions.
    ///
    /// Returns `None` if any per-axis intersection is empty. `originals` is
    /// the union of every constituent's `originals`, and the result gets a
    /// fresh id.
    ///
    /// # Panics
    /// Panics if `regions` has fewer than two elements or mixed dimensions.
    /// Both are caller-side invariant violations, never triggered by this
    /// crate's own construction or enumeration call sites.
    pub fn from_intersection(regions: &[&Region]) -> Option<Region> {
        assert!(regions.len() >= 2, "from_intersection needs at least two regions");
        let dimension = regions[0].dimension();
        assert!(
            regions.iter().all(|r| r.dimension() == dimension),
            "from_intersection requires matching dimensions"
        );

        let mut factors = Vec::with_capacity(dimension);
        for axis in 0..dimension {
            let axis_intervals: Vec<Interval> = regions.iter().map(|r| r.factors[axis]).collect();
            factors.push(Interval::from_intersection(&axis_intervals)?);
        }

        let originals: BTreeSet<RegionId> =
            regions.iter().flat_map(|r| r.originals.iter().cloned()).collect();

        Some(Region::from_intervals(factors, originals, fresh_id()))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn dimension(&self) -> usize {
        self.factors.len()
    }

    pub fn factors(&self) -> &[Interval] {
        &self.factors
    }

    pub fn originals(&self) -> &BTreeSet<RegionId> {
        &self.originals
    }

    pub fn data(&self) -> &std::collections::HashMap<String, Value> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut std::collections::HashMap<String, Value> {
        &mut self.data
    }

    pub fn lower(&self) -> Vec<f64> {
        self.factors.iter().map(Interval::lower).collect()
    }

    pub fn upper(&self) -> Vec<f64> {
        self.factors.iter().map(Interval::upper).collect()
    }

    pub fn lengths(&self) -> Vec<f64> {
        self.factors.iter().map(Interval::length).collect()
    }

    pub fn midpoint(&self) -> Vec<f64> {
        self.factors.iter().map(Interval::midpoint).collect()
    }

    /// The product of per-axis lengths: length, area, volume, ...
    pub fn size(&self) -> f64 {
        self.lengths().iter().product()
    }

    fn check_dimension(&self, actual: usize) -> Result<()> {
        if actual != self.dimension() {
            return Err(RigError::ShapeMismatch { expected: self.dimension(), actual });
        }
        Ok(())
    }

    pub fn contains(&self, point: &[f64], inc_lower: bool, inc_upper: bool) -> Result<bool> {
        self.check_dimension(point.len())?;
        Ok(self
            .factors
            .iter()
            .zip(point.iter())
            .all(|(f, &v)| f.contains(v, inc_lower, inc_upper)))
    }

    pub fn encloses(&self, that: &Region, inc_lower: bool, inc_upper: bool) -> Result<bool> {
        self.check_dimension(that.dimension())?;
        Ok(self
            .factors
            .iter()
            .zip(that.factors.iter())
            .all(|(a, b)| a.encloses(b, inc_lower, inc_upper)))
    }

    pub fn is_intersecting(&self, that: &Region, inc_bounds: bool) -> Result<bool> {
        self.check_dimension(that.dimension())?;
        Ok(self
            .factors
            .iter()
            .zip(that.factors.iter())
            .all(|(a, b)| a.is_intersecting(b, inc_bounds)))
    }

    pub fn get_intersection(&self, that: &Region, inc_bounds: bool) -> Result<Option<Region>> {
        if !self.is_intersecting(that, inc_bounds)? {
            return Ok(None);
        }
        Ok(Region::from_intersection(&[self, that]))
    }

    pub fn get_intersection_size(&self, that: &Region) -> Result<f64> {
        match self.get_intersection(that, false)? {
            Some(region) => Ok(region.size()),
            None => Ok(0.0),
        }
    }

    pub fn get_union_size(&self, that: &Region) -> Result<f64> {
        Ok(self.size() + that.size() - self.get_intersection_size(that)?)
    }

    /// Truncates or pads the factor sequence to `target_dim` axes, padding
    /// with `fill` (default `Interval::new(0.0, 0.0)`). Preserves `id` and
    /// `originals`; identity when `target_dim == self.dimension()`.
    pub fn project(&self, target_dim: usize, fill: Option<Interval>) -> Region {
        assert!(target_dim > 0, "target dimension must be positive");
        let fill = fill.unwrap_or_else(|| Interval::new(0.0, 0.0));
        let factors: Vec<Interval> = (0..target_dim)
            .map(|d| if d < self.dimension() { self.factors[d] } else { fill })
            .collect();
        Region::from_intervals(factors, self.originals.clone(), self.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(lower: &[f64], upper: &[f64]) -> Region {
        Region::new(lower, upper)
    }

    #[test]
    fn self_intersection_is_self() {
        let a = r(&[0.0, 0.0], &[5.0, 5.0]);
        assert!(a.is_intersecting(&a, false).unwrap());
        let i = a.get_intersection(&a, false).unwrap().unwrap();
        assert_eq!(i.factors(), a.factors());
    }

    #[test]
    fn is_intersecting_matches_per_axis_conjunction() {
        let a = r(&[0.0, 0.0], &[5.0, 5.0]);
        let b = r(&[4.0, 4.0], &[10.0, 10.0]);
        let c = r(&[10.0, 10.0], &[20.0, 20.0]);
        assert!(a.is_intersecting(&b, false).unwrap());
        assert!(!a.is_intersecting(&c, false).unwrap());
    }

    #[test]
    fn dimension_mismatch_is_shape_error() {
        let a = Region::new(&[0.0], &[1.0]);
        let b = Region::new(&[0.0, 0.0], &[1.0, 1.0]);
        assert!(matches!(a.is_intersecting(&b, false), Err(RigError::ShapeMismatch { .. })));
    }

    #[test]
    fn originals_union_dedupes() {
        let a = Region::with_id(&[0.0], &[5.0], "A".into());
        let mut b = Region::with_id(&[3.0], &[8.0], "B".into());
        b = Region::from_intervals(b.factors().to_vec(), BTreeSet::from(["A".to_string(), "C".to_string()]), "B".into());
        let i = Region::from_intersection(&[&a, &b]).unwrap();
        assert_eq!(i.originals(), &BTreeSet::from(["A".to_string(), "C".to_string()]));
    }

    #[test]
    fn from_intersection_none_when_disjoint() {
        let a = r(&[0.0, 0.0], &[1.0, 1.0]);
        let b = r(&[2.0, 2.0], &[3.0, 3.0]);
        assert_eq!(Region::from_intersection(&[&a, &b]), None);
    }

    #[test]
    fn project_identity_when_same_dimension() {
        let a = r(&[0.0, 1.0], &[5.0, 6.0]);
        let p = a.project(2, None);
        assert_eq!(p.factors(), a.factors());
    }

    #[test]
    fn project_pads_with_fill_interval() {
        let a = r(&[0.0], &[5.0]);
        let p = a.project(3, None);
        assert_eq!(p.dimension(), 3);
        assert_eq!(p.factors()[1], Interval::new(0.0, 0.0));
        assert_eq!(p.factors()[2], Interval::new(0.0, 0.0));
    }

    #[test]
    fn project_truncates() {
        let a = r(&[0.0, 1.0, 2.0], &[5.0, 6.0, 7.0]);
        let p = a.project(1, None);
        assert_eq!(p.dimension(), 1);
        assert_eq!(p.factors()[0], a.factors()[0]);
    }

    #[test]
    fn union_size_formula() {
        let a = r(&[0.0], &[4.0]);
        let b = r(&[2.0], &[6.0]);
        assert_eq!(a.get_union_size(&b).unwrap(), 4.0 + 4.0 - 2.0);
    }
}
