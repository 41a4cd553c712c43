//! Lazy enumeration of every k-wise intersection (k >= 2) among a [`Rig`]'s
//! regions, via the breadth-first all-cliques walk: non-decreasing clique
//! size, each clique discovered by extending a smaller one with a single
//! higher-ordered neighbor.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::{Result, RigError};
use crate::region::{Region, RegionId};
use crate::rig::Rig;

/// Enumerates cliques over a fixed view of a graph: some nodes, a sorted
/// index over them, and for each node its neighbors that sort later.
pub struct CliqueIter {
    higher_nbrs: HashMap<RegionId, Vec<RegionId>>,
    queue: VecDeque<(Vec<RegionId>, Vec<RegionId>)>,
    min_len: usize,
    require: Option<RegionId>,
}

impl CliqueIter {
    fn new(
        nodes: &[RegionId],
        adjacency: &HashMap<RegionId, std::collections::BTreeSet<RegionId>>,
        min_len: usize,
        require: Option<RegionId>,
    ) -> Self {
        let mut sorted = nodes.to_vec();
        sorted.sort();
        sorted.dedup();

        let index: HashMap<RegionId, usize> =
            sorted.iter().cloned().enumerate().map(|(i, n)| (n, i)).collect();
        let node_set: HashSet<&RegionId> = nodes.iter().collect();

        let empty = std::collections::BTreeSet::new();
        let mut higher_nbrs: HashMap<RegionId, Vec<RegionId>> = HashMap::new();
        for u in &sorted {
            let nbrs = adjacency.get(u).unwrap_or(&empty);
            let mut hs: Vec<RegionId> = nbrs
                .iter()
                .filter(|v| node_set.contains(v) && index[v.as_str()] > index[u])
                .cloned()
                .collect();
            hs.sort_by_key(|v| index[v]);
            higher_nbrs.insert(u.clone(), hs);
        }

        let mut queue = VecDeque::new();
        for u in &sorted {
            queue.push_back((vec![u.clone()], higher_nbrs[u].clone()));
        }

        CliqueIter { higher_nbrs, queue, min_len, require }
    }
}

impl Iterator for CliqueIter {
    type Item = Vec<RegionId>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (base, cnbrs) = self.queue.pop_front()?;
            for (i, u) in cnbrs.iter().enumerate() {
                let mut new_base = base.clone();
                new_base.push(u.clone());
                let u_higher = &self.higher_nbrs[u];
                let new_cnbrs: Vec<RegionId> =
                    cnbrs[i + 1..].iter().filter(|v| u_higher.contains(v)).cloned().collect();
                self.queue.push_back((new_base, new_cnbrs));
            }

            if base.len() < self.min_len {
                continue;
            }
            if let Some(pivot) = &self.require {
                if !base.contains(pivot) {
                    continue;
                }
            }
            return Some(base);
        }
    }
}

/// Lazily yields `(intersection, members)` for each clique a [`CliqueIter`]
/// produces: the common intersection region of `members`, carrying
/// `originals = {members' ids}` and a fresh id.
///
/// By construction every clique in a [`Rig`] is pairwise-intersecting on
/// every axis, which for axis-aligned boxes guarantees a non-empty common
/// intersection (the 1-D case: a family of intervals shares a point iff
/// every pair does). `from_intersection` is still called honestly rather
/// than assumed, so a future bug in a single axis's data can't silently
/// fabricate a result.
pub struct Cliques<'a> {
    rig: &'a Rig,
    inner: CliqueIter,
}

impl<'a> Iterator for Cliques<'a> {
    type Item = (Region, Vec<RegionId>);

    fn next(&mut self) -> Option<Self::Item> {
        let members = self.inner.next()?;
        let regions: Vec<&Region> =
            members.iter().map(|id| self.rig.node(id).expect("clique member must be a node")).collect();
        let intersection =
            Region::from_intersection(&regions).expect("every RIG clique has a common intersection");
        Some((intersection, members))
    }
}

/// A view over a [`Rig`] that lazily yields its k-wise intersections.
pub struct Enumerator<'a> {
    rig: &'a Rig,
}

impl<'a> Enumerator<'a> {
    pub fn new(rig: &'a Rig) -> Self {
        Enumerator { rig }
    }

    /// Every clique of size >= 2 in the whole graph, in non-decreasing size
    /// order.
    pub fn all(&self) -> Cliques<'a> {
        let nodes = self.rig.sorted_ids();
        Cliques { rig: self.rig, inner: CliqueIter::new(&nodes, self.rig.adjacency_map(), 2, None) }
    }

    /// Every clique of size >= 2 within the induced subgraph on `ids`.
    pub fn subset(&self, ids: &[RegionId]) -> Result<Cliques<'a>> {
        for id in ids {
            if !self.rig.contains_node(id) {
                return Err(RigError::UnknownRegion(id.clone()));
            }
        }
        Ok(Cliques { rig: self.rig, inner: CliqueIter::new(ids, self.rig.adjacency_map(), 2, None) })
    }

    /// Every clique of size >= 2 containing `pivot`, drawn from the induced
    /// subgraph on `pivot` and its neighbors.
    pub fn neighborhood(&self, pivot: &str) -> Result<Cliques<'a>> {
        if !self.rig.contains_node(pivot) {
            return Err(RigError::UnknownRegion(pivot.to_string()));
        }
        let mut nodes: Vec<RegionId> = vec![pivot.to_string()];
        nodes.extend(self.rig.neighbors(pivot).map(String::from));
        Ok(Cliques {
            rig: self.rig,
            inner: CliqueIter::new(&nodes, self.rig.adjacency_map(), 2, Some(pivot.to_string())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Region;
    use crate::regionset::RegionSet;
    use crate::slig;
    use std::collections::HashSet as Set;

    fn r(id: &str, lower: &[f64], upper: &[f64]) -> Region {
        Region::with_id(lower, upper, id.to_string())
    }

    fn triangle() -> Rig {
        // A, B, C all pairwise overlapping on [0,1].
        let mut set = RegionSet::new(1);
        set.add(r("A", &[0.0], &[10.0])).unwrap();
        set.add(r("B", &[0.0], &[10.0])).unwrap();
        set.add(r("C", &[0.0], &[10.0])).unwrap();
        slig::build(&set).unwrap()
    }

    #[test]
    fn all_yields_pairs_and_the_triple_for_a_triangle() {
        let rig = triangle();
        let cliques: Vec<Set<String>> =
            Enumerator::new(&rig).all().map(|(_, members)| members.into_iter().collect()).collect();

        assert_eq!(cliques.len(), 4); // 3 pairs + 1 triple
        assert!(cliques.contains(&Set::from(["A".to_string(), "B".to_string()])));
        assert!(cliques.contains(&Set::from(["A".to_string(), "B".to_string(), "C".to_string()])));
    }

    #[test]
    fn each_clique_carries_its_honest_common_intersection() {
        let rig = triangle();
        for (intersection, members) in Enumerator::new(&rig).all() {
            assert_eq!(intersection.lower(), vec![0.0]);
            assert_eq!(intersection.upper(), vec![10.0]);
            assert_eq!(intersection.originals(), &members.into_iter().collect());
        }
    }

    #[test]
    fn sizes_are_non_decreasing() {
        let rig = triangle();
        let sizes: Vec<usize> = Enumerator::new(&rig).all().map(|(_, members)| members.len()).collect();
        let mut sorted = sizes.clone();
        sorted.sort();
        assert_eq!(sizes, sorted);
    }

    #[test]
    fn chain_has_no_triangle() {
        let mut set = RegionSet::new(1);
        set.add(r("A", &[0.0], &[5.0])).unwrap();
        set.add(r("B", &[4.0], &[9.0])).unwrap();
        set.add(r("C", &[8.0], &[13.0])).unwrap();
        let rig = slig::build(&set).unwrap();

        let cliques: Vec<(Region, Vec<String>)> = Enumerator::new(&rig).all().collect();
        assert!(cliques.iter().all(|(_, members)| members.len() <= 2));
        assert_eq!(cliques.len(), 2);
    }

    #[test]
    fn subset_restricts_to_induced_subgraph() {
        let rig = triangle();
        let cliques: Vec<Set<String>> = Enumerator::new(&rig)
            .subset(&["A".to_string(), "B".to_string()])
            .unwrap()
            .map(|(_, members)| members.into_iter().collect())
            .collect();
        assert_eq!(cliques, vec![Set::from(["A".to_string(), "B".to_string()])]);
    }

    #[test]
    fn subset_rejects_unknown_id() {
        let rig = triangle();
        assert!(Enumerator::new(&rig).subset(&["ghost".to_string()]).is_err());
    }

    #[test]
    fn neighborhood_filters_to_cliques_with_the_pivot() {
        let rig = triangle();
        let cliques: Vec<Set<String>> = Enumerator::new(&rig)
            .neighborhood("A")
            .unwrap()
            .map(|(_, members)| members.into_iter().collect())
            .collect();
        assert!(cliques.iter().all(|c| c.contains("A")));
        assert!(cliques.contains(&Set::from(["A".to_string(), "B".to_string(), "C".to_string()])));
    }

    #[test]
    fn neighborhood_rejects_unknown_pivot() {
        let rig = triangle();
        assert!(Enumerator::new(&rig).neighborhood("ghost").is_err());
    }
}
