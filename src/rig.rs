//! The Regional Intersection Graph: regions as nodes, pairwise overlaps as edges.

use std::collections::{BTreeSet, HashMap};

use uuid::Uuid;

use crate::error::{Result, RigError};
use crate::region::{Region, RegionId};

pub(crate) fn canonical(a: &str, b: &str) -> (RegionId, RegionId) {
    if a <= b { (a.to_string(), b.to_string()) } else { (b.to_string(), a.to_string()) }
}

/// An undirected graph of regions and their pairwise intersections.
///
/// Built once by [`crate::slig::build`] and treated as immutable for
/// enumeration; `put_region`/`put_intersection`/`remove_node`/`remove_edge`
/// exist for callers assembling or editing a graph directly, not for
/// incremental maintenance of a graph already handed to an enumerator.
pub struct Rig {
    id: String,
    dimension: usize,
    nodes: HashMap<RegionId, Region>,
    adjacency: HashMap<RegionId, BTreeSet<RegionId>>,
    edges: HashMap<(RegionId, RegionId), Region>,
}

impl Rig {
    pub fn new(dimension: usize) -> Self {
        assert!(dimension > 0, "dimension must be positive");
        Rig {
            id: Uuid::new_v4().to_string(),
            dimension,
            nodes: HashMap::new(),
            adjacency: HashMap::new(),
            edges: HashMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds `region` as a node. Overwrites any prior node at the same id.
    pub fn put_region(&mut self, region: Region) {
        let id = region.id().to_string();
        self.adjacency.entry(id.clone()).or_default();
        self.nodes.insert(id, region);
    }

    /// Adds an edge between the nodes `a` and `b`, with the eagerly computed
    /// pairwise intersection as its payload.
    ///
    /// Fails if either id isn't a node, or if the regions don't actually
    /// intersect.
    pub fn put_intersection(&mut self, a: &str, b: &str) -> Result<()> {
        let ra = self.nodes.get(a).ok_or_else(|| RigError::UnknownRegion(a.to_string()))?;
        let rb = self.nodes.get(b).ok_or_else(|| RigError::UnknownRegion(b.to_string()))?;
        let overlap = ra
            .get_intersection(rb, true)?
            .ok_or_else(|| RigError::UnknownRegion(format!("{a}/{b} do not intersect")))?;

        let key = canonical(a, b);
        self.adjacency.entry(key.0.clone()).or_default().insert(key.1.clone());
        self.adjacency.entry(key.1.clone()).or_default().insert(key.0.clone());
        self.edges.insert(key, overlap);
        Ok(())
    }

    pub fn node(&self, id: &str) -> Option<&Region> {
        self.nodes.get(id)
    }

    pub fn edge(&self, a: &str, b: &str) -> Option<&Region> {
        let key = canonical(a, b);
        self.edges.get(&key)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn contains_edge(&self, a: &str, b: &str) -> bool {
        self.edges.contains_key(&canonical(a, b))
    }

    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.nodes.values()
    }

    pub fn intersections(&self) -> impl Iterator<Item = &Region> {
        self.edges.values()
    }

    /// The ids of every node adjacent to `id`. Empty (not an error) if `id`
    /// is a node with no neighbors, or absent entirely.
    pub fn neighbors(&self, id: &str) -> impl Iterator<Item = &str> {
        self.adjacency.get(id).into_iter().flatten().map(String::as_str)
    }

    /// Removes a node and every edge incident to it.
    pub fn remove_node(&mut self, id: &str) {
        if self.nodes.remove(id).is_none() {
            return;
        }
        if let Some(neighbors) = self.adjacency.remove(id) {
            for neighbor in &neighbors {
                if let Some(set) = self.adjacency.get_mut(neighbor) {
                    set.remove(id);
                }
                self.edges.remove(&canonical(id, neighbor));
            }
        }
    }

    pub fn remove_edge(&mut self, a: &str, b: &str) {
        let key = canonical(a, b);
        if self.edges.remove(&key).is_some() {
            if let Some(set) = self.adjacency.get_mut(a) {
                set.remove(b);
            }
            if let Some(set) = self.adjacency.get_mut(b) {
                set.remove(a);
            }
        }
    }

    /// A sorted snapshot of node ids, used to give the clique enumerator a
    /// deterministic node order.
    pub(crate) fn sorted_ids(&self) -> Vec<RegionId> {
        let mut ids: Vec<RegionId> = self.nodes.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub(crate) fn adjacency_map(&self) -> &HashMap<RegionId, BTreeSet<RegionId>> {
        &self.adjacency
    }
}
