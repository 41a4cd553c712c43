//! Wire forms for [`Region`], [`RegionSet`] and [`Rig`].
//!
//! These aren't plain `#[derive(Serialize, Deserialize)]` shapes: Region
//! accepts two input forms, and Rig accepts two graph encodings. Custom impls
//! live here to keep the derives off the domain types themselves.

use std::collections::{BTreeSet, HashMap};

use serde::de::Error as DeError;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{Result, RigError};
use crate::interval::Interval;
use crate::region::{Region, RegionId};
use crate::regionset::RegionSet;
use crate::rig::Rig;

#[derive(Deserialize)]
struct WireFactor {
    lower: f64,
    upper: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireRegion {
    LowerUpper {
        id: Option<RegionId>,
        lower: Vec<f64>,
        upper: Vec<f64>,
        originals: Option<BTreeSet<RegionId>>,
        data: Option<HashMap<String, Value>>,
    },
    Factors {
        id: Option<RegionId>,
        factors: Vec<WireFactor>,
        originals: Option<BTreeSet<RegionId>>,
        data: Option<HashMap<String, Value>>,
    },
}

impl Serialize for Region {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Region", 5)?;
        state.serialize_field("id", self.id())?;
        state.serialize_field("lower", &self.lower())?;
        state.serialize_field("upper", &self.upper())?;
        state.serialize_field("originals", self.originals())?;
        state.serialize_field("data", self.data())?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Region {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let wire = WireRegion::deserialize(deserializer)?;
        let (id, factors, originals, data) = match wire {
            WireRegion::LowerUpper { id, lower, upper, originals, data } => {
                if lower.len() != upper.len() {
                    return Err(DeError::custom("lower/upper length mismatch"));
                }
                if lower.is_empty() {
                    return Err(DeError::custom("region must have at least one dimension"));
                }
                let factors: Vec<Interval> =
                    lower.iter().zip(upper.iter()).map(|(&l, &u)| Interval::new(l, u)).collect();
                (id, factors, originals, data)
            }
            WireRegion::Factors { id, factors, originals, data } => {
                if factors.is_empty() {
                    return Err(DeError::custom("region must have at least one dimension"));
                }
                let factors: Vec<Interval> =
                    factors.into_iter().map(|f| Interval::new(f.lower, f.upper)).collect();
                (id, factors, originals, data)
            }
        };

        let id = id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let originals = originals.unwrap_or_else(|| BTreeSet::from([id.clone()]));
        let mut region = Region::from_intervals(factors, originals, id);
        if let Some(data) = data {
            *region.data_mut() = data;
        }
        Ok(region)
    }
}

#[derive(Serialize)]
struct RegionSetWire<'a> {
    id: &'a str,
    dimension: usize,
    length: usize,
    bounds: Option<&'a Region>,
    regions: Vec<&'a Region>,
}

#[derive(Deserialize)]
struct RegionSetWireOwned {
    id: String,
    dimension: usize,
    length: Option<usize>,
    bounds: Option<Region>,
    regions: Vec<Region>,
}

impl Serialize for RegionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let wire = RegionSetWire {
            id: self.id(),
            dimension: self.dimension(),
            length: self.len(),
            bounds: self.bounds(),
            regions: self.iter().collect(),
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RegionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let wire = RegionSetWireOwned::deserialize(deserializer)?;
        if let Some(length) = wire.length {
            if length != wire.regions.len() {
                return Err(DeError::custom(format!(
                    "length {length} does not match {} regions",
                    wire.regions.len()
                )));
            }
        }

        let mut set = match wire.bounds {
            Some(bounds) => RegionSet::with_bounds(bounds),
            None => RegionSet::new(wire.dimension),
        };
        for region in wire.regions {
            set.add(region).map_err(DeError::custom)?;
        }
        Ok(set)
    }
}

/// Which graph shape a [`Rig`] serializes as; pick with
/// [`to_json`]/[`from_json`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphShape {
    NodeLink,
    Adjacency,
}

#[derive(Serialize, Deserialize)]
struct NodeEntry {
    id: RegionId,
    region: Region,
}

#[derive(Serialize, Deserialize)]
struct LinkEntry {
    source: RegionId,
    target: RegionId,
    region: Region,
}

#[derive(Serialize, Deserialize)]
struct NodeLinkGraph {
    directed: bool,
    multigraph: bool,
    nodes: Vec<NodeEntry>,
    links: Vec<LinkEntry>,
}

#[derive(Serialize, Deserialize)]
struct AdjacencyEntry {
    id: RegionId,
    region: Region,
}

#[derive(Serialize, Deserialize)]
struct AdjacencyGraph {
    nodes: Vec<NodeEntry>,
    adjacency: Vec<Vec<AdjacencyEntry>>,
}

/// Serializes `rig` to its `{ id, dimension, json_graph, graph }` wire form,
/// using whichever `shape` the caller asks for.
pub fn to_json(rig: &Rig, shape: GraphShape) -> Value {
    let ids = rig.sorted_ids();
    let nodes: Vec<NodeEntry> = ids
        .iter()
        .map(|id| NodeEntry { id: id.clone(), region: rig.node(id).expect("node must exist").clone() })
        .collect();

    let graph = match shape {
        GraphShape::NodeLink => {
            let mut links = Vec::new();
            for i in 0..ids.len() {
                for j in (i + 1)..ids.len() {
                    if let Some(region) = rig.edge(&ids[i], &ids[j]) {
                        links.push(LinkEntry {
                            source: ids[i].clone(),
                            target: ids[j].clone(),
                            region: region.clone(),
                        });
                    }
                }
            }
            serde_json::to_value(NodeLinkGraph { directed: false, multigraph: false, nodes, links })
                .expect("graph serialization cannot fail")
        }
        GraphShape::Adjacency => {
            let adjacency: Vec<Vec<AdjacencyEntry>> = ids
                .iter()
                .map(|id| {
                    let mut neighbors: Vec<&str> = rig.neighbors(id).collect();
                    neighbors.sort();
                    neighbors
                        .into_iter()
                        .map(|nid| AdjacencyEntry {
                            id: nid.to_string(),
                            region: rig.edge(id, nid).expect("edge must exist").clone(),
                        })
                        .collect()
                })
                .collect();
            serde_json::to_value(AdjacencyGraph { nodes, adjacency })
                .expect("graph serialization cannot fail")
        }
    };

    serde_json::json!({
        "id": rig.id(),
        "dimension": rig.dimension(),
        "json_graph": match shape { GraphShape::NodeLink => "node_link", GraphShape::Adjacency => "adjacency" },
        "graph": graph,
    })
}

/// Parses a `{ id, dimension, json_graph, graph }` payload into a [`Rig`],
/// accepting either graph shape.
pub fn from_json(value: &Value) -> Result<Rig> {
    let dimension = value
        .get("dimension")
        .and_then(Value::as_u64)
        .ok_or_else(|| RigError::Parse { field: "dimension".into(), reason: "missing or not a number".into() })?
        as usize;

    let json_graph = value
        .get("json_graph")
        .and_then(Value::as_str)
        .ok_or_else(|| RigError::Parse { field: "json_graph".into(), reason: "missing or not a string".into() })?;

    let graph = value
        .get("graph")
        .ok_or_else(|| RigError::Parse { field: "graph".into(), reason: "missing".into() })?;

    let mut rig = Rig::new(dimension);

    match json_graph {
        "node_link" => {
            let parsed: NodeLinkGraph = serde_json::from_value(graph.clone())
                .map_err(|e| RigError::Parse { field: "graph".into(), reason: e.to_string() })?;
            for node in parsed.nodes {
                rig.put_region(node.region);
            }
            for link in parsed.links {
                rig.put_intersection(&link.source, &link.target)?;
            }
        }
        "adjacency" => {
            let parsed: AdjacencyGraph = serde_json::from_value(graph.clone())
                .map_err(|e| RigError::Parse { field: "graph".into(), reason: e.to_string() })?;
            for node in &parsed.nodes {
                rig.put_region(node.region.clone());
            }
            for (node, neighbors) in parsed.nodes.iter().zip(parsed.adjacency.iter()) {
                for neighbor in neighbors {
                    if !rig.contains_edge(&node.id, &neighbor.id) {
                        rig.put_intersection(&node.id, &neighbor.id)?;
                    }
                }
            }
        }
        other => {
            return Err(RigError::Parse {
                field: "json_graph".into(),
                reason: format!("unknown graph shape {other:?}"),
            });
        }
    }

    Ok(rig)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slig;

    fn r(id: &str, lower: &[f64], upper: &[f64]) -> Region {
        Region::with_id(lower, upper, id.to_string())
    }

    #[test]
    fn region_round_trips_through_lower_upper_form() {
        let region = Region::new(&[0.0, 1.0], &[5.0, 6.0]);
        let value = serde_json::to_value(&region).unwrap();
        let back: Region = serde_json::from_value(value).unwrap();
        assert_eq!(back, region);
        assert_eq!(back.id(), region.id());
    }

    #[test]
    fn region_accepts_factors_form() {
        let json = serde_json::json!({
            "id": "A",
            "factors": [{"lower": 0.0, "upper": 1.0}, {"lower": 2.0, "upper": 3.0}],
        });
        let region: Region = serde_json::from_value(json).unwrap();
        assert_eq!(region.lower(), vec![0.0, 2.0]);
        assert_eq!(region.upper(), vec![1.0, 3.0]);
        assert_eq!(region.originals(), &BTreeSet::from(["A".to_string()]));
    }

    #[test]
    fn region_originals_defaults_to_self_id() {
        let json = serde_json::json!({ "id": "A", "lower": [0.0], "upper": [1.0] });
        let region: Region = serde_json::from_value(json).unwrap();
        assert_eq!(region.originals(), &BTreeSet::from(["A".to_string()]));
    }

    #[test]
    fn regionset_round_trips() {
        let mut set = RegionSet::new(1);
        set.add(r("A", &[0.0], &[1.0])).unwrap();
        set.add(r("B", &[1.0], &[2.0])).unwrap();
        let value = serde_json::to_value(&set).unwrap();
        let back: RegionSet = serde_json::from_value(value).unwrap();
        assert_eq!(back.len(), 2);
        assert!(back.get("A").is_some());
    }

    #[test]
    fn regionset_rejects_length_mismatch() {
        let json = serde_json::json!({
            "id": "s", "dimension": 1, "length": 5,
            "bounds": null,
            "regions": [{"id": "A", "lower": [0.0], "upper": [1.0]}],
        });
        let result: std::result::Result<RegionSet, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }

    fn chain_rig() -> Rig {
        let mut set = RegionSet::new(1);
        set.add(r("A", &[0.0], &[5.0])).unwrap();
        set.add(r("B", &[4.0], &[9.0])).unwrap();
        slig::build(&set).unwrap()
    }

    #[test]
    fn rig_round_trips_node_link_form() {
        let rig = chain_rig();
        let value = to_json(&rig, GraphShape::NodeLink);
        assert_eq!(value["json_graph"], "node_link");
        let back = from_json(&value).unwrap();
        assert_eq!(back.len(), rig.len());
        assert!(back.contains_edge("A", "B"));
    }

    #[test]
    fn rig_round_trips_adjacency_form() {
        let rig = chain_rig();
        let value = to_json(&rig, GraphShape::Adjacency);
        assert_eq!(value["json_graph"], "adjacency");
        let back = from_json(&value).unwrap();
        assert_eq!(back.len(), rig.len());
        assert!(back.contains_edge("A", "B"));
    }

    #[test]
    fn from_json_rejects_unknown_shape() {
        let json = serde_json::json!({
            "id": "r", "dimension": 1, "json_graph": "mystery",
            "graph": {},
        });
        assert!(matches!(from_json(&json), Err(RigError::Parse { .. })));
    }
}
