//! Channel-graph snapshots as served by the graph exporter.
//!
//! `DescribedGraph` mirrors a Lightning daemon's `describegraph` output;
//! `NetworkGraph` is the flattened node/edge document the panel queries.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

use crate::tables::{DataFrame, Field, PanelSeries};

/// Color a daemon reports for nodes that never announced one.
const UNSET_COLOR: &str = "#000000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DescribedNode {
    pub pub_key: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub color: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub last_update: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DescribedEdge {
    #[serde(deserialize_with = "lenient_u64")]
    pub channel_id: u64,
    pub node1_pub: String,
    pub node2_pub: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub capacity: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DescribedGraph {
    #[serde(default)]
    pub nodes: Vec<DescribedNode>,
    #[serde(default)]
    pub edges: Vec<DescribedEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NetworkNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub subtitle: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mainstat: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NetworkEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub mainstat: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub secondarystat: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NetworkGraph {
    #[serde(default)]
    pub edges: Vec<NetworkEdge>,
    #[serde(default)]
    pub nodes: Vec<NetworkNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub field_name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub edges_fields: Vec<FieldSpec>,
    pub nodes_fields: Vec<FieldSpec>,
}

impl NetworkGraph {
    /// Flatten a daemon snapshot. Nodes that never announced themselves
    /// (no update, no alias, no color) are dropped along with every channel
    /// touching them. The node whose key is `identity_pubkey` is marked home.
    pub fn from_described(graph: &DescribedGraph, identity_pubkey: &str) -> Self {
        let mut known = HashSet::new();
        let mut nodes = Vec::with_capacity(graph.nodes.len());
        for node in &graph.nodes {
            if is_unannounced(node) {
                continue;
            }
            nodes.push(NetworkNode {
                id: node.pub_key.clone(),
                title: node.alias.clone(),
                subtitle: node.last_update.max(0) as u64,
                mainstat: if node.pub_key == identity_pubkey {
                    "true".to_string()
                } else {
                    String::new()
                },
                color: node.color.clone(),
            });
            known.insert(node.pub_key.as_str());
        }

        let edges: Vec<NetworkEdge> = graph
            .edges
            .iter()
            .filter(|edge| {
                known.contains(edge.node1_pub.as_str()) && known.contains(edge.node2_pub.as_str())
            })
            .map(|edge| NetworkEdge {
                id: edge.channel_id.to_string(),
                source: edge.node1_pub.clone(),
                target: edge.node2_pub.clone(),
                mainstat: edge.capacity,
                secondarystat: 0,
            })
            .collect();

        debug!(
            "Flattened snapshot: kept {}/{} nodes, {}/{} channels",
            nodes.len(),
            graph.nodes.len(),
            edges.len(),
            graph.edges.len()
        );
        Self { edges, nodes }
    }

    /// Field layout the panel's data source advertises.
    pub fn field_schema() -> FieldSchema {
        let spec = |name: &str, ty: &str| FieldSpec {
            field_name: name.to_string(),
            field_type: ty.to_string(),
        };
        FieldSchema {
            edges_fields: vec![
                spec("id", "string"),
                spec("source", "string"),
                spec("target", "string"),
                spec("mainstat", "string"),
                spec("secondarystat", "number"),
            ],
            nodes_fields: vec![
                spec("id", "string"),
                spec("title", "string"),
                spec("subtitle", "number"),
                spec("mainstat", "string"),
                spec("color", "string"),
            ],
        }
    }

    /// Lay the document out as the two positional frames a panel receives.
    pub fn to_series(&self) -> PanelSeries {
        let nodes = DataFrame {
            name: Some("nodes".to_string()),
            fields: vec![
                Field::new("id", column(&self.nodes, |n| Value::from(n.id.as_str()))),
                Field::new(
                    "title",
                    column(&self.nodes, |n| {
                        non_empty(&n.title).map(Value::from).unwrap_or(Value::Null)
                    }),
                ),
                Field::new("subtitle", column(&self.nodes, |n| Value::from(n.subtitle))),
                Field::new("mainstat", column(&self.nodes, |n| Value::Bool(n.mainstat == "true"))),
                Field::new("color", column(&self.nodes, |n| Value::from(n.color.as_str()))),
            ],
        };
        let edges = DataFrame {
            name: Some("edges".to_string()),
            fields: vec![
                Field::new("id", column(&self.edges, |e| Value::from(e.id.as_str()))),
                Field::new("source", column(&self.edges, |e| Value::from(e.source.as_str()))),
                Field::new("target", column(&self.edges, |e| Value::from(e.target.as_str()))),
                Field::new("mainstat", column(&self.edges, |e| Value::from(e.mainstat))),
            ],
        };
        PanelSeries { nodes, edges }
    }
}

fn column<T>(items: &[T], value: impl Fn(&T) -> Value) -> Vec<Value> {
    items.iter().map(value).collect()
}

fn is_unannounced(node: &DescribedNode) -> bool {
    node.last_update <= 0
        && node.alias.is_empty()
        && (node.color.is_empty() || node.color == UNSET_COLOR)
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn is_zero(v: &u64) -> bool {
    *v == 0
}

// The daemon's JSON encodes 64-bit integers as strings.
fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().ok_or_else(|| D::Error::custom("expected unsigned integer")),
        Value::String(s) => s.parse().map_err(D::Error::custom),
        Value::Null => Ok(0),
        other => Err(D::Error::custom(format!("expected integer, got {other}"))),
    }
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().ok_or_else(|| D::Error::custom("expected integer")),
        Value::String(s) => s.parse().map_err(D::Error::custom),
        Value::Null => Ok(0),
        other => Err(D::Error::custom(format!("expected integer, got {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn described() -> DescribedGraph {
        serde_json::from_str(
            r##"{
                "nodes": [
                    {"pub_key": "home", "alias": "my-node", "color": "#3399ff",
                     "last_update": 1700000000},
                    {"pub_key": "peer", "alias": "", "color": "#ff9900", "last_update": "0"},
                    {"pub_key": "ghost", "alias": "", "color": "#000000", "last_update": 0}
                ],
                "edges": [
                    {"channel_id": "812345678901", "node1_pub": "home", "node2_pub": "peer",
                     "capacity": "5000000"},
                    {"channel_id": 2, "node1_pub": "peer", "node2_pub": "ghost", "capacity": 100}
                ]
            }"##,
        )
        .unwrap()
    }

    #[test]
    fn test_from_described_drops_unannounced_and_orphans() {
        let graph = NetworkGraph::from_described(&described(), "home");
        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["home", "peer"]);
        assert_eq!(graph.nodes[0].mainstat, "true");
        assert_eq!(graph.nodes[1].mainstat, "");
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].id, "812345678901");
        assert_eq!(graph.edges[0].mainstat, 5_000_000);
    }

    #[test]
    fn test_serialization_omits_empty_fields() {
        let node = NetworkNode {
            id: "peer".into(),
            color: "#ff9900".into(),
            ..NetworkNode::default()
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json, serde_json::json!({"id": "peer", "color": "#ff9900"}));
    }

    #[test]
    fn test_field_schema_shape() {
        let schema = serde_json::to_value(NetworkGraph::field_schema()).unwrap();
        assert_eq!(schema["edges_fields"][4]["field_name"], "secondarystat");
        assert_eq!(schema["edges_fields"][4]["type"], "number");
        assert_eq!(schema["nodes_fields"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_to_series_round_trips_through_tables() {
        let graph = NetworkGraph::from_described(&described(), "home");
        let (nodes, edges) = graph.to_series().decode().unwrap();
        assert_eq!(nodes.highlighted, vec![true, false]);
        assert_eq!(nodes.name(1), None);
        assert_eq!(nodes.last_update(0), Some(1_700_000_000));
        assert_eq!(edges.capacities, vec![5_000_000]);
    }
}
