//! Turns the node and edge tables into a graph with per-node aggregates.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::index::{IncidenceIndex, NodeLookup};
use crate::tables::{EdgeTable, NodeTable};
use lnviz_core::error::{ErrorCode, LnvizError};
use lnviz_core::format::{group_digits, sats_to_btc};
use lnviz_core::model::{display_width_for, Edge, Node, Position};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("no node is flagged as home")]
    MissingHomeNode,
}

impl LnvizError for GraphError {
    fn error_code(&self) -> ErrorCode {
        match self {
            GraphError::MissingHomeNode => ErrorCode::NotFound,
        }
    }
}

/// Viewport of the panel the chart is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderContext {
    pub width: f64,
    pub height: f64,
}

impl RenderContext {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Position {
        Position {
            x: self.width / 2.0,
            y: self.height / 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildStats {
    pub node_rows: usize,
    pub edge_rows: usize,
    pub skipped_edges: usize,
    pub duplicate_node_ids: usize,
    pub non_finite_widths: usize,
}

pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub stats: BuildStats,
    lookup: NodeLookup,
    incidence: IncidenceIndex,
}

impl Graph {
    /// Index of the first node flagged as home.
    pub fn home_index(&self) -> Result<usize, GraphError> {
        self.nodes
            .iter()
            .position(|node| node.is_home)
            .ok_or(GraphError::MissingHomeNode)
    }

    pub fn home(&self) -> Result<&Node, GraphError> {
        self.home_index().map(|index| &self.nodes[index])
    }

    pub fn resolve(&self, id: &str) -> Option<usize> {
        self.lookup.get(id)
    }

    /// Edges touching the node with `id`, with their positions, in edge order.
    pub fn incident_edges<'a>(&'a self, id: &str) -> impl Iterator<Item = (usize, &'a Edge)> + 'a {
        self.incidence
            .incident(id)
            .iter()
            .map(move |&position| (position, &self.edges[position]))
    }
}

pub struct GraphBuilder {
    group_separator: String,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            group_separator: ",".to_string(),
        }
    }

    pub fn with_group_separator(mut self, separator: impl Into<String>) -> Self {
        self.group_separator = separator.into();
        self
    }

    pub fn build(
        &self,
        node_table: &NodeTable,
        edge_table: &EdgeTable,
        ctx: &RenderContext,
    ) -> Graph {
        let mut stats = BuildStats {
            node_rows: node_table.len(),
            edge_rows: edge_table.len(),
            ..BuildStats::default()
        };

        // Every node is registered before any edge resolves, so edge
        // resolution does not depend on table order.
        let mut lookup = NodeLookup::with_capacity(node_table.len());
        let mut nodes = Vec::with_capacity(node_table.len());
        for (row, id) in node_table.ids.iter().enumerate() {
            let mut node = Node::new(
                id.as_str(),
                node_table.name(row).unwrap_or_default(),
                node_table.color(row),
            );
            if node_table.is_highlighted(row) {
                node.is_home = true;
                node.position = Some(ctx.center());
            }
            if !lookup.insert(id, row) {
                stats.duplicate_node_ids += 1;
                warn!("Duplicate node id {} at row {}; edges resolve to the first row", id, row);
            }
            nodes.push(node);
        }

        let mut edges = Vec::with_capacity(edge_table.len());
        for row in 0..edge_table.len() {
            let id = edge_table.id(row);
            let (source, target) = (edge_table.source(row), edge_table.target(row));
            let (source_index, target_index) = match (lookup.get(source), lookup.get(target)) {
                (Some(s), Some(t)) => (s, t),
                _ => {
                    stats.skipped_edges += 1;
                    debug!("Skipping edge {}: unresolved endpoint {} -> {}", id, source, target);
                    continue;
                }
            };

            let capacity = edge_table.capacity(row);
            let btc_value = sats_to_btc(capacity);
            nodes[source_index].add_channel(btc_value);
            nodes[target_index].add_channel(btc_value);

            let display_width = display_width_for(capacity);
            if !display_width.is_finite() {
                stats.non_finite_widths += 1;
                warn!("Edge {} has capacity {}; line width is {}", id, capacity, display_width);
            }

            edges.push(Edge {
                id: id.to_string(),
                source_id: source.to_string(),
                target_id: target.to_string(),
                source_index,
                target_index,
                capacity,
                display_width,
                tooltip_text: format!(
                    "{}<br>{} sats",
                    id,
                    group_digits(capacity, &self.group_separator)
                ),
                line_color: nodes[source_index].color.clone(),
            });
        }

        debug!(
            "Built graph: {} nodes, {} edges ({} skipped)",
            nodes.len(),
            edges.len(),
            stats.skipped_edges
        );

        let incidence = IncidenceIndex::from_edges(&edges);
        Graph {
            nodes,
            edges,
            stats,
            lookup,
            incidence,
        }
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RenderContext {
        RenderContext::new(800.0, 600.0)
    }

    #[test]
    fn test_first_row_node_is_resolvable() {
        let mut nodes = NodeTable::default();
        nodes.push("a", Some("alice"), true, "#f00");
        nodes.push("b", None, false, "#0f0");
        let mut edges = EdgeTable::default();
        edges.push("1", "a", "b", 5_000_000);

        let graph = GraphBuilder::new().build(&nodes, &edges, &ctx());
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.nodes[0].degree, 1);
        assert_eq!(graph.edges[0].source_index, 0);
        assert_eq!(graph.edges[0].line_color, "#f00");
    }

    #[test]
    fn test_edges_resolve_regardless_of_row_order() {
        let mut nodes = NodeTable::default();
        nodes.push("a", None, true, "");
        nodes.push("late", None, false, "");
        let mut edges = EdgeTable::default();
        edges.push("1", "late", "a", 100_000_000);

        let graph = GraphBuilder::new().build(&nodes, &edges, &ctx());
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.nodes[1].total_value, 1.0);
    }

    #[test]
    fn test_unresolved_edge_is_dropped_without_side_effects() {
        let mut nodes = NodeTable::default();
        nodes.push("a", None, true, "");
        let mut edges = EdgeTable::default();
        edges.push("1", "a", "ghost", 100_000_000);

        let graph = GraphBuilder::new().build(&nodes, &edges, &ctx());
        assert!(graph.edges.is_empty());
        assert_eq!(graph.nodes[0].degree, 0);
        assert_eq!(graph.nodes[0].total_value, 0.0);
        assert_eq!(graph.nodes[0].display_size, 12.0);
        assert_eq!(graph.stats.skipped_edges, 1);
    }

    #[test]
    fn test_home_is_centered() {
        let mut nodes = NodeTable::default();
        nodes.push("a", None, false, "");
        nodes.push("h", None, true, "");
        let graph = GraphBuilder::new().build(&nodes, &EdgeTable::default(), &ctx());

        assert_eq!(graph.home_index(), Ok(1));
        assert_eq!(graph.nodes[1].position, Some(Position { x: 400.0, y: 300.0 }));
        assert_eq!(graph.nodes[0].position, None);
    }

    #[test]
    fn test_missing_home() {
        let mut nodes = NodeTable::default();
        nodes.push("a", None, false, "");
        let graph = GraphBuilder::new().build(&nodes, &EdgeTable::default(), &ctx());
        assert_eq!(graph.home().unwrap_err(), GraphError::MissingHomeNode);
        assert_eq!(GraphError::MissingHomeNode.error_code(), ErrorCode::NotFound);
    }

    #[test]
    fn test_tooltip_uses_separator() {
        let mut nodes = NodeTable::default();
        nodes.push("a", None, true, "");
        nodes.push("b", None, false, "");
        let mut edges = EdgeTable::default();
        edges.push("chan", "a", "b", 200_000_000);

        let graph = GraphBuilder::new()
            .with_group_separator(" ")
            .build(&nodes, &edges, &ctx());
        assert_eq!(graph.edges[0].tooltip_text, "chan<br>200 000 000 sats");
    }

    #[test]
    fn test_incident_edges_follow_edge_order() {
        let mut nodes = NodeTable::default();
        for id in ["a", "b", "c"] {
            nodes.push(id, None, id == "a", "");
        }
        let mut edges = EdgeTable::default();
        edges.push("1", "b", "c", 10);
        edges.push("2", "a", "b", 10);
        edges.push("3", "c", "a", 10);

        let graph = GraphBuilder::new().build(&nodes, &edges, &ctx());
        let ids: Vec<&str> = graph.incident_edges("a").map(|(_, e)| e.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
        assert_eq!(graph.resolve("c"), Some(2));
    }
}
