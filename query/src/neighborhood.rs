//! Bounded, degree-filtered neighborhood of the home node.
//!
//! The walk is a recursive depth-first expansion sharing one node and one edge
//! accumulator across all branches:
//!
//! - every visited node lists all of its incident edges;
//! - with depth remaining, each neighbor whose degree passes the filter is
//!   expanded with one less hop, then *all* neighbors (filtered or not) are
//!   appended, so filtered nodes show up as unexpanded leaves;
//! - with no depth remaining, neighbors are appended only under
//!   [`TerminalNeighbors::Include`]. Under `Omit` the boundary edges are
//!   listed while their far endpoints are not.
//!
//! Nodes and edges are deduplicated by their index in the built graph, so two
//! channels sharing an id remain distinct.

use std::collections::{HashMap, HashSet};

use graph::Graph;
use lnviz_core::config::TerminalNeighbors;
use lnviz_core::model::{Edge, Node};

use crate::dsl::RenderRequest;

/// Indices into a [`Graph`], in order of first encounter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Subgraph {
    pub nodes: Vec<usize>,
    pub edges: Vec<usize>,
}

impl Subgraph {
    pub fn nodes<'s, 'g: 's>(&'s self, graph: &'g Graph) -> impl Iterator<Item = &'g Node> + 's {
        self.nodes.iter().map(move |&i| &graph.nodes[i])
    }

    pub fn edges<'s, 'g: 's>(&'s self, graph: &'g Graph) -> impl Iterator<Item = &'g Edge> + 's {
        self.edges.iter().map(move |&i| &graph.edges[i])
    }
}

#[derive(Default)]
struct Accumulator {
    nodes: Vec<usize>,
    seen_nodes: HashSet<usize>,
    edges: Vec<usize>,
    seen_edges: HashSet<usize>,
    // Largest depth each node finished expanding with. Re-entering with no
    // more depth than that adds nothing.
    expanded: HashMap<usize, u8>,
}

impl Accumulator {
    fn push_node(&mut self, index: usize) {
        if self.seen_nodes.insert(index) {
            self.nodes.push(index);
        }
    }

    fn push_edge(&mut self, index: usize) {
        if self.seen_edges.insert(index) {
            self.edges.push(index);
        }
    }

    fn covers(&self, index: usize, depth: u8) -> bool {
        self.expanded.get(&index).is_some_and(|&done| done >= depth)
    }

    fn mark_expanded(&mut self, index: usize, depth: u8) {
        let done = self.expanded.entry(index).or_insert(depth);
        *done = (*done).max(depth);
    }
}

pub struct NeighborhoodExtractor<'g> {
    graph: &'g Graph,
    request: RenderRequest,
}

impl<'g> NeighborhoodExtractor<'g> {
    pub fn new(graph: &'g Graph, request: RenderRequest) -> Self {
        Self { graph, request }
    }

    /// Subgraph around `home`. The home node is always the first entry,
    /// whatever its own degree.
    pub fn extract(&self, home: usize) -> Subgraph {
        let mut acc = Accumulator::default();
        self.visit(home, self.request.depth, &mut acc);
        Subgraph {
            nodes: acc.nodes,
            edges: acc.edges,
        }
    }

    fn visit(&self, index: usize, depth: u8, acc: &mut Accumulator) {
        if acc.covers(index, depth) {
            return;
        }
        acc.push_node(index);

        let node_id = self.graph.nodes[index].id.as_str();
        let mut neighbors = Vec::new();
        for (edge_index, edge) in self.graph.incident_edges(node_id) {
            acc.push_edge(edge_index);
            if let Some(peer) = edge.peer_of(node_id).and_then(|id| self.graph.resolve(id)) {
                neighbors.push(peer);
            }
        }

        if depth > 0 {
            let remaining = depth - 1;
            for &neighbor in &neighbors {
                if self.request.admits(self.graph.nodes[neighbor].degree) {
                    self.visit(neighbor, remaining, acc);
                }
            }
            neighbors.into_iter().for_each(|n| acc.push_node(n));
        } else if self.request.terminal_neighbors == TerminalNeighbors::Include {
            neighbors.into_iter().for_each(|n| acc.push_node(n));
        }

        acc.mark_expanded(index, depth);
    }
}
