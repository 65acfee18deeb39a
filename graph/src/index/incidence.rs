use std::collections::HashMap;

use lnviz_core::model::Edge;

/// Node id -> indices of incident edges, in edge order.
///
/// A self-loop is listed once for its node.
pub struct IncidenceIndex {
    incidence: HashMap<String, Vec<usize>>,
}

impl IncidenceIndex {
    pub fn new() -> Self {
        Self {
            incidence: HashMap::new(),
        }
    }

    pub fn from_edges(edges: &[Edge]) -> Self {
        let mut index = Self::new();
        for (position, edge) in edges.iter().enumerate() {
            index.add_edge(position, &edge.source_id, &edge.target_id);
        }
        index
    }

    pub fn add_edge(&mut self, edge_index: usize, source: &str, target: &str) {
        self.incidence
            .entry(source.to_string())
            .or_default()
            .push(edge_index);
        if target != source {
            self.incidence
                .entry(target.to_string())
                .or_default()
                .push(edge_index);
        }
    }

    /// Edge indices touching `id`, ascending.
    pub fn incident(&self, id: &str) -> &[usize] {
        self.incidence.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for IncidenceIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incident_edges_in_order() {
        let mut index = IncidenceIndex::new();
        index.add_edge(0, "a", "b");
        index.add_edge(1, "b", "c");
        index.add_edge(2, "c", "a");

        assert_eq!(index.incident("a"), &[0, 2]);
        assert_eq!(index.incident("b"), &[0, 1]);
        assert!(index.incident("z").is_empty());
    }

    #[test]
    fn test_self_loop_listed_once() {
        let mut index = IncidenceIndex::new();
        index.add_edge(0, "a", "a");
        assert_eq!(index.incident("a"), &[0]);
    }
}
