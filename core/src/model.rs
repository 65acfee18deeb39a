use serde::{Deserialize, Serialize};

/// Symbol size a node carries before any channel has been counted.
pub const INITIAL_DISPLAY_SIZE: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A network peer, with aggregates accumulated over its channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub display_name: String,
    pub is_home: bool,
    pub degree: u32,
    /// Sum of incident channel capacities in BTC, 4 significant digits.
    pub total_value: f64,
    pub display_size: f64,
    pub color: String,
    pub position: Option<Position>,
}

/// A payment channel between two resolved nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub source_index: usize,
    pub target_index: usize,
    /// Raw capacity in satoshis.
    pub capacity: u64,
    pub display_width: f64,
    pub tooltip_text: String,
    pub line_color: String,
}

impl Node {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            is_home: false,
            degree: 0,
            total_value: 0.0,
            display_size: INITIAL_DISPLAY_SIZE,
            color: color.into(),
            position: None,
        }
    }

    /// Name shown to users: the alias when present, otherwise the id.
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.id
        } else {
            &self.display_name
        }
    }

    /// Count one more channel worth `btc_value` and refresh the derived size.
    pub fn add_channel(&mut self, btc_value: f64) {
        self.degree += 1;
        self.total_value = crate::format::truncate_precision(
            self.total_value + btc_value,
            crate::format::VALUE_PRECISION,
        );
        self.display_size = display_size_for(self.degree);
    }
}

impl Edge {
    /// The endpoint opposite `node_id`, or `None` when the edge is not incident to it.
    pub fn peer_of(&self, node_id: &str) -> Option<&str> {
        if self.source_id == node_id {
            Some(&self.target_id)
        } else if self.target_id == node_id {
            Some(&self.source_id)
        } else {
            None
        }
    }

    pub fn is_incident_to(&self, node_id: &str) -> bool {
        self.source_id == node_id || self.target_id == node_id
    }
}

/// `ln(degree) * 10`; a single channel maps to zero.
pub fn display_size_for(degree: u32) -> f64 {
    (degree as f64).ln() * 10.0
}

/// `1 + ln(ln(capacity))`. Not finite for capacities of one satoshi or less.
pub fn display_width_for(capacity: u64) -> f64 {
    1.0 + (capacity as f64).ln().ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_channel_updates_aggregates() {
        let mut node = Node::new("a", "", "#ff0000");
        assert_eq!(node.display_size, INITIAL_DISPLAY_SIZE);

        node.add_channel(0.05);
        assert_eq!(node.degree, 1);
        assert_eq!(node.total_value, 0.05);
        assert_eq!(node.display_size, 0.0);

        node.add_channel(2.0);
        assert_eq!(node.degree, 2);
        assert_eq!(node.total_value, 2.05);
        assert!((node.display_size - 2f64.ln() * 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_label_falls_back_to_id() {
        assert_eq!(Node::new("02abc", "", "").label(), "02abc");
        assert_eq!(Node::new("02abc", "alice", "").label(), "alice");
    }

    #[test]
    fn test_display_width_non_finite_for_tiny_capacity() {
        assert!(display_width_for(0).is_nan());
        assert_eq!(display_width_for(1), f64::NEG_INFINITY);
        assert!(display_width_for(2).is_finite());
        assert!(display_width_for(200_000_000) > 3.9);
    }

    #[test]
    fn test_peer_of() {
        let edge = Edge {
            id: "1".into(),
            source_id: "a".into(),
            target_id: "b".into(),
            source_index: 0,
            target_index: 1,
            capacity: 10,
            display_width: display_width_for(10),
            tooltip_text: String::new(),
            line_color: String::new(),
        };
        assert_eq!(edge.peer_of("a"), Some("b"));
        assert_eq!(edge.peer_of("b"), Some("a"));
        assert_eq!(edge.peer_of("c"), None);
        assert!(edge.is_incident_to("b"));
    }
}
