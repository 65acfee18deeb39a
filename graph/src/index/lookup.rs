use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Node id -> position in the built node list.
///
/// Lookups return `Option`, so the first row (index 0) resolves like any other.
#[derive(Debug, Clone, Default)]
pub struct NodeLookup {
    positions: HashMap<String, usize>,
}

impl NodeLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: HashMap::with_capacity(capacity),
        }
    }

    /// Register `id` at `index`. The first registration of an id wins;
    /// returns `false` for a duplicate.
    pub fn insert(&mut self, id: &str, index: usize) -> bool {
        match self.positions.entry(id.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(index);
                true
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_row_resolves() {
        let mut lookup = NodeLookup::new();
        lookup.insert("a", 0);
        lookup.insert("b", 1);
        assert_eq!(lookup.get("a"), Some(0));
        assert_eq!(lookup.get("b"), Some(1));
        assert_eq!(lookup.get("z"), None);
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let mut lookup = NodeLookup::new();
        assert!(lookup.insert("a", 0));
        assert!(!lookup.insert("a", 3));
        assert_eq!(lookup.get("a"), Some(0));
    }
}
