//! Recency Index Module
//!
//! Implements Least Recently Used ordering for cache eviction.

use std::collections::{BTreeMap, HashMap};

// == Recency Index ==
/// Tracks access order for LRU eviction strategy.
///
/// Every touch stamps the key with the next value of a monotonic counter.
/// The smallest stamp is the least recently used key, so ties in wall-clock
/// time always resolve by access order.
#[derive(Debug, Default)]
pub struct RecencyIndex {
    /// Current stamp per key
    stamps: HashMap<String, u64>,
    /// Keys ordered by stamp, oldest first
    order: BTreeMap<u64, String>,
    /// Next stamp to hand out
    clock: u64,
}

impl RecencyIndex {
    // == Constructor ==
    /// Creates a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used, inserting it if new.
    pub fn touch(&mut self, key: &str) {
        let stamp = self.clock;
        self.clock += 1;

        match self.stamps.get_mut(key) {
            Some(previous) => {
                self.order.remove(&*previous);
                *previous = stamp;
            }
            None => {
                self.stamps.insert(key.to_string(), stamp);
            }
        }
        self.order.insert(stamp, key.to_string());
    }

    // == Remove ==
    /// Stops tracking a key. Unknown keys are ignored.
    pub fn remove(&mut self, key: &str) {
        if let Some(stamp) = self.stamps.remove(key) {
            self.order.remove(&stamp);
        }
    }

    // == Pop Oldest ==
    /// Returns and stops tracking the least recently used key.
    pub fn pop_oldest(&mut self) -> Option<String> {
        let (_, key) = self.order.pop_first()?;
        self.stamps.remove(&key);
        Some(key)
    }

    pub fn clear(&mut self) {
        self.stamps.clear();
        self.order.clear();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn drain(index: &mut RecencyIndex) -> Vec<String> {
        std::iter::from_fn(|| index.pop_oldest()).collect()
    }

    #[test]
    fn test_index_new() {
        let mut index = RecencyIndex::new();
        assert_eq!(index.pop_oldest(), None);
    }

    #[test]
    fn test_touch_new_keys_keeps_insertion_order() {
        let mut index = RecencyIndex::new();

        index.touch("athletes:list");
        index.touch("packages:list");
        index.touch("athletes:7");

        assert_eq!(drain(&mut index), vec!["athletes:list", "packages:list", "athletes:7"]);
    }

    #[test]
    fn test_touch_existing_key_moves_it_last() {
        let mut index = RecencyIndex::new();

        index.touch("a");
        index.touch("b");
        index.touch("c");
        index.touch("a");

        assert_eq!(drain(&mut index), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_pop_oldest_drains_in_recency_order() {
        let mut index = RecencyIndex::new();

        index.touch("a");
        index.touch("b");
        index.touch("c");
        index.touch("a");
        index.touch("c");
        index.touch("b");

        assert_eq!(index.pop_oldest().as_deref(), Some("a"));
        assert_eq!(index.pop_oldest().as_deref(), Some("c"));
        assert_eq!(index.pop_oldest().as_deref(), Some("b"));
        assert_eq!(index.pop_oldest(), None);
    }

    #[test]
    fn test_remove_ignores_unknown_keys() {
        let mut index = RecencyIndex::new();

        index.touch("key1");
        index.touch("key2");
        index.remove("nonexistent");
        index.remove("key1");

        assert_eq!(drain(&mut index), vec!["key2"]);
    }

    #[test]
    fn test_remove_then_touch_reinserts_as_newest() {
        let mut index = RecencyIndex::new();

        index.touch("a");
        index.touch("b");
        index.remove("a");
        index.touch("a");

        assert_eq!(drain(&mut index), vec!["b", "a"]);
    }

    #[test]
    fn test_repeated_touch_tracks_once() {
        let mut index = RecencyIndex::new();

        index.touch("key1");
        index.touch("key1");
        index.touch("key1");

        assert_eq!(drain(&mut index), vec!["key1"]);
    }

    #[test]
    fn test_clear() {
        let mut index = RecencyIndex::new();
        index.touch("a");
        index.touch("b");

        index.clear();

        assert_eq!(index.pop_oldest(), None);
    }
}
