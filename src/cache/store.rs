//! Cache Store Module
//!
//! Keyed entry storage combining a HashMap with LRU tracking and lazy TTL expiration.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::cache::{CacheEntry, ErasedValue, RecencyIndex};

/// Stored entry plus its insertion sequence, used for stable key listing.
#[derive(Debug)]
struct Slot {
    entry: CacheEntry,
    seq: u64,
}

// == Entry Store ==
/// Bounded entry storage with LRU eviction and lazy TTL expiry.
///
/// Absence is never an error here: every lookup or removal of a missing key
/// simply reports that nothing was there.
#[derive(Debug)]
pub struct EntryStore {
    /// Key-value storage
    slots: HashMap<String, Slot>,
    /// LRU access tracker
    recency: RecencyIndex,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Next insertion sequence number
    next_seq: u64,
}

impl EntryStore {
    // == Constructor ==
    /// Creates a new store holding at most `max_entries` entries.
    ///
    /// A capacity of zero is treated as one; `CacheConfig` rejects it before
    /// it gets here.
    pub fn new(max_entries: usize) -> Self {
        Self {
            slots: HashMap::new(),
            recency: RecencyIndex::new(),
            max_entries: max_entries.max(1),
            next_seq: 0,
        }
    }

    // == Get ==
    /// Returns the live entry for `key`, refreshing its recency.
    ///
    /// An expired entry is removed at the moment it is found and reported as
    /// absent.
    pub fn get(&mut self, key: &str) -> Option<&CacheEntry> {
        let expired = self.slots.get(key)?.entry.is_expired();
        if expired {
            self.remove_slot(key);
            debug!(key, "Lazily removed expired entry");
            return None;
        }

        self.recency.touch(key);
        let slot = self.slots.get_mut(key)?;
        slot.entry.touch();
        Some(&slot.entry)
    }

    // == Peek ==
    /// Returns the entry for `key` without refreshing recency or purging it.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry> {
        self.slots.get(key).map(|slot| &slot.entry)
    }

    // == Set ==
    /// Stores a value, replacing any existing entry for the key wholesale.
    ///
    /// Inserting a new key into a full store first evicts the least recently
    /// used entry. Returns the evicted key, if any.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Time to live for the new entry
    pub fn set(&mut self, key: String, value: ErasedValue, ttl: Duration) -> Option<String> {
        let mut evicted = None;

        if !self.slots.contains_key(&key) && self.slots.len() >= self.max_entries {
            if let Some(victim) = self.recency.pop_oldest() {
                self.slots.remove(&victim);
                debug!(key = %victim, "Evicted least recently used entry");
                evicted = Some(victim);
            }
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.recency.touch(&key);
        let entry = CacheEntry::new(key.clone(), value, ttl);
        self.slots.insert(key, Slot { entry, seq });

        evicted
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether an entry was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_slot(key)
    }

    // == Remove Matching ==
    /// Removes every entry whose key matches `pred`, returning the removed keys.
    pub fn remove_matching<F>(&mut self, pred: F) -> Vec<String>
    where
        F: Fn(&str) -> bool,
    {
        let matched: Vec<String> = self
            .slots
            .keys()
            .filter(|key| pred(key.as_str()))
            .cloned()
            .collect();

        for key in &matched {
            self.remove_slot(key);
        }
        matched
    }

    // == Keys ==
    /// Returns the current keys in insertion order.
    ///
    /// Expired entries that have not been purged yet are still listed.
    pub fn keys(&self) -> Vec<String> {
        let mut slots: Vec<(&String, u64)> = self
            .slots
            .iter()
            .map(|(key, slot)| (key, slot.seq))
            .collect();
        slots.sort_by_key(|(_, seq)| *seq);
        slots.into_iter().map(|(key, _)| key.clone()).collect()
    }

    // == Purge Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired: Vec<String> = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove_slot(key);
        }
        expired.len()
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.recency.clear();
    }

    // == Length ==
    /// Returns the current number of entries in the store.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    fn remove_slot(&mut self, key: &str) -> bool {
        self.recency.remove(key);
        self.slots.remove(key).is_some()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const TTL: Duration = Duration::from_secs(300);

    fn value(s: &str) -> ErasedValue {
        Arc::new(s.to_string())
    }

    fn read(store: &mut EntryStore, key: &str) -> Option<String> {
        store
            .get(key)
            .and_then(|entry| entry.downcast::<String>())
            .map(|v| v.as_ref().clone())
    }

    #[test]
    fn test_store_new() {
        let store = EntryStore::new(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.max_entries(), 100);
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = EntryStore::new(100);

        store.set("key1".to_string(), value("value1"), TTL);

        assert_eq!(read(&mut store, "key1").as_deref(), Some("value1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = EntryStore::new(100);
        assert!(store.get("nonexistent").is_none());
    }

    #[test]
    fn test_store_delete() {
        let mut store = EntryStore::new(100);

        store.set("key1".to_string(), value("value1"), TTL);

        assert!(store.delete("key1"));
        assert!(store.is_empty());
        assert!(store.get("key1").is_none());
    }

    #[test]
    fn test_store_delete_nonexistent_is_noop() {
        let mut store = EntryStore::new(100);
        assert!(!store.delete("nonexistent"));
        assert!(!store.delete("nonexistent"));
    }

    #[test]
    fn test_store_overwrite_replaces_wholesale() {
        let mut store = EntryStore::new(100);

        store.set("key1".to_string(), value("value1"), TTL);
        store.set("key1".to_string(), value("value2"), TTL);

        assert_eq!(read(&mut store, "key1").as_deref(), Some("value2"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_lazy_ttl_expiration() {
        let mut store = EntryStore::new(100);

        store.set("key1".to_string(), value("value1"), Duration::from_secs(1));
        assert!(store.get("key1").is_some());

        tokio::time::advance(Duration::from_millis(1100)).await;

        // Still physically present until the next access finds it stale
        assert!(store.peek("key1").is_some());
        assert!(store.get("key1").is_none());
        assert!(store.peek("key1").is_none());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = EntryStore::new(3);

        store.set("key1".to_string(), value("value1"), TTL);
        store.set("key2".to_string(), value("value2"), TTL);
        store.set("key3".to_string(), value("value3"), TTL);

        let evicted = store.set("key4".to_string(), value("value4"), TTL);

        assert_eq!(evicted.as_deref(), Some("key1"));
        assert_eq!(store.len(), 3);
        assert!(store.get("key1").is_none());
        assert!(store.get("key2").is_some());
        assert!(store.get("key3").is_some());
        assert!(store.get("key4").is_some());
    }

    #[test]
    fn test_store_read_refreshes_recency() {
        let mut store = EntryStore::new(2);

        store.set("a".to_string(), value("1"), TTL);
        store.set("b".to_string(), value("2"), TTL);
        assert!(store.get("a").is_some());
        let evicted = store.set("c".to_string(), value("3"), TTL);

        assert_eq!(evicted.as_deref(), Some("b"));
        let mut keys = store.keys();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_store_peek_does_not_refresh_recency() {
        let mut store = EntryStore::new(2);

        store.set("a".to_string(), value("1"), TTL);
        store.set("b".to_string(), value("2"), TTL);
        assert!(store.peek("a").is_some());
        let evicted = store.set("c".to_string(), value("3"), TTL);

        assert_eq!(evicted.as_deref(), Some("a"));
    }

    #[test]
    fn test_store_overwrite_at_capacity_does_not_evict() {
        let mut store = EntryStore::new(2);

        store.set("a".to_string(), value("1"), TTL);
        store.set("b".to_string(), value("2"), TTL);
        let evicted = store.set("a".to_string(), value("3"), TTL);

        assert!(evicted.is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_store_keys_in_insertion_order() {
        let mut store = EntryStore::new(10);

        store.set("packages:list".to_string(), value("p"), TTL);
        store.set("athletes:list".to_string(), value("a"), TTL);
        store.set("athletes:7".to_string(), value("7"), TTL);
        store.get("packages:list");

        assert_eq!(
            store.keys(),
            vec!["packages:list", "athletes:list", "athletes:7"]
        );
    }

    #[test]
    fn test_store_remove_matching() {
        let mut store = EntryStore::new(10);

        store.set("athletes:list".to_string(), value("a"), TTL);
        store.set("athletes:7".to_string(), value("7"), TTL);
        store.set("packages:list".to_string(), value("p"), TTL);

        let mut removed = store.remove_matching(|k| k.starts_with("athletes:"));
        removed.sort();

        assert_eq!(removed, vec!["athletes:7", "athletes:list"]);
        assert_eq!(store.keys(), vec!["packages:list"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_purge_expired() {
        let mut store = EntryStore::new(100);

        store.set("key1".to_string(), value("value1"), Duration::from_secs(1));
        store.set("key2".to_string(), value("value2"), Duration::from_secs(10));

        tokio::time::advance(Duration::from_millis(1100)).await;

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("key2").is_some());
    }

    #[test]
    fn test_store_clear() {
        let mut store = EntryStore::new(10);
        store.set("a".to_string(), value("1"), TTL);
        store.set("b".to_string(), value("2"), TTL);

        store.clear();

        assert!(store.is_empty());
        assert!(store.keys().is_empty());
    }
}
