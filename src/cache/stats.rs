//! Cache Statistics Module
//!
//! Counters and the read-only occupancy snapshot used for diagnostics.

use serde::Serialize;

// == Counters ==
/// Running totals kept alongside the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheCounters {
    /// `get_or_fetch` calls answered from a live entry
    pub hits: u64,
    /// `get_or_fetch` calls that started a fetch
    pub misses: u64,
    /// `get_or_fetch` calls that joined an in-flight fetch
    pub coalesced: u64,
    /// Entries removed to respect the capacity bound
    pub evictions: u64,
    /// Entries removed by explicit invalidation
    pub invalidations: u64,
}

impl CacheCounters {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses + coalesced), or 0.0 if no requests have
    /// been made. Coalesced calls did not hit the store, so they count against it.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses + self.coalesced;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Cache Stats ==
/// Read-only snapshot of cache occupancy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    /// Current number of entries in the store
    pub size: usize,
    /// Configured capacity
    pub max_size: usize,
    /// Stored keys, in insertion order
    pub keys: Vec<String>,
    /// Keys with a fetch currently registered
    pub in_flight: Vec<String>,
    pub hits: u64,
    pub misses: u64,
    pub coalesced: u64,
    pub evictions: u64,
    pub invalidations: u64,
    pub hit_rate: f64,
}

impl CacheStats {
    /// Builds a snapshot from the store listing and counters.
    pub fn new(
        keys: Vec<String>,
        max_size: usize,
        in_flight: Vec<String>,
        counters: CacheCounters,
    ) -> Self {
        Self {
            size: keys.len(),
            max_size,
            keys,
            in_flight,
            hits: counters.hits,
            misses: counters.misses,
            coalesced: counters.coalesced,
            evictions: counters.evictions,
            invalidations: counters.invalidations,
            hit_rate: counters.hit_rate(),
        }
    }
}
