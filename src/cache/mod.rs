//! Cache Module
//!
//! Entry storage with lazy TTL expiration and LRU eviction, plus the keys and
//! statistics built around it.

mod entry;
mod key;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, ErasedValue};
pub use key::{CacheKey, KEY_SEPARATOR};
pub use lru::RecencyIndex;
pub use stats::{CacheCounters, CacheStats};
pub use store::EntryStore;
