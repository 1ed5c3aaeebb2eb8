//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::MAX_TTL;

/// A type-erased cached value. Call sites downcast it back to their own type.
pub type ErasedValue = Arc<dyn Any + Send + Sync>;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
///
/// The value is shared and never mutated once stored. A refetch replaces the
/// whole entry.
#[derive(Clone)]
pub struct CacheEntry {
    /// The key this entry is stored under
    pub key: String,
    /// The stored value
    pub value: ErasedValue,
    /// Time of the last successful population
    pub created_at: Instant,
    /// `created_at + ttl`
    pub expires_at: Instant,
    /// Refreshed on every read hit
    pub last_accessed_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry that expires `ttl` from now.
    ///
    /// # Arguments
    /// * `key` - The key the entry is stored under
    /// * `value` - The value to store
    /// * `ttl` - Time to live, expected to be non-zero. Capped at [`MAX_TTL`].
    pub fn new(key: String, value: ErasedValue, ttl: Duration) -> Self {
        let now = Instant::now();
        let ttl = ttl.min(MAX_TTL);

        Self {
            key,
            value,
            created_at: now,
            expires_at: now + ttl,
            last_accessed_at: now,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches `expires_at`.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Checks expiry against a caller-supplied instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    // == Touch ==
    /// Records a read hit.
    pub fn touch(&mut self) {
        self.last_accessed_at = Instant::now();
    }

    /// Returns the value downcast to `V`, or None if it holds another type.
    pub fn downcast<V: Send + Sync + 'static>(&self) -> Option<Arc<V>> {
        Arc::clone(&self.value).downcast::<V>().ok()
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("key", &self.key)
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .field("last_accessed_at", &self.last_accessed_at)
            .finish_non_exhaustive()
    }
}
