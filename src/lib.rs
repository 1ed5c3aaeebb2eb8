//! Request Cache - A read-through cache for backend queries
//!
//! Deduplicates concurrent fetches per key, serves fresh results from memory,
//! bounds memory with LRU eviction, and drops entries precisely when writes
//! invalidate them.
//!
//! ```ignore
//! let cache = RequestCache::new(CacheConfig::from_env()?)?;
//!
//! let athletes = cache
//!     .get_or_fetch(
//!         CacheKey::new("athletes").segment("list"),
//!         move || async move { backend.list_athletes().await },
//!         None,
//!     )
//!     .await?;
//!
//! cache
//!     .mutate(backend.update_athlete(id, changes), &[KeyPattern::entity("athletes")])
//!     .await?;
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod invalidation;
pub mod models;
pub mod tasks;
pub mod telemetry;

pub use api::AppState;
pub use cache::{CacheKey, CacheStats};
pub use config::CacheConfig;
pub use coordinator::RequestCache;
pub use error::{CacheError, Result};
pub use invalidation::KeyPattern;
pub use tasks::{spawn_configured_sweep, spawn_sweep_task};
pub use telemetry::init_tracing;
