//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the cache.
//!
//! # Tasks
//! - Expiry sweep: Removes expired cache entries at configured intervals

mod sweep;

pub use sweep::{spawn_configured_sweep, spawn_sweep_task};
