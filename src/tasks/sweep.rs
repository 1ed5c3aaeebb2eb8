//! Expiry Sweep Task
//!
//! Background task that periodically purges expired cache entries.
//!
//! Expiry is already enforced lazily on access; the sweep only reclaims memory
//! held by entries nobody reads again. It never touches in-flight fetches.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::coordinator::RequestCache;

/// Spawns a background task that periodically purges expired cache entries.
///
/// # Arguments
/// * `cache` - Handle on the cache to sweep
/// * `interval` - Time between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
///
/// # Example
/// ```ignore
/// let cache = RequestCache::new(CacheConfig::default())?;
/// let sweep_handle = spawn_sweep_task(cache.clone(), Duration::from_secs(30));
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task(cache: RequestCache, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            interval_ms = interval.as_millis() as u64,
            "Starting expiry sweep task"
        );

        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let removed = cache.purge_expired();
            if removed > 0 {
                info!(removed, "Expiry sweep: removed expired entries");
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}

/// Spawns the sweep if the cache's configuration enables one.
pub fn spawn_configured_sweep(cache: &RequestCache) -> Option<JoinHandle<()>> {
    let interval = cache.config().sweep_interval?;
    Some(spawn_sweep_task(cache.clone(), interval))
}
