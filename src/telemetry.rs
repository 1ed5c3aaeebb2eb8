//! Telemetry Module
//!
//! Tracing subscriber setup for hosts and test binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "request_cache=info,tower_http=info";

/// Installs a global fmt subscriber with an env filter.
///
/// Defaults to `default_filter` (or [`DEFAULT_LOG_FILTER`] when None), and can
/// be overridden with the `RUST_LOG` env var. Returns false if a global
/// subscriber was already installed.
pub fn init_tracing(default_filter: Option<&str>) -> bool {
    let default_filter = default_filter.unwrap_or(DEFAULT_LOG_FILTER);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
