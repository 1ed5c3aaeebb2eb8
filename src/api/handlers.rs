//! API Handlers
//!
//! HTTP request handlers for each debug endpoint.

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::cache::CacheStats;
use crate::config::CacheConfig;
use crate::coordinator::RequestCache;
use crate::error::{CacheError, Result};
use crate::models::{
    ClearResponse, HealthResponse, InvalidateKeyResponse, InvalidatePatternResponse,
    InvalidateRequest,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The cache being inspected
    pub cache: RequestCache,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(cache: RequestCache) -> Self {
        Self { cache }
    }

    /// Creates a new AppState with a fresh cache built from configuration.
    pub fn from_config(config: CacheConfig) -> Result<Self> {
        Ok(Self::new(RequestCache::new(config)?))
    }
}

/// Handler for GET /debug/cache
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.get_stats())
}

/// Handler for DELETE /debug/cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let cleared = state.cache.clear_all();
    info!(cleared, "Cache cleared through debug API");

    Json(ClearResponse::new(cleared))
}

/// Handler for DELETE /debug/cache/keys/:key
pub async fn invalidate_key_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<InvalidateKeyResponse> {
    let removed = state.cache.invalidate(&key);
    Json(InvalidateKeyResponse::new(key, removed))
}

/// Handler for POST /debug/cache/invalidate
pub async fn invalidate_pattern_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidatePatternResponse>> {
    let pattern = req.into_pattern().map_err(CacheError::InvalidRequest)?;
    let removed = state.cache.invalidate_matching(&pattern);

    Ok(Json(InvalidatePatternResponse::new(
        pattern.to_string(),
        removed,
    )))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
