//! API Routes
//!
//! Configures the Axum router with all debug endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, health_handler, invalidate_key_handler, invalidate_pattern_handler,
    stats_handler, AppState,
};

/// Creates the debug router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /debug/cache` - Cache statistics
/// - `DELETE /debug/cache` - Clear the cache
/// - `DELETE /debug/cache/keys/:key` - Invalidate a single key
/// - `POST /debug/cache/invalidate` - Invalidate by scope
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/debug/cache", get(stats_handler).delete(clear_handler))
        .route("/debug/cache/keys/:key", delete(invalidate_key_handler))
        .route("/debug/cache/invalidate", post(invalidate_pattern_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
