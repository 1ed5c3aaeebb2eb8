//! API Module
//!
//! HTTP handlers and routing for the cache debug surface. Hosts mount this
//! router for operational visibility; the caching contract never depends on it.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /debug/cache` - Occupancy and counter snapshot
//! - `DELETE /debug/cache` - Clear every entry
//! - `DELETE /debug/cache/keys/:key` - Invalidate one key
//! - `POST /debug/cache/invalidate` - Invalidate by key, prefix or entity

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
