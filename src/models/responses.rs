//! Response DTOs for the debug API
//!
//! Defines the structure of outgoing HTTP response bodies. Cache statistics
//! are served as [`crate::cache::CacheStats`] directly.

use serde::Serialize;

/// Response body for DELETE /debug/cache/keys/:key
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateKeyResponse {
    /// The invalidated key
    pub key: String,
    /// Whether an entry was present
    pub removed: bool,
}

impl InvalidateKeyResponse {
    pub fn new(key: impl Into<String>, removed: bool) -> Self {
        Self {
            key: key.into(),
            removed,
        }
    }
}

/// Response body for POST /debug/cache/invalidate
#[derive(Debug, Clone, Serialize)]
pub struct InvalidatePatternResponse {
    /// Human readable description of the scope
    pub scope: String,
    /// Number of entries removed
    pub removed: usize,
}

impl InvalidatePatternResponse {
    pub fn new(scope: impl Into<String>, removed: usize) -> Self {
        Self {
            scope: scope.into(),
            removed,
        }
    }
}

/// Response body for DELETE /debug/cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
    /// Number of entries the cache held before clearing
    pub cleared: usize,
}

impl ClearResponse {
    pub fn new(cleared: usize) -> Self {
        Self {
            message: format!("Cleared {} cache entries", cleared),
            cleared,
        }
    }
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status ("healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
