//! Error types for the request cache
//!
//! Provides unified error handling using thiserror.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the request cache.
///
/// `Clone` so a single fetch outcome can be handed to every caller that
/// joined the same in-flight request.
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    /// The fetcher for a key failed. Nothing was cached.
    #[error("Fetch failed for key {key}: {cause}")]
    Fetch {
        key: String,
        cause: Arc<anyhow::Error>,
    },

    /// Rejected configuration (zero capacity, zero TTL, unparsable values)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A key was read with a different value type than it was stored with
    #[error("Type mismatch for key {key}: cached value has a different type")]
    TypeMismatch { key: String },

    /// Invalid request data on the debug API
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The fetch task panicked or was aborted
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// Wraps a fetcher failure for `key`.
    pub fn fetch(key: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Fetch {
            key: key.into(),
            cause: Arc::new(source),
        }
    }

    /// Returns the underlying fetcher error, if this is a fetch failure.
    pub fn fetch_source(&self) -> Option<&anyhow::Error> {
        match self {
            CacheError::Fetch { cause, .. } => Some(cause.as_ref()),
            _ => None,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::Fetch { .. } => StatusCode::BAD_GATEWAY,
            CacheError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::TypeMismatch { .. } => StatusCode::CONFLICT,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the request cache.
pub type Result<T> = std::result::Result<T, CacheError>;
