//! Request DTOs for the debug API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::invalidation::KeyPattern;

/// Request body for POST /debug/cache/invalidate
///
/// Exactly one of the fields must be set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvalidateRequest {
    /// Invalidate exactly this key
    #[serde(default)]
    pub key: Option<String>,
    /// Invalidate every key starting with this string
    #[serde(default)]
    pub prefix: Option<String>,
    /// Invalidate an entity and all of its `entity:...` keys
    #[serde(default)]
    pub entity: Option<String>,
}

impl InvalidateRequest {
    /// Converts the request into an invalidation scope.
    ///
    /// Returns an error message if validation fails.
    pub fn into_pattern(self) -> Result<KeyPattern, String> {
        match (self.key, self.prefix, self.entity) {
            (Some(key), None, None) => non_empty("key", key).map(KeyPattern::Exact),
            (None, Some(prefix), None) => non_empty("prefix", prefix).map(KeyPattern::Prefix),
            (None, None, Some(entity)) => non_empty("entity", entity).map(KeyPattern::Entity),
            _ => Err("Exactly one of key, prefix or entity must be provided".to_string()),
        }
    }
}

fn non_empty(field: &str, value: String) -> Result<String, String> {
    if value.is_empty() {
        Err(format!("{field} cannot be empty"))
    } else {
        Ok(value)
    }
}
