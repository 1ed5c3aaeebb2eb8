//! Cache Key Module
//!
//! Structured keys of the form `entity:segment:segment`.

use std::fmt;

/// Separator between the entity and each segment.
pub const KEY_SEPARATOR: char = ':';

// == Cache Key ==
/// A cache key built from an entity type and query segments.
///
/// ```
/// use request_cache::cache::CacheKey;
///
/// let key = CacheKey::new("athletes").segment("list").param("club", 7);
/// assert_eq!(key.to_string(), "athletes:list:club=7");
/// assert_eq!(key.entity(), "athletes");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    entity: String,
    segments: Vec<String>,
}

impl CacheKey {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            segments: Vec::new(),
        }
    }

    /// Appends a plain segment, e.g. `list` or a record id.
    pub fn segment(mut self, segment: impl fmt::Display) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    /// Appends a `name=value` filter segment.
    pub fn param(mut self, name: &str, value: impl fmt::Display) -> Self {
        self.segments.push(format!("{name}={value}"));
        self
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.entity)?;
        for segment in &self.segments {
            write!(f, "{KEY_SEPARATOR}{segment}")?;
        }
        Ok(())
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.to_string()
    }
}

impl From<&CacheKey> for String {
    fn from(key: &CacheKey) -> Self {
        key.to_string()
    }
}
