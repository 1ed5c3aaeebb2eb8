//! Invalidation Module
//!
//! Structured invalidation scopes and the write path that applies them.
//!
//! A write must invalidate every key whose query result it could have changed,
//! and only once the write has succeeded. [`RequestCache::mutate`] enforces
//! that ordering: scopes are applied after the write resolves `Ok` and before
//! its value is returned, so any read started afterwards misses and refetches.

use std::fmt;
use std::future::Future;

use tracing::debug;

use crate::cache::KEY_SEPARATOR;
use crate::coordinator::RequestCache;

// == Key Pattern ==
/// The set of keys an invalidation applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPattern {
    /// Exactly this key
    Exact(String),
    /// Every key starting with this string
    Prefix(String),
    /// The entity key itself and every `entity:...` key, but not keys of
    /// another entity sharing the same leading characters
    Entity(String),
    /// Every key
    All,
}

impl KeyPattern {
    pub fn exact(key: impl Into<String>) -> Self {
        Self::Exact(key.into())
    }

    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self::Prefix(prefix.into())
    }

    pub fn entity(entity: impl Into<String>) -> Self {
        Self::Entity(entity.into())
    }

    /// Checks whether `key` falls within this scope.
    pub fn matches(&self, key: &str) -> bool {
        match self {
            KeyPattern::Exact(exact) => key == exact,
            KeyPattern::Prefix(prefix) => key.starts_with(prefix.as_str()),
            KeyPattern::Entity(entity) => match key.strip_prefix(entity.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with(KEY_SEPARATOR),
                None => false,
            },
            KeyPattern::All => true,
        }
    }
}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPattern::Exact(key) => write!(f, "key {key}"),
            KeyPattern::Prefix(prefix) => write!(f, "prefix {prefix}*"),
            KeyPattern::Entity(entity) => write!(f, "entity {entity}"),
            KeyPattern::All => f.write_str("all keys"),
        }
    }
}

impl RequestCache {
    // == Invalidate Matching ==
    /// Removes every entry within `pattern`. Returns how many were removed.
    pub fn invalidate_matching(&self, pattern: &KeyPattern) -> usize {
        match pattern {
            KeyPattern::Exact(key) => usize::from(self.invalidate(key)),
            _ => self.invalidate_pattern(|key| pattern.matches(key)),
        }
    }

    // == Mutate ==
    /// Awaits `write` and, only if it succeeds, invalidates every scope in
    /// `scopes` before handing back the write's result.
    ///
    /// A failed write leaves the cache untouched: cache validity follows
    /// persisted state, not attempted state.
    ///
    /// # Example
    /// ```ignore
    /// let athlete = cache
    ///     .mutate(
    ///         backend.update_athlete(id, changes),
    ///         &[KeyPattern::entity("athletes"), KeyPattern::exact("dashboard:summary")],
    ///     )
    ///     .await?;
    /// ```
    pub async fn mutate<T, E, W>(&self, write: W, scopes: &[KeyPattern]) -> Result<T, E>
    where
        W: Future<Output = Result<T, E>>,
    {
        let written = write.await?;

        let removed: usize = scopes
            .iter()
            .map(|scope| self.invalidate_matching(scope))
            .sum();
        debug!(scopes = scopes.len(), removed, "Write committed, cache invalidated");

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_matches_only_itself() {
        let pattern = KeyPattern::exact("athletes:list");
        assert!(pattern.matches("athletes:list"));
        assert!(!pattern.matches("athletes:list:page=2"));
    }

    #[test]
    fn test_prefix_is_plain_string_prefix() {
        let pattern = KeyPattern::prefix("athletes:");
        assert!(pattern.matches("athletes:list"));
        assert!(pattern.matches("athletes:7"));
        assert!(!pattern.matches("athletes"));
        assert!(!pattern.matches("packages:list"));
    }

    #[test]
    fn test_entity_respects_separator() {
        let pattern = KeyPattern::entity("athletes");
        assert!(pattern.matches("athletes"));
        assert!(pattern.matches("athletes:list"));
        assert!(!pattern.matches("athletes_archive:list"));
        assert!(!pattern.matches("packages:list"));
    }

    #[test]
    fn test_all_matches_everything() {
        assert!(KeyPattern::All.matches(""));
        assert!(KeyPattern::All.matches("anything"));
    }

    #[test]
    fn test_display() {
        assert_eq!(KeyPattern::prefix("athletes:").to_string(), "prefix athletes:*");
        assert_eq!(KeyPattern::entity("packages").to_string(), "entity packages");
    }
}
