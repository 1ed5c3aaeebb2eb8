//! Configuration Module
//!
//! Handles loading and validating cache configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Default maximum number of cached entries
pub const DEFAULT_MAX_ENTRIES: usize = 500;

/// Default time-to-live for cached entries
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Longest accepted time-to-live (one year)
pub const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// TTL applied when a call site does not pass its own
    pub default_ttl: Duration,
    /// Background sweep interval, None = lazy expiry only
    pub sweep_interval: Option<Duration>,
}

impl CacheConfig {
    /// Creates a validated config with no background sweep.
    pub fn new(max_entries: usize, default_ttl: Duration) -> Result<Self> {
        let config = Self {
            max_entries,
            default_ttl,
            sweep_interval: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Enables the background sweep.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = Some(interval);
        self
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REQUEST_CACHE_MAX_ENTRIES` - Maximum cache entries (default: 500)
    /// - `REQUEST_CACHE_DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000)
    /// - `REQUEST_CACHE_SWEEP_INTERVAL_MS` - Sweep frequency in milliseconds,
    ///   unset or `0` disables the sweep
    ///
    /// Unlike a missing variable, an unparsable one is an error.
    pub fn from_env() -> Result<Self> {
        let max_entries =
            parse_var::<usize>("REQUEST_CACHE_MAX_ENTRIES")?.unwrap_or(DEFAULT_MAX_ENTRIES);
        let default_ttl = parse_var::<u64>("REQUEST_CACHE_DEFAULT_TTL_MS")?
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TTL);
        let sweep_interval = parse_var::<u64>("REQUEST_CACHE_SWEEP_INTERVAL_MS")?
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis);

        let config = Self {
            max_entries,
            default_ttl,
            sweep_interval,
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the cache cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(CacheError::InvalidConfig(
                "max_entries must be greater than zero".to_string(),
            ));
        }
        validate_ttl(self.default_ttl)?;
        if self.sweep_interval == Some(Duration::ZERO) {
            return Err(CacheError::InvalidConfig(
                "sweep_interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            default_ttl: DEFAULT_TTL,
            sweep_interval: None,
        }
    }
}

/// Rejects a zero TTL, which would produce entries that are stale on arrival.
pub fn validate_ttl(ttl: Duration) -> Result<()> {
    if ttl.is_zero() {
        return Err(CacheError::InvalidConfig(
            "ttl must be greater than zero".to_string(),
        ));
    }
    if ttl > MAX_TTL {
        return Err(CacheError::InvalidConfig(format!(
            "ttl must not exceed {}s",
            MAX_TTL.as_secs()
        )));
    }
    Ok(())
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CacheError::InvalidConfig(format!("{name} has invalid value '{raw}'"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.max_entries, 500);
        assert_eq!(config.default_ttl, Duration::from_secs(300));
        assert!(config.sweep_interval.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_new_rejects_zero_capacity() {
        let result = CacheConfig::new(0, Duration::from_secs(1));
        assert!(matches!(result, Err(CacheError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_new_rejects_zero_ttl() {
        let result = CacheConfig::new(10, Duration::ZERO);
        assert!(matches!(result, Err(CacheError::InvalidConfig(_))));
    }

    #[test]
    fn test_ttl_above_ceiling_rejected() {
        assert!(validate_ttl(MAX_TTL).is_ok());
        assert!(matches!(
            validate_ttl(MAX_TTL + Duration::from_secs(1)),
            Err(CacheError::InvalidConfig(_))
        ));
        assert!(matches!(
            CacheConfig::new(10, Duration::MAX),
            Err(CacheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_rejects_zero_sweep_interval() {
        let config = CacheConfig::default().with_sweep_interval(Duration::ZERO);
        assert!(matches!(
            config.validate(),
            Err(CacheError::InvalidConfig(_))
        ));
    }

    // Env vars are process-wide, so every env case lives in this one test.
    #[test]
    fn test_config_from_env() {
        env::remove_var("REQUEST_CACHE_MAX_ENTRIES");
        env::remove_var("REQUEST_CACHE_DEFAULT_TTL_MS");
        env::remove_var("REQUEST_CACHE_SWEEP_INTERVAL_MS");

        let config = CacheConfig::from_env().unwrap();
        assert_eq!(config, CacheConfig::default());

        env::set_var("REQUEST_CACHE_MAX_ENTRIES", "42");
        env::set_var("REQUEST_CACHE_DEFAULT_TTL_MS", "1500");
        env::set_var("REQUEST_CACHE_SWEEP_INTERVAL_MS", "250");
        let config = CacheConfig::from_env().unwrap();
        assert_eq!(config.max_entries, 42);
        assert_eq!(config.default_ttl, Duration::from_millis(1500));
        assert_eq!(config.sweep_interval, Some(Duration::from_millis(250)));

        env::set_var("REQUEST_CACHE_SWEEP_INTERVAL_MS", "0");
        let config = CacheConfig::from_env().unwrap();
        assert!(config.sweep_interval.is_none());

        env::set_var("REQUEST_CACHE_MAX_ENTRIES", "lots");
        assert!(matches!(
            CacheConfig::from_env(),
            Err(CacheError::InvalidConfig(_))
        ));

        env::set_var("REQUEST_CACHE_MAX_ENTRIES", "0");
        assert!(matches!(
            CacheConfig::from_env(),
            Err(CacheError::InvalidConfig(_))
        ));

        env::remove_var("REQUEST_CACHE_MAX_ENTRIES");
        env::remove_var("REQUEST_CACHE_DEFAULT_TTL_MS");
        env::remove_var("REQUEST_CACHE_SWEEP_INTERVAL_MS");
    }
}
