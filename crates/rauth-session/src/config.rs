//! Configuration for the session engine.

use std::time::Duration;

use crate::error::{Error, Result};

/// Default lifetime of a cached session (15 minutes).
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(900);

/// Default retention of a revocation (1 hour).
pub const DEFAULT_REVOKED_TTL: Duration = Duration::from_secs(3600);

/// Default interval between background sweeps (5 minutes).
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Configuration for the session engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// How long a positive remote verification is trusted.
    pub session_ttl: Duration,

    /// How long a revocation is remembered.
    /// After this window the token is unknown again, not valid.
    pub revoked_ttl: Duration,

    /// Interval for the background cleanup task.
    pub cleanup_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            session_ttl: DEFAULT_SESSION_TTL,
            revoked_ttl: DEFAULT_REVOKED_TTL,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from whole seconds. Zero selects the default for that field.
    pub fn from_seconds(session_ttl: u64, revoked_ttl: u64, cleanup_interval: u64) -> Self {
        Self::new()
            .with_session_ttl(Duration::from_secs(session_ttl))
            .with_revoked_ttl(Duration::from_secs(revoked_ttl))
            .with_cleanup_interval(Duration::from_secs(cleanup_interval))
    }

    /// Set the session TTL. Zero keeps the default.
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = or_default(ttl, DEFAULT_SESSION_TTL);
        self
    }

    /// Set the revocation retention window. Zero keeps the default.
    pub fn with_revoked_ttl(mut self, ttl: Duration) -> Self {
        self.revoked_ttl = or_default(ttl, DEFAULT_REVOKED_TTL);
        self
    }

    /// Set the cleanup interval. Zero keeps the default.
    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = or_default(interval, DEFAULT_CLEANUP_INTERVAL);
        self
    }

    /// Reject zero durations set directly on the public fields.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("session_ttl", self.session_ttl),
            ("revoked_ttl", self.revoked_ttl),
            ("cleanup_interval", self.cleanup_interval),
        ] {
            if value.is_zero() {
                return Err(Error::invalid_config(field, "must be a positive duration"));
            }
        }
        Ok(())
    }
}

fn or_default(value: Duration, default: Duration) -> Duration {
    if value.is_zero() { default } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.session_ttl, Duration::from_secs(900));
        assert_eq!(config.revoked_ttl, Duration::from_secs(3600));
        assert_eq!(config.cleanup_interval, Duration::from_secs(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_falls_back_to_default() {
        let config = EngineConfig::from_seconds(0, 120, 0);
        assert_eq!(config.session_ttl, DEFAULT_SESSION_TTL);
        assert_eq!(config.revoked_ttl, Duration::from_secs(120));
        assert_eq!(config.cleanup_interval, DEFAULT_CLEANUP_INTERVAL);
    }

    #[test]
    fn test_validate_rejects_zero_field() {
        let config = EngineConfig {
            revoked_ttl: Duration::ZERO,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig { ref field, .. }) if field == "revoked_ttl"
        ));
    }
}
