//! Environment variable overrides.
//!
//! Variables take precedence over the config file. Empty values are ignored.

use crate::error::{ConfigError, Result};
use crate::types::RauthConfig;

pub const ENV_API_KEY: &str = "RAUTH_API_KEY";
pub const ENV_APP_ID: &str = "RAUTH_APP_ID";
pub const ENV_WEBHOOK_SECRET: &str = "RAUTH_WEBHOOK_SECRET";
pub const ENV_BASE_URL: &str = "RAUTH_BASE_URL";
pub const ENV_SESSION_TTL: &str = "RAUTH_SESSION_TTL";
pub const ENV_REVOKED_TTL: &str = "RAUTH_REVOKED_TTL";
pub const ENV_CLEANUP_INTERVAL: &str = "RAUTH_CLEANUP_INTERVAL";

impl RauthConfig {
    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides using `lookup` in place of the process environment.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_API_KEY) {
            self.api.api_key = Some(key);
        }
        if let Some(id) = get(ENV_APP_ID) {
            self.api.app_id = Some(id);
        }
        if let Some(secret) = get(ENV_WEBHOOK_SECRET) {
            self.webhook.secret = Some(secret);
        }
        if let Some(url) = get(ENV_BASE_URL) {
            self.api.base_url = url;
        }
        if let Some(secs) = get(ENV_SESSION_TTL) {
            self.cache.session_ttl_secs = parse_secs(ENV_SESSION_TTL, &secs)?;
        }
        if let Some(secs) = get(ENV_REVOKED_TTL) {
            self.cache.revoked_ttl_secs = parse_secs(ENV_REVOKED_TTL, &secs)?;
        }
        if let Some(secs) = get(ENV_CLEANUP_INTERVAL) {
            self.cache.cleanup_interval_secs = parse_secs(ENV_CLEANUP_INTERVAL, &secs)?;
        }
        Ok(())
    }
}

fn parse_secs(var: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid(var, format!("expected whole seconds, got '{value}'")))
}
