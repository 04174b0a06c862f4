//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! [api]
//! base_url = "https://api.rauth.io/session"
//! api_key = "..."
//! app_id = "..."
//! timeout_secs = 30
//!
//! [webhook]
//! secret = "..."
//!
//! [cache]
//! session_ttl_secs = 900
//! revoked_ttl_secs = 3600
//! cleanup_interval_secs = 300
//! ```

use std::path::Path;
use std::time::Duration;

use rauth_session::EngineConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.rauth.io/session";

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// Every section is optional in the file; missing keys take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RauthConfig {
    /// Remote session API settings.
    pub api: ApiSection,

    /// Incoming webhook settings.
    pub webhook: WebhookSection,

    /// Local cache lifetimes.
    pub cache: CacheSection,
}

impl RauthConfig {
    /// Create a config with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load a config file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Check that every credential needed to talk to the API is present.
    pub fn validate(&self) -> Result<()> {
        if is_blank(&self.api.api_key) {
            return Err(ConfigError::missing("api_key", "[api]"));
        }
        if is_blank(&self.api.app_id) {
            return Err(ConfigError::missing("app_id", "[api]"));
        }
        if is_blank(&self.webhook.secret) {
            return Err(ConfigError::missing("secret", "[webhook]"));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::invalid("timeout_secs", "must be positive"));
        }
        Ok(())
    }

    /// Cache lifetimes for the session engine.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::from_seconds(
            self.cache.session_ttl_secs,
            self.cache.revoked_ttl_secs,
            self.cache.cleanup_interval_secs,
        )
    }

    /// Copy of this config with secrets masked, for display.
    pub fn masked(&self) -> Self {
        let mut masked = self.clone();
        masked.api.api_key = masked.api.api_key.as_deref().map(mask_secret);
        masked.webhook.secret = masked.webhook.secret.as_deref().map(mask_secret);
        masked
    }

    /// Serialize to TOML with secrets masked.
    pub fn to_masked_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(&self.masked())?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────────────────────────────────────

/// Remote session API configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub base_url: String,
    pub api_key: Option<String>,
    pub app_id: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl ApiSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            app_id: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for ApiSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSection")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_deref().map(mask_secret))
            .field("app_id", &self.app_id)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Webhook configuration.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookSection {
    /// Shared secret the API signs webhook deliveries with.
    pub secret: Option<String>,
}

impl std::fmt::Debug for WebhookSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookSection")
            .field("secret", &self.secret.as_deref().map(mask_secret))
            .finish()
    }
}

/// Cache lifetimes in whole seconds. Zero selects the built-in default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    pub session_ttl_secs: u64,
    pub revoked_ttl_secs: u64,
    pub cleanup_interval_secs: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        let defaults = EngineConfig::default();
        Self {
            session_ttl_secs: defaults.session_ttl.as_secs(),
            revoked_ttl_secs: defaults.revoked_ttl.as_secs(),
            cleanup_interval_secs: defaults.cleanup_interval.as_secs(),
        }
    }
}

/// Mask a secret for display, keeping the last four characters of long values.
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 8 {
        return "****".to_string();
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("****{tail}")
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}
