//! CLI command handlers.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use rauth_client::RauthClient;
use rauth_config::RauthConfig;
use rauth_session::SessionEngine;

pub mod config;
pub mod health;
pub mod verify;
pub mod webhook;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Resolved configuration (file, then environment).
    pub config: RauthConfig,
    /// Where the config came from, if a file was used.
    pub config_path: Option<PathBuf>,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load(config_path: Option<PathBuf>, json_output: bool, verbose: bool) -> Result<Self> {
        let mut config = match &config_path {
            Some(path) => RauthConfig::load(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => RauthConfig::default(),
        };
        config
            .apply_env()
            .context("applying environment overrides")?;

        Ok(Self {
            config,
            config_path,
            json_output,
            verbose,
        })
    }

    /// HTTP client for the session API. Needs only the API credentials.
    pub fn client(&self) -> Result<RauthClient> {
        let api = &self.config.api;
        let client = RauthClient::builder()
            .base_url(&api.base_url)
            .api_key(api.api_key.clone().unwrap_or_default())
            .app_id(api.app_id.clone().unwrap_or_default())
            .timeout(api.timeout())
            .build()
            .context("building session API client")?;
        Ok(client)
    }

    /// Session engine backed by the HTTP client. Requires a fully valid config.
    pub fn engine(&self) -> Result<SessionEngine> {
        self.config.validate().context("invalid configuration")?;
        let engine = SessionEngine::builder()
            .config(self.config.engine_config())
            .verifier(Arc::new(self.client()?))
            .build()?;
        Ok(engine)
    }
}
