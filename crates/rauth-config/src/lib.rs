//! Configuration for the Rauth session service.
//!
//! A TOML file supplies API credentials, the webhook secret and cache
//! lifetimes. `RAUTH_*` environment variables override file values.
//!
//! ```no_run
//! use rauth_config::RauthConfig;
//!
//! # fn example() -> rauth_config::Result<()> {
//! let mut config = RauthConfig::load("rauth.toml")?;
//! config.apply_env()?;
//! config.validate()?;
//! let engine_config = config.engine_config();
//! # let _ = engine_config;
//! # Ok(())
//! # }
//! ```

pub mod env;
pub mod error;
pub mod types;

pub use error::{ConfigError, Result};
pub use types::*;
