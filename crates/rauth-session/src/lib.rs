//! Session verification cache and revocation tracker.
//!
//! This crate sits in front of the Rauth session API and answers
//! "is this session currently valid for this phone number" without
//! calling the remote API on every request:
//! - A session store caches positive verifications for a bounded TTL
//! - A revocation store records revoked tokens, and always wins
//! - Cache misses fall back to a [`RemoteVerifier`]
//! - A cancelable background task sweeps expired records
//!
//! # Example
//!
//! ```rust,ignore
//! use rauth_session::{EngineConfig, SessionEngine};
//!
//! let engine = SessionEngine::builder()
//!     .config(EngineConfig::default())
//!     .verifier(Arc::new(client))
//!     .build()?;
//!
//! let cleanup = engine.spawn_cleanup();
//! let valid = engine.verify_session("token", "+15550100").await?;
//! cleanup.shutdown().await;
//! ```

mod cleanup;
mod config;
mod engine;
mod error;
mod record;
mod store;
mod ttl;
mod verifier;
mod webhook;

pub use cleanup::{CleanupHandle, CleanupReport};
pub use config::{
    DEFAULT_CLEANUP_INTERVAL, DEFAULT_REVOKED_TTL, DEFAULT_SESSION_TTL, EngineConfig,
};
pub use engine::{EngineBuilder, EngineStats, SessionEngine};
pub use error::{Error, Result};
pub use record::{RevocationRecord, SessionRecord};
pub use store::{RevocationStore, SessionStore, StoreStats};
pub use ttl::{Clock, ManualClock, SystemClock, expires_at, is_expired};
pub use verifier::{RemoteVerifier, Verification};
pub use webhook::{EventKind, WebhookEvent, WebhookOutcome};

/// Shorten a session token for log output.
///
/// Tokens are credentials; only a short prefix is ever written to logs.
pub fn redact(token: &str) -> String {
    let prefix: String = token.chars().take(6).collect();
    if prefix.len() < token.len() {
        format!("{prefix}...")
    } else {
        prefix
    }
}
