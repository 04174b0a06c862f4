//! Session cache engine.
//!
//! Coordinates the session store, the revocation store and the remote
//! verifier. The engine owns no record data itself.
//!
//! Per token the engine moves between three states: unknown (no records),
//! cached-valid (a live session record and no revocation) and revoked (a
//! live revocation record, which always takes precedence).

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::cleanup::CleanupReport;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::record::{RevocationRecord, SessionRecord};
use crate::redact;
use crate::store::{RevocationStore, SessionStore, StoreStats};
use crate::ttl::{Clock, SystemClock};
use crate::verifier::{RemoteVerifier, Verification};

struct EngineInner {
    config: EngineConfig,
    sessions: SessionStore,
    revocations: RevocationStore,
    verifier: Arc<dyn RemoteVerifier>,
    clock: Arc<dyn Clock>,
}

/// Session verification cache with revocation tracking.
///
/// Cloning is cheap and every clone shares the same stores, so one engine
/// built at startup can be handed to every call site.
#[derive(Clone)]
pub struct SessionEngine {
    inner: Arc<EngineInner>,
}

impl SessionEngine {
    /// Create a new engine builder.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Get the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    /// Current time according to the engine's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.inner.clock.now()
    }

    /// Verify that `token` is a valid session for `identity`.
    ///
    /// Returns `Ok(true)` for a valid session and `Ok(false)` when the remote
    /// API does not vouch for it. Revoked tokens fail with
    /// [`Error::SessionRevoked`], a cached session bound to another phone
    /// fails with [`Error::IdentityMismatch`], and remote failures are
    /// returned unchanged so callers can tell "not authenticated" apart from
    /// "could not determine".
    ///
    /// Dropping the returned future while the remote call is in flight
    /// leaves the stores untouched.
    pub async fn verify_session(&self, token: &str, identity: &str) -> Result<bool> {
        validate_input(token, identity)?;

        self.ensure_not_revoked(token)?;

        match self.inner.sessions.get(token, self.now()) {
            Ok(record) => {
                if record.identity != identity {
                    warn!(token = %redact(token), "Cached session bound to a different identity");
                    return Err(Error::IdentityMismatch);
                }
                // A revoke may have landed between the two reads.
                self.ensure_not_revoked(token)?;
                trace!(token = %redact(token), "Session cache hit");
                return Ok(true);
            }
            Err(Error::SessionExpired) => {
                debug!(token = %redact(token), "Cached session expired, asking remote API");
            }
            Err(e) if e.is_miss() => {
                trace!(token = %redact(token), "Session cache miss, asking remote API");
            }
            Err(e) => return Err(e),
        }

        let verification = match self.inner.verifier.verify(token, identity).await {
            Ok(verification) => verification,
            Err(e) => {
                warn!(token = %redact(token), error = %e, "Remote session verification failed");
                return Err(e);
            }
        };

        match verification {
            Verification::NotVerified => {
                debug!(token = %redact(token), "Remote API did not verify session");
                Ok(false)
            }
            Verification::Verified => {
                let now = self.now();
                let record =
                    SessionRecord::new(token, identity, now, self.inner.config.session_ttl);
                self.inner.sessions.put(record);

                if self.is_revoked(token) {
                    self.inner.sessions.delete(token);
                    debug!(token = %redact(token), "Session revoked during remote verification");
                    return Err(Error::SessionRevoked);
                }

                debug!(
                    token = %redact(token),
                    ttl_secs = self.inner.config.session_ttl.as_secs(),
                    "Session verified remotely and cached"
                );
                Ok(true)
            }
        }
    }

    /// [`verify_session`](Self::verify_session) bounded by a deadline.
    ///
    /// Running out of time is reported as [`Error::RemoteUnavailable`], never
    /// as an invalid session.
    pub async fn verify_session_with_timeout(
        &self,
        token: &str,
        identity: &str,
        timeout: Duration,
    ) -> Result<bool> {
        match tokio::time::timeout(timeout, self.verify_session(token, identity)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(token = %redact(token), ?timeout, "Session verification timed out");
                Err(Error::RemoteUnavailable(format!(
                    "verification timed out after {}ms",
                    timeout.as_millis()
                )))
            }
        }
    }

    /// Check for a live revocation. Never contacts the remote API.
    pub fn is_revoked(&self, token: &str) -> bool {
        self.inner.revocations.get(token, self.now()).is_ok()
    }

    /// Revoke a session token.
    ///
    /// Drops any cached session and records a revocation for the configured
    /// window. Revoking again refreshes the window.
    pub fn revoke(&self, token: &str) {
        let dropped = self.inner.sessions.delete(token).is_some();
        let now = self.now();
        let refreshed = self.inner.revocations.put(RevocationRecord::new(
            token,
            now,
            self.inner.config.revoked_ttl,
        ));

        info!(
            token = %redact(token),
            dropped_session = dropped,
            refreshed,
            "Session revoked"
        );
    }

    /// Sweep expired records from both stores.
    ///
    /// Each sweep takes only its own store's lock and both always run.
    pub fn cleanup(&self, now: DateTime<Utc>) -> CleanupReport {
        let sessions_removed = self.inner.sessions.sweep(now);
        let revocations_removed = self.inner.revocations.sweep(now);

        CleanupReport {
            sessions_removed,
            revocations_removed,
        }
    }

    /// Probe the remote API.
    pub async fn check_health(&self) -> Result<bool> {
        self.inner.verifier.health_check().await
    }

    /// Look up the cached session for a token, if still live.
    pub fn session(&self, token: &str) -> Option<SessionRecord> {
        self.inner.sessions.get(token, self.now()).ok()
    }

    /// Look up the revocation for a token, if still live.
    pub fn revocation(&self, token: &str) -> Option<RevocationRecord> {
        self.inner.revocations.get(token, self.now()).ok()
    }

    /// Snapshot of configuration and store sizes.
    pub fn stats(&self) -> EngineStats {
        let now = self.now();
        EngineStats {
            session_ttl_secs: self.inner.config.session_ttl.as_secs(),
            revoked_ttl_secs: self.inner.config.revoked_ttl.as_secs(),
            cleanup_interval_secs: self.inner.config.cleanup_interval.as_secs(),
            sessions: self.inner.sessions.stats(now),
            revocations: self.inner.revocations.stats(now),
        }
    }

    fn ensure_not_revoked(&self, token: &str) -> Result<()> {
        if self.is_revoked(token) {
            debug!(token = %redact(token), "Rejecting revoked session");
            return Err(Error::SessionRevoked);
        }
        Ok(())
    }
}

impl std::fmt::Debug for SessionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEngine")
            .field("config", &self.inner.config)
            .field("sessions", &self.inner.sessions.len())
            .field("revocations", &self.inner.revocations.len())
            .field("verifier", &self.inner.verifier)
            .finish()
    }
}

fn validate_input(token: &str, identity: &str) -> Result<()> {
    if token.trim().is_empty() {
        return Err(Error::InvalidInput("session token is empty".to_string()));
    }
    if identity.trim().is_empty() {
        return Err(Error::InvalidInput("identity is empty".to_string()));
    }
    Ok(())
}

/// Engine statistics.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub session_ttl_secs: u64,
    pub revoked_ttl_secs: u64,
    pub cleanup_interval_secs: u64,
    pub sessions: StoreStats,
    pub revocations: StoreStats,
}

/// Builder for [`SessionEngine`].
#[derive(Debug, Default)]
pub struct EngineBuilder {
    config: EngineConfig,
    verifier: Option<Arc<dyn RemoteVerifier>>,
    clock: Option<Arc<dyn Clock>>,
}

impl EngineBuilder {
    /// Create a builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the engine configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the remote verifier. Required.
    pub fn verifier(mut self, verifier: Arc<dyn RemoteVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Set the clock. Defaults to [`SystemClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the engine.
    pub fn build(self) -> Result<SessionEngine> {
        self.config.validate()?;
        let verifier = self
            .verifier
            .ok_or_else(|| Error::NotInitialized("no remote verifier configured".to_string()))?;
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        debug!(
            session_ttl_secs = self.config.session_ttl.as_secs(),
            revoked_ttl_secs = self.config.revoked_ttl.as_secs(),
            "Session engine created"
        );

        Ok(SessionEngine {
            inner: Arc::new(EngineInner {
                config: self.config,
                sessions: SessionStore::new(),
                revocations: RevocationStore::new(),
                verifier,
                clock,
            }),
        })
    }
}
