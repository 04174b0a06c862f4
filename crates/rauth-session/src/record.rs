//! Session and revocation records.
//!
//! Records are never patched in place; a newer record for the same token
//! replaces the old one wholesale.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ttl;

/// Shortest TTL a record can carry, so that `expires_at > created_at`.
const MIN_TTL: Duration = Duration::from_secs(1);

/// A cached, positively verified session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Opaque session token.
    pub token: String,

    /// Phone number the session is bound to.
    pub identity: String,

    /// When the record was written.
    pub created_at: DateTime<Utc>,

    /// When the record stops being trusted.
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Create a record created at `now` that lives for `ttl`.
    pub fn new(
        token: impl Into<String>,
        identity: impl Into<String>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            token: token.into(),
            identity: identity.into(),
            created_at: now,
            expires_at: ttl::expires_at(now, ttl.max(MIN_TTL)),
        }
    }

    /// Check if the record is expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        ttl::is_expired(self.expires_at, now)
    }
}

/// Proof that a token has been revoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationRecord {
    /// Opaque session token.
    pub token: String,

    /// When the revocation was recorded.
    pub revoked_at: DateTime<Utc>,

    /// When the revocation is forgotten and the token reverts to unknown.
    pub expires_at: DateTime<Utc>,
}

impl RevocationRecord {
    /// Create a revocation recorded at `now` that is retained for `ttl`.
    pub fn new(token: impl Into<String>, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            token: token.into(),
            revoked_at: now,
            expires_at: ttl::expires_at(now, ttl.max(MIN_TTL)),
        }
    }

    /// Check if the revocation window has closed at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        ttl::is_expired(self.expires_at, now)
    }
}
