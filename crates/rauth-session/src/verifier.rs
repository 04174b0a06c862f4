//! Contract for the remote session API.

use async_trait::async_trait;

use crate::error::Result;

/// Answer from the remote API for a session/identity pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// The remote API vouches for the session and identity.
    Verified,

    /// The session is unknown, unverified, or bound to someone else.
    NotVerified,
}

impl From<bool> for Verification {
    fn from(verified: bool) -> Self {
        if verified {
            Verification::Verified
        } else {
            Verification::NotVerified
        }
    }
}

/// Authoritative source of session validity.
///
/// Implementations own their transport, timeouts and response schema.
/// Failures must come back as [`Error::RemoteUnavailable`](crate::Error::RemoteUnavailable)
/// or [`Error::RemoteRejected`](crate::Error::RemoteRejected), never as
/// [`Verification::NotVerified`].
#[async_trait]
pub trait RemoteVerifier: Send + Sync + std::fmt::Debug {
    /// Ask whether `token` is a verified session for `identity`.
    async fn verify(&self, token: &str, identity: &str) -> Result<Verification>;

    /// Check whether the remote API is reachable and healthy.
    async fn health_check(&self) -> Result<bool>;
}
