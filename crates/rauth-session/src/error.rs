//! Error types for session verification.

/// Error type for session cache and verification operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The engine was used before it was fully configured.
    #[error("Session engine not initialized: {0}")]
    NotInitialized(String),

    /// A non-expired revocation exists for the token.
    #[error("Session revoked")]
    SessionRevoked,

    /// The cached record exists but is past its expiry.
    #[error("Session expired")]
    SessionExpired,

    /// No record exists for the token.
    #[error("Session not found")]
    SessionNotFound,

    /// The cached session is bound to a different identity.
    #[error("Session identity mismatch")]
    IdentityMismatch,

    /// Network or transport failure talking to the remote API.
    #[error("Remote API unavailable: {0}")]
    RemoteUnavailable(String),

    /// The remote API answered with a non-success status.
    #[error("Remote API rejected request ({status}): {message}")]
    RemoteRejected {
        /// HTTP status code.
        status: u16,
        /// Response body or error message.
        message: String,
    },

    /// A configuration value is missing or out of range.
    #[error("Invalid configuration in '{field}': {message}")]
    InvalidConfig { field: String, message: String },

    /// Caller-supplied input is unusable (empty token, malformed payload).
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Check if this error means "could not determine" because the remote API failed.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::RemoteUnavailable(_) | Error::RemoteRejected { .. }
        )
    }

    /// Check if this error means the session is definitely not authenticated.
    pub fn is_definitely_invalid(&self) -> bool {
        matches!(
            self,
            Error::SessionRevoked
                | Error::SessionExpired
                | Error::SessionNotFound
                | Error::IdentityMismatch
        )
    }

    /// Check if this is a cache miss (not found or expired).
    pub(crate) fn is_miss(&self) -> bool {
        matches!(self, Error::SessionNotFound | Error::SessionExpired)
    }
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, Error>;
