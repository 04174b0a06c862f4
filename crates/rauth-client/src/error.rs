//! Client error types.

use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Server returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// Server returned a success status with a body we could not read.
    #[error("Malformed response ({status}): {message}")]
    Decode { status: u16, message: String },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Check if this is an authentication/authorization error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ClientError::Api { status: 401 | 403, .. })
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, ClientError::Api { status, .. } if *status >= 500)
    }
}

impl From<ClientError> for rauth_session::Error {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) => rauth_session::Error::RemoteUnavailable(e.to_string()),
            ClientError::Api { status, message } | ClientError::Decode { status, message } => {
                rauth_session::Error::RemoteRejected { status, message }
            }
            ClientError::InvalidUrl(e) => {
                rauth_session::Error::invalid_config("base_url", e.to_string())
            }
            ClientError::Config(message) => rauth_session::Error::invalid_config("client", message),
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_maps_to_rejected() {
        let err: rauth_session::Error = ClientError::Api {
            status: 403,
            message: "denied".to_string(),
        }
        .into();

        assert_eq!(
            err,
            rauth_session::Error::RemoteRejected {
                status: 403,
                message: "denied".to_string()
            }
        );
    }

    #[test]
    fn test_classification() {
        let forbidden = ClientError::Api {
            status: 403,
            message: String::new(),
        };
        let unavailable = ClientError::Api {
            status: 503,
            message: String::new(),
        };

        assert!(forbidden.is_auth_error());
        assert!(!forbidden.is_server_error());
        assert!(unavailable.is_server_error());
        assert!(!unavailable.is_auth_error());
    }

    #[test]
    fn test_config_error_maps_to_invalid_config() {
        let err: rauth_session::Error = ClientError::Config("bad key".to_string()).into();
        assert!(matches!(err, rauth_session::Error::InvalidConfig { .. }));
    }
}
