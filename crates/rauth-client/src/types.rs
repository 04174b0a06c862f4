//! Wire types for the session API.

use serde::{Deserialize, Serialize};

/// Body of `POST /status`.
#[derive(Debug, Serialize)]
pub(crate) struct StatusRequest<'a> {
    pub session_token: &'a str,
}

/// Session details returned by `POST /status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    /// Session state, `"verified"` once the user completed verification.
    #[serde(default)]
    pub status: Option<String>,

    /// Phone number the session was verified with.
    #[serde(default)]
    pub phone: Option<String>,
}

impl SessionStatus {
    pub fn is_verified(&self) -> bool {
        self.status.as_deref() == Some("verified")
    }

    /// A blank identity or a response without a phone matches anything.
    pub fn matches_identity(&self, identity: &str) -> bool {
        if identity.is_empty() {
            return true;
        }
        match &self.phone {
            Some(phone) => phone == identity,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_extra_fields() {
        let status: SessionStatus = serde_json::from_str(
            r#"{"status":"verified","phone":"+15550100","created_at":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        assert!(status.is_verified());
        assert!(status.matches_identity("+15550100"));
        assert!(!status.matches_identity("+15550199"));
    }

    #[test]
    fn test_missing_fields() {
        let status: SessionStatus = serde_json::from_str("{}").unwrap();
        assert!(!status.is_verified());
        assert!(status.matches_identity("+15550100"));
    }

    #[test]
    fn test_pending_is_not_verified() {
        let status = SessionStatus {
            status: Some("pending".to_string()),
            phone: None,
        };
        assert!(!status.is_verified());
    }

    #[test]
    fn test_request_shape() {
        let body = serde_json::to_value(StatusRequest {
            session_token: "tok",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"session_token": "tok"}));
    }
}
