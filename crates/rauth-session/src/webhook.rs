//! Webhook events delivered by the Rauth API.
//!
//! The transport layer authenticates the delivery and hands over the body;
//! this module decodes it and applies it to the engine. Only
//! `session_revoked` changes cache state.
//!
//! Two payload vocabularies are accepted:
//!
//! ```json
//! {"type": "session_revoked", "session_token": "...", "user_phone": "...", "timestamp": 1700000000}
//! {"event": "session_revoked", "session_token": "..."}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::SessionEngine;
use crate::error::{Error, Result};
use crate::redact;

/// Kind of webhook event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    SessionRevoked,
    SessionVerified,
    SessionCreated,
    /// Anything this crate does not know about.
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::SessionRevoked => "session_revoked",
            EventKind::SessionVerified => "session_verified",
            EventKind::SessionCreated => "session_created",
            EventKind::Other(kind) => kind,
        }
    }
}

impl From<String> for EventKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "session_revoked" => EventKind::SessionRevoked,
            "session_verified" => EventKind::SessionVerified,
            "session_created" => EventKind::SessionCreated,
            _ => EventKind::Other(kind),
        }
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded webhook delivery.
///
/// When a body carries both `type` and `event`, `type` wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWebhookEvent")]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,

    #[serde(default)]
    pub session_token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_phone: Option<String>,

    /// Unix seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// Wire shape accepting either event field name.
#[derive(Deserialize)]
struct RawWebhookEvent {
    #[serde(rename = "type", default)]
    kind: Option<EventKind>,
    #[serde(default)]
    event: Option<EventKind>,
    #[serde(default)]
    session_token: String,
    #[serde(default)]
    user_phone: Option<String>,
    #[serde(default)]
    timestamp: Option<i64>,
}

impl TryFrom<RawWebhookEvent> for WebhookEvent {
    type Error = String;

    fn try_from(raw: RawWebhookEvent) -> std::result::Result<Self, Self::Error> {
        let kind = raw
            .kind
            .or(raw.event)
            .ok_or_else(|| "missing field `type` or `event`".to_string())?;
        Ok(Self {
            kind,
            session_token: raw.session_token,
            user_phone: raw.user_phone,
            timestamp: raw.timestamp,
        })
    }
}

impl WebhookEvent {
    /// Create an event of the given kind for a token.
    pub fn new(kind: EventKind, session_token: impl Into<String>) -> Self {
        Self {
            kind,
            session_token: session_token.into(),
            user_phone: None,
            timestamp: None,
        }
    }

    /// Shorthand for a `session_revoked` event.
    pub fn revoked(session_token: impl Into<String>) -> Self {
        Self::new(EventKind::SessionRevoked, session_token)
    }

    /// Decode an already-authenticated request body.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body)
            .map_err(|e| Error::InvalidInput(format!("malformed webhook payload: {e}")))
    }
}

/// What the engine did with a webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// The token was revoked.
    Revoked,

    /// A known event that needs no cache change.
    Ignored(EventKind),

    /// An event kind this crate does not handle.
    Unrecognized(String),
}

impl SessionEngine {
    /// Apply a webhook event.
    ///
    /// Unrecognized kinds are logged and reported through the outcome; they
    /// are not errors.
    pub fn handle_webhook(&self, event: &WebhookEvent) -> Result<WebhookOutcome> {
        match &event.kind {
            EventKind::SessionRevoked => {
                if event.session_token.trim().is_empty() {
                    return Err(Error::InvalidInput(
                        "session_revoked event without a session token".to_string(),
                    ));
                }
                self.revoke(&event.session_token);
                Ok(WebhookOutcome::Revoked)
            }
            kind @ (EventKind::SessionVerified | EventKind::SessionCreated) => {
                debug!(
                    kind = %kind,
                    token = %redact(&event.session_token),
                    "Webhook event needs no cache change"
                );
                Ok(WebhookOutcome::Ignored(kind.clone()))
            }
            EventKind::Other(kind) => {
                warn!(kind = %kind, "Unrecognized webhook event");
                Ok(WebhookOutcome::Unrecognized(kind.clone()))
            }
        }
    }
}
