//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use rauth_session::{RemoteVerifier, Verification, redact};
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::{ClientError, Result};
use crate::types::{SessionStatus, StatusRequest};

/// Production session API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.rauth.io/session";

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const APP_ID_HEADER: HeaderName = HeaderName::from_static("x-app-id");

/// Rauth session API client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct RauthClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl RauthClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build a URL for an API path.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        self.inner.base_url.join(path).map_err(ClientError::from)
    }

    /// Fetch the remote status of a session.
    ///
    /// Returns `Ok(None)` when the API does not know the token.
    pub async fn session_status(&self, token: &str) -> Result<Option<SessionStatus>> {
        let url = self.url("status")?;
        let response = self
            .inner
            .http
            .post(url)
            .json(&StatusRequest {
                session_token: token,
            })
            .timeout(self.inner.timeout)
            .send()
            .await?;

        let status = response.status();
        trace!(token = %redact(token), status = status.as_u16(), "Session status response");

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = response.text().await?;
        if !status.is_success() {
            let err = ClientError::Api {
                status: status.as_u16(),
                message: body,
            };
            if err.is_auth_error() {
                warn!(
                    status = status.as_u16(),
                    "Session API rejected the configured credentials"
                );
            } else if err.is_server_error() {
                warn!(status = status.as_u16(), "Session API server error");
            }
            return Err(err);
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| ClientError::Decode {
                status: status.as_u16(),
                message: e.to_string(),
            })
    }

    /// Check whether `token` is a verified session for `phone`.
    pub async fn verify_session(&self, token: &str, phone: &str) -> Result<bool> {
        let verified = match self.session_status(token).await? {
            Some(status) => status.is_verified() && status.matches_identity(phone),
            None => false,
        };
        debug!(token = %redact(token), verified, "Remote session verification");
        Ok(verified)
    }

    /// Probe `GET /health`.
    ///
    /// Any answer from the server is `Ok`; only transport failures are errors.
    pub async fn health(&self) -> Result<bool> {
        let url = self.url("health")?;
        let response = self
            .inner
            .http
            .get(url)
            .timeout(self.inner.timeout)
            .send()
            .await?;
        Ok(response.status().is_success())
    }
}

impl std::fmt::Debug for RauthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RauthClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

#[async_trait]
impl RemoteVerifier for RauthClient {
    async fn verify(&self, token: &str, identity: &str) -> rauth_session::Result<Verification> {
        Ok(self.verify_session(token, identity).await?.into())
    }

    async fn health_check(&self) -> rauth_session::Result<bool> {
        Ok(self.health().await?)
    }
}

/// Builder for creating a [`RauthClient`].
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: String,
    api_key: Option<String>,
    app_id: Option<String>,
    timeout: Duration,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            app_id: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Override the API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the API key. Required.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the application ID. Required.
    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<RauthClient> {
        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ClientError::Config("api_key is required".to_string()))?;
        let app_id = self
            .app_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ClientError::Config("app_id is required".to_string()))?;

        // Parse and normalize base URL
        let mut base_url = Url::parse(&self.base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| ClientError::Config("Invalid api_key".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let app_id = HeaderValue::from_str(&app_id)
            .map_err(|_| ClientError::Config("Invalid app_id".to_string()))?;
        headers.insert(APP_ID_HEADER, app_id);

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("rauth-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()?;

        Ok(RauthClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout: self.timeout,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
