//! HTTP client for the Rauth session API.
//!
//! [`RauthClient`] talks to the remote session endpoints and implements
//! [`rauth_session::RemoteVerifier`], so it can be plugged straight into a
//! [`rauth_session::SessionEngine`].
//!
//! # Example
//!
//! ```no_run
//! use rauth_client::{RauthClient, Result};
//!
//! # async fn example() -> Result<()> {
//! let client = RauthClient::builder()
//!     .api_key("key")
//!     .app_id("app")
//!     .build()?;
//!
//! if client.health().await? {
//!     let verified = client.verify_session("token", "+15550100").await?;
//!     println!("verified: {verified}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod types;

pub use client::{ClientBuilder, DEFAULT_BASE_URL, RauthClient};
pub use error::{ClientError, Result};
pub use types::SessionStatus;
