//! In-memory stores with lazy expiry on read.
//!
//! Each store owns its map behind its own lock. The two stores never share
//! a lock and nothing in this crate holds both at once.

mod revocation;
mod session;

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::trace;

use crate::error::{Error, Result};
use crate::record::{RevocationRecord, SessionRecord};
use crate::{redact, ttl};

pub use revocation::RevocationStore;
pub use session::SessionStore;

/// A record keyed by token that stops being valid at a fixed instant.
pub(crate) trait Expiring: Clone + fmt::Debug {
    fn token(&self) -> &str;
    fn expires_at(&self) -> DateTime<Utc>;
}

impl Expiring for SessionRecord {
    fn token(&self) -> &str {
        &self.token
    }

    fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

impl Expiring for RevocationRecord {
    fn token(&self) -> &str {
        &self.token
    }

    fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

/// Counts reported by a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Records currently held, expired or not.
    pub total: usize,

    /// Records still valid.
    pub active: usize,

    /// Records past expiry that have not been swept yet.
    pub expired: usize,
}

/// Token-keyed map shared by both stores.
pub(crate) struct ExpiringMap<R> {
    name: &'static str,
    entries: RwLock<HashMap<String, R>>,
}

impl<R: Expiring> ExpiringMap<R> {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Upsert by token, returning the replaced record.
    pub(crate) fn put(&self, record: R) -> Option<R> {
        let token = record.token().to_string();
        let mut entries = self.entries.write();
        let replaced = entries.insert(token, record);
        trace!(
            store = self.name,
            replaced = replaced.is_some(),
            size = entries.len(),
            "Record stored"
        );
        replaced
    }

    /// Look up a record, evicting it if it has expired.
    ///
    /// Fresh hits are served under the shared lock. An expired hit is
    /// re-examined under the exclusive lock and removed only if it is still
    /// expired there, so a record refreshed in between is returned instead.
    pub(crate) fn get(&self, token: &str, now: DateTime<Utc>) -> Result<R> {
        {
            let entries = self.entries.read();
            match entries.get(token) {
                None => return Err(Error::SessionNotFound),
                Some(record) if !ttl::is_expired(record.expires_at(), now) => {
                    return Ok(record.clone());
                }
                Some(_) => {}
            }
        }

        self.evict_if_expired(token, now)
    }

    /// Write-locked half of [`get`](Self::get): re-examine the record and
    /// remove it only if it is still expired.
    fn evict_if_expired(&self, token: &str, now: DateTime<Utc>) -> Result<R> {
        let mut entries = self.entries.write();
        match entries.get(token) {
            Some(record) if !ttl::is_expired(record.expires_at(), now) => Ok(record.clone()),
            Some(_) => {
                entries.remove(token);
                trace!(
                    store = self.name,
                    token = %redact(token),
                    "Expired record evicted on read"
                );
                Err(Error::SessionExpired)
            }
            None => Err(Error::SessionExpired),
        }
    }

    pub(crate) fn remove(&self, token: &str) -> Option<R> {
        self.entries.write().remove(token)
    }

    /// Remove every record expired at `now`.
    pub(crate) fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, record| !ttl::is_expired(record.expires_at(), now));
        before - entries.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub(crate) fn stats(&self, now: DateTime<Utc>) -> StoreStats {
        let entries = self.entries.read();
        let expired = entries
            .values()
            .filter(|record| ttl::is_expired(record.expires_at(), now))
            .count();
        StoreStats {
            total: entries.len(),
            active: entries.len() - expired,
            expired,
        }
    }
}

impl<R> fmt::Debug for ExpiringMap<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpiringMap")
            .field("name", &self.name)
            .field("size", &self.entries.read().len())
            .finish()
    }
}
