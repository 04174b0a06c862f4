//! Revoked token store.

use chrono::{DateTime, Utc};

use super::{ExpiringMap, StoreStats};
use crate::error::Result;
use crate::record::RevocationRecord;

/// Mapping from session token to its revocation.
///
/// There is no delete: a revocation may outlive the session that triggered
/// it and is only dropped once its retention window closes.
#[derive(Debug)]
pub struct RevocationStore {
    inner: ExpiringMap<RevocationRecord>,
}

impl RevocationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: ExpiringMap::new("revocations"),
        }
    }

    /// Insert or refresh a revocation. Returns `true` if one was replaced.
    pub fn put(&self, record: RevocationRecord) -> bool {
        self.inner.put(record).is_some()
    }

    /// Look up a revocation, dropping it if its window has closed.
    pub fn get(&self, token: &str, now: DateTime<Utc>) -> Result<RevocationRecord> {
        self.inner.get(token, now)
    }

    /// Remove all revocations expired at `now` and return how many were removed.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        self.inner.sweep(now)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self, now: DateTime<Utc>) -> StoreStats {
        self.inner.stats(now)
    }
}

impl Default for RevocationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use chrono::TimeDelta;
    use std::time::Duration;

    #[test]
    fn test_put_and_get() {
        let store = RevocationStore::new();
        let now = Utc::now();

        assert!(!store.put(RevocationRecord::new("tok", now, Duration::from_secs(60))));
        assert_eq!(store.get("tok", now).unwrap().revoked_at, now);
    }

    #[test]
    fn test_refresh_replaces_single_record() {
        let store = RevocationStore::new();
        let first = Utc::now();
        let second = first + TimeDelta::seconds(30);

        store.put(RevocationRecord::new("tok", first, Duration::from_secs(60)));
        assert!(store.put(RevocationRecord::new("tok", second, Duration::from_secs(60))));

        assert_eq!(store.len(), 1);
        let record = store.get("tok", second).unwrap();
        assert_eq!(record.expires_at, second + TimeDelta::seconds(60));
    }

    #[test]
    fn test_expired_revocation_reverts_to_unknown() {
        let store = RevocationStore::new();
        let now = Utc::now();
        store.put(RevocationRecord::new("tok", now, Duration::from_secs(60)));

        let later = now + TimeDelta::seconds(61);
        assert_eq!(store.get("tok", later), Err(Error::SessionExpired));
        assert_eq!(store.get("tok", later), Err(Error::SessionNotFound));
    }

    #[test]
    fn test_sweep() {
        let store = RevocationStore::new();
        let now = Utc::now();
        store.put(RevocationRecord::new("a", now, Duration::from_secs(10)));
        store.put(RevocationRecord::new("b", now, Duration::from_secs(100)));

        assert_eq!(store.sweep(now + TimeDelta::seconds(50)), 1);
        assert_eq!(store.stats(now).active, 1);
    }
}
