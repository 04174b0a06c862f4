//! Active session store.

use chrono::{DateTime, Utc};

use super::{ExpiringMap, StoreStats};
use crate::error::Result;
use crate::record::SessionRecord;

/// Mapping from session token to the session it was verified for.
#[derive(Debug)]
pub struct SessionStore {
    inner: ExpiringMap<SessionRecord>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: ExpiringMap::new("sessions"),
        }
    }

    /// Insert or replace the record for its token.
    pub fn put(&self, record: SessionRecord) {
        self.inner.put(record);
    }

    /// Look up a session.
    ///
    /// Returns [`Error::SessionNotFound`](crate::Error::SessionNotFound) for an
    /// unknown token and [`Error::SessionExpired`](crate::Error::SessionExpired)
    /// for one past its expiry, which is removed as a side effect.
    pub fn get(&self, token: &str, now: DateTime<Utc>) -> Result<SessionRecord> {
        self.inner.get(token, now)
    }

    /// Remove a session. Absent tokens are ignored.
    pub fn delete(&self, token: &str) -> Option<SessionRecord> {
        self.inner.remove(token)
    }

    /// Remove all sessions expired at `now` and return how many were removed.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        self.inner.sweep(now)
    }

    /// Number of records held, including unswept expired ones.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Active/expired counts at `now`.
    pub fn stats(&self, now: DateTime<Utc>) -> StoreStats {
        self.inner.stats(now)
    }
}

impl Default for SessionStore {
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

    fn record(token: &str, now: DateTime<Utc>, ttl_secs: u64) -> SessionRecord {
        SessionRecord::new(token, "+15550100", now, Duration::from_secs(ttl_secs))
    }

    #[test]
    fn test_put_and_get() {
        let store = SessionStore::new();
        let now = Utc::now();
        store.put(record("tok-1", now, 60));

        let found = store.get("tok-1", now).unwrap();
        assert_eq!(found.identity, "+15550100");
    }

    #[test]
    fn test_get_unknown_is_not_found() {
        let store = SessionStore::new();
        assert_eq!(store.get("missing", Utc::now()), Err(Error::SessionNotFound));
    }

    #[test]
    fn test_expired_record_evicted_on_read() {
        let store = SessionStore::new();
        let now = Utc::now();
        store.put(SessionRecord {
            token: "tok-1".to_string(),
            identity: "+15550100".to_string(),
            created_at: now - TimeDelta::seconds(60),
            expires_at: now - TimeDelta::seconds(1),
        });

        assert_eq!(store.get("tok-1", now), Err(Error::SessionExpired));
        assert!(store.is_empty());
        assert_eq!(store.get("tok-1", now), Err(Error::SessionNotFound));
    }

    #[test]
    fn test_put_replaces() {
        let store = SessionStore::new();
        let now = Utc::now();
        store.put(record("tok-1", now, 60));
        store.put(SessionRecord::new(
            "tok-1",
            "+15550199",
            now,
            Duration::from_secs(60),
        ));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("tok-1", now).unwrap().identity, "+15550199");
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = SessionStore::new();
        let now = Utc::now();
        store.put(record("tok-1", now, 60));

        assert!(store.delete("tok-1").is_some());
        assert!(store.delete("tok-1").is_none());
        assert!(store.delete("never-existed").is_none());
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let store = SessionStore::new();
        let now = Utc::now();
        store.put(record("short", now, 10));
        store.put(record("exact", now, 20));
        store.put(record("long", now, 120));

        let removed = store.sweep(now + TimeDelta::seconds(20));

        assert_eq!(removed, 2);
        assert_eq!(store.len(), 1);
        assert!(store.get("long", now).is_ok());
    }

    #[test]
    fn test_stats() {
        let store = SessionStore::new();
        let now = Utc::now();
        store.put(record("a", now, 10));
        store.put(record("b", now, 100));

        let stats = store.stats(now + TimeDelta::seconds(30));
        assert_eq!(
            stats,
            StoreStats {
                total: 2,
                active: 1,
                expired: 1
            }
        );
    }

    #[test]
    fn test_concurrent_reads_and_writes() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(SessionStore::new());
        let now = Utc::now();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for j in 0..100 {
                        let token = format!("tok-{}", (i * 100 + j) % 50);
                        store.put(record(&token, now, 60));
                        let _ = store.get(&token, now);
                        if j % 10 == 0 {
                            store.delete(&token);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(store.len() <= 50);
    }
}
