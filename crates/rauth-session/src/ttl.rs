//! Clock and TTL policy shared by both stores.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;

/// Source of the current instant.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test can hand one clone to the
/// engine and advance time through another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Create a clock frozen at the current wall-clock time.
    pub fn starting_now() -> Self {
        Self::new(Utc::now())
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now = expires_at(*now, by);
    }

    /// Jump to an arbitrary instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock() = instant;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Compute the expiry instant for a record created at `base`.
///
/// Saturates at the maximum representable instant instead of overflowing.
pub fn expires_at(base: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(ttl)
        .ok()
        .and_then(|delta| base.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// A record expiring at `expires_at` is expired from that instant on.
pub fn is_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now >= expires_at
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expires_at_adds_ttl() {
        let base = Utc::now();
        let expiry = expires_at(base, Duration::from_secs(900));
        assert_eq!(expiry - base, TimeDelta::seconds(900));
    }

    #[test]
    fn test_expires_at_saturates() {
        let base = Utc::now();
        let expiry = expires_at(base, Duration::from_secs(u64::MAX));
        assert_eq!(expiry, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let base = Utc::now();
        let expiry = expires_at(base, Duration::from_secs(10));

        assert!(!is_expired(expiry, base));
        assert!(!is_expired(expiry, expiry - TimeDelta::milliseconds(1)));
        assert!(is_expired(expiry, expiry));
        assert!(is_expired(expiry, expiry + TimeDelta::seconds(1)));
    }

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::starting_now();
        let handle = clock.clone();
        let start = clock.now();

        handle.advance(Duration::from_secs(30));

        assert_eq!(clock.now() - start, TimeDelta::seconds(30));
    }

    #[test]
    fn test_manual_clock_set() {
        let clock = ManualClock::starting_now();
        let target = Utc::now() - TimeDelta::hours(2);
        clock.set(target);
        assert_eq!(clock.now(), target);
    }
}
