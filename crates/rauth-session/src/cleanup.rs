//! Background sweeping of expired records.
//!
//! Lazy expiry on read already keeps stale records from being served; this
//! task only bounds memory.

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::engine::SessionEngine;

/// Records removed by one cleanup pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub sessions_removed: usize,
    pub revocations_removed: usize,
}

impl CleanupReport {
    /// Total records removed.
    pub fn total(&self) -> usize {
        self.sessions_removed + self.revocations_removed
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Handle to a running cleanup task.
///
/// Dropping the handle stops the task; [`shutdown`](Self::shutdown) also
/// waits for it to finish.
#[derive(Debug)]
pub struct CleanupHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl CleanupHandle {
    /// Check if the task is still running.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the task and wait for it to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "Cleanup task ended abnormally");
            }
        }
        debug!("Cleanup task shut down");
    }
}

impl Drop for CleanupHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl SessionEngine {
    /// Spawn the periodic cleanup task on the current tokio runtime.
    ///
    /// The first sweep runs one full interval after spawning.
    pub fn spawn_cleanup(&self) -> CleanupHandle {
        let engine = self.clone();
        let period = self.config().cleanup_interval;
        let cancel = CancellationToken::new();
        let stop = cancel.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = stop.cancelled() => break,
                    _ = ticker.tick() => {
                        let report = engine.cleanup(engine.now());
                        if !report.is_empty() {
                            debug!(
                                sessions = report.sessions_removed,
                                revocations = report.revocations_removed,
                                "Cleaned up expired records"
                            );
                        }
                    }
                }
            }
        });

        debug!(interval_secs = period.as_secs(), "Cleanup task started");

        CleanupHandle {
            cancel,
            task: Some(task),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::ttl::ManualClock;
    use crate::verifier::{RemoteVerifier, Verification};
    use crate::EngineConfig;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Debug)]
    struct AlwaysVerified;

    #[async_trait]
    impl RemoteVerifier for AlwaysVerified {
        async fn verify(&self, _token: &str, _identity: &str) -> Result<Verification> {
            Ok(Verification::Verified)
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }
    }

    fn engine(clock: &ManualClock) -> SessionEngine {
        SessionEngine::builder()
            .config(
                EngineConfig::new()
                    .with_session_ttl(Duration::from_secs(60))
                    .with_revoked_ttl(Duration::from_secs(120))
                    .with_cleanup_interval(Duration::from_secs(10)),
            )
            .verifier(Arc::new(AlwaysVerified))
            .clock(Arc::new(clock.clone()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_report_totals() {
        let report = CleanupReport {
            sessions_removed: 2,
            revocations_removed: 3,
        };
        assert_eq!(report.total(), 5);
        assert!(!report.is_empty());
        assert!(CleanupReport::default().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_sweeps_on_interval() {
        let clock = ManualClock::starting_now();
        let engine = engine(&clock);

        engine.verify_session("tok-1", "+15550100").await.unwrap();
        engine.revoke("tok-2");
        clock.advance(Duration::from_secs(300));

        let handle = engine.spawn_cleanup();
        assert_eq!(engine.stats().sessions.total, 1);

        tokio::time::sleep(Duration::from_secs(11)).await;
        tokio::task::yield_now().await;

        let stats = engine.stats();
        assert_eq!(stats.sessions.total, 0);
        assert_eq!(stats.revocations.total, 0);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_task() {
        let clock = ManualClock::starting_now();
        let engine = engine(&clock);

        let handle = engine.spawn_cleanup();
        assert!(handle.is_running());

        handle.shutdown().await;

        // Records written after shutdown are never swept by the stopped task.
        engine.revoke("tok");
        clock.advance(Duration::from_secs(300));
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(engine.stats().revocations.total, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_task() {
        let clock = ManualClock::starting_now();
        let engine = engine(&clock);

        let handle = engine.spawn_cleanup();
        let cancel = handle.cancel.clone();
        drop(handle);

        assert!(cancel.is_cancelled());
    }
}
