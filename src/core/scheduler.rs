//! Periodic background refresh.

use super::manager::RateSnapshotManager;
use super::snapshot::RefreshOutcome;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Calls [`RateSnapshotManager::refresh`] every `period` while enabled. The
/// timer keeps ticking while disabled so refreshing resumes on re-enable.
pub struct RefreshScheduler {
    enabled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl RefreshScheduler {
    pub fn spawn(manager: Arc<RateSnapshotManager>, period: Duration, enabled: bool) -> Self {
        let enabled = Arc::new(AtomicBool::new(enabled));
        let flag = Arc::clone(&enabled);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !flag.load(Ordering::SeqCst) {
                    debug!("Auto refresh disabled, skipping tick");
                    continue;
                }
                // Runs detached so a slow provider never holds up the timer.
                let manager = Arc::clone(&manager);
                tokio::spawn(async move {
                    match manager.refresh().await {
                        RefreshOutcome::Updated(_) => info!("Scheduled refresh succeeded"),
                        RefreshOutcome::Failed(reason) => {
                            warn!(%reason, "Scheduled refresh failed, using cached rates")
                        }
                    }
                });
            }
        });

        Self { enabled, task }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Stops the timer. A refresh already running is left to finish.
    pub fn shutdown(self) {
        self.task.abort();
    }
}
