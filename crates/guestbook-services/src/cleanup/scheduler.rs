use super::RejectedContentReaper;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

/// Runs the reaper on a fixed interval.
#[derive(Clone)]
pub struct CleanupScheduler {
    reaper: RejectedContentReaper,
    retention_days: u32,
    period: Duration,
}

impl CleanupScheduler {
    pub fn new(reaper: RejectedContentReaper, retention_days: u32, period: Duration) -> Self {
        Self {
            reaper,
            retention_days,
            period,
        }
    }

    /// Start the background cleanup task. The first run happens immediately.
    /// Returns a JoinHandle for graceful shutdown
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            // tokio panics on a zero period
            let mut cleanup_interval = interval(self.period.max(Duration::from_secs(1)));
            cleanup_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                cleanup_interval.tick().await;
                self.run_once().await;
            }
        })
    }

    #[tracing::instrument(skip(self), fields(retention_days = self.retention_days))]
    async fn run_once(&self) {
        tracing::info!("Starting scheduled cleanup of rejected content");

        let report = self.reaper.cleanup(self.retention_days).await;
        if report.errors.is_empty() {
            tracing::info!(
                cleaned_count = report.cleaned_count,
                "Cleanup task completed successfully"
            );
        } else {
            tracing::warn!(
                cleaned_count = report.cleaned_count,
                errors = ?report.errors,
                "Cleanup task completed with errors"
            );
        }
    }
}
