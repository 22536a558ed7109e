//! Service wiring

use crate::state::{AppState, ModerationState};
use guestbook_core::Config;
use guestbook_db::ContentRepository;
use guestbook_services::{
    ApprovalTokenCodec, CleanupScheduler, RejectedContentReaper, Storage, StorageUsageService,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Build the shared application state from config and the two backends.
pub fn initialize_services(
    config: &Config,
    repository: Arc<dyn ContentRepository>,
    storage: Arc<dyn Storage>,
) -> Arc<AppState> {
    let retention = config.retention();

    let moderation = ModerationState {
        approval_tokens: ApprovalTokenCodec::new(config.approval_token().clone()),
        reaper: RejectedContentReaper::new(repository.clone(), storage.clone()),
        default_retention_days: retention.rejected_retention_days,
        public_base_url: config.public_base_url().to_string(),
    };

    Arc::new(AppState {
        storage_usage: StorageUsageService::new(storage.clone(), config.storage_quota_bytes()),
        repository,
        storage,
        moderation,
    })
}

/// Start the cleanup scheduler unless disabled (`CLEANUP_INTERVAL_SECS=0`).
pub fn start_background_tasks(config: &Config, state: &AppState) -> Vec<JoinHandle<()>> {
    let retention = config.retention();
    if retention.cleanup_interval_secs == 0 {
        tracing::info!("Scheduled cleanup disabled");
        return Vec::new();
    }

    let scheduler = Arc::new(CleanupScheduler::new(
        state.moderation.reaper.clone(),
        retention.rejected_retention_days,
        Duration::from_secs(retention.cleanup_interval_secs),
    ));
    tracing::info!(
        interval_secs = retention.cleanup_interval_secs,
        retention_days = retention.rejected_retention_days,
        "Scheduled cleanup enabled"
    );

    vec![scheduler.start()]
}
