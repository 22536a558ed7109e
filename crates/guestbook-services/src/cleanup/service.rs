use chrono::{DateTime, Duration, Utc};
use guestbook_core::models::{CleanupReport, ContentStatus, RejectedStats};
use guestbook_db::ContentRepository;
use guestbook_storage::{storage_key_from_url, Storage};
use std::sync::Arc;
use uuid::Uuid;

/// Retention window applied when the caller does not pick one.
pub const DEFAULT_RETENTION_DAYS: u32 = 7;

/// Permanently removes rejected submissions older than a retention window,
/// together with their uploaded blobs.
///
/// Blob deletion is best-effort: each failure is recorded in the report and
/// the run continues. Rows are removed in one batch afterwards. A failed batch
/// delete does not restore blobs already removed.
#[derive(Clone)]
pub struct RejectedContentReaper {
    repository: Arc<dyn ContentRepository>,
    storage: Arc<dyn Storage>,
}

impl RejectedContentReaper {
    pub fn new(repository: Arc<dyn ContentRepository>, storage: Arc<dyn Storage>) -> Self {
        Self {
            repository,
            storage,
        }
    }

    /// Remove rejected content created more than `retention_days` ago.
    pub async fn cleanup(&self, retention_days: u32) -> CleanupReport {
        self.cleanup_at(retention_days, Utc::now()).await
    }

    #[tracing::instrument(skip(self), fields(cleanup.operation = "rejected_content"))]
    pub(crate) async fn cleanup_at(
        &self,
        retention_days: u32,
        now: DateTime<Utc>,
    ) -> CleanupReport {
        let cutoff = cutoff(now, retention_days);

        let expired = match self
            .repository
            .find_by_status_older_than(ContentStatus::Rejected, cutoff)
            .await
        {
            Ok(expired) => expired,
            Err(e) => {
                tracing::error!(error = %e, cutoff = %cutoff, "Failed to query rejected content");
                return CleanupReport::aborted(format!("Failed to query rejected content: {}", e));
            }
        };

        if expired.is_empty() {
            tracing::debug!(cutoff = %cutoff, "No rejected content past retention");
            return CleanupReport::default();
        }

        let mut errors = Vec::new();

        for content in &expired {
            let Some(media_url) = content.media_url.as_deref() else {
                continue;
            };

            let Some(storage_key) = storage_key_from_url(media_url) else {
                tracing::warn!(
                    content_id = %content.id,
                    media_url = %media_url,
                    "Could not derive storage key from media URL"
                );
                errors.push(format!(
                    "Could not derive storage key for content {} from {}",
                    content.id, media_url
                ));
                continue;
            };

            tracing::info!(
                content_id = %content.id,
                storage_key = %storage_key,
                "Deleting rejected media"
            );

            match self.storage.delete(&storage_key).await {
                Ok(()) => {
                    tracing::debug!(storage_key = %storage_key, "Successfully deleted from storage");
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        content_id = %content.id,
                        storage_key = %storage_key,
                        "Failed to delete file from storage, continuing with database deletion"
                    );
                    errors.push(format!(
                        "Failed to delete {} for content {}: {}",
                        storage_key, content.id, e
                    ));
                }
            }
        }

        let ids: Vec<Uuid> = expired.iter().map(|content| content.id).collect();
        match self.repository.delete_by_ids(&ids).await {
            Ok(deleted) => {
                tracing::info!(
                    matched = ids.len(),
                    deleted,
                    blob_errors = errors.len(),
                    "Rejected content cleanup completed"
                );
                CleanupReport {
                    cleaned_count: ids.len() as u64,
                    errors,
                }
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    matched = ids.len(),
                    "Failed to delete rejected content records"
                );
                errors.push(format!("Failed to delete rejected content records: {}", e));
                CleanupReport {
                    cleaned_count: 0,
                    errors,
                }
            }
        }
    }

    /// Rejected totals, overall and older than `retention_days`. `None` if
    /// either count fails.
    pub async fn stats(&self, retention_days: u32) -> Option<RejectedStats> {
        self.stats_at(retention_days, Utc::now()).await
    }

    #[tracing::instrument(skip(self), fields(cleanup.operation = "rejected_stats"))]
    pub(crate) async fn stats_at(
        &self,
        retention_days: u32,
        now: DateTime<Utc>,
    ) -> Option<RejectedStats> {
        let cutoff = cutoff(now, retention_days);

        let total_rejected = match self.repository.count_by_status(ContentStatus::Rejected).await {
            Ok(count) => count,
            Err(e) => {
                tracing::error!(error = %e, "Failed to count rejected content");
                return None;
            }
        };
        let old_rejected = match self
            .repository
            .count_by_status_older_than(ContentStatus::Rejected, cutoff)
            .await
        {
            Ok(count) => count,
            Err(e) => {
                tracing::error!(error = %e, "Failed to count old rejected content");
                return None;
            }
        };

        Some(RejectedStats {
            total_rejected,
            old_rejected,
        })
    }
}

/// `now - retention_days`, clamped to the earliest representable instant so
/// an oversized window matches nothing instead of overflowing.
fn cutoff(now: DateTime<Utc>, retention_days: u32) -> DateTime<Utc> {
    Duration::try_days(i64::from(retention_days))
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
