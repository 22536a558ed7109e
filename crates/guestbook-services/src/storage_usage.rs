//! Storage usage aggregation against the configured quota.

use guestbook_core::models::StorageUsage;
use guestbook_core::AppError;
use guestbook_storage::Storage;
use std::sync::Arc;

#[derive(Clone)]
pub struct StorageUsageService {
    storage: Arc<dyn Storage>,
    quota_bytes: u64,
}

impl StorageUsageService {
    pub fn new(storage: Arc<dyn Storage>, quota_bytes: u64) -> Self {
        Self {
            storage,
            quota_bytes,
        }
    }

    /// Sum the size of every stored blob.
    #[tracing::instrument(skip(self), fields(storage.backend = %self.storage.backend_type()))]
    pub async fn usage(&self) -> Result<StorageUsage, AppError> {
        let objects = self.storage.list().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to list stored objects");
            AppError::Storage(e.to_string())
        })?;

        let total_bytes: u64 = objects.iter().map(|o| o.size_bytes).sum();
        let usage = StorageUsage::new(objects.len() as u64, total_bytes, self.quota_bytes);

        if usage.percent_used >= 90.0 {
            tracing::warn!(
                total_bytes,
                quota_bytes = self.quota_bytes,
                percent_used = usage.percent_used,
                "Storage usage is close to quota"
            );
        }

        Ok(usage)
    }
}
