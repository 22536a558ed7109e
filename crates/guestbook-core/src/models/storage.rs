use serde::{Deserialize, Serialize};

/// Aggregate blob storage consumption against the configured quota.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageUsage {
    pub file_count: u64,
    pub total_bytes: u64,
    pub quota_bytes: u64,
    pub percent_used: f64,
}

impl StorageUsage {
    pub fn new(file_count: u64, total_bytes: u64, quota_bytes: u64) -> Self {
        let percent_used = if quota_bytes == 0 {
            0.0
        } else {
            (total_bytes as f64 / quota_bytes as f64) * 100.0
        };
        Self {
            file_count,
            total_bytes,
            quota_bytes,
            percent_used,
        }
    }
}
