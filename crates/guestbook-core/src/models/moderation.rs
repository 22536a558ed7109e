use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one rejected-content cleanup run.
///
/// `cleaned_count` counts removed database rows; blob failures only add to `errors`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    pub cleaned_count: u64,
    pub errors: Vec<String>,
}

impl CleanupReport {
    pub fn aborted(error: impl Into<String>) -> Self {
        Self {
            cleaned_count: 0,
            errors: vec![error.into()],
        }
    }
}

/// Counts of rejected content, overall and past the retention window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedStats {
    pub total_rejected: i64,
    pub old_rejected: i64,
}

/// Signed approval link handed to a moderator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalLink {
    pub token: String,
    pub url: String,
    pub expires_at: DateTime<Utc>,
}
