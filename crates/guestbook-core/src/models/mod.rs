//! Data models for the guestbook
//!
//! Each sub-module represents a specific feature area.

mod content;
mod moderation;
mod storage;

// Re-export all models for convenient imports
pub use content::{ContentKind, ContentRecord, ContentRef, ContentStatus};
pub use moderation::{ApprovalLink, CleanupReport, RejectedStats};
pub use storage::StorageUsage;
