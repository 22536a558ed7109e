//! Application state shared by all handlers.

use guestbook_db::ContentRepository;
use guestbook_services::{
    ApprovalTokenCodec, RejectedContentReaper, Storage, StorageUsageService,
};
use std::sync::Arc;

/// Moderation services: approval links and rejected-content cleanup.
#[derive(Clone)]
pub struct ModerationState {
    pub approval_tokens: ApprovalTokenCodec,
    pub reaper: RejectedContentReaper,
    /// Retention used when a cleanup request does not name one.
    pub default_retention_days: u32,
    /// Absolute base for links handed to moderators (no trailing slash).
    pub public_base_url: String,
}

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn ContentRepository>,
    pub storage: Arc<dyn Storage>,
    pub storage_usage: StorageUsageService,
    pub moderation: ModerationState,
}
