//! Guestbook Services Layer
//!
//! Business services that sit between the HTTP layer and the repository and
//! storage crates: approval token signing, rejected-content cleanup and its
//! scheduler, and storage usage reporting. Keep HTTP handling in guestbook-api.

pub mod approval_token;
#[cfg(feature = "cleanup")]
pub mod cleanup;
pub mod storage_usage;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use approval_token::{ApprovalTokenCodec, ApprovalTokenError, TokenVerification};
#[cfg(feature = "cleanup")]
pub use cleanup::{CleanupScheduler, RejectedContentReaper, DEFAULT_RETENTION_DAYS};
pub use guestbook_storage::{
    create_storage, storage_key_from_url, Storage, StorageBackend, StorageError, StorageResult,
    StoredObject,
};
pub use storage_usage::StorageUsageService;
