//! Guestbook Core Library
//!
//! This crate provides core domain models, error types and configuration
//! that are shared across all guestbook components.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{ApprovalTokenConfig, Config, RetentionConfig, MAX_RETENTION_DAYS};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
// Note: Storage, StorageError, StorageResult live in guestbook-storage
