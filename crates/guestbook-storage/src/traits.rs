//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("List failed: {0}")]
    ListFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// One stored blob as reported by [`Storage::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub size_bytes: u64,
}

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait so
/// the reaper and the usage aggregator work with any backend.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Delete a file by its storage key.
    ///
    /// Deleting a key that does not exist is not an error.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// List every stored object with its size.
    async fn list(&self) -> StorageResult<Vec<StoredObject>>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
