//! Guestbook Storage Library
//!
//! This crate provides the blob storage abstraction for guest uploads and its
//! implementations for S3-compatible object stores and the local filesystem.
//!
//! # Storage key format
//!
//! Uploads are stored flat: the key is the uploaded filename, and the public
//! URL of a blob ends with that key. The reaper recovers the key from a stored
//! `media_url` with [`storage_key_from_url`]. Keys must not contain `..` or a
//! leading `/`.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use guestbook_core::StorageBackend;
pub use keys::storage_key_from_url;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult, StoredObject};
