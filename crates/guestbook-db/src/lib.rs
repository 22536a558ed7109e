//! Guestbook Database Layer
//!
//! This crate provides the content repository abstraction and its Postgres
//! implementation.
//!
// Module declarations
pub mod db;

// Re-exports
pub use db::content::{ContentRepository, PostgresContentRepository};
