//! Storage setup

use anyhow::{Context, Result};
use guestbook_core::Config;
use guestbook_services::{create_storage, Storage};
use std::sync::Arc;

/// Create the configured blob storage backend
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;

    tracing::info!(
        backend = %storage.backend_type(),
        "Storage backend initialized"
    );

    Ok(storage)
}
