//! Application setup and initialization
//!
//! Everything `main` needs to go from a `Config` to a served router, kept out
//! of `main.rs` so tests can build the same state and routes.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use crate::state::AppState;
use anyhow::Result;
use guestbook_core::Config;
use guestbook_db::PostgresContentRepository;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// A ready-to-serve application and its background tasks.
pub struct App {
    pub state: Arc<AppState>,
    pub router: axum::Router,
    pub background_tasks: Vec<JoinHandle<()>>,
}

impl App {
    /// Abort background tasks (the cleanup scheduler).
    pub fn shutdown(self) {
        for handle in self.background_tasks {
            handle.abort();
        }
        tracing::info!("Background tasks stopped");
    }
}

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<App> {
    // Initialize telemetry first
    crate::telemetry::init_telemetry(config.environment())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Config::from_env has already validated; only warn about the fallback secret here
    if config.approval_token().uses_insecure_default() {
        tracing::warn!(
            "APPROVAL_TOKEN_SECRET not set, using the insecure default secret (not allowed in production)"
        );
    }
    tracing::info!(environment = %config.environment(), "Configuration loaded");

    // Setup database
    let pool = database::setup_database(&config).await?;
    let repository = Arc::new(PostgresContentRepository::new(pool));

    // Setup storage
    let storage = storage::setup_storage(&config).await?;

    // Wire services into shared state
    let state = services::initialize_services(&config, repository, storage);
    let background_tasks = services::start_background_tasks(&config, &state);

    // Setup routes
    let router = routes::setup_routes(&config, state.clone())?;

    Ok(App {
        state,
        router,
        background_tasks,
    })
}
