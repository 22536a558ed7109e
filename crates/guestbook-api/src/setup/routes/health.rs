//! Health check handlers.

use crate::constants::READINESS_TIMEOUT_SECS;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use guestbook_core::models::ContentStatus;
use std::sync::Arc;
use std::time::Duration;

/// Liveness check: the process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness check: the content repository answers a query.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timeout = Duration::from_secs(READINESS_TIMEOUT_SECS);

    let (ready, database) = match tokio::time::timeout(
        timeout,
        state.repository.count_by_status(ContentStatus::Pending),
    )
    .await
    {
        Ok(Ok(_)) => (true, "ready".to_string()),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Database readiness check failed");
            (false, format!("not_ready: {}", e))
        }
        Err(_) => {
            tracing::error!("Database readiness check timed out");
            (false, "timeout".to_string())
        }
    };

    let (status, label) = if ready {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    };
    (
        status,
        Json(serde_json::json!({
            "status": label,
            "database": database,
            "storage": state.storage.backend_type().to_string(),
        })),
    )
}
