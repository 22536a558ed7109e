//! Rejected-content cleanup endpoints. Admin only.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
};
use guestbook_core::{AppError, MAX_RETENTION_DAYS};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct RetentionQuery {
    pub retention_days: Option<u32>,
}

impl RetentionQuery {
    fn days_or(&self, default: u32) -> Result<u32, AppError> {
        match self.retention_days {
            Some(days) if days > MAX_RETENTION_DAYS => Err(AppError::InvalidInput(format!(
                "retention_days must be at most {}",
                MAX_RETENTION_DAYS
            ))),
            Some(days) => Ok(days),
            None => Ok(default),
        }
    }
}

/// Run one cleanup pass and return its report.
///
/// Sub-failures are part of the report; the request itself still succeeds.
#[tracing::instrument(skip(state), fields(operation = "run_cleanup"))]
pub async fn run_cleanup(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RetentionQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let retention_days = query.days_or(state.moderation.default_retention_days)?;
    let report = state.moderation.reaper.cleanup(retention_days).await;
    Ok(Json(report))
}

#[tracing::instrument(skip(state), fields(operation = "cleanup_stats"))]
pub async fn cleanup_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RetentionQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let retention_days = query.days_or(state.moderation.default_retention_days)?;
    let stats = state
        .moderation
        .reaper
        .stats(retention_days)
        .await
        .ok_or_else(|| {
            AppError::Unavailable("Rejected content statistics unavailable".to_string())
        })?;
    Ok(Json(stats))
}
