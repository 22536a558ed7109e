//! Approval links: admins mint signed links, moderators open them and confirm.

use crate::constants::API_PREFIX;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use chrono::Utc;
use guestbook_core::models::{ApprovalLink, ContentKind, ContentStatus};
use guestbook_core::AppError;
use guestbook_services::TokenVerification;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// One message for every refused approval, whatever the cause.
const INVALID_APPROVAL_LINK: &str = "Approval link is invalid or has expired";

#[derive(Debug, Serialize)]
pub struct ApprovalResponse {
    pub id: Uuid,
    pub status: ContentStatus,
}

/// Issue a signed approval link for a piece of content. Admin only.
#[tracing::instrument(skip(state), fields(operation = "create_approval_link"))]
pub async fn create_approval_link(
    State(state): State<Arc<AppState>>,
    Path(content_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    state
        .repository
        .get(content_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Content {} not found", content_id)))?;

    let moderation = &state.moderation;
    let issued_at = Utc::now().timestamp_millis();
    let token = moderation
        .approval_tokens
        .issue_at(&content_id.to_string(), issued_at)
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    let expires_at = moderation
        .approval_tokens
        .expires_at(issued_at)
        .ok_or_else(|| AppError::Internal("Approval token expiry out of range".to_string()))?;

    let url = format!(
        "{}{}/approvals/{}",
        moderation.public_base_url, API_PREFIX, token
    );

    tracing::info!(content_id = %content_id, expires_at = %expires_at, "Approval link issued");

    Ok(Json(ApprovalLink {
        token,
        url,
        expires_at,
    }))
}

/// What a moderator sees before confirming an approval.
#[derive(Debug, Serialize)]
pub struct ApprovalPreview {
    pub id: Uuid,
    pub guest_name: String,
    pub kind: ContentKind,
    pub message: Option<String>,
    pub media_url: Option<String>,
    pub status: ContentStatus,
}

fn invalid_link() -> HttpAppError {
    HttpAppError::from(AppError::NotFound(INVALID_APPROVAL_LINK.to_string()))
}

/// Verify `token` and parse the content id it carries.
fn content_id_from_token(state: &AppState, token: &str) -> Result<Uuid, HttpAppError> {
    let content_id = match state.moderation.approval_tokens.verify(token) {
        TokenVerification::Valid(content_id) => content_id,
        TokenVerification::Invalid => return Err(invalid_link()),
    };
    Uuid::parse_str(&content_id).map_err(|_| {
        tracing::debug!("Approval token carries a non-UUID content id");
        invalid_link()
    })
}

/// Open an approval link: show the content without changing it.
///
/// Link scanners and previewers fetch URLs with GET, so approving is left to
/// the POST on the same path.
#[tracing::instrument(skip(state, token), fields(operation = "preview_approval"))]
pub async fn preview_approval(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let content_id = content_id_from_token(&state, &token)?;

    let Some(record) = state.repository.get(content_id).await? else {
        tracing::debug!(content_id = %content_id, "Approval token for unknown content");
        return Err(invalid_link());
    };

    Ok(Json(ApprovalPreview {
        id: record.id,
        guest_name: record.guest_name,
        kind: record.kind,
        message: record.message,
        media_url: record.media_url,
        status: record.status,
    }))
}

/// Confirm an approval link: verify the token and mark the content approved.
///
/// Invalid tokens, unparsable ids and unknown content all answer the same 404.
#[tracing::instrument(skip(state, token), fields(operation = "approve_content"))]
pub async fn approve_content(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let content_id = content_id_from_token(&state, &token)?;

    let updated = state
        .repository
        .set_status(content_id, ContentStatus::Approved)
        .await?;
    if !updated {
        tracing::debug!(content_id = %content_id, "Approval token for unknown content");
        return Err(invalid_link());
    }

    tracing::info!(content_id = %content_id, "Content approved via link");

    Ok(Json(ApprovalResponse {
        id: content_id,
        status: ContentStatus::Approved,
    }))
}
