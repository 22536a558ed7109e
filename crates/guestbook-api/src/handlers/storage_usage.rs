use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

pub async fn get_storage_usage(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let usage = state
        .storage_usage
        .usage()
        .await
        .map_err(HttpAppError::from)?;
    Ok(Json(usage))
}
