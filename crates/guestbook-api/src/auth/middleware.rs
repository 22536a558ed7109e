//! Static bearer-key authentication for admin routes.

use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use guestbook_core::AppError;
use std::sync::Arc;
use subtle::ConstantTimeEq;

#[derive(Clone)]
pub struct AdminAuthState {
    pub admin_api_key: String,
}

impl AdminAuthState {
    pub fn new(admin_api_key: impl Into<String>) -> Self {
        Self {
            admin_api_key: admin_api_key.into(),
        }
    }
}

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

fn bearer_token(request: &Request) -> Option<&str> {
    let header = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

pub async fn admin_auth_middleware(
    State(auth_state): State<Arc<AdminAuthState>>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = bearer_token(&request)
        .map(|token| secure_compare(token, &auth_state.admin_api_key))
        .unwrap_or(false);

    if !authorized {
        tracing::warn!(
            path = %request.uri().path(),
            method = %request.method(),
            "Rejected admin request without valid API key"
        );
        return HttpAppError::from(AppError::Unauthorized(
            "Missing or invalid admin API key".to_string(),
        ))
        .into_response();
    }

    next.run(request).await
}
