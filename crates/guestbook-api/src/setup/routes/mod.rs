//! Route configuration and setup.
//!
//! Health checks live in [health](health).

mod health;

use crate::auth::{admin_auth_middleware, AdminAuthState};
use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use guestbook_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// No endpoint accepts a body larger than this.
const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(AdminAuthState::new(config.admin_api_key()));

    let admin_routes = admin_routes().layer(axum::middleware::from_fn_with_state(
        auth_state,
        admin_auth_middleware,
    ));

    let app = public_routes()
        .nest(&format!("{}/admin", API_PREFIX), admin_routes)
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    let headers = [header::AUTHORIZATION, header::CONTENT_TYPE];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(headers)
    };
    Ok(cors)
}

/// Public routes (no authentication required)
fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check))
        .route(
            &format!("{}/approvals/{{token}}", API_PREFIX),
            get(handlers::approval::preview_approval)
                .post(handlers::approval::approve_content),
        )
}

/// Admin routes, mounted under `{API_PREFIX}/admin` behind the admin key.
fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/content/{id}/approval-link",
            post(handlers::approval::create_approval_link),
        )
        .route("/cleanup", post(handlers::cleanup::run_cleanup))
        .route("/cleanup/stats", get(handlers::cleanup::cleanup_stats))
        .route(
            "/storage/usage",
            get(handlers::storage_usage::get_storage_usage),
        )
}
