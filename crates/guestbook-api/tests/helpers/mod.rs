//! Test helpers: build AppState and router over in-memory backends.
//!
//! Run from workspace root: `cargo test -p guestbook-api`.

#![allow(dead_code)]

use axum_test::TestServer;
use chrono::{Duration, Utc};
use guestbook_api::constants;
use guestbook_api::setup::{routes, services};
use guestbook_api::state::AppState;
use guestbook_core::models::{ContentKind, ContentRecord, ContentStatus};
use guestbook_core::Config;
use guestbook_services::test_helpers::{InMemoryContentRepository, MockStorage};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

pub const TEST_ADMIN_API_KEY: &str = "test-admin-key-0123456789abcdef0123";
pub const TEST_PUBLIC_BASE_URL: &str = "http://guestbook.test";

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub repository: Arc<InMemoryContentRepository>,
    pub storage: Arc<MockStorage>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config() -> Config {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("DATABASE_URL", "postgres://guestbook@localhost/guestbook_test"),
        ("ADMIN_API_KEY", TEST_ADMIN_API_KEY),
        ("APPROVAL_TOKEN_SECRET", "integration-test-secret"),
        ("PUBLIC_BASE_URL", TEST_PUBLIC_BASE_URL),
        ("STORAGE_BACKEND", "local"),
        ("LOCAL_STORAGE_PATH", "/tmp/guestbook-test"),
        ("STORAGE_QUOTA_BYTES", "1000"),
        ("CLEANUP_INTERVAL_SECS", "0"),
    ]);
    Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
        .expect("Failed to build test config")
}

/// Setup a test app whose repository starts with `records`.
pub fn setup_test_app_with(records: Vec<ContentRecord>) -> TestApp {
    let config = test_config();
    let repository = Arc::new(InMemoryContentRepository::with_records(records));
    let storage = Arc::new(MockStorage::new());

    let state = services::initialize_services(&config, repository.clone(), storage.clone());
    let router =
        routes::setup_routes(&config, state.clone()).expect("Failed to build test router");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        state,
        repository,
        storage,
    }
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(Vec::new())
}

pub fn content(status: ContentStatus, age_days: i64, media_key: Option<&str>) -> ContentRecord {
    ContentRecord {
        id: Uuid::new_v4(),
        guest_name: "Test Guest".to_string(),
        kind: if media_key.is_some() {
            ContentKind::Image
        } else {
            ContentKind::Text
        },
        message: Some("Congratulations to you both!".to_string()),
        media_url: media_key.map(|key| format!("http://guestbook.test/media/{}", key)),
        status,
        created_at: Utc::now() - Duration::days(age_days),
    }
}
