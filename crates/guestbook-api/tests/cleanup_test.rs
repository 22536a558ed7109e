mod helpers;

use axum::http::StatusCode;
use guestbook_core::models::ContentStatus;
use helpers::{api_path, content, setup_test_app_with, TEST_ADMIN_API_KEY};

#[tokio::test]
async fn test_cleanup_endpoint_removes_old_rejected() {
    let old = content(ContentStatus::Rejected, 10, Some("old.jpg"));
    let recent = content(ContentStatus::Rejected, 1, Some("recent.jpg"));
    let app = setup_test_app_with(vec![old, recent.clone()]);
    app.storage.set_file("old.jpg", vec![0; 10]);
    app.storage.set_file("recent.jpg", vec![0; 10]);

    let response = app
        .client()
        .post(&api_path("/admin/cleanup"))
        .authorization_bearer(TEST_ADMIN_API_KEY)
        .await;
    response.assert_status_ok();
    response.assert_json(&serde_json::json!({
        "cleaned_count": 1,
        "errors": []
    }));

    assert!(!app.storage.has_file("old.jpg"));
    assert!(app.storage.has_file("recent.jpg"));
    let remaining = app.repository.records();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, recent.id);
}

#[tokio::test]
async fn test_cleanup_endpoint_honors_retention_param() {
    let app = setup_test_app_with(vec![content(ContentStatus::Rejected, 10, None)]);

    let response = app
        .client()
        .post(&api_path("/admin/cleanup"))
        .add_query_param("retention_days", 30)
        .authorization_bearer(TEST_ADMIN_API_KEY)
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["cleaned_count"], 0);
    assert_eq!(app.repository.records().len(), 1);
}

#[tokio::test]
async fn test_cleanup_reports_blob_failures() {
    let app = setup_test_app_with(vec![
        content(ContentStatus::Rejected, 9, Some("a.jpg")),
        content(ContentStatus::Rejected, 9, Some("b.jpg")),
    ]);
    app.storage.fail_deletes_for("b.jpg");

    let response = app
        .client()
        .post(&api_path("/admin/cleanup"))
        .authorization_bearer(TEST_ADMIN_API_KEY)
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["cleaned_count"], 2);
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_cleanup_stats() {
    let app = setup_test_app_with(vec![
        content(ContentStatus::Rejected, 1, None),
        content(ContentStatus::Rejected, 10, None),
        content(ContentStatus::Approved, 10, None),
    ]);

    let response = app
        .client()
        .get(&api_path("/admin/cleanup/stats"))
        .authorization_bearer(TEST_ADMIN_API_KEY)
        .await;
    response.assert_status_ok();
    response.assert_json(&serde_json::json!({
        "total_rejected": 2,
        "old_rejected": 1
    }));
}

#[tokio::test]
async fn test_cleanup_stats_unavailable_when_queries_fail() {
    let app = setup_test_app_with(Vec::new());
    app.repository.fail_selects();

    let response = app
        .client()
        .get(&api_path("/admin/cleanup/stats"))
        .authorization_bearer(TEST_ADMIN_API_KEY)
        .await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_cleanup_requires_admin_key() {
    let app = setup_test_app_with(Vec::new());

    let response = app.client().post(&api_path("/admin/cleanup")).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_oversized_retention_is_bad_request() {
    let app = setup_test_app_with(vec![content(ContentStatus::Rejected, 10, None)]);

    for path in ["/admin/cleanup", "/admin/cleanup/stats"] {
        let request = if path.ends_with("stats") {
            app.client().get(&api_path(path))
        } else {
            app.client().post(&api_path(path))
        };
        let response = request
            .add_query_param("retention_days", 100_000_000u32)
            .authorization_bearer(TEST_ADMIN_API_KEY)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    assert_eq!(app.repository.records().len(), 1);
}
