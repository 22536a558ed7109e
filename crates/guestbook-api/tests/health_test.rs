mod helpers;

use axum::http::StatusCode;
use helpers::{api_path, setup_test_app, TEST_ADMIN_API_KEY};

#[tokio::test]
async fn test_liveness() {
    let app = setup_test_app();
    let response = app.client().get("/health").await;
    response.assert_status_ok();
    response.assert_json(&serde_json::json!({ "status": "alive" }));
}

#[tokio::test]
async fn test_readiness() {
    let app = setup_test_app();
    let response = app.client().get("/health/ready").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["storage"], "local");
}

#[tokio::test]
async fn test_readiness_fails_when_repository_fails() {
    let app = setup_test_app();
    app.repository.fail_selects();

    let response = app.client().get("/health/ready").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_storage_usage() {
    let app = setup_test_app();
    app.storage.set_file("a.jpg", vec![0; 150]);
    app.storage.set_file("b.mp4", vec![0; 100]);

    let response = app
        .client()
        .get(&api_path("/admin/storage/usage"))
        .authorization_bearer(TEST_ADMIN_API_KEY)
        .await;
    response.assert_status_ok();
    response.assert_json(&serde_json::json!({
        "file_count": 2,
        "total_bytes": 250,
        "quota_bytes": 1000,
        "percent_used": 25.0
    }));
}
