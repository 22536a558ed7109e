mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use guestbook_core::models::ContentStatus;
use helpers::{api_path, content, setup_test_app, setup_test_app_with, TEST_ADMIN_API_KEY};
use uuid::Uuid;

#[tokio::test]
async fn test_approval_link_round_trip() {
    let pending = content(ContentStatus::Pending, 0, Some("cake.jpg"));
    let app = setup_test_app_with(vec![pending.clone()]);

    let response = app
        .client()
        .post(&api_path(&format!("/admin/content/{}/approval-link", pending.id)))
        .authorization_bearer(TEST_ADMIN_API_KEY)
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let token = body["token"].as_str().unwrap();
    let url = body["url"].as_str().unwrap();
    assert!(token.starts_with(&pending.id.to_string()));
    assert_eq!(
        url,
        format!("http://guestbook.test/api/v0/approvals/{}", token)
    );
    assert!(body["expires_at"].is_string());

    let approval_path = api_path(&format!("/approvals/{}", token));

    // Opening the link only shows the content.
    let response = app.client().get(&approval_path).await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["id"], pending.id.to_string());
    assert_eq!(body["guest_name"], "Test Guest");
    assert_eq!(body["status"], "pending");
    assert_eq!(app.repository.records()[0].status, ContentStatus::Pending);

    let response = app.client().post(&approval_path).await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "approved");

    let stored = app.repository.records();
    assert_eq!(stored[0].status, ContentStatus::Approved);
}

#[tokio::test]
async fn test_approval_link_requires_admin_key() {
    let pending = content(ContentStatus::Pending, 0, None);
    let app = setup_test_app_with(vec![pending.clone()]);
    let path = api_path(&format!("/admin/content/{}/approval-link", pending.id));

    let response = app.client().post(&path).await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = app
        .client()
        .post(&path)
        .authorization_bearer("wrong-key-wrong-key-wrong-key-wrong")
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_approval_link_for_unknown_content() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(&api_path(&format!(
            "/admin/content/{}/approval-link",
            Uuid::new_v4()
        )))
        .authorization_bearer(TEST_ADMIN_API_KEY)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_refused_approvals_look_identical() {
    let pending = content(ContentStatus::Pending, 0, None);
    let app = setup_test_app_with(vec![pending.clone()]);
    let codec = &app.state.moderation.approval_tokens;

    let garbage = "not-a-token".to_string();
    let tampered = {
        let mut token = codec.issue(&pending.id.to_string()).unwrap();
        let last = token.pop().unwrap();
        token.push(if last == '0' { '1' } else { '0' });
        token
    };
    let expired = codec
        .issue_at(
            &pending.id.to_string(),
            (Utc::now() - Duration::days(8)).timestamp_millis(),
        )
        .unwrap();
    let unknown_content = codec.issue(&Uuid::new_v4().to_string()).unwrap();
    let not_a_uuid = codec.issue("guest-42").unwrap();

    let mut bodies = Vec::new();
    for token in [garbage, tampered, expired, unknown_content, not_a_uuid] {
        let path = api_path(&format!("/approvals/{}", token));
        for response in [app.client().get(&path).await, app.client().post(&path).await] {
            response.assert_status(StatusCode::NOT_FOUND);
            bodies.push(response.json::<serde_json::Value>());
        }
    }

    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(app.repository.records()[0].status, ContentStatus::Pending);
}

#[tokio::test]
async fn test_opening_link_does_not_approve() {
    let pending = content(ContentStatus::Pending, 0, None);
    let app = setup_test_app_with(vec![pending.clone()]);
    let token = app
        .state
        .moderation
        .approval_tokens
        .issue(&pending.id.to_string())
        .unwrap();
    let path = api_path(&format!("/approvals/{}", token));

    for _ in 0..3 {
        app.client().get(&path).await.assert_status_ok();
    }
    assert_eq!(app.repository.records()[0].status, ContentStatus::Pending);

    app.client().post(&path).await.assert_status_ok();
    assert_eq!(app.repository.records()[0].status, ContentStatus::Approved);
}
