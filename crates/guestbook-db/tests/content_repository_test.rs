//! Postgres-backed repository tests.
//!
//! Set `TEST_DATABASE_URL` to a disposable database to run these; they are
//! skipped otherwise. Each test works in its own schema.

use chrono::{Duration, Utc};
use guestbook_core::models::{ContentKind, ContentRecord, ContentStatus};
use guestbook_db::{ContentRepository, PostgresContentRepository};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration as StdDuration;
use uuid::Uuid;

async fn setup_pool() -> Option<PgPool> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("TEST_DATABASE_URL not set, skipping");
            return None;
        }
    };

    let schema = format!("guestbook_test_{}", Uuid::new_v4().simple());
    let search_path = format!("SET search_path TO {}", schema);
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(StdDuration::from_secs(30))
        .after_connect(move |conn, _meta| {
            let search_path = search_path.clone();
            Box::pin(async move {
                sqlx::query(&search_path).execute(conn).await?;
                Ok(())
            })
        })
        .connect(&url)
        .await
        .expect("Failed to connect to test database");

    sqlx::query(&format!("CREATE SCHEMA {}", schema))
        .execute(&pool)
        .await
        .expect("Failed to create schema");
    sqlx::query(
        r#"
        CREATE TABLE guest_messages (
            id UUID PRIMARY KEY,
            guest_name TEXT NOT NULL,
            kind TEXT NOT NULL,
            message TEXT,
            media_url TEXT,
            status TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(&pool)
    .await
    .expect("Failed to create table");

    Some(pool)
}

fn record(status: ContentStatus, age_days: i64, media_url: Option<&str>) -> ContentRecord {
    ContentRecord {
        id: Uuid::new_v4(),
        guest_name: "Grace".to_string(),
        kind: if media_url.is_some() {
            ContentKind::Image
        } else {
            ContentKind::Text
        },
        message: Some("Congratulations!".to_string()),
        media_url: media_url.map(String::from),
        status,
        created_at: Utc::now() - Duration::days(age_days),
    }
}

#[tokio::test]
async fn test_find_and_delete_old_rejected() {
    let Some(pool) = setup_pool().await else {
        return;
    };
    let repo = PostgresContentRepository::new(pool);

    let old_rejected = record(
        ContentStatus::Rejected,
        10,
        Some("https://cdn.example.com/media/a.jpg"),
    );
    let new_rejected = record(ContentStatus::Rejected, 1, None);
    let old_approved = record(ContentStatus::Approved, 10, None);
    for r in [&old_rejected, &new_rejected, &old_approved] {
        repo.insert(r).await.unwrap();
    }

    let cutoff = Utc::now() - Duration::days(7);
    let found = repo
        .find_by_status_older_than(ContentStatus::Rejected, cutoff)
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, old_rejected.id);
    assert_eq!(found[0].media_url, old_rejected.media_url);

    assert_eq!(
        repo.count_by_status(ContentStatus::Rejected).await.unwrap(),
        2
    );
    assert_eq!(
        repo.count_by_status_older_than(ContentStatus::Rejected, cutoff)
            .await
            .unwrap(),
        1
    );

    let deleted = repo.delete_by_ids(&[old_rejected.id]).await.unwrap();
    assert_eq!(deleted, 1);
    assert!(repo.get(old_rejected.id).await.unwrap().is_none());
    assert!(repo.get(old_approved.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_set_status() {
    let Some(pool) = setup_pool().await else {
        return;
    };
    let repo = PostgresContentRepository::new(pool);

    let pending = record(ContentStatus::Pending, 0, None);
    repo.insert(&pending).await.unwrap();

    assert!(repo
        .set_status(pending.id, ContentStatus::Approved)
        .await
        .unwrap());
    let stored = repo.get(pending.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ContentStatus::Approved);

    assert!(!repo
        .set_status(Uuid::new_v4(), ContentStatus::Approved)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_delete_empty_ids_is_noop() {
    let Some(pool) = setup_pool().await else {
        return;
    };
    let repo = PostgresContentRepository::new(pool);
    assert_eq!(repo.delete_by_ids(&[]).await.unwrap(), 0);
}
