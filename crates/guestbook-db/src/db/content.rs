//! Content repository: guest submissions and their moderation status.
//!
//! Expected table (schema is managed outside this service):
//!
//! ```sql
//! CREATE TABLE guest_messages (
//!     id          UUID PRIMARY KEY,
//!     guest_name  TEXT NOT NULL,
//!     kind        TEXT NOT NULL,          -- text | image | video
//!     message     TEXT,
//!     media_url   TEXT,
//!     status      TEXT NOT NULL,          -- pending | approved | rejected
//!     created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
//! );
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use guestbook_core::models::{ContentKind, ContentRecord, ContentRef, ContentStatus};
use guestbook_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Data access for guest submissions.
///
/// The reaper only needs the selection, batch delete and count operations;
/// `get` and `set_status` serve the approval-link flow.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Records with `status` created strictly before `cutoff`.
    async fn find_by_status_older_than(
        &self,
        status: ContentStatus,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<ContentRef>, AppError>;

    /// Delete all records with the given ids in one statement. Returns rows removed.
    async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<u64, AppError>;

    async fn count_by_status(&self, status: ContentStatus) -> Result<i64, AppError>;

    async fn count_by_status_older_than(
        &self,
        status: ContentStatus,
        cutoff: DateTime<Utc>,
    ) -> Result<i64, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<ContentRecord>, AppError>;

    /// Returns false when no record has this id.
    async fn set_status(&self, id: Uuid, status: ContentStatus) -> Result<bool, AppError>;
}

/// Row type for guest_messages (enums stored as text).
#[derive(Debug, sqlx::FromRow)]
struct ContentRow {
    id: Uuid,
    guest_name: String,
    kind: String,
    message: Option<String>,
    media_url: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ContentRow> for ContentRecord {
    type Error = AppError;

    fn try_from(row: ContentRow) -> Result<Self, Self::Error> {
        let kind: ContentKind = row
            .kind
            .parse()
            .map_err(|e| AppError::Internal(format!("Row {}: {}", row.id, e)))?;
        let status: ContentStatus = row
            .status
            .parse()
            .map_err(|e| AppError::Internal(format!("Row {}: {}", row.id, e)))?;
        Ok(ContentRecord {
            id: row.id,
            guest_name: row.guest_name,
            kind,
            message: row.message,
            media_url: row.media_url,
            status,
            created_at: row.created_at,
        })
    }
}

#[derive(Clone)]
pub struct PostgresContentRepository {
    pool: PgPool,
}

impl PostgresContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a submission. The upload workflow owns creation; this exists for
    /// seeding and tooling.
    #[tracing::instrument(skip(self, record), fields(db.table = "guest_messages", db.operation = "insert", db.record_id = %record.id))]
    pub async fn insert(&self, record: &ContentRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO guest_messages (id, guest_name, kind, message, media_url, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id)
        .bind(&record.guest_name)
        .bind(record.kind.as_str())
        .bind(&record.message)
        .bind(&record.media_url)
        .bind(record.status.as_str())
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ContentRepository for PostgresContentRepository {
    #[tracing::instrument(skip(self), fields(db.table = "guest_messages", db.operation = "select"))]
    async fn find_by_status_older_than(
        &self,
        status: ContentStatus,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<ContentRef>, AppError> {
        let rows = sqlx::query_as::<Postgres, ContentRef>(
            r#"
            SELECT id, media_url
            FROM guest_messages
            WHERE status = $1 AND created_at < $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(status.as_str())
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    #[tracing::instrument(skip(self, ids), fields(db.table = "guest_messages", db.operation = "delete", count = ids.len()))]
    async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let rows_affected = sqlx::query("DELETE FROM guest_messages WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows_affected)
    }

    #[tracing::instrument(skip(self), fields(db.table = "guest_messages", db.operation = "count"))]
    async fn count_by_status(&self, status: ContentStatus) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM guest_messages WHERE status = $1")
                .bind(status.as_str())
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    #[tracing::instrument(skip(self), fields(db.table = "guest_messages", db.operation = "count"))]
    async fn count_by_status_older_than(
        &self,
        status: ContentStatus,
        cutoff: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM guest_messages WHERE status = $1 AND created_at < $2",
        )
        .bind(status.as_str())
        .bind(cutoff)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    #[tracing::instrument(skip(self), fields(db.table = "guest_messages", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: Uuid) -> Result<Option<ContentRecord>, AppError> {
        let row = sqlx::query_as::<Postgres, ContentRow>(
            r#"
            SELECT id, guest_name, kind, message, media_url, status, created_at
            FROM guest_messages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(ContentRecord::try_from).transpose()
    }

    #[tracing::instrument(skip(self), fields(db.table = "guest_messages", db.operation = "update", db.record_id = %id))]
    async fn set_status(&self, id: Uuid, status: ContentStatus) -> Result<bool, AppError> {
        let rows_affected = sqlx::query("UPDATE guest_messages SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(kind: &str, status: &str) -> ContentRow {
        ContentRow {
            id: Uuid::new_v4(),
            guest_name: "Ada".to_string(),
            kind: kind.to_string(),
            message: Some("Happy birthday!".to_string()),
            media_url: None,
            status: status.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_converts_to_record() {
        let record = ContentRecord::try_from(row("image", "rejected")).unwrap();
        assert_eq!(record.kind, ContentKind::Image);
        assert_eq!(record.status, ContentStatus::Rejected);
    }

    #[test]
    fn test_row_with_unknown_status_is_internal_error() {
        let err = ContentRecord::try_from(row("text", "archived")).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
