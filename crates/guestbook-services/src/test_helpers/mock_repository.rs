//! In-memory ContentRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use guestbook_core::models::{ContentRecord, ContentRef, ContentStatus};
use guestbook_core::AppError;
use guestbook_db::ContentRepository;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// Content repository backed by a `Vec`.
///
/// `fail_selects` makes the selection and count queries fail, `fail_deletes`
/// makes the batch delete fail. Batch delete calls are counted.
#[derive(Default)]
pub struct InMemoryContentRepository {
    records: Mutex<Vec<ContentRecord>>,
    fail_selects: AtomicBool,
    fail_deletes: AtomicBool,
    delete_calls: AtomicUsize,
}

impl InMemoryContentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ContentRecord>) -> Self {
        let repo = Self::default();
        *repo.records.lock().unwrap() = records;
        repo
    }

    pub fn insert(&self, record: ContentRecord) {
        self.records.lock().unwrap().push(record);
    }

    pub fn records(&self) -> Vec<ContentRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn fail_selects(&self) {
        self.fail_selects.store(true, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    fn check_selects(&self) -> Result<(), AppError> {
        if self.fail_selects.load(Ordering::SeqCst) {
            return Err(simulated("select"));
        }
        Ok(())
    }
}

fn simulated(op: &str) -> AppError {
    AppError::Unavailable(format!("simulated {} failure", op))
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn find_by_status_older_than(
        &self,
        status: ContentStatus,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<ContentRef>, AppError> {
        self.check_selects()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.status == status && r.created_at < cutoff)
            .map(ContentRef::from)
            .collect())
    }

    async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<u64, AppError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(simulated("delete"));
        }
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| !ids.contains(&r.id));
        Ok((before - records.len()) as u64)
    }

    async fn count_by_status(&self, status: ContentStatus) -> Result<i64, AppError> {
        self.check_selects()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.status == status)
            .count() as i64)
    }

    async fn count_by_status_older_than(
        &self,
        status: ContentStatus,
        cutoff: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        self.check_selects()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.status == status && r.created_at < cutoff)
            .count() as i64)
    }

    async fn get(&self, id: Uuid) -> Result<Option<ContentRecord>, AppError> {
        self.check_selects()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn set_status(&self, id: Uuid, status: ContentStatus) -> Result<bool, AppError> {
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
