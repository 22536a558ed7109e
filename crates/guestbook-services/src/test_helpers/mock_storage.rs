//! Mock Storage implementation for testing

use async_trait::async_trait;
use guestbook_storage::{Storage, StorageBackend, StorageError, StorageResult, StoredObject};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Mock storage that keeps blobs in memory.
///
/// Keys registered with [`MockStorage::fail_deletes_for`] make `delete` fail;
/// [`MockStorage::fail_list`] makes `list` fail. Every `delete` call is counted.
pub struct MockStorage {
    files: Mutex<HashMap<String, Vec<u8>>>,
    failing_deletes: Mutex<HashSet<String>>,
    fail_list: Mutex<bool>,
    delete_calls: AtomicUsize,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            failing_deletes: Mutex::new(HashSet::new()),
            fail_list: Mutex::new(false),
            delete_calls: AtomicUsize::new(0),
        }
    }

    /// Set a file in the mock storage
    pub fn set_file(&self, key: &str, data: Vec<u8>) {
        self.files.lock().unwrap().insert(key.to_string(), data);
    }

    /// Check if a file exists in the mock storage
    pub fn has_file(&self, key: &str) -> bool {
        self.files.lock().unwrap().contains_key(key)
    }

    pub fn fail_deletes_for(&self, key: &str) {
        self.failing_deletes
            .lock()
            .unwrap()
            .insert(key.to_string());
    }

    pub fn fail_list(&self) {
        *self.fail_list.lock().unwrap() = true;
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_deletes.lock().unwrap().contains(storage_key) {
            return Err(StorageError::DeleteFailed(format!(
                "simulated failure for {}",
                storage_key
            )));
        }
        self.files.lock().unwrap().remove(storage_key);
        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<StoredObject>> {
        if *self.fail_list.lock().unwrap() {
            return Err(StorageError::ListFailed("simulated list failure".to_string()));
        }
        let mut objects: Vec<StoredObject> = self
            .files
            .lock()
            .unwrap()
            .iter()
            .map(|(key, data)| StoredObject {
                key: key.clone(),
                size_bytes: data.len() as u64,
            })
            .collect();
        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
