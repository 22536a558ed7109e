use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use futures::TryStreamExt;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectMeta, ObjectStoreExt};
use std::time::Instant;

/// Guest uploads in an S3 bucket (or any S3-compatible store).
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn object_path(storage_key: &str) -> Path {
    Path::from(storage_key)
}

impl S3Storage {
    /// Build a client for `bucket`. Credentials come from the usual AWS
    /// environment variables; `endpoint_url` is set for S3-compatible
    /// providers (MinIO, Supabase storage, ...).
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(&region)
            .with_bucket_name(&bucket);

        if let Some(endpoint) = endpoint_url.as_deref() {
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(endpoint.starts_with("http://"));
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        tracing::debug!(bucket = %bucket, region = %region, "S3 client configured");

        Ok(S3Storage { store, bucket })
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let start = Instant::now();

        match self.store.delete(&object_path(storage_key)).await {
            Ok(()) => {
                tracing::info!(
                    bucket = %self.bucket,
                    key = %storage_key,
                    duration_ms = elapsed_ms(start),
                    "S3 delete successful"
                );
                Ok(())
            }
            Err(ObjectStoreError::NotFound { .. }) => {
                tracing::debug!(bucket = %self.bucket, key = %storage_key, "S3 object already absent");
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    duration_ms = elapsed_ms(start),
                    "S3 delete failed"
                );
                Err(StorageError::DeleteFailed(e.to_string()))
            }
        }
    }

    async fn list(&self) -> StorageResult<Vec<StoredObject>> {
        let start = Instant::now();

        let metas: Vec<ObjectMeta> = object_store::ObjectStore::list(&self.store, None)
            .try_collect()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, bucket = %self.bucket, "S3 list failed");
                StorageError::ListFailed(e.to_string())
            })?;

        let objects: Vec<StoredObject> = metas
            .into_iter()
            .map(|meta| StoredObject {
                key: meta.location.to_string(),
                size_bytes: meta.size,
            })
            .collect();

        tracing::debug!(
            bucket = %self.bucket,
            object_count = objects.len(),
            duration_ms = elapsed_ms(start),
            "S3 list successful"
        );

        Ok(objects)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
