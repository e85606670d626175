//! In-memory blob store for testing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use snapfeed_core::blob::{BlobStore, Result};

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Bytes,
    content_type: String,
}

/// In-memory blob store backend for testing.
///
/// Objects live in a HashMap keyed by (bucket, key). Presigned URLs are
/// deterministic `memory://` URLs; nothing enforces their expiry.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlobStore {
    objects: Arc<RwLock<HashMap<(String, String), StoredObject>>>,
}

impl InMemoryBlobStore {
    /// Creates a new empty in-memory blob store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if an object exists at `bucket`/`key`.
    pub async fn contains(&self, bucket: &str, key: &str) -> bool {
        let objects = self.objects.read().await;
        objects.contains_key(&(bucket.to_string(), key.to_string()))
    }

    /// Returns the payload stored at `bucket`/`key`, if any.
    pub async fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        let objects = self.objects.read().await;
        objects
            .get(&(bucket.to_string(), key.to_string()))
            .map(|object| object.bytes.clone())
    }

    /// Returns the content type stored at `bucket`/`key`, if any.
    pub async fn content_type(&self, bucket: &str, key: &str) -> Option<String> {
        let objects = self.objects.read().await;
        objects
            .get(&(bucket.to_string(), key.to_string()))
            .map(|object| object.content_type.clone())
    }

    /// Number of stored objects across all buckets.
    pub async fn object_count(&self) -> usize {
        let objects = self.objects.read().await;
        objects.len()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, bucket: &str, key: &str, bytes: Bytes, content_type: &str) -> Result<()> {
        let mut objects = self.objects.write().await;
        objects.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<()> {
        let mut objects = self.objects.write().await;
        // Deleting a missing object succeeds, matching S3 semantics.
        objects.remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }

    async fn presign_put(&self, bucket: &str, key: &str, expires_in: Duration) -> Result<String> {
        Ok(format!(
            "memory://{bucket}/{key}?expires_in={}",
            expires_in.as_secs()
        ))
    }
}
