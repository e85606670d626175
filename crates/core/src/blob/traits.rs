use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use super::Result;

/// Boundary to the object-blob store.
///
/// The blob store is never part of a table-store transaction; callers that
/// need both sides consistent must order their writes and compensate on
/// failure (see the post lifecycle service).
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores an opaque payload under `bucket`/`key`.
    async fn put(&self, bucket: &str, key: &str, bytes: Bytes, content_type: &str) -> Result<()>;

    /// Deletes the object at `bucket`/`key`.
    ///
    /// Deleting an object that does not exist is not an error.
    async fn delete(&self, bucket: &str, key: &str) -> Result<()>;

    /// Generates a time-limited signed URL callers can PUT the object to.
    async fn presign_put(&self, bucket: &str, key: &str, expires_in: Duration) -> Result<String>;
}
