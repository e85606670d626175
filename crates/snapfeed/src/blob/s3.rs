//! S3 blob store backend.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use tracing::debug;

use snapfeed_core::blob::{BlobStore, BlobStoreError, Result};

/// S3-backed blob store.
pub struct S3BlobStore {
    client: Client,
}

impl S3BlobStore {
    /// Creates a new blob store with the given S3 client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a new blob store using the AWS SDK default credential chain.
    pub async fn from_env() -> Self {
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&sdk_config))
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, bucket: &str, key: &str, bytes: Bytes, content_type: &str) -> Result<()> {
        debug!(%bucket, %key, "uploading object");

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|err| {
                BlobStoreError::operation("put", bucket, key, DisplayErrorContext(err).to_string())
            })?;

        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<()> {
        debug!(%bucket, %key, "deleting object");

        // S3 treats deleting a missing key as success, which is exactly the
        // tolerance the compensation paths rely on.
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                BlobStoreError::operation(
                    "delete",
                    bucket,
                    key,
                    DisplayErrorContext(err).to_string(),
                )
            })?;

        Ok(())
    }

    async fn presign_put(&self, bucket: &str, key: &str, expires_in: Duration) -> Result<String> {
        debug!(%bucket, %key, "generating presigned upload URL");

        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|err| BlobStoreError::presign(bucket, key, err.to_string()))?;

        let request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|err| {
                BlobStoreError::presign(bucket, key, DisplayErrorContext(err).to_string())
            })?;

        Ok(request.uri().to_string())
    }
}
