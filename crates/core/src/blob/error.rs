use thiserror::Error;

/// Errors that can occur during blob store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BlobStoreError {
    #[error("{operation} failed for {bucket}/{key}: {message}")]
    OperationFailed {
        operation: &'static str,
        bucket: String,
        key: String,
        message: String,
    },
    #[error("presigning failed for {bucket}/{key}: {message}")]
    Presign {
        bucket: String,
        key: String,
        message: String,
    },
}

impl BlobStoreError {
    pub fn operation(
        operation: &'static str,
        bucket: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::OperationFailed {
            operation,
            bucket: bucket.into(),
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn presign(
        bucket: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Presign {
            bucket: bucket.into(),
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Result type for blob store operations.
pub type Result<T> = std::result::Result<T, BlobStoreError>;
