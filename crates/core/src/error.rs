//! Service-level error taxonomy.
//!
//! The managers collapse failures into three kinds the boundary layer can
//! dispatch on: user-correctable validation failures, table-store failures
//! and blob-store failures. Each kind carries a machine-readable error code
//! alongside the HTTP status it maps to, as pure functions.

use thiserror::Error;

use crate::blob::BlobStoreError;
use crate::storage::RepositoryError;

/// Failure kinds surfaced by the service managers.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Bad input, or losing a uniqueness race. Not retryable.
    #[error("{0}")]
    Validation(String),
    /// Table-store failure, surfaced to the caller without retry.
    #[error("database failure: {0}")]
    Database(#[from] RepositoryError),
    /// Blob operation failure.
    #[error("blob store failure: {0}")]
    BlobStore(#[from] BlobStoreError),
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Machine-readable error code for a [`ServiceError`].
pub fn service_error_code(error: &ServiceError) -> u16 {
    match error {
        ServiceError::Validation(_) => 460,
        ServiceError::Database(_) => 530,
        ServiceError::BlobStore(_) => 540,
    }
}

/// HTTP status a [`ServiceError`] dispatches to at the boundary.
pub fn service_error_status(error: &ServiceError) -> u16 {
    match error {
        ServiceError::Validation(_) => 400,
        ServiceError::Database(_) | ServiceError::BlobStore(_) => 500,
    }
}
