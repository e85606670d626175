//! Blob store backend implementations.
//!
//! Concrete implementations of the `snapfeed_core::blob::BlobStore` trait:
//! an in-memory store for testing and an S3 backend behind the `s3`
//! feature.

#[cfg(feature = "inmemory")]
mod memory;

#[cfg(feature = "s3")]
mod s3;

#[cfg(feature = "inmemory")]
pub use memory::InMemoryBlobStore;

#[cfg(feature = "s3")]
pub use s3::S3BlobStore;
