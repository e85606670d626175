//! Table-store backend implementations.
//!
//! Concrete implementations of the repository traits defined in
//! `snapfeed_core::storage`, selected at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): in-memory backend for testing and development
//! - `dynamodb`: AWS DynamoDB backend using `aws-sdk-dynamodb`
//!
//! Unlike deployment backends, `inmemory` is additive: a `dynamodb` build
//! may still enable it for its test suite.

#[cfg(not(any(feature = "inmemory", feature = "dynamodb")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'dynamodb'. \
    Example: cargo build -p snapfeed --features inmemory"
);

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoRepository;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryRepository;
