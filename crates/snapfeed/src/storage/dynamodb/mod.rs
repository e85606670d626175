//! DynamoDB storage backend implementation.
//!
//! Implements the repository traits from `snapfeed_core::storage` on top of
//! `aws-sdk-dynamodb`. Four tables are used: posts, credentials, profiles
//! and the unique-value claims table that backs the synthetic unique index.
//! Every multi-item write goes through `TransactWriteItems` so either all
//! legs commit or none do.

mod conversions;
mod error;
mod keys;
mod repository;
mod unique;

pub use repository::{DynamoRepository, Tables};
