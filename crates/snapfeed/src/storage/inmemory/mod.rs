//! In-memory storage backend for testing.
//!
//! Stores all data in HashMaps wrapped in `Arc<RwLock<_>>`. Each table
//! shares one lock with its uniqueness claims, so the claim-check-and-write
//! sections are atomic the same way the deployment backend's conditional
//! transactions are. Data is not persisted and is lost when the repository
//! is dropped.

mod repository;

pub use repository::InMemoryRepository;
