//! Core consistency engine for the snapfeed image-post backend.
//!
//! This crate contains the storage-agnostic heart of the system: domain
//! types, repository and blob-store traits, the post lifecycle and credential
//! onboarding services, and the upload confirmation reconciler. Concrete
//! storage backends live in the `snapfeed` crate and are selected there via
//! feature flags.

pub mod blob;
pub mod error;
pub mod notification;
pub mod post;
pub mod storage;
pub mod user;
