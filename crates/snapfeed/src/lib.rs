//! Storage backends and configuration for the snapfeed image-post backend.
//!
//! The consistency engine itself lives in `snapfeed_core`; this crate
//! provides the concrete table-store and blob-store backends it runs
//! against, selected via feature flags, plus environment-driven
//! configuration.

pub mod blob;
pub mod config;
pub mod storage;
