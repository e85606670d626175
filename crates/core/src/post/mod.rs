mod keys;
mod service;
mod types;

pub use keys::{blob_key, file_extension};
pub use service::{PostService, PostServiceConfig};
pub use types::{ImageUpload, Post, PostView};
