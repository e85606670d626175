mod error;
mod traits;

pub use error::{BlobStoreError, Result};
pub use traits::BlobStore;
