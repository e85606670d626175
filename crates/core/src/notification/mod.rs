mod reconciler;
mod types;

pub use reconciler::UploadReconciler;
pub use types::{parse_message, StorageEvent};
