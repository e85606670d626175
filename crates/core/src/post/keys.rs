//! Blob key derivation.
//!
//! Pure functions for deriving the canonical blob key of a post. The layout
//! is `{owner_id}/{year}/{month}/{post_id}{extension}` and must stay
//! bit-for-bit stable: confirmation notifications and public image URLs both
//! reference objects by this exact key.

use chrono::{DateTime, Datelike, Utc};
use uuid::Uuid;

/// Extracts the extension of `filename`, including the leading dot.
///
/// The extension is everything from the last `.` onward; a filename without
/// a dot has the empty extension.
pub fn file_extension(filename: &str) -> &str {
    filename
        .rfind('.')
        .map(|index| &filename[index..])
        .unwrap_or("")
}

/// Derives the canonical blob key for a post.
///
/// Pattern: `{owner_id}/{year}/{month}/{post_id}{extension}`, with the
/// month unpadded. Pass an empty extension for the deferred-upload path,
/// where no filename exists yet.
pub fn blob_key(
    owner_id: Uuid,
    created_at: DateTime<Utc>,
    post_id: Uuid,
    extension: &str,
) -> String {
    format!(
        "{}/{}/{}/{}{}",
        owner_id,
        created_at.year(),
        created_at.month(),
        post_id,
        extension
    )
}
