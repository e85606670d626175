use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An image post as persisted in the table store.
///
/// Identity is the (owner_id, post_id) pair. A present `pending_expiry`
/// means the post is awaiting its out-of-band upload confirmation; once the
/// confirmation lands the field is cleared and never set again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub owner_id: Uuid,
    pub post_id: Uuid,
    pub description: Option<String>,
    /// Key of the image object in the blob store.
    pub blob_key: Option<String>,
    /// Deadline for the pending upload confirmation; absent once confirmed.
    pub pending_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Creates a confirmed post whose content is already in the blob store.
    pub fn new(
        owner_id: Uuid,
        post_id: Uuid,
        description: Option<String>,
        blob_key: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            owner_id,
            post_id,
            description,
            blob_key: Some(blob_key.into()),
            pending_expiry: None,
            created_at,
            updated_at: created_at,
        }
    }

    /// Marks this post as awaiting upload confirmation until `expiry`.
    pub fn with_pending_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.pending_expiry = Some(expiry);
        self
    }

    /// Returns true while the upload confirmation is still outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending_expiry.is_some()
    }
}

/// Projection of a [`Post`] handed back to callers, with the public image
/// URL derived once the upload is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    pub owner_id: Uuid,
    pub post_id: Uuid,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostView {
    /// Builds the caller-facing projection.
    ///
    /// The image URL is `{store_base_url}/{bucket}/{blob_key}` and is only
    /// present once the post is confirmed; pending posts have no publicly
    /// readable object yet.
    pub fn from_post(post: &Post, store_base_url: &str, bucket: &str) -> Self {
        let image_url = match (&post.blob_key, post.is_pending()) {
            (Some(key), false) => Some(format!("{store_base_url}/{bucket}/{key}")),
            _ => None,
        };

        Self {
            owner_id: post.owner_id,
            post_id: post.post_id,
            description: post.description.clone(),
            image_url,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// An image payload submitted for the immediate-content upload path.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Original filename as submitted; only its extension is retained.
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ImageUpload {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_new_post_is_confirmed() {
        let post = Post::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Some("hello".to_string()),
            "o/2024/6/p.jpg",
            at("2024-06-15T10:30:00Z"),
        );

        assert!(!post.is_pending());
        assert_eq!(post.created_at, post.updated_at);
    }

    #[test]
    fn test_with_pending_expiry() {
        let post = Post::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            None,
            "o/2024/6/p",
            at("2024-06-15T10:30:00Z"),
        )
        .with_pending_expiry(at("2024-06-15T10:35:00Z"));

        assert!(post.is_pending());
    }

    #[test]
    fn test_view_derives_url_for_confirmed_post() {
        let post = Post::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            None,
            "o/2024/6/p.jpg",
            at("2024-06-15T10:30:00Z"),
        );

        let view = PostView::from_post(&post, "https://blobs.example.com", "posts");
        assert_eq!(
            view.image_url.as_deref(),
            Some("https://blobs.example.com/posts/o/2024/6/p.jpg")
        );
    }

    #[test]
    fn test_view_has_no_url_while_pending() {
        let post = Post::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            None,
            "o/2024/6/p",
            at("2024-06-15T10:30:00Z"),
        )
        .with_pending_expiry(at("2024-06-15T10:35:00Z"));

        let view = PostView::from_post(&post, "https://blobs.example.com", "posts");
        assert!(view.image_url.is_none());
    }
}
