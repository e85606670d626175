use tracing::{debug, error, info};

use crate::error::{Result, ServiceError};
use crate::storage::PostRepository;

use super::types::{parse_message, StorageEvent};

/// Reconciles pending posts with blob-store confirmation notifications.
///
/// This is the only writer of the pending-to-confirmed transition. The
/// notification transport guarantees neither ordering nor delivery count,
/// so every step is idempotent: the transition only ever goes one way and
/// repeating it is a no-op.
pub struct UploadReconciler<R> {
    posts: R,
}

impl<R> UploadReconciler<R>
where
    R: PostRepository,
{
    pub fn new(posts: R) -> Self {
        Self { posts }
    }

    /// Handles one raw queue message, which may batch several events.
    ///
    /// A payload that does not decode is surfaced as a validation error and
    /// left to the transport's poison-message handling; nothing is written.
    pub async fn handle_message(&self, body: &str) -> Result<()> {
        let events = parse_message(body).map_err(|err| {
            ServiceError::Validation(format!("malformed notification payload: {err}"))
        })?;

        for event in &events {
            self.handle_event(event).await?;
        }

        Ok(())
    }

    /// Handles one inbound notification.
    ///
    /// Only `ObjectCreated:Put` events are acted on; everything else is
    /// ignored. Unknown object keys are logged and skipped, not errors: the
    /// notification may refer to an expired or foreign object.
    pub async fn handle_event(&self, event: &StorageEvent) -> Result<()> {
        if !event.is_object_created_put() {
            debug!(
                event_type = %event.event_type,
                object_key = %event.object_key,
                "ignoring notification with non-actionable event type"
            );
            return Ok(());
        }

        info!(
            event_type = %event.event_type,
            bucket = %event.bucket,
            object_key = %event.object_key,
            "received blob store notification"
        );
        self.mark_uploaded(&event.object_key).await
    }

    /// Marks the post owning `blob_key` as uploaded.
    ///
    /// A multi-match on the blob key index is refused upstream: the
    /// repository logs it and reports no match, so this skips too.
    pub async fn mark_uploaded(&self, blob_key: &str) -> Result<()> {
        let Some(mut post) = self.posts.get_post_by_blob_key(blob_key).await? else {
            error!(%blob_key, "no post found for blob key, cannot mark it as uploaded");
            return Ok(());
        };

        if !post.is_pending() {
            debug!(%blob_key, "post is already marked as uploaded, skipping");
            return Ok(());
        }

        post.pending_expiry = None;
        self.posts.save_post(&post).await?;

        Ok(())
    }
}
