use std::time::Duration;

use chrono::Utc;
use tracing::error;
use uuid::Uuid;

use crate::blob::BlobStore;
use crate::error::{Result, ServiceError};
use crate::storage::PostRepository;

use super::keys::{blob_key, file_extension};
use super::types::{ImageUpload, Post, PostView};

/// Tunables for the post lifecycle service.
#[derive(Debug, Clone)]
pub struct PostServiceConfig {
    /// Blob store bucket holding post images.
    pub bucket: String,
    /// Public base URL of the blob store, used to derive image URLs.
    pub store_base_url: String,
    /// Maximum description length in characters.
    pub description_max_length: usize,
    /// Content types accepted on the immediate upload path.
    pub allowed_content_types: Vec<String>,
    /// How long a deferred-upload post may stay unconfirmed.
    pub pending_ttl: Duration,
    /// Validity window of presigned upload URLs.
    pub presign_ttl: Duration,
}

/// Orchestrates the post lifecycle across the table store and the blob
/// store.
///
/// The two stores share no transaction, so every operation that touches
/// both follows the same discipline: write the blob first and the metadata
/// second (creation), or remove the metadata first and the blob second
/// (deletion). A crash between the two steps can only ever leave an
/// unreferenced blob behind, never a post row pointing at a missing object.
pub struct PostService<R, B> {
    repository: R,
    blobs: B,
    config: PostServiceConfig,
}

impl<R, B> PostService<R, B>
where
    R: PostRepository,
    B: BlobStore,
{
    pub fn new(repository: R, blobs: B, config: PostServiceConfig) -> Self {
        Self {
            repository,
            blobs,
            config,
        }
    }

    /// Creates a post whose image content is uploaded through this call.
    ///
    /// The blob is written before the metadata row; if persisting the row
    /// fails the blob is deleted again (best effort) and the original error
    /// surfaces.
    pub async fn upload(
        &self,
        owner_id: Uuid,
        description: Option<&str>,
        image: ImageUpload,
    ) -> Result<PostView> {
        self.validate_description(description)?;

        if image.bytes.is_empty() {
            return Err(ServiceError::Validation(
                "cannot upload a post without image content".to_string(),
            ));
        }

        if !self
            .config
            .allowed_content_types
            .iter()
            .any(|allowed| allowed == &image.content_type)
        {
            return Err(ServiceError::Validation(
                "invalid image content type".to_string(),
            ));
        }

        let post_id = Uuid::new_v4();
        let created_at = Utc::now();
        let key = blob_key(
            owner_id,
            created_at,
            post_id,
            file_extension(&image.filename),
        );

        self.blobs
            .put(&self.config.bucket, &key, image.bytes, &image.content_type)
            .await?;

        let post = Post::new(
            owner_id,
            post_id,
            description.map(str::to_string),
            key.clone(),
            created_at,
        );

        if let Err(err) = self.repository.save_post(&post).await {
            // Compensate: the row never landed, so the blob must not stay.
            if let Err(cleanup) = self.blobs.delete(&self.config.bucket, &key).await {
                error!(
                    blob_key = %key,
                    error = %cleanup,
                    "failed to delete blob while compensating for a post save failure"
                );
            }
            return Err(err.into());
        }

        Ok(self.view(&post))
    }

    /// Creates a pending post and returns a presigned URL the caller uploads
    /// the image to directly.
    ///
    /// No bytes move through this service; the post stays pending until the
    /// confirmation notification for its blob key arrives.
    pub async fn create_pending(&self, owner_id: Uuid, description: Option<&str>) -> Result<String> {
        self.validate_description(description)?;

        let post_id = Uuid::new_v4();
        let created_at = Utc::now();
        let key = blob_key(owner_id, created_at, post_id, "");

        let upload_url = self
            .blobs
            .presign_put(&self.config.bucket, &key, self.config.presign_ttl)
            .await?;

        let expiry = created_at + chrono::Duration::seconds(self.config.pending_ttl.as_secs() as i64);
        let post = Post::new(
            owner_id,
            post_id,
            description.map(str::to_string),
            key,
            created_at,
        )
        .with_pending_expiry(expiry);

        // Nothing was uploaded yet, so there is no blob to compensate for.
        self.repository.save_post(&post).await?;

        Ok(upload_url)
    }

    /// Replaces the description of an existing post.
    pub async fn update(
        &self,
        owner_id: Uuid,
        post_id: Uuid,
        description: Option<&str>,
    ) -> Result<PostView> {
        self.validate_description(description)?;

        let Some(mut post) = self.repository.get_post(owner_id, post_id).await? else {
            return Err(ServiceError::Validation("invalid post id".to_string()));
        };

        post.description = description.map(str::to_string);
        post.updated_at = Utc::now();
        self.repository.save_post(&post).await?;

        Ok(self.view(&post))
    }

    /// Deletes a post and its image.
    ///
    /// The metadata row goes first, the blob second: a failure in between
    /// leaves an unreachable blob rather than a post row pointing at a
    /// deleted object.
    pub async fn delete(&self, owner_id: Uuid, post_id: Uuid) -> Result<()> {
        let Some(post) = self.repository.get_post(owner_id, post_id).await? else {
            return Err(ServiceError::Validation("invalid post id".to_string()));
        };

        self.repository.delete_post(owner_id, post_id).await?;

        if let Some(key) = &post.blob_key {
            self.blobs.delete(&self.config.bucket, key).await?;
        }

        Ok(())
    }

    /// Lists all of the owner's posts, newest first.
    pub async fn find_all(&self, owner_id: Uuid) -> Result<Vec<PostView>> {
        let posts = self.repository.get_posts_by_owner(owner_id).await?;
        Ok(posts.iter().map(|post| self.view(post)).collect())
    }

    /// Lists the owner's confirmed posts, newest first.
    pub async fn find_completed(&self, owner_id: Uuid) -> Result<Vec<PostView>> {
        let posts = self.repository.get_completed_posts_by_owner(owner_id).await?;
        Ok(posts.iter().map(|post| self.view(post)).collect())
    }

    fn view(&self, post: &Post) -> PostView {
        PostView::from_post(post, &self.config.store_base_url, &self.config.bucket)
    }

    fn validate_description(&self, description: Option<&str>) -> Result<()> {
        if let Some(description) = description {
            if description.chars().count() > self.config.description_max_length {
                return Err(ServiceError::Validation(format!(
                    "description exceeds the character limit of {}",
                    self.config.description_max_length
                )));
            }
        }
        Ok(())
    }
}
