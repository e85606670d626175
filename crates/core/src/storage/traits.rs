use async_trait::async_trait;
use uuid::Uuid;

use crate::post::Post;
use crate::user::{Credential, Profile};

use super::Result;

/// Repository for post metadata.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Gets a post by its composite identity.
    async fn get_post(&self, owner_id: Uuid, post_id: Uuid) -> Result<Option<Post>>;

    /// Gets all posts for an owner, newest first.
    async fn get_posts_by_owner(&self, owner_id: Uuid) -> Result<Vec<Post>>;

    /// Gets the owner's posts whose upload has been confirmed, newest first.
    async fn get_completed_posts_by_owner(&self, owner_id: Uuid) -> Result<Vec<Post>>;

    /// Looks a post up by its blob key via the secondary index.
    ///
    /// Blob keys are expected to be unique across posts. If the index
    /// unexpectedly yields more than one row the implementation must log the
    /// anomaly and return `None` so the caller skips rather than guesses.
    async fn get_post_by_blob_key(&self, blob_key: &str) -> Result<Option<Post>>;

    /// Persists a post unconditionally, overwriting any previous revision.
    async fn save_post(&self, post: &Post) -> Result<()>;

    /// Deletes a post by its composite identity.
    async fn delete_post(&self, owner_id: Uuid, post_id: Uuid) -> Result<()>;
}

/// Repository for login credentials.
///
/// Email uniqueness is enforced through the synthetic unique index: every
/// write that touches an email address also claims or releases the matching
/// [`UniqueClaim`](super::UniqueClaim) row, inside one atomic transaction.
/// No implementation may let a credential row and its claim diverge outside
/// an in-flight transaction.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Gets a credential by user id.
    async fn get_credential(&self, user_id: Uuid) -> Result<Option<Credential>>;

    /// Looks a credential up by email via the secondary index.
    ///
    /// Same multi-match contract as
    /// [`PostRepository::get_post_by_blob_key`]: more than one row is an
    /// anomaly, logged and reported as `None`.
    async fn get_credential_by_email(&self, email: &str) -> Result<Option<Credential>>;

    /// Inserts a credential and claims its email atomically.
    ///
    /// Both writes are conditioned on non-existence; a lost race on either
    /// surfaces as [`UniqueConflict`](super::RepositoryError::UniqueConflict)
    /// or [`AlreadyExists`](super::RepositoryError::AlreadyExists) with
    /// nothing applied.
    async fn insert_credential(&self, credential: &Credential) -> Result<()>;

    /// Rewrites a credential, moving its email claim atomically.
    ///
    /// Executes release-old-claim, claim-new (conditioned on non-existence)
    /// and put-credential (conditioned on existence) as one transaction, so
    /// an abort leaves the old claim intact rather than orphaning it.
    async fn update_credential(&self, credential: &Credential) -> Result<()>;

    /// Deletes a credential and releases its email claim atomically.
    async fn delete_credential(&self, user_id: Uuid) -> Result<()>;
}

/// Repository for user profiles.
///
/// Profiles are created once at signup and never deleted independently; the
/// signup compensation path deletes the just-inserted credential, not a
/// profile.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Gets a profile by user id.
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>>;

    /// Inserts a profile, conditioned on non-existence.
    async fn insert_profile(&self, profile: &Profile) -> Result<()>;
}
