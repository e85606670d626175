//! In-memory repository implementation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::error;
use uuid::Uuid;

use snapfeed_core::post::Post;
use snapfeed_core::storage::{
    CredentialRepository, PostRepository, ProfileRepository, RepositoryError, Result, UniqueDomain,
};
use snapfeed_core::user::{Credential, Profile};

/// Credential rows and the unique-value claims guarding them.
///
/// Both live behind the same lock so a claim check and the write it guards
/// cannot interleave with another writer, mirroring the all-or-nothing
/// conditional transactions of the deployment backend.
#[derive(Debug, Default)]
struct CredentialStore {
    rows: HashMap<Uuid, Credential>,
    claims: HashSet<(String, UniqueDomain)>,
}

/// In-memory storage backend for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    posts: Arc<RwLock<HashMap<(Uuid, Uuid), Post>>>,
    credentials: Arc<RwLock<CredentialStore>>,
    profiles: Arc<RwLock<HashMap<Uuid, Profile>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `value` is currently claimed within `domain`.
    pub async fn has_claim(&self, value: &str, domain: UniqueDomain) -> bool {
        let store = self.credentials.read().await;
        store.claims.contains(&(value.to_string(), domain))
    }

    /// Total number of live unique-value claims.
    pub async fn claim_count(&self) -> usize {
        let store = self.credentials.read().await;
        store.claims.len()
    }
}

#[async_trait]
impl PostRepository for InMemoryRepository {
    async fn get_post(&self, owner_id: Uuid, post_id: Uuid) -> Result<Option<Post>> {
        let posts = self.posts.read().await;
        Ok(posts.get(&(owner_id, post_id)).cloned())
    }

    async fn get_posts_by_owner(&self, owner_id: Uuid) -> Result<Vec<Post>> {
        let posts = self.posts.read().await;
        let mut result: Vec<Post> = posts
            .values()
            .filter(|post| post.owner_id == owner_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn get_completed_posts_by_owner(&self, owner_id: Uuid) -> Result<Vec<Post>> {
        let posts = self.posts.read().await;
        let mut result: Vec<Post> = posts
            .values()
            .filter(|post| post.owner_id == owner_id && !post.is_pending())
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn get_post_by_blob_key(&self, blob_key: &str) -> Result<Option<Post>> {
        let posts = self.posts.read().await;
        let matches: Vec<&Post> = posts
            .values()
            .filter(|post| post.blob_key.as_deref() == Some(blob_key))
            .collect();

        if matches.len() > 1 {
            error!(%blob_key, "found multiple posts for blob key, refusing to pick one");
            return Ok(None);
        }

        Ok(matches.first().map(|post| (*post).clone()))
    }

    async fn save_post(&self, post: &Post) -> Result<()> {
        let mut posts = self.posts.write().await;
        posts.insert((post.owner_id, post.post_id), post.clone());
        Ok(())
    }

    async fn delete_post(&self, owner_id: Uuid, post_id: Uuid) -> Result<()> {
        let mut posts = self.posts.write().await;
        if posts.remove(&(owner_id, post_id)).is_none() {
            return Err(RepositoryError::NotFound {
                entity_type: "Post",
                id: format!("{owner_id}:{post_id}"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialRepository for InMemoryRepository {
    async fn get_credential(&self, user_id: Uuid) -> Result<Option<Credential>> {
        let store = self.credentials.read().await;
        Ok(store.rows.get(&user_id).cloned())
    }

    async fn get_credential_by_email(&self, email: &str) -> Result<Option<Credential>> {
        let store = self.credentials.read().await;
        Ok(store
            .rows
            .values()
            .find(|credential| credential.email == email)
            .cloned())
    }

    async fn insert_credential(&self, credential: &Credential) -> Result<()> {
        let mut store = self.credentials.write().await;

        let claim = (credential.email.clone(), UniqueDomain::Email);
        if store.claims.contains(&claim) {
            return Err(RepositoryError::UniqueConflict {
                value: credential.email.clone(),
                domain: UniqueDomain::Email,
            });
        }
        if store.rows.contains_key(&credential.user_id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Credential",
                id: credential.user_id.to_string(),
            });
        }

        store.claims.insert(claim);
        store.rows.insert(credential.user_id, credential.clone());
        Ok(())
    }

    async fn update_credential(&self, credential: &Credential) -> Result<()> {
        let mut store = self.credentials.write().await;

        let Some(old) = store.rows.get(&credential.user_id).cloned() else {
            return Err(RepositoryError::NotFound {
                entity_type: "Credential",
                id: credential.user_id.to_string(),
            });
        };

        if old.email != credential.email {
            let new_claim = (credential.email.clone(), UniqueDomain::Email);
            if store.claims.contains(&new_claim) {
                return Err(RepositoryError::UniqueConflict {
                    value: credential.email.clone(),
                    domain: UniqueDomain::Email,
                });
            }
            store.claims.remove(&(old.email, UniqueDomain::Email));
            store.claims.insert(new_claim);
        }

        store.rows.insert(credential.user_id, credential.clone());
        Ok(())
    }

    async fn delete_credential(&self, user_id: Uuid) -> Result<()> {
        let mut store = self.credentials.write().await;

        let Some(old) = store.rows.remove(&user_id) else {
            return Err(RepositoryError::NotFound {
                entity_type: "Credential",
                id: user_id.to_string(),
            });
        };

        store.claims.remove(&(old.email, UniqueDomain::Email));
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryRepository {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(&user_id).cloned())
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<()> {
        let mut profiles = self.profiles.write().await;
        if profiles.contains_key(&profile.user_id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Profile",
                id: profile.user_id.to_string(),
            });
        }
        profiles.insert(profile.user_id, profile.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use snapfeed_core::user::Role;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn post(owner_id: Uuid, key: &str, created_at: DateTime<Utc>) -> Post {
        Post::new(owner_id, Uuid::new_v4(), None, key, created_at)
    }

    fn credential(email: &str) -> Credential {
        Credential {
            user_id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: "hashed".to_string(),
        }
    }

    fn profile() -> Profile {
        Profile {
            user_id: Uuid::new_v4(),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            role: Role::User,
            created_at: Utc::now(),
        }
    }

    // ==================== Post tests ====================

    #[tokio::test]
    async fn test_post_save_and_get() {
        let repo = InMemoryRepository::new();
        let post = post(Uuid::new_v4(), "o/2024/6/a.jpg", Utc::now());

        repo.save_post(&post).await.unwrap();

        let found = repo.get_post(post.owner_id, post.post_id).await.unwrap();
        assert_eq!(found, Some(post));
    }

    #[tokio::test]
    async fn test_get_post_nonexistent() {
        let repo = InMemoryRepository::new();
        let found = repo.get_post(Uuid::new_v4(), Uuid::new_v4()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_save_post_overwrites() {
        let repo = InMemoryRepository::new();
        let mut post = post(Uuid::new_v4(), "o/2024/6/a.jpg", Utc::now());

        repo.save_post(&post).await.unwrap();
        post.description = Some("updated".to_string());
        repo.save_post(&post).await.unwrap();

        let found = repo
            .get_post(post.owner_id, post.post_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.description.as_deref(), Some("updated"));
    }

    #[tokio::test]
    async fn test_delete_post() {
        let repo = InMemoryRepository::new();
        let post = post(Uuid::new_v4(), "o/2024/6/a.jpg", Utc::now());

        repo.save_post(&post).await.unwrap();
        repo.delete_post(post.owner_id, post.post_id).await.unwrap();

        assert!(repo
            .get_post(post.owner_id, post.post_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_post_nonexistent() {
        let repo = InMemoryRepository::new();
        let result = repo.delete_post(Uuid::new_v4(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_get_posts_by_owner_newest_first() {
        let repo = InMemoryRepository::new();
        let owner = Uuid::new_v4();
        let start = at("2024-06-15T10:00:00Z");

        let older = post(owner, "o/2024/6/older.jpg", start);
        let newer = post(owner, "o/2024/6/newer.jpg", start + Duration::minutes(5));
        let foreign = post(Uuid::new_v4(), "x/2024/6/other.jpg", start);

        repo.save_post(&older).await.unwrap();
        repo.save_post(&newer).await.unwrap();
        repo.save_post(&foreign).await.unwrap();

        let posts = repo.get_posts_by_owner(owner).await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].post_id, newer.post_id);
        assert_eq!(posts[1].post_id, older.post_id);
    }

    #[tokio::test]
    async fn test_get_completed_posts_excludes_pending() {
        let repo = InMemoryRepository::new();
        let owner = Uuid::new_v4();
        let now = Utc::now();

        let confirmed = post(owner, "o/2024/6/confirmed.jpg", now);
        let pending =
            post(owner, "o/2024/6/pending", now).with_pending_expiry(now + Duration::minutes(5));

        repo.save_post(&confirmed).await.unwrap();
        repo.save_post(&pending).await.unwrap();

        let posts = repo.get_completed_posts_by_owner(owner).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].post_id, confirmed.post_id);
    }

    #[tokio::test]
    async fn test_get_post_by_blob_key() {
        let repo = InMemoryRepository::new();
        let post = post(Uuid::new_v4(), "o/2024/6/a.jpg", Utc::now());

        repo.save_post(&post).await.unwrap();

        let found = repo.get_post_by_blob_key("o/2024/6/a.jpg").await.unwrap();
        assert_eq!(found.map(|p| p.post_id), Some(post.post_id));
    }

    #[tokio::test]
    async fn test_get_post_by_blob_key_refuses_multiple_matches() {
        let repo = InMemoryRepository::new();
        let owner = Uuid::new_v4();

        repo.save_post(&post(owner, "o/2024/6/dup.jpg", Utc::now()))
            .await
            .unwrap();
        repo.save_post(&post(owner, "o/2024/6/dup.jpg", Utc::now()))
            .await
            .unwrap();

        let found = repo.get_post_by_blob_key("o/2024/6/dup.jpg").await.unwrap();
        assert!(found.is_none());
    }

    // ==================== Credential tests ====================

    #[tokio::test]
    async fn test_insert_credential_claims_email() {
        let repo = InMemoryRepository::new();
        let credential = credential("alice@example.com");

        repo.insert_credential(&credential).await.unwrap();

        assert!(repo.has_claim("alice@example.com", UniqueDomain::Email).await);
        assert_eq!(repo.claim_count().await, 1);

        let found = repo.get_credential_by_email("alice@example.com").await.unwrap();
        assert_eq!(found, Some(credential));
    }

    #[tokio::test]
    async fn test_insert_credential_conflicts_on_claimed_email() {
        let repo = InMemoryRepository::new();

        repo.insert_credential(&credential("alice@example.com"))
            .await
            .unwrap();
        let result = repo.insert_credential(&credential("alice@example.com")).await;

        assert!(matches!(
            result,
            Err(RepositoryError::UniqueConflict { .. })
        ));
        assert_eq!(repo.claim_count().await, 1);
    }

    #[tokio::test]
    async fn test_update_credential_moves_claim() {
        let repo = InMemoryRepository::new();
        let mut credential = credential("alice@example.com");

        repo.insert_credential(&credential).await.unwrap();

        credential.email = "alice@new.example.com".to_string();
        repo.update_credential(&credential).await.unwrap();

        assert!(!repo.has_claim("alice@example.com", UniqueDomain::Email).await);
        assert!(
            repo.has_claim("alice@new.example.com", UniqueDomain::Email)
                .await
        );
        assert_eq!(repo.claim_count().await, 1);
    }

    #[tokio::test]
    async fn test_update_credential_conflict_keeps_old_claim() {
        let repo = InMemoryRepository::new();
        let mut alice = credential("alice@example.com");
        let bob = credential("bob@example.com");

        repo.insert_credential(&alice).await.unwrap();
        repo.insert_credential(&bob).await.unwrap();

        alice.email = "bob@example.com".to_string();
        let result = repo.update_credential(&alice).await;

        assert!(matches!(
            result,
            Err(RepositoryError::UniqueConflict { .. })
        ));
        assert!(repo.has_claim("alice@example.com", UniqueDomain::Email).await);

        let unchanged = repo.get_credential(alice.user_id).await.unwrap().unwrap();
        assert_eq!(unchanged.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_update_credential_same_email_keeps_claim() {
        let repo = InMemoryRepository::new();
        let mut credential = credential("alice@example.com");

        repo.insert_credential(&credential).await.unwrap();

        credential.password_hash = "rehashed".to_string();
        repo.update_credential(&credential).await.unwrap();

        assert!(repo.has_claim("alice@example.com", UniqueDomain::Email).await);
        assert_eq!(repo.claim_count().await, 1);
    }

    #[tokio::test]
    async fn test_update_credential_nonexistent() {
        let repo = InMemoryRepository::new();
        let result = repo.update_credential(&credential("ghost@example.com")).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_credential_releases_claim() {
        let repo = InMemoryRepository::new();
        let credential = credential("alice@example.com");

        repo.insert_credential(&credential).await.unwrap();
        repo.delete_credential(credential.user_id).await.unwrap();

        assert!(!repo.has_claim("alice@example.com", UniqueDomain::Email).await);
        assert!(repo
            .get_credential(credential.user_id)
            .await
            .unwrap()
            .is_none());
    }

    // ==================== Profile tests ====================

    #[tokio::test]
    async fn test_insert_profile_and_get() {
        let repo = InMemoryRepository::new();
        let profile = profile();

        repo.insert_profile(&profile).await.unwrap();

        let found = repo.get_profile(profile.user_id).await.unwrap();
        assert_eq!(found, Some(profile));
    }

    #[tokio::test]
    async fn test_insert_profile_twice_fails() {
        let repo = InMemoryRepository::new();
        let profile = profile();

        repo.insert_profile(&profile).await.unwrap();
        let result = repo.insert_profile(&profile).await;

        assert!(matches!(
            result,
            Err(RepositoryError::AlreadyExists { .. })
        ));
    }
}
