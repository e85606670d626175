//! DynamoDB repository implementation.
//!
//! Implements the repository traits from `snapfeed_core::storage` using
//! DynamoDB. Single-item writes use conditional put/delete; everything that
//! must keep an entity row and a unique-value claim in step goes through
//! `TransactWriteItems` so no partial application is ever observable.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, Delete, Put, TransactWriteItem};
use aws_sdk_dynamodb::Client;
use tracing::{debug, error};
use uuid::Uuid;

use snapfeed_core::post::Post;
use snapfeed_core::storage::{
    CredentialRepository, PostRepository, ProfileRepository, RepositoryError, Result, UniqueClaim,
    UniqueDomain,
};
use snapfeed_core::user::{Credential, Profile};

use crate::config::Config;

use super::conversions::{
    credential_to_item, item_to_credential, item_to_post, item_to_profile, post_to_item,
    profile_to_item,
};
use super::error::{
    map_delete_item_error, map_get_item_error, map_put_item_error, map_query_error,
    map_transact_error, map_update_put_error,
};
use super::{keys, unique};

/// Names of the four DynamoDB tables the repository spans.
#[derive(Debug, Clone)]
pub struct Tables {
    pub posts: String,
    pub credentials: String,
    pub profiles: String,
    pub unique_claims: String,
}

impl From<&Config> for Tables {
    fn from(config: &Config) -> Self {
        Self {
            posts: config.posts_table.clone(),
            credentials: config.credentials_table.clone(),
            profiles: config.profiles_table.clone(),
            unique_claims: config.unique_claims_table.clone(),
        }
    }
}

/// DynamoDB-based repository implementation.
pub struct DynamoRepository {
    client: Client,
    tables: Tables,
}

impl DynamoRepository {
    /// Creates a new repository with the given DynamoDB client and tables.
    pub fn new(client: Client, tables: Tables) -> Self {
        Self { client, tables }
    }

    /// Creates a new repository from environment configuration.
    ///
    /// Uses the AWS SDK default credential chain and the table names from
    /// [`Config::from_env`].
    pub async fn from_env() -> Self {
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = Client::new(&sdk_config);
        let config = Config::from_env();

        Self::new(client, Tables::from(&config))
    }

    /// Builds the conditional put leg persisting `credential`, conditioned
    /// on the row's existence as `must_exist` dictates.
    fn credential_leg(
        &self,
        credential: &Credential,
        must_exist: bool,
    ) -> Result<TransactWriteItem> {
        let condition = if must_exist {
            format!("attribute_exists({})", keys::ATTR_USER_ID)
        } else {
            format!("attribute_not_exists({})", keys::ATTR_USER_ID)
        };

        let put = Put::builder()
            .table_name(&self.tables.credentials)
            .set_item(Some(credential_to_item(credential)))
            .condition_expression(condition)
            .build()
            .map_err(|e| RepositoryError::InvalidData(e.to_string()))?;

        Ok(TransactWriteItem::builder().put(put).build())
    }
}

// ============================================================================
// PostRepository implementation
// ============================================================================

#[async_trait]
impl PostRepository for DynamoRepository {
    async fn get_post(&self, owner_id: Uuid, post_id: Uuid) -> Result<Option<Post>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.tables.posts)
            .set_key(Some(keys::post_key(owner_id, post_id)))
            .send()
            .await
            .map_err(map_get_item_error)?;

        match result.item {
            Some(item) => Ok(Some(item_to_post(&item)?)),
            None => Ok(None),
        }
    }

    async fn get_posts_by_owner(&self, owner_id: Uuid) -> Result<Vec<Post>> {
        let result = self
            .client
            .query()
            .table_name(&self.tables.posts)
            .index_name(keys::POST_CREATED_AT_INDEX)
            .key_condition_expression(format!("{} = :owner", keys::ATTR_OWNER_ID))
            .expression_attribute_values(":owner", AttributeValue::S(owner_id.to_string()))
            .scan_index_forward(false)
            .send()
            .await
            .map_err(map_query_error)?;

        let items = result.items.unwrap_or_default();
        items.iter().map(item_to_post).collect()
    }

    async fn get_completed_posts_by_owner(&self, owner_id: Uuid) -> Result<Vec<Post>> {
        let result = self
            .client
            .query()
            .table_name(&self.tables.posts)
            .index_name(keys::POST_CREATED_AT_INDEX)
            .key_condition_expression(format!("{} = :owner", keys::ATTR_OWNER_ID))
            .expression_attribute_values(":owner", AttributeValue::S(owner_id.to_string()))
            .filter_expression(format!("attribute_not_exists({})", keys::ATTR_PENDING_EXPIRY))
            .scan_index_forward(false)
            .send()
            .await
            .map_err(map_query_error)?;

        let items = result.items.unwrap_or_default();
        items.iter().map(item_to_post).collect()
    }

    async fn get_post_by_blob_key(&self, blob_key: &str) -> Result<Option<Post>> {
        let result = self
            .client
            .query()
            .table_name(&self.tables.posts)
            .index_name(keys::POST_BLOB_KEY_INDEX)
            .key_condition_expression(format!("{} = :blob_key", keys::ATTR_BLOB_KEY))
            .expression_attribute_values(":blob_key", AttributeValue::S(blob_key.to_string()))
            .send()
            .await
            .map_err(map_query_error)?;

        let items = result.items.unwrap_or_default();
        if items.len() > 1 {
            error!(%blob_key, "found multiple posts for blob key, refusing to pick one");
            return Ok(None);
        }

        match items.first() {
            Some(item) => Ok(Some(item_to_post(item)?)),
            None => Ok(None),
        }
    }

    async fn save_post(&self, post: &Post) -> Result<()> {
        debug!(owner_id = %post.owner_id, post_id = %post.post_id, "saving post");

        self.client
            .put_item()
            .table_name(&self.tables.posts)
            .set_item(Some(post_to_item(post)))
            .send()
            .await
            .map_err(|e| map_put_item_error(e, "Post", post.post_id.to_string()))?;

        Ok(())
    }

    async fn delete_post(&self, owner_id: Uuid, post_id: Uuid) -> Result<()> {
        debug!(%owner_id, %post_id, "deleting post");

        self.client
            .delete_item()
            .table_name(&self.tables.posts)
            .set_key(Some(keys::post_key(owner_id, post_id)))
            .condition_expression(format!("attribute_exists({})", keys::ATTR_OWNER_ID))
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, "Post", format!("{owner_id}:{post_id}")))?;

        Ok(())
    }
}

// ============================================================================
// CredentialRepository implementation
// ============================================================================

#[async_trait]
impl CredentialRepository for DynamoRepository {
    async fn get_credential(&self, user_id: Uuid) -> Result<Option<Credential>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.tables.credentials)
            .set_key(Some(keys::credential_key(user_id)))
            .send()
            .await
            .map_err(map_get_item_error)?;

        match result.item {
            Some(item) => Ok(Some(item_to_credential(&item)?)),
            None => Ok(None),
        }
    }

    async fn get_credential_by_email(&self, email: &str) -> Result<Option<Credential>> {
        let result = self
            .client
            .query()
            .table_name(&self.tables.credentials)
            .index_name(keys::CREDENTIAL_EMAIL_INDEX)
            .key_condition_expression(format!("{} = :email", keys::ATTR_EMAIL))
            .expression_attribute_values(":email", AttributeValue::S(email.to_string()))
            .send()
            .await
            .map_err(map_query_error)?;

        let items = result.items.unwrap_or_default();
        if items.len() > 1 {
            error!(%email, "found multiple credentials for email, refusing to pick one");
            return Ok(None);
        }

        match items.first() {
            Some(item) => Ok(Some(item_to_credential(item)?)),
            None => Ok(None),
        }
    }

    async fn insert_credential(&self, credential: &Credential) -> Result<()> {
        debug!(user_id = %credential.user_id, "inserting credential");

        let email_claim = UniqueClaim::email(&credential.email);
        let claim_leg = unique::claim(&self.tables.unique_claims, &email_claim)?;
        let credential_leg = self.credential_leg(credential, false)?;

        // Leg 0 claims the email, leg 1 inserts the credential row.
        self.client
            .transact_write_items()
            .set_transact_items(Some(vec![claim_leg, credential_leg]))
            .send()
            .await
            .map_err(|err| {
                map_transact_error(err, |leg| match leg {
                    0 => RepositoryError::UniqueConflict {
                        value: credential.email.clone(),
                        domain: UniqueDomain::Email,
                    },
                    _ => RepositoryError::AlreadyExists {
                        entity_type: "Credential",
                        id: credential.user_id.to_string(),
                    },
                })
            })?;

        Ok(())
    }

    async fn update_credential(&self, credential: &Credential) -> Result<()> {
        debug!(user_id = %credential.user_id, "updating credential");

        let Some(old) = self.get_credential(credential.user_id).await? else {
            return Err(RepositoryError::NotFound {
                entity_type: "Credential",
                id: credential.user_id.to_string(),
            });
        };

        // An unchanged email keeps its claim; a transaction touching the
        // same claim row twice would be rejected by the store anyway.
        if old.email == credential.email {
            self.client
                .put_item()
                .table_name(&self.tables.credentials)
                .set_item(Some(credential_to_item(credential)))
                .condition_expression(format!("attribute_exists({})", keys::ATTR_USER_ID))
                .send()
                .await
                .map_err(|e| {
                    map_update_put_error(e, "Credential", credential.user_id.to_string())
                })?;
            return Ok(());
        }

        let release_leg = unique::release(&self.tables.unique_claims, &UniqueClaim::email(&old.email))?;
        let claim_leg = unique::claim(
            &self.tables.unique_claims,
            &UniqueClaim::email(&credential.email),
        )?;
        let credential_leg = self.credential_leg(credential, true)?;

        // Ordering: release the old claim, take the new one, rewrite the
        // row. An abort on any leg leaves the old claim in place.
        self.client
            .transact_write_items()
            .set_transact_items(Some(vec![release_leg, claim_leg, credential_leg]))
            .send()
            .await
            .map_err(|err| {
                map_transact_error(err, |leg| match leg {
                    1 => RepositoryError::UniqueConflict {
                        value: credential.email.clone(),
                        domain: UniqueDomain::Email,
                    },
                    2 => RepositoryError::NotFound {
                        entity_type: "Credential",
                        id: credential.user_id.to_string(),
                    },
                    _ => RepositoryError::QueryFailed(
                        "Transaction canceled on claim release".to_string(),
                    ),
                })
            })?;

        Ok(())
    }

    async fn delete_credential(&self, user_id: Uuid) -> Result<()> {
        debug!(%user_id, "deleting credential");

        let Some(old) = self.get_credential(user_id).await? else {
            return Err(RepositoryError::NotFound {
                entity_type: "Credential",
                id: user_id.to_string(),
            });
        };

        let release_leg = unique::release(&self.tables.unique_claims, &UniqueClaim::email(&old.email))?;
        let delete = Delete::builder()
            .table_name(&self.tables.credentials)
            .set_key(Some(keys::credential_key(user_id)))
            .build()
            .map_err(|e| RepositoryError::InvalidData(e.to_string()))?;
        let credential_leg = TransactWriteItem::builder().delete(delete).build();

        self.client
            .transact_write_items()
            .set_transact_items(Some(vec![release_leg, credential_leg]))
            .send()
            .await
            .map_err(|err| {
                map_transact_error(err, |_| {
                    RepositoryError::QueryFailed("Transaction canceled".to_string())
                })
            })?;

        Ok(())
    }
}

// ============================================================================
// ProfileRepository implementation
// ============================================================================

#[async_trait]
impl ProfileRepository for DynamoRepository {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.tables.profiles)
            .set_key(Some(keys::profile_key(user_id)))
            .send()
            .await
            .map_err(map_get_item_error)?;

        match result.item {
            Some(item) => Ok(Some(item_to_profile(&item)?)),
            None => Ok(None),
        }
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<()> {
        debug!(user_id = %profile.user_id, "inserting profile");

        self.client
            .put_item()
            .table_name(&self.tables.profiles)
            .set_item(Some(profile_to_item(profile)))
            .condition_expression(format!("attribute_not_exists({})", keys::ATTR_USER_ID))
            .send()
            .await
            .map_err(|e| map_put_item_error(e, "Profile", profile.user_id.to_string()))?;

        Ok(())
    }
}
