//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and
//! domain types. These are testable in isolation without DynamoDB access.
//!
//! Timestamps persist as RFC 3339 strings except the pending-upload expiry,
//! which persists as epoch seconds in a number attribute so the table's TTL
//! sweeper can consume it directly.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use snapfeed_core::post::Post;
use snapfeed_core::storage::RepositoryError;
use snapfeed_core::user::{Credential, Profile, Role};

use super::keys;

// ============================================================================
// Post conversions
// ============================================================================

/// Convert a Post to a DynamoDB item.
pub fn post_to_item(post: &Post) -> HashMap<String, AttributeValue> {
    let mut item = keys::post_key(post.owner_id, post.post_id);

    if let Some(description) = &post.description {
        item.insert(
            keys::ATTR_DESCRIPTION.to_string(),
            AttributeValue::S(description.clone()),
        );
    }
    if let Some(blob_key) = &post.blob_key {
        item.insert(
            keys::ATTR_BLOB_KEY.to_string(),
            AttributeValue::S(blob_key.clone()),
        );
    }
    if let Some(expiry) = post.pending_expiry {
        item.insert(
            keys::ATTR_PENDING_EXPIRY.to_string(),
            AttributeValue::N(expiry.timestamp().to_string()),
        );
    }
    item.insert(
        keys::ATTR_CREATED_AT.to_string(),
        AttributeValue::S(post.created_at.to_rfc3339()),
    );
    item.insert(
        keys::ATTR_UPDATED_AT.to_string(),
        AttributeValue::S(post.updated_at.to_rfc3339()),
    );

    item
}

/// Convert a DynamoDB item to a Post.
pub fn item_to_post(item: &HashMap<String, AttributeValue>) -> Result<Post, RepositoryError> {
    Ok(Post {
        owner_id: get_uuid(item, keys::ATTR_OWNER_ID)?,
        post_id: get_uuid(item, keys::ATTR_POST_ID)?,
        description: get_optional_string(item, keys::ATTR_DESCRIPTION),
        blob_key: get_optional_string(item, keys::ATTR_BLOB_KEY),
        pending_expiry: get_optional_epoch_seconds(item, keys::ATTR_PENDING_EXPIRY)?,
        created_at: get_datetime(item, keys::ATTR_CREATED_AT)?,
        updated_at: get_datetime(item, keys::ATTR_UPDATED_AT)?,
    })
}

// ============================================================================
// Credential conversions
// ============================================================================

/// Convert a Credential to a DynamoDB item.
pub fn credential_to_item(credential: &Credential) -> HashMap<String, AttributeValue> {
    let mut item = keys::credential_key(credential.user_id);

    item.insert(
        keys::ATTR_EMAIL.to_string(),
        AttributeValue::S(credential.email.clone()),
    );
    item.insert(
        keys::ATTR_PASSWORD_HASH.to_string(),
        AttributeValue::S(credential.password_hash.clone()),
    );

    item
}

/// Convert a DynamoDB item to a Credential.
pub fn item_to_credential(
    item: &HashMap<String, AttributeValue>,
) -> Result<Credential, RepositoryError> {
    Ok(Credential {
        user_id: get_uuid(item, keys::ATTR_USER_ID)?,
        email: get_string(item, keys::ATTR_EMAIL)?,
        password_hash: get_string(item, keys::ATTR_PASSWORD_HASH)?,
    })
}

// ============================================================================
// Profile conversions
// ============================================================================

/// Convert a Profile to a DynamoDB item.
pub fn profile_to_item(profile: &Profile) -> HashMap<String, AttributeValue> {
    let mut item = keys::profile_key(profile.user_id);

    item.insert(
        keys::ATTR_FIRST_NAME.to_string(),
        AttributeValue::S(profile.first_name.clone()),
    );
    item.insert(
        keys::ATTR_LAST_NAME.to_string(),
        AttributeValue::S(profile.last_name.clone()),
    );
    item.insert(
        keys::ATTR_ROLE_ID.to_string(),
        AttributeValue::N(profile.role.id().to_string()),
    );
    item.insert(
        keys::ATTR_CREATED_AT.to_string(),
        AttributeValue::S(profile.created_at.to_rfc3339()),
    );

    item
}

/// Convert a DynamoDB item to a Profile.
pub fn item_to_profile(
    item: &HashMap<String, AttributeValue>,
) -> Result<Profile, RepositoryError> {
    let role_id: u8 = item
        .get(keys::ATTR_ROLE_ID)
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| {
            RepositoryError::InvalidData(format!("Missing or invalid field: {}", keys::ATTR_ROLE_ID))
        })?;
    let role = Role::from_id(role_id)
        .ok_or_else(|| RepositoryError::InvalidData(format!("Unknown role id: {role_id}")))?;

    Ok(Profile {
        user_id: get_uuid(item, keys::ATTR_USER_ID)?,
        first_name: get_string(item, keys::ATTR_FIRST_NAME)?,
        last_name: get_string(item, keys::ATTR_LAST_NAME)?,
        role,
        created_at: get_datetime(item, keys::ATTR_CREATED_AT)?,
    })
}

// ============================================================================
// Helper functions
// ============================================================================

/// Get a required string attribute.
fn get_string(
    item: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<String, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {}", key)))
}

/// Get an optional string attribute.
fn get_optional_string(item: &HashMap<String, AttributeValue>, key: &str) -> Option<String> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
}

/// Get a required UUID attribute.
fn get_uuid(item: &HashMap<String, AttributeValue>, key: &str) -> Result<Uuid, RepositoryError> {
    let s = get_string(item, key)?;
    Uuid::parse_str(&s)
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid UUID {}: {}", key, e)))
}

/// Get a required datetime attribute (RFC 3339 format).
fn get_datetime(
    item: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<DateTime<Utc>, RepositoryError> {
    let s = get_string(item, key)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid datetime {}: {}", key, e)))
}

/// Get an optional number attribute holding epoch seconds.
fn get_optional_epoch_seconds(
    item: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<Option<DateTime<Utc>>, RepositoryError> {
    let Some(value) = item.get(key) else {
        return Ok(None);
    };

    let seconds: i64 = value
        .as_n()
        .ok()
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| RepositoryError::InvalidData(format!("Invalid number field: {}", key)))?;

    DateTime::from_timestamp(seconds, 0)
        .map(Some)
        .ok_or_else(|| RepositoryError::InvalidData(format!("Epoch out of range: {}", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_post() -> Post {
        Post::new(
            Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap(),
            Uuid::parse_str("550e8400-e29b-41d4-a716-446655440002").unwrap(),
            Some("a sunset".to_string()),
            "550e8400-e29b-41d4-a716-446655440001/2024/6/550e8400-e29b-41d4-a716-446655440002.jpg",
            Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap(),
        )
    }

    fn sample_credential() -> Credential {
        Credential {
            user_id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap(),
            email: "john@example.com".to_string(),
            password_hash: "$2b$someencodedhash".to_string(),
        }
    }

    fn sample_profile() -> Profile {
        Profile {
            user_id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            role: Role::User,
            created_at: Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_post_round_trip() {
        let post = sample_post();
        let item = post_to_item(&post);
        let parsed = item_to_post(&item).unwrap();

        assert_eq!(post, parsed);
    }

    #[test]
    fn test_pending_post_round_trip() {
        let post = sample_post()
            .with_pending_expiry(Utc.with_ymd_and_hms(2024, 6, 15, 10, 35, 0).unwrap());
        let item = post_to_item(&post);

        assert_eq!(
            item.get(keys::ATTR_PENDING_EXPIRY).unwrap().as_n().unwrap(),
            &post.pending_expiry.unwrap().timestamp().to_string()
        );

        let parsed = item_to_post(&item).unwrap();
        assert_eq!(post, parsed);
    }

    #[test]
    fn test_confirmed_post_has_no_expiry_attribute() {
        let item = post_to_item(&sample_post());
        assert!(!item.contains_key(keys::ATTR_PENDING_EXPIRY));
    }

    #[test]
    fn test_post_without_description() {
        let mut post = sample_post();
        post.description = None;

        let item = post_to_item(&post);
        assert!(!item.contains_key(keys::ATTR_DESCRIPTION));

        let parsed = item_to_post(&item).unwrap();
        assert!(parsed.description.is_none());
    }

    #[test]
    fn test_credential_round_trip() {
        let credential = sample_credential();
        let item = credential_to_item(&credential);
        let parsed = item_to_credential(&item).unwrap();

        assert_eq!(credential, parsed);
    }

    #[test]
    fn test_profile_round_trip() {
        let profile = sample_profile();
        let item = profile_to_item(&profile);

        assert_eq!(item.get(keys::ATTR_ROLE_ID).unwrap().as_n().unwrap(), "2");

        let parsed = item_to_profile(&item).unwrap();
        assert_eq!(profile, parsed);
    }

    #[test]
    fn test_item_to_profile_rejects_unknown_role() {
        let mut item = profile_to_item(&sample_profile());
        item.insert(
            keys::ATTR_ROLE_ID.to_string(),
            AttributeValue::N("9".to_string()),
        );

        assert!(matches!(
            item_to_profile(&item),
            Err(RepositoryError::InvalidData(_))
        ));
    }

    #[test]
    fn test_get_string_missing_field() {
        let item = HashMap::new();
        assert!(get_string(&item, "missing").is_err());
    }
}
