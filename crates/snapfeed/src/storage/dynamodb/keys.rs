//! DynamoDB attribute names, index names and key builders.
//!
//! Key builders are pure functions with no side effects, testable without
//! DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use uuid::Uuid;

use snapfeed_core::storage::UniqueClaim;

// ============================================================================
// Post table
// ============================================================================

pub const ATTR_OWNER_ID: &str = "OwnerId";
pub const ATTR_POST_ID: &str = "PostId";
pub const ATTR_BLOB_KEY: &str = "BlobKey";
pub const ATTR_DESCRIPTION: &str = "Description";
pub const ATTR_PENDING_EXPIRY: &str = "PendingExpiry";
pub const ATTR_CREATED_AT: &str = "CreatedAt";
pub const ATTR_UPDATED_AT: &str = "UpdatedAt";

/// Local secondary index ordering an owner's posts by creation time.
pub const POST_CREATED_AT_INDEX: &str = "CreatedAtIndex";
/// Global secondary index resolving a blob key back to its post.
pub const POST_BLOB_KEY_INDEX: &str = "BlobKeyIndex";

/// Primary key of a post: partition `OwnerId`, sort `PostId`.
pub fn post_key(owner_id: Uuid, post_id: Uuid) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            ATTR_OWNER_ID.to_string(),
            AttributeValue::S(owner_id.to_string()),
        ),
        (
            ATTR_POST_ID.to_string(),
            AttributeValue::S(post_id.to_string()),
        ),
    ])
}

// ============================================================================
// Credential table
// ============================================================================

pub const ATTR_USER_ID: &str = "UserId";
pub const ATTR_EMAIL: &str = "Email";
pub const ATTR_PASSWORD_HASH: &str = "PasswordHash";

/// Global secondary index resolving an email to its credential.
pub const CREDENTIAL_EMAIL_INDEX: &str = "EmailIndex";

/// Primary key of a credential: partition `UserId`.
pub fn credential_key(user_id: Uuid) -> HashMap<String, AttributeValue> {
    HashMap::from([(
        ATTR_USER_ID.to_string(),
        AttributeValue::S(user_id.to_string()),
    )])
}

// ============================================================================
// Profile table
// ============================================================================

pub const ATTR_FIRST_NAME: &str = "FirstName";
pub const ATTR_LAST_NAME: &str = "LastName";
pub const ATTR_ROLE_ID: &str = "RoleId";

/// Primary key of a profile: partition `UserId`.
pub fn profile_key(user_id: Uuid) -> HashMap<String, AttributeValue> {
    HashMap::from([(
        ATTR_USER_ID.to_string(),
        AttributeValue::S(user_id.to_string()),
    )])
}

// ============================================================================
// Unique-claims table
// ============================================================================

pub const ATTR_UNIQUE_VALUE: &str = "UniqueValue";
pub const ATTR_UNIQUE_DOMAIN: &str = "UniqueDomain";

/// Primary key of a claim: partition `UniqueValue`, sort `UniqueDomain`.
pub fn unique_claim_key(claim: &UniqueClaim) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            ATTR_UNIQUE_VALUE.to_string(),
            AttributeValue::S(claim.value.clone()),
        ),
        (
            ATTR_UNIQUE_DOMAIN.to_string(),
            AttributeValue::S(claim.domain.as_str().to_string()),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_key() {
        let owner = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap();
        let post = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440002").unwrap();

        let key = post_key(owner, post);
        assert_eq!(
            key.get(ATTR_OWNER_ID).unwrap().as_s().unwrap(),
            "550e8400-e29b-41d4-a716-446655440001"
        );
        assert_eq!(
            key.get(ATTR_POST_ID).unwrap().as_s().unwrap(),
            "550e8400-e29b-41d4-a716-446655440002"
        );
    }

    #[test]
    fn test_credential_key() {
        let user = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap();

        let key = credential_key(user);
        assert_eq!(key.len(), 1);
        assert_eq!(
            key.get(ATTR_USER_ID).unwrap().as_s().unwrap(),
            "550e8400-e29b-41d4-a716-446655440001"
        );
    }

    #[test]
    fn test_unique_claim_key() {
        let claim = UniqueClaim::email("john@example.com");

        let key = unique_claim_key(&claim);
        assert_eq!(
            key.get(ATTR_UNIQUE_VALUE).unwrap().as_s().unwrap(),
            "john@example.com"
        );
        assert_eq!(
            key.get(ATTR_UNIQUE_DOMAIN).unwrap().as_s().unwrap(),
            "UserEmail"
        );
    }
}
