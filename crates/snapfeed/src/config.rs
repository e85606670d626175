use std::{env, time::Duration};

use snapfeed_core::post::PostServiceConfig;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Table holding post metadata (default: "snapfeed-posts")
    pub posts_table: String,
    /// Table holding login credentials (default: "snapfeed-credentials")
    pub credentials_table: String,
    /// Table holding user profiles (default: "snapfeed-profiles")
    pub profiles_table: String,
    /// Table holding unique-value claims (default: "snapfeed-unique-claims")
    pub unique_claims_table: String,
    /// Blob store bucket for post images (default: "snapfeed-posts")
    pub post_bucket: String,
    /// Public base URL of the blob store (default: "https://s3.amazonaws.com")
    pub store_base_url: String,
    /// Maximum post description length in characters (default: 500)
    pub description_max_length: usize,
    /// Accepted image content types (default: jpeg, png, gif)
    pub image_content_types: Vec<String>,
    /// Minutes a deferred-upload post may stay unconfirmed (default: 5)
    pub post_ttl_minutes: u64,
    /// Minutes a presigned upload URL stays valid (default: 5)
    pub presign_ttl_minutes: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SNAPFEED_POSTS_TABLE` - Post metadata table name
    /// - `SNAPFEED_CREDENTIALS_TABLE` - Credentials table name
    /// - `SNAPFEED_PROFILES_TABLE` - Profiles table name
    /// - `SNAPFEED_UNIQUE_TABLE` - Unique-claims table name
    /// - `SNAPFEED_POST_BUCKET` - Blob store bucket for post images
    /// - `SNAPFEED_STORE_BASE_URL` - Public base URL of the blob store
    /// - `SNAPFEED_DESCRIPTION_MAX_LENGTH` - Description character limit
    /// - `SNAPFEED_IMAGE_CONTENT_TYPES` - Comma-separated content types
    /// - `SNAPFEED_POST_TTL_MINUTES` - Pending-post confirmation window
    /// - `SNAPFEED_PRESIGN_TTL_MINUTES` - Presigned URL validity window
    pub fn from_env() -> Self {
        Self {
            posts_table: env::var("SNAPFEED_POSTS_TABLE")
                .unwrap_or_else(|_| "snapfeed-posts".to_string()),
            credentials_table: env::var("SNAPFEED_CREDENTIALS_TABLE")
                .unwrap_or_else(|_| "snapfeed-credentials".to_string()),
            profiles_table: env::var("SNAPFEED_PROFILES_TABLE")
                .unwrap_or_else(|_| "snapfeed-profiles".to_string()),
            unique_claims_table: env::var("SNAPFEED_UNIQUE_TABLE")
                .unwrap_or_else(|_| "snapfeed-unique-claims".to_string()),
            post_bucket: env::var("SNAPFEED_POST_BUCKET")
                .unwrap_or_else(|_| "snapfeed-posts".to_string()),
            store_base_url: env::var("SNAPFEED_STORE_BASE_URL")
                .unwrap_or_else(|_| "https://s3.amazonaws.com".to_string()),
            description_max_length: env::var("SNAPFEED_DESCRIPTION_MAX_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
            image_content_types: env::var("SNAPFEED_IMAGE_CONTENT_TYPES")
                .map(|v| v.split(',').map(|t| t.trim().to_string()).collect())
                .unwrap_or_else(|_| {
                    vec![
                        "image/jpeg".to_string(),
                        "image/png".to_string(),
                        "image/gif".to_string(),
                    ]
                }),
            post_ttl_minutes: env::var("SNAPFEED_POST_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            presign_ttl_minutes: env::var("SNAPFEED_PRESIGN_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
        }
    }

    /// Get the pending-post confirmation window as a Duration.
    pub fn post_ttl(&self) -> Duration {
        Duration::from_secs(self.post_ttl_minutes * 60)
    }

    /// Get the presigned URL validity window as a Duration.
    pub fn presign_ttl(&self) -> Duration {
        Duration::from_secs(self.presign_ttl_minutes * 60)
    }

    /// Build the post lifecycle service configuration.
    pub fn post_service_config(&self) -> PostServiceConfig {
        PostServiceConfig {
            bucket: self.post_bucket.clone(),
            store_base_url: self.store_base_url.clone(),
            description_max_length: self.description_max_length,
            allowed_content_types: self.image_content_types.clone(),
            pending_ttl: self.post_ttl(),
            presign_ttl: self.presign_ttl(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_conversions() {
        let config = Config {
            posts_table: "p".to_string(),
            credentials_table: "c".to_string(),
            profiles_table: "u".to_string(),
            unique_claims_table: "q".to_string(),
            post_bucket: "b".to_string(),
            store_base_url: "https://blobs.example.com".to_string(),
            description_max_length: 500,
            image_content_types: vec!["image/png".to_string()],
            post_ttl_minutes: 5,
            presign_ttl_minutes: 10,
        };

        assert_eq!(config.post_ttl(), Duration::from_secs(300));
        assert_eq!(config.presign_ttl(), Duration::from_secs(600));
    }

    #[test]
    fn test_default_values() {
        // Clear environment variables to test defaults
        env::remove_var("SNAPFEED_POSTS_TABLE");
        env::remove_var("SNAPFEED_CREDENTIALS_TABLE");
        env::remove_var("SNAPFEED_PROFILES_TABLE");
        env::remove_var("SNAPFEED_UNIQUE_TABLE");
        env::remove_var("SNAPFEED_POST_BUCKET");
        env::remove_var("SNAPFEED_STORE_BASE_URL");
        env::remove_var("SNAPFEED_DESCRIPTION_MAX_LENGTH");
        env::remove_var("SNAPFEED_IMAGE_CONTENT_TYPES");
        env::remove_var("SNAPFEED_POST_TTL_MINUTES");
        env::remove_var("SNAPFEED_PRESIGN_TTL_MINUTES");

        let config = Config::from_env();

        assert_eq!(config.posts_table, "snapfeed-posts");
        assert_eq!(config.credentials_table, "snapfeed-credentials");
        assert_eq!(config.profiles_table, "snapfeed-profiles");
        assert_eq!(config.unique_claims_table, "snapfeed-unique-claims");
        assert_eq!(config.post_bucket, "snapfeed-posts");
        assert_eq!(config.description_max_length, 500);
        assert_eq!(
            config.image_content_types,
            vec!["image/jpeg", "image/png", "image/gif"]
        );
        assert_eq!(config.post_ttl_minutes, 5);
        assert_eq!(config.presign_ttl_minutes, 5);
    }

    #[test]
    fn test_post_service_config_projection() {
        let config = Config {
            posts_table: "p".to_string(),
            credentials_table: "c".to_string(),
            profiles_table: "u".to_string(),
            unique_claims_table: "q".to_string(),
            post_bucket: "post-images".to_string(),
            store_base_url: "https://blobs.example.com".to_string(),
            description_max_length: 280,
            image_content_types: vec!["image/png".to_string()],
            post_ttl_minutes: 5,
            presign_ttl_minutes: 10,
        };

        let service_config = config.post_service_config();

        assert_eq!(service_config.bucket, "post-images");
        assert_eq!(service_config.store_base_url, "https://blobs.example.com");
        assert_eq!(service_config.description_max_length, 280);
        assert_eq!(service_config.allowed_content_types, vec!["image/png"]);
        assert_eq!(service_config.pending_ttl, Duration::from_secs(300));
        assert_eq!(service_config.presign_ttl, Duration::from_secs(600));
    }

}
