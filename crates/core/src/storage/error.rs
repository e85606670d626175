use thiserror::Error;

use super::UniqueDomain;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("value {value} is already claimed in domain {domain}")]
    UniqueConflict { value: String, domain: UniqueDomain },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let error = RepositoryError::NotFound {
            entity_type: "Post",
            id: "abc-123".to_string(),
        };
        assert_eq!(error.to_string(), "Post not found: abc-123");
    }

    #[test]
    fn test_already_exists_display() {
        let error = RepositoryError::AlreadyExists {
            entity_type: "Credential",
            id: "user-1".to_string(),
        };
        assert_eq!(error.to_string(), "Credential already exists: user-1");
    }

    #[test]
    fn test_unique_conflict_display() {
        let error = RepositoryError::UniqueConflict {
            value: "john@example.com".to_string(),
            domain: UniqueDomain::Email,
        };
        assert_eq!(
            error.to_string(),
            "value john@example.com is already claimed in domain UserEmail"
        );
    }

    #[test]
    fn test_connection_failed_display() {
        let error = RepositoryError::ConnectionFailed("timeout after 30s".to_string());
        assert_eq!(error.to_string(), "Connection failed: timeout after 30s");
    }

    #[test]
    fn test_query_failed_display() {
        let error = RepositoryError::QueryFailed("invalid partition key".to_string());
        assert_eq!(error.to_string(), "Query failed: invalid partition key");
    }
}
