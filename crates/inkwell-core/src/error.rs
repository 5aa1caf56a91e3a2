//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The caller is authenticated but does not own the target entity.
    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Document store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    /// The entity exists but is owned by someone else.
    #[error("Entity owned by another principal")]
    Forbidden,
}

impl DomainError {
    /// Convert a repository error raised while addressing a specific post.
    pub fn from_post_repo(err: RepoError, post_id: Uuid) -> Self {
        match err {
            RepoError::NotFound => DomainError::NotFound {
                entity_type: "post",
                id: post_id,
            },
            other => other.into(),
        }
    }
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Connection(msg) | RepoError::Query(msg) => DomainError::StoreUnavailable(msg),
            RepoError::NotFound => DomainError::NotFound {
                entity_type: "document",
                id: Uuid::nil(),
            },
            RepoError::Forbidden => DomainError::Unauthorized,
        }
    }
}
