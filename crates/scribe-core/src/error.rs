//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::ports::{AuthError, ImageStoreError};

/// Domain errors - business logic failures surfaced by the services.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} not found with id {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),

    #[error("email '{0}' is already in use")]
    DuplicateEmail(String),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("only the author may modify this post")]
    Forbidden,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] ImageStoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl DomainError {
    /// Not-found error for a post id.
    pub fn post_not_found(id: Uuid) -> Self {
        Self::NotFound { entity: "post", id }
    }

    /// Not-found error for a user id.
    pub fn user_not_found(id: Uuid) -> Self {
        Self::NotFound { entity: "user", id }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("database connection failed: {0}")]
    Connection(String),

    #[error("query execution failed: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("constraint violation: {0}")]
    Constraint(String),
}
