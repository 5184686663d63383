//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use scribe_shared::ErrorResponse;
use std::fmt;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized,
    Forbidden,
    Conflict(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail.clone()),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail.clone()),
            AppError::Unauthorized => ErrorResponse::unauthorized()
                .with_detail("Invalid username or password."),
            AppError::Forbidden => {
                ErrorResponse::forbidden("You do not have permission to modify this resource.")
            }
            AppError::Conflict(detail) => ErrorResponse::conflict(detail.clone()),
            AppError::Internal(detail) => {
                // Log internal errors
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

// Conversion from domain errors
impl From<scribe_core::DomainError> for AppError {
    fn from(err: scribe_core::DomainError) -> Self {
        use scribe_core::DomainError;

        match err {
            DomainError::NotFound { entity, id } => {
                AppError::NotFound(format!("{} with id {} not found", entity, id))
            }
            DomainError::DuplicateUsername(username) => {
                AppError::Conflict(format!("username '{}' is already taken", username))
            }
            DomainError::DuplicateEmail(email) => {
                AppError::Conflict(format!("email '{}' is already registered", email))
            }
            DomainError::InvalidCredentials => AppError::Unauthorized,
            DomainError::Forbidden => AppError::Forbidden,
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Storage(e) => {
                tracing::error!("Image storage error: {}", e);
                AppError::Internal("Image storage error".to_string())
            }
            DomainError::Auth(e) => {
                tracing::error!("Token error: {}", e);
                AppError::Internal("Authentication backend error".to_string())
            }
            DomainError::Repo(e) => e.into(),
        }
    }
}

impl From<scribe_core::error::RepoError> for AppError {
    fn from(err: scribe_core::error::RepoError) -> Self {
        use scribe_core::error::RepoError;

        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use scribe_core::DomainError;

    use super::*;

    #[test]
    fn test_status_codes_follow_error_taxonomy() {
        let not_found: AppError = DomainError::post_not_found(uuid::Uuid::new_v4()).into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let conflict: AppError = DomainError::DuplicateUsername("alice".to_string()).into();
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);

        let unauthorized: AppError = DomainError::InvalidCredentials.into();
        assert_eq!(unauthorized.status_code(), StatusCode::UNAUTHORIZED);

        let forbidden: AppError = DomainError::Forbidden.into();
        assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);

        let bad_request: AppError = DomainError::Validation("title is empty".to_string()).into();
        assert_eq!(bad_request.status_code(), StatusCode::BAD_REQUEST);
    }
}
