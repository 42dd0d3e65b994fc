//! API error types and their HTTP translation.
//!
//! ## Status Mapping
//! ```text
//! ValidationError / InsufficientStock  → 400 Bad Request
//! InvalidCredentials / missing token   → 401 Unauthorized
//! Role check failed                    → 403 Forbidden
//! SweetNotFound                        → 404 Not Found
//! DuplicateUser                        → 409 Conflict
//! Everything else                      → 500 Internal Server Error
//! ```
//!
//! All user-visible failures serialize as `{"error": "<message>"}`.
//! Internal failures are logged server-side and never leak details.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use sweet_core::{CoreError, ValidationError};
use sweet_db::DbError;

/// API-level errors. Each variant carries the client-facing message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Anything the client can't act on. The cause is logged, the
    /// response body is generic.
    #[error("Internal server error")]
    Internal(String),
}

/// Result type for handlers and services.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(ref cause) => {
                error!(%cause, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(_) | CoreError::InsufficientStock { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            CoreError::SweetNotFound => ApiError::NotFound(err.to_string()),
            CoreError::DuplicateUser => ApiError::Conflict(err.to_string()),
            CoreError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            // The only unique indexes are on users; a violation that
            // slipped past the pre-check is still a duplicate identity.
            DbError::UniqueViolation(_) => ApiError::from(CoreError::DuplicateUser),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        assert!(matches!(
            ApiError::from(CoreError::SweetNotFound),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(CoreError::DuplicateUser),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(CoreError::InvalidCredentials),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from(CoreError::InsufficientStock {
                available: 1,
                requested: 2
            }),
            ApiError::BadRequest(_)
        ));
    }

    #[test]
    fn test_db_unique_violation_is_conflict() {
        let err = ApiError::from(DbError::UniqueViolation("users.email".to_string()));
        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(
            err.to_string(),
            "User with this email or username already exists"
        );
    }

    #[test]
    fn test_internal_message_is_generic() {
        let err = ApiError::Internal("connection refused".to_string());
        assert_eq!(err.to_string(), "Internal server error");
    }
}
