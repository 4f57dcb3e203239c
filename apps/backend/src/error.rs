//! Error handling for the backend API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use srs_core::{RepositoryError, SessionError};

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Scheduling error: {0}")]
    Session(#[from] SessionError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            ApiError::Session(session) => match session {
                SessionError::InvalidGrade(_) => (StatusCode::BAD_REQUEST, "invalid_grade"),
                SessionError::NoCardsRemaining => (StatusCode::BAD_REQUEST, "no_cards_remaining"),
                SessionError::CommitFailed { .. } => (StatusCode::CONFLICT, "commit_failed"),
                SessionError::SessionCompleted => (StatusCode::CONFLICT, "session_completed"),
                SessionError::InvariantViolation(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "invariant_violation")
                }
            },
            ApiError::Repository(repo) => match repo {
                RepositoryError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
                RepositoryError::Backend(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "repository_error")
                }
            },
            ApiError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            ApiError::Migration(_) => (StatusCode::INTERNAL_SERVER_ERROR, "migration_error"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
