//! Error types for Custodia server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::validation::{UniqueKey, Violation};

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Every rule a submitted record breaks, reported together
    #[error("{} validation error(s)", .0.len())]
    Invalid(Vec<Violation>),

    #[error("Cannot delete: {0}")]
    HasDependents(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for a single-violation rejection
    pub fn violation(v: Violation) -> Self {
        AppError::Invalid(vec![v])
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = err {
            if db.is_unique_violation() {
                let field = db
                    .constraint()
                    .and_then(UniqueKey::from_constraint)
                    .map(|key| key.field())
                    .unwrap_or("value");
                return AppError::violation(Violation::DuplicateValue {
                    field: field.to_string(),
                });
            }
            if db.is_foreign_key_violation() {
                return AppError::Conflict(
                    "The operation conflicts with related records".to_string(),
                );
            }
        }
        AppError::Database(err)
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        AppError::Internal(format!("Spreadsheet generation failed: {}", err))
    }
}

/// Error response body for single-message failures
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error response body for aggregated validation failures
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorListResponse {
    pub errors: Vec<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Invalid(violations) => {
                let body = ErrorListResponse {
                    errors: violations.iter().map(ToString::to_string).collect(),
                };
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
            AppError::Authentication(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Authorization(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::HasDependents(msg) => (StatusCode::CONFLICT, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
