use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::features::reports::services::{ReportError, StoreError};
use crate::features::reports::validator::ValidationError;
use crate::features::users::UserError;
use crate::modules::storage::PhotoStorageError;
use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => AppError::NotFound(e.to_string()),
            StoreError::InvalidEnum { .. } => AppError::Validation(e.to_string()),
            StoreError::Corrupt { .. } => AppError::Internal(e.to_string()),
            StoreError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<PhotoStorageError> for AppError {
    fn from(e: PhotoStorageError) -> Self {
        match e {
            PhotoStorageError::MissingFilename
            | PhotoStorageError::Empty
            | PhotoStorageError::UnsupportedExtension(_) => AppError::BadRequest(e.to_string()),
            PhotoStorageError::TooLarge { .. } => AppError::PayloadTooLarge(e.to_string()),
            PhotoStorageError::OutsideRoot(_) | PhotoStorageError::Io(_) => {
                AppError::Internal(e.to_string())
            }
        }
    }
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::Validation(ref errors) => AppError::Validation(errors.to_string()),
            UserError::EmailTaken => AppError::Conflict(e.to_string()),
            UserError::InvalidCredentials => AppError::Unauthorized(e.to_string()),
            UserError::Hashing(msg) => AppError::Internal(msg),
            UserError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ReportError> for AppError {
    fn from(e: ReportError) -> Self {
        match e {
            ReportError::Validation(e) => e.into(),
            ReportError::Photo(e) => e.into(),
            ReportError::Store(e) => e.into(),
            ReportError::User(e) => e.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                    None,
                )
            }
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Validation(ref msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::Auth(ref msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            AppError::Unauthorized(ref msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            AppError::Forbidden(ref msg) => (StatusCode::FORBIDDEN, msg.clone(), None),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, msg.clone(), None),
            AppError::PayloadTooLarge(ref msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, msg.clone(), None)
            }
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(e: impl Into<AppError>) -> StatusCode {
        e.into().into_response().status()
    }

    #[test]
    fn test_domain_errors_map_to_status() {
        assert_eq!(
            status_of(ValidationError::MissingField { field: "latitude" }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(StoreError::NotFound(9)), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(StoreError::Corrupt {
                column: "waste_type",
                value: "Glass".to_string()
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(PhotoStorageError::TooLarge { size: 2, max: 1 }),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            status_of(PhotoStorageError::UnsupportedExtension("txt".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(UserError::EmailTaken), StatusCode::CONFLICT);
        assert_eq!(
            status_of(UserError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(ReportError::Store(StoreError::Database(
                sqlx::Error::PoolTimedOut
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_keeps_report_id_in_message() {
        match AppError::from(StoreError::NotFound(42)) {
            AppError::NotFound(msg) => assert_eq!(msg, "Report 42 not found"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
