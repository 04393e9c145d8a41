//! Server-wide error taxonomy
//!
//! Every failure that reaches an HTTP handler is converted into an
//! [`AppError`], which fixes the status code and the client-facing message.
//! Feature-level error enums convert into it with `From`, so handlers can
//! use `?` throughout.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::response::ErrorResponse;
use crate::db::DbError;

/// Result type alias for handler code
pub type AppResult<T> = std::result::Result<T, AppError>;

/// Message returned for unique-index violations
pub const DUPLICATE_FIELD_MESSAGE: &str = "Duplicate field value entered";

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// One or more field rules failed; messages are comma-joined for the client
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    InvalidQuery(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Email could not be sent")]
    EmailDeliveryFailed,

    /// Unexpected failure; the detail is logged but never returned
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(messages: &[String]) -> Self {
        AppError::Validation(messages.join(", "))
    }

    pub fn not_found_id(id: impl std::fmt::Display) -> Self {
        AppError::NotFound(format!("Resource not found with id of {}", id))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::EmailDeliveryFailed | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    /// Message safe to show to the client
    pub fn client_message(&self) -> String {
        match self {
            AppError::Internal(_) => "Server Error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        (status, Json(ErrorResponse::new(self.client_message()))).into_response()
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::InvalidId(raw) => AppError::not_found_id(raw),
            DbError::Duplicate(_) => AppError::Validation(DUPLICATE_FIELD_MESSAGE.to_string()),
            DbError::Serialization(message) => AppError::Internal(message),
            DbError::Mongo(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}
