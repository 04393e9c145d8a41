//! Authentication primitives
//!
//! Session tokens are HS256 JWTs carrying the user id. They are delivered
//! both in the JSON body and in an HTTP-only `token` cookie, and accepted
//! back from either an `Authorization: Bearer` header or that cookie.

pub mod extractor;
pub mod jwt;
pub mod password;
pub mod reset_token;
pub mod session;

use thiserror::Error;

use crate::error::AppError;

pub use extractor::{require_role, CurrentUser};
pub use jwt::{issue_token, verify_token, Claims};
pub use password::{hash_password, verify_password};
pub use reset_token::{hash_reset_token, ResetToken};
pub use session::{logout_cookie, send_token_response, token_from_headers};

/// Message returned for every missing or rejected session
pub const NOT_AUTHORIZED: &str = "Not authorized to access this route";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to create token: {0}")]
    TokenCreation(jsonwebtoken::errors::Error),

    #[error("Invalid token: {0}")]
    InvalidToken(jsonwebtoken::errors::Error),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken(_) => AppError::Unauthorized(NOT_AUTHORIZED.to_string()),
            AuthError::TokenCreation(_) | AuthError::Hashing(_) => AppError::Internal(err.to_string()),
        }
    }
}
