//! Register user command

use mediator::Request;
use mongodb::bson::Document;

use crate::auth::{hash_password, AuthError};
use crate::db::DbError;
use crate::error::AppError;
use crate::features::FeatureState;
use crate::models::document::now;
use crate::models::user::{COLLECTION, SCHEMA, SELF_ASSIGNABLE_ROLES};
use crate::models::{Mode, SchemaError, User};

/// Create an account; the caller may pick `user` or `publisher` as role
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub payload: Document,
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("`{0}` is not a valid value for Role")]
    RoleNotAllowed(String),

    #[error(transparent)]
    Validation(#[from] SchemaError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<RegisterError> for AppError {
    fn from(err: RegisterError) -> Self {
        match err {
            RegisterError::RoleNotAllowed(_) => AppError::Validation(err.to_string()),
            RegisterError::Validation(e) => AppError::Validation(e.to_string()),
            RegisterError::Auth(e) => e.into(),
            RegisterError::Database(e) => e.into(),
        }
    }
}

impl Request<Result<User, RegisterError>> for RegisterCommand {}

impl crate::cqrs::middleware::Command for RegisterCommand {}

#[tracing::instrument(skip(state, command))]
pub async fn handle(state: FeatureState, command: RegisterCommand) -> Result<User, RegisterError> {
    if let Ok(role) = command.payload.get_str("role") {
        if !SELF_ASSIGNABLE_ROLES.contains(&role) {
            return Err(RegisterError::RoleNotAllowed(role.to_string()));
        }
    }

    let mut document = SCHEMA.prepare(command.payload, Mode::Create)?;
    let plain = document.get_str("password").unwrap_or_default().to_string();
    document.insert("password", hash_password(&plain)?);
    document.insert("createdAt", now());

    let stored = state.store.insert_one(COLLECTION, document).await?;
    let user = User::from_document(stored)?;

    tracing::info!(user_id = %user.id, role = %user.role, "User registered");
    Ok(user)
}
