use mediator::Request;
use mongodb::bson::Document;

use super::public_document;
use crate::auth::{hash_password, AuthError};
use crate::db::DbError;
use crate::error::AppError;
use crate::features::FeatureState;
use crate::models::document::now;
use crate::models::user::{COLLECTION, SCHEMA};
use crate::models::{Mode, SchemaError};

/// Create a user with any role
#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    pub payload: Document,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateUserError {
    #[error(transparent)]
    Validation(#[from] SchemaError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<CreateUserError> for AppError {
    fn from(err: CreateUserError) -> Self {
        match err {
            CreateUserError::Validation(e) => AppError::Validation(e.to_string()),
            CreateUserError::Auth(e) => e.into(),
            CreateUserError::Database(e) => e.into(),
        }
    }
}

impl Request<Result<Document, CreateUserError>> for CreateUserCommand {}

impl crate::cqrs::middleware::Command for CreateUserCommand {}

#[tracing::instrument(skip(state, command))]
pub async fn handle(state: FeatureState, command: CreateUserCommand) -> Result<Document, CreateUserError> {
    let mut document = SCHEMA.prepare(command.payload, Mode::Create)?;
    let plain = document.get_str("password").unwrap_or_default().to_string();
    document.insert("password", hash_password(&plain)?);
    document.insert("createdAt", now());

    let created = state.store.insert_one(COLLECTION, document).await?;
    tracing::info!(user_id = ?created.get_object_id("_id").ok(), "User created");
    Ok(public_document(created))
}
