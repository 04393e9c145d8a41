use mediator::Request;
use mongodb::bson::{oid::ObjectId, Document};

use super::{public_document, USERS};
use crate::auth::{hash_password, AuthError};
use crate::db::{DbError, Filter, Update};
use crate::error::AppError;
use crate::features::shared::OwnershipError;
use crate::features::FeatureState;
use crate::models::user::{COLLECTION, SCHEMA};
use crate::models::{Mode, SchemaError};

#[derive(Debug, Clone)]
pub struct UpdateUserCommand {
    pub id: ObjectId,
    pub payload: Document,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateUserError {
    #[error(transparent)]
    Validation(#[from] SchemaError),

    #[error(transparent)]
    Lookup(#[from] OwnershipError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<UpdateUserError> for AppError {
    fn from(err: UpdateUserError) -> Self {
        match err {
            UpdateUserError::Validation(e) => AppError::Validation(e.to_string()),
            UpdateUserError::Lookup(e) => e.into(),
            UpdateUserError::Auth(e) => e.into(),
            UpdateUserError::Database(e) => e.into(),
        }
    }
}

impl Request<Result<Document, UpdateUserError>> for UpdateUserCommand {}

impl crate::cqrs::middleware::Command for UpdateUserCommand {}

#[tracing::instrument(skip(state, command), fields(id = %command.id))]
pub async fn handle(state: FeatureState, command: UpdateUserCommand) -> Result<Document, UpdateUserError> {
    let mut set = SCHEMA.prepare(command.payload, Mode::Update)?;
    if let Ok(plain) = set.get_str("password") {
        let hashed = hash_password(plain)?;
        set.insert("password", hashed);
    }

    let updated = state
        .store
        .update_one(COLLECTION, &Filter::by_id(command.id), &Update::set(set))
        .await?
        .ok_or(OwnershipError::NotFound {
            resource: USERS.name,
            id: command.id,
        })?;

    tracing::info!("User updated");
    Ok(public_document(updated))
}
