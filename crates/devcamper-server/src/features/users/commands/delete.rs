use mediator::Request;
use mongodb::bson::{oid::ObjectId, Document};

use super::USERS;
use crate::db::{DbError, Filter};
use crate::error::AppError;
use crate::features::shared::OwnershipError;
use crate::features::FeatureState;
use crate::models::user::COLLECTION;

#[derive(Debug, Clone)]
pub struct DeleteUserCommand {
    pub id: ObjectId,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteUserError {
    #[error(transparent)]
    Lookup(#[from] OwnershipError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<DeleteUserError> for AppError {
    fn from(err: DeleteUserError) -> Self {
        match err {
            DeleteUserError::Lookup(e) => e.into(),
            DeleteUserError::Database(e) => e.into(),
        }
    }
}

impl Request<Result<Document, DeleteUserError>> for DeleteUserCommand {}

impl crate::cqrs::middleware::Command for DeleteUserCommand {}

#[tracing::instrument(skip(state, command), fields(id = %command.id))]
pub async fn handle(state: FeatureState, command: DeleteUserCommand) -> Result<Document, DeleteUserError> {
    let deleted = state
        .store
        .delete_one(COLLECTION, &Filter::by_id(command.id))
        .await?
        .ok_or(OwnershipError::NotFound {
            resource: USERS.name,
            id: command.id,
        })?;

    tracing::info!("User deleted");
    Ok(deleted)
}
