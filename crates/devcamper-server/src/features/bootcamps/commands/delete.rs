use mediator::Request;
use mongodb::bson::{oid::ObjectId, Document};

use super::BOOTCAMPS;
use crate::db::{DbError, Filter};
use crate::error::AppError;
use crate::features::shared::ownership::{delete_owned, OwnershipError};
use crate::features::FeatureState;
use crate::models::{course, review, Actor};

/// Command to delete a bootcamp together with its courses and reviews
#[derive(Debug, Clone)]
pub struct DeleteBootcampCommand {
    pub actor: Actor,
    pub id: ObjectId,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteBootcampError {
    #[error(transparent)]
    Ownership(#[from] OwnershipError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<DeleteBootcampError> for AppError {
    fn from(err: DeleteBootcampError) -> Self {
        match err {
            DeleteBootcampError::Ownership(e) => e.into(),
            DeleteBootcampError::Database(e) => e.into(),
        }
    }
}

impl Request<Result<Document, DeleteBootcampError>> for DeleteBootcampCommand {}

impl crate::cqrs::middleware::Command for DeleteBootcampCommand {}

#[tracing::instrument(skip(state, command), fields(id = %command.id, actor = %command.actor.id))]
pub async fn handle(
    state: FeatureState,
    command: DeleteBootcampCommand,
) -> Result<Document, DeleteBootcampError> {
    let deleted = delete_owned(
        state.store.as_ref(),
        BOOTCAMPS,
        command.id,
        &command.actor,
    )
    .await?;

    let children = Filter::eq("bootcamp", command.id);
    let courses = state.store.delete_many(course::COLLECTION, &children).await?;
    let reviews = state.store.delete_many(review::COLLECTION, &children).await?;

    tracing::info!(courses, reviews, "Bootcamp deleted with its courses and reviews");
    Ok(deleted)
}
