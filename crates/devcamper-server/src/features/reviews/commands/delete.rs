use mediator::Request;
use mongodb::bson::{oid::ObjectId, Document};

use super::REVIEWS;
use crate::db::DbError;
use crate::error::AppError;
use crate::features::shared::aggregates::refresh_average_rating;
use crate::features::shared::ownership::{delete_owned, OwnershipError};
use crate::features::FeatureState;
use crate::models::Actor;

#[derive(Debug, Clone)]
pub struct DeleteReviewCommand {
    pub actor: Actor,
    pub id: ObjectId,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteReviewError {
    #[error(transparent)]
    Ownership(#[from] OwnershipError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<DeleteReviewError> for AppError {
    fn from(err: DeleteReviewError) -> Self {
        match err {
            DeleteReviewError::Ownership(e) => e.into(),
            DeleteReviewError::Database(e) => e.into(),
        }
    }
}

impl Request<Result<Document, DeleteReviewError>> for DeleteReviewCommand {}

impl crate::cqrs::middleware::Command for DeleteReviewCommand {}

#[tracing::instrument(skip(state, command), fields(id = %command.id, actor = %command.actor.id))]
pub async fn handle(
    state: FeatureState,
    command: DeleteReviewCommand,
) -> Result<Document, DeleteReviewError> {
    let store = state.store.as_ref();
    let deleted = delete_owned(store, REVIEWS, command.id, &command.actor).await?;

    if let Ok(bootcamp_id) = deleted.get_object_id("bootcamp") {
        refresh_average_rating(store, bootcamp_id).await?;
    }

    tracing::info!("Review deleted");
    Ok(deleted)
}
