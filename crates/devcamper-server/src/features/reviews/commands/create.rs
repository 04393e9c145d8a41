//! Add review command

use mediator::Request;
use mongodb::bson::{oid::ObjectId, Document};

use crate::db::DbError;
use crate::error::AppError;
use crate::features::bootcamps::commands::BOOTCAMPS;
use crate::features::shared::aggregates::refresh_average_rating;
use crate::features::shared::ownership::{find_existing, OwnershipError};
use crate::features::FeatureState;
use crate::models::document::now;
use crate::models::review::{COLLECTION, SCHEMA};
use crate::models::{Actor, Mode, SchemaError};

#[derive(Debug, Clone)]
pub struct AddReviewCommand {
    pub actor: Actor,
    pub bootcamp_id: ObjectId,
    pub payload: Document,
}

#[derive(Debug, thiserror::Error)]
pub enum AddReviewError {
    #[error(transparent)]
    Validation(#[from] SchemaError),

    #[error(transparent)]
    Bootcamp(#[from] OwnershipError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<AddReviewError> for AppError {
    fn from(err: AddReviewError) -> Self {
        match err {
            AddReviewError::Validation(e) => AppError::Validation(e.to_string()),
            AddReviewError::Bootcamp(e) => e.into(),
            AddReviewError::Database(e) => e.into(),
        }
    }
}

impl Request<Result<Document, AddReviewError>> for AddReviewCommand {}

impl crate::cqrs::middleware::Command for AddReviewCommand {}

/// Store a review for an existing bootcamp and refresh its average rating
#[tracing::instrument(skip(state, command), fields(bootcamp_id = %command.bootcamp_id, actor = %command.actor.id))]
pub async fn handle(state: FeatureState, command: AddReviewCommand) -> Result<Document, AddReviewError> {
    let store = state.store.as_ref();

    find_existing(store, BOOTCAMPS, command.bootcamp_id).await?;

    let mut document = SCHEMA.prepare(command.payload, Mode::Create)?;
    document.insert("bootcamp", command.bootcamp_id);
    document.insert("user", command.actor.id);
    document.insert("createdAt", now());

    let created = store.insert_one(COLLECTION, document).await?;
    refresh_average_rating(store, command.bootcamp_id).await?;

    tracing::info!("Review added");
    Ok(created)
}
