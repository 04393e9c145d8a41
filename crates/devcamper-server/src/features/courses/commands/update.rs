use mediator::Request;
use mongodb::bson::{oid::ObjectId, Document};

use super::COURSES;
use crate::db::{DbError, Update};
use crate::error::AppError;
use crate::features::shared::aggregates::refresh_average_cost;
use crate::features::shared::ownership::{find_owned, update_owned, OwnershipError};
use crate::features::FeatureState;
use crate::models::course::SCHEMA;
use crate::models::{Actor, Mode, SchemaError};

#[derive(Debug, Clone)]
pub struct UpdateCourseCommand {
    pub actor: Actor,
    pub id: ObjectId,
    pub payload: Document,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateCourseError {
    #[error(transparent)]
    Validation(#[from] SchemaError),

    #[error(transparent)]
    Ownership(#[from] OwnershipError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<UpdateCourseError> for AppError {
    fn from(err: UpdateCourseError) -> Self {
        match err {
            UpdateCourseError::Validation(e) => AppError::Validation(e.to_string()),
            UpdateCourseError::Ownership(e) => e.into(),
            UpdateCourseError::Database(e) => e.into(),
        }
    }
}

impl Request<Result<Document, UpdateCourseError>> for UpdateCourseCommand {}

impl crate::cqrs::middleware::Command for UpdateCourseCommand {}

#[tracing::instrument(skip(state, command), fields(id = %command.id, actor = %command.actor.id))]
pub async fn handle(
    state: FeatureState,
    command: UpdateCourseCommand,
) -> Result<Document, UpdateCourseError> {
    let store = state.store.as_ref();

    find_owned(store, COURSES, command.id, &command.actor, "update").await?;

    let set = SCHEMA.prepare(command.payload, Mode::Update)?;
    let tuition_changed = set.contains_key("tuition");

    let updated = update_owned(store, COURSES, command.id, &command.actor, &Update::set(set)).await?;

    if tuition_changed {
        if let Ok(bootcamp_id) = updated.get_object_id("bootcamp") {
            refresh_average_cost(store, bootcamp_id).await?;
        }
    }

    tracing::info!("Course updated");
    Ok(updated)
}
