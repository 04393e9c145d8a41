use mediator::Request;
use mongodb::bson::{oid::ObjectId, Document};

use super::create::locate;
use super::BOOTCAMPS;
use crate::db::{DbError, Update};
use crate::error::AppError;
use crate::features::shared::ownership::{find_owned, update_owned, OwnershipError};
use crate::features::shared::validation::slugify;
use crate::features::FeatureState;
use crate::geocoder::GeocodeError;
use crate::models::bootcamp::SCHEMA;
use crate::models::{Actor, Mode, SchemaError};

/// Command to update a bootcamp the actor owns
#[derive(Debug, Clone)]
pub struct UpdateBootcampCommand {
    pub actor: Actor,
    pub id: ObjectId,
    pub payload: Document,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateBootcampError {
    #[error(transparent)]
    Validation(#[from] SchemaError),

    #[error(transparent)]
    Ownership(#[from] OwnershipError),

    #[error("Could not geocode address '{0}'")]
    AddressNotFound(String),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<UpdateBootcampError> for AppError {
    fn from(err: UpdateBootcampError) -> Self {
        match err {
            UpdateBootcampError::Validation(e) => AppError::Validation(e.to_string()),
            UpdateBootcampError::Ownership(e) => e.into(),
            UpdateBootcampError::AddressNotFound(_) => AppError::Validation(err.to_string()),
            UpdateBootcampError::Geocode(e) => AppError::Internal(e.to_string()),
            UpdateBootcampError::Database(e) => e.into(),
        }
    }
}

impl Request<Result<Document, UpdateBootcampError>> for UpdateBootcampCommand {}

impl crate::cqrs::middleware::Command for UpdateBootcampCommand {}

/// Apply a partial update
///
/// Ownership is checked before the body is validated, so a stranger gets
/// `Forbidden` whatever they send. A new name re-derives the slug and a new
/// address is geocoded again.
#[tracing::instrument(skip(state, command), fields(id = %command.id, actor = %command.actor.id))]
pub async fn handle(
    state: FeatureState,
    command: UpdateBootcampCommand,
) -> Result<Document, UpdateBootcampError> {
    find_owned(
        state.store.as_ref(),
        BOOTCAMPS,
        command.id,
        &command.actor,
        "update",
    )
    .await?;

    let mut set = SCHEMA.prepare(command.payload, Mode::Update)?;

    if let Some(slug) = set.get_str("name").ok().map(slugify) {
        set.insert("slug", slug);
    }

    if let Some(address) = set.get_str("address").ok().map(str::to_string) {
        let location = locate(&state, &address)
            .await?
            .ok_or(UpdateBootcampError::AddressNotFound(address))?;
        set.insert("location", location);
    }

    let updated = update_owned(
        state.store.as_ref(),
        BOOTCAMPS,
        command.id,
        &command.actor,
        &Update::set(set),
    )
    .await?;

    tracing::info!("Bootcamp updated");
    Ok(updated)
}
