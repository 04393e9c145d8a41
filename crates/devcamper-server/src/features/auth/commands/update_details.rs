use mediator::Request;
use mongodb::bson::Document;

use crate::db::{DbError, Filter, Update};
use crate::error::AppError;
use crate::features::FeatureState;
use crate::models::user::{COLLECTION, SCHEMA};
use crate::models::{Actor, Mode, SchemaError, User};

/// Fields a user may change about themselves
const EDITABLE_FIELDS: &[&str] = &["name", "email"];

#[derive(Debug, Clone)]
pub struct UpdateDetailsCommand {
    pub actor: Actor,
    pub payload: Document,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateDetailsError {
    #[error("No user with the id of {0}")]
    NotFound(String),

    #[error(transparent)]
    Validation(#[from] SchemaError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<UpdateDetailsError> for AppError {
    fn from(err: UpdateDetailsError) -> Self {
        match err {
            UpdateDetailsError::NotFound(_) => AppError::NotFound(err.to_string()),
            UpdateDetailsError::Validation(e) => AppError::Validation(e.to_string()),
            UpdateDetailsError::Database(e) => e.into(),
        }
    }
}

impl Request<Result<User, UpdateDetailsError>> for UpdateDetailsCommand {}

impl crate::cqrs::middleware::Command for UpdateDetailsCommand {}

#[tracing::instrument(skip(state, command), fields(actor = %command.actor.id))]
pub async fn handle(
    state: FeatureState,
    command: UpdateDetailsCommand,
) -> Result<User, UpdateDetailsError> {
    let details: Document = command
        .payload
        .into_iter()
        .filter(|(key, _)| EDITABLE_FIELDS.contains(&key.as_str()))
        .collect();
    let set = SCHEMA.prepare(details, Mode::Update)?;

    let updated = state
        .store
        .update_one(COLLECTION, &Filter::by_id(command.actor.id), &Update::set(set))
        .await?
        .ok_or_else(|| UpdateDetailsError::NotFound(command.actor.id.to_hex()))?;

    tracing::info!("User details updated");
    Ok(User::from_document(updated)?)
}
