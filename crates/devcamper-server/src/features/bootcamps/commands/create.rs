//! Create bootcamp command
//!
//! A publisher may own at most one bootcamp; admins are unlimited. The slug
//! is derived from the name and the address is geocoded into `location`.
//!
//! Bootcamps created by a non-admin also record the owner in `publisher`,
//! which the store keeps unique, so concurrent creates cannot both succeed.

use mediator::Request;
use mongodb::bson::{oid::ObjectId, Document};

use crate::db::{DbError, Filter};
use crate::error::AppError;
use crate::features::shared::validation::slugify;
use crate::features::FeatureState;
use crate::geocoder::GeocodeError;
use crate::models::bootcamp::{Location, COLLECTION, SCHEMA};

/// Unique per owner on bootcamps created by non-admins
const PUBLISHER_FIELD: &str = "publisher";
use crate::models::document::now;
use crate::models::{Actor, Mode, SchemaError};

/// Command to create a new bootcamp owned by `actor`
#[derive(Debug, Clone)]
pub struct CreateBootcampCommand {
    pub actor: Actor,
    /// Request body, not yet validated
    pub payload: Document,
}

/// Errors that can occur when creating a bootcamp
#[derive(Debug, thiserror::Error)]
pub enum CreateBootcampError {
    #[error(transparent)]
    Validation(#[from] SchemaError),

    #[error("The user with ID {0} has already published a bootcamp")]
    AlreadyPublished(ObjectId),

    #[error("Could not geocode address '{0}'")]
    AddressNotFound(String),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<CreateBootcampError> for AppError {
    fn from(err: CreateBootcampError) -> Self {
        match err {
            CreateBootcampError::Validation(e) => AppError::Validation(e.to_string()),
            CreateBootcampError::AlreadyPublished(_) | CreateBootcampError::AddressNotFound(_) => {
                AppError::Validation(err.to_string())
            },
            CreateBootcampError::Geocode(e) => AppError::Internal(e.to_string()),
            CreateBootcampError::Database(e) => e.into(),
        }
    }
}

impl Request<Result<Document, CreateBootcampError>> for CreateBootcampCommand {}

impl crate::cqrs::middleware::Command for CreateBootcampCommand {}

/// Geocode an address into a stored location document
pub(super) async fn locate(
    state: &FeatureState,
    address: &str,
) -> Result<Option<Document>, GeocodeError> {
    let point = state.geocoder.geocode(address).await?;
    Ok(point.map(|p| Location::from_geocode(p).to_document()))
}

#[tracing::instrument(skip(state, command), fields(actor = %command.actor.id, role = %command.actor.role))]
pub async fn handle(
    state: FeatureState,
    command: CreateBootcampCommand,
) -> Result<Document, CreateBootcampError> {
    let actor = command.actor;

    if !actor.is_admin() {
        let published = state
            .store
            .count(COLLECTION, &Filter::eq("user", actor.id))
            .await?;
        if published > 0 {
            return Err(CreateBootcampError::AlreadyPublished(actor.id));
        }
    }

    let mut document = SCHEMA.prepare(command.payload, Mode::Create)?;

    let slug = document.get_str("name").map(slugify).unwrap_or_default();
    let address = document.get_str("address").unwrap_or_default().to_string();

    let location = locate(&state, &address)
        .await?
        .ok_or_else(|| CreateBootcampError::AddressNotFound(address.clone()))?;

    document.insert("slug", slug);
    document.insert("location", location);
    document.insert("user", actor.id);
    if !actor.is_admin() {
        document.insert(PUBLISHER_FIELD, actor.id);
    }
    document.insert("createdAt", now());

    let created = match state.store.insert_one(COLLECTION, document).await {
        Err(DbError::Duplicate(field)) if field == PUBLISHER_FIELD => {
            return Err(CreateBootcampError::AlreadyPublished(actor.id));
        },
        other => other?,
    };

    tracing::info!(
        bootcamp_id = %created.get_object_id("_id").map(|id| id.to_hex()).unwrap_or_default(),
        "Bootcamp created"
    );

    Ok(created)
}
