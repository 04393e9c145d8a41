use mediator::Request;
use mongodb::bson::{oid::ObjectId, Document};

use crate::error::AppError;
use crate::features::bootcamps::commands::BOOTCAMPS;
use crate::features::shared::ownership::{find_existing, OwnershipError};
use crate::features::FeatureState;

#[derive(Debug, Clone)]
pub struct GetBootcampQuery {
    pub id: ObjectId,
}

#[derive(Debug, thiserror::Error)]
pub enum GetBootcampError {
    #[error(transparent)]
    Lookup(#[from] OwnershipError),
}

impl From<GetBootcampError> for AppError {
    fn from(err: GetBootcampError) -> Self {
        match err {
            GetBootcampError::Lookup(e) => e.into(),
        }
    }
}

impl Request<Result<Document, GetBootcampError>> for GetBootcampQuery {}

impl crate::cqrs::middleware::Query for GetBootcampQuery {}

#[tracing::instrument(skip(state))]
pub async fn handle(state: FeatureState, query: GetBootcampQuery) -> Result<Document, GetBootcampError> {
    Ok(find_existing(state.store.as_ref(), BOOTCAMPS, query.id).await?)
}
