use mediator::Request;
use mongodb::bson::{oid::ObjectId, Document};

use crate::error::AppError;
use crate::features::shared::ownership::{find_existing, OwnershipError};
use crate::features::users::commands::{public_document, USERS};
use crate::features::FeatureState;

#[derive(Debug, Clone)]
pub struct GetUserQuery {
    pub id: ObjectId,
}

#[derive(Debug, thiserror::Error)]
pub enum GetUserError {
    #[error(transparent)]
    Lookup(#[from] OwnershipError),
}

impl From<GetUserError> for AppError {
    fn from(err: GetUserError) -> Self {
        match err {
            GetUserError::Lookup(e) => e.into(),
        }
    }
}

impl Request<Result<Document, GetUserError>> for GetUserQuery {}

impl crate::cqrs::middleware::Query for GetUserQuery {}

#[tracing::instrument(skip(state))]
pub async fn handle(state: FeatureState, query: GetUserQuery) -> Result<Document, GetUserError> {
    let user = find_existing(state.store.as_ref(), USERS, query.id).await?;
    Ok(public_document(user))
}
