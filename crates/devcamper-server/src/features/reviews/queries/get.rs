use mediator::Request;
use mongodb::bson::{oid::ObjectId, Document};

use super::list::POPULATE;
use crate::db::DbError;
use crate::error::AppError;
use crate::features::reviews::commands::REVIEWS;
use crate::features::shared::advanced_results::populate_documents;
use crate::features::shared::ownership::{find_existing, OwnershipError};
use crate::features::FeatureState;

#[derive(Debug, Clone)]
pub struct GetReviewQuery {
    pub id: ObjectId,
}

#[derive(Debug, thiserror::Error)]
pub enum GetReviewError {
    #[error(transparent)]
    Lookup(#[from] OwnershipError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<GetReviewError> for AppError {
    fn from(err: GetReviewError) -> Self {
        match err {
            GetReviewError::Lookup(e) => e.into(),
            GetReviewError::Database(e) => e.into(),
        }
    }
}

impl Request<Result<Document, GetReviewError>> for GetReviewQuery {}

impl crate::cqrs::middleware::Query for GetReviewQuery {}

#[tracing::instrument(skip(state))]
pub async fn handle(state: FeatureState, query: GetReviewQuery) -> Result<Document, GetReviewError> {
    let store = state.store.as_ref();
    let review = find_existing(store, REVIEWS, query.id).await?;

    let mut found = [review];
    populate_documents(store, &mut found, POPULATE).await?;
    let [review] = found;
    Ok(review)
}
