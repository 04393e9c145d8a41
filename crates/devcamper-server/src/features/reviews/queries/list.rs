use mediator::Request;
use mongodb::bson::{oid::ObjectId, Document};

use crate::db::{DbError, Filter, FindOptions};
use crate::error::AppError;
use crate::features::shared::advanced_results::{self, AdvancedResults, Population};
use crate::features::shared::query_filter::{translate, QueryError};
use crate::features::FeatureState;
use crate::models::{bootcamp, review};

/// Each review carries its bootcamp's name and description
pub(crate) const POPULATE: &[Population] = &[Population::reference(
    "bootcamp",
    bootcamp::COLLECTION,
    &["name", "description"],
)];

/// Every review, through the filter/select/sort/page pipeline
#[derive(Debug, Clone, Default)]
pub struct ListReviewsQuery {
    pub raw_query: Option<String>,
}

/// The reviews of one bootcamp, unpaginated
#[derive(Debug, Clone)]
pub struct ListBootcampReviewsQuery {
    pub bootcamp_id: ObjectId,
}

#[derive(Debug, thiserror::Error)]
pub enum ListReviewsError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<ListReviewsError> for AppError {
    fn from(err: ListReviewsError) -> Self {
        match err {
            ListReviewsError::Query(e) => e.into(),
            ListReviewsError::Database(e) => e.into(),
        }
    }
}

impl Request<Result<AdvancedResults, ListReviewsError>> for ListReviewsQuery {}

impl crate::cqrs::middleware::Query for ListReviewsQuery {}

impl Request<Result<Vec<Document>, ListReviewsError>> for ListBootcampReviewsQuery {}

impl crate::cqrs::middleware::Query for ListBootcampReviewsQuery {}

#[tracing::instrument(skip(state))]
pub async fn handle(
    state: FeatureState,
    query: ListReviewsQuery,
) -> Result<AdvancedResults, ListReviewsError> {
    let list = translate(query.raw_query.as_deref(), &review::SCHEMA)?;
    Ok(advanced_results::execute(
        state.store.as_ref(),
        review::COLLECTION,
        list,
        POPULATE,
        &state.config.query,
    )
    .await?)
}

#[tracing::instrument(skip(state))]
pub async fn handle_for_bootcamp(
    state: FeatureState,
    query: ListBootcampReviewsQuery,
) -> Result<Vec<Document>, ListReviewsError> {
    let options = FindOptions {
        sort: advanced_results::default_sort(),
        ..FindOptions::default()
    };
    Ok(state
        .store
        .find(
            review::COLLECTION,
            &Filter::eq("bootcamp", query.bootcamp_id),
            &options,
        )
        .await?)
}

