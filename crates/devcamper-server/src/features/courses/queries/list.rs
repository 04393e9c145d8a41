use mediator::Request;
use mongodb::bson::{oid::ObjectId, Document};

use crate::db::{DbError, Filter, FindOptions};
use crate::error::AppError;
use crate::features::shared::advanced_results::{self, AdvancedResults, Population};
use crate::features::shared::query_filter::{translate, QueryError};
use crate::features::FeatureState;
use crate::models::{bootcamp, course};

/// Each course carries its bootcamp's name and description
pub(crate) const POPULATE: &[Population] = &[Population::reference(
    "bootcamp",
    bootcamp::COLLECTION,
    &["name", "description"],
)];

/// Every course, through the filter/select/sort/page pipeline
#[derive(Debug, Clone, Default)]
pub struct ListCoursesQuery {
    pub raw_query: Option<String>,
}

/// The courses of one bootcamp, unpaginated
#[derive(Debug, Clone)]
pub struct ListBootcampCoursesQuery {
    pub bootcamp_id: ObjectId,
}

#[derive(Debug, thiserror::Error)]
pub enum ListCoursesError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<ListCoursesError> for AppError {
    fn from(err: ListCoursesError) -> Self {
        match err {
            ListCoursesError::Query(e) => e.into(),
            ListCoursesError::Database(e) => e.into(),
        }
    }
}

impl Request<Result<AdvancedResults, ListCoursesError>> for ListCoursesQuery {}

impl crate::cqrs::middleware::Query for ListCoursesQuery {}

impl Request<Result<Vec<Document>, ListCoursesError>> for ListBootcampCoursesQuery {}

impl crate::cqrs::middleware::Query for ListBootcampCoursesQuery {}

#[tracing::instrument(skip(state))]
pub async fn handle(
    state: FeatureState,
    query: ListCoursesQuery,
) -> Result<AdvancedResults, ListCoursesError> {
    let list = translate(query.raw_query.as_deref(), &course::SCHEMA)?;
    Ok(advanced_results::execute(
        state.store.as_ref(),
        course::COLLECTION,
        list,
        POPULATE,
        &state.config.query,
    )
    .await?)
}

#[tracing::instrument(skip(state))]
pub async fn handle_for_bootcamp(
    state: FeatureState,
    query: ListBootcampCoursesQuery,
) -> Result<Vec<Document>, ListCoursesError> {
    let options = FindOptions {
        sort: advanced_results::default_sort(),
        ..FindOptions::default()
    };
    Ok(state
        .store
        .find(
            course::COLLECTION,
            &Filter::eq("bootcamp", query.bootcamp_id),
            &options,
        )
        .await?)
}
