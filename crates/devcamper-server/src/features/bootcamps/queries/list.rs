//! List bootcamps query
//!
//! Filtering, projection, sorting and pagination come from the raw query
//! string; each bootcamp carries its courses.

use mediator::Request;

use crate::db::DbError;
use crate::error::AppError;
use crate::features::shared::advanced_results::{self, AdvancedResults, Population};
use crate::features::shared::query_filter::{translate, QueryError};
use crate::features::FeatureState;
use crate::models::{bootcamp, course};

const POPULATE: &[Population] = &[Population::virtual_many(
    "courses",
    course::COLLECTION,
    "bootcamp",
    &[],
)];

#[derive(Debug, Clone, Default)]
pub struct ListBootcampsQuery {
    /// Undecoded query string, e.g. `averageCost[lte]=10000&select=name`
    pub raw_query: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListBootcampsError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<ListBootcampsError> for AppError {
    fn from(err: ListBootcampsError) -> Self {
        match err {
            ListBootcampsError::Query(e) => e.into(),
            ListBootcampsError::Database(e) => e.into(),
        }
    }
}

impl Request<Result<AdvancedResults, ListBootcampsError>> for ListBootcampsQuery {}

impl crate::cqrs::middleware::Query for ListBootcampsQuery {}

#[tracing::instrument(skip(state))]
pub async fn handle(
    state: FeatureState,
    query: ListBootcampsQuery,
) -> Result<AdvancedResults, ListBootcampsError> {
    let list = translate(query.raw_query.as_deref(), &bootcamp::SCHEMA)?;
    let results = advanced_results::execute(
        state.store.as_ref(),
        bootcamp::COLLECTION,
        list,
        POPULATE,
        &state.config.query,
    )
    .await?;
    Ok(results)
}
