use mediator::Request;
use mongodb::bson::{oid::ObjectId, Document};

use super::list::POPULATE;
use crate::db::DbError;
use crate::error::AppError;
use crate::features::courses::commands::COURSES;
use crate::features::shared::advanced_results::populate_documents;
use crate::features::shared::ownership::{find_existing, OwnershipError};
use crate::features::FeatureState;

#[derive(Debug, Clone)]
pub struct GetCourseQuery {
    pub id: ObjectId,
}

#[derive(Debug, thiserror::Error)]
pub enum GetCourseError {
    #[error(transparent)]
    Lookup(#[from] OwnershipError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<GetCourseError> for AppError {
    fn from(err: GetCourseError) -> Self {
        match err {
            GetCourseError::Lookup(e) => e.into(),
            GetCourseError::Database(e) => e.into(),
        }
    }
}

impl Request<Result<Document, GetCourseError>> for GetCourseQuery {}

impl crate::cqrs::middleware::Query for GetCourseQuery {}

#[tracing::instrument(skip(state))]
pub async fn handle(state: FeatureState, query: GetCourseQuery) -> Result<Document, GetCourseError> {
    let store = state.store.as_ref();
    let course = find_existing(store, COURSES, query.id).await?;

    let mut found = [course];
    populate_documents(store, &mut found, POPULATE).await?;
    let [course] = found;
    Ok(course)
}
