use mediator::Request;

use crate::db::{DbError, Filter};
use crate::error::AppError;
use crate::features::auth::commands::find_user;
use crate::features::FeatureState;
use crate::models::{Actor, UserProfile};

/// The signed-in user, freshly read from the store
#[derive(Debug, Clone)]
pub struct GetMeQuery {
    pub actor: Actor,
}

#[derive(Debug, thiserror::Error)]
pub enum GetMeError {
    #[error("No user with the id of {0}")]
    NotFound(String),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<GetMeError> for AppError {
    fn from(err: GetMeError) -> Self {
        match err {
            GetMeError::NotFound(_) => AppError::NotFound(err.to_string()),
            GetMeError::Database(e) => e.into(),
        }
    }
}

impl Request<Result<UserProfile, GetMeError>> for GetMeQuery {}

impl crate::cqrs::middleware::Query for GetMeQuery {}

#[tracing::instrument(skip(state), fields(actor = %query.actor.id))]
pub async fn handle(state: FeatureState, query: GetMeQuery) -> Result<UserProfile, GetMeError> {
    let user = find_user(state.store.as_ref(), &Filter::by_id(query.actor.id))
        .await?
        .ok_or_else(|| GetMeError::NotFound(query.actor.id.to_hex()))?;
    Ok(user.profile())
}
