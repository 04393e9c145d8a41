use mediator::Request;

use crate::db::DbError;
use crate::error::AppError;
use crate::features::shared::advanced_results::{self, AdvancedResults};
use crate::features::shared::query_filter::{translate, QueryError};
use crate::features::users::commands::public_document;
use crate::features::FeatureState;
use crate::models::user;

/// Every user, through the filter/select/sort/page pipeline
#[derive(Debug, Clone, Default)]
pub struct ListUsersQuery {
    pub raw_query: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListUsersError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<ListUsersError> for AppError {
    fn from(err: ListUsersError) -> Self {
        match err {
            ListUsersError::Query(e) => e.into(),
            ListUsersError::Database(e) => e.into(),
        }
    }
}

impl Request<Result<AdvancedResults, ListUsersError>> for ListUsersQuery {}

impl crate::cqrs::middleware::Query for ListUsersQuery {}

#[tracing::instrument(skip(state))]
pub async fn handle(state: FeatureState, query: ListUsersQuery) -> Result<AdvancedResults, ListUsersError> {
    let list = translate(query.raw_query.as_deref(), &user::SCHEMA)?;
    let mut results = advanced_results::execute(
        state.store.as_ref(),
        user::COLLECTION,
        list,
        &[],
        &state.config.query,
    )
    .await?;

    results.data = results.data.into_iter().map(public_document).collect();
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{test_state, TestUser};
    use crate::models::Role;

    #[tokio::test]
    async fn test_list_hides_credentials() {
        let (state, _) = test_state();
        TestUser::new("a@gmail.com", Role::User).insert(&state).await;
        TestUser::new("b@gmail.com", Role::Publisher).insert(&state).await;

        let results = handle(
            state,
            ListUsersQuery {
                raw_query: Some("role=publisher".to_string()),
            },
        )
        .await
        .unwrap();

        assert_eq!(results.total, 1);
        assert_eq!(results.data[0].get_str("email").unwrap(), "b@gmail.com");
        assert!(results.data[0].get("password").is_none());
    }
}
