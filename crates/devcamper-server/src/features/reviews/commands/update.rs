use mediator::Request;
use mongodb::bson::{oid::ObjectId, Document};

use super::REVIEWS;
use crate::db::{DbError, Update};
use crate::error::AppError;
use crate::features::shared::aggregates::refresh_average_rating;
use crate::features::shared::ownership::{find_owned, update_owned, OwnershipError};
use crate::features::FeatureState;
use crate::models::review::SCHEMA;
use crate::models::{Actor, Mode, SchemaError};

#[derive(Debug, Clone)]
pub struct UpdateReviewCommand {
    pub actor: Actor,
    pub id: ObjectId,
    pub payload: Document,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateReviewError {
    #[error(transparent)]
    Validation(#[from] SchemaError),

    #[error(transparent)]
    Ownership(#[from] OwnershipError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<UpdateReviewError> for AppError {
    fn from(err: UpdateReviewError) -> Self {
        match err {
            UpdateReviewError::Validation(e) => AppError::Validation(e.to_string()),
            UpdateReviewError::Ownership(e) => e.into(),
            UpdateReviewError::Database(e) => e.into(),
        }
    }
}

impl Request<Result<Document, UpdateReviewError>> for UpdateReviewCommand {}

impl crate::cqrs::middleware::Command for UpdateReviewCommand {}

#[tracing::instrument(skip(state, command), fields(id = %command.id, actor = %command.actor.id))]
pub async fn handle(
    state: FeatureState,
    command: UpdateReviewCommand,
) -> Result<Document, UpdateReviewError> {
    let store = state.store.as_ref();

    find_owned(store, REVIEWS, command.id, &command.actor, "update").await?;

    let set = SCHEMA.prepare(command.payload, Mode::Update)?;
    let updated = update_owned(store, REVIEWS, command.id, &command.actor, &Update::set(set)).await?;

    if let Ok(bootcamp_id) = updated.get_object_id("bootcamp") {
        refresh_average_rating(store, bootcamp_id).await?;
    }

    tracing::info!("Review updated");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{test_state, TestUser};
    use crate::models::{review, Role};
    use mongodb::bson::doc;

    #[tokio::test]
    async fn test_only_author_or_admin_updates() {
        let (state, _) = test_state();
        let author = TestUser::new("author@example.com", Role::User).insert(&state).await;
        let other = TestUser::new("other@example.com", Role::User).insert(&state).await;
        let admin = TestUser::new("admin@example.com", Role::Admin).insert(&state).await;
        let stored = state
            .store
            .insert_one(
                review::COLLECTION,
                doc! { "title": "t", "text": "x", "rating": 5, "user": author.id, "bootcamp": ObjectId::new() },
            )
            .await
            .unwrap();
        let id = stored.get_object_id("_id").unwrap();

        let command = |actor: Actor| UpdateReviewCommand {
            actor,
            id,
            payload: doc! { "rating": 9 },
        };

        let err = handle(state.clone(), command(other.actor())).await.unwrap_err();
        assert!(matches!(err, UpdateReviewError::Ownership(OwnershipError::Forbidden { .. })));

        let updated = handle(state.clone(), command(author.actor())).await.unwrap();
        assert_eq!(updated.get_i32("rating").unwrap(), 9);

        assert!(handle(state, command(admin.actor())).await.is_ok());
    }
}
