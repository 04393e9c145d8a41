use mediator::Request;
use mongodb::bson::{oid::ObjectId, Document};

use super::COURSES;
use crate::db::DbError;
use crate::error::AppError;
use crate::features::shared::aggregates::refresh_average_cost;
use crate::features::shared::ownership::{delete_owned, OwnershipError};
use crate::features::FeatureState;
use crate::models::Actor;

#[derive(Debug, Clone)]
pub struct DeleteCourseCommand {
    pub actor: Actor,
    pub id: ObjectId,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteCourseError {
    #[error(transparent)]
    Ownership(#[from] OwnershipError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<DeleteCourseError> for AppError {
    fn from(err: DeleteCourseError) -> Self {
        match err {
            DeleteCourseError::Ownership(e) => e.into(),
            DeleteCourseError::Database(e) => e.into(),
        }
    }
}

impl Request<Result<Document, DeleteCourseError>> for DeleteCourseCommand {}

impl crate::cqrs::middleware::Command for DeleteCourseCommand {}

#[tracing::instrument(skip(state, command), fields(id = %command.id, actor = %command.actor.id))]
pub async fn handle(
    state: FeatureState,
    command: DeleteCourseCommand,
) -> Result<Document, DeleteCourseError> {
    let store = state.store.as_ref();
    let deleted = delete_owned(store, COURSES, command.id, &command.actor).await?;

    if let Ok(bootcamp_id) = deleted.get_object_id("bootcamp") {
        refresh_average_cost(store, bootcamp_id).await?;
    }

    tracing::info!("Course deleted");
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Filter;
    use crate::features::shared::test_helpers::{test_state, TestBootcamp, TestUser};
    use crate::models::{bootcamp, course, Role};
    use mongodb::bson::doc;

    #[tokio::test]
    async fn test_deleting_last_course_clears_average_cost() {
        let (state, _) = test_state();
        let owner = TestUser::publisher("pub@example.com").insert(&state).await;
        let camp = TestBootcamp::new(&owner, "Camp").insert(&state).await;
        let camp_id = camp.get_object_id("_id").unwrap();
        state
            .store
            .update_one(
                bootcamp::COLLECTION,
                &Filter::by_id(camp_id),
                &crate::db::Update::default().set_field("averageCost", 1000_i64),
            )
            .await
            .unwrap();
        let course = state
            .store
            .insert_one(
                course::COLLECTION,
                doc! { "title": "c", "tuition": 1000, "bootcamp": camp_id, "user": owner.id },
            )
            .await
            .unwrap();

        let admin = TestUser::new("admin@example.com", Role::Admin).insert(&state).await;
        handle(
            state.clone(),
            DeleteCourseCommand {
                actor: admin.actor(),
                id: course.get_object_id("_id").unwrap(),
            },
        )
        .await
        .unwrap();

        let stored = state
            .store
            .find_one(bootcamp::COLLECTION, &Filter::by_id(camp_id))
            .await
            .unwrap()
            .unwrap();
        assert!(!stored.contains_key("averageCost"));
    }
}
