//! Add course command
//!
//! Courses are created under a bootcamp; only that bootcamp's owner (or an
//! admin) may add one. The bootcamp's average cost is refreshed afterwards.

use mediator::Request;
use mongodb::bson::{oid::ObjectId, Document};

use crate::db::DbError;
use crate::error::AppError;
use crate::features::bootcamps::commands::BOOTCAMPS;
use crate::features::shared::aggregates::refresh_average_cost;
use crate::features::shared::ownership::{find_owned, OwnershipError};
use crate::features::FeatureState;
use crate::models::course::{COLLECTION, SCHEMA};
use crate::models::document::now;
use crate::models::{Actor, Mode, SchemaError};

#[derive(Debug, Clone)]
pub struct AddCourseCommand {
    pub actor: Actor,
    pub bootcamp_id: ObjectId,
    pub payload: Document,
}

#[derive(Debug, thiserror::Error)]
pub enum AddCourseError {
    #[error(transparent)]
    Validation(#[from] SchemaError),

    #[error(transparent)]
    Ownership(#[from] OwnershipError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<AddCourseError> for AppError {
    fn from(err: AddCourseError) -> Self {
        match err {
            AddCourseError::Validation(e) => AppError::Validation(e.to_string()),
            AddCourseError::Ownership(e) => e.into(),
            AddCourseError::Database(e) => e.into(),
        }
    }
}

impl Request<Result<Document, AddCourseError>> for AddCourseCommand {}

impl crate::cqrs::middleware::Command for AddCourseCommand {}

#[tracing::instrument(skip(state, command), fields(bootcamp_id = %command.bootcamp_id, actor = %command.actor.id))]
pub async fn handle(state: FeatureState, command: AddCourseCommand) -> Result<Document, AddCourseError> {
    let store = state.store.as_ref();

    find_owned(
        store,
        BOOTCAMPS,
        command.bootcamp_id,
        &command.actor,
        "add a course to",
    )
    .await?;

    let mut document = SCHEMA.prepare(command.payload, Mode::Create)?;
    document.insert("bootcamp", command.bootcamp_id);
    document.insert("user", command.actor.id);
    document.insert("createdAt", now());

    let created = store.insert_one(COLLECTION, document).await?;
    refresh_average_cost(store, command.bootcamp_id).await?;

    tracing::info!("Course added");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Filter;
    use crate::features::shared::test_helpers::{test_state, TestBootcamp, TestUser};
    use crate::models::bootcamp;
    use mongodb::bson::doc;

    fn course(tuition: i64) -> Document {
        doc! {
            "title": "Front End Web Development",
            "description": "HTML, CSS and JavaScript",
            "weeks": "8",
            "tuition": tuition,
            "minimumSkill": "beginner",
        }
    }

    #[tokio::test]
    async fn test_add_course_refreshes_average_cost() {
        let (state, _) = test_state();
        let owner = TestUser::publisher("pub@example.com").insert(&state).await;
        let camp = TestBootcamp::new(&owner, "Camp").insert(&state).await;
        let camp_id = camp.get_object_id("_id").unwrap();

        for tuition in [8000, 10001] {
            handle(
                state.clone(),
                AddCourseCommand {
                    actor: owner.actor(),
                    bootcamp_id: camp_id,
                    payload: course(tuition),
                },
            )
            .await
            .unwrap();
        }

        let stored = state
            .store
            .find_one(bootcamp::COLLECTION, &Filter::by_id(camp_id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.get_i64("averageCost").unwrap(), 9010);
    }

    #[tokio::test]
    async fn test_only_bootcamp_owner_may_add() {
        let (state, _) = test_state();
        let owner = TestUser::publisher("pub@example.com").insert(&state).await;
        let other = TestUser::publisher("other@example.com").insert(&state).await;
        let camp = TestBootcamp::new(&owner, "Camp").insert(&state).await;

        let err = handle(
            state,
            AddCourseCommand {
                actor: other.actor(),
                bootcamp_id: camp.get_object_id("_id").unwrap(),
                payload: course(1000),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("User {} is not authorized to add a course to this bootcamp", other.id)
        );
    }

    #[tokio::test]
    async fn test_missing_bootcamp() {
        let (state, _) = test_state();
        let owner = TestUser::publisher("pub@example.com").insert(&state).await;
        let id = ObjectId::new();
        let err = handle(
            state,
            AddCourseCommand {
                actor: owner.actor(),
                bootcamp_id: id,
                payload: course(1000),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), format!("No bootcamp with the id of {}", id));
    }
}
