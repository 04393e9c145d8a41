use mediator::Request;
use mongodb::bson::Document;

use super::{body_str, find_user, validated_password};
use crate::auth::{hash_password, verify_password, AuthError};
use crate::db::{DbError, Filter, Update};
use crate::error::AppError;
use crate::features::FeatureState;
use crate::models::user::COLLECTION;
use crate::models::{Actor, SchemaError, User};

/// Change the password after proving the current one
#[derive(Debug, Clone)]
pub struct UpdatePasswordCommand {
    pub actor: Actor,
    pub payload: Document,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdatePasswordError {
    #[error("Password is incorrect")]
    IncorrectPassword,

    #[error("No user with the id of {0}")]
    NotFound(String),

    #[error(transparent)]
    Validation(#[from] SchemaError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<UpdatePasswordError> for AppError {
    fn from(err: UpdatePasswordError) -> Self {
        match err {
            UpdatePasswordError::IncorrectPassword => AppError::Unauthorized(err.to_string()),
            UpdatePasswordError::NotFound(_) => AppError::NotFound(err.to_string()),
            UpdatePasswordError::Validation(e) => AppError::Validation(e.to_string()),
            UpdatePasswordError::Auth(e) => e.into(),
            UpdatePasswordError::Database(e) => e.into(),
        }
    }
}

impl Request<Result<User, UpdatePasswordError>> for UpdatePasswordCommand {}

impl crate::cqrs::middleware::Command for UpdatePasswordCommand {}

#[tracing::instrument(skip(state, command), fields(actor = %command.actor.id))]
pub async fn handle(
    state: FeatureState,
    command: UpdatePasswordCommand,
) -> Result<User, UpdatePasswordError> {
    let store = state.store.as_ref();
    let id = command.actor.id;

    let user = find_user(store, &Filter::by_id(id))
        .await?
        .ok_or_else(|| UpdatePasswordError::NotFound(id.to_hex()))?;

    let current = body_str(&command.payload, "currentPassword").unwrap_or_default();
    if !verify_password(&current, &user.password) {
        return Err(UpdatePasswordError::IncorrectPassword);
    }

    let password = validated_password(&command.payload, "newPassword")?;
    let update = Update::default().set_field("password", hash_password(&password)?);
    let updated = store
        .update_one(COLLECTION, &Filter::by_id(id), &update)
        .await?
        .ok_or_else(|| UpdatePasswordError::NotFound(id.to_hex()))?;

    tracing::info!("Password changed");
    Ok(User::from_document(updated)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{test_state, TestUser};
    use crate::models::Role;
    use mongodb::bson::doc;

    #[tokio::test]
    async fn test_update_password() {
        let (state, _) = test_state();
        let user = TestUser::new("john@gmail.com", Role::User).insert(&state).await;

        let updated = handle(
            state,
            UpdatePasswordCommand {
                actor: user.actor(),
                payload: doc! { "currentPassword": "123456", "newPassword": "abcdef" },
            },
        )
        .await
        .unwrap();
        assert!(verify_password("abcdef", &updated.password));
        assert!(!verify_password("123456", &updated.password));
    }

    #[tokio::test]
    async fn test_wrong_current_password() {
        let (state, _) = test_state();
        let user = TestUser::new("john@gmail.com", Role::User).insert(&state).await;

        let err = handle(
            state,
            UpdatePasswordCommand {
                actor: user.actor(),
                payload: doc! { "currentPassword": "nope", "newPassword": "abcdef" },
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, UpdatePasswordError::IncorrectPassword));
        assert_eq!(AppError::from(err).status_code(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
