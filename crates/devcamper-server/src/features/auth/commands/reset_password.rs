use mediator::Request;
use mongodb::bson::Document;

use super::{find_user, validated_password};
use crate::auth::{hash_password, hash_reset_token, AuthError};
use crate::db::{CmpOp, DbError, Filter, Update};
use crate::error::AppError;
use crate::features::FeatureState;
use crate::models::document::now;
use crate::models::user::COLLECTION;
use crate::models::{SchemaError, User};

/// Set a new password using the raw token from a reset email
#[derive(Debug, Clone)]
pub struct ResetPasswordCommand {
    pub reset_token: String,
    pub payload: Document,
}

#[derive(Debug, thiserror::Error)]
pub enum ResetPasswordError {
    /// Token unknown, already used or expired
    #[error("Invalid token")]
    InvalidToken,

    #[error(transparent)]
    Validation(#[from] SchemaError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<ResetPasswordError> for AppError {
    fn from(err: ResetPasswordError) -> Self {
        match err {
            ResetPasswordError::InvalidToken => AppError::Validation(err.to_string()),
            ResetPasswordError::Validation(e) => AppError::Validation(e.to_string()),
            ResetPasswordError::Auth(e) => e.into(),
            ResetPasswordError::Database(e) => e.into(),
        }
    }
}

impl Request<Result<User, ResetPasswordError>> for ResetPasswordCommand {}

impl crate::cqrs::middleware::Command for ResetPasswordCommand {}

#[tracing::instrument(skip(state, command))]
pub async fn handle(
    state: FeatureState,
    command: ResetPasswordCommand,
) -> Result<User, ResetPasswordError> {
    let store = state.store.as_ref();

    let filter = Filter::eq("resetPasswordToken", hash_reset_token(&command.reset_token))
        .and(Filter::cmp("resetPasswordExpire", CmpOp::Gt, now()));
    let user = find_user(store, &filter)
        .await?
        .ok_or(ResetPasswordError::InvalidToken)?;

    let password = validated_password(&command.payload, "password")?;
    let update = Update::default()
        .set_field("password", hash_password(&password)?)
        .unset_field("resetPasswordToken")
        .unset_field("resetPasswordExpire");

    let updated = store
        .update_one(COLLECTION, &Filter::by_id(user.id), &update)
        .await?
        .ok_or(ResetPasswordError::InvalidToken)?;

    tracing::info!(user_id = %user.id, "Password reset");
    Ok(User::from_document(updated)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{verify_password, ResetToken};
    use crate::features::shared::test_helpers::{test_state, TestUser};
    use crate::models::document::to_bson_datetime;
    use crate::models::Role;
    use chrono::Duration;
    use mongodb::bson::doc;

    async fn with_token(state: &FeatureState, user: &User, ttl: Duration) -> ResetToken {
        let token = ResetToken::generate(ttl);
        let update = Update::default()
            .set_field("resetPasswordToken", token.hashed.clone())
            .set_field("resetPasswordExpire", to_bson_datetime(token.expires_at));
        state
            .store
            .update_one(COLLECTION, &Filter::by_id(user.id), &update)
            .await
            .unwrap();
        token
    }

    #[tokio::test]
    async fn test_reset_password() {
        let (state, _) = test_state();
        let user = TestUser::new("john@gmail.com", Role::User).insert(&state).await;
        let token = with_token(&state, &user, Duration::minutes(10)).await;

        let updated = handle(
            state.clone(),
            ResetPasswordCommand {
                reset_token: token.raw.clone(),
                payload: doc! { "password": "abcdef" },
            },
        )
        .await
        .unwrap();
        assert!(verify_password("abcdef", &updated.password));
        assert!(updated.reset_password_token.is_none());

        // A token works once
        let err = handle(
            state,
            ResetPasswordCommand {
                reset_token: token.raw,
                payload: doc! { "password": "ghijkl" },
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ResetPasswordError::InvalidToken));
    }

    #[tokio::test]
    async fn test_expired_token() {
        let (state, _) = test_state();
        let user = TestUser::new("john@gmail.com", Role::User).insert(&state).await;
        let token = with_token(&state, &user, Duration::minutes(-1)).await;

        let err = handle(
            state,
            ResetPasswordCommand {
                reset_token: token.raw,
                payload: doc! { "password": "abcdef" },
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ResetPasswordError::InvalidToken));
    }

    #[tokio::test]
    async fn test_short_password() {
        let (state, _) = test_state();
        let user = TestUser::new("john@gmail.com", Role::User).insert(&state).await;
        let token = with_token(&state, &user, Duration::minutes(10)).await;

        let err = handle(
            state,
            ResetPasswordCommand {
                reset_token: token.raw,
                payload: doc! { "password": "abc" },
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 characters");
    }
}
