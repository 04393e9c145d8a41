use mediator::Request;
use mongodb::bson::Document;

use super::{body_str, find_user};
use crate::auth::verify_password;
use crate::db::{DbError, Filter};
use crate::error::AppError;
use crate::features::FeatureState;
use crate::models::User;

#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub payload: Document,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Please provide an email and password")]
    MissingCredentials,

    /// Unknown email and wrong password are deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<LoginError> for AppError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::MissingCredentials => AppError::Validation(err.to_string()),
            LoginError::InvalidCredentials => AppError::InvalidCredentials,
            LoginError::Database(e) => e.into(),
        }
    }
}

impl Request<Result<User, LoginError>> for LoginCommand {}

impl crate::cqrs::middleware::Command for LoginCommand {}

#[tracing::instrument(skip(state, command))]
pub async fn handle(state: FeatureState, command: LoginCommand) -> Result<User, LoginError> {
    let (Some(email), Some(password)) = (
        body_str(&command.payload, "email"),
        body_str(&command.payload, "password"),
    ) else {
        return Err(LoginError::MissingCredentials);
    };

    let user = find_user(state.store.as_ref(), &Filter::eq("email", email))
        .await?
        .ok_or(LoginError::InvalidCredentials)?;

    if !verify_password(&password, &user.password) {
        tracing::debug!(user_id = %user.id, "Password mismatch");
        return Err(LoginError::InvalidCredentials);
    }

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(user)
}
