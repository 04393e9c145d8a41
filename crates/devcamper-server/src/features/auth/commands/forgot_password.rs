//! Forgot password command
//!
//! Stores the hash of a fresh reset token on the user and mails the raw
//! token as a link. If the mail can not be sent the token is cleared again.

use chrono::Duration;
use mediator::Request;
use mongodb::bson::Document;

use super::{body_str, find_user};
use crate::auth::ResetToken;
use crate::db::{DbError, Filter, Update};
use crate::error::AppError;
use crate::features::FeatureState;
use crate::mailer::{EmailMessage, MailError};
use crate::models::document::to_bson_datetime;
use crate::models::user::COLLECTION;

pub const RESET_SUBJECT: &str = "Password reset token";

#[derive(Debug, Clone)]
pub struct ForgotPasswordCommand {
    pub payload: Document,
}

#[derive(Debug, thiserror::Error)]
pub enum ForgotPasswordError {
    #[error("There is no user with that email")]
    UnknownEmail,

    #[error("Email could not be sent")]
    Delivery(#[source] MailError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<ForgotPasswordError> for AppError {
    fn from(err: ForgotPasswordError) -> Self {
        match err {
            ForgotPasswordError::UnknownEmail => AppError::NotFound(err.to_string()),
            ForgotPasswordError::Delivery(_) => AppError::EmailDeliveryFailed,
            ForgotPasswordError::Database(e) => e.into(),
        }
    }
}

impl Request<Result<(), ForgotPasswordError>> for ForgotPasswordCommand {}

impl crate::cqrs::middleware::Command for ForgotPasswordCommand {}

fn reset_message(to: &str, url: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: RESET_SUBJECT.to_string(),
        text: format!(
            "You are receiving this email because you (or someone else) has requested \
             the reset of a password. Please make a PUT request to:\n\n{}",
            url
        ),
    }
}

#[tracing::instrument(skip(state, command))]
pub async fn handle(
    state: FeatureState,
    command: ForgotPasswordCommand,
) -> Result<(), ForgotPasswordError> {
    let store = state.store.as_ref();
    let email = body_str(&command.payload, "email").ok_or(ForgotPasswordError::UnknownEmail)?;
    let user = find_user(store, &Filter::eq("email", email))
        .await?
        .ok_or(ForgotPasswordError::UnknownEmail)?;

    let token = ResetToken::generate(Duration::minutes(state.config.auth.reset_token_ttl_minutes));
    let set = Update::default()
        .set_field("resetPasswordToken", token.hashed.clone())
        .set_field("resetPasswordExpire", to_bson_datetime(token.expires_at));
    store.update_one(COLLECTION, &Filter::by_id(user.id), &set).await?;

    let url = format!(
        "{}/api/v1/auth/resetpassword/{}",
        state.config.server.public_url.trim_end_matches('/'),
        token.raw
    );

    if let Err(e) = state.mailer.send(&reset_message(&user.email, &url)).await {
        tracing::error!(user_id = %user.id, error = %e, "Reset email failed, clearing token");
        let clear = Update::default()
            .unset_field("resetPasswordToken")
            .unset_field("resetPasswordExpire");
        store.update_one(COLLECTION, &Filter::by_id(user.id), &clear).await?;
        return Err(ForgotPasswordError::Delivery(e));
    }

    tracing::info!(user_id = %user.id, "Reset email sent");
    Ok(())
}
