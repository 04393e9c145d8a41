pub mod forgot_password;
pub mod login;
pub mod register;
pub mod reset_password;
pub mod update_details;
pub mod update_password;

use mongodb::bson::{doc, Document};

use crate::db::{DbResult, DocumentStore, Filter};
use crate::models::{user, Mode, SchemaError, User};

pub use forgot_password::{ForgotPasswordCommand, ForgotPasswordError};
pub use login::{LoginCommand, LoginError};
pub use register::{RegisterCommand, RegisterError};
pub use reset_password::{ResetPasswordCommand, ResetPasswordError};
pub use update_details::{UpdateDetailsCommand, UpdateDetailsError};
pub use update_password::{UpdatePasswordCommand, UpdatePasswordError};

/// Non-empty string field of a request body
pub(crate) fn body_str(body: &Document, field: &str) -> Option<String> {
    body.get_str(field)
        .ok()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

pub(crate) async fn find_user(store: &dyn DocumentStore, filter: &Filter) -> DbResult<Option<User>> {
    store
        .find_one(user::COLLECTION, filter)
        .await?
        .map(User::from_document)
        .transpose()
}

/// New password taken from `field`, checked against the user schema rules
pub(crate) fn validated_password(body: &Document, field: &str) -> Result<String, SchemaError> {
    let value = body
        .get(field)
        .cloned()
        .ok_or_else(|| SchemaError::Invalid(vec!["Please add a password".to_string()]))?;
    let prepared = user::SCHEMA.prepare(doc! { "password": value }, Mode::Update)?;
    Ok(prepared.get_str("password").unwrap_or_default().to_string())
}
