pub mod create;
pub mod delete;
pub mod update;

use mongodb::bson::Document;

use crate::features::shared::Resource;
use crate::models::user;

pub(crate) const USERS: Resource = Resource {
    collection: user::COLLECTION,
    name: "user",
};

/// Stored fields never sent back to clients
const CREDENTIAL_FIELDS: &[&str] = &["password", "resetPasswordToken", "resetPasswordExpire"];

/// Drop credential fields from a stored user document
pub(crate) fn public_document(mut document: Document) -> Document {
    for field in CREDENTIAL_FIELDS {
        document.remove(*field);
    }
    document
}

pub use create::{CreateUserCommand, CreateUserError};
pub use delete::{DeleteUserCommand, DeleteUserError};
pub use update::{UpdateUserCommand, UpdateUserError};
