//! Resource models
//!
//! Resources are stored as BSON documents. Each module declares the
//! collection name and the [`schema::Schema`] used to validate writes;
//! `user` additionally carries typed views used by the auth layer.

pub mod bootcamp;
pub mod course;
pub mod document;
pub mod review;
pub mod schema;
pub mod user;

pub use document::{document_to_json, json_to_document};
pub use schema::{Mode, Schema, SchemaError};
pub use user::{Actor, Role, User, UserProfile};
