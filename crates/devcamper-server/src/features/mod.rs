//! Feature modules implementing the DevCamper API
//!
//! Each feature is a vertical slice following the CQRS pattern, with its
//! own commands, queries and routes.
//!
//! # Features
//!
//! - **bootcamps**: bootcamp CRUD, radius search, cascade delete
//! - **courses**: courses, listed globally or per bootcamp
//! - **reviews**: reviews, listed globally or per bootcamp
//! - **auth**: registration, login, session and password management
//! - **users**: admin-only user management
//!
//! # Architecture
//!
//! Each feature module follows the structure:
//! - `commands/` - Write operations (create, update, delete)
//! - `queries/` - Read operations (get, list)
//! - `routes.rs` - HTTP route definitions
//!
//! Commands and queries are data structs implementing `mediator::Request`;
//! the routes call each one's standalone `handle` function with the shared
//! [`FeatureState`].

pub mod auth;
pub mod bootcamps;
pub mod courses;
pub mod reviews;
pub mod shared;
pub mod users;

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, Json, Router};
use mongodb::bson::Document;
use serde_json::Value;

use crate::config::Config;
use crate::db::{DbError, Store};
use crate::error::{AppError, AppResult};
use crate::geocoder::Geocoder;
use crate::mailer::Mailer;
use crate::models::json_to_document;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// Document store holding every collection
    pub store: Store,
    pub config: Arc<Config>,
    /// Address resolution for bootcamp creation and radius search
    pub geocoder: Arc<dyn Geocoder>,
    /// Outgoing mail for password resets
    pub mailer: Arc<dyn Mailer>,
}

/// Creates the API router with all feature routes mounted
///
/// Each feature is mounted under its own path prefix:
/// - `/bootcamps` - Bootcamps, plus nested `/:id/courses` and `/:id/reviews`
/// - `/courses` - Courses
/// - `/reviews` - Reviews
/// - `/auth` - Authentication
/// - `/users` - User administration
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .nest("/bootcamps", bootcamps::bootcamps_routes())
        .nest("/courses", courses::courses_routes())
        .nest("/reviews", reviews::reviews_routes())
        .nest("/auth", auth::auth_routes())
        .nest("/users", users::users_routes())
        .with_state(state)
}

/// Unwrap a JSON request body into a document
pub fn body_document(body: Result<Json<Value>, JsonRejection>) -> AppResult<Document> {
    let Json(body) = body?;
    json_to_document(&body).map_err(|e| match e {
        DbError::Serialization(message) => AppError::Validation(message),
        other => other.into(),
    })
}
