//! User administration routes
//!
//! Every route requires an admin session.
//!
//! - `GET /api/v1/users` - List users with filters and pagination
//! - `POST /api/v1/users` - Create a user
//! - `GET /api/v1/users/:id` - Get a user
//! - `PUT /api/v1/users/:id` - Update a user
//! - `DELETE /api/v1/users/:id` - Delete a user

use axum::{
    extract::{rejection::JsonRejection, Path, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use super::{
    commands::{CreateUserCommand, DeleteUserCommand, UpdateUserCommand},
    queries::{GetUserQuery, ListUsersQuery},
};
use crate::api::response::ApiResponse;
use crate::auth::{require_role, CurrentUser};
use crate::db::parse_object_id;
use crate::error::AppError;
use crate::features::{body_document, FeatureState};
use crate::models::{document_to_json, Role};

/// Creates the users router
pub fn users_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    require_role(&user.actor(), &[Role::Admin])
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Create a user
///
/// # Endpoint
///
/// `POST /api/v1/users`
///
/// # Response
///
/// - `201 Created` - User created, without credential fields
/// - `400 Bad Request` - Validation error or duplicate email
/// - `403 Forbidden` - Not an admin
#[tracing::instrument(skip(state, user, body), fields(admin = %user.0.id))]
async fn create_user(
    State(state): State<FeatureState>,
    user: CurrentUser,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    require_admin(&user)?;

    let command = CreateUserCommand {
        payload: body_document(body)?,
    };
    let created = super::commands::create::handle(state, command).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(document_to_json(&created))),
    )
        .into_response())
}

/// Update a user
///
/// # Endpoint
///
/// `PUT /api/v1/users/:id`
#[tracing::instrument(skip(state, user, body), fields(admin = %user.0.id))]
async fn update_user(
    State(state): State<FeatureState>,
    Path(id): Path<String>,
    user: CurrentUser,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    require_admin(&user)?;

    let command = UpdateUserCommand {
        id: parse_object_id(&id)?,
        payload: body_document(body)?,
    };
    let updated = super::commands::update::handle(state, command).await?;

    Ok(Json(ApiResponse::success(document_to_json(&updated))).into_response())
}

/// Delete a user
///
/// # Endpoint
///
/// `DELETE /api/v1/users/:id`
#[tracing::instrument(skip(state, user), fields(admin = %user.0.id))]
async fn delete_user(
    State(state): State<FeatureState>,
    Path(id): Path<String>,
    user: CurrentUser,
) -> Result<Response, AppError> {
    require_admin(&user)?;

    let command = DeleteUserCommand {
        id: parse_object_id(&id)?,
    };
    super::commands::delete::handle(state, command).await?;

    Ok(Json(ApiResponse::success(json!({}))).into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

/// List users
///
/// # Endpoint
///
/// `GET /api/v1/users?role=publisher&select=name,email`
#[tracing::instrument(skip(state, user), fields(admin = %user.0.id))]
async fn list_users(
    State(state): State<FeatureState>,
    user: CurrentUser,
    RawQuery(raw_query): RawQuery,
) -> Result<Response, AppError> {
    require_admin(&user)?;

    let results = super::queries::list::handle(state, ListUsersQuery { raw_query }).await?;
    Ok(Json(results.into_envelope()).into_response())
}

/// Get a user
///
/// # Endpoint
///
/// `GET /api/v1/users/:id`
#[tracing::instrument(skip(state, user), fields(admin = %user.0.id))]
async fn get_user(
    State(state): State<FeatureState>,
    Path(id): Path<String>,
    user: CurrentUser,
) -> Result<Response, AppError> {
    require_admin(&user)?;

    let query = GetUserQuery {
        id: parse_object_id(&id)?,
    };
    let found = super::queries::get::handle(state, query).await?;
    Ok(Json(ApiResponse::success(document_to_json(&found))).into_response())
}
