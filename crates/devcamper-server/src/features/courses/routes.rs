//! Course API routes
//!
//! # Route Structure
//!
//! - `GET /api/v1/courses` - List courses with filters and pagination
//! - `GET /api/v1/courses/:id` - Get a course with its bootcamp summary
//! - `PUT /api/v1/courses/:id` - Update a course (owner, admin)
//! - `DELETE /api/v1/courses/:id` - Delete a course (owner, admin)
//!
//! Mounted by the bootcamps router:
//!
//! - `GET /api/v1/bootcamps/:id/courses` - Courses of one bootcamp
//! - `POST /api/v1/bootcamps/:id/courses` - Add a course (publisher, admin)

use axum::{
    extract::{rejection::JsonRejection, Path, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use super::{
    commands::{AddCourseCommand, DeleteCourseCommand, UpdateCourseCommand},
    queries::{GetCourseQuery, ListBootcampCoursesQuery, ListCoursesQuery},
};
use crate::api::response::ApiResponse;
use crate::auth::{require_role, CurrentUser};
use crate::db::parse_object_id;
use crate::error::AppError;
use crate::features::{body_document, FeatureState};
use crate::models::{document_to_json, Role};

/// Creates the courses router
pub fn courses_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", get(list_courses))
        .route(
            "/:id",
            get(get_course).put(update_course).delete(delete_course),
        )
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Add a course to a bootcamp
///
/// # Endpoint
///
/// `POST /api/v1/bootcamps/:id/courses`
///
/// # Response
///
/// - `201 Created` - Course created
/// - `400 Bad Request` - Validation error
/// - `403 Forbidden` - Not the bootcamp owner, or wrong role
/// - `404 Not Found` - No such bootcamp
#[tracing::instrument(skip(state, user, body))]
pub async fn add_course(
    State(state): State<FeatureState>,
    Path(id): Path<String>,
    user: CurrentUser,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let actor = user.actor();
    require_role(&actor, &[Role::Publisher, Role::Admin])?;

    let command = AddCourseCommand {
        actor,
        bootcamp_id: parse_object_id(&id)?,
        payload: body_document(body)?,
    };
    let created = super::commands::create::handle(state, command).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(document_to_json(&created))),
    )
        .into_response())
}

/// Update a course
///
/// # Endpoint
///
/// `PUT /api/v1/courses/:id`
#[tracing::instrument(skip(state, user, body))]
async fn update_course(
    State(state): State<FeatureState>,
    Path(id): Path<String>,
    user: CurrentUser,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let actor = user.actor();
    require_role(&actor, &[Role::Publisher, Role::Admin])?;

    let command = UpdateCourseCommand {
        actor,
        id: parse_object_id(&id)?,
        payload: body_document(body)?,
    };
    let updated = super::commands::update::handle(state, command).await?;

    Ok(Json(ApiResponse::success(document_to_json(&updated))).into_response())
}

/// Delete a course
///
/// # Endpoint
///
/// `DELETE /api/v1/courses/:id`
#[tracing::instrument(skip(state, user))]
async fn delete_course(
    State(state): State<FeatureState>,
    Path(id): Path<String>,
    user: CurrentUser,
) -> Result<Response, AppError> {
    let actor = user.actor();
    require_role(&actor, &[Role::Publisher, Role::Admin])?;

    let command = DeleteCourseCommand {
        actor,
        id: parse_object_id(&id)?,
    };
    super::commands::delete::handle(state, command).await?;

    Ok(Json(ApiResponse::success(json!({}))).into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

/// List courses
///
/// # Endpoint
///
/// `GET /api/v1/courses?tuition[lt]=10000&minimumSkill=beginner`
#[tracing::instrument(skip(state))]
async fn list_courses(
    State(state): State<FeatureState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Response, AppError> {
    let results = super::queries::list::handle(state, ListCoursesQuery { raw_query }).await?;
    Ok(Json(results.into_envelope()).into_response())
}

/// Courses of one bootcamp
///
/// # Endpoint
///
/// `GET /api/v1/bootcamps/:id/courses`
///
/// # Response
///
/// - `200 OK` - `{ success, count, data }`
#[tracing::instrument(skip(state))]
pub async fn list_bootcamp_courses(
    State(state): State<FeatureState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let query = ListBootcampCoursesQuery {
        bootcamp_id: parse_object_id(&id)?,
    };
    let courses = super::queries::list::handle_for_bootcamp(state, query).await?;

    let items: Vec<Value> = courses.iter().map(document_to_json).collect();
    Ok(Json(ApiResponse::list(items)).into_response())
}

/// Get a course
///
/// # Endpoint
///
/// `GET /api/v1/courses/:id`
#[tracing::instrument(skip(state))]
async fn get_course(
    State(state): State<FeatureState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let query = GetCourseQuery {
        id: parse_object_id(&id)?,
    };
    let course = super::queries::get::handle(state, query).await?;
    Ok(Json(ApiResponse::success(document_to_json(&course))).into_response())
}
