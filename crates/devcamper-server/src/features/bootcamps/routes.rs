//! Bootcamp API routes
//!
//! # Route Structure
//!
//! - `GET /api/v1/bootcamps` - List bootcamps with filters and pagination
//! - `POST /api/v1/bootcamps` - Create a bootcamp (publisher, admin)
//! - `GET /api/v1/bootcamps/radius/:zipcode/:distance` - Bootcamps near a zipcode
//! - `GET /api/v1/bootcamps/:id` - Get a single bootcamp
//! - `PUT /api/v1/bootcamps/:id` - Update a bootcamp (owner, admin)
//! - `DELETE /api/v1/bootcamps/:id` - Delete a bootcamp and its children (owner, admin)
//! - `GET|POST /api/v1/bootcamps/:id/courses` - Courses of a bootcamp
//! - `GET|POST /api/v1/bootcamps/:id/reviews` - Reviews of a bootcamp

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, RawQuery, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{
    commands::{CreateBootcampCommand, DeleteBootcampCommand, UpdateBootcampCommand},
    queries::{BootcampsInRadiusQuery, GetBootcampQuery, ListBootcampsQuery},
};
use crate::api::response::ApiResponse;
use crate::auth::{require_role, CurrentUser};
use crate::db::parse_object_id;
use crate::error::AppError;
use crate::features::{body_document, courses, reviews, FeatureState};
use crate::models::bootcamp::DistanceUnit;
use crate::models::{document_to_json, Role};

// ============================================================================
// Router Configuration
// ============================================================================

/// Creates the bootcamps router, including the nested course and review routes
pub fn bootcamps_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", get(list_bootcamps).post(create_bootcamp))
        .route("/radius/:zipcode/:distance", get(bootcamps_in_radius))
        .route(
            "/:id",
            get(get_bootcamp).put(update_bootcamp).delete(delete_bootcamp),
        )
        .route(
            "/:id/courses",
            get(courses::routes::list_bootcamp_courses).post(courses::routes::add_course),
        )
        .route(
            "/:id/reviews",
            get(reviews::routes::list_bootcamp_reviews).post(reviews::routes::add_review),
        )
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Create a new bootcamp
///
/// # Endpoint
///
/// `POST /api/v1/bootcamps`
///
/// # Response
///
/// - `201 Created` - Bootcamp created
/// - `400 Bad Request` - Validation error, duplicate name, already published
/// - `401 Unauthorized` - No session
/// - `403 Forbidden` - Role is not publisher or admin
#[tracing::instrument(skip(state, user, body), fields(user_id = %user.0.id))]
async fn create_bootcamp(
    State(state): State<FeatureState>,
    user: CurrentUser,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let actor = user.actor();
    require_role(&actor, &[Role::Publisher, Role::Admin])?;

    let command = CreateBootcampCommand {
        actor,
        payload: body_document(body)?,
    };
    let created = super::commands::create::handle(state, command).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(document_to_json(&created))),
    )
        .into_response())
}

/// Update a bootcamp
///
/// # Endpoint
///
/// `PUT /api/v1/bootcamps/:id`
///
/// # Response
///
/// - `200 OK` - Updated bootcamp
/// - `403 Forbidden` - Not the owner
/// - `404 Not Found` - No such bootcamp
#[tracing::instrument(skip(state, user, body))]
async fn update_bootcamp(
    State(state): State<FeatureState>,
    Path(id): Path<String>,
    user: CurrentUser,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let actor = user.actor();
    require_role(&actor, &[Role::Publisher, Role::Admin])?;

    let command = UpdateBootcampCommand {
        actor,
        id: parse_object_id(&id)?,
        payload: body_document(body)?,
    };
    let updated = super::commands::update::handle(state, command).await?;

    Ok(Json(ApiResponse::success(document_to_json(&updated))).into_response())
}

/// Delete a bootcamp with its courses and reviews
///
/// # Endpoint
///
/// `DELETE /api/v1/bootcamps/:id`
///
/// # Response
///
/// - `200 OK` - `{ "success": true, "data": {} }`
/// - `403 Forbidden` - Not the owner
/// - `404 Not Found` - No such bootcamp
#[tracing::instrument(skip(state, user))]
async fn delete_bootcamp(
    State(state): State<FeatureState>,
    Path(id): Path<String>,
    user: CurrentUser,
) -> Result<Response, AppError> {
    let actor = user.actor();
    require_role(&actor, &[Role::Publisher, Role::Admin])?;

    let command = DeleteBootcampCommand {
        actor,
        id: parse_object_id(&id)?,
    };
    super::commands::delete::handle(state, command).await?;

    Ok(Json(ApiResponse::success(json!({}))).into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

/// List bootcamps
///
/// # Endpoint
///
/// `GET /api/v1/bootcamps?careers[in]=Business&averageCost[lte]=10000&select=name&sort=-name&page=2&limit=10`
///
/// # Response
///
/// - `200 OK` - `{ success, count, pagination, data }`
/// - `400 Bad Request` - Malformed query
#[tracing::instrument(skip(state))]
async fn list_bootcamps(
    State(state): State<FeatureState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Response, AppError> {
    let results = super::queries::list::handle(state, ListBootcampsQuery { raw_query }).await?;
    Ok(Json(results.into_envelope()).into_response())
}

/// Get a bootcamp by id
///
/// # Endpoint
///
/// `GET /api/v1/bootcamps/:id`
///
/// # Response
///
/// - `200 OK` - Bootcamp
/// - `404 Not Found` - Missing or malformed id
#[tracing::instrument(skip(state))]
async fn get_bootcamp(
    State(state): State<FeatureState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let query = GetBootcampQuery {
        id: parse_object_id(&id)?,
    };
    let bootcamp = super::queries::get::handle(state, query).await?;
    Ok(Json(ApiResponse::success(document_to_json(&bootcamp))).into_response())
}

#[derive(Debug, Deserialize)]
struct RadiusParams {
    #[serde(default)]
    unit: DistanceUnit,
}

/// Bootcamps within a distance of a zipcode
///
/// # Endpoint
///
/// `GET /api/v1/bootcamps/radius/:zipcode/:distance?unit=mi|km`
///
/// # Response
///
/// - `200 OK` - `{ success, count, data }`
/// - `400 Bad Request` - Distance or unit is invalid
/// - `404 Not Found` - Zipcode could not be geocoded
#[tracing::instrument(skip(state, params))]
async fn bootcamps_in_radius(
    State(state): State<FeatureState>,
    Path((zipcode, distance)): Path<(String, String)>,
    params: Result<Query<RadiusParams>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(params) = params.map_err(|e| AppError::InvalidQuery(e.body_text()))?;

    let query = BootcampsInRadiusQuery {
        zipcode,
        distance,
        unit: params.unit,
    };
    let bootcamps = super::queries::within_radius::handle(state, query).await?;

    let items: Vec<Value> = bootcamps.iter().map(document_to_json).collect();
    Ok(Json(ApiResponse::list(items)).into_response())
}
