//! Review API routes
//!
//! # Route Structure
//!
//! - `GET /api/v1/reviews` - List reviews with filters and pagination
//! - `GET /api/v1/reviews/:id` - Get a review with its bootcamp summary
//! - `PUT /api/v1/reviews/:id` - Update a review (author, admin)
//! - `DELETE /api/v1/reviews/:id` - Delete a review (author, admin)
//!
//! Mounted by the bootcamps router:
//!
//! - `GET /api/v1/bootcamps/:id/reviews` - Reviews of one bootcamp
//! - `POST /api/v1/bootcamps/:id/reviews` - Add a review (user, admin)

use axum::{
    extract::{rejection::JsonRejection, Path, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use super::{
    commands::{AddReviewCommand, DeleteReviewCommand, UpdateReviewCommand},
    queries::{GetReviewQuery, ListBootcampReviewsQuery, ListReviewsQuery},
};
use crate::api::response::ApiResponse;
use crate::auth::{require_role, CurrentUser};
use crate::db::parse_object_id;
use crate::error::AppError;
use crate::features::{body_document, FeatureState};
use crate::models::{document_to_json, Role};

/// Roles allowed to write reviews
const REVIEWERS: &[Role] = &[Role::User, Role::Admin];

/// Creates the reviews router
pub fn reviews_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", get(list_reviews))
        .route(
            "/:id",
            get(get_review).put(update_review).delete(delete_review),
        )
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Add a review to a bootcamp
///
/// # Endpoint
///
/// `POST /api/v1/bootcamps/:id/reviews`
///
/// # Response
///
/// - `201 Created` - Review created
/// - `400 Bad Request` - Validation error
/// - `403 Forbidden` - Publishers can not review
/// - `404 Not Found` - No such bootcamp
#[tracing::instrument(skip(state, user, body))]
pub async fn add_review(
    State(state): State<FeatureState>,
    Path(id): Path<String>,
    user: CurrentUser,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let actor = user.actor();
    require_role(&actor, REVIEWERS)?;

    let command = AddReviewCommand {
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

/// Update a review
///
/// # Endpoint
///
/// `PUT /api/v1/reviews/:id`
#[tracing::instrument(skip(state, user, body))]
async fn update_review(
    State(state): State<FeatureState>,
    Path(id): Path<String>,
    user: CurrentUser,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let actor = user.actor();
    require_role(&actor, REVIEWERS)?;

    let command = UpdateReviewCommand {
        actor,
        id: parse_object_id(&id)?,
        payload: body_document(body)?,
    };
    let updated = super::commands::update::handle(state, command).await?;

    Ok(Json(ApiResponse::success(document_to_json(&updated))).into_response())
}

/// Delete a review
///
/// # Endpoint
///
/// `DELETE /api/v1/reviews/:id`
#[tracing::instrument(skip(state, user))]
async fn delete_review(
    State(state): State<FeatureState>,
    Path(id): Path<String>,
    user: CurrentUser,
) -> Result<Response, AppError> {
    let actor = user.actor();
    require_role(&actor, REVIEWERS)?;

    let command = DeleteReviewCommand {
        actor,
        id: parse_object_id(&id)?,
    };
    super::commands::delete::handle(state, command).await?;

    Ok(Json(ApiResponse::success(json!({}))).into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

/// List reviews
///
/// # Endpoint
///
/// `GET /api/v1/reviews?rating[gte]=8`
#[tracing::instrument(skip(state))]
async fn list_reviews(
    State(state): State<FeatureState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Response, AppError> {
    let results = super::queries::list::handle(state, ListReviewsQuery { raw_query }).await?;
    Ok(Json(results.into_envelope()).into_response())
}

/// Reviews of one bootcamp
///
/// # Endpoint
///
/// `GET /api/v1/bootcamps/:id/reviews`
#[tracing::instrument(skip(state))]
pub async fn list_bootcamp_reviews(
    State(state): State<FeatureState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let query = ListBootcampReviewsQuery {
        bootcamp_id: parse_object_id(&id)?,
    };
    let reviews = super::queries::list::handle_for_bootcamp(state, query).await?;

    let items: Vec<Value> = reviews.iter().map(document_to_json).collect();
    Ok(Json(ApiResponse::list(items)).into_response())
}

/// Get a review
///
/// # Endpoint
///
/// `GET /api/v1/reviews/:id`
#[tracing::instrument(skip(state))]
async fn get_review(
    State(state): State<FeatureState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let query = GetReviewQuery {
        id: parse_object_id(&id)?,
    };
    let review = super::queries::get::handle(state, query).await?;
    Ok(Json(ApiResponse::success(document_to_json(&review))).into_response())
}
