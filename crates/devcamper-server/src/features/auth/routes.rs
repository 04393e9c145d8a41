//! Authentication API routes
//!
//! # Route Structure
//!
//! - `POST /api/v1/auth/register` - Create an account and start a session
//! - `POST /api/v1/auth/login` - Start a session
//! - `GET /api/v1/auth/logout` - End the session
//! - `GET /api/v1/auth/me` - Current user
//! - `POST /api/v1/auth/forgotpassword` - Email a password reset link
//! - `PUT /api/v1/auth/resetpassword/:resettoken` - Set a password from a reset link
//! - `PUT /api/v1/auth/updatedetails` - Change name or email
//! - `PUT /api/v1/auth/updatepassword` - Change password
//!
//! Session-starting routes answer with `{ success, token }` and set the
//! `token` cookie.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use super::{
    commands::{
        ForgotPasswordCommand, LoginCommand, RegisterCommand, ResetPasswordCommand,
        UpdateDetailsCommand, UpdatePasswordCommand,
    },
    queries::GetMeQuery,
};
use crate::api::response::ApiResponse;
use crate::auth::{logout_cookie, send_token_response, CurrentUser};
use crate::error::AppError;
use crate::features::{body_document, FeatureState};
use crate::models::User;

/// Creates the auth router
pub fn auth_routes() -> Router<FeatureState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout))
        .route("/me", get(me))
        .route("/forgotpassword", post(forgot_password))
        .route("/forgotPassword", post(forgot_password))
        .route("/resetpassword/:resettoken", put(reset_password))
        .route("/updatedetails", put(update_details))
        .route("/updatepassword", put(update_password))
}

fn token_response(state: &FeatureState, user: &User) -> Result<Response, AppError> {
    Ok(send_token_response(user, &state.config.auth, StatusCode::OK)?)
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Register a user
///
/// # Endpoint
///
/// `POST /api/v1/auth/register`
///
/// # Request Body
///
/// ```json
/// { "name": "John Doe", "email": "john@gmail.com", "password": "123456", "role": "publisher" }
/// ```
///
/// # Response
///
/// - `200 OK` - `{ success, token }` plus the session cookie
/// - `400 Bad Request` - Validation error, duplicate email, or `admin` role requested
#[tracing::instrument(skip(state, body))]
async fn register(
    State(state): State<FeatureState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let command = RegisterCommand {
        payload: body_document(body)?,
    };
    let user = super::commands::register::handle(state.clone(), command).await?;
    token_response(&state, &user)
}

/// Log in
///
/// # Endpoint
///
/// `POST /api/v1/auth/login`
///
/// # Response
///
/// - `200 OK` - `{ success, token }` plus the session cookie
/// - `400 Bad Request` - Email or password missing
/// - `401 Unauthorized` - Invalid credentials
#[tracing::instrument(skip(state, body))]
async fn login(
    State(state): State<FeatureState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let command = LoginCommand {
        payload: body_document(body)?,
    };
    let user = super::commands::login::handle(state.clone(), command).await?;
    token_response(&state, &user)
}

/// Log out by replacing the session cookie with one that expires shortly
///
/// # Endpoint
///
/// `GET /api/v1/auth/logout`
#[tracing::instrument(skip(user), fields(user_id = %user.0.id))]
async fn logout(user: CurrentUser) -> Response {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, logout_cookie().to_string())],
        Json(ApiResponse::success(json!({}))),
    )
        .into_response()
}

/// Request a password reset email
///
/// # Endpoint
///
/// `POST /api/v1/auth/forgotpassword`
///
/// # Response
///
/// - `200 OK` - `{ success: true, data: "Email sent" }`
/// - `404 Not Found` - No user with that email
/// - `500 Internal Server Error` - Email could not be sent
#[tracing::instrument(skip(state, body))]
async fn forgot_password(
    State(state): State<FeatureState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let command = ForgotPasswordCommand {
        payload: body_document(body)?,
    };
    super::commands::forgot_password::handle(state, command).await?;
    Ok(Json(ApiResponse::success("Email sent")).into_response())
}

/// Reset the password with a mailed token
///
/// # Endpoint
///
/// `PUT /api/v1/auth/resetpassword/:resettoken`
#[tracing::instrument(skip(state, reset_token, body))]
async fn reset_password(
    State(state): State<FeatureState>,
    Path(reset_token): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let command = ResetPasswordCommand {
        reset_token,
        payload: body_document(body)?,
    };
    let user = super::commands::reset_password::handle(state.clone(), command).await?;
    token_response(&state, &user)
}

/// Update name and email of the current user
///
/// # Endpoint
///
/// `PUT /api/v1/auth/updatedetails`
#[tracing::instrument(skip(state, user, body), fields(user_id = %user.0.id))]
async fn update_details(
    State(state): State<FeatureState>,
    user: CurrentUser,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let command = UpdateDetailsCommand {
        actor: user.actor(),
        payload: body_document(body)?,
    };
    let updated = super::commands::update_details::handle(state, command).await?;
    Ok(Json(ApiResponse::success(updated.profile())).into_response())
}

/// Change the current user's password
///
/// # Endpoint
///
/// `PUT /api/v1/auth/updatepassword`
///
/// # Request Body
///
/// ```json
/// { "currentPassword": "123456", "newPassword": "abcdef" }
/// ```
#[tracing::instrument(skip(state, user, body), fields(user_id = %user.0.id))]
async fn update_password(
    State(state): State<FeatureState>,
    user: CurrentUser,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let command = UpdatePasswordCommand {
        actor: user.actor(),
        payload: body_document(body)?,
    };
    let updated = super::commands::update_password::handle(state.clone(), command).await?;
    token_response(&state, &updated)
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

/// Current user
///
/// # Endpoint
///
/// `GET /api/v1/auth/me`
#[tracing::instrument(skip(state, user), fields(user_id = %user.0.id))]
async fn me(State(state): State<FeatureState>, user: CurrentUser) -> Result<Response, AppError> {
    let profile = super::queries::me::handle(state, GetMeQuery { actor: user.actor() }).await?;
    Ok(Json(ApiResponse::success(profile)).into_response())
}
