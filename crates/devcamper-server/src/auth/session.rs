//! Session cookie handling

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use cookie::{
    time::{Duration, OffsetDateTime},
    Cookie,
};

use super::{issue_token, AuthError};
use crate::api::response::TokenResponse;
use crate::config::AuthConfig;
use crate::models::User;

pub const COOKIE_NAME: &str = "token";

/// Value left in the cookie after logout
const LOGGED_OUT: &str = "none";

/// Lifetime of the cookie that replaces the session on logout
const LOGOUT_COOKIE_SECS: i64 = 10;

fn token_cookie(value: String, expires: OffsetDateTime, secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, value))
        .path("/")
        .expires(expires)
        .http_only(true)
        .secure(secure)
        .build()
}

/// Cookie carrying a session token
pub fn session_cookie(token: &str, config: &AuthConfig) -> Cookie<'static> {
    token_cookie(
        token.to_string(),
        OffsetDateTime::now_utc() + Duration::days(config.cookie_expire_days),
        config.secure_cookies,
    )
}

/// Cookie that overwrites the session with `none`
pub fn logout_cookie() -> Cookie<'static> {
    token_cookie(
        LOGGED_OUT.to_string(),
        OffsetDateTime::now_utc() + Duration::seconds(LOGOUT_COOKIE_SECS),
        false,
    )
}

/// Issue a token for `user` and return it in both the body and a cookie
pub fn send_token_response(
    user: &User,
    config: &AuthConfig,
    status: StatusCode,
) -> Result<Response, AuthError> {
    let token = issue_token(&user.id, config)?;
    let cookie = session_cookie(&token, config);

    Ok((
        status,
        [(header::SET_COOKIE, cookie.to_string())],
        Json(TokenResponse::new(token)),
    )
        .into_response())
}

/// Session token from `Authorization: Bearer` or, failing that, the cookie
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == COOKIE_NAME)
        .map(|cookie| cookie.value_trimmed().to_string())
        .filter(|token| !token.is_empty() && token != LOGGED_OUT)
}
