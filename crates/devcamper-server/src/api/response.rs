//! API response envelopes
//!
//! Success bodies are `{ success: true, data, count?, pagination? }`;
//! failures are `{ success: false, error }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::features::shared::pagination::Pagination;

/// Standard success response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new success response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            count: None,
            pagination: None,
            data,
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// List response carrying the number of items returned
    pub fn list(items: Vec<T>) -> Self {
        Self {
            success: true,
            count: Some(items.len()),
            pagination: None,
            data: items,
        }
    }

    /// List response with a pagination block
    pub fn paginated(items: Vec<T>, pagination: Pagination) -> Self {
        Self {
            success: true,
            count: Some(items.len()),
            pagination: Some(pagination),
            data: items,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Body returned by the authentication endpoints
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

impl TokenResponse {
    pub fn new(token: String) -> Self {
        Self {
            success: true,
            token,
        }
    }
}

/// Standard error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::pagination::PageRequest;

    #[test]
    fn test_success_omits_count_and_pagination() {
        let json = serde_json::to_value(ApiResponse::success("x")).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": "x" }));
    }

    #[test]
    fn test_paginated_list() {
        let pagination = Pagination::new(PageRequest::new(1, 2), 3);
        let json = serde_json::to_value(ApiResponse::paginated(vec![1, 2], pagination)).unwrap();
        assert_eq!(json["count"], 2);
        assert_eq!(json["pagination"]["next"]["page"], 2);
        assert_eq!(json["data"], serde_json::json!([1, 2]));
    }

    #[test]
    fn test_error_response() {
        let json = serde_json::to_value(ErrorResponse::new("Not authorized")).unwrap();
        assert_eq!(json, serde_json::json!({ "success": false, "error": "Not authorized" }));
    }
}
