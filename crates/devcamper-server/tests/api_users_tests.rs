//! Integration tests for admin user management

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{TestApp, PASSWORD};

#[tokio::test]
async fn test_users_require_admin() {
    let app = TestApp::new();
    let publisher = app.register("Publisher", "pub@example.com", "publisher").await;

    let anonymous = app.get("/api/v1/users", None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let res = app.get("/api/v1/users", Some(&publisher)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.error(), "User role publisher is not authorized to access this route");
}

#[tokio::test]
async fn test_admin_user_crud() {
    let app = TestApp::new();
    let admin = app.admin_token().await;

    let created = app
        .post(
            "/api/v1/users",
            Some(&admin),
            json!({ "name": "Jane", "email": "jane@gmail.com", "password": PASSWORD, "role": "publisher" }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["data"]["role"], "publisher");
    assert!(created.body["data"].get("password").is_none());
    let uri = format!("/api/v1/users/{}", created.body["data"]["_id"].as_str().unwrap());

    let listed = app.get("/api/v1/users?role=publisher", Some(&admin)).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body["count"], 1);
    assert!(listed.body["data"][0].get("password").is_none());

    let fetched = app.get(&uri, Some(&admin)).await;
    assert_eq!(fetched.body["data"]["email"], "jane@gmail.com");

    let updated = app.put(&uri, Some(&admin), json!({ "role": "admin" })).await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["role"], "admin");

    // The promoted user can now manage users
    let jane = app.login("jane@gmail.com", PASSWORD).await;
    let jane_token = jane.body["token"].as_str().unwrap();
    assert_eq!(app.get("/api/v1/users", Some(jane_token)).await.status, StatusCode::OK);

    let deleted = app.delete(&uri, Some(&admin)).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body, json!({ "success": true, "data": {} }));

    let missing = app.get(&uri, Some(&admin)).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}
