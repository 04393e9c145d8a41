//! Shared harness for the HTTP integration tests
//!
//! Every test builds its own [`TestApp`]: the full router over a fresh
//! in-memory store, a geocoder that only knows one Boston address, and a
//! mailer that records (or refuses) every message.
//!
//! ```no_run
//! let app = TestApp::new();
//! let token = app.register("Publisher", "pub@example.com", "publisher").await;
//! let res = app.post("/api/v1/bootcamps", Some(&token), bootcamp_payload("Devworks")).await;
//! assert_eq!(res.status, StatusCode::CREATED);
//! ```

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use mongodb::bson::doc;
use serde_json::{json, Value};
use tower::ServiceExt;

use devcamper_server::{
    api,
    auth::hash_password,
    config::Config,
    db::{MemoryStore, UNIQUE_FIELDS},
    features::FeatureState,
    geocoder::{GeoPoint, GeocodeError, Geocoder},
    mailer::{EmailMessage, MailError, Mailer},
    models::{document::now, user, Role},
};

pub const BOSTON_ADDRESS: &str = "233 Bay State Rd Boston MA 02215";
pub const BOSTON_ZIPCODE: &str = "02215";
pub const PASSWORD: &str = "123456";

// ============================================================================
// Test doubles
// ============================================================================

/// Resolves the Boston address and zipcode, nothing else
pub struct StubGeocoder;

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        if address != BOSTON_ADDRESS && address != BOSTON_ZIPCODE {
            return Ok(None);
        }
        Ok(Some(GeoPoint {
            latitude: 42.350_909,
            longitude: -71.105_14,
            formatted_address: "233 Bay State Rd, Boston, MA 02215-1405, US".to_string(),
            street: "233 Bay State Rd".to_string(),
            city: "Boston".to_string(),
            state: "MA".to_string(),
            zipcode: "02215-1405".to_string(),
            country: "US".to_string(),
        }))
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn messages(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        if self.fail {
            let err = reqwest::Client::new().get("not a url").build().unwrap_err();
            return Err(MailError::Request(err));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

// ============================================================================
// Application harness
// ============================================================================

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }

    pub fn set_cookie(&self) -> Option<&str> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: FeatureState,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_mailer(RecordingMailer::default())
    }

    pub fn with_mailer(mailer: RecordingMailer) -> Self {
        let config = Config::default();
        let mailer = Arc::new(mailer);
        let state = FeatureState {
            store: Arc::new(MemoryStore::with_unique_fields(UNIQUE_FIELDS)),
            config: Arc::new(config.clone()),
            geocoder: Arc::new(StubGeocoder),
            mailer: mailer.clone(),
        };
        let router = api::create_router(state.clone(), &config);
        Self {
            router,
            state,
            mailer,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Register through the API and return the session token
    pub async fn register(&self, name: &str, email: &str, role: &str) -> String {
        let res = self
            .post(
                "/api/v1/auth/register",
                None,
                json!({ "name": name, "email": email, "password": PASSWORD, "role": role }),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "register failed: {}", res.body);
        res.body["token"].as_str().unwrap().to_string()
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.post(
            "/api/v1/auth/login",
            None,
            json!({ "email": email, "password": password }),
        )
        .await
    }

    /// Admins can not self-register; seed one in the store and log in
    pub async fn admin_token(&self) -> String {
        self.state
            .store
            .insert_one(
                user::COLLECTION,
                doc! {
                    "name": "Admin",
                    "email": "admin@example.com",
                    "role": Role::Admin.as_str(),
                    "password": hash_password(PASSWORD).unwrap(),
                    "createdAt": now(),
                },
            )
            .await
            .unwrap();
        let res = self.login("admin@example.com", PASSWORD).await;
        res.body["token"].as_str().unwrap().to_string()
    }

    /// Create a bootcamp as `token` and return its id
    pub async fn create_bootcamp(&self, token: &str, name: &str) -> String {
        let res = self
            .post("/api/v1/bootcamps", Some(token), bootcamp_payload(name))
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "create failed: {}", res.body);
        res.body["data"]["_id"].as_str().unwrap().to_string()
    }
}

// ============================================================================
// Payloads
// ============================================================================

pub fn bootcamp_payload(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Full stack web development bootcamp",
        "website": "https://devworks.com",
        "phone": "(111) 111-1111",
        "email": "enroll@devworks.com",
        "address": BOSTON_ADDRESS,
        "careers": ["Web Development", "UI/UX", "Business"],
        "housing": true,
        "jobAssistance": true
    })
}

pub fn course_payload(title: &str, tuition: i64) -> Value {
    json!({
        "title": title,
        "description": "Learn the fundamentals",
        "weeks": "8",
        "tuition": tuition,
        "minimumSkill": "beginner"
    })
}

pub fn review_payload(rating: i64) -> Value {
    json!({
        "title": "Learned a ton!",
        "text": "Great instructors",
        "rating": rating
    })
}
