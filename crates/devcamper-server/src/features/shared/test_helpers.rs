//! Test fixtures for feature handler tests
//!
//! Builds a [`FeatureState`] over the in-memory store with a stub geocoder
//! and a recording mailer, plus builders that insert users and bootcamps.
//!
//! ```rust,ignore
//! let (state, mailer) = test_state();
//! let owner = TestUser::publisher("pub@example.com").insert(&state).await;
//! let camp = TestBootcamp::new(&owner, "Devworks").insert(&state).await;
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Document};

use crate::auth::hash_password;
use crate::config::Config;
use crate::db::MemoryStore;
use crate::features::FeatureState;
use crate::geocoder::{GeoPoint, GeocodeError, Geocoder};
use crate::mailer::{EmailMessage, MailError, Mailer};
use crate::models::{bootcamp, document::now, user, Role, User};

/// Geocoder that knows a single Boston address
pub struct StubGeocoder;

pub const KNOWN_ADDRESS: &str = "233 Bay State Rd Boston MA 02215";

pub fn boston() -> GeoPoint {
    GeoPoint {
        latitude: 42.350_909,
        longitude: -71.105_14,
        formatted_address: "233 Bay State Rd, Boston, MA 02215-1405, US".to_string(),
        street: "233 Bay State Rd".to_string(),
        city: "Boston".to_string(),
        state: "MA".to_string(),
        zipcode: "02215-1405".to_string(),
        country: "US".to_string(),
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        Ok((address == KNOWN_ADDRESS || address == "02215").then(boston))
    }
}

/// Mailer that keeps every message, or fails every send
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<EmailMessage>>,
    pub fail: bool,
}

impl RecordingMailer {
    pub fn messages(&self) -> Vec<EmailMessage> {
        self.sent.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message.clone());
        }
        if self.fail {
            // Any reqwest error will do; build one from an invalid URL.
            let err = reqwest::Client::new()
                .get("not a url")
                .build()
                .expect_err("invalid url must fail");
            return Err(MailError::Request(err));
        }
        Ok(())
    }
}

pub fn test_state_with(mailer: Arc<RecordingMailer>) -> FeatureState {
    FeatureState {
        store: Arc::new(MemoryStore::with_unique_fields(crate::db::UNIQUE_FIELDS)),
        config: Arc::new(Config::default()),
        geocoder: Arc::new(StubGeocoder),
        mailer,
    }
}

pub fn test_state() -> (FeatureState, Arc<RecordingMailer>) {
    let mailer = Arc::new(RecordingMailer::default());
    (test_state_with(mailer.clone()), mailer)
}

/// Builder for stored users
pub struct TestUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password: String,
}

impl TestUser {
    pub fn new(email: &str, role: Role) -> Self {
        Self {
            name: "Test User".to_string(),
            email: email.to_string(),
            role,
            password: "123456".to_string(),
        }
    }

    pub fn publisher(email: &str) -> Self {
        Self::new(email, Role::Publisher)
    }

    pub fn with_password(mut self, password: &str) -> Self {
        self.password = password.to_string();
        self
    }

    pub async fn insert(self, state: &FeatureState) -> User {
        let hashed = hash_password(&self.password).unwrap();
        let stored = state
            .store
            .insert_one(
                user::COLLECTION,
                doc! {
                    "name": self.name,
                    "email": self.email,
                    "role": self.role.as_str(),
                    "password": hashed,
                    "createdAt": now(),
                },
            )
            .await
            .unwrap();
        User::from_document(stored).unwrap()
    }
}

/// Builder for stored bootcamps, skipping geocoding
pub struct TestBootcamp {
    pub owner: ObjectId,
    pub name: String,
}

impl TestBootcamp {
    pub fn new(owner: &User, name: &str) -> Self {
        Self {
            owner: owner.id,
            name: name.to_string(),
        }
    }

    pub async fn insert(self, state: &FeatureState) -> Document {
        let location = bootcamp::Location::from_geocode(boston()).to_document();
        state
            .store
            .insert_one(
                bootcamp::COLLECTION,
                doc! {
                    "name": self.name.clone(),
                    "slug": crate::features::shared::validation::slugify(&self.name),
                    "description": "A bootcamp",
                    "address": KNOWN_ADDRESS,
                    "location": location,
                    "careers": ["Web Development"],
                    "user": self.owner,
                    "createdAt": now(),
                },
            )
            .await
            .unwrap()
    }
}
