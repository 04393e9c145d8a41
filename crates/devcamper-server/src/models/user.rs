//! User resource and the authenticated principal

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

use super::document::from_bson_datetime;
use super::schema::{DefaultValue, FieldKind, FieldSpec, Schema};
use crate::db::DbError;

pub const COLLECTION: &str = "users";

/// Roles a user may pick at registration
pub const SELF_ASSIGNABLE_ROLES: &[&str] = &["user", "publisher"];

/// Every role, assignable by an admin
pub const ALL_ROLES: &[&str] = &["user", "publisher", "admin"];

pub const SCHEMA: Schema = Schema {
    collection: COLLECTION,
    fields: &[
        FieldSpec::new(
            "name",
            "Name",
            FieldKind::Text {
                min_len: None,
                max_len: None,
            },
        )
        .required("Please add a name"),
        FieldSpec::new("email", "Email", FieldKind::Email).required("Please add an email"),
        FieldSpec::new("role", "Role", FieldKind::Choice(ALL_ROLES))
            .default_value(DefaultValue::Text("user")),
        FieldSpec::new(
            "password",
            "Password",
            FieldKind::Text {
                min_len: Some(6),
                max_len: None,
            },
        )
        .required("Please add a password"),
        FieldSpec::new(
            "resetPasswordToken",
            "Reset token",
            FieldKind::Text {
                min_len: None,
                max_len: None,
            },
        )
        .protected(),
        FieldSpec::new("resetPasswordExpire", "Reset expiry", FieldKind::Date).protected(),
        FieldSpec::new("createdAt", "Created at", FieldKind::Date).protected(),
    ],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Publisher,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Publisher => "publisher",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "publisher" => Ok(Role::Publisher),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// A stored user, including credential fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_password_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_password_expire: Option<bson::DateTime>,
    pub created_at: bson::DateTime,
}

impl User {
    pub fn from_document(doc: Document) -> Result<Self, DbError> {
        Ok(bson::from_document(doc)?)
    }

    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id,
            role: self.role,
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.to_hex(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            created_at: from_bson_datetime(self.created_at).unwrap_or_default(),
        }
    }
}

/// Public view of a user; never carries the password or reset fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// The principal performing a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: ObjectId,
    pub role: Role,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn has_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}
