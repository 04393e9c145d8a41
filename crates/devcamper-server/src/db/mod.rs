//! Document store access
//!
//! Handlers talk to persistence through the [`DocumentStore`] trait. Two
//! backends exist: [`mongo::MongoStore`] for deployments and
//! [`memory::MemoryStore`], an in-process store selected with a
//! `memory://` URI and used by the test suite.

pub mod filter;
pub mod memory;
pub mod mongo;
pub mod store;

use std::sync::Arc;

use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::config::DatabaseConfig;

pub use filter::{CmpOp, Filter, SortOrder, SortSpec};
pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use store::{DocumentStore, FindOptions, Store, Update};

/// Result type for store operations
pub type DbResult<T> = std::result::Result<T, DbError>;

/// Errors raised by the document store
#[derive(Debug, Error)]
pub enum DbError {
    /// The supplied identifier is not a well-formed ObjectId
    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// A unique index rejected the write
    #[error("Duplicate value for unique field '{0}'")]
    Duplicate(String),

    /// A document could not be converted to or from BSON
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Database error: {0}")]
    Mongo(mongodb::error::Error),
}

impl From<mongodb::error::Error> for DbError {
    fn from(err: mongodb::error::Error) -> Self {
        match mongo::duplicate_key_field(&err) {
            Some(field) => DbError::Duplicate(field),
            None => DbError::Mongo(err),
        }
    }
}

impl From<mongodb::bson::ser::Error> for DbError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        DbError::Serialization(err.to_string())
    }
}

impl From<mongodb::bson::de::Error> for DbError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        DbError::Serialization(err.to_string())
    }
}

/// Parse a path or body identifier into an ObjectId
pub fn parse_object_id(raw: &str) -> DbResult<ObjectId> {
    ObjectId::parse_str(raw).map_err(|_| DbError::InvalidId(raw.to_string()))
}

/// Fields that must be unique within their collection, as `(collection, field)`
///
/// Documents without the field are not constrained; bootcamps carry
/// `publisher` only when a non-admin created them.
pub const UNIQUE_FIELDS: &[(&str, &str)] = &[
    ("users", "email"),
    ("bootcamps", "name"),
    ("bootcamps", "publisher"),
];

/// Open the store named by the configuration
///
/// A `memory://` URI yields a fresh in-process store; anything else is
/// treated as a MongoDB connection string and the required indexes are
/// created before the store is returned.
pub async fn connect(config: &DatabaseConfig) -> DbResult<Store> {
    if config.is_memory() {
        tracing::warn!("Using the in-memory document store; data will not persist");
        return Ok(Arc::new(MemoryStore::with_unique_fields(UNIQUE_FIELDS)));
    }

    let store = MongoStore::connect(config).await?;
    store.ensure_indexes().await?;
    store.ping().await?;

    tracing::info!(database = %config.name, "Connected to MongoDB");

    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_id() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex()).unwrap(), id);
        assert!(matches!(
            parse_object_id("not-an-id"),
            Err(DbError::InvalidId(raw)) if raw == "not-an-id"
        ));
    }

    #[tokio::test]
    async fn test_connect_memory_store() {
        let config = DatabaseConfig {
            uri: "memory://".to_string(),
            name: "test".to_string(),
            connect_timeout_secs: 1,
        };
        let store = connect(&config).await.unwrap();
        assert!(store.ping().await.is_ok());
    }
}
