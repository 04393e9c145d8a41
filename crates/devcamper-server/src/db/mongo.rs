//! MongoDB-backed document store

use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    error::{ErrorKind, WriteFailure},
    options::{ClientOptions, FindOptions as DriverFindOptions, IndexOptions, ReturnDocument},
    Client, Collection, Database, IndexModel,
};

use super::{DbResult, DocumentStore, Filter, FindOptions, SortSpec, Update, UNIQUE_FIELDS};
use crate::config::DatabaseConfig;

const DUPLICATE_KEY_CODE: i32 = 11000;

/// The driver sends `skip` and `limit` as signed 64-bit integers
const MAX_DRIVER_COUNT: u64 = i64::MAX as u64;

pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    #[tracing::instrument(skip(config), fields(database = %config.name))]
    pub async fn connect(config: &DatabaseConfig) -> DbResult<Self> {
        let mut options = ClientOptions::parse(&config.uri).await?;
        options.app_name = Some("devcamper-server".to_string());
        options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));

        let client = Client::with_options(options)?;
        Ok(Self {
            database: client.database(&config.name),
        })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection(name)
    }

    /// Create unique indexes and the geospatial index on bootcamp locations
    pub async fn ensure_indexes(&self) -> DbResult<()> {
        for (collection, field) in UNIQUE_FIELDS {
            let mut keys = Document::new();
            keys.insert(*field, 1);
            let index = IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().unique(true).sparse(true).build())
                .build();
            self.collection(collection).create_index(index).await?;
        }

        let geo = IndexModel::builder()
            .keys(doc! { "location": "2dsphere" })
            .build();
        self.collection("bootcamps").create_index(geo).await?;

        tracing::debug!("MongoDB indexes ensured");
        Ok(())
    }
}

/// Name of the field that caused a duplicate key error, if `err` is one
pub(crate) fn duplicate_key_field(err: &mongodb::error::Error) -> Option<String> {
    let message = match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY_CODE => {
            &e.message
        },
        ErrorKind::Command(e) if e.code == DUPLICATE_KEY_CODE => &e.message,
        _ => return None,
    };
    Some(field_from_duplicate_message(message).unwrap_or_else(|| "value".to_string()))
}

/// Extract the key name from `... dup key: { email: "x" }`
fn field_from_duplicate_message(message: &str) -> Option<String> {
    let (_, rest) = message.split_once("dup key: {")?;
    let (field, _) = rest.split_once(':')?;
    let field = field.trim();
    (!field.is_empty()).then(|| field.to_string())
}

fn projection_document(fields: &[String]) -> Document {
    let mut projection = Document::new();
    for field in fields {
        projection.insert(field.clone(), 1);
    }
    projection
}

/// Driver options for one page fetch
fn find_options(options: &FindOptions) -> DriverFindOptions {
    let mut settings = DriverFindOptions::default();
    if options.skip > 0 {
        settings.skip = Some(options.skip.min(MAX_DRIVER_COUNT));
    }
    if !options.sort.is_empty() {
        settings.sort = Some(SortSpec::to_document(&options.sort));
    }
    settings.limit = options
        .limit
        .map(|limit| i64::try_from(limit).unwrap_or(i64::MAX));
    settings.projection = options.projection.as_deref().map(projection_document);
    settings
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert_one(&self, collection: &str, mut document: Document) -> DbResult<Document> {
        let result = self.collection(collection).insert_one(&document).await?;
        if !document.contains_key("_id") {
            document.insert("_id", result.inserted_id);
        }
        Ok(document)
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> DbResult<Option<Document>> {
        Ok(self
            .collection(collection)
            .find_one(filter.to_document())
            .await?)
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> DbResult<Vec<Document>> {
        let coll = self.collection(collection);
        let cursor = coll
            .find(filter.to_document())
            .with_options(find_options(options))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn count(&self, collection: &str, filter: &Filter) -> DbResult<u64> {
        Ok(self
            .collection(collection)
            .count_documents(filter.to_document())
            .await?)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> DbResult<Option<Document>> {
        if update.is_empty() {
            return self.find_one(collection, filter).await;
        }
        Ok(self
            .collection(collection)
            .find_one_and_update(filter.to_document(), update.to_document())
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> DbResult<Option<Document>> {
        Ok(self
            .collection(collection)
            .find_one_and_delete(filter.to_document())
            .await?)
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> DbResult<u64> {
        let result = self
            .collection(collection)
            .delete_many(filter.to_document())
            .await?;
        Ok(result.deleted_count)
    }

    async fn ping(&self) -> DbResult<()> {
        let reply = self.database.run_command(doc! { "ping": 1 }).await?;
        tracing::trace!(ok = ?reply.get("ok").unwrap_or(&Bson::Null), "MongoDB ping");
        Ok(())
    }
}
