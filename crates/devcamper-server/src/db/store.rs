//! The storage trait implemented by every backend

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{Bson, Document};

use super::{DbResult, Filter, SortSpec};

/// Shared handle to the configured store
pub type Store = Arc<dyn DocumentStore>;

/// Options for multi-document reads
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub sort: Vec<SortSpec>,
    pub skip: u64,
    pub limit: Option<u64>,
    /// Top-level fields to return; `_id` is always included
    pub projection: Option<Vec<String>>,
}

/// A partial update: fields to set and fields to remove
#[derive(Debug, Clone, Default)]
pub struct Update {
    pub set: Document,
    pub unset: Vec<String>,
}

impl Update {
    pub fn set(set: Document) -> Self {
        Self {
            set,
            unset: Vec::new(),
        }
    }

    pub fn set_field(mut self, field: &str, value: impl Into<Bson>) -> Self {
        self.set.insert(field, value.into());
        self
    }

    pub fn unset_field(mut self, field: &str) -> Self {
        self.unset.push(field.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.unset.is_empty()
    }

    /// Render as a MongoDB update document
    pub fn to_document(&self) -> Document {
        let mut update = Document::new();
        if !self.set.is_empty() {
            update.insert("$set", self.set.clone());
        }
        if !self.unset.is_empty() {
            let mut unset = Document::new();
            for field in &self.unset {
                unset.insert(field.clone(), "");
            }
            update.insert("$unset", unset);
        }
        update
    }
}

/// Collection-oriented document storage
///
/// Write operations that target a single document are conditional: they
/// apply only if the filter matches, and report what they touched so the
/// caller can distinguish "no such document" from success.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Insert a document, assigning `_id` if absent; returns the stored document
    async fn insert_one(&self, collection: &str, document: Document) -> DbResult<Document>;

    async fn find_one(&self, collection: &str, filter: &Filter) -> DbResult<Option<Document>>;

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> DbResult<Vec<Document>>;

    async fn count(&self, collection: &str, filter: &Filter) -> DbResult<u64>;

    /// Update the first matching document; returns it after the update
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> DbResult<Option<Document>>;

    /// Delete the first matching document; returns what was deleted
    async fn delete_one(&self, collection: &str, filter: &Filter) -> DbResult<Option<Document>>;

    /// Delete every matching document; returns how many were removed
    async fn delete_many(&self, collection: &str, filter: &Filter) -> DbResult<u64>;

    async fn ping(&self) -> DbResult<()>;
}
