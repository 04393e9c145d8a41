//! In-process document store
//!
//! Collections are vectors of BSON documents behind a single `RwLock`.
//! Filters are evaluated with MongoDB's matching rules for the subset of
//! operators that [`Filter`] can express.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use tokio::sync::RwLock;

use super::{DbError, DbResult, DocumentStore, Filter, FindOptions, SortOrder, SortSpec, Update};
use crate::db::CmpOp;

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    unique: HashMap<String, Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that enforces the given `(collection, field)` unique constraints
    pub fn with_unique_fields(fields: &[(&str, &str)]) -> Self {
        let mut unique: HashMap<String, Vec<String>> = HashMap::new();
        for (collection, field) in fields {
            unique
                .entry((*collection).to_string())
                .or_default()
                .push((*field).to_string());
        }
        Self {
            collections: RwLock::default(),
            unique,
        }
    }

    fn check_unique(&self, collection: &str, docs: &[Document], candidate: &Document) -> DbResult<()> {
        let Some(fields) = self.unique.get(collection) else {
            return Ok(());
        };
        let candidate_id = candidate.get("_id");
        for field in fields {
            let Some(value) = candidate.get(field).filter(|v| !matches!(v, Bson::Null)) else {
                continue;
            };
            let clash = docs
                .iter()
                .filter(|d| d.get("_id") != candidate_id)
                .any(|d| d.get(field).is_some_and(|v| values_equal(v, value)));
            if clash {
                return Err(DbError::Duplicate(field.clone()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(&self, collection: &str, mut document: Document) -> DbResult<Document> {
        if !document.contains_key("_id") {
            document.insert("_id", ObjectId::new());
        }
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.iter().any(|d| d.get("_id") == document.get("_id")) {
            return Err(DbError::Duplicate("_id".to_string()));
        }
        self.check_unique(collection, docs, &document)?;
        docs.push(document.clone());
        Ok(document)
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> DbResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| matches(d, filter)).cloned()))
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> DbResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut found: Vec<&Document> = docs.iter().filter(|d| matches(d, filter)).collect();
        if !options.sort.is_empty() {
            found.sort_by(|a, b| compare_docs(a, b, &options.sort));
        }

        let skip = usize::try_from(options.skip).unwrap_or(usize::MAX);
        let limit = options
            .limit
            .map(|l| usize::try_from(l).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);

        Ok(found
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|d| match &options.projection {
                Some(fields) => project_fields(d, fields),
                None => d.clone(),
            })
            .collect())
    }

    async fn count(&self, collection: &str, filter: &Filter) -> DbResult<u64> {
        let collections = self.collections.read().await;
        let count = collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| matches(d, filter)).count())
            .unwrap_or(0);
        Ok(count as u64)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> DbResult<Option<Document>> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(None);
        };
        let Some(index) = docs.iter().position(|d| matches(d, filter)) else {
            return Ok(None);
        };

        let mut updated = docs[index].clone();
        for (key, value) in &update.set {
            updated.insert(key.clone(), value.clone());
        }
        for key in &update.unset {
            updated.remove(key);
        }
        self.check_unique(collection, docs, &updated)?;

        docs[index] = updated.clone();
        Ok(Some(updated))
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> DbResult<Option<Document>> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(None);
        };
        Ok(docs
            .iter()
            .position(|d| matches(d, filter))
            .map(|index| docs.remove(index)))
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> DbResult<u64> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|d| !matches(d, filter));
        Ok((before - docs.len()) as u64)
    }

    async fn ping(&self) -> DbResult<()> {
        Ok(())
    }
}

/// Evaluate a filter against a document
pub fn matches(doc: &Document, filter: &Filter) -> bool {
    match filter {
        Filter::True => true,
        Filter::And(children) => children.iter().all(|f| matches(doc, f)),
        Filter::Or(children) => children.iter().any(|f| matches(doc, f)),
        Filter::Eq { path, value } => match get_path(doc, path) {
            Some(found) => any_element(found, |v| values_equal(v, value)),
            None => matches!(value, Bson::Null),
        },
        Filter::Cmp { path, op, value } => get_path(doc, path).is_some_and(|found| {
            any_element(found, |v| {
                compare_bson(v, value).is_some_and(|ordering| match op {
                    CmpOp::Gt => ordering == Ordering::Greater,
                    CmpOp::Gte => ordering != Ordering::Less,
                    CmpOp::Lt => ordering == Ordering::Less,
                    CmpOp::Lte => ordering != Ordering::Greater,
                })
            })
        }),
        Filter::In { path, values } => get_path(doc, path).is_some_and(|found| {
            any_element(found, |v| values.iter().any(|candidate| values_equal(v, candidate)))
        }),
        Filter::GeoWithinSphere {
            path,
            center,
            radius,
        } => get_path(doc, path)
            .and_then(point_coordinates)
            .is_some_and(|point| angular_distance(*center, point) <= *radius),
    }
}

/// Apply `predicate` to the value, or to each element when it is an array
fn any_element(value: &Bson, predicate: impl Fn(&Bson) -> bool) -> bool {
    match value {
        Bson::Array(items) => predicate(value) || items.iter().any(predicate),
        other => predicate(other),
    }
}

fn get_path<'a>(doc: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut current = doc;
    let mut parts = path.split('.').peekable();
    while let Some(part) = parts.next() {
        let value = current.get(part)?;
        if parts.peek().is_none() {
            return Some(value);
        }
        match value {
            Bson::Document(inner) => current = inner,
            _ => return None,
        }
    }
    None
}

fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(i) => Some(f64::from(*i)),
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(f) => Some(*f),
        _ => None,
    }
}

fn values_equal(a: &Bson, b: &Bson) -> bool {
    match (as_f64(a), as_f64(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Order two values of comparable types; `None` when the types differ
pub fn compare_bson(a: &Bson, b: &Bson) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (as_f64(a), as_f64(b)) {
        return Some(x.total_cmp(&y));
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
        (Bson::Boolean(x), Bson::Boolean(y)) => Some(x.cmp(y)),
        (Bson::DateTime(x), Bson::DateTime(y)) => Some(x.cmp(y)),
        (Bson::ObjectId(x), Bson::ObjectId(y)) => Some(x.cmp(y)),
        (Bson::Null, Bson::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

fn type_rank(value: &Bson) -> u8 {
    match value {
        Bson::Null => 0,
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) => 1,
        Bson::String(_) => 2,
        Bson::Document(_) => 3,
        Bson::Array(_) => 4,
        Bson::ObjectId(_) => 5,
        Bson::Boolean(_) => 6,
        Bson::DateTime(_) => 7,
        _ => 8,
    }
}

fn compare_docs(a: &Document, b: &Document, sort: &[SortSpec]) -> Ordering {
    for spec in sort {
        let ordering = match (get_path(a, &spec.field), get_path(b, &spec.field)) {
            (Some(x), Some(y)) => {
                compare_bson(x, y).unwrap_or_else(|| type_rank(x).cmp(&type_rank(y)))
            },
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        };
        if ordering != Ordering::Equal {
            return match spec.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            };
        }
    }
    Ordering::Equal
}

fn project_fields(doc: &Document, fields: &[String]) -> Document {
    let mut out = Document::new();
    if let Some(id) = doc.get("_id") {
        out.insert("_id", id.clone());
    }
    for field in fields {
        if let Some(value) = doc.get(field) {
            out.insert(field.clone(), value.clone());
        }
    }
    out
}

/// `[lng, lat]` of a GeoJSON point
fn point_coordinates(value: &Bson) -> Option<[f64; 2]> {
    let Bson::Document(point) = value else {
        return None;
    };
    let coordinates = point.get_array("coordinates").ok()?;
    let lng = coordinates.first().and_then(as_f64)?;
    let lat = coordinates.get(1).and_then(as_f64)?;
    Some([lng, lat])
}

/// Great-circle distance in radians between two `[lng, lat]` points
fn angular_distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    let (lng1, lat1) = (a[0].to_radians(), a[1].to_radians());
    let (lng2, lat2) = (b[0].to_radians(), b[1].to_radians());
    let half_dlat = ((lat2 - lat1) / 2.0).sin();
    let half_dlng = ((lng2 - lng1) / 2.0).sin();
    let h = half_dlat * half_dlat + lat1.cos() * lat2.cos() * half_dlng * half_dlng;
    2.0 * h.sqrt().min(1.0).asin()
}
