//! Paginated list execution with population
//!
//! Runs a translated [`ListQuery`] against one collection: counts every
//! match, fetches the requested page with projection and sort applied, then
//! populates related documents from other collections.

use std::collections::HashMap;

use mongodb::bson::{oid::ObjectId, Bson, Document};

use super::pagination::{PageRequest, Pagination};
use super::query_filter::ListQuery;
use crate::api::response::ApiResponse;
use crate::config::QueryConfig;
use crate::db::{DbResult, DocumentStore, Filter, FindOptions, SortOrder, SortSpec};
use crate::models::document_to_json;

/// How to fill one field from another collection
#[derive(Debug, Clone, Copy)]
pub struct Population {
    /// Output field on each result
    pub path: &'static str,
    pub collection: &'static str,
    /// Field on the result holding the join key
    pub local_field: &'static str,
    /// Field on the related documents matched against the key
    pub foreign_field: &'static str,
    /// Fields kept on related documents; empty keeps everything
    pub select: &'static [&'static str],
    /// Array of every match instead of a single document
    pub many: bool,
}

impl Population {
    /// Replace the id stored at `path` with the referenced document
    pub const fn reference(
        path: &'static str,
        collection: &'static str,
        select: &'static [&'static str],
    ) -> Self {
        Self {
            path,
            collection,
            local_field: path,
            foreign_field: "_id",
            select,
            many: false,
        }
    }

    /// Attach every document of `collection` whose `foreign_field` is this document's id
    pub const fn virtual_many(
        path: &'static str,
        collection: &'static str,
        foreign_field: &'static str,
        select: &'static [&'static str],
    ) -> Self {
        Self {
            path,
            collection,
            local_field: "_id",
            foreign_field,
            select,
            many: true,
        }
    }

    fn projection(&self) -> Option<Vec<String>> {
        if self.select.is_empty() {
            return None;
        }
        let mut fields: Vec<String> = self.select.iter().map(|f| (*f).to_string()).collect();
        if self.foreign_field != "_id" && !self.select.contains(&self.foreign_field) {
            fields.push(self.foreign_field.to_string());
        }
        Some(fields)
    }
}

/// A realized page of results
#[derive(Debug, Clone)]
pub struct AdvancedResults {
    pub data: Vec<Document>,
    pub total: u64,
    pub pagination: Pagination,
}

impl AdvancedResults {
    /// Render as the paginated list envelope
    pub fn into_envelope(self) -> ApiResponse<Vec<serde_json::Value>> {
        let items = self.data.iter().map(document_to_json).collect();
        ApiResponse::paginated(items, self.pagination)
    }
}

/// Sort applied when the query names none
pub fn default_sort() -> Vec<SortSpec> {
    vec![SortSpec {
        field: "createdAt".to_string(),
        order: SortOrder::Desc,
    }]
}

/// Count, fetch one page and populate
#[tracing::instrument(skip(store, query, populate, settings), fields(filter = ?query.filter))]
pub async fn execute(
    store: &dyn DocumentStore,
    collection: &str,
    query: ListQuery,
    populate: &[Population],
    settings: &QueryConfig,
) -> DbResult<AdvancedResults> {
    let limit = query
        .limit
        .unwrap_or(settings.default_limit)
        .min(settings.max_limit);
    let request = PageRequest::new(query.page.unwrap_or(1), limit);

    let mut sort = query.sort.unwrap_or_else(default_sort);
    if !sort.iter().any(|spec| spec.field == "_id") {
        sort.push(SortSpec {
            field: "_id".to_string(),
            order: SortOrder::Asc,
        });
    }

    let total = store.count(collection, &query.filter).await?;

    let options = FindOptions {
        sort,
        skip: request.skip(),
        limit: Some(request.limit),
        projection: query.select,
    };
    let mut data = store.find(collection, &query.filter, &options).await?;

    populate_documents(store, &mut data, populate).await?;

    tracing::debug!(total, returned = data.len(), "Executed list query");

    Ok(AdvancedResults {
        data,
        total,
        pagination: Pagination::new(request, total),
    })
}

/// Fill populated fields in place
pub async fn populate_documents(
    store: &dyn DocumentStore,
    docs: &mut [Document],
    populations: &[Population],
) -> DbResult<()> {
    for population in populations {
        let mut keys: Vec<ObjectId> = docs
            .iter()
            .filter_map(|d| d.get_object_id(population.local_field).ok())
            .collect();
        keys.sort();
        keys.dedup();

        if keys.is_empty() {
            if population.many {
                for doc in docs.iter_mut() {
                    doc.insert(population.path, Bson::Array(Vec::new()));
                }
            }
            continue;
        }

        let filter = Filter::In {
            path: population.foreign_field.to_string(),
            values: keys.into_iter().map(Bson::ObjectId).collect(),
        };
        let options = FindOptions {
            projection: population.projection(),
            ..FindOptions::default()
        };
        let related = store
            .find(population.collection, &filter, &options)
            .await?;

        let mut by_key: HashMap<ObjectId, Vec<Document>> = HashMap::new();
        for doc in related {
            if let Ok(key) = doc.get_object_id(population.foreign_field) {
                by_key.entry(key).or_default().push(doc);
            }
        }

        for doc in docs.iter_mut() {
            let matches = doc
                .get_object_id(population.local_field)
                .ok()
                .and_then(|key| by_key.get(&key));

            let value = match (population.many, matches) {
                (true, Some(found)) => {
                    Bson::Array(found.iter().cloned().map(Bson::Document).collect())
                },
                (true, None) => Bson::Array(Vec::new()),
                (false, Some(found)) => found
                    .first()
                    .cloned()
                    .map(Bson::Document)
                    .unwrap_or(Bson::Null),
                (false, None) => Bson::Null,
            };
            doc.insert(population.path, value);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::{CmpOp, MemoryStore};
    use mongodb::bson::{doc, DateTime};

    async fn seed_items(store: &MemoryStore, n: i64) {
        for i in 0..n {
            store
                .insert_one(
                    "items",
                    doc! { "n": i, "createdAt": DateTime::from_millis(i * 1000) },
                )
                .await
                .unwrap();
        }
    }

    fn page(page: u64, limit: u64) -> ListQuery {
        ListQuery {
            page: Some(page),
            limit: Some(limit),
            ..ListQuery::default()
        }
    }

    #[tokio::test]
    async fn test_page_sizes_follow_formula() {
        let store = MemoryStore::new();
        let n = 7_u64;
        seed_items(&store, n as i64).await;
        let settings = Config::default().query;

        for limit in 1..=4_u64 {
            for k in 1..=4_u64 {
                let results = execute(&store, "items", page(k, limit), &[], &settings)
                    .await
                    .unwrap();
                let expected = limit.min(n.saturating_sub((k - 1) * limit));
                assert_eq!(results.data.len() as u64, expected, "page {k} limit {limit}");
                assert_eq!(results.total, n);
                assert_eq!(results.pagination.next.is_some(), k * limit < n);
                assert_eq!(results.pagination.prev.is_some(), k > 1);
            }
        }
    }

    #[tokio::test]
    async fn test_default_sort_is_newest_first() {
        let store = MemoryStore::new();
        seed_items(&store, 3).await;
        let results = execute(&store, "items", ListQuery::default(), &[], &Config::default().query)
            .await
            .unwrap();
        let order: Vec<i64> = results.data.iter().map(|d| d.get_i64("n").unwrap()).collect();
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[tokio::test]
    async fn test_limit_is_clamped() {
        let store = MemoryStore::new();
        seed_items(&store, 5).await;
        let mut settings = Config::default().query;
        settings.max_limit = 2;
        let results = execute(&store, "items", page(1, 50), &[], &settings)
            .await
            .unwrap();
        assert_eq!(results.data.len(), 2);
        assert_eq!(results.pagination.limit, 2);
    }

    #[tokio::test]
    async fn test_filter_and_projection() {
        let store = MemoryStore::new();
        seed_items(&store, 5).await;
        let query = ListQuery {
            filter: Filter::cmp("n", CmpOp::Gte, 3),
            select: Some(vec!["n".to_string()]),
            ..ListQuery::default()
        };
        let results = execute(&store, "items", query, &[], &Config::default().query)
            .await
            .unwrap();
        assert_eq!(results.total, 2);
        assert!(results.data.iter().all(|d| !d.contains_key("createdAt")));
    }

    #[tokio::test]
    async fn test_forward_and_virtual_population() {
        let store = MemoryStore::new();
        let camp = store
            .insert_one("bootcamps", doc! { "name": "Devworks", "description": "d", "phone": "1" })
            .await
            .unwrap();
        let camp_id = camp.get_object_id("_id").unwrap();
        let empty = store
            .insert_one("bootcamps", doc! { "name": "Empty" })
            .await
            .unwrap();
        for title in ["Front End", "Back End"] {
            store
                .insert_one("courses", doc! { "title": title, "bootcamp": camp_id })
                .await
                .unwrap();
        }

        let mut courses = store
            .find("courses", &Filter::True, &FindOptions::default())
            .await
            .unwrap();
        populate_documents(
            &store,
            &mut courses,
            &[Population::reference("bootcamp", "bootcamps", &["name", "description"])],
        )
        .await
        .unwrap();
        let populated = courses[0].get_document("bootcamp").unwrap();
        assert_eq!(populated.get_str("name").unwrap(), "Devworks");
        assert!(!populated.contains_key("phone"));

        let mut camps = vec![camp, empty];
        populate_documents(
            &store,
            &mut camps,
            &[Population::virtual_many("courses", "courses", "bootcamp", &[])],
        )
        .await
        .unwrap();
        assert_eq!(camps[0].get_array("courses").unwrap().len(), 2);
        assert!(camps[1].get_array("courses").unwrap().is_empty());
    }

    #[test]
    fn test_into_response_shape() {
        let results = AdvancedResults {
            data: vec![doc! { "name": "x" }],
            total: 1,
            pagination: Pagination::new(PageRequest::new(1, 25), 1),
        };
        let json = serde_json::to_value(results.into_envelope()).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 1);
        assert_eq!(json["data"][0]["name"], "x");
        assert_eq!(json["pagination"]["total"], 1);
    }
}
