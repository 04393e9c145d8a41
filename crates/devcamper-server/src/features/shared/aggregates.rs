//! Bootcamp aggregates maintained from courses and reviews

use mongodb::bson::{oid::ObjectId, Bson, Document};

use crate::db::{DbResult, DocumentStore, Filter, FindOptions, Update};
use crate::models::{bootcamp, course, review};

fn as_f64(value: Option<&Bson>) -> Option<f64> {
    match value? {
        Bson::Int32(i) => Some(f64::from(*i)),
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(f) => Some(*f),
        _ => None,
    }
}

fn mean(docs: &[Document], field: &str) -> Option<f64> {
    let values: Vec<f64> = docs.iter().filter_map(|d| as_f64(d.get(field))).collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

async fn values_for(
    store: &dyn DocumentStore,
    collection: &str,
    bootcamp_id: ObjectId,
    field: &str,
) -> DbResult<Vec<Document>> {
    let options = FindOptions {
        projection: Some(vec![field.to_string()]),
        ..FindOptions::default()
    };
    store
        .find(collection, &Filter::eq("bootcamp", bootcamp_id), &options)
        .await
}

/// Mean tuition rounded up to the next multiple of ten
pub fn average_cost(docs: &[Document]) -> Option<i64> {
    mean(docs, "tuition").map(|avg| ((avg / 10.0).ceil() * 10.0) as i64)
}

pub fn average_rating(docs: &[Document]) -> Option<f64> {
    mean(docs, "rating")
}

/// Recompute `averageCost` after a course is added or removed
#[tracing::instrument(skip(store))]
pub async fn refresh_average_cost(store: &dyn DocumentStore, bootcamp_id: ObjectId) -> DbResult<()> {
    let courses = values_for(store, course::COLLECTION, bootcamp_id, "tuition").await?;
    let update = match average_cost(&courses) {
        Some(cost) => Update::default().set_field("averageCost", cost),
        None => Update::default().unset_field("averageCost"),
    };
    store
        .update_one(bootcamp::COLLECTION, &Filter::by_id(bootcamp_id), &update)
        .await?;
    tracing::debug!(courses = courses.len(), "Refreshed average cost");
    Ok(())
}

/// Recompute `averageRating` after a review changes
#[tracing::instrument(skip(store))]
pub async fn refresh_average_rating(
    store: &dyn DocumentStore,
    bootcamp_id: ObjectId,
) -> DbResult<()> {
    let reviews = values_for(store, review::COLLECTION, bootcamp_id, "rating").await?;
    let update = match average_rating(&reviews) {
        Some(rating) => Update::default().set_field("averageRating", rating),
        None => Update::default().unset_field("averageRating"),
    };
    store
        .update_one(bootcamp::COLLECTION, &Filter::by_id(bootcamp_id), &update)
        .await?;
    tracing::debug!(reviews = reviews.len(), "Refreshed average rating");
    Ok(())
}
