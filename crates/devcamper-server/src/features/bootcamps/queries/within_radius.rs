//! Radius search
//!
//! Geocodes a zipcode and returns every bootcamp whose location lies within
//! `distance` of it, measured on a sphere of the earth's radius in the
//! requested unit.

use mediator::Request;
use mongodb::bson::Document;

use crate::db::{DbError, Filter, FindOptions};
use crate::error::AppError;
use crate::features::FeatureState;
use crate::geocoder::GeocodeError;
use crate::models::bootcamp::{radius_in_radians, DistanceUnit, COLLECTION};

#[derive(Debug, Clone)]
pub struct BootcampsInRadiusQuery {
    pub zipcode: String,
    /// Raw path segment; must parse as a non-negative number
    pub distance: String,
    pub unit: DistanceUnit,
}

#[derive(Debug, thiserror::Error)]
pub enum BootcampsInRadiusError {
    #[error("Invalid distance '{0}'")]
    InvalidDistance(String),

    #[error("No location found for zipcode {0}")]
    ZipcodeNotFound(String),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<BootcampsInRadiusError> for AppError {
    fn from(err: BootcampsInRadiusError) -> Self {
        match err {
            BootcampsInRadiusError::InvalidDistance(_) => AppError::InvalidQuery(err.to_string()),
            BootcampsInRadiusError::ZipcodeNotFound(_) => AppError::NotFound(err.to_string()),
            BootcampsInRadiusError::Geocode(e) => AppError::Internal(e.to_string()),
            BootcampsInRadiusError::Database(e) => e.into(),
        }
    }
}

impl Request<Result<Vec<Document>, BootcampsInRadiusError>> for BootcampsInRadiusQuery {}

impl crate::cqrs::middleware::Query for BootcampsInRadiusQuery {}

impl BootcampsInRadiusQuery {
    /// Parse the distance
    pub fn validate(&self) -> Result<f64, BootcampsInRadiusError> {
        self.distance
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite() && *d >= 0.0)
            .ok_or_else(|| BootcampsInRadiusError::InvalidDistance(self.distance.clone()))
    }
}

#[tracing::instrument(skip(state), fields(zipcode = %query.zipcode, distance = %query.distance))]
pub async fn handle(
    state: FeatureState,
    query: BootcampsInRadiusQuery,
) -> Result<Vec<Document>, BootcampsInRadiusError> {
    let distance = query.validate()?;

    let point = state
        .geocoder
        .geocode(&query.zipcode)
        .await?
        .ok_or_else(|| BootcampsInRadiusError::ZipcodeNotFound(query.zipcode.clone()))?;

    let filter = Filter::GeoWithinSphere {
        path: "location".to_string(),
        center: [point.longitude, point.latitude],
        radius: radius_in_radians(distance, query.unit),
    };

    let bootcamps = state
        .store
        .find(COLLECTION, &filter, &FindOptions::default())
        .await?;

    tracing::debug!(found = bootcamps.len(), "Radius search complete");
    Ok(bootcamps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{test_state, TestBootcamp, TestUser};
    use crate::models::bootcamp::Location;
    use crate::geocoder::GeoPoint;

    fn query(distance: &str, unit: DistanceUnit) -> BootcampsInRadiusQuery {
        BootcampsInRadiusQuery {
            zipcode: "02215".to_string(),
            distance: distance.to_string(),
            unit,
        }
    }

    #[tokio::test]
    async fn test_radius_includes_near_and_excludes_far() {
        let (state, _) = test_state();
        let owner = TestUser::publisher("pub@example.com").insert(&state).await;
        TestBootcamp::new(&owner, "Boston Camp").insert(&state).await;

        // New York is roughly 190 miles from Boston.
        let far = Location::from_geocode(GeoPoint {
            latitude: 40.7128,
            longitude: -74.006,
            formatted_address: "New York".to_string(),
            street: String::new(),
            city: "New York".to_string(),
            state: "NY".to_string(),
            zipcode: "10007".to_string(),
            country: "US".to_string(),
        });
        state
            .store
            .insert_one(
                COLLECTION,
                mongodb::bson::doc! { "name": "NYC Camp", "location": far.to_document() },
            )
            .await
            .unwrap();

        let near = handle(state.clone(), query("10", DistanceUnit::Miles)).await.unwrap();
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].get_str("name").unwrap(), "Boston Camp");

        let wide = handle(state.clone(), query("250", DistanceUnit::Miles)).await.unwrap();
        assert_eq!(wide.len(), 2);

        let km = handle(state, query("250", DistanceUnit::Kilometres)).await.unwrap();
        assert_eq!(km.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_distance_and_unknown_zipcode() {
        let (state, _) = test_state();
        assert!(matches!(
            handle(state.clone(), query("far", DistanceUnit::Miles)).await,
            Err(BootcampsInRadiusError::InvalidDistance(_))
        ));

        let mut unknown = query("10", DistanceUnit::Miles);
        unknown.zipcode = "00000".to_string();
        let err = handle(state, unknown).await.unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.status_code(), axum::http::StatusCode::NOT_FOUND);
    }
}
