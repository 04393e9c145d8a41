//! Address geocoding
//!
//! Bootcamp creation and radius search resolve free-form addresses and
//! zipcodes to coordinates through the [`Geocoder`] trait. The production
//! implementation calls a MapQuest-compatible HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::config::GeocoderConfig;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// A resolved address
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_address: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub country: String,
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Geocoder API key is not configured")]
    MissingApiKey,

    #[error("Geocoder request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Geocoder returned status {code}: {message}")]
    Provider { code: i64, message: String },
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve an address; `Ok(None)` when the provider finds no match
    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, GeocodeError>;
}

/// MapQuest-style HTTP geocoder
pub struct HttpGeocoder {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl HttpGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    info: Option<ResponseInfo>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct ResponseInfo {
    statuscode: i64,
    #[serde(default)]
    messages: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    locations: Vec<ProviderLocation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderLocation {
    #[serde(default)]
    street: String,
    /// City
    #[serde(default)]
    admin_area5: String,
    /// State
    #[serde(default)]
    admin_area3: String,
    /// Country
    #[serde(default)]
    admin_area1: String,
    #[serde(default)]
    postal_code: String,
    lat_lng: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl From<ProviderLocation> for GeoPoint {
    fn from(location: ProviderLocation) -> Self {
        let formatted_address = [
            location.street.as_str(),
            location.admin_area5.as_str(),
            format!("{} {}", location.admin_area3, location.postal_code).trim(),
            location.admin_area1.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ");

        GeoPoint {
            latitude: location.lat_lng.lat,
            longitude: location.lat_lng.lng,
            formatted_address,
            street: location.street,
            city: location.admin_area5,
            state: location.admin_area3,
            zipcode: location.postal_code,
            country: location.admin_area1,
        }
    }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    #[tracing::instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        let api_key = self.api_key.as_deref().ok_or(GeocodeError::MissingApiKey)?;

        let response: GeocodeResponse = self
            .client
            .get(&self.url)
            .query(&[("key", api_key), ("location", address), ("maxResults", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(info) = response.info.filter(|info| info.statuscode != 0) {
            return Err(GeocodeError::Provider {
                code: info.statuscode,
                message: info.messages.join("; "),
            });
        }

        let point = response
            .results
            .into_iter()
            .flat_map(|result| result.locations)
            .next()
            .map(GeoPoint::from);

        tracing::debug!(found = point.is_some(), "Geocoded address");
        Ok(point)
    }
}
