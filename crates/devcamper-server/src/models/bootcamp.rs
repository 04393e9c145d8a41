//! Bootcamp resource

use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

use super::schema::{DefaultValue, FieldKind, FieldSpec, Schema};
use crate::geocoder::GeoPoint;

pub const COLLECTION: &str = "bootcamps";

pub const CAREERS: &[&str] = &[
    "Web Development",
    "Mobile Development",
    "UI/UX",
    "Data Science",
    "Business",
    "Other",
];

pub const DEFAULT_PHOTO: &str = "no-photo.jpg";

/// Earth radius in miles, for radius queries
pub const EARTH_RADIUS_MILES: f64 = 3963.0;

/// Earth radius in kilometres, for radius queries
pub const EARTH_RADIUS_KM: f64 = 6378.0;

pub const SCHEMA: Schema = Schema {
    collection: COLLECTION,
    fields: &[
        FieldSpec::new(
            "name",
            "Name",
            FieldKind::Text {
                min_len: None,
                max_len: Some(50),
            },
        )
        .required("Please add a name"),
        FieldSpec::new(
            "slug",
            "Slug",
            FieldKind::Text {
                min_len: None,
                max_len: None,
            },
        )
        .protected(),
        FieldSpec::new(
            "description",
            "Description",
            FieldKind::Text {
                min_len: None,
                max_len: Some(500),
            },
        )
        .required("Please add a description"),
        FieldSpec::new("website", "Website", FieldKind::Url),
        FieldSpec::new(
            "phone",
            "Phone number",
            FieldKind::Text {
                min_len: None,
                max_len: Some(20),
            },
        ),
        FieldSpec::new("email", "Email", FieldKind::Email),
        FieldSpec::new(
            "address",
            "Address",
            FieldKind::Text {
                min_len: None,
                max_len: None,
            },
        )
        .required("Please add an address"),
        FieldSpec::new("location", "Location", FieldKind::Embedded).protected(),
        FieldSpec::new("careers", "Careers", FieldKind::ChoiceList(CAREERS))
            .required("Please add at least one career"),
        FieldSpec::new(
            "averageRating",
            "Rating",
            FieldKind::Number {
                min: Some(1.0),
                max: Some(10.0),
            },
        )
        .protected(),
        FieldSpec::new(
            "averageCost",
            "Average cost",
            FieldKind::Number {
                min: None,
                max: None,
            },
        )
        .protected(),
        FieldSpec::new(
            "photo",
            "Photo",
            FieldKind::Text {
                min_len: None,
                max_len: None,
            },
        )
        .default_value(DefaultValue::Text(DEFAULT_PHOTO)),
        FieldSpec::new("housing", "Housing", FieldKind::Boolean)
            .default_value(DefaultValue::Bool(false)),
        FieldSpec::new("jobAssistance", "Job assistance", FieldKind::Boolean)
            .default_value(DefaultValue::Bool(false)),
        FieldSpec::new("jobGuarantee", "Job guarantee", FieldKind::Boolean)
            .default_value(DefaultValue::Bool(false)),
        FieldSpec::new("acceptGi", "Accept GI", FieldKind::Boolean)
            .default_value(DefaultValue::Bool(false)),
        FieldSpec::new("user", "User", FieldKind::Reference).protected(),
        FieldSpec::new("publisher", "Publisher", FieldKind::Reference).protected(),
        FieldSpec::new("createdAt", "Created at", FieldKind::Date).protected(),
    ],
};

/// GeoJSON point stored in `location`, with the geocoder's address breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
    pub formatted_address: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub country: String,
}

impl Location {
    pub fn from_geocode(point: GeoPoint) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: [point.longitude, point.latitude],
            formatted_address: point.formatted_address,
            street: point.street,
            city: point.city,
            state: point.state,
            zipcode: point.zipcode,
            country: point.country,
        }
    }

    pub fn to_document(&self) -> Document {
        let [lng, lat] = self.coordinates;
        doc! {
            "type": self.kind.clone(),
            "coordinates": [lng, lat],
            "formattedAddress": self.formatted_address.clone(),
            "street": self.street.clone(),
            "city": self.city.clone(),
            "state": self.state.clone(),
            "zipcode": self.zipcode.clone(),
            "country": self.country.clone(),
        }
    }
}

/// Convert a distance into a spherical radius in radians
pub fn radius_in_radians(distance: f64, unit: DistanceUnit) -> f64 {
    match unit {
        DistanceUnit::Miles => distance / EARTH_RADIUS_MILES,
        DistanceUnit::Kilometres => distance / EARTH_RADIUS_KM,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum DistanceUnit {
    #[default]
    #[serde(rename = "mi")]
    Miles,
    #[serde(rename = "km")]
    Kilometres,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schema::{Mode, SchemaError};

    #[test]
    fn test_bootcamp_defaults() {
        let prepared = SCHEMA
            .prepare(
                doc! {
                    "name": "Devworks Bootcamp",
                    "description": "Full stack web development",
                    "address": "233 Bay State Rd Boston MA 02215",
                    "careers": ["Web Development", "UI/UX"],
                    "averageCost": 1,
                },
                Mode::Create,
            )
            .unwrap();

        assert_eq!(prepared.get_str("photo").unwrap(), DEFAULT_PHOTO);
        assert!(!prepared.get_bool("housing").unwrap());
        assert!(!prepared.contains_key("averageCost"));
        assert!(!prepared.contains_key("slug"));
    }

    #[test]
    fn test_bootcamp_rejects_unknown_career() {
        let err = SCHEMA
            .prepare(
                doc! {
                    "name": "X",
                    "description": "Y",
                    "address": "Z",
                    "careers": ["Underwater Basket Weaving"],
                },
                Mode::Create,
            )
            .unwrap_err();
        assert!(matches!(err, SchemaError::Invalid(messages) if messages.len() == 1));
    }

    #[test]
    fn test_radius_in_radians() {
        assert!((radius_in_radians(3963.0, DistanceUnit::Miles) - 1.0).abs() < f64::EPSILON);
        assert!((radius_in_radians(6378.0, DistanceUnit::Kilometres) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_location_document_shape() {
        let location = Location::from_geocode(GeoPoint {
            latitude: 42.35,
            longitude: -71.1,
            formatted_address: "233 Bay State Rd, Boston, MA 02215, US".to_string(),
            street: "233 Bay State Rd".to_string(),
            city: "Boston".to_string(),
            state: "MA".to_string(),
            zipcode: "02215".to_string(),
            country: "US".to_string(),
        });
        let document = location.to_document();
        assert_eq!(document.get_str("type").unwrap(), "Point");
        assert_eq!(document.get_array("coordinates").unwrap()[0].as_f64(), Some(-71.1));
    }
}
