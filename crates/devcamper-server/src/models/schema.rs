//! Declarative resource schemas
//!
//! Each resource declares its fields once as a static [`Schema`]. The schema
//! is used in two places:
//!
//! - before every create/update, [`Schema::prepare`] drops unknown and
//!   server-maintained fields, casts values to the declared types, applies
//!   defaults and checks constraints, collecting every failure message;
//! - when translating a query string, [`Schema::cast_query_value`] turns the
//!   raw text into the field's type so comparisons behave numerically.

use chrono::DateTime;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use thiserror::Error;

use super::document::to_bson_datetime;
use crate::features::shared::validation::{is_valid_email, is_valid_url};

/// Errors produced by schema processing
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchemaError {
    /// One or more field rules failed, in field declaration order
    #[error("{}", .0.join(", "))]
    Invalid(Vec<String>),

    /// A query-string value could not be cast to the field type
    #[error("Invalid value '{value}' for field '{field}'")]
    Cast { field: String, value: String },
}

/// Whether a document is being created or partially updated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Required fields must be present; defaults are applied
    Create,
    /// Only supplied fields are checked
    Update,
}

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Text {
        min_len: Option<usize>,
        max_len: Option<usize>,
    },
    Email,
    Url,
    Number {
        min: Option<f64>,
        max: Option<f64>,
    },
    Boolean,
    /// One of a fixed set of strings
    Choice(&'static [&'static str]),
    /// Array whose elements are each one of a fixed set of strings
    ChoiceList(&'static [&'static str]),
    Reference,
    Date,
    /// Embedded document with no further checks
    Embedded,
}

#[derive(Debug, Clone, Copy)]
pub enum DefaultValue {
    Bool(bool),
    Text(&'static str),
}

impl DefaultValue {
    fn to_bson(self) -> Bson {
        match self {
            DefaultValue::Bool(b) => Bson::Boolean(b),
            DefaultValue::Text(s) => Bson::String(s.to_string()),
        }
    }
}

/// One declared field
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Message reported when the field is missing or empty
    pub required: Option<&'static str>,
    /// Server-maintained; never accepted from request bodies
    pub protected: bool,
    pub default: Option<DefaultValue>,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: None,
            protected: false,
            default: None,
        }
    }

    pub const fn required(self, message: &'static str) -> Self {
        Self {
            required: Some(message),
            ..self
        }
    }

    pub const fn protected(self) -> Self {
        Self {
            protected: true,
            ..self
        }
    }

    pub const fn default_value(self, value: DefaultValue) -> Self {
        Self {
            default: Some(value),
            ..self
        }
    }

    /// Cast a body value to this field's type
    fn cast(&self, value: Bson) -> Result<Bson, String> {
        let invalid = || format!("Invalid value for {}", self.label);
        if matches!(value, Bson::Null) {
            return Ok(value);
        }
        match self.kind {
            FieldKind::Text { .. } => match value {
                Bson::String(_) => Ok(value),
                Bson::Int32(i) => Ok(Bson::String(i.to_string())),
                Bson::Int64(i) => Ok(Bson::String(i.to_string())),
                Bson::Double(f) => Ok(Bson::String(f.to_string())),
                _ => Err(invalid()),
            },
            FieldKind::Email | FieldKind::Url | FieldKind::Choice(_) => match value {
                Bson::String(_) => Ok(value),
                _ => Err(invalid()),
            },
            FieldKind::Number { .. } => match value {
                Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) => Ok(value),
                Bson::String(s) => parse_number(s.trim()).ok_or_else(invalid),
                _ => Err(invalid()),
            },
            FieldKind::Boolean => match value {
                Bson::Boolean(_) => Ok(value),
                Bson::String(s) => parse_bool(&s).map(Bson::Boolean).ok_or_else(invalid),
                _ => Err(invalid()),
            },
            FieldKind::ChoiceList(_) => match value {
                Bson::String(s) => Ok(Bson::Array(vec![Bson::String(s)])),
                Bson::Array(items) if items.iter().all(|i| matches!(i, Bson::String(_))) => {
                    Ok(Bson::Array(items))
                },
                _ => Err(invalid()),
            },
            FieldKind::Reference => match value {
                Bson::ObjectId(_) => Ok(value),
                Bson::String(s) => ObjectId::parse_str(&s)
                    .map(Bson::ObjectId)
                    .map_err(|_| invalid()),
                _ => Err(invalid()),
            },
            FieldKind::Date => match value {
                Bson::DateTime(_) => Ok(value),
                Bson::String(s) => parse_date(&s).ok_or_else(invalid),
                _ => Err(invalid()),
            },
            FieldKind::Embedded => match value {
                Bson::Document(_) => Ok(value),
                _ => Err(invalid()),
            },
        }
    }

    /// Check constraints on a cast, non-null value
    fn check(&self, value: &Bson) -> Option<String> {
        match (self.kind, value) {
            (FieldKind::Text { min_len, max_len }, Bson::String(s)) => {
                let len = s.chars().count();
                if let Some(max) = max_len.filter(|max| len > *max) {
                    return Some(format!("{} can not be more than {} characters", self.label, max));
                }
                min_len
                    .filter(|min| len < *min)
                    .map(|min| format!("{} must be at least {} characters", self.label, min))
            },
            (FieldKind::Email, Bson::String(s)) => {
                (!is_valid_email(s)).then(|| "Please add a valid email".to_string())
            },
            (FieldKind::Url, Bson::String(s)) => {
                (!is_valid_url(s)).then(|| "Please use a valid URL with HTTP or HTTPS".to_string())
            },
            (FieldKind::Number { min, max }, number) => {
                let n = as_f64(number)?;
                if let Some(min) = min.filter(|min| n < *min) {
                    return Some(format!("{} must be at least {}", self.label, min));
                }
                max.filter(|max| n > *max)
                    .map(|max| format!("{} can not be more than {}", self.label, max))
            },
            (FieldKind::Choice(choices), Bson::String(s)) => (!choices.contains(&s.as_str()))
                .then(|| format!("`{}` is not a valid value for {}", s, self.label)),
            (FieldKind::ChoiceList(choices), Bson::Array(items)) => items.iter().find_map(|item| {
                item.as_str()
                    .filter(|s| !choices.contains(s))
                    .map(|s| format!("`{}` is not a valid value for {}", s, self.label))
            }),
            _ => None,
        }
    }
}

fn parse_number(raw: &str) -> Option<Bson> {
    if let Ok(i) = raw.parse::<i64>() {
        return Some(Bson::Int64(i));
    }
    raw.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Bson::Double)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_date(raw: &str) -> Option<Bson> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| Bson::DateTime(to_bson_datetime(dt.to_utc())))
}

fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(i) => Some(f64::from(*i)),
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(f) => Some(*f),
        _ => None,
    }
}

fn is_empty(value: &Bson) -> bool {
    match value {
        Bson::Null => true,
        Bson::String(s) => s.trim().is_empty(),
        Bson::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Field declarations for one collection
#[derive(Debug)]
pub struct Schema {
    pub collection: &'static str,
    pub fields: &'static [FieldSpec],
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Sanitize, cast and validate a request body
    pub fn prepare(&self, input: Document, mode: Mode) -> Result<Document, SchemaError> {
        let mut input = input;
        let mut output = Document::new();
        let mut messages = Vec::new();

        for spec in self.fields.iter().filter(|f| !f.protected) {
            let value = match input.remove(spec.name) {
                Some(value) => match spec.cast(value) {
                    Ok(value) => Some(value),
                    Err(message) => {
                        messages.push(message);
                        continue;
                    },
                },
                None if mode == Mode::Create => spec.default.map(DefaultValue::to_bson),
                None => None,
            };

            match value {
                Some(value) if is_empty(&value) => {
                    if let Some(message) = spec.required {
                        messages.push(message.to_string());
                    } else {
                        output.insert(spec.name, value);
                    }
                },
                Some(value) => {
                    if let Some(message) = spec.check(&value) {
                        messages.push(message);
                    }
                    output.insert(spec.name, value);
                },
                None => {
                    if let (Mode::Create, Some(message)) = (mode, spec.required) {
                        messages.push(message.to_string());
                    }
                },
            }
        }

        if messages.is_empty() {
            Ok(output)
        } else {
            Err(SchemaError::Invalid(messages))
        }
    }

    /// Cast a raw query-string value for `path`
    ///
    /// Unknown paths (including dotted paths into embedded documents) keep
    /// the raw string.
    pub fn cast_query_value(&self, path: &str, raw: &str) -> Result<Bson, SchemaError> {
        let cast_error = || SchemaError::Cast {
            field: path.to_string(),
            value: raw.to_string(),
        };

        if path == "_id" {
            return ObjectId::parse_str(raw)
                .map(Bson::ObjectId)
                .map_err(|_| cast_error());
        }

        let Some(spec) = self.field(path) else {
            return Ok(Bson::String(raw.to_string()));
        };

        match spec.kind {
            FieldKind::Number { .. } => parse_number(raw).ok_or_else(cast_error),
            FieldKind::Boolean => parse_bool(raw).map(Bson::Boolean).ok_or_else(cast_error),
            FieldKind::Reference => ObjectId::parse_str(raw)
                .map(Bson::ObjectId)
                .map_err(|_| cast_error()),
            FieldKind::Date => parse_date(raw).ok_or_else(cast_error),
            _ => Ok(Bson::String(raw.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    const SAMPLE: Schema = Schema {
        collection: "samples",
        fields: &[
            FieldSpec::new(
                "name",
                "Name",
                FieldKind::Text {
                    min_len: None,
                    max_len: Some(10),
                },
            )
            .required("Please add a name"),
            FieldSpec::new("website", "Website", FieldKind::Url),
            FieldSpec::new(
                "rating",
                "Rating",
                FieldKind::Number {
                    min: Some(1.0),
                    max: Some(10.0),
                },
            ),
            FieldSpec::new("housing", "Housing", FieldKind::Boolean)
                .default_value(DefaultValue::Bool(false)),
            FieldSpec::new("tags", "Tags", FieldKind::ChoiceList(&["a", "b"]))
                .required("Please add tags"),
            FieldSpec::new("owner", "Owner", FieldKind::Reference).protected(),
        ],
    };

    #[test]
    fn test_prepare_create_applies_defaults_and_drops_unknown() {
        let prepared = SAMPLE
            .prepare(
                doc! { "name": "Camp", "tags": "a", "owner": "x", "extra": 1 },
                Mode::Create,
            )
            .unwrap();
        assert_eq!(
            prepared,
            doc! { "name": "Camp", "housing": false, "tags": ["a"] }
        );
    }

    #[test]
    fn test_prepare_collects_messages_in_field_order() {
        let err = SAMPLE
            .prepare(
                doc! { "name": "A name that is too long", "website": "nope", "rating": 11 },
                Mode::Create,
            )
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::Invalid(vec![
                "Name can not be more than 10 characters".to_string(),
                "Please use a valid URL with HTTP or HTTPS".to_string(),
                "Rating can not be more than 10".to_string(),
                "Please add tags".to_string(),
            ])
        );
        assert_eq!(
            err.to_string(),
            "Name can not be more than 10 characters, Please use a valid URL with HTTP or HTTPS, Rating can not be more than 10, Please add tags"
        );
    }

    #[test]
    fn test_prepare_update_checks_only_supplied_fields() {
        let prepared = SAMPLE
            .prepare(doc! { "rating": "7" }, Mode::Update)
            .unwrap();
        assert_eq!(prepared, doc! { "rating": 7_i64 });

        let err = SAMPLE.prepare(doc! { "name": "" }, Mode::Update).unwrap_err();
        assert_eq!(err, SchemaError::Invalid(vec!["Please add a name".to_string()]));
    }

    #[test]
    fn test_prepare_rejects_invalid_choice() {
        let err = SAMPLE
            .prepare(doc! { "name": "Camp", "tags": ["a", "z"] }, Mode::Create)
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::Invalid(vec!["`z` is not a valid value for Tags".to_string()])
        );
    }

    #[test]
    fn test_cast_query_value() {
        assert_eq!(SAMPLE.cast_query_value("rating", "5").unwrap(), Bson::Int64(5));
        assert_eq!(SAMPLE.cast_query_value("rating", "4.5").unwrap(), Bson::Double(4.5));
        assert_eq!(SAMPLE.cast_query_value("housing", "true").unwrap(), Bson::Boolean(true));
        assert_eq!(
            SAMPLE.cast_query_value("location.state", "MA").unwrap(),
            Bson::String("MA".to_string())
        );
        assert!(matches!(
            SAMPLE.cast_query_value("rating", "abc"),
            Err(SchemaError::Cast { .. })
        ));
        assert!(SAMPLE.cast_query_value("owner", "nope").is_err());
        assert!(SAMPLE.cast_query_value("_id", "nope").is_err());
    }
}
