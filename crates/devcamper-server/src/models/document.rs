//! Conversions between stored BSON documents and wire JSON

use chrono::{DateTime, SecondsFormat, Utc};
use mongodb::bson::{self, Bson, Document};
use serde_json::{Map, Value};

use crate::db::DbError;

/// Current time as a BSON date
pub fn now() -> bson::DateTime {
    bson::DateTime::now()
}

pub fn to_bson_datetime(value: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(value.timestamp_millis())
}

pub fn from_bson_datetime(value: bson::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value.timestamp_millis())
}

/// Convert a JSON request body into a document
///
/// Anything other than a JSON object is rejected.
pub fn json_to_document(value: &Value) -> Result<Document, DbError> {
    match value {
        Value::Object(_) => Ok(bson::to_document(value)?),
        _ => Err(DbError::Serialization(
            "request body must be a JSON object".to_string(),
        )),
    }
}

/// Render a stored document as JSON
///
/// ObjectIds become hex strings and dates become RFC 3339 strings.
pub fn document_to_json(doc: &Document) -> Value {
    let mut map = Map::with_capacity(doc.len());
    for (key, value) in doc {
        map.insert(key.clone(), bson_to_json(value));
    }
    Value::Object(map)
}

pub fn bson_to_json(value: &Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => from_bson_datetime(*dt)
            .map(|dt| Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true)))
            .unwrap_or(Value::Null),
        Bson::Document(inner) => document_to_json(inner),
        Bson::Array(items) => Value::Array(items.iter().map(bson_to_json).collect()),
        Bson::Double(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Bson::Int32(i) => Value::from(*i),
        Bson::Int64(i) => Value::from(*i),
        Bson::String(s) => Value::String(s.clone()),
        Bson::Boolean(b) => Value::Bool(*b),
        Bson::Null | Bson::Undefined => Value::Null,
        other => other.clone().into_relaxed_extjson(),
    }
}
