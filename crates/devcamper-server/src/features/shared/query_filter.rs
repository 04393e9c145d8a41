//! Query-string filter translation
//!
//! Turns a flat query string such as
//! `averageCost[lte]=10000&careers[in]=Business,UI/UX&select=name&sort=-name&page=2`
//! into a [`ListQuery`]: a [`Filter`] over the resource plus the reserved
//! `select`, `sort`, `page` and `limit` directives.
//!
//! Rules:
//!
//! - `field=value` is an equality constraint
//! - `field[gt|gte|lt|lte]=value` is a comparison
//! - `field[in]=a,b` is a membership test
//! - any other bracket token (`field[foo]`, `field[]`) is kept as a literal
//!   equality on the raw key
//! - values are cast through the resource schema; unknown fields stay strings
//! - all constraints are combined with `And`, in query order

use std::borrow::Cow;

use mongodb::bson::Bson;
use thiserror::Error;

use crate::db::{CmpOp, Filter, SortSpec};
use crate::error::AppError;
use crate::models::{Schema, SchemaError};

pub const SELECT_KEY: &str = "select";
pub const SORT_KEY: &str = "sort";
pub const PAGE_KEY: &str = "page";
pub const LIMIT_KEY: &str = "limit";

/// Keys consumed as directives; they never reach the filter
pub const RESERVED_KEYS: &[&str] = &[SELECT_KEY, SORT_KEY, PAGE_KEY, LIMIT_KEY];

/// Upper bound for `page` and `limit`
const MAX_COUNT: u64 = i64::MAX as u64;

/// Errors for malformed list queries
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QueryError {
    #[error("Invalid query parameter '{0}'")]
    InvalidKey(String),

    #[error("Query parameters may not contain control characters")]
    ControlCharacter,

    #[error("Operator keys are not allowed in query parameters: '{0}'")]
    OperatorKey(String),

    #[error("{0}")]
    Cast(#[from] SchemaError),

    #[error("'{0}' must be a positive integer")]
    InvalidNumber(&'static str),

    #[error("'{0}' contains an empty entry")]
    EmptyEntry(&'static str),

    #[error("Query parameter '{0}' is not valid UTF-8 once decoded")]
    InvalidEncoding(String),
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        AppError::InvalidQuery(err.to_string())
    }
}

/// A translated list query
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub filter: Filter,
    /// Projection allow-list from `select`
    pub select: Option<Vec<String>>,
    /// Sort keys from `sort`
    pub sort: Option<Vec<SortSpec>>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            filter: Filter::True,
            select: None,
            sort: None,
            page: None,
            limit: None,
        }
    }
}

/// Operator token inside brackets
#[derive(Debug, Clone, Copy, PartialEq)]
enum Operator {
    Cmp(CmpOp),
    In,
}

impl Operator {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "in" => Some(Operator::In),
            other => CmpOp::from_token(other).map(Operator::Cmp),
        }
    }
}

/// Parsed parameter key
#[derive(Debug, PartialEq)]
enum Key<'a> {
    Plain(&'a str),
    Bracketed { field: &'a str, token: &'a str },
}

/// Translate a raw query string for a resource described by `schema`
pub fn translate(raw: Option<&str>, schema: &Schema) -> Result<ListQuery, QueryError> {
    let mut query = ListQuery::default();
    let Some(raw) = raw else {
        return Ok(query);
    };

    for (key, value) in decode_pairs(raw)? {
        if key.chars().chain(value.chars()).any(char::is_control) {
            return Err(QueryError::ControlCharacter);
        }

        match parse_key(&key)? {
            Key::Plain(SELECT_KEY) => query.select = Some(parse_select(&value)?),
            Key::Plain(SORT_KEY) => query.sort = Some(parse_sort(&value)?),
            Key::Plain(PAGE_KEY) => query.page = Some(parse_positive(&value, PAGE_KEY)?),
            Key::Plain(LIMIT_KEY) => query.limit = Some(parse_positive(&value, LIMIT_KEY)?),
            Key::Plain(field) => {
                let value = schema.cast_query_value(field, &value)?;
                query.filter = query.filter.and(Filter::eq(field, value));
            },
            Key::Bracketed { field, .. } if RESERVED_KEYS.contains(&field) => {
                return Err(QueryError::InvalidKey(key.to_string()));
            },
            Key::Bracketed { field, token } => {
                let constraint = match Operator::from_token(token) {
                    Some(Operator::Cmp(op)) => Filter::Cmp {
                        path: field.to_string(),
                        op,
                        value: schema.cast_query_value(field, &value)?,
                    },
                    Some(Operator::In) => Filter::In {
                        path: field.to_string(),
                        values: parse_in_list(field, &value, schema)?,
                    },
                    None => Filter::eq(key.to_string(), Bson::String(value)),
                };
                query.filter = query.filter.and(constraint);
            },
        }
    }

    Ok(query)
}

/// Split `a=1&b=2` into decoded pairs, rejecting escapes that are not UTF-8
fn decode_pairs(raw: &str) -> Result<Vec<(String, String)>, QueryError> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            Ok((decode_component(key)?, decode_component(value)?))
        })
        .collect()
}

fn decode_component(raw: &str) -> Result<String, QueryError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(Cow::into_owned)
        .map_err(|_| QueryError::InvalidEncoding(raw.to_string()))
}

/// Every dotted segment must be non-empty and must not name an operator
fn check_path(path: &str, entry: &str) -> Result<(), QueryError> {
    if path.split('.').any(|segment| segment.starts_with('$')) {
        return Err(QueryError::OperatorKey(entry.to_string()));
    }
    if path.split('.').any(str::is_empty) {
        return Err(QueryError::InvalidKey(entry.to_string()));
    }
    Ok(())
}

fn parse_key(key: &str) -> Result<Key<'_>, QueryError> {
    if key.is_empty() {
        return Err(QueryError::InvalidKey(key.to_string()));
    }

    let (field, token) = match key.find('[') {
        None => {
            if key.contains(']') {
                return Err(QueryError::InvalidKey(key.to_string()));
            }
            (key, None)
        },
        Some(open) => {
            let field = &key[..open];
            let inner = key[open + 1..]
                .strip_suffix(']')
                .ok_or_else(|| QueryError::InvalidKey(key.to_string()))?;
            if field.is_empty() || field.contains(']') || inner.contains(['[', ']']) {
                return Err(QueryError::InvalidKey(key.to_string()));
            }
            (field, Some(inner))
        },
    };

    check_path(field, key)?;

    Ok(match token {
        None => Key::Plain(field),
        Some(token) => Key::Bracketed { field, token },
    })
}

fn split_entries<'a>(value: &'a str, name: &'static str) -> Result<Vec<&'a str>, QueryError> {
    value
        .split(',')
        .map(str::trim)
        .map(|entry| {
            if entry.is_empty() {
                Err(QueryError::EmptyEntry(name))
            } else {
                Ok(entry)
            }
        })
        .collect()
}

fn parse_select(value: &str) -> Result<Vec<String>, QueryError> {
    split_entries(value, SELECT_KEY)?
        .into_iter()
        .map(|field| check_path(field, field).map(|()| field.to_string()))
        .collect()
}

fn parse_sort(value: &str) -> Result<Vec<SortSpec>, QueryError> {
    split_entries(value, SORT_KEY)?
        .into_iter()
        .map(|entry| match SortSpec::parse(entry) {
            Some(spec) => check_path(&spec.field, entry).map(|()| spec),
            None => Err(QueryError::EmptyEntry(SORT_KEY)),
        })
        .collect()
}

fn parse_positive(value: &str, name: &'static str) -> Result<u64, QueryError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|n| (1..=MAX_COUNT).contains(n))
        .ok_or(QueryError::InvalidNumber(name))
}

fn parse_in_list(field: &str, value: &str, schema: &Schema) -> Result<Vec<Bson>, QueryError> {
    split_entries(value, "in")?
        .into_iter()
        .map(|entry| schema.cast_query_value(field, entry).map_err(QueryError::from))
        .collect()
}
