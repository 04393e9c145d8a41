//! Backend-neutral filter and sort expressions
//!
//! A [`Filter`] is built by the query translator and the feature handlers,
//! then either rendered to a MongoDB filter document or evaluated directly
//! by the in-memory store.

use mongodb::bson::{doc, oid::ObjectId, Bson, Document};

/// Ordered comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CmpOp {
    /// Parse the operator token used in query strings (`gt`, `lte`, ...)
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "gt" => Some(CmpOp::Gt),
            "gte" => Some(CmpOp::Gte),
            "lt" => Some(CmpOp::Lt),
            "lte" => Some(CmpOp::Lte),
            _ => None,
        }
    }

    /// MongoDB operator name
    pub fn operator(self) -> &'static str {
        match self {
            CmpOp::Gt => "$gt",
            CmpOp::Gte => "$gte",
            CmpOp::Lt => "$lt",
            CmpOp::Lte => "$lte",
        }
    }
}

/// Boolean filter expression over document paths
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every document
    True,
    And(Vec<Filter>),
    Or(Vec<Filter>),
    /// Equality; an array field matches when any element is equal
    Eq { path: String, value: Bson },
    Cmp { path: String, op: CmpOp, value: Bson },
    /// Membership in a value set
    In { path: String, values: Vec<Bson> },
    /// GeoJSON point at `path` lies within `radius` radians of `center` (`[lng, lat]`)
    GeoWithinSphere { path: String, center: [f64; 2], radius: f64 },
}

impl Filter {
    pub fn eq(path: impl Into<String>, value: impl Into<Bson>) -> Self {
        Filter::Eq {
            path: path.into(),
            value: value.into(),
        }
    }

    pub fn by_id(id: ObjectId) -> Self {
        Filter::eq("_id", id)
    }

    pub fn cmp(path: impl Into<String>, op: CmpOp, value: impl Into<Bson>) -> Self {
        Filter::Cmp {
            path: path.into(),
            op,
            value: value.into(),
        }
    }

    /// Conjunction that flattens nested `And`s and drops `True`
    pub fn and(self, other: Filter) -> Self {
        let mut parts = Vec::new();
        for filter in [self, other] {
            match filter {
                Filter::True => {},
                Filter::And(children) => parts.extend(children),
                other => parts.push(other),
            }
        }
        match parts.len() {
            0 => Filter::True,
            1 => parts.remove(0),
            _ => Filter::And(parts),
        }
    }

    /// Render as a MongoDB query document
    pub fn to_document(&self) -> Document {
        match self {
            Filter::True => Document::new(),
            Filter::And(children) => {
                let rendered: Vec<Bson> = children
                    .iter()
                    .filter(|c| !matches!(c, Filter::True))
                    .map(|c| Bson::Document(c.to_document()))
                    .collect();
                match rendered.len() {
                    0 => Document::new(),
                    _ => doc! { "$and": rendered },
                }
            },
            Filter::Or(children) => {
                let rendered: Vec<Bson> = children
                    .iter()
                    .map(|c| Bson::Document(c.to_document()))
                    .collect();
                doc! { "$or": rendered }
            },
            Filter::Eq { path, value } => {
                let mut d = Document::new();
                d.insert(path.clone(), value.clone());
                d
            },
            Filter::Cmp { path, op, value } => {
                let mut inner = Document::new();
                inner.insert(op.operator(), value.clone());
                let mut d = Document::new();
                d.insert(path.clone(), inner);
                d
            },
            Filter::In { path, values } => {
                let mut d = Document::new();
                d.insert(path.clone(), doc! { "$in": values.clone() });
                d
            },
            Filter::GeoWithinSphere {
                path,
                center,
                radius,
            } => {
                let (lng, lat, radius) = (center[0], center[1], *radius);
                let mut d = Document::new();
                d.insert(
                    path.clone(),
                    doc! {
                        "$geoWithin": {
                            "$centerSphere": [[lng, lat], radius]
                        }
                    },
                );
                d
            },
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// One sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl SortSpec {
    /// Parse `field` or `-field`
    pub fn parse(token: &str) -> Option<Self> {
        let (field, order) = match token.strip_prefix('-') {
            Some(rest) => (rest, SortOrder::Desc),
            None => (token, SortOrder::Asc),
        };
        if field.is_empty() {
            return None;
        }
        Some(SortSpec {
            field: field.to_string(),
            order,
        })
    }

    pub fn to_document(specs: &[SortSpec]) -> Document {
        let mut d = Document::new();
        for spec in specs {
            let direction = match spec.order {
                SortOrder::Asc => 1,
                SortOrder::Desc => -1,
            };
            d.insert(spec.field.clone(), direction);
        }
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_renders_operator() {
        let filter = Filter::cmp("averageCost", CmpOp::Lte, 10000);
        assert_eq!(filter.to_document(), doc! { "averageCost": { "$lte": 10000 } });
    }

    #[test]
    fn test_and_flattens_and_drops_true() {
        let filter = Filter::True
            .and(Filter::eq("housing", true))
            .and(Filter::eq("jobGuarantee", false));
        assert_eq!(
            filter,
            Filter::And(vec![
                Filter::eq("housing", true),
                Filter::eq("jobGuarantee", false)
            ])
        );
        assert_eq!(Filter::True.and(Filter::True), Filter::True);
    }

    #[test]
    fn test_in_and_geo_rendering() {
        let filter = Filter::In {
            path: "careers".to_string(),
            values: vec![Bson::from("Business"), Bson::from("UI/UX")],
        };
        assert_eq!(
            filter.to_document(),
            doc! { "careers": { "$in": ["Business", "UI/UX"] } }
        );

        let geo = Filter::GeoWithinSphere {
            path: "location".to_string(),
            center: [-71.1, 42.3],
            radius: 0.5,
        };
        assert_eq!(
            geo.to_document(),
            doc! { "location": { "$geoWithin": { "$centerSphere": [[-71.1, 42.3], 0.5] } } }
        );
    }

    #[test]
    fn test_sort_spec_parse() {
        assert_eq!(
            SortSpec::parse("-createdAt"),
            Some(SortSpec {
                field: "createdAt".to_string(),
                order: SortOrder::Desc
            })
        );
        assert_eq!(SortSpec::parse("-"), None);
        assert_eq!(
            SortSpec::to_document(&[
                SortSpec::parse("name").unwrap(),
                SortSpec::parse("-rating").unwrap()
            ]),
            doc! { "name": 1, "rating": -1 }
        );
    }
}
