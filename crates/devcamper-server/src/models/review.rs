//! Review resource

use super::schema::{FieldKind, FieldSpec, Schema};

pub const COLLECTION: &str = "reviews";

pub const SCHEMA: Schema = Schema {
    collection: COLLECTION,
    fields: &[
        FieldSpec::new(
            "title",
            "Title",
            FieldKind::Text {
                min_len: None,
                max_len: Some(100),
            },
        )
        .required("Please add a title for the review"),
        FieldSpec::new(
            "text",
            "Text",
            FieldKind::Text {
                min_len: None,
                max_len: None,
            },
        )
        .required("Please add some text"),
        FieldSpec::new(
            "rating",
            "Rating",
            FieldKind::Number {
                min: Some(1.0),
                max: Some(10.0),
            },
        )
        .required("Please add a rating between 1 and 10"),
        FieldSpec::new("bootcamp", "Bootcamp", FieldKind::Reference).protected(),
        FieldSpec::new("user", "User", FieldKind::Reference).protected(),
        FieldSpec::new("createdAt", "Created at", FieldKind::Date).protected(),
    ],
};
