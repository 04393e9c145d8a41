//! Course resource

use super::schema::{DefaultValue, FieldKind, FieldSpec, Schema};

pub const COLLECTION: &str = "courses";

pub const SKILL_LEVELS: &[&str] = &["beginner", "intermediate", "advanced"];

pub const SCHEMA: Schema = Schema {
    collection: COLLECTION,
    fields: &[
        FieldSpec::new(
            "title",
            "Title",
            FieldKind::Text {
                min_len: None,
                max_len: None,
            },
        )
        .required("Please add a course title"),
        FieldSpec::new(
            "description",
            "Description",
            FieldKind::Text {
                min_len: None,
                max_len: None,
            },
        )
        .required("Please add a description"),
        FieldSpec::new(
            "weeks",
            "Weeks",
            FieldKind::Text {
                min_len: None,
                max_len: None,
            },
        )
        .required("Please add number of weeks"),
        FieldSpec::new(
            "tuition",
            "Tuition",
            FieldKind::Number {
                min: Some(0.0),
                max: None,
            },
        )
        .required("Please add a tuition cost"),
        FieldSpec::new("minimumSkill", "Minimum skill", FieldKind::Choice(SKILL_LEVELS))
            .required("Please add a minimum skill"),
        FieldSpec::new("scholarshipAvailable", "Scholarship available", FieldKind::Boolean)
            .default_value(DefaultValue::Bool(false)),
        FieldSpec::new("bootcamp", "Bootcamp", FieldKind::Reference).protected(),
        FieldSpec::new("user", "User", FieldKind::Reference).protected(),
        FieldSpec::new("createdAt", "Created at", FieldKind::Date).protected(),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schema::{Mode, SchemaError};
    use mongodb::bson::doc;

    #[test]
    fn test_course_requires_core_fields() {
        let err = SCHEMA.prepare(doc! { "title": "Front End" }, Mode::Create).unwrap_err();
        assert_eq!(
            err,
            SchemaError::Invalid(vec![
                "Please add a description".to_string(),
                "Please add number of weeks".to_string(),
                "Please add a tuition cost".to_string(),
                "Please add a minimum skill".to_string(),
            ])
        );
    }

    #[test]
    fn test_course_rejects_unknown_skill() {
        let err = SCHEMA
            .prepare(
                doc! {
                    "title": "Front End",
                    "description": "HTML, CSS",
                    "weeks": 8,
                    "tuition": 8000,
                    "minimumSkill": "expert",
                },
                Mode::Create,
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "`expert` is not a valid value for Minimum skill");
    }
}
