//! Whole-schema authoring checks.
//!
//! Form generation fails fast on the first authoring error it meets. This
//! module walks the entire schema once and collects every problem, which is
//! what schema tooling (and the CLI `check` command) wants to show.
//!
//! # Examples
//!
//! ```
//! use schema_forms_core::*;
//!
//! let schema = ObjectSchema::new()
//!     .with_field("name", FieldSchema::string())
//!     .with_field("tags", FieldSchema::array(TypeDecl::string()));
//! assert!(validate_schema(&schema).is_empty());
//!
//! let bad = ObjectSchema::new()
//!     .with_field("born", FieldSchema::new(ScalarType::Date))
//!     .with_field("pair", FieldSchema::new(TypeDecl::Sequence(vec![])));
//! assert_eq!(validate_schema(&bad).len(), 2);
//! ```

use crate::error::{SchemaError, element_path, join_path};
use crate::{FieldKind, FieldSchema, ObjectSchema, TypeDecl, TypeKind};

/// Validates a form schema, returning every authoring error found.
///
/// Checks for empty field keys, unsupported scalar types, array types that
/// do not declare exactly one element type, and non-scalar enum values on
/// text and number fields (boolean fields ignore `enum`).
pub fn validate_schema(schema: &ObjectSchema) -> Vec<SchemaError> {
    let mut errors = Vec::new();
    validate_object(schema, "", &mut errors);
    errors
}

fn validate_object(schema: &ObjectSchema, parent: &str, errors: &mut Vec<SchemaError>) {
    for (key, field) in schema.iter() {
        if key.trim().is_empty() {
            errors.push(SchemaError::EmptyFieldKey {
                parent: parent.to_string(),
            });
            continue;
        }
        validate_field(field, &join_path(parent, key), errors);
    }
}

fn validate_field(field: &FieldSchema, path: &str, errors: &mut Vec<SchemaError>) {
    let kind = match field.kind(path) {
        Ok(kind) => kind,
        Err(err) => {
            errors.push(err);
            return;
        }
    };

    match kind {
        FieldKind::Flat(scalar) => {
            if let Err(err) = field.select_options(scalar, path) {
                errors.push(err);
            }
        }
        FieldKind::Hidden => {}
        FieldKind::Object(schema) => validate_object(schema, path, errors),
        FieldKind::Array(element) => validate_element(element, &element_path(path), errors),
    }
}

/// Array elements are already known to classify; only object members remain
/// to be checked.
fn validate_element(element: &TypeDecl, path: &str, errors: &mut Vec<SchemaError>) {
    match element.classify(path) {
        Ok(TypeKind::Object(schema)) => validate_object(schema, path, errors),
        Ok(TypeKind::Array(inner)) => validate_element(inner, &element_path(path), errors),
        Ok(TypeKind::Scalar(_)) => {}
        Err(err) => errors.push(err),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ScalarType;

    #[test]
    fn test_validate_accepts_valid_schema() {
        let schema = ObjectSchema::new()
            .with_field("name", FieldSchema::string().required())
            .with_field(
                "people",
                FieldSchema::array(TypeDecl::object(
                    ObjectSchema::new()
                        .with_field("first", FieldSchema::string())
                        .with_field("aliases", FieldSchema::array(TypeDecl::string())),
                )),
            );
        assert!(validate_schema(&schema).is_empty());
    }

    #[test]
    fn test_validate_reports_nested_paths() {
        let schema = ObjectSchema::new().with_field(
            "people",
            FieldSchema::array(TypeDecl::object(
                ObjectSchema::new().with_field("born", FieldSchema::new(ScalarType::Date)),
            )),
        );
        assert_eq!(
            validate_schema(&schema),
            vec![SchemaError::UnsupportedType {
                field: "people[].born".to_string(),
                type_name: "date".to_string()
            }]
        );
    }

    #[test]
    fn test_validate_rejects_object_enum_values() {
        let schema = ObjectSchema::new().with_field(
            "color",
            FieldSchema::string().with_enum(vec![json!("red"), json!({"bad": true})]),
        );
        assert_eq!(
            validate_schema(&schema),
            vec![SchemaError::InvalidEnumValue {
                field: "color".to_string()
            }]
        );
    }

    #[test]
    fn test_validate_ignores_boolean_enum() {
        let schema = ObjectSchema::new().with_field(
            "agree",
            FieldSchema::boolean().with_enum(vec![json!({"yes": true})]),
        );
        assert!(validate_schema(&schema).is_empty());
    }

    #[test]
    fn test_validate_rejects_empty_key() {
        let schema = ObjectSchema::new().with_field(
            "outer",
            FieldSchema::object(ObjectSchema::new().with_field(" ", FieldSchema::string())),
        );
        assert_eq!(
            validate_schema(&schema),
            vec![SchemaError::EmptyFieldKey {
                parent: "outer".to_string()
            }]
        );
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let schema = ObjectSchema::new()
            .with_field("a", FieldSchema::new(ScalarType::Date))
            .with_field(
                "b",
                FieldSchema::new(TypeDecl::Sequence(vec![
                    TypeDecl::string(),
                    TypeDecl::string(),
                ])),
            )
            .with_field("c", FieldSchema::new(ScalarType::Date).hidden());
        let errors = validate_schema(&schema);
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], SchemaError::UnsupportedType { .. }));
        assert!(matches!(errors[1], SchemaError::InvalidArrayType { len: 2, .. }));
    }
}
