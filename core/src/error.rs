//! Schema-authoring errors.
//!
//! These are the only fatal failures in the form pipeline. They are raised
//! while a schema is classified or compiled, never while a user edits values.

use thiserror::Error;

/// Errors detected while classifying or compiling a form schema.
///
/// Every variant carries the dotted path of the offending field (array
/// elements are written as `field[]`), so schema authors can locate the
/// declaration at development time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The declared scalar type is not supported (e.g. `date`).
    #[error("unsupported type '{type_name}' for field '{field}'")]
    UnsupportedType {
        /// Path of the offending field.
        field: String,
        /// The type name as declared.
        type_name: String,
    },
    /// A sequence type declares zero or several element types.
    #[error(
        "invalid schema: array type must declare exactly one element type (field '{field}' declares {len})"
    )]
    InvalidArrayType {
        /// Path of the offending field.
        field: String,
        /// Number of element types declared.
        len: usize,
    },
    /// An `enum` entry is not a scalar value.
    #[error("enum value for field '{field}' must be a string, number or boolean")]
    InvalidEnumValue {
        /// Path of the offending field.
        field: String,
    },
    /// An object schema declares a field with an empty key.
    #[error("field key cannot be empty (in '{parent}')")]
    EmptyFieldKey {
        /// Path of the object containing the empty key.
        parent: String,
    },
}

/// Joins a parent path and a child key with a dot.
pub fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

/// Path of the element slot of an array field.
pub fn element_path(parent: &str) -> String {
    format!("{parent}[]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_array_message_is_distinct() {
        let err = SchemaError::InvalidArrayType {
            field: "tags".to_string(),
            len: 2,
        };
        assert!(
            err.to_string()
                .starts_with("invalid schema: array type must declare exactly one element type")
        );
    }

    #[test]
    fn test_paths() {
        assert_eq!(join_path("", "name"), "name");
        assert_eq!(join_path("address", "street"), "address.street");
        assert_eq!(element_path("address.lines"), "address.lines[]");
    }
}
