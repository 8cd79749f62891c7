//! Core schema types and validators for declarative forms.
//!
//! This crate defines the static side of a form:
//!
//! - [`ObjectSchema`]: ordered mapping from field key to declaration; the
//!   top level of every form.
//! - [`FieldSchema`]: one field with its type, label, default, enum options,
//!   validators and modifiers (`isRequired`, `isPassword`, `hidden`).
//! - [`TypeDecl`]: the declared type as authored (scalar name, nested
//!   object, one-element array), classified into [`TypeKind`] /
//!   [`FieldKind`].
//! - [`Validator`] and the [`validators`] constructors: pure checks that
//!   return an optional error message.
//!
//! Authoring errors ([`SchemaError`]) are reported by classification and by
//! [`validate_schema`], which walks the whole schema at once.
//!
//! # Example
//!
//! ```
//! use schema_forms_core::*;
//!
//! let schema = ObjectSchema::new()
//!     .with_field("name", FieldSchema::string().with_label("Name").required())
//!     .with_field(
//!         "tags",
//!         FieldSchema::array(TypeDecl::string()).with_default(vec!["a", "b"]),
//!     )
//!     .with_field(
//!         "zip",
//!         FieldSchema::string().with_validator(validators::length_equals(5)),
//!     );
//!
//! assert!(validate_schema(&schema).is_empty());
//! assert!(matches!(schema.get("tags").unwrap().kind("tags"), Ok(FieldKind::Array(_))));
//! ```

mod error;
mod types;
mod validate;
pub mod validators;

pub use error::{SchemaError, element_path, join_path};
pub use types::*;
pub use validate::validate_schema;
pub use validators::{CustomValidator, Pattern, Validator, ValidatorFn};
