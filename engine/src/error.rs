//! Error types for form construction and field addressing.

use schema_forms_core::SchemaError;
use thiserror::Error;

/// Errors raised by the form engine.
///
/// Validation failures are never errors: they are reported as data through
/// `is_valid` and the nodes' error messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// The schema could not be compiled.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// No node lives at the given path.
    #[error("no field at path '{0}'")]
    FieldNotFound(String),

    /// The node at the given path is not an array field.
    #[error("field at path '{0}' is not an array")]
    NotAnArray(String),

    /// The node at the given path is not a flat field.
    #[error("field at path '{0}' does not accept input")]
    NotAnInput(String),
}

/// Convenience alias for results with [`FormError`].
pub type Result<T> = std::result::Result<T, FormError>;
