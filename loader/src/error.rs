//! Error types for loading form definitions and configuration.

use schema_forms_core::SchemaError;
use schema_forms_engine::FormError;
use thiserror::Error;

/// Errors that can occur while loading, saving or building forms from files.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A definition parsed but is not usable (e.g. no name could be derived).
    #[error("invalid definition: {0}")]
    InvalidDefinition(String),

    /// The file extension is neither JSON nor YAML.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Every configured source failed or held no definitions.
    #[error("no form definitions found")]
    NoDefinitionsFound,

    /// The schema of a definition has authoring errors.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// The form could not be built.
    #[error("form error: {0}")]
    Form(#[from] FormError),
}

/// Convenience alias for results with [`LoaderError`].
pub type Result<T> = std::result::Result<T, LoaderError>;
