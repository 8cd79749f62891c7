//! Form definition files: a schema plus everything needed to build a form.
//!
//! # Example YAML
//!
//! ```yaml
//! name: signup
//! label: Sign up
//! config:
//!   validate_on_submit: true
//! defaultValue:
//!   country: "NO"
//! schema:
//!   email:
//!     type: string
//!     label: Email
//!     isRequired: true
//!     validators:
//!       - regex: "^[^@]+@[^@]+$"
//!   country:
//!     type: string
//!     enum: ["NO", "SE", "DK"]
//!   tags:
//!     type: [string]
//! ```

use std::path::Path;

use schema_forms_core::{ObjectSchema, SchemaError, validate_schema};
use schema_forms_engine::{Form, FormBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::FormConfig;
use crate::error::{LoaderError, Result};
use crate::format::{read_document, write_document};

/// A named, self-contained form description.
///
/// When `name` is missing from a file, [`load`](Self::load) derives it from
/// the file stem.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDefinition {
    /// Lookup key in a [`FormLibrary`](crate::FormLibrary).
    #[serde(default)]
    pub name: String,
    /// Label of the root object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Runtime options.
    #[serde(default)]
    pub config: FormConfig,
    /// Top-level default mapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// The form schema.
    pub schema: ObjectSchema,
}

impl FormDefinition {
    /// Creates a definition with default configuration.
    pub fn new(name: &str, schema: ObjectSchema) -> Self {
        Self {
            name: name.to_string(),
            label: None,
            config: FormConfig::default(),
            default_value: None,
            schema,
        }
    }

    /// Loads a definition from a YAML or JSON file.
    ///
    /// # Errors
    ///
    /// Returns I/O, parse or [`LoaderError::UnsupportedFormat`] errors, and
    /// [`LoaderError::InvalidDefinition`] when the file has no name and none
    /// can be derived from its path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut definition: Self = read_document(path)?;
        if definition.name.trim().is_empty() {
            definition.name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
                .ok_or_else(|| {
                    LoaderError::InvalidDefinition(format!(
                        "{}: missing form name",
                        path.display()
                    ))
                })?;
        }
        debug!(name = %definition.name, path = %path.display(), "loaded form definition");
        Ok(definition)
    }

    /// Saves the definition as YAML or JSON, by extension.
    ///
    /// # Errors
    ///
    /// Returns I/O, serialization or [`LoaderError::UnsupportedFormat`]
    /// errors.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        write_document(path.as_ref(), self)
    }

    /// Every authoring error in the schema.
    pub fn check(&self) -> Vec<SchemaError> {
        validate_schema(&self.schema)
    }

    /// A form builder preloaded with this definition's label, default value
    /// and options; add a submit callback before building.
    pub fn form_builder(&self) -> FormBuilder<'_> {
        let mut builder = Form::builder(&self.schema).options(self.config.to_options());
        if let Some(label) = &self.label {
            builder = builder.label(label);
        }
        if let Some(default) = &self.default_value {
            builder = builder.default_value(default.clone());
        }
        builder
    }

    /// Builds the form.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Form`] if the schema does not compile.
    pub fn build_form(&self) -> Result<Form> {
        Ok(self.form_builder().build()?)
    }
}
