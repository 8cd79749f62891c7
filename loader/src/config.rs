//! Form runtime configuration.
//!
//! Controls when error messages appear and how long the form waits after the
//! last edit before refreshing its aggregate validity.
//!
//! # Example YAML
//!
//! ```yaml
//! validate_on_submit: true
//! validity_debounce_ms: 250
//! ```

use std::path::Path;
use std::time::Duration;

use schema_forms_engine::{FormOptions, ValidationMode};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::format::{read_document, write_document};

fn default_debounce_ms() -> u64 {
    100
}

/// Runtime configuration of a form.
///
/// Every key is optional; missing keys take their defaults.
///
/// # Examples
///
/// ```
/// use schema_forms_engine::ValidationMode;
/// use schema_forms_loader::FormConfig;
///
/// let config: FormConfig = serde_yaml::from_str("validate_on_submit: true").unwrap();
/// let options = config.to_options();
/// assert_eq!(options.mode, ValidationMode::Deferred);
/// assert_eq!(options.debounce.as_millis(), 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormConfig {
    /// Hide error messages until the first failed submit.
    #[serde(default)]
    pub validate_on_submit: bool,
    /// Delay in milliseconds between the last edit and the validity refresh.
    #[serde(default = "default_debounce_ms")]
    pub validity_debounce_ms: u64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            validate_on_submit: false,
            validity_debounce_ms: default_debounce_ms(),
        }
    }
}

impl FormConfig {
    /// Loads configuration from a YAML or JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](crate::LoaderError::UnsupportedFormat)
    /// for unknown extensions, [`IoError`](crate::LoaderError::IoError) if
    /// the file cannot be read, or a parse error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        read_document(path.as_ref())
    }

    /// Saves the configuration as YAML or JSON, by extension.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](crate::LoaderError::UnsupportedFormat)
    /// for unknown extensions, [`IoError`](crate::LoaderError::IoError) if
    /// the file cannot be written, or a serialization error.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        write_document(path.as_ref(), self)
    }

    /// The validation mode this configuration selects.
    pub fn mode(&self) -> ValidationMode {
        ValidationMode::from_validate_on_submit(self.validate_on_submit)
    }

    /// Converts into engine options.
    pub fn to_options(&self) -> FormOptions {
        FormOptions {
            mode: self.mode(),
            debounce: Duration::from_millis(self.validity_debounce_ms),
        }
    }
}

impl From<&FormConfig> for FormOptions {
    fn from(config: &FormConfig) -> Self {
        config.to_options()
    }
}
