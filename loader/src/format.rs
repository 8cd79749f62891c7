//! File format detection and (de)serialization by extension.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{LoaderError, Result};

/// On-disk document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `.json`
    Json,
    /// `.yaml` / `.yml`
    Yaml,
}

impl Format {
    /// Detects the format from the file extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::UnsupportedFormat`] for any other extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use schema_forms_loader::Format;
    ///
    /// assert_eq!(Format::from_path("forms/login.yml").unwrap(), Format::Yaml);
    /// assert_eq!(Format::from_path("login.JSON").unwrap(), Format::Json);
    /// assert!(Format::from_path("login.toml").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(LoaderError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Returns `true` if `path` has a recognized extension.
    pub fn is_supported(path: impl AsRef<Path>) -> bool {
        Self::from_path(path).is_ok()
    }
}

/// Reads a value tree (e.g. form input) from a JSON or YAML file.
///
/// # Errors
///
/// Returns I/O, parse or [`LoaderError::UnsupportedFormat`] errors.
pub fn load_value(path: impl AsRef<Path>) -> Result<serde_json::Value> {
    read_document(path.as_ref())
}

/// Reads a document, picking the parser from the extension.
pub(crate) fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = Format::from_path(path)?;
    let reader = BufReader::new(File::open(path)?);
    let value = match format {
        Format::Json => serde_json::from_reader(reader)?,
        Format::Yaml => serde_yaml::from_reader(reader)?,
    };
    Ok(value)
}

/// Writes a document, picking the serializer from the extension.
pub(crate) fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let format = Format::from_path(path)?;
    let mut writer = BufWriter::new(File::create(path)?);
    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.write_all(b"\n")?;
        }
        Format::Yaml => serde_yaml::to_writer(&mut writer, value)?,
    }
    writer.flush()?;
    Ok(())
}
