//! Form libraries: many definitions keyed by name.
//!
//! ```no_run
//! use schema_forms_loader::FormLibrary;
//!
//! // One definition per file in a directory
//! let library = FormLibrary::from_dir("forms/").unwrap();
//! let signup = library.get("signup").unwrap().build_form().unwrap();
//!
//! // A single bundle file, with a directory as fallback
//! let library = FormLibrary::builder()
//!     .from_bundle("forms.yaml")
//!     .from_dir("forms/")
//!     .build()
//!     .unwrap();
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use schema_forms_core::SCHEMA_CONTRACT_VERSION;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::definition::FormDefinition;
use crate::error::{LoaderError, Result};
use crate::format::{Format, read_document, write_document};

/// A single file holding several form definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormBundle {
    /// Schema contract version the bundle was written against.
    pub version: String,
    /// The definitions; every one must carry a name.
    pub forms: Vec<FormDefinition>,
}

impl FormBundle {
    /// Creates an empty bundle for the current contract version.
    pub fn new() -> Self {
        Self {
            version: SCHEMA_CONTRACT_VERSION.to_string(),
            forms: Vec::new(),
        }
    }

    /// Saves the bundle as YAML or JSON, by extension.
    ///
    /// # Errors
    ///
    /// Returns I/O, serialization or
    /// [`UnsupportedFormat`](LoaderError::UnsupportedFormat) errors.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        write_document(path.as_ref(), self)
    }
}

impl Default for FormBundle {
    fn default() -> Self {
        Self::new()
    }
}

/// Describes where a [`FormLibrary`] was loaded from.
#[derive(Debug, Clone)]
pub enum LibrarySource {
    /// A directory of definition files.
    Directory(PathBuf),
    /// A single [`FormBundle`] file.
    Bundle(PathBuf),
    /// A fallback chain of sources.
    Multiple(Vec<LibrarySource>),
}

/// Form definitions with lookup by name.
#[derive(Debug)]
pub struct FormLibrary {
    forms: HashMap<String, FormDefinition>,
    source: LibrarySource,
}

impl FormLibrary {
    /// Returns a new [`LibraryBuilder`] for configuring a fallback chain.
    pub fn builder() -> LibraryBuilder {
        LibraryBuilder::new()
    }

    /// Loads every `*.json`, `*.yaml` and `*.yml` file of a directory as a
    /// [`FormDefinition`]. Other files are ignored.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be read, or the first
    /// error met while loading a definition file.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut entries: Vec<PathBuf> = std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()?;
        entries.sort();

        let mut forms = HashMap::new();
        for file_path in entries {
            if !file_path.is_file() || !Format::is_supported(&file_path) {
                debug!(path = %file_path.display(), "skipping non-definition file");
                continue;
            }
            let definition = FormDefinition::load(&file_path)?;
            insert_unique(&mut forms, definition);
        }

        info!(count = forms.len(), path = %path.display(), "loaded form library");
        Ok(Self {
            forms,
            source: LibrarySource::Directory(path.to_path_buf()),
        })
    }

    /// Loads a [`FormBundle`] file.
    ///
    /// # Errors
    ///
    /// Returns I/O or parse errors, and
    /// [`InvalidDefinition`](LoaderError::InvalidDefinition) for a bundled
    /// definition without a name.
    pub fn from_bundle(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bundle: FormBundle = read_document(path)?;
        if bundle.version != SCHEMA_CONTRACT_VERSION {
            warn!(
                found = %bundle.version,
                expected = SCHEMA_CONTRACT_VERSION,
                "bundle contract version differs"
            );
        }

        let mut forms = HashMap::new();
        for (index, definition) in bundle.forms.into_iter().enumerate() {
            if definition.name.trim().is_empty() {
                return Err(LoaderError::InvalidDefinition(format!(
                    "{}: form #{index} has no name",
                    path.display()
                )));
            }
            insert_unique(&mut forms, definition);
        }

        info!(count = forms.len(), path = %path.display(), "loaded form bundle");
        Ok(Self {
            forms,
            source: LibrarySource::Bundle(path.to_path_buf()),
        })
    }

    /// Looks up a definition by name.
    pub fn get(&self, name: &str) -> Option<&FormDefinition> {
        self.forms.get(name)
    }

    /// Inserts a definition, replacing any with the same name.
    pub fn insert(&mut self, definition: FormDefinition) {
        self.forms.insert(definition.name.clone(), definition);
    }

    /// Returns `true` if a definition named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.forms.contains_key(name)
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.forms.len()
    }

    /// Returns `true` if the library holds no definitions.
    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// Definition names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.forms.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Iterates over all definitions in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &FormDefinition> {
        self.forms.values()
    }

    /// Where the library was loaded from.
    pub fn source(&self) -> &LibrarySource {
        &self.source
    }

    /// Packs all definitions into a bundle, sorted by name.
    pub fn to_bundle(&self) -> FormBundle {
        let mut bundle = FormBundle::new();
        bundle.forms = self
            .names()
            .into_iter()
            .filter_map(|name| self.forms.get(name).cloned())
            .collect();
        bundle
    }
}

fn insert_unique(forms: &mut HashMap<String, FormDefinition>, definition: FormDefinition) {
    if forms.contains_key(&definition.name) {
        warn!(name = %definition.name, "duplicate form name, keeping the last one");
    }
    forms.insert(definition.name.clone(), definition);
}

/// Builder for a [`FormLibrary`] with a fallback chain.
///
/// Sources are tried in the order they are added; the first one that loads
/// and holds at least one definition wins.
pub struct LibraryBuilder {
    sources: Vec<LibrarySource>,
}

impl LibraryBuilder {
    /// Creates a builder with no sources.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Adds a directory of definition files.
    pub fn from_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(LibrarySource::Directory(path.into()));
        self
    }

    /// Adds a bundle file.
    pub fn from_bundle(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(LibrarySource::Bundle(path.into()));
        self
    }

    /// Loads from the configured sources in order.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::NoDefinitionsFound`] if every source fails or
    /// is empty.
    pub fn build(self) -> Result<FormLibrary> {
        for source in &self.sources {
            let result = match source {
                LibrarySource::Directory(path) => FormLibrary::from_dir(path),
                LibrarySource::Bundle(path) => FormLibrary::from_bundle(path),
                LibrarySource::Multiple(_) => continue,
            };

            match result {
                Ok(mut library) if !library.is_empty() => {
                    library.source = LibrarySource::Multiple(self.sources.clone());
                    return Ok(library);
                }
                Ok(_) => debug!(?source, "form source is empty"),
                Err(err) => debug!(?source, %err, "form source failed"),
            }
        }

        Err(LoaderError::NoDefinitionsFound)
    }
}

impl Default for LibraryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
