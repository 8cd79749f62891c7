//! Loading schema-forms definitions and configuration from files.
//!
//! A [`FormDefinition`] bundles a schema with its label, top-level default
//! value and [`FormConfig`]; a [`FormLibrary`] holds many of them keyed by
//! name, loaded from a directory or a single [`FormBundle`] file. JSON and
//! YAML are both accepted, chosen by file extension.
//!
//! # Quick start
//!
//! ```no_run
//! use schema_forms_loader::{FormDefinition, FormLibrary};
//!
//! let definition = FormDefinition::load("forms/signup.yaml").unwrap();
//! for err in definition.check() {
//!     eprintln!("{err}");
//! }
//! let form = definition.build_form().unwrap();
//! println!("{}", form.get_value());
//!
//! let library = FormLibrary::builder()
//!     .from_dir("forms/")
//!     .from_bundle("forms.json")
//!     .build()
//!     .unwrap();
//! println!("{} forms", library.len());
//! ```

mod config;
mod definition;
mod error;
mod format;
mod library;

pub use config::FormConfig;
pub use definition::FormDefinition;
pub use error::{LoaderError, Result};
pub use format::{Format, load_value};
pub use library::{FormBundle, FormLibrary, LibraryBuilder, LibrarySource};
