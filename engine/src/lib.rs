//! Runtime engine for declarative forms.
//!
//! Given an [`ObjectSchema`](schema_forms_core::ObjectSchema), the
//! [`Generator`] builds a tree of stateful [`FieldNode`]s (flat leaves,
//! objects, resizable arrays) and [`Form`] wraps it with aggregate validity,
//! a validation mode and submit gating.
//!
//! All nodes share the [`Field`] contract: `get_value`, `set_value`,
//! `reset`, `is_valid` and `show_error_messages`. Values are
//! [`serde_json::Value`] trees shaped like the schema.
//!
//! The engine is single-threaded and event driven. Edits notify the form
//! root, which debounces its validity refresh through a
//! [`ValidityScheduler`]; the host loop drives it with [`Form::poll`].
//!
//! # Example
//!
//! ```
//! use schema_forms_core::{FieldSchema, ObjectSchema, TypeDecl};
//! use schema_forms_engine::{FieldPath, Form};
//! use serde_json::json;
//!
//! let schema = ObjectSchema::new()
//!     .with_field("name", FieldSchema::string().required())
//!     .with_field(
//!         "tags",
//!         FieldSchema::array(TypeDecl::string()).with_default(vec!["a", "b"]),
//!     );
//!
//! let mut form = Form::builder(&schema).build().unwrap();
//! assert!(!form.is_valid());
//!
//! form.add_field(&FieldPath::root().key("tags")).unwrap();
//! form.apply_input(&FieldPath::root().key("name"), json!("Ann")).unwrap();
//! assert_eq!(form.get_value(), json!({"name": "Ann", "tags": ["a", "b", ""]}));
//! assert!(form.flush_validity());
//! ```

mod array;
mod blueprint;
mod error;
mod flat;
mod form;
mod generator;
mod node;
mod object;
mod path;
mod render;
mod schedule;

pub use array::ArrayField;
pub use error::{FormError, Result};
pub use flat::FlatField;
pub use form::{Form, FormBuilder, FormOptions, SubmitHandler, SubmitOutcome};
pub use generator::Generator;
pub use node::{ChangeNotifier, Field, FieldErrors, FieldNode, ValidationMode, display_text};
pub use object::ObjectField;
pub use path::{FieldPath, PathSegment};
pub use render::{ContainerProps, InputKind, InputProps, Renderer};
pub use schedule::{DEFAULT_DEBOUNCE, ScheduledCheck, ValidityScheduler};
