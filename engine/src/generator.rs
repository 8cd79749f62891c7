//! Schema compilation and node instantiation.
//!
//! Generation runs in two passes. Compilation walks the schema once,
//! classifies every declaration and produces immutable blueprints; this is
//! the only step that can fail. Instantiation then stamps nodes out of
//! blueprints, resolving defaults on the way, and cannot fail. Arrays keep
//! their element blueprint and a clone of the generator so growing them later
//! never touches the schema again.
//!
//! Default resolution for every node: the field's own `defaultValue`, then
//! the parent's default at that key (or array slot), then the empty fallback
//! (first enum option for selects, `""` for leaves, an empty array for arrays,
//! and an empty mapping for objects). Null counts as absent at every step.

use std::rc::Rc;

use schema_forms_core::{
    FieldKind, FieldSchema, ObjectSchema, ScalarKind, SchemaError, TypeDecl, TypeKind,
    element_path, join_path,
};
use serde_json::Value;
use tracing::{debug, trace};

use crate::array::ArrayField;
use crate::blueprint::{ArrayBlueprint, Blueprint, FlatBlueprint, ObjectBlueprint};
use crate::flat::FlatField;
use crate::node::{ChangeNotifier, FieldNode, ValidationMode, display_text, empty_value};
use crate::object::ObjectField;
use crate::render::InputKind;

/// Builds field trees from schemas.
///
/// Carries what every node receives at construction: the validation mode
/// and the change notifier leading back to the form root.
///
/// # Examples
///
/// ```
/// use schema_forms_core::{FieldSchema, ObjectSchema};
/// use schema_forms_engine::{ChangeNotifier, Field, Generator, ValidationMode};
/// use serde_json::json;
///
/// let schema = ObjectSchema::new()
///     .with_field("name", FieldSchema::string().with_default("Ann"))
///     .with_field("age", FieldSchema::number());
///
/// let generator = Generator::new(ValidationMode::Eager, ChangeNotifier::noop());
/// let object = generator.generate_object(&schema, "Person", &json!(null)).unwrap();
/// assert_eq!(object.get_value(), json!({"name": "Ann", "age": ""}));
/// ```
#[derive(Debug, Clone)]
pub struct Generator {
    mode: ValidationMode,
    notifier: ChangeNotifier,
}

impl Generator {
    /// Creates a generator handing `mode` and `notifier` to every node.
    pub fn new(mode: ValidationMode, notifier: ChangeNotifier) -> Self {
        Self { mode, notifier }
    }

    /// The mode new nodes start in.
    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub(crate) fn set_mode(&mut self, mode: ValidationMode) {
        self.mode = mode;
    }

    pub(crate) fn notify(&self) {
        self.notifier.notify();
    }

    /// Generates one node per schema field, in declaration order.
    ///
    /// `default` is the parent's default mapping; members are looked up by
    /// key.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] met while classifying the schema.
    pub fn generate(
        &self,
        schema: &ObjectSchema,
        default: &Value,
    ) -> Result<Vec<(String, FieldNode)>, SchemaError> {
        let blueprints = compile_object(schema, "")?;
        Ok(self.instantiate_members(&blueprints, default))
    }

    /// Generates an object node wrapping the fields of `schema`.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] met while classifying the schema.
    pub fn generate_object(
        &self,
        schema: &ObjectSchema,
        label: &str,
        default: &Value,
    ) -> Result<ObjectField, SchemaError> {
        let fields = self.generate(schema, default)?;
        debug!(fields = fields.len(), "generated form tree");
        Ok(ObjectField::new(0, label.to_string(), fields))
    }

    /// Stamps a node out of `blueprint`.
    ///
    /// `inherited` is the parent's default at this position.
    pub(crate) fn instantiate(
        &self,
        blueprint: &Blueprint,
        inherited: Option<&Value>,
        key: usize,
    ) -> FieldNode {
        match blueprint {
            Blueprint::Flat(bp) => {
                let default = resolve(bp.default.as_ref(), inherited)
                    .cloned()
                    .or_else(|| bp.enum_options.as_ref().and_then(|opts| opts.first().cloned()))
                    .unwrap_or_else(empty_value);
                FieldNode::Flat(FlatField::new(
                    key,
                    Rc::clone(bp),
                    default,
                    self.mode,
                    self.notifier.clone(),
                ))
            }
            Blueprint::Object(bp) => {
                let default = resolve(bp.default.as_ref(), inherited)
                    .cloned()
                    .unwrap_or_else(|| Value::Object(Default::default()));
                let fields = self.instantiate_members(&bp.fields, &default);
                FieldNode::Object(ObjectField::new(key, bp.label.clone(), fields))
            }
            Blueprint::Array(bp) => {
                let default = resolve(bp.default.as_ref(), inherited)
                    .cloned()
                    .unwrap_or_else(|| Value::Array(Vec::new()));
                trace!(label = %bp.label, "instantiating array");
                FieldNode::Array(ArrayField::new(key, Rc::clone(bp), default, self.clone()))
            }
        }
    }

    fn instantiate_members(
        &self,
        members: &[(String, Blueprint)],
        default: &Value,
    ) -> Vec<(String, FieldNode)> {
        members
            .iter()
            .enumerate()
            .map(|(index, (key, blueprint))| {
                let inherited = default.get(key.as_str());
                (key.clone(), self.instantiate(blueprint, inherited, index))
            })
            .collect()
    }
}

fn resolve<'a>(own: Option<&'a Value>, inherited: Option<&'a Value>) -> Option<&'a Value> {
    own.filter(|v| !v.is_null())
        .or_else(|| inherited.filter(|v| !v.is_null()))
}

fn compile_object(
    schema: &ObjectSchema,
    path: &str,
) -> Result<Vec<(String, Blueprint)>, SchemaError> {
    schema
        .iter()
        .map(|(key, field)| {
            if key.trim().is_empty() {
                return Err(SchemaError::EmptyFieldKey {
                    parent: path.to_string(),
                });
            }
            let blueprint = compile_field(key, field, &join_path(path, key))?;
            Ok((key.to_string(), blueprint))
        })
        .collect()
}

fn compile_field(key: &str, field: &FieldSchema, path: &str) -> Result<Blueprint, SchemaError> {
    let label = field.label.clone().unwrap_or_else(|| key.to_string());
    let default = field.default_value.clone();

    let blueprint = match field.kind(path)? {
        FieldKind::Hidden => Blueprint::Flat(Rc::new(FlatBlueprint {
            input: InputKind::Hidden,
            numeric: false,
            placeholder: label.clone(),
            label,
            enum_options: None,
            validators: Vec::new(),
            required: false,
            default,
        })),
        FieldKind::Flat(scalar) => {
            let enum_options = field.select_options(scalar, path)?.map(<[Value]>::to_vec);
            let input = match (scalar, &enum_options) {
                (ScalarKind::Boolean, _) => InputKind::Checkbox,
                (_, Some(_)) => InputKind::Select,
                _ if field.is_password => InputKind::Password,
                _ => InputKind::Text,
            };
            let placeholder = enum_options
                .as_ref()
                .and_then(|opts| opts.first())
                .map(display_text)
                .unwrap_or_else(|| label.clone());
            trace!(field = path, ?input, "compiled flat field");
            Blueprint::Flat(Rc::new(FlatBlueprint {
                input,
                numeric: scalar == ScalarKind::Number,
                label,
                placeholder,
                enum_options,
                validators: field.declared_validators(),
                required: field.is_required,
                default,
            }))
        }
        FieldKind::Object(schema) => Blueprint::Object(Rc::new(ObjectBlueprint {
            label,
            default,
            fields: compile_object(schema, path)?,
        })),
        FieldKind::Array(element) => Blueprint::Array(Rc::new(ArrayBlueprint {
            element: compile_element(element, &label, &element_path(path))?,
            label,
            default,
            initial_length: field.initial_length,
        })),
    };
    Ok(blueprint)
}

/// Array slots: scalars get a synthesized leaf carrying the array's label,
/// objects and nested arrays compile like any other field.
fn compile_element(element: &TypeDecl, label: &str, path: &str) -> Result<Blueprint, SchemaError> {
    let blueprint = match element.classify(path)? {
        TypeKind::Scalar(scalar) => {
            Blueprint::Flat(Rc::new(FlatBlueprint::element(scalar, label)))
        }
        TypeKind::Object(schema) => Blueprint::Object(Rc::new(ObjectBlueprint {
            label: label.to_string(),
            default: None,
            fields: compile_object(schema, path)?,
        })),
        TypeKind::Array(inner) => Blueprint::Array(Rc::new(ArrayBlueprint {
            element: compile_element(inner, label, &element_path(path))?,
            label: label.to_string(),
            default: None,
            initial_length: None,
        })),
    };
    Ok(blueprint)
}
