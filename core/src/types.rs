//! Schema type definitions for declarative forms.
//!
//! A form schema is an [`ObjectSchema`]: an ordered mapping from field key to
//! [`FieldSchema`]. Each field declares a [`TypeDecl`], which is either a
//! scalar type name, a nested object schema, or a one-element sequence whose
//! element is itself a type declaration (arrays, arbitrarily nested).
//!
//! Declarations are kept exactly as authored. [`TypeDecl::classify`] and
//! [`FieldSchema::kind`] turn them into the closed [`TypeKind`] /
//! [`FieldKind`] unions, rejecting authoring errors on the way.
//!
//! The types serialize with [`serde`], using the schema file vocabulary
//! (`type`, `label`, `defaultValue`, `enum`, `validators`, `validate`,
//! `isRequired`, `isPassword`, `hidden`, `initialLength`).

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{SchemaError, element_path};
use crate::validators::Validator;

/// Version of the schema file contract (semver).
pub const SCHEMA_CONTRACT_VERSION: &str = "1.0.0";

/// Scalar type name as declared in a schema.
///
/// Names are matched case-insensitively; anything unrecognized is kept as
/// [`ScalarType::Unknown`] so classification can report it.
///
/// # Examples
///
/// ```
/// use schema_forms_core::ScalarType;
///
/// assert_eq!(ScalarType::from("String".to_string()), ScalarType::String);
/// assert_eq!(ScalarType::from("bool".to_string()), ScalarType::Boolean);
/// assert_eq!(ScalarType::from("uuid".to_string()), ScalarType::Unknown("uuid".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScalarType {
    /// Free text.
    String,
    /// Numeric text or number.
    Number,
    /// Checkbox.
    Boolean,
    /// Recognized but unsupported.
    Date,
    /// Unrecognized type name.
    Unknown(String),
}

impl ScalarType {
    /// The canonical (or as-declared) type name.
    pub fn name(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Unknown(name) => name,
        }
    }
}

impl From<String> for ScalarType {
    fn from(name: String) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "string" => Self::String,
            "number" => Self::Number,
            "boolean" | "bool" => Self::Boolean,
            "date" => Self::Date,
            _ => Self::Unknown(name),
        }
    }
}

impl From<ScalarType> for String {
    fn from(scalar: ScalarType) -> Self {
        scalar.name().to_string()
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Supported scalar kinds, after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// Free text.
    String,
    /// Numeric; adds the implicit number validator.
    Number,
    /// Checkbox.
    Boolean,
}

/// A field's declared type, as authored.
///
/// In schema files a scalar is a type name (`"string"`), an object is a
/// mapping of sub-fields, and an array is a one-element list (`["string"]`,
/// `[{...}]`, `[["number"]]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeDecl {
    /// Scalar type name.
    Scalar(ScalarType),
    /// Sequence of element types; valid only with exactly one element.
    Sequence(Vec<TypeDecl>),
    /// Nested object schema.
    Mapping(ObjectSchema),
}

impl TypeDecl {
    /// `string` scalar.
    pub fn string() -> Self {
        Self::Scalar(ScalarType::String)
    }

    /// `number` scalar.
    pub fn number() -> Self {
        Self::Scalar(ScalarType::Number)
    }

    /// `boolean` scalar.
    pub fn boolean() -> Self {
        Self::Scalar(ScalarType::Boolean)
    }

    /// One-element array of `element`.
    pub fn array_of(element: TypeDecl) -> Self {
        Self::Sequence(vec![element])
    }

    /// Nested object.
    pub fn object(schema: ObjectSchema) -> Self {
        Self::Mapping(schema)
    }

    /// Classifies this declaration, checking nested array elements
    /// recursively.
    ///
    /// `field` is the path used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnsupportedType`] for `date` or unknown scalar
    /// names, and [`SchemaError::InvalidArrayType`] for sequences that do not
    /// declare exactly one element type.
    ///
    /// # Examples
    ///
    /// ```
    /// use schema_forms_core::{SchemaError, TypeDecl, TypeKind};
    ///
    /// let tags = TypeDecl::array_of(TypeDecl::string());
    /// assert!(matches!(tags.classify("tags"), Ok(TypeKind::Array(_))));
    ///
    /// let bad = TypeDecl::Sequence(vec![TypeDecl::string(), TypeDecl::number()]);
    /// assert!(matches!(bad.classify("pair"), Err(SchemaError::InvalidArrayType { len: 2, .. })));
    /// ```
    pub fn classify(&self, field: &str) -> Result<TypeKind<'_>, SchemaError> {
        match self {
            Self::Scalar(ScalarType::String) => Ok(TypeKind::Scalar(ScalarKind::String)),
            Self::Scalar(ScalarType::Number) => Ok(TypeKind::Scalar(ScalarKind::Number)),
            Self::Scalar(ScalarType::Boolean) => Ok(TypeKind::Scalar(ScalarKind::Boolean)),
            Self::Scalar(other) => Err(SchemaError::UnsupportedType {
                field: field.to_string(),
                type_name: other.name().to_string(),
            }),
            Self::Sequence(elements) => match elements.as_slice() {
                [element] => {
                    element.classify(&element_path(field))?;
                    Ok(TypeKind::Array(element))
                }
                _ => Err(SchemaError::InvalidArrayType {
                    field: field.to_string(),
                    len: elements.len(),
                }),
            },
            Self::Mapping(schema) => Ok(TypeKind::Object(schema)),
        }
    }
}

impl From<ScalarType> for TypeDecl {
    fn from(scalar: ScalarType) -> Self {
        Self::Scalar(scalar)
    }
}

impl From<ObjectSchema> for TypeDecl {
    fn from(schema: ObjectSchema) -> Self {
        Self::Mapping(schema)
    }
}

/// Result of [`TypeDecl::classify`].
#[derive(Debug, Clone, Copy)]
pub enum TypeKind<'a> {
    /// Supported scalar.
    Scalar(ScalarKind),
    /// Nested object.
    Object(&'a ObjectSchema),
    /// Array; the payload is the element declaration.
    Array(&'a TypeDecl),
}

/// Result of [`FieldSchema::kind`].
#[derive(Debug, Clone, Copy)]
pub enum FieldKind<'a> {
    /// Scalar leaf.
    Flat(ScalarKind),
    /// Hidden scalar leaf: fixed default, no validation, no widget.
    Hidden,
    /// Nested object.
    Object(&'a ObjectSchema),
    /// Array; the payload is the element declaration.
    Array(&'a TypeDecl),
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Declaration of a single form field.
///
/// # Examples
///
/// ```
/// use schema_forms_core::{FieldSchema, validators};
///
/// let name = FieldSchema::string()
///     .with_label("Name")
///     .required()
///     .with_validator(validators::max_length(40));
/// assert!(name.is_required);
/// assert_eq!(name.declared_validators().len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    /// Declared type.
    #[serde(rename = "type")]
    pub field_type: TypeDecl,
    /// Display label; also the default placeholder of text inputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Schema-shaped default; initial value and reset target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// Closed set of allowed scalar values (select input).
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    /// Declared validators, in reporting order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
    /// Single-validator sugar; ignored when `validators` is non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate: Option<Validator>,
    /// Adds the implicit non-empty validator.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_required: bool,
    /// Renders a text field as a password input.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_password: bool,
    /// Hidden field.
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
    /// Array slots created when no default is given (at least 1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_length: Option<usize>,
}

impl FieldSchema {
    /// Creates a field of the given type with no modifiers.
    pub fn new(field_type: impl Into<TypeDecl>) -> Self {
        Self {
            field_type: field_type.into(),
            label: None,
            default_value: None,
            enum_values: None,
            validators: Vec::new(),
            validate: None,
            is_required: false,
            is_password: false,
            hidden: false,
            initial_length: None,
        }
    }

    /// `string` field.
    pub fn string() -> Self {
        Self::new(TypeDecl::string())
    }

    /// `number` field.
    pub fn number() -> Self {
        Self::new(TypeDecl::number())
    }

    /// `boolean` field.
    pub fn boolean() -> Self {
        Self::new(TypeDecl::boolean())
    }

    /// Nested object field.
    pub fn object(schema: ObjectSchema) -> Self {
        Self::new(TypeDecl::object(schema))
    }

    /// Array field of `element`.
    pub fn array(element: TypeDecl) -> Self {
        Self::new(TypeDecl::array_of(element))
    }

    /// Sets the label.
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    /// Sets the default value.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Restricts the field to a closed set of values.
    pub fn with_enum<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Appends a declared validator.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Sets the single-validator sugar.
    pub fn with_validate(mut self, validator: Validator) -> Self {
        self.validate = Some(validator);
        self
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    /// Marks a text field as a password.
    pub fn password(mut self) -> Self {
        self.is_password = true;
        self
    }

    /// Marks the field as hidden.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Sets the initial array length used when no default is declared.
    pub fn with_initial_length(mut self, len: usize) -> Self {
        self.initial_length = Some(len);
        self
    }

    /// The declared validator list: `validators` if non-empty, otherwise
    /// `validate` as a one-element list.
    pub fn declared_validators(&self) -> Vec<Validator> {
        if !self.validators.is_empty() {
            return self.validators.clone();
        }
        self.validate.iter().cloned().collect()
    }

    /// Select options of a scalar field of kind `scalar`.
    ///
    /// Booleans always render as checkboxes, so their `enum` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidEnumValue`] if an option is an array or
    /// a mapping.
    ///
    /// # Examples
    ///
    /// ```
    /// use schema_forms_core::{FieldSchema, ScalarKind};
    /// use serde_json::json;
    ///
    /// let color = FieldSchema::string().with_enum(["red", "blue"]);
    /// assert_eq!(color.select_options(ScalarKind::String, "color").unwrap().map(<[_]>::len), Some(2));
    ///
    /// let flag = FieldSchema::boolean().with_enum([json!([1])]);
    /// assert_eq!(flag.select_options(ScalarKind::Boolean, "flag").unwrap(), None);
    /// ```
    pub fn select_options(
        &self,
        scalar: ScalarKind,
        field: &str,
    ) -> Result<Option<&[Value]>, SchemaError> {
        let Some(values) = self.enum_values.as_deref() else {
            return Ok(None);
        };
        if scalar == ScalarKind::Boolean {
            return Ok(None);
        }
        if values.iter().any(|v| v.is_array() || v.is_object()) {
            return Err(SchemaError::InvalidEnumValue {
                field: field.to_string(),
            });
        }
        Ok(Some(values))
    }

    /// Classifies the field.
    ///
    /// A hidden scalar field is [`FieldKind::Hidden`] whatever its scalar
    /// type; `hidden` has no effect on object and array fields.
    ///
    /// # Errors
    ///
    /// Propagates [`TypeDecl::classify`] errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use schema_forms_core::{FieldKind, FieldSchema, ScalarType, SchemaError};
    ///
    /// let date = FieldSchema::new(ScalarType::Date);
    /// assert!(matches!(date.kind("born"), Err(SchemaError::UnsupportedType { .. })));
    ///
    /// let hidden = FieldSchema::new(ScalarType::Date).hidden();
    /// assert!(matches!(hidden.kind("born"), Ok(FieldKind::Hidden)));
    /// ```
    pub fn kind(&self, field: &str) -> Result<FieldKind<'_>, SchemaError> {
        if self.hidden && matches!(self.field_type, TypeDecl::Scalar(_)) {
            return Ok(FieldKind::Hidden);
        }
        Ok(match self.field_type.classify(field)? {
            TypeKind::Scalar(scalar) => FieldKind::Flat(scalar),
            TypeKind::Object(schema) => FieldKind::Object(schema),
            TypeKind::Array(element) => FieldKind::Array(element),
        })
    }
}

/// Ordered mapping from field key to [`FieldSchema`].
///
/// Iteration follows declaration order, and serialization preserves it.
///
/// # Examples
///
/// ```
/// use schema_forms_core::{FieldSchema, ObjectSchema, TypeDecl};
///
/// let schema = ObjectSchema::new()
///     .with_field("name", FieldSchema::string().required())
///     .with_field("tags", FieldSchema::array(TypeDecl::string()));
///
/// assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["name", "tags"]);
/// assert!(schema.get("name").unwrap().is_required);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    fields: Vec<(String, FieldSchema)>,
}

impl ObjectSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a field, builder style.
    pub fn with_field(mut self, key: &str, field: FieldSchema) -> Self {
        self.insert(key, field);
        self
    }

    /// Adds a field, replacing an existing one with the same key in place.
    pub fn insert(&mut self, key: &str, field: FieldSchema) {
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = field,
            None => self.fields.push((key.to_string(), field)),
        }
    }

    /// Looks up a field by key.
    pub fn get(&self, key: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, f)| f)
    }

    /// Iterates `(key, field)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSchema)> {
        self.fields.iter().map(|(k, f)| (k.as_str(), f))
    }

    /// Iterates keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the schema declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for ObjectSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, field) in &self.fields {
            map.serialize_entry(key, field)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ObjectSchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ObjectSchemaVisitor;

        impl<'de> Visitor<'de> for ObjectSchemaVisitor {
            type Value = ObjectSchema;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping from field key to field declaration")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut schema = ObjectSchema::new();
                while let Some((key, field)) = access.next_entry::<String, FieldSchema>()? {
                    schema.insert(&key, field);
                }
                Ok(schema)
            }
        }

        deserializer.deserialize_map(ObjectSchemaVisitor)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validators;

    #[test]
    fn test_deserialize_nested_schema() {
        let schema: ObjectSchema = serde_json::from_value(json!({
            "name": {"type": "string", "label": "Name", "isRequired": true},
            "address": {"type": {
                "street": {"type": "String"},
                "lines": {"type": ["string"], "defaultValue": ["a"]}
            }},
            "matrix": {"type": [["number"]]},
            "people": {"type": [{"first": {"type": "string"}}]}
        }))
        .unwrap();

        assert_eq!(
            schema.keys().collect::<Vec<_>>(),
            vec!["name", "address", "matrix", "people"]
        );
        assert!(matches!(
            schema.get("name").unwrap().kind("name"),
            Ok(FieldKind::Flat(ScalarKind::String))
        ));
        let address = schema.get("address").unwrap();
        let FieldKind::Object(inner) = address.kind("address").unwrap() else {
            panic!("address should be an object");
        };
        assert_eq!(inner.keys().collect::<Vec<_>>(), vec!["street", "lines"]);

        let FieldKind::Array(element) = schema.get("matrix").unwrap().kind("matrix").unwrap()
        else {
            panic!("matrix should be an array");
        };
        assert!(matches!(element.classify("matrix[]"), Ok(TypeKind::Array(_))));
        assert!(matches!(
            schema.get("people").unwrap().kind("people"),
            Ok(FieldKind::Array(TypeDecl::Mapping(_)))
        ));
    }

    #[test]
    fn test_deserialize_validators_and_enum() {
        let field: FieldSchema = serde_json::from_value(json!({
            "type": "string",
            "enum": ["", "a", "b"],
            "validators": [{"maxLength": 1}],
            "validate": "nonEmpty"
        }))
        .unwrap();
        assert_eq!(field.enum_values.as_ref().map(Vec::len), Some(3));
        let declared = field.declared_validators();
        assert_eq!(declared.len(), 1);
        assert!(matches!(declared[0], Validator::MaxLength(1)));
    }

    #[test]
    fn test_validate_sugar_used_when_list_empty() {
        let field = FieldSchema::string().with_validate(validators::number());
        let declared = field.declared_validators();
        assert!(matches!(declared.as_slice(), [Validator::Number]));
    }

    #[test]
    fn test_classify_rejects_empty_sequence() {
        let decl = TypeDecl::Sequence(Vec::new());
        assert_eq!(
            decl.classify("tags").unwrap_err(),
            SchemaError::InvalidArrayType {
                field: "tags".to_string(),
                len: 0
            }
        );
    }

    #[test]
    fn test_classify_checks_nested_elements() {
        let decl = TypeDecl::array_of(TypeDecl::Sequence(vec![
            TypeDecl::string(),
            TypeDecl::string(),
        ]));
        assert_eq!(
            decl.classify("grid").unwrap_err(),
            SchemaError::InvalidArrayType {
                field: "grid[]".to_string(),
                len: 2
            }
        );
    }

    #[test]
    fn test_unknown_scalar_is_unsupported() {
        let field: FieldSchema = serde_json::from_value(json!({"type": "uuid"})).unwrap();
        assert_eq!(
            field.kind("id").unwrap_err(),
            SchemaError::UnsupportedType {
                field: "id".to_string(),
                type_name: "uuid".to_string()
            }
        );
    }

    #[test]
    fn test_hidden_ignored_for_objects() {
        let field = FieldSchema::object(ObjectSchema::new()).hidden();
        assert!(matches!(field.kind("meta"), Ok(FieldKind::Object(_))));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut schema = ObjectSchema::new()
            .with_field("a", FieldSchema::string())
            .with_field("b", FieldSchema::string());
        schema.insert("a", FieldSchema::number());
        assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(matches!(
            schema.get("a").unwrap().field_type,
            TypeDecl::Scalar(ScalarType::Number)
        ));
    }

    #[test]
    fn test_serialize_preserves_order_and_vocabulary() {
        let schema = ObjectSchema::new()
            .with_field("z", FieldSchema::string().required())
            .with_field("a", FieldSchema::array(TypeDecl::number()).with_default(json!([1])));
        let yaml = serde_yaml::to_string(&schema).unwrap();
        let z = yaml.find("z:").unwrap();
        let a = yaml.find("a:").unwrap();
        assert!(z < a);
        assert!(yaml.contains("isRequired: true"));
        assert!(yaml.contains("defaultValue:"));
    }
}
