//! The uniform node contract and the node enum the generator produces.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::array::ArrayField;
use crate::flat::FlatField;
use crate::object::ObjectField;
use crate::path::{FieldPath, PathSegment};

/// When error messages become visible.
///
/// Owned by the form root and handed to nodes at construction. The root
/// moves from `Deferred` to `Eager` at most once, on the first rejected
/// submit, and pushes the change down the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Messages are recomputed on every change.
    #[default]
    Eager,
    /// Messages stay hidden until a submit attempt fails.
    Deferred,
}

impl ValidationMode {
    /// Maps the `validate_on_submit` flag onto a mode.
    pub fn from_validate_on_submit(validate_on_submit: bool) -> Self {
        if validate_on_submit {
            Self::Deferred
        } else {
            Self::Eager
        }
    }
}

/// One-way change callback handed from the form root down to every node.
#[derive(Clone)]
pub struct ChangeNotifier(Rc<dyn Fn()>);

impl ChangeNotifier {
    /// Wraps a callback.
    pub fn new(callback: impl Fn() + 'static) -> Self {
        Self(Rc::new(callback))
    }

    /// A notifier that does nothing.
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    /// Invokes the callback.
    pub fn notify(&self) {
        (self.0)();
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChangeNotifier")
    }
}

/// Operations every node of a form tree supports.
pub trait Field {
    /// Positional identity among siblings (declaration index or array slot).
    fn key(&self) -> usize;

    /// Current value, shaped like the schema.
    fn get_value(&self) -> Value;

    /// Replaces the value, resizing arrays and defaulting missing members.
    fn set_value(&mut self, value: Value);

    /// Restores the declared default.
    fn reset(&mut self);

    /// Re-runs validation on demand.
    fn is_valid(&self) -> bool;

    /// Recomputes and surfaces error messages regardless of mode.
    fn show_error_messages(&mut self);

    /// Switches the validation mode of this subtree.
    fn set_mode(&mut self, mode: ValidationMode);
}

/// A node of a generated form tree.
#[derive(Debug)]
pub enum FieldNode {
    /// Scalar leaf (including hidden fields).
    Flat(FlatField),
    /// Fixed set of named children.
    Object(ObjectField),
    /// Resizable sequence of same-shaped children.
    Array(ArrayField),
}

/// Visible error messages of one leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    /// Where the leaf lives.
    pub path: FieldPath,
    /// Its messages, in validator order.
    pub messages: Vec<String>,
}

impl FieldNode {
    fn as_field(&self) -> &dyn Field {
        match self {
            Self::Flat(field) => field,
            Self::Object(field) => field,
            Self::Array(field) => field,
        }
    }

    fn as_field_mut(&mut self) -> &mut dyn Field {
        match self {
            Self::Flat(field) => field,
            Self::Object(field) => field,
            Self::Array(field) => field,
        }
    }

    /// The flat leaf, if this is one.
    pub fn as_flat(&self) -> Option<&FlatField> {
        match self {
            Self::Flat(field) => Some(field),
            _ => None,
        }
    }

    /// Mutable flat leaf, if this is one.
    pub fn as_flat_mut(&mut self) -> Option<&mut FlatField> {
        match self {
            Self::Flat(field) => Some(field),
            _ => None,
        }
    }

    /// The object node, if this is one.
    pub fn as_object(&self) -> Option<&ObjectField> {
        match self {
            Self::Object(field) => Some(field),
            _ => None,
        }
    }

    /// The array node, if this is one.
    pub fn as_array(&self) -> Option<&ArrayField> {
        match self {
            Self::Array(field) => Some(field),
            _ => None,
        }
    }

    /// Mutable array node, if this is one.
    pub fn as_array_mut(&mut self) -> Option<&mut ArrayField> {
        match self {
            Self::Array(field) => Some(field),
            _ => None,
        }
    }

    /// Follows `segments` down from this node.
    pub fn find(&self, segments: &[PathSegment]) -> Option<&FieldNode> {
        let Some((first, rest)) = segments.split_first() else {
            return Some(self);
        };
        let child = match (self, first) {
            (Self::Object(object), PathSegment::Key(key)) => object.get(key)?,
            (Self::Array(array), PathSegment::Index(index)) => array.child(*index)?,
            _ => return None,
        };
        child.find(rest)
    }

    /// Follows `segments` down from this node, mutably.
    pub fn find_mut(&mut self, segments: &[PathSegment]) -> Option<&mut FieldNode> {
        let Some((first, rest)) = segments.split_first() else {
            return Some(self);
        };
        let child = match (self, first) {
            (Self::Object(object), PathSegment::Key(key)) => object.get_mut(key)?,
            (Self::Array(array), PathSegment::Index(index)) => array.child_mut(*index)?,
            _ => return None,
        };
        child.find_mut(rest)
    }

    /// Appends the visible error messages of every leaf below `path`.
    pub fn collect_errors(&self, path: &FieldPath, out: &mut Vec<FieldErrors>) {
        match self {
            Self::Flat(field) => {
                if !field.error_messages().is_empty() {
                    out.push(FieldErrors {
                        path: path.clone(),
                        messages: field.error_messages().to_vec(),
                    });
                }
            }
            Self::Object(object) => object.collect_errors(path, out),
            Self::Array(array) => {
                for (index, child) in array.children().iter().enumerate() {
                    child.collect_errors(&path.child(PathSegment::Index(index)), out);
                }
            }
        }
    }
}

impl Field for FieldNode {
    fn key(&self) -> usize {
        self.as_field().key()
    }

    fn get_value(&self) -> Value {
        self.as_field().get_value()
    }

    fn set_value(&mut self, value: Value) {
        self.as_field_mut().set_value(value);
    }

    fn reset(&mut self) {
        self.as_field_mut().reset();
    }

    fn is_valid(&self) -> bool {
        self.as_field().is_valid()
    }

    fn show_error_messages(&mut self) {
        self.as_field_mut().show_error_messages();
    }

    fn set_mode(&mut self, mode: ValidationMode) {
        self.as_field_mut().set_mode(mode);
    }
}

/// Text shown for a scalar value: strings as-is, null as empty, everything
/// else in JSON form.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The fallback value of a leaf with no default.
pub(crate) fn empty_value() -> Value {
    Value::String(String::new())
}
