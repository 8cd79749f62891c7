//! Object nodes: a fixed, ordered set of named children.

use serde_json::{Map, Value};

use crate::node::{Field, FieldErrors, FieldNode, ValidationMode};
use crate::path::{FieldPath, PathSegment};

/// A composite node whose keys are fixed by the schema for its lifetime.
///
/// `set_value` delegates member by member; members missing from the given
/// mapping receive null and fall back to their empty value.
#[derive(Debug)]
pub struct ObjectField {
    key: usize,
    label: String,
    fields: Vec<(String, FieldNode)>,
}

impl ObjectField {
    pub(crate) fn new(key: usize, label: String, fields: Vec<(String, FieldNode)>) -> Self {
        Self { key, label, fields }
    }

    /// Display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Member keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Members in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldNode)> {
        self.fields.iter().map(|(k, node)| (k.as_str(), node))
    }

    /// Looks up a member.
    pub fn get(&self, key: &str) -> Option<&FieldNode> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, node)| node)
    }

    /// Looks up a member mutably.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut FieldNode> {
        self.fields
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, node)| node)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` when the schema declared no members.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Follows `segments` from this object; the first step must be a key.
    pub fn find(&self, segments: &[PathSegment]) -> Option<&FieldNode> {
        match segments.split_first()? {
            (PathSegment::Key(key), rest) => self.get(key)?.find(rest),
            (PathSegment::Index(_), _) => None,
        }
    }

    /// Mutable variant of [`find`](Self::find).
    pub fn find_mut(&mut self, segments: &[PathSegment]) -> Option<&mut FieldNode> {
        match segments.split_first()? {
            (PathSegment::Key(key), rest) => self.get_mut(key)?.find_mut(rest),
            (PathSegment::Index(_), _) => None,
        }
    }

    /// Appends the visible error messages of every leaf below `path`.
    pub fn collect_errors(&self, path: &FieldPath, out: &mut Vec<FieldErrors>) {
        for (key, node) in &self.fields {
            node.collect_errors(&path.child(PathSegment::Key(key.clone())), out);
        }
    }
}

impl Field for ObjectField {
    fn key(&self) -> usize {
        self.key
    }

    fn get_value(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(key, node)| (key.clone(), node.get_value()))
            .collect();
        Value::Object(map)
    }

    fn set_value(&mut self, value: Value) {
        for (key, node) in &mut self.fields {
            let member = value.get(key.as_str()).cloned().unwrap_or(Value::Null);
            node.set_value(member);
        }
    }

    fn reset(&mut self) {
        for (_, node) in &mut self.fields {
            node.reset();
        }
    }

    fn is_valid(&self) -> bool {
        self.fields.iter().all(|(_, node)| node.is_valid())
    }

    fn show_error_messages(&mut self) {
        for (_, node) in &mut self.fields {
            node.show_error_messages();
        }
    }

    fn set_mode(&mut self, mode: ValidationMode) {
        for (_, node) in &mut self.fields {
            node.set_mode(mode);
        }
    }
}
