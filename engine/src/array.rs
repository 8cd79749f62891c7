//! Array nodes: a resizable sequence of same-shaped children.

use std::rc::Rc;

use serde_json::Value;
use tracing::trace;

use crate::blueprint::ArrayBlueprint;
use crate::generator::Generator;
use crate::node::{Field, FieldNode, ValidationMode};

/// A composite node holding `size >= 1` child slots.
///
/// Every slot is stamped out of the element blueprint by the generator, with
/// the slot index as its key. Growing appends slots, shrinking truncates the
/// tail; the last remaining slot is never removed.
#[derive(Debug)]
pub struct ArrayField {
    key: usize,
    blueprint: Rc<ArrayBlueprint>,
    default: Value,
    children: Vec<FieldNode>,
    generator: Generator,
}

impl ArrayField {
    pub(crate) fn new(
        key: usize,
        blueprint: Rc<ArrayBlueprint>,
        default: Value,
        generator: Generator,
    ) -> Self {
        let size = initial_size(&default, blueprint.initial_length);
        let children = (0..size)
            .map(|i| generator.instantiate(&blueprint.element, slot_default(&default, i), i))
            .collect();
        Self {
            key,
            blueprint,
            default,
            children,
            generator,
        }
    }

    /// Display label.
    pub fn label(&self) -> &str {
        &self.blueprint.label
    }

    /// Number of live slots.
    pub fn size(&self) -> usize {
        self.children.len()
    }

    /// Live slots in order.
    pub fn children(&self) -> &[FieldNode] {
        &self.children
    }

    /// Slot at `index`.
    pub fn child(&self, index: usize) -> Option<&FieldNode> {
        self.children.get(index)
    }

    /// Slot at `index`, mutably.
    pub fn child_mut(&mut self, index: usize) -> Option<&mut FieldNode> {
        self.children.get_mut(index)
    }

    /// The value `reset` restores.
    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// Appends one slot with an empty default.
    pub fn add_field(&mut self) {
        let index = self.children.len();
        let child = self
            .generator
            .instantiate(&self.blueprint.element, None, index);
        self.children.push(child);
        trace!(size = self.children.len(), "array slot added");
        self.generator.notify();
    }

    /// Drops the tail slot unless it is the only one.
    pub fn remove_field(&mut self) {
        if self.children.len() > 1 {
            self.children.pop();
            trace!(size = self.children.len(), "array slot removed");
        }
        self.generator.notify();
    }

    /// Grows with slots defaulted from the array default by index, or
    /// truncates the tail.
    fn resize(&mut self, size: usize) {
        let size = size.max(1);
        if size < self.children.len() {
            self.children.truncate(size);
        }
        while self.children.len() < size {
            let index = self.children.len();
            let child = self.generator.instantiate(
                &self.blueprint.element,
                slot_default(&self.default, index),
                index,
            );
            self.children.push(child);
        }
    }
}

impl Field for ArrayField {
    fn key(&self) -> usize {
        self.key
    }

    fn get_value(&self) -> Value {
        Value::Array(self.children.iter().map(Field::get_value).collect())
    }

    fn set_value(&mut self, value: Value) {
        let items = match value {
            Value::Array(items) => items,
            _ => Vec::new(),
        };
        let previous = self.children.len();
        self.resize(items.len());
        if previous != self.children.len() {
            trace!(from = previous, to = self.children.len(), "array resized");
        }

        let mut items = items.into_iter();
        for child in &mut self.children {
            child.set_value(items.next().unwrap_or(Value::Null));
        }
    }

    fn reset(&mut self) {
        let size = initial_size(&self.default, self.blueprint.initial_length);
        self.children.truncate(size);
        for (index, child) in self.children.iter_mut().enumerate() {
            match slot_default(&self.default, index) {
                // Slots appended by `add_field` were not seeded from the default.
                Some(seed) => {
                    *child = self
                        .generator
                        .instantiate(&self.blueprint.element, Some(seed), index);
                }
                None => child.reset(),
            }
        }
        self.resize(size);
        self.generator.notify();
    }

    fn is_valid(&self) -> bool {
        self.children.iter().all(Field::is_valid)
    }

    fn show_error_messages(&mut self) {
        for child in &mut self.children {
            child.show_error_messages();
        }
    }

    fn set_mode(&mut self, mode: ValidationMode) {
        self.generator.set_mode(mode);
        for child in &mut self.children {
            child.set_mode(mode);
        }
    }
}

fn initial_size(default: &Value, initial_length: Option<usize>) -> usize {
    default
        .as_array()
        .map(Vec::len)
        .filter(|len| *len > 0)
        .or(initial_length)
        .unwrap_or(1)
        .max(1)
}

fn slot_default(default: &Value, index: usize) -> Option<&Value> {
    default
        .as_array()
        .and_then(|items| items.get(index))
        .filter(|v| !v.is_null())
}
