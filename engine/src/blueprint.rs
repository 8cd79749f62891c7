//! Classified, immutable node templates.
//!
//! The generator compiles a schema into blueprints once; every node keeps an
//! `Rc` to its blueprint, and arrays stamp out new slots from theirs without
//! re-classifying the schema.

use std::rc::Rc;

use schema_forms_core::{ScalarKind, Validator};
use serde_json::Value;

use crate::render::InputKind;

#[derive(Debug, Clone)]
pub(crate) enum Blueprint {
    Flat(Rc<FlatBlueprint>),
    Object(Rc<ObjectBlueprint>),
    Array(Rc<ArrayBlueprint>),
}

#[derive(Debug)]
pub(crate) struct FlatBlueprint {
    pub(crate) input: InputKind,
    pub(crate) numeric: bool,
    pub(crate) label: String,
    pub(crate) placeholder: String,
    pub(crate) enum_options: Option<Vec<Value>>,
    pub(crate) validators: Vec<Validator>,
    pub(crate) required: bool,
    pub(crate) default: Option<Value>,
}

impl FlatBlueprint {
    /// Template for a scalar array slot: carries the array's label, nothing
    /// else from the declaration.
    pub(crate) fn element(scalar: ScalarKind, label: &str) -> Self {
        Self {
            input: match scalar {
                ScalarKind::Boolean => InputKind::Checkbox,
                ScalarKind::String | ScalarKind::Number => InputKind::Text,
            },
            numeric: scalar == ScalarKind::Number,
            label: label.to_string(),
            placeholder: label.to_string(),
            enum_options: None,
            validators: Vec::new(),
            required: false,
            default: None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct ObjectBlueprint {
    pub(crate) label: String,
    pub(crate) default: Option<Value>,
    pub(crate) fields: Vec<(String, Blueprint)>,
}

#[derive(Debug)]
pub(crate) struct ArrayBlueprint {
    pub(crate) label: String,
    pub(crate) default: Option<Value>,
    pub(crate) initial_length: Option<usize>,
    pub(crate) element: Blueprint,
}
