//! Scalar leaf nodes.

use std::rc::Rc;

use schema_forms_core::Validator;
use schema_forms_core::validators::is_truthy;
use serde_json::Value;

use crate::blueprint::FlatBlueprint;
use crate::node::{ChangeNotifier, Field, ValidationMode, empty_value};
use crate::render::InputKind;

/// A leaf holding one scalar value and its validation state.
///
/// The effective validator list is the declared list, then the implicit
/// non-empty check for required fields, then the implicit number check for
/// numeric fields. It is derived on every validation, never stored.
///
/// Hidden fields skip validation entirely: they are always valid and never
/// carry messages, but their value still round-trips.
#[derive(Debug)]
pub struct FlatField {
    key: usize,
    blueprint: Rc<FlatBlueprint>,
    default: Value,
    value: Value,
    error_messages: Vec<String>,
    mode: ValidationMode,
    notifier: ChangeNotifier,
}

impl FlatField {
    pub(crate) fn new(
        key: usize,
        blueprint: Rc<FlatBlueprint>,
        default: Value,
        mode: ValidationMode,
        notifier: ChangeNotifier,
    ) -> Self {
        let mut field = Self {
            key,
            blueprint,
            value: default.clone(),
            default,
            error_messages: Vec::new(),
            mode,
            notifier,
        };
        if mode == ValidationMode::Eager {
            field.error_messages = field.validate(&field.value);
        }
        field
    }

    /// Which widget renders this leaf.
    pub fn input_kind(&self) -> InputKind {
        self.blueprint.input
    }

    /// Display label.
    pub fn label(&self) -> &str {
        &self.blueprint.label
    }

    /// Placeholder text.
    pub fn placeholder(&self) -> &str {
        &self.blueprint.placeholder
    }

    /// Allowed values of a select input.
    pub fn enum_options(&self) -> Option<&[Value]> {
        self.blueprint.enum_options.as_deref()
    }

    /// Current value, borrowed.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Currently visible error messages.
    pub fn error_messages(&self) -> &[String] {
        &self.error_messages
    }

    /// The value `reset` restores.
    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// Current validation mode.
    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Returns `true` for hidden leaves.
    pub fn is_hidden(&self) -> bool {
        self.blueprint.input == InputKind::Hidden
    }

    /// Declared validators followed by the implicit ones.
    pub fn effective_validators(&self) -> Vec<Validator> {
        if self.is_hidden() {
            return Vec::new();
        }
        let mut validators = self.blueprint.validators.clone();
        if self.blueprint.required {
            validators.push(Validator::NonEmpty);
        }
        if self.blueprint.numeric {
            validators.push(Validator::Number);
        }
        validators
    }

    /// Runs the effective validators against `value`.
    pub fn validate(&self, value: &Value) -> Vec<String> {
        self.effective_validators()
            .iter()
            .filter_map(|validator| validator.check(value))
            .collect()
    }

    /// Applies a raw edit coming from the widget.
    ///
    /// Checkboxes toggle the current value and ignore the payload; every
    /// other input stores `raw` as the new value.
    pub fn on_input(&mut self, raw: Value) {
        let next = match self.blueprint.input {
            InputKind::Checkbox => Value::Bool(!is_truthy(&self.value)),
            _ => raw,
        };
        self.set_value(next);
    }
}

impl Field for FlatField {
    fn key(&self) -> usize {
        self.key
    }

    fn get_value(&self) -> Value {
        self.value.clone()
    }

    fn set_value(&mut self, value: Value) {
        self.value = if value.is_null() { empty_value() } else { value };
        self.error_messages = match self.mode {
            ValidationMode::Eager => self.validate(&self.value),
            ValidationMode::Deferred => Vec::new(),
        };
        self.notifier.notify();
    }

    fn reset(&mut self) {
        self.set_value(self.default.clone());
    }

    fn is_valid(&self) -> bool {
        self.validate(&self.value).is_empty()
    }

    fn show_error_messages(&mut self) {
        self.error_messages = self.validate(&self.value);
    }

    fn set_mode(&mut self, mode: ValidationMode) {
        self.mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use schema_forms_core::validators;
    use serde_json::json;

    use super::*;

    fn blueprint(input: InputKind) -> FlatBlueprint {
        FlatBlueprint {
            input,
            numeric: false,
            label: "Name".to_string(),
            placeholder: "Name".to_string(),
            enum_options: None,
            validators: Vec::new(),
            required: false,
            default: None,
        }
    }

    fn field(blueprint: FlatBlueprint, mode: ValidationMode) -> FlatField {
        FlatField::new(0, Rc::new(blueprint), empty_value(), mode, ChangeNotifier::noop())
    }

    #[test]
    fn test_required_empty_is_invalid() {
        let mut bp = blueprint(InputKind::Text);
        bp.required = true;
        bp.validators.push(validators::max_length(10));
        let mut f = field(bp, ValidationMode::Eager);

        assert!(!f.is_valid());
        assert_eq!(f.error_messages(), ["Error: field is required"]);

        f.set_value(json!("Ann"));
        assert!(f.is_valid());
        assert!(f.error_messages().is_empty());
    }

    #[test]
    fn test_messages_follow_effective_order() {
        let mut bp = blueprint(InputKind::Text);
        bp.required = true;
        bp.numeric = true;
        bp.validators.push(validators::min_length(3));
        let mut f = field(bp, ValidationMode::Eager);

        f.set_value(json!("x"));
        assert_eq!(
            f.error_messages(),
            [
                "Error: must be at least 3 characters",
                "Error: value must be numerical"
            ]
        );
        f.set_value(json!(""));
        assert_eq!(
            f.error_messages(),
            [
                "Error: must be at least 3 characters",
                "Error: field is required"
            ]
        );
    }

    #[test]
    fn test_numeric_field_reports_single_message() {
        let mut bp = blueprint(InputKind::Text);
        bp.numeric = true;
        let mut f = field(bp, ValidationMode::Eager);

        f.set_value(json!("abc"));
        assert_eq!(f.error_messages(), ["Error: value must be numerical"]);
        f.set_value(json!("12.5"));
        assert!(f.error_messages().is_empty());
        assert!(f.is_valid());
    }

    #[test]
    fn test_deferred_mode_hides_until_shown() {
        let mut bp = blueprint(InputKind::Text);
        bp.required = true;
        let mut f = field(bp, ValidationMode::Deferred);

        assert!(f.error_messages().is_empty());
        f.set_value(json!(""));
        assert!(f.error_messages().is_empty());
        assert!(!f.is_valid());

        f.show_error_messages();
        assert_eq!(f.error_messages(), ["Error: field is required"]);
    }

    #[test]
    fn test_validates_new_value_not_previous() {
        let mut bp = blueprint(InputKind::Text);
        bp.required = true;
        let mut f = field(bp, ValidationMode::Eager);
        f.set_value(json!("ok"));
        assert!(f.error_messages().is_empty());
        f.set_value(json!(""));
        assert_eq!(f.error_messages().len(), 1);
    }

    #[test]
    fn test_set_value_notifies() {
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let notifier = ChangeNotifier::new(move || counter.set(counter.get() + 1));
        let mut f = FlatField::new(
            0,
            Rc::new(blueprint(InputKind::Text)),
            empty_value(),
            ValidationMode::Eager,
            notifier,
        );
        f.set_value(json!("a"));
        f.reset();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_null_falls_back_to_empty_string() {
        let mut f = field(blueprint(InputKind::Text), ValidationMode::Eager);
        f.set_value(json!("x"));
        f.set_value(Value::Null);
        assert_eq!(f.get_value(), json!(""));
    }

    #[test]
    fn test_round_trip_scalars() {
        let mut f = field(blueprint(InputKind::Text), ValidationMode::Eager);
        for v in [json!("text"), json!(42), json!(-1.5), json!(true)] {
            f.set_value(v.clone());
            assert_eq!(f.get_value(), v);
        }
    }

    #[test]
    fn test_checkbox_toggles() {
        let mut f = field(blueprint(InputKind::Checkbox), ValidationMode::Eager);
        f.on_input(json!("ignored"));
        assert_eq!(f.get_value(), json!(true));
        f.on_input(Value::Null);
        assert_eq!(f.get_value(), json!(false));
    }

    #[test]
    fn test_hidden_is_always_valid() {
        let mut bp = blueprint(InputKind::Hidden);
        bp.required = true;
        bp.numeric = true;
        let mut f = field(bp, ValidationMode::Eager);
        f.set_value(json!("not a number"));
        f.show_error_messages();
        assert!(f.is_valid());
        assert!(f.error_messages().is_empty());
        assert_eq!(f.get_value(), json!("not a number"));
    }

    #[test]
    fn test_reset_restores_default() {
        let mut f = FlatField::new(
            3,
            Rc::new(blueprint(InputKind::Text)),
            json!("start"),
            ValidationMode::Eager,
            ChangeNotifier::noop(),
        );
        f.set_value(json!("changed"));
        f.reset();
        assert_eq!(f.get_value(), json!("start"));
        assert_eq!(f.key(), 3);
    }
}
