//! The form root: owns the tree, caches aggregate validity, gates submit.

use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

use schema_forms_core::ObjectSchema;
use serde_json::Value;
use tracing::{debug, info};

use crate::array::ArrayField;
use crate::error::{FormError, Result};
use crate::generator::Generator;
use crate::node::{ChangeNotifier, Field, FieldErrors, FieldNode, ValidationMode};
use crate::object::ObjectField;
use crate::path::FieldPath;
use crate::render::Renderer;
use crate::schedule::{DEFAULT_DEBOUNCE, ValidityScheduler};

/// Runtime options of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormOptions {
    /// Initial validation mode.
    pub mode: ValidationMode,
    /// Delay between the last change and the validity refresh.
    pub debounce: Duration,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            mode: ValidationMode::Eager,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// Result of [`Form::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The submit callback ran with this value.
    Submitted(Value),
    /// Submission was held back and error messages are now visible.
    Rejected,
}

/// Consumer callback receiving the submitted value.
pub type SubmitHandler = Box<dyn FnMut(&Value)>;

/// A generated form.
///
/// Wraps the top-level object node. Every change anywhere in the tree
/// reschedules one pending validity refresh; [`poll`](Self::poll) runs it
/// once due and [`flush_validity`](Self::flush_validity) runs it at once.
///
/// # Examples
///
/// ```
/// use schema_forms_core::{FieldSchema, ObjectSchema};
/// use schema_forms_engine::{Form, SubmitOutcome};
/// use serde_json::json;
///
/// let schema = ObjectSchema::new().with_field("name", FieldSchema::string().required());
/// let mut form = Form::builder(&schema).validate_on_submit(true).build().unwrap();
///
/// assert_eq!(form.submit(), SubmitOutcome::Rejected);
/// assert_eq!(form.errors()[0].messages, ["Error: field is required"]);
///
/// form.set_value(json!({"name": "Ann"}));
/// assert_eq!(form.submit(), SubmitOutcome::Submitted(json!({"name": "Ann"})));
/// ```
pub struct Form {
    root: ObjectField,
    mode: ValidationMode,
    scheduler: Rc<ValidityScheduler>,
    cached_validity: bool,
    on_submit: Option<SubmitHandler>,
}

impl Form {
    /// Starts building a form for `schema`.
    pub fn builder(schema: &ObjectSchema) -> FormBuilder<'_> {
        FormBuilder::new(schema)
    }

    /// Builds a form with no default value, label or submit callback.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Schema`] if the schema does not compile.
    pub fn new(schema: &ObjectSchema, options: FormOptions) -> Result<Self> {
        Self::builder(schema).options(options).build()
    }

    /// The root object node.
    pub fn root(&self) -> &ObjectField {
        &self.root
    }

    /// Current validation mode.
    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Current value of the whole tree.
    pub fn get_value(&self) -> Value {
        self.root.get_value()
    }

    /// Replaces the value of the whole tree.
    pub fn set_value(&mut self, value: Value) {
        self.root.set_value(value);
    }

    /// Restores every declared default.
    pub fn reset(&mut self) {
        self.root.reset();
    }

    /// Validates the whole tree now.
    pub fn is_valid(&self) -> bool {
        self.root.is_valid()
    }

    /// Surfaces error messages on every leaf.
    pub fn show_error_messages(&mut self) {
        self.root.show_error_messages();
    }

    /// Aggregate validity as of the last refresh; may lag behind edits.
    pub fn cached_validity(&self) -> bool {
        self.cached_validity
    }

    /// Whether a pending refresh is waiting.
    pub fn has_pending_refresh(&self) -> bool {
        self.scheduler.pending().is_some()
    }

    /// Runs the pending validity refresh if it is due at `now`.
    ///
    /// Returns `true` when a refresh ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.scheduler.take_due(now).is_none() {
            return false;
        }
        self.refresh_validity();
        true
    }

    /// Drops any pending refresh and recomputes validity at once.
    pub fn flush_validity(&mut self) -> bool {
        self.scheduler.cancel();
        self.refresh_validity();
        self.cached_validity
    }

    /// Whether a submit trigger should be enabled.
    ///
    /// Always `true` while deferred, so the first failing submit can reveal
    /// the messages; otherwise the cached validity.
    pub fn can_submit(&self) -> bool {
        match self.mode {
            ValidationMode::Deferred => true,
            ValidationMode::Eager => self.cached_validity,
        }
    }

    /// Submits the form.
    ///
    /// While deferred, an invalid form is not submitted: the form flips to
    /// eager mode for good and every leaf shows its messages. Otherwise the
    /// submit callback, if any, receives the current value.
    pub fn submit(&mut self) -> SubmitOutcome {
        let valid = self.flush_validity();
        if self.mode == ValidationMode::Deferred && !valid {
            self.mode = ValidationMode::Eager;
            self.root.set_mode(ValidationMode::Eager);
            self.root.show_error_messages();
            info!("submit rejected, switching to eager validation");
            return SubmitOutcome::Rejected;
        }

        let value = self.get_value();
        if let Some(handler) = self.on_submit.as_mut() {
            handler(&value);
        }
        debug!(valid, "form submitted");
        SubmitOutcome::Submitted(value)
    }

    /// Node at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::FieldNotFound`] if no node lives there.
    pub fn field(&self, path: &FieldPath) -> Result<&FieldNode> {
        self.root
            .find(path.segments())
            .ok_or_else(|| FormError::FieldNotFound(path.to_string()))
    }

    /// Node at `path`, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::FieldNotFound`] if no node lives there.
    pub fn field_mut(&mut self, path: &FieldPath) -> Result<&mut FieldNode> {
        self.root
            .find_mut(path.segments())
            .ok_or_else(|| FormError::FieldNotFound(path.to_string()))
    }

    /// Array node at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::FieldNotFound`] or [`FormError::NotAnArray`].
    pub fn array_mut(&mut self, path: &FieldPath) -> Result<&mut ArrayField> {
        self.field_mut(path)?
            .as_array_mut()
            .ok_or_else(|| FormError::NotAnArray(path.to_string()))
    }

    /// Appends one slot to the array at `path`.
    ///
    /// # Errors
    ///
    /// See [`array_mut`](Self::array_mut).
    pub fn add_field(&mut self, path: &FieldPath) -> Result<()> {
        self.array_mut(path)?.add_field();
        Ok(())
    }

    /// Drops the tail slot of the array at `path`.
    ///
    /// # Errors
    ///
    /// See [`array_mut`](Self::array_mut).
    pub fn remove_field(&mut self, path: &FieldPath) -> Result<()> {
        self.array_mut(path)?.remove_field();
        Ok(())
    }

    /// Routes a raw widget edit to the flat field at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::FieldNotFound`], or [`FormError::NotAnInput`]
    /// when the path names a composite node.
    pub fn apply_input(&mut self, path: &FieldPath, raw: Value) -> Result<()> {
        self.field_mut(path)?
            .as_flat_mut()
            .ok_or_else(|| FormError::NotAnInput(path.to_string()))?
            .on_input(raw);
        Ok(())
    }

    /// Visible error messages of every leaf, in tree order.
    pub fn errors(&self) -> Vec<FieldErrors> {
        let mut out = Vec::new();
        self.root.collect_errors(&FieldPath::root(), &mut out);
        out
    }

    /// Renders the whole tree.
    pub fn render<R: Renderer>(&self, renderer: &mut R) -> R::Output {
        self.root.render(&FieldPath::root(), renderer)
    }

    fn refresh_validity(&mut self) {
        let valid = self.root.is_valid();
        if valid != self.cached_validity {
            debug!(valid, "form validity changed");
        }
        self.cached_validity = valid;
    }
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("root", &self.root)
            .field("mode", &self.mode)
            .field("scheduler", &self.scheduler)
            .field("cached_validity", &self.cached_validity)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Form`].
pub struct FormBuilder<'a> {
    schema: &'a ObjectSchema,
    default: Value,
    label: String,
    options: FormOptions,
    on_submit: Option<SubmitHandler>,
}

impl<'a> FormBuilder<'a> {
    fn new(schema: &'a ObjectSchema) -> Self {
        Self {
            schema,
            default: Value::Null,
            label: String::new(),
            options: FormOptions::default(),
            on_submit: None,
        }
    }

    /// Top-level default mapping, consulted for members without their own.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = value;
        self
    }

    /// Label of the root object.
    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// Hides error messages until the first failed submit.
    pub fn validate_on_submit(mut self, enabled: bool) -> Self {
        self.options.mode = ValidationMode::from_validate_on_submit(enabled);
        self
    }

    /// Validity refresh delay.
    pub fn debounce(mut self, delay: Duration) -> Self {
        self.options.debounce = delay;
        self
    }

    /// Replaces all options at once.
    pub fn options(mut self, options: FormOptions) -> Self {
        self.options = options;
        self
    }

    /// Consumer callback for successful submits.
    pub fn on_submit(mut self, handler: impl FnMut(&Value) + 'static) -> Self {
        self.on_submit = Some(Box::new(handler));
        self
    }

    /// Compiles the schema and builds the tree.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Schema`] if the schema does not compile.
    pub fn build(self) -> Result<Form> {
        let scheduler = Rc::new(ValidityScheduler::new(self.options.debounce));
        let notifier = {
            let scheduler = Rc::clone(&scheduler);
            ChangeNotifier::new(move || {
                scheduler.schedule();
            })
        };
        let generator = Generator::new(self.options.mode, notifier);
        let root = generator.generate_object(self.schema, &self.label, &self.default)?;
        let cached_validity = root.is_valid();
        debug!(
            fields = root.len(),
            mode = ?self.options.mode,
            valid = cached_validity,
            "form built"
        );
        Ok(Form {
            root,
            mode: self.options.mode,
            scheduler,
            cached_validity,
            on_submit: self.on_submit,
        })
    }
}

#[cfg(test)]
mod tests {
    use schema_forms_core::{FieldSchema, TypeDecl};
    use serde_json::json;

    use super::*;

    fn schema() -> ObjectSchema {
        ObjectSchema::new()
            .with_field("name", FieldSchema::string().required())
            .with_field("tags", FieldSchema::array(TypeDecl::string()))
    }

    #[test]
    fn test_debounced_refresh() {
        let mut form = Form::builder(&schema()).build().unwrap();
        assert!(!form.cached_validity());

        form.set_value(json!({"name": "Ann"}));
        assert!(form.has_pending_refresh());
        assert!(!form.cached_validity());
        assert!(form.is_valid());

        assert!(form.poll(Instant::now() + Duration::from_secs(1)));
        assert!(form.cached_validity());
        assert!(!form.has_pending_refresh());
    }

    #[test]
    fn test_can_submit() {
        let mut deferred = Form::builder(&schema()).validate_on_submit(true).build().unwrap();
        assert!(deferred.can_submit());
        deferred.submit();
        assert_eq!(deferred.mode(), ValidationMode::Eager);
        assert!(!deferred.can_submit());

        let mut eager = Form::builder(&schema()).build().unwrap();
        assert!(!eager.can_submit());
        eager.set_value(json!({"name": "x"}));
        eager.flush_validity();
        assert!(eager.can_submit());
    }

    #[test]
    fn test_addressing_errors() {
        let mut form = Form::builder(&schema()).build().unwrap();
        let name = FieldPath::root().key("name");
        let missing = FieldPath::root().key("nope");

        assert_eq!(
            form.add_field(&name),
            Err(FormError::NotAnArray("name".to_string()))
        );
        assert_eq!(
            form.add_field(&missing),
            Err(FormError::FieldNotFound("nope".to_string()))
        );
        assert_eq!(
            form.apply_input(&FieldPath::root().key("tags"), json!("x")),
            Err(FormError::NotAnInput("tags".to_string()))
        );
        assert!(form.field(&FieldPath::root().key("tags").index(0)).is_ok());
        assert!(form.field(&FieldPath::root().key("tags").index(1)).is_err());
    }

    #[test]
    fn test_apply_input() {
        let mut form = Form::builder(&schema()).build().unwrap();
        form.apply_input(&FieldPath::root().key("tags").index(0), json!("rust"))
            .unwrap();
        assert_eq!(form.get_value()["tags"], json!(["rust"]));
    }

    #[test]
    fn test_label_and_default() {
        let form = Form::builder(&schema())
            .label("Profile")
            .default_value(json!({"name": "Bo", "tags": ["a"]}))
            .build()
            .unwrap();
        assert_eq!(form.root().label(), "Profile");
        assert_eq!(form.get_value(), json!({"name": "Bo", "tags": ["a"]}));
        assert!(form.cached_validity());
    }
}
