//! The rendering collaborator contract.
//!
//! The engine never draws widgets. It walks the tree and hands each node's
//! display state to a [`Renderer`], children first, so containers lay out
//! already-rendered output. Every call carries the node's [`FieldPath`],
//! which the host passes back to [`Form::apply_input`](crate::Form::apply_input)
//! or the array operations when the user edits something.

use serde::Serialize;
use serde_json::Value;

use crate::node::{Field, FieldNode};
use crate::object::ObjectField;
use crate::path::{FieldPath, PathSegment};

/// Widget kind of a flat field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Single-line text (string and number fields).
    Text,
    /// Masked text.
    Password,
    /// Boolean toggle.
    Checkbox,
    /// Closed choice among enum options.
    Select,
    /// Not shown; value carried through.
    Hidden,
}

/// Display state of a flat field.
#[derive(Debug, Clone, Copy)]
pub struct InputProps<'a> {
    /// Where edits to this field are routed back to.
    pub path: &'a FieldPath,
    /// Position within the parent (member order or slot index).
    pub key: usize,
    /// Widget to draw.
    pub kind: InputKind,
    /// Current value.
    pub value: &'a Value,
    /// Messages visible in the current validation mode.
    pub error_messages: &'a [String],
    /// Display label.
    pub label: &'a str,
    /// Hint shown while the value is empty.
    pub placeholder: &'a str,
    /// Choices of a select input.
    pub enum_options: Option<&'a [Value]>,
}

/// Display state of an object or array container.
#[derive(Debug, Clone, Copy)]
pub struct ContainerProps<'a> {
    /// Path of the container itself.
    pub path: &'a FieldPath,
    /// Position within the parent; `0` for the form root.
    pub key: usize,
    /// Display label.
    pub label: &'a str,
    /// Slot count; `None` for objects.
    pub size: Option<usize>,
}

impl ContainerProps<'_> {
    /// Whether a remove trigger should be offered.
    pub fn can_remove(&self) -> bool {
        self.size.is_some_and(|size| size > 1)
    }
}

/// Turns node display state into host output.
pub trait Renderer {
    /// What one rendered node produces.
    type Output;

    /// Renders a flat field.
    fn input(&mut self, props: InputProps<'_>) -> Self::Output;

    /// Lays out an object's rendered members.
    fn object(&mut self, props: ContainerProps<'_>, children: Vec<Self::Output>) -> Self::Output;

    /// Lays out an array's rendered slots, with add/remove triggers.
    fn array(&mut self, props: ContainerProps<'_>, children: Vec<Self::Output>) -> Self::Output;
}

impl FieldNode {
    /// Renders this node and its subtree.
    pub fn render<R: Renderer>(&self, path: &FieldPath, renderer: &mut R) -> R::Output {
        match self {
            Self::Flat(field) => renderer.input(InputProps {
                path,
                key: field.key(),
                kind: field.input_kind(),
                value: field.value(),
                error_messages: field.error_messages(),
                label: field.label(),
                placeholder: field.placeholder(),
                enum_options: field.enum_options(),
            }),
            Self::Object(object) => object.render(path, renderer),
            Self::Array(array) => {
                let children = array
                    .children()
                    .iter()
                    .enumerate()
                    .map(|(index, child)| {
                        child.render(&path.child(PathSegment::Index(index)), renderer)
                    })
                    .collect();
                let props = ContainerProps {
                    path,
                    key: array.key(),
                    label: array.label(),
                    size: Some(array.size()),
                };
                renderer.array(props, children)
            }
        }
    }
}

impl ObjectField {
    /// Renders this object and its members.
    pub fn render<R: Renderer>(&self, path: &FieldPath, renderer: &mut R) -> R::Output {
        let children = self
            .fields()
            .map(|(key, node)| node.render(&path.child(PathSegment::Key(key.to_string())), renderer))
            .collect();
        let props = ContainerProps {
            path,
            key: self.key(),
            label: self.label(),
            size: None,
        };
        renderer.object(props, children)
    }
}

#[cfg(test)]
mod tests {
    use schema_forms_core::{FieldSchema, ObjectSchema, TypeDecl};

    use super::*;
    use crate::generator::Generator;
    use crate::node::{ChangeNotifier, ValidationMode};

    /// Records one line per node in render order.
    #[derive(Default)]
    struct Recorder {
        lines: Vec<String>,
    }

    impl Renderer for Recorder {
        type Output = ();

        fn input(&mut self, props: InputProps<'_>) {
            self.lines
                .push(format!("{} {:?} {}", props.path, props.kind, props.value));
        }

        fn object(&mut self, props: ContainerProps<'_>, _children: Vec<()>) {
            self.lines.push(format!("object {} {}", props.path, props.label));
        }

        fn array(&mut self, props: ContainerProps<'_>, children: Vec<()>) {
            assert_eq!(props.size, Some(children.len()));
            self.lines
                .push(format!("array {} remove={}", props.path, props.can_remove()));
        }
    }

    #[test]
    fn test_render_order_and_paths() {
        let schema = ObjectSchema::new()
            .with_field("name", FieldSchema::string().with_default("Ann"))
            .with_field(
                "tags",
                FieldSchema::array(TypeDecl::string()).with_default(vec!["a", "b"]),
            )
            .with_field("ok", FieldSchema::boolean().with_default(true));
        let generator = Generator::new(ValidationMode::Eager, ChangeNotifier::noop());
        let form = generator.generate_object(&schema, "Form", &Value::Null).unwrap();

        let mut recorder = Recorder::default();
        form.render(&FieldPath::root(), &mut recorder);
        assert_eq!(
            recorder.lines,
            vec![
                r#"name Text "Ann""#,
                r#"tags[0] Text "a""#,
                r#"tags[1] Text "b""#,
                "array tags remove=true",
                "ok Checkbox true",
                "object  Form",
            ]
        );
    }

    #[test]
    fn test_can_remove() {
        let path = FieldPath::root();
        let props = |size| ContainerProps {
            path: &path,
            key: 0,
            label: "",
            size,
        };
        assert!(!props(None).can_remove());
        assert!(!props(Some(1)).can_remove());
        assert!(props(Some(2)).can_remove());
    }
}
