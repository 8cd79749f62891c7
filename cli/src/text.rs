//! Plain-text rendering of a form tree.

use schema_forms_core::validators::is_truthy;
use schema_forms_engine::{ContainerProps, InputKind, InputProps, Renderer, display_text};

const INDENT: &str = "  ";

/// Renders each node as indented lines.
///
/// Hidden fields produce no output; password values are masked.
#[derive(Debug, Default)]
pub struct TextRenderer;

impl Renderer for TextRenderer {
    type Output = Vec<String>;

    fn input(&mut self, props: InputProps<'_>) -> Vec<String> {
        let shown = match props.kind {
            InputKind::Hidden => return Vec::new(),
            InputKind::Password => "*".repeat(display_text(props.value).chars().count()),
            InputKind::Checkbox if is_truthy(props.value) => "[x]".to_string(),
            InputKind::Checkbox => "[ ]".to_string(),
            InputKind::Text | InputKind::Select => format!("{:?}", display_text(props.value)),
        };

        let mut line = format!("{}: {shown}", props.label);
        if let Some(options) = props.enum_options {
            let options: Vec<String> = options.iter().map(display_text).collect();
            line.push_str(&format!(" ({})", options.join(" | ")));
        }

        let mut lines = vec![line];
        lines.extend(props.error_messages.iter().map(|m| format!("{INDENT}! {m}")));
        lines
    }

    fn object(&mut self, props: ContainerProps<'_>, children: Vec<Vec<String>>) -> Vec<String> {
        let mut lines = Vec::new();
        let nested = !props.path.is_empty();
        if nested || !props.label.is_empty() {
            lines.push(format!("{}:", props.label));
        }
        let indent = if nested { INDENT } else { "" };
        for line in children.into_iter().flatten() {
            lines.push(format!("{indent}{line}"));
        }
        lines
    }

    fn array(&mut self, props: ContainerProps<'_>, children: Vec<Vec<String>>) -> Vec<String> {
        let size = props.size.unwrap_or(children.len());
        let mut lines = vec![format!("{} [{size}]:", props.label)];
        for (index, child) in children.into_iter().enumerate() {
            for (n, line) in child.into_iter().enumerate() {
                let marker = if n == 0 { format!("#{index} ") } else { "   ".to_string() };
                lines.push(format!("{INDENT}{marker}{line}"));
            }
        }
        lines
    }
}
