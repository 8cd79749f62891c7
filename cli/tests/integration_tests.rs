use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::{Value, json};

const BIN: &str = env!("CARGO_BIN_EXE_schema-forms");

/// Helper to create a temp directory that is cleaned up on drop.
struct TempDir {
    inner: tempfile::TempDir,
}

impl TempDir {
    fn new() -> Self {
        Self {
            inner: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    fn path(&self) -> &Path {
        self.inner.path()
    }

    fn join(&self, name: &str) -> PathBuf {
        self.inner.path().join(name)
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.join(name);
        fs::write(&path, contents).expect("failed to write fixture");
        path
    }
}

const SIGNUP_YAML: &str = r#"
name: signup
label: Sign up
schema:
  email:
    type: string
    label: Email
    isRequired: true
  age:
    type: number
    label: Age
  tags:
    type: [string]
    label: Tags
    defaultValue: [news]
"#;

fn run(args: &[&str]) -> Output {
    Command::new(BIN)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run schema-forms")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_accepts_valid_definition() {
    let dir = TempDir::new();
    let file = dir.write("signup.yaml", SIGNUP_YAML);

    let output = run(&["check", path_str(&file)]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("ok    signup"));
}

#[test]
fn check_reports_every_schema_error() {
    let dir = TempDir::new();
    dir.write("good.yaml", SIGNUP_YAML);
    dir.write(
        "bad.json",
        r#"{"schema": {"born": {"type": "date"}, "pair": {"type": ["string", "number"]}}}"#,
    );

    let output = run(&["check", path_str(dir.path())]);
    assert!(!output.status.success());
    let out = stdout(&output);
    assert!(out.contains("FAIL  bad"));
    assert!(out.contains("unsupported type 'date' for field 'born'"));
    assert!(out.contains("array type must declare exactly one element type"));
    assert!(out.contains("ok    signup"));
    assert!(stderr(&output).contains("error: 1 form(s) have schema errors"));
}

#[test]
fn check_rejects_unknown_extension() {
    let dir = TempDir::new();
    let file = dir.write("form.toml", "name = 'x'");

    let output = run(&["check", path_str(&file)]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("unsupported file format"));
}

// ---------------------------------------------------------------------------
// defaults
// ---------------------------------------------------------------------------

#[test]
fn defaults_prints_value_tree() {
    let dir = TempDir::new();
    let file = dir.write("signup.yaml", SIGNUP_YAML);

    let output = run(&["defaults", path_str(&file)]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value, json!({"email": "", "age": "", "tags": ["news"]}));
}

#[test]
fn defaults_selects_form_from_directory() {
    let dir = TempDir::new();
    dir.write("signup.yaml", SIGNUP_YAML);

    let missing = run(&["defaults", path_str(dir.path())]);
    assert!(!missing.status.success());
    assert!(stderr(&missing).contains("--form"));

    let output = run(&["defaults", path_str(dir.path()), "--form", "signup", "--format", "yaml"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("tags:\n- news"));
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

#[test]
fn validate_reports_field_errors() {
    let dir = TempDir::new();
    let file = dir.write("signup.yaml", SIGNUP_YAML);
    let value = dir.write("value.json", r#"{"email": "", "age": "old", "tags": ["a", "b"]}"#);

    let output = run(&["validate", path_str(&file), "--value", path_str(&value)]);
    assert!(!output.status.success());
    let report: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["valid"], json!(false));
    assert_eq!(report["errors"].as_array().unwrap().len(), 2);
    assert_eq!(report["errors"][0]["path"], json!(["email"]));
    assert_eq!(
        report["errors"][1]["messages"],
        json!(["Error: value must be numerical"])
    );
    assert!(stderr(&output).contains("form 'signup' is invalid"));
}

#[test]
fn validate_accepts_yaml_value() {
    let dir = TempDir::new();
    let file = dir.write("signup.yaml", SIGNUP_YAML);
    let value = dir.write("value.yml", "email: ann@example.com\nage: \"30\"\n");

    let output = run(&["validate", path_str(&file), "--value", path_str(&value)]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let report: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["valid"], json!(true));
    assert_eq!(report["value"]["tags"], json!([""]));
}

// ---------------------------------------------------------------------------
// render
// ---------------------------------------------------------------------------

#[test]
fn render_prints_text_tree() {
    let dir = TempDir::new();
    let file = dir.write("signup.yaml", SIGNUP_YAML);

    let output = run(&["render", path_str(&file)]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.starts_with("Sign up:\n"));
    assert!(out.contains("Email: \"\"\n  ! Error: field is required"));
    assert!(out.contains("Tags [1]:\n  #0 Tags: \"news\""));
}

#[test]
fn render_from_bundle() {
    let dir = TempDir::new();
    let bundle = json!({
        "version": "1.0.0",
        "forms": [
            {"name": "one", "schema": {"a": {"type": "string", "label": "A"}}},
            {"name": "two", "schema": {"b": {"type": "boolean", "label": "B"}}}
        ]
    });
    let path = dir.write("forms.json", &bundle.to_string());

    let output = run(&["render", path_str(&path), "--form", "two"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "B: [ ]\n");

    let missing = run(&["render", path_str(&path), "--form", "three"]);
    assert!(!missing.status.success());
    assert!(stderr(&missing).contains("available: one, two"));
}
