mod text;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use schema_forms_engine::{FieldErrors, Form};
use schema_forms_loader::{FormDefinition, FormLibrary, load_value};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

use crate::text::TextRenderer;

/// Output format for value trees and reports.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "schema-forms")]
#[command(about = "Check, preview and validate declarative form definitions")]
#[command(version)]
struct Cli {
    /// Log engine activity to stderr (overrides RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Report every schema authoring error in definition files or directories.
    Check(CheckArgs),
    /// Print the default value tree of a form.
    Defaults(DefaultsArgs),
    /// Apply a value file to a form and report validity and field errors.
    Validate(ValidateArgs),
    /// Print a text rendering of a form.
    Render(RenderArgs),
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Definition files, bundles (with --bundle) or directories.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Treat file inputs as bundles of several definitions.
    #[arg(long)]
    bundle: bool,
}

/// Selects one form definition.
#[derive(Debug, Args)]
struct FormSource {
    /// Definition file, bundle file or directory of definitions.
    definition: PathBuf,
    /// Form name, required when `definition` is a bundle or directory.
    #[arg(long)]
    form: Option<String>,
}

#[derive(Debug, Args)]
struct DefaultsArgs {
    #[command(flatten)]
    source: FormSource,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    #[command(flatten)]
    source: FormSource,
    /// JSON or YAML file holding the value to validate.
    #[arg(long)]
    value: PathBuf,
    /// Output format of the report.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct RenderArgs {
    #[command(flatten)]
    source: FormSource,
    /// Optional JSON or YAML value file applied before rendering.
    #[arg(long)]
    value: Option<PathBuf>,
    /// Show every field's error messages, not only those visible in the
    /// form's current validation mode.
    #[arg(long)]
    show_errors: bool,
}

#[derive(Debug, Serialize)]
struct ValidationReport {
    form: String,
    valid: bool,
    value: Value,
    errors: Vec<FieldErrors>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Check(args) => run_check(args),
        Command::Defaults(args) => run_defaults(args),
        Command::Validate(args) => run_validate(args),
        Command::Render(args) => run_render(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let mut definitions = Vec::new();
    for input in &args.inputs {
        if input.is_dir() {
            let library = FormLibrary::from_dir(input)
                .map_err(|err| format!("{}: {err}", input.display()))?;
            definitions.extend(sorted(&library));
        } else if args.bundle {
            let library = FormLibrary::from_bundle(input)
                .map_err(|err| format!("{}: {err}", input.display()))?;
            definitions.extend(sorted(&library));
        } else {
            definitions.push(load_definition(input)?);
        }
    }
    if definitions.is_empty() {
        return Err("no form definitions found".to_string());
    }

    let mut failed = 0usize;
    for definition in &definitions {
        let errors = definition.check();
        if errors.is_empty() {
            println!("ok    {}", definition.name);
            continue;
        }
        failed += 1;
        println!("FAIL  {}", definition.name);
        for err in errors {
            println!("      - {err}");
        }
    }

    println!(
        "Checked {} form(s): {} ok, {failed} with errors.",
        definitions.len(),
        definitions.len() - failed
    );
    if failed > 0 {
        return Err(format!("{failed} form(s) have schema errors"));
    }
    Ok(())
}

fn run_defaults(args: DefaultsArgs) -> Result<(), String> {
    let definition = resolve_definition(&args.source)?;
    let form = build_form(&definition)?;
    print_document(&form.get_value(), args.format)
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let definition = resolve_definition(&args.source)?;
    let mut form = build_form(&definition)?;
    let value = read_value(&args.value)?;

    form.set_value(value);
    form.show_error_messages();
    let valid = form.flush_validity();
    debug!(form = %definition.name, valid, "validated value file");

    let report = ValidationReport {
        form: definition.name.clone(),
        valid,
        value: form.get_value(),
        errors: form.errors(),
    };
    print_document(&report, args.format)?;

    if !valid {
        return Err(format!(
            "form '{}' is invalid ({} field(s) with errors)",
            definition.name,
            report.errors.len()
        ));
    }
    Ok(())
}

fn run_render(args: RenderArgs) -> Result<(), String> {
    let definition = resolve_definition(&args.source)?;
    let mut form = build_form(&definition)?;
    if let Some(path) = &args.value {
        form.set_value(read_value(path)?);
    }
    if args.show_errors {
        form.show_error_messages();
    }

    for line in form.render(&mut TextRenderer) {
        println!("{line}");
    }
    Ok(())
}

fn resolve_definition(source: &FormSource) -> Result<FormDefinition, String> {
    let path = &source.definition;
    let Some(name) = &source.form else {
        if path.is_dir() {
            return Err(format!(
                "{} is a directory; pick a form with --form",
                path.display()
            ));
        }
        return load_definition(path);
    };

    let library = if path.is_dir() {
        FormLibrary::from_dir(path)
    } else {
        FormLibrary::from_bundle(path)
    }
    .map_err(|err| format!("{}: {err}", path.display()))?;

    library.get(name).cloned().ok_or_else(|| {
        format!(
            "no form named '{name}' in {} (available: {})",
            path.display(),
            library.names().join(", ")
        )
    })
}

fn load_definition(path: &Path) -> Result<FormDefinition, String> {
    FormDefinition::load(path).map_err(|err| format!("{}: {err}", path.display()))
}

fn build_form(definition: &FormDefinition) -> Result<Form, String> {
    definition
        .build_form()
        .map_err(|err| format!("form '{}': {err}", definition.name))
}

fn read_value(path: &Path) -> Result<Value, String> {
    load_value(path).map_err(|err| format!("{}: {err}", path.display()))
}

fn sorted(library: &FormLibrary) -> Vec<FormDefinition> {
    library
        .names()
        .into_iter()
        .filter_map(|name| library.get(name).cloned())
        .collect()
}

fn print_document<T: Serialize>(value: &T, format: CliOutputFormat) -> Result<(), String> {
    let output = match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(value).map_err(|e| e.to_string())?,
        CliOutputFormat::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string())?,
    };
    println!("{}", output.trim_end());
    Ok(())
}
