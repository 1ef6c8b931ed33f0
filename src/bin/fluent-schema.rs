//! Fluent Schema CLI
//!
//! Command-line interface for composing compiled schemas and validating
//! payloads against them.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use fluent_schema::{
    assert_valid, lint, load_branch, load_schema, one_of, FileStatus, Schema, Severity,
    ToJsonSchema, ValidateError, ValidateOptions,
};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "fluent-schema")]
#[command(about = "Compose JSON Schema (Draft 7) object schemas and validate payloads")]
#[command(version)]
struct Cli {
    /// Only log errors
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log debug output
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct OutputArgs {
    /// Output file (stdout if not specified)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a payload against a schema
    Validate {
        /// Payload file to validate
        payload: PathBuf,

        /// Schema file
        #[arg(long)]
        schema: PathBuf,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,

        /// Strict mode: reject unknown fields (default: false)
        #[arg(long, default_value_t = false, action = clap::ArgAction::Set)]
        strict: bool,

        /// Enforce `format` keywords
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        formats: bool,

        /// Report every failure instead of the first
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        all_errors: bool,
    },

    /// Keep only the named fields of an object schema
    Pick {
        schema: PathBuf,

        /// Field to keep (repeatable)
        #[arg(long = "field", short, required = true)]
        fields: Vec<String>,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Remove the named fields from an object schema
    Omit {
        schema: PathBuf,

        /// Field to remove (repeatable)
        #[arg(long = "field", short, required = true)]
        fields: Vec<String>,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Merge OTHER into BASE (OTHER wins on collisions)
    Extend {
        base: PathBuf,
        other: PathBuf,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Combine schemas so exactly one must match
    OneOf {
        #[arg(required = true)]
        schemas: Vec<PathBuf>,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Lint schema files (required fields, nullable shape, syntax)
    Lint {
        /// File or directory to lint
        path: PathBuf,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let result = match cli.command {
        Commands::Validate {
            payload,
            schema,
            json,
            strict,
            formats,
            all_errors,
        } => {
            let options = ValidateOptions::new()
                .strict(strict)
                .validate_formats(formats)
                .all_errors(all_errors);
            run_validate(&payload, &schema, json, &options)
        }
        Commands::Pick {
            schema,
            fields,
            out,
        } => run_select(&schema, &fields, true, &out),
        Commands::Omit {
            schema,
            fields,
            out,
        } => run_select(&schema, &fields, false, &out),
        Commands::Extend { base, other, out } => run_extend(&base, &other, &out),
        Commands::OneOf { schemas, out } => run_one_of(&schemas, &out),
        Commands::Lint {
            path,
            format,
            strict,
        } => run_lint(&path, &format, strict, cli.quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_tracing(quiet: bool, verbose: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("FLUENT_SCHEMA_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }
}

fn run_validate(
    payload_path: &Path,
    schema_path: &Path,
    json_output: bool,
    options: &ValidateOptions,
) -> Result<(), u8> {
    let payload = load_schema(payload_path).map_err(|e| {
        report_error(json_output, &format!("loading payload: {}", e));
        e.exit_code() as u8
    })?;

    let schema = load_schema(schema_path).map_err(|e| {
        report_error(json_output, &format!("loading schema: {}", e));
        e.exit_code() as u8
    })?;

    match assert_valid(&payload, &schema, options) {
        Ok(()) => {
            if json_output {
                println!(r#"{{"valid":true}}"#);
            } else {
                println!("Valid");
            }
            Ok(())
        }
        Err(ValidateError::Invalid { errors }) => {
            if json_output {
                let output = serde_json::json!({
                    "valid": false,
                    "errors": errors
                });
                println!("{}", output);
            } else {
                eprintln!("Validation failed:");
                for error in errors {
                    eprintln!("  {}", error);
                }
            }
            Err(1)
        }
        Err(e) => {
            report_error(json_output, &e.to_string());
            Err(e.exit_code() as u8)
        }
    }
}

/// Output an error message in plain text or JSON format.
fn report_error(json_output: bool, msg: &str) {
    if json_output {
        println!("{}", serde_json::json!({ "valid": false, "error": msg }));
    } else {
        eprintln!("Error: {}", msg);
    }
}

fn run_select(path: &Path, fields: &[String], keep: bool, out: &OutputArgs) -> Result<(), u8> {
    let schema = load_object_schema(path)?;
    let names: Vec<&str> = fields.iter().map(String::as_str).collect();

    let selected = if keep {
        schema.try_pick(&names)
    } else {
        schema.try_omit(&names)
    }
    .map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    write_output(&selected.to_json_schema(), out)
}

fn run_extend(base: &Path, other: &Path, out: &OutputArgs) -> Result<(), u8> {
    let base = load_object_schema(base)?;
    let other = load_object_schema(other)?;
    write_output(&base.extend(&other).to_json_schema(), out)
}

fn run_one_of(paths: &[PathBuf], out: &OutputArgs) -> Result<(), u8> {
    let branches = paths
        .iter()
        .map(|path| {
            load_branch(path).map_err(|e| {
                eprintln!("Error: {}: {}", path.display(), e);
                e.exit_code() as u8
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let combined = one_of(branches).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    write_output(&combined.to_json_schema(), out)
}

fn load_object_schema(path: &Path) -> Result<Schema, u8> {
    let document = load_schema(path).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    Schema::from_json_schema(&document).map_err(|e| {
        eprintln!("Error: {}: {}", path.display(), e);
        e.exit_code() as u8
    })
}

fn write_output(value: &Value, out: &OutputArgs) -> Result<(), u8> {
    let json_output = if out.pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match &out.output {
        Some(path) => {
            std::fs::write(path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn run_lint(path: &Path, format: &str, strict: bool, quiet: bool) -> Result<(), u8> {
    if !path.exists() {
        eprintln!("Error: path not found: {}", path.display());
        return Err(2);
    }

    let result = lint(path, strict);

    if format == "json" {
        let text = serde_json::to_string_pretty(&result).map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?;
        println!("{}", text);
    } else {
        if !quiet {
            println!("Linting {} ...\n", path.display());
        }

        for file_result in &result.results {
            let status_icon = match file_result.status {
                FileStatus::Ok => "\x1b[32m✓\x1b[0m",
                FileStatus::Warning => "\x1b[33m⚠\x1b[0m",
                FileStatus::Error => "\x1b[31m✗\x1b[0m",
            };

            if !quiet || file_result.status != FileStatus::Ok {
                println!("  {} {}", status_icon, file_result.file.display());
            }

            for diag in &file_result.diagnostics {
                let (color, label) = match diag.severity {
                    Severity::Error => ("\x1b[31m", "error"),
                    Severity::Warning => ("\x1b[33m", "warning"),
                };
                if !quiet || diag.severity == Severity::Error {
                    println!(
                        "    {}{}[{}]\x1b[0m: {} - {}",
                        color, label, diag.code, diag.path, diag.message
                    );
                }
            }
        }

        println!();
        if result.is_ok() && (!strict || result.warnings == 0) {
            println!(
                "\x1b[32m✓ {} files checked, all passed\x1b[0m",
                result.files_checked
            );
        } else {
            println!(
                "\x1b[31m✗ {} files checked: {} passed, {} failed ({} errors, {} warnings)\x1b[0m",
                result.files_checked, result.passed, result.failed, result.errors, result.warnings
            );
        }
    }

    if result.is_ok() && (!strict || result.warnings == 0) {
        Ok(())
    } else {
        Err(1)
    }
}
