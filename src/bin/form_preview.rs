//! Form Preview Command Line Interface
//!
//! Feeds a form description to a preview session and prints what the preview
//! would show: the rendered form, the validation error, or the submitted payload.
//!
//! # Usage
//!
//! ```bash
//! # Validate a description
//! form_preview validate --file form.json
//!
//! # Render the form as HTML (or the whole preview page)
//! cat form.json | form_preview render --page
//!
//! # Fill in the form and submit it
//! form_preview submit --file form.json --set name=Ada --check plan=Pro
//!
//! # Print the built-in example description
//! form_preview example
//! ```

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use form_preview::{registry, HtmlRenderer, PreviewSession, DEFAULT_DESCRIPTION};

#[derive(Parser)]
#[command(name = "form_preview")]
#[command(version = "0.1.0")]
#[command(about = "Validate, render, and submit declarative JSON form descriptions")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: json, text, or pretty (default)
    #[arg(
        long,
        short = 'o',
        global = true,
        default_value = "pretty",
        value_enum,
        env = "FORM_PREVIEW_FORMAT"
    )]
    format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the validation pipeline over a description
    Validate {
        /// Input file (reads stdin if not provided)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Render the form (HTML, or the rendered structure with --format json)
    Render {
        /// Input file (reads stdin if not provided)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Render the full preview page instead of the bare form
        #[arg(long)]
        page: bool,
    },

    /// Fill in the form and submit it
    Submit {
        /// Input file (reads stdin if not provided)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Set an input or select value: key=value (repeatable)
        #[arg(long = "set", value_parser = parse_assignment)]
        values: Vec<(String, String)>,

        /// Check a radio option: key=option (repeatable)
        #[arg(long = "check", value_parser = parse_assignment)]
        checks: Vec<(String, String)>,
    },

    /// Print the built-in example description
    Example,
}

// =============================================================================
// MAIN
// =============================================================================

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "form_preview=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { file } => cmd_validate(file, cli.format, cli.quiet),
        Commands::Render { file, page } => cmd_render(file, page, cli.format),
        Commands::Submit {
            file,
            values,
            checks,
        } => cmd_submit(file, &values, &checks, cli.format, cli.quiet),
        Commands::Example => {
            println!("{}", DEFAULT_DESCRIPTION);
            Ok(())
        }
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.format == OutputFormat::Json {
                println!("{}", serde_json::json!({ "error": e }));
            } else {
                eprintln!("{}: {}", "error".red().bold(), e);
            }
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

fn cmd_validate(file: Option<PathBuf>, format: OutputFormat, quiet: bool) -> Result<(), String> {
    let session = load_session(file)?;
    let Some(description) = session.description() else {
        return Err(session.error_label().text.clone());
    };

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "form_action": description.form_action,
                "field_count": description.fields.len(),
                "fields": description.fields,
            });
            println!("{}", to_pretty(&output)?);
        }
        OutputFormat::Text | OutputFormat::Pretty => {
            println!(
                "{} Description valid ({} field(s))",
                "OK".green().bold(),
                description.fields.len()
            );
            if !quiet {
                for field in &description.fields {
                    let marker = if session.registry().contains(&field.field_type) {
                        field.field_type.cyan()
                    } else {
                        format!("{} (no renderer)", field.field_type).yellow()
                    };
                    println!("  {} [{}] {}", field.key, marker, field.display_label());
                }
            }
        }
    }

    Ok(())
}

fn cmd_render(file: Option<PathBuf>, page: bool, format: OutputFormat) -> Result<(), String> {
    let session = load_session(file)?;
    let renderer = HtmlRenderer::new().map_err(|e| e.to_string())?;

    if page {
        let html = renderer
            .render_session(&session)
            .map_err(|e| e.to_string())?;
        print!("{}", html);
        return match session.form() {
            Some(_) => Ok(()),
            None => Err(session.error_label().text.clone()),
        };
    }

    let Some(form) = session.form() else {
        return Err(session.error_label().text.clone());
    };

    match format {
        OutputFormat::Json => println!("{}", to_pretty(form)?),
        OutputFormat::Text | OutputFormat::Pretty => {
            print!("{}", renderer.render_form(form).map_err(|e| e.to_string())?)
        }
    }

    Ok(())
}

fn cmd_submit(
    file: Option<PathBuf>,
    values: &[(String, String)],
    checks: &[(String, String)],
    format: OutputFormat,
    quiet: bool,
) -> Result<(), String> {
    let mut session = load_session(file)?;
    let error = session.error_label().text.clone();
    let form = session.form_mut().ok_or(error)?;

    for (key, value) in values {
        form.set_value(key, value).map_err(|e| e.to_string())?;
    }
    for (key, option) in checks {
        form.check(key, option).map_err(|e| e.to_string())?;
    }

    let action = form.action.clone();
    let result = session
        .submit()
        .ok_or_else(|| "No form rendered".to_string())?;

    match format {
        OutputFormat::Json => println!("{}", result.to_pretty_json()),
        OutputFormat::Text | OutputFormat::Pretty => {
            if !quiet {
                println!(
                    "{} Payload for {} (displayed only, not sent):",
                    "OK".green().bold(),
                    action
                );
            }
            println!("{}", session.payload().text);
        }
    }

    Ok(())
}

// =============================================================================
// HELPERS
// =============================================================================

fn load_session(file: Option<PathBuf>) -> Result<PreviewSession, String> {
    let source = read_input(file).map_err(|e| format!("{:#}", e))?;
    Ok(PreviewSession::with_source(registry(), source))
}

fn read_input(file: Option<PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

fn to_pretty<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {}", e))
}
