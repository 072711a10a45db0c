// crates/cse-cli/src/main.rs
// ============================================================================
// Module: CSE CLI Entry Point
// Description: Command dispatcher for CSE configuration workflows.
// Purpose: Provide a localized CLI for config checking and artifact generation.
// Dependencies: clap, cse-config, serde_json, thiserror.
// ============================================================================

//! ## Overview
//! The CSE CLI wraps the configuration loader and its generated artifacts:
//! `check` validates a `config.yaml` and reports every failure in one pass,
//! `sample` emits the canonical starter file, `schema` prints the JSON
//! schema, and `docs` generates or verifies the configuration reference. All
//! user-facing strings are routed through the i18n catalog to prepare for
//! future localization.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use cse_cli::i18n::Locale;
use cse_cli::i18n::set_locale;
use cse_cli::t;
use cse_config::CseConfig;
use cse_config::SequencePolicy;
use cse_config::ValidationPolicy;
use cse_config::config_docs_markdown;
use cse_config::config_schema;
use cse_config::config_yaml_sample;
use cse_config::verify_config_docs;
use cse_config::write_config_docs;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable for CLI locale selection.
const LANG_ENV: &str = "CSE_LANG";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "cse", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `CSE_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a CSE configuration file.
    Check(CheckCommand),
    /// Emit the canonical sample configuration.
    Sample(SampleCommand),
    /// Emit the configuration JSON schema.
    Schema(SchemaCommand),
    /// Documentation utilities.
    Docs {
        /// Selected docs subcommand.
        #[command(subcommand)]
        command: DocsCommand,
    },
}

/// Arguments for the `check` command.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Optional config file path (defaults to config.yaml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Admit a configuration with an empty `vcs` sequence.
    #[arg(long, action = ArgAction::SetTrue)]
    allow_empty_vcs: bool,
    /// Admit a configuration with an empty `broker.templates` sequence.
    #[arg(long, action = ArgAction::SetTrue)]
    allow_empty_templates: bool,
}

/// Arguments for the `sample` command.
#[derive(Args, Debug)]
struct SampleCommand {
    /// Optional output path; prints to stdout when omitted.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

/// Arguments for the `schema` command.
#[derive(Args, Debug)]
struct SchemaCommand {
    /// Optional output path; prints to stdout when omitted.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

/// Docs subcommands.
#[derive(Subcommand, Debug)]
enum DocsCommand {
    /// Generate the configuration reference documentation.
    Generate(DocsGenerateCommand),
    /// Verify the on-disk documentation matches the generated output.
    Verify(DocsVerifyCommand),
}

/// Arguments for docs generation.
#[derive(Args, Debug)]
struct DocsGenerateCommand {
    /// Optional output path; prints to stdout when omitted.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

/// Arguments for docs verification.
#[derive(Args, Debug)]
struct DocsVerifyCommand {
    /// Optional docs path (defaults to the standard docs location).
    #[arg(long, value_name = "PATH")]
    path: Option<PathBuf>,
}

/// Supported CLI language selections.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English.
    En,
    /// Catalan.
    Ca,
}

impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Ca => Self::Ca,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    if locale != Locale::En {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Check(command) => command_check(&command),
        Commands::Sample(command) => command_sample(&command),
        Commands::Schema(command) => command_schema(&command),
        Commands::Docs {
            command,
        } => command_docs(&command),
    }
}

/// Prints top-level help when no subcommand is given.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Check Command
// ============================================================================

/// Executes the `check` command.
fn command_check(command: &CheckCommand) -> CliResult<ExitCode> {
    let policy = resolve_policy(command.allow_empty_vcs, command.allow_empty_templates);
    let _config = CseConfig::load(command.config.as_deref(), &policy)
        .map_err(|err| CliError::new(t!("check.failed", error = err)))?;
    write_stdout_line(&t!("check.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Maps CLI escape-hatch flags onto a validation policy.
const fn resolve_policy(allow_empty_vcs: bool, allow_empty_templates: bool) -> ValidationPolicy {
    ValidationPolicy {
        empty_vcs: if allow_empty_vcs {
            SequencePolicy::Accept
        } else {
            SequencePolicy::Reject
        },
        empty_templates: if allow_empty_templates {
            SequencePolicy::Accept
        } else {
            SequencePolicy::Reject
        },
    }
}

// ============================================================================
// SECTION: Sample Command
// ============================================================================

/// Executes the `sample` command.
fn command_sample(command: &SampleCommand) -> CliResult<ExitCode> {
    let sample = config_yaml_sample();
    if let Some(path) = command.output.as_deref() {
        if path.exists() {
            return Err(CliError::new(t!("sample.exists", path = path.display())));
        }
        write_text_file(path, &sample)?;
        write_stdout_line(&t!("sample.written", path = path.display()))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    } else {
        write_stdout_bytes(sample.as_bytes())
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Schema Command
// ============================================================================

/// Executes the `schema` command.
fn command_schema(command: &SchemaCommand) -> CliResult<ExitCode> {
    let schema = config_schema();
    let rendered = serde_json::to_string_pretty(&schema)
        .map_err(|err| CliError::new(t!("schema.serialize_failed", error = err)))?;
    if let Some(path) = command.output.as_deref() {
        let mut content = rendered;
        content.push('\n');
        write_text_file(path, &content)?;
        write_stdout_line(&t!("schema.written", path = path.display()))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    } else {
        write_stdout_line(&rendered)
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Docs Commands
// ============================================================================

/// Dispatches docs subcommands.
fn command_docs(command: &DocsCommand) -> CliResult<ExitCode> {
    match command {
        DocsCommand::Generate(command) => command_docs_generate(command),
        DocsCommand::Verify(command) => command_docs_verify(command),
    }
}

/// Executes `docs generate`.
fn command_docs_generate(command: &DocsGenerateCommand) -> CliResult<ExitCode> {
    if let Some(path) = command.output.as_deref() {
        write_config_docs(Some(path))
            .map_err(|err| CliError::new(t!("docs.generate_failed", error = err)))?;
        write_stdout_line(&t!("docs.written", path = path.display()))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    } else {
        let markdown = config_docs_markdown()
            .map_err(|err| CliError::new(t!("docs.generate_failed", error = err)))?;
        write_stdout_bytes(markdown.as_bytes())
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes `docs verify`.
fn command_docs_verify(command: &DocsVerifyCommand) -> CliResult<ExitCode> {
    verify_config_docs(command.path.as_deref())
        .map_err(|err| CliError::new(t!("docs.verify.failed", error = err)))?;
    write_stdout_line(&t!("docs.verify.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Locale Helpers
// ============================================================================

/// Resolves the CLI locale from the flag or environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        });
    }
    Ok(Locale::En)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Writes text content to a file with a localized failure message.
fn write_text_file(path: &Path, content: &str) -> CliResult<()> {
    fs::write(path, content.as_bytes())
        .map_err(|err| CliError::new(t!("file.write_failed", path = path.display(), error = err)))
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
