// crates/pin-gate-cli/src/main.rs
// ============================================================================
// Module: Pin Gate CLI Entry Point
// Description: Command dispatcher for pin computation and offline checks.
// Purpose: Let operators compute pins and dry-run pin policy before rollout.
// Dependencies: clap, pin-gate-cli, pin-gate-core, serde_json
// ============================================================================

//! ## Overview
//! `pin-gate` computes pins from PEM files, validates `pin-gate.toml`, and
//! evaluates a saved chain against the configured pins without opening a
//! connection. Reports are written to stdout as JSON; errors go to stderr.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use pin_gate_cli::commands::CliError;
use pin_gate_cli::commands::CliResult;
use pin_gate_cli::commands::command_check;
use pin_gate_cli::commands::command_config_validate;
use pin_gate_cli::commands::command_pin;
use pin_gate_core::Clock;
use pin_gate_core::DecisionOutcome;
use pin_gate_core::SystemClock;
use pin_gate_core::Timestamp;
use serde::Serialize;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "pin-gate", version, disable_help_subcommand = true)]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print certificate and public-key pins for every certificate in a PEM file.
    Pin(PinCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Evaluate a saved chain against the configured pins.
    Check(CheckCommand),
}

/// Arguments for `pin`.
#[derive(Args, Debug)]
struct PinCommand {
    /// PEM file holding one or more certificates.
    pem: PathBuf,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a pin-gate.toml file.
    Validate(ConfigValidateCommand),
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Config file path (defaults to PIN_GATE_CONFIG or ./pin-gate.toml).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `check`.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Host the chain was presented for.
    #[arg(long)]
    host: String,
    /// PEM chain, leaf first.
    #[arg(long, value_name = "PEM")]
    chain: PathBuf,
    /// PEM trust anchors.
    #[arg(long, value_name = "PEM")]
    roots: PathBuf,
    /// Config file path (defaults to PIN_GATE_CONFIG or ./pin-gate.toml).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Evaluation time as RFC 3339 (defaults to now).
    #[arg(long, value_name = "RFC3339")]
    now: Option<String>,
}

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
    match cli.command {
        Commands::Pin(command) => {
            write_json(&command_pin(&command.pem)?)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config {
            command: ConfigCommand::Validate(command),
        } => {
            write_json(&command_config_validate(command.config.as_deref())?)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check(command) => {
            let now = match command.now.as_deref() {
                Some(text) => Timestamp::parse_rfc3339(text)?,
                None => SystemClock.now(),
            };
            let report = command_check(
                &command.host,
                &command.chain,
                &command.roots,
                command.config.as_deref(),
                now,
            )?;
            write_json(&report)?;
            if report.outcome == DecisionOutcome::Block {
                return Ok(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a value to stdout as pretty JSON.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value).map_err(|err| CliError::Output {
        stream: "stdout",
        error: std::io::Error::other(err),
    })?;
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{rendered}").map_err(|error| CliError::Output {
        stream: "stdout",
        error,
    })
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
