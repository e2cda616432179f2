//! CLI module for the pairtest harness
//!
//! ## Commands
//!
//! - `demo` - Run the bundled demonstration scenarios
//! - `demo --list` - List the scenarios
//! - `demo --scenario <NAME>` - Run a single scenario
//!
//! ## Modules
//!
//! - `demos` - Scenario definitions and the runner
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod demos;

use std::fmt;
use std::io::{self, Write};
use std::panic;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::compare::Unavailable;
use crate::config::HarnessConfig;
use crate::errors::HarnessError;
use crate::harness::Harness;
use crate::raise::is_raised;
use crate::report::ConsoleSink;

use demos::Scenario;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<HarnessError> for CliError {
    fn from(err: HarnessError) -> Self {
        // miette renders the diagnostic code and help alongside the message.
        let report = miette::Report::new(err);
        Self::failure(format!("{report:?}"))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// In-process micro test harness
#[derive(Parser, Debug)]
#[command(name = "pairtest")]
#[command(version = VERSION)]
#[command(about = "Pair functions with <name>_test functions and report the results", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the bundled demonstration scenarios
    Demo {
        /// List the available scenarios and exit
        #[arg(long, conflicts_with = "scenario")]
        list: bool,
        /// Run a single scenario by name
        #[arg(short, long, value_name = "NAME")]
        scenario: Option<String>,
        /// Behave as if DISABLE_TESTING were set
        #[arg(long)]
        disable: bool,
        /// Run without a numeric comparator
        #[arg(long = "no-numeric")]
        no_numeric: bool,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Demo {
            list,
            scenario,
            disable,
            no_numeric,
        } => {
            if list {
                return list_scenarios(&mut io::stdout());
            }
            let config = HarnessConfig::from_env();
            let config = if disable { config.with_disabled(true) } else { config };
            execute_demo(config, scenario.as_deref(), no_numeric)
        }
    }
}

/// Handle the `demo` subcommand.
fn execute_demo(config: HarnessConfig, scenario: Option<&str>, no_numeric: bool) -> CliResult<ExitCode> {
    let selected = match scenario {
        Some(name) => vec![Scenario::from_name(name).ok_or_else(|| unknown_scenario(name))?],
        None => Scenario::ALL.to_vec(),
    };

    let mut harness = Harness::with_sink(config, ConsoleSink::stdout());
    if no_numeric {
        harness = harness.with_comparator(Unavailable);
    }

    tracing::info!(scenarios = selected.len(), "running demo");
    let previous = quiet_raise_hook();
    let outcome = selected
        .into_iter()
        .try_for_each(|scenario| demos::run_scenario(&mut harness, scenario));
    panic::set_hook(previous);
    outcome?;
    Ok(ExitCode::SUCCESS)
}

/// Install a panic hook that stays silent for raised errors and forwards other panics to the current hook.
///
/// Returns the replaced hook so the caller can restore it.
fn quiet_raise_hook() -> Box<dyn Fn(&panic::PanicHookInfo<'_>) + Sync + Send + 'static> {
    let previous: Arc<dyn Fn(&panic::PanicHookInfo<'_>) + Sync + Send> = Arc::from(panic::take_hook());
    let forward = Arc::clone(&previous);
    panic::set_hook(Box::new(move |info: &panic::PanicHookInfo<'_>| {
        if !is_raised(info.payload()) {
            forward(info);
        }
    }));
    Box::new(move |info: &panic::PanicHookInfo<'_>| previous(info))
}

fn list_scenarios(out: &mut impl Write) -> CliResult<ExitCode> {
    for scenario in Scenario::ALL {
        writeln!(out, "{:<10} {}", scenario.name(), scenario.description())
            .map_err(|e| CliError::failure(format!("Error writing scenario list: {e}")))?;
    }
    Ok(ExitCode::SUCCESS)
}

fn unknown_scenario(name: &str) -> CliError {
    let known: Vec<&str> = Scenario::ALL.iter().map(|s| s.name()).collect();
    CliError::failure(format!(
        "Error: unknown scenario '{name}' (expected one of: {})",
        known.join(", ")
    ))
}

// ============================================================================
// Tests
// ============================================================================
