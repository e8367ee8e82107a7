//! CLI module for the Lexy compiler front end
//!
//! This module provides the command-line interface for the front end.
//!
//! ## Commands
//!
//! - `check <file>` - Parse, validate and order a document; print diagnostics
//! - `tokens <file>` - Print the tokens of every line
//! - `order <file>` - Print the dependency-sorted declarations (`--json` for machine output)
//! - `tree <file>` - Print the node tree
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use lexy_core::lang::conventions::DEFAULT_INDENT_WIDTH;

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

    pub fn with_code(message: impl Into<String>, code: i32) -> Self {
        Self::new(message, ExitCode(code))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// The Lexy compiler front end
#[derive(Parser, Debug)]
#[command(name = "lexy")]
#[command(version = VERSION)]
#[command(about = "Parse, validate and order Lexy documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Spaces per indentation level
    #[arg(long, global = true, value_name = "N", default_value_t = DEFAULT_INDENT_WIDTH)]
    pub indent_width: usize,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse and validate a document, printing every diagnostic
    Check {
        /// Source file to check
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print the tokens of every line
    Tokens {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print the declarations in dependency order
    Order {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the node tree
    Tree {
        #[arg(value_name = "FILE")]
        file: PathBuf,
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
    if cli.indent_width == 0 {
        return Err(CliError::with_code("Error: --indent-width must be at least 1", 2));
    }
    let options = commands::parser_options(cli.indent_width);
    match cli.command {
        Command::Check { file } => commands::check_file(&file, options),
        Command::Tokens { file } => commands::tokens_file(&file),
        Command::Order { file, json } => commands::order_file(&file, options, json),
        Command::Tree { file } => commands::tree_file(&file, options),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::try_parse_from(["lexy", "check", "tax.lexy"]).unwrap();
        assert!(matches!(cli.command, Command::Check { .. }));
        assert_eq!(cli.indent_width, DEFAULT_INDENT_WIDTH);
    }

    #[test]
    fn test_cli_parse_order_json() {
        let cli = Cli::try_parse_from(["lexy", "order", "tax.lexy", "--json"]).unwrap();
        if let Command::Order { json, file } = cli.command {
            assert!(json);
            assert_eq!(file, PathBuf::from("tax.lexy"));
        } else {
            panic!("Expected Order command");
        }
    }

    #[test]
    fn test_cli_parse_global_indent_width() {
        let cli = Cli::try_parse_from(["lexy", "tree", "tax.lexy", "--indent-width", "4"]).unwrap();
        assert_eq!(cli.indent_width, 4);
        assert!(matches!(cli.command, Command::Tree { .. }));

        let cli = Cli::try_parse_from(["lexy", "--indent-width", "3", "tokens", "tax.lexy"]).unwrap();
        assert_eq!(cli.indent_width, 3);
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["lexy"]).is_err());
        assert!(Cli::try_parse_from(["lexy", "check"]).is_err());
    }

    #[test]
    fn test_zero_indent_width_is_rejected() {
        let cli = Cli::try_parse_from(["lexy", "--indent-width", "0", "check", "tax.lexy"]).unwrap();
        let error = execute(cli).unwrap_err();
        assert_eq!(error.exit_code, ExitCode(2));
    }
}
