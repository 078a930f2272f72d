//! CLI module for contract-validate
//!
//! Validates a delimited data file against a contract, or inspects a
//! contract on its own.

pub mod commands;
pub mod output;

pub use commands::{ValidateArgs, ValidateCli, ValidateCommands};
pub use output::{OutputFormat, ValidationOutput};

use contract_dq_core::RunSummary;

use crate::error::{CliError, Result};

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Every row passed, or the command succeeded
    Success = 0,
    /// At least one row failed validation
    ValidationFailed = 1,
    /// Invalid input or arguments
    InvalidInput = 3,
    /// File not found or inaccessible
    FileError = 4,
    /// Contract could not be parsed
    SchemaError = 5,
    /// Internal error
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    /// Determine exit code from a run summary
    pub fn from_summary(summary: &RunSummary) -> Self {
        if summary.all_passed() {
            ExitCode::Success
        } else {
            ExitCode::ValidationFailed
        }
    }

    /// Determine exit code from a fatal error
    pub fn from_error(err: &CliError) -> Self {
        match err {
            CliError::InvalidInput(_) | CliError::Csv(_) => ExitCode::InvalidInput,
            CliError::FileError(_) => ExitCode::FileError,
            CliError::Schema(_) => ExitCode::SchemaError,
            CliError::Serialization(_) | CliError::Internal(_) => ExitCode::InternalError,
        }
    }
}

/// Run the CLI with the given arguments and return the exit code
pub fn run(cli: ValidateCli) -> Result<ExitCode> {
    match cli.command {
        ValidateCommands::Validate(args) => commands::execute_validate(args, cli.quiet),
        ValidateCommands::Inspect { schema, format } => commands::execute_inspect(schema, format),
    }
}
