//! Error types for the contract-validate CLI
//!
//! Every variant is a structural failure that aborts the run. Data-quality
//! violations never surface here.

use contract_dq_core::telemetry::TelemetryError;
use contract_dq_core::SchemaParseError;
use thiserror::Error;

/// Main error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid arguments or configuration
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File missing, unreadable or unwritable
    #[error("File error: {0}")]
    FileError(String),

    /// Ill-formed delimited data
    #[error("CSV error: {0}")]
    Csv(String),

    /// Contract could not be parsed
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaParseError),

    /// Output could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CliError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        CliError::InvalidInput(msg.into())
    }

    /// Create a file error
    pub fn file_error(msg: impl Into<String>) -> Self {
        CliError::FileError(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        CliError::Internal(msg.into())
    }

    /// Check if this is a user-facing error (vs internal)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CliError::InvalidInput(_)
                | CliError::FileError(_)
                | CliError::Csv(_)
                | CliError::Schema(_)
        )
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::FileError(err.to_string())
    }
}

impl From<csv::Error> for CliError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            CliError::FileError(err.to_string())
        } else {
            CliError::Csv(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        CliError::Serialization(err.to_string())
    }
}

impl From<TelemetryError> for CliError {
    fn from(err: TelemetryError) -> Self {
        CliError::Internal(err.to_string())
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
