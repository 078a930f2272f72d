//! contract-validate
//!
//! Command-line front end for the `contract-dq-core` engine.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Validate a CSV file against a contract
//! contract-validate validate --schema contract.json --data customers.csv --output errors.csv
//!
//! # Report literal file line numbers and export metrics
//! contract-validate validate -s contract.yaml -d customers.csv -o errors.csv \
//!     --row-offset 1 --metrics-out run.prom
//!
//! # Show how a contract was understood
//! contract-validate inspect --schema contract.json --format json
//! ```
//!
//! ## Configuration
//!
//! Flags override `DQ_ROW_OFFSET`, `DQ_EMAIL_MATCHING`, `DQ_DELIMITER` and
//! `DQ_LOG_FORMAT`, which override the built-in defaults. `RUST_LOG`
//! controls log filtering when no `-v` flag is given.

pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;

pub use cli::{ExitCode, OutputFormat, ValidateCli, ValidateCommands};
pub use config::{LogFormat, RunConfig, RunConfigBuilder};
pub use error::{CliError, Result};

use tracing_subscriber::EnvFilter;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Filter used when neither `-v`/`-q` nor `RUST_LOG` is given
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Run the CLI and map any fatal error to its exit code
///
/// # Example
///
/// ```rust,no_run
/// use clap::Parser;
/// use contract_dq_cli::{run_cli, ValidateCli};
///
/// fn main() {
///     let cli = ValidateCli::parse();
///     let exit_code = run_cli(cli);
///     std::process::exit(exit_code.into());
/// }
/// ```
pub fn run_cli(cli: ValidateCli) -> ExitCode {
    match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            if !e.is_user_error() {
                tracing::error!(error = %e, "Internal failure");
            }
            ExitCode::from_error(&e)
        }
    }
}

/// Filter directive for the given verbosity flags
pub fn log_filter(verbose: u8, quiet: bool) -> Option<&'static str> {
    match (quiet, verbose) {
        (true, _) => Some("error"),
        (false, 0) => None,
        (false, 1) => Some("debug"),
        (false, _) => Some("trace"),
    }
}

/// Install the stderr log subscriber
///
/// `-v`/`-q` take precedence over `RUST_LOG`; with neither, `RUST_LOG` is
/// used and falls back to [`DEFAULT_LOG_FILTER`].
pub fn init_logging(verbose: u8, quiet: bool, format: LogFormat) {
    let filter = match log_filter(verbose, quiet) {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}
