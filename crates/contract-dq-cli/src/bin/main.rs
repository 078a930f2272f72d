//! contract-validate
//!
//! # Usage
//!
//! ```bash
//! contract-validate validate --schema contract.json --data data.csv --output errors.csv
//! contract-validate inspect --schema contract.json
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success - every row passed
//! - 1: At least one row failed validation
//! - 3: Invalid input or arguments
//! - 4: File not found or inaccessible
//! - 5: Contract could not be parsed
//! - 10: Internal error

use clap::Parser;
use contract_dq_cli::{init_logging, run_cli, ExitCode, RunConfig, ValidateCli};

fn main() {
    let cli = match ValidateCli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also arrive here
            let code = if e.use_stderr() {
                ExitCode::InvalidInput
            } else {
                ExitCode::Success
            };
            e.print().ok();
            std::process::exit(code.into());
        }
    };

    let log_format = cli
        .log_format
        .unwrap_or_else(|| RunConfig::from_env().log_format);
    init_logging(cli.verbose, cli.quiet, log_format);

    let exit_code = run_cli(cli);
    std::process::exit(exit_code.into());
}
