//! CLI command definitions for contract-validate
//!
//! Provides Clap-based command definitions for validating a data file
//! against a contract and inspecting a contract.

use clap::{Args, Parser, Subcommand};
use contract_dq_core::{
    EmailMatching, MetricsObserver, ObserverSet, ReportAssembler, RowValidator, TracingObserver,
    ValidatorOptions,
};
use std::io;
use std::path::PathBuf;

use super::output::{self, OutputFormat, ValidationOutput};
use super::ExitCode;
use crate::config::{parse_delimiter, LogFormat, RunConfig, RunConfigBuilder};
use crate::error::Result;
use crate::ingest;

/// Contract-first data-quality validator
///
/// Validate delimited data against a declarative contract and report every
/// violation per row.
#[derive(Parser, Debug)]
#[command(name = "contract-validate")]
#[command(about = "Validate tabular data against a data contract", long_about = None)]
#[command(version)]
pub struct ValidateCli {
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except the summary and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log line format on stderr [env: DQ_LOG_FORMAT]
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: ValidateCommands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum ValidateCommands {
    /// Validate a data file against a contract
    ///
    /// Every row is checked against every declared field. Failed rows are
    /// written to the error file; a summary is printed.
    Validate(ValidateArgs),

    /// Parse a contract and print its normalized form
    Inspect {
        /// Path to the contract file (json, yaml, yml or toml)
        #[arg(short, long)]
        schema: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

/// Arguments of the validate command
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Path to the contract file (json, yaml, yml or toml)
    #[arg(short, long)]
    pub schema: PathBuf,

    /// Path to the delimited data file; the first line names the fields
    #[arg(short, long)]
    pub data: PathBuf,

    /// Path of the error report to write
    #[arg(short, long)]
    pub output: PathBuf,

    /// Added to the 1-based data-row position to form row ids [env: DQ_ROW_OFFSET]
    ///
    /// Use 1 to report source-file line numbers for a single header line.
    #[arg(long)]
    pub row_offset: Option<usize>,

    /// Email format matching: anchored or substring [env: DQ_EMAIL_MATCHING]
    #[arg(long, value_parser = parse_email_matching)]
    pub email_matching: Option<EmailMatching>,

    /// Field delimiter, a single character or `tab` [env: DQ_DELIMITER]
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,

    /// Output format for the summary
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Write Prometheus metrics for the run to this file
    #[arg(long)]
    pub metrics_out: Option<PathBuf>,
}

impl ValidateArgs {
    /// Layer the command-line overrides on top of a base config
    pub fn resolve(&self, base: RunConfig) -> RunConfig {
        base.to_builder()
            .maybe(self.row_offset, RunConfigBuilder::row_offset)
            .maybe(self.email_matching, RunConfigBuilder::email_matching)
            .maybe(self.delimiter, RunConfigBuilder::delimiter)
            .build()
    }
}

fn parse_email_matching(s: &str) -> std::result::Result<EmailMatching, String> {
    s.parse()
}

/// Execute the validate command
pub fn execute_validate(args: ValidateArgs, quiet: bool) -> Result<ExitCode> {
    let config = args.resolve(RunConfig::from_env());
    tracing::debug!(?config, "Resolved run configuration");

    let schema = ingest::load_schema(&args.schema)?;
    let dataset = ingest::read_dataset(&args.data, config.delimiter)?;
    ingest::warn_missing_columns(&dataset, &schema);

    let validator = RowValidator::new(schema)
        .with_options(ValidatorOptions::new().with_email_matching(config.email_matching));

    let metrics = match args.metrics_out {
        Some(_) => Some(MetricsObserver::new()?),
        None => None,
    };
    let mut observers = ObserverSet::new().with(&TracingObserver);
    if let Some(metrics) = &metrics {
        observers = observers.with(metrics);
    }

    let report = validator.run(&dataset.records, config.row_offset, &observers);
    let assembler = ReportAssembler::new(&report, &dataset.records);

    output::write_error_report(&args.output, &assembler.failed_rows())?;

    ValidationOutput::from_report(&assembler, &args.output).render(args.format, quiet)?;

    if let (Some(path), Some(metrics)) = (&args.metrics_out, &metrics) {
        output::write_metrics(path, &metrics.gather_text()?)?;
    }

    Ok(ExitCode::from_summary(&report.summary))
}

/// Execute the inspect command
pub fn execute_inspect(schema: PathBuf, format: OutputFormat) -> Result<ExitCode> {
    let parsed = ingest::load_schema(&schema)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    output::render_schema(&mut out, &parsed, &schema, format)?;

    Ok(ExitCode::Success)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validate() {
        let cli = ValidateCli::try_parse_from([
            "contract-validate",
            "-vv",
            "validate",
            "--schema",
            "c.json",
            "--data",
            "d.csv",
            "--output",
            "e.csv",
            "--row-offset",
            "1",
            "--email-matching",
            "substring",
            "--delimiter",
            ";",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let ValidateCommands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.row_offset, Some(1));
        assert_eq!(args.email_matching, Some(EmailMatching::Substring));
        assert_eq!(args.delimiter, Some(b';'));
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = ValidateCli::try_parse_from([
            "contract-validate",
            "inspect",
            "--schema",
            "c.yaml",
            "--quiet",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.log_format, Some(LogFormat::Json));
    }

    #[test]
    fn test_rejects_bad_values() {
        let base = ["contract-validate", "validate", "-s", "c.json", "-d", "d.csv", "-o", "e.csv"];

        let mut args = base.to_vec();
        args.extend(["--delimiter", "::"]);
        assert!(ValidateCli::try_parse_from(args).is_err());

        let mut args = base.to_vec();
        args.extend(["--email-matching", "fuzzy"]);
        assert!(ValidateCli::try_parse_from(args).is_err());

        assert!(ValidateCli::try_parse_from(["contract-validate", "validate"]).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = ValidateCli::try_parse_from([
            "contract-validate",
            "validate",
            "-s",
            "c.json",
            "-d",
            "d.csv",
            "-o",
            "e.csv",
            "--row-offset",
            "3",
        ])
        .unwrap();
        let ValidateCommands::Validate(args) = cli.command else {
            panic!("expected validate");
        };

        let base = RunConfig::builder()
            .row_offset(7)
            .email_matching(EmailMatching::Substring)
            .build();
        let config = args.resolve(base);
        assert_eq!(config.row_offset, 3);
        assert_eq!(config.email_matching, EmailMatching::Substring);
    }
}
