//! Output formatting for the contract-validate CLI
//!
//! Console output comes in table, JSON and YAML flavours. The error report
//! is always a CSV file with `row,error,data` columns.

use clap::ValueEnum;
use colored::Colorize;
use contract_dq_core::engine::rules::bounds::NumericBounds;
use contract_dq_core::report::format_percent;
use contract_dq_core::{FailedRow, ReportAssembler, Schema};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use uuid::Uuid;

use crate::error::{CliError, Result};

/// Output format options for CLI results
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable table format with colors
    #[default]
    Table,
    /// JSON format for machine processing
    Json,
    /// YAML format
    Yaml,
}

/// Failed row as shown on the console
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedRowOutput {
    pub row: usize,
    pub errors: Vec<String>,
}

/// Summary of a validation run for rendering
#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutput {
    pub run_id: Uuid,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Failed share in percent, rounded to 2 decimals; null for empty input
    pub failure_rate_percent: Option<f64>,
    pub error_file: String,
    pub duration_ms: u64,
    pub failed_rows: Vec<FailedRowOutput>,
}

impl ValidationOutput {
    /// Create output from an assembled report
    pub fn from_report(assembler: &ReportAssembler<'_>, error_file: &Path) -> Self {
        let report = assembler.report();
        let summary = assembler.summary();

        let failed_rows = report
            .failed_rows()
            .map(|result| FailedRowOutput {
                row: result.row,
                errors: result.messages(),
            })
            .collect();

        Self {
            run_id: report.run_id,
            total: summary.total,
            passed: summary.passed,
            failed: summary.failed,
            failure_rate_percent: summary.failure_rate_percent(),
            error_file: error_file.display().to_string(),
            duration_ms: report.duration_ms,
            failed_rows,
        }
    }

    /// Render to stdout
    pub fn render(&self, format: OutputFormat, quiet: bool) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.render_to(&mut out, format, quiet)
    }

    /// Render in the specified format
    pub fn render_to<W: Write>(&self, out: &mut W, format: OutputFormat, quiet: bool) -> Result<()> {
        match format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(self)?;
                writeln!(out, "{}", json).ok();
            }
            OutputFormat::Yaml => {
                let yaml = serde_yaml::to_string(self)?;
                write!(out, "{}", yaml).ok();
            }
            OutputFormat::Table => self.render_table(out, quiet),
        }
        out.flush().ok();
        Ok(())
    }

    fn render_table<W: Write>(&self, out: &mut W, quiet: bool) {
        if !quiet {
            if self.failed_rows.is_empty() {
                if self.total > 0 {
                    writeln!(out, "{}", "All records passed validation.".green()).ok();
                }
            } else {
                writeln!(out, "{}", "Validation Errors Found:".red().bold()).ok();
                for failed in &self.failed_rows {
                    writeln!(out, "Row {}:", failed.row).ok();
                    for error in &failed.errors {
                        writeln!(out, "  - {}", error).ok();
                    }
                }
            }
            writeln!(out).ok();
        }

        let heading = if self.failed == 0 {
            "Validation Summary:".green().bold()
        } else {
            "Validation Summary:".yellow().bold()
        };
        writeln!(out, "{}", heading).ok();
        writeln!(out, "   Total records: {}", self.total).ok();
        writeln!(out, "   Passed: {}", self.passed).ok();
        writeln!(out, "   Failed: {}", self.failed).ok();
        match self.failure_rate_percent {
            Some(pct) => writeln!(out, "   Failure rate: {}", format_percent(pct)).ok(),
            None => writeln!(out, "   No data found.").ok(),
        };

        if !quiet {
            writeln!(out, "   Errors written to {}", self.error_file.dimmed()).ok();
        }
    }
}

#[derive(Serialize)]
struct ErrorLine<'a> {
    row: usize,
    error: &'a str,
    data: String,
}

/// Write the error report CSV; a header-only file when nothing failed
pub fn write_error_report(path: &Path, failed_rows: &[FailedRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        CliError::file_error(format!(
            "Failed to write error file '{}': {}",
            path.display(),
            e
        ))
    })?;

    if failed_rows.is_empty() {
        writer.write_record(["row", "error", "data"])?;
    }

    for failed in failed_rows {
        writer.serialize(ErrorLine {
            row: failed.row,
            error: &failed.error,
            data: serde_json::to_string(&failed.data)?,
        })?;
    }

    writer.flush()?;
    tracing::debug!(path = %path.display(), rows = failed_rows.len(), "Wrote error report");
    Ok(())
}

/// Write a Prometheus text exposition to a file
pub fn write_metrics(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).map_err(|e| {
        CliError::file_error(format!(
            "Failed to write metrics file '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Render a parsed schema
pub fn render_schema<W: Write>(
    out: &mut W,
    schema: &Schema,
    source: &Path,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(schema)?).ok();
        }
        OutputFormat::Yaml => {
            write!(out, "{}", serde_yaml::to_string(schema)?).ok();
        }
        OutputFormat::Table => print_schema_table(out, schema, source),
    }
    out.flush().ok();
    Ok(())
}

fn print_schema_table<W: Write>(out: &mut W, schema: &Schema, source: &Path) {
    writeln!(
        out,
        "{}",
        format!("Contract: {}", source.display()).green().bold()
    )
    .ok();
    writeln!(out, "  Dialect: {}", schema.dialect).ok();
    writeln!(out, "  Fields: {}", schema.len()).ok();
    writeln!(out).ok();

    for field in schema.fields() {
        let mut notes = Vec::new();
        if field.required {
            notes.push("required".red().to_string());
        }
        if field.unique {
            notes.push("unique".magenta().to_string());
        }
        if let Some(format) = field.format {
            notes.push(format!("format={}", format));
        }
        if field.has_range() {
            notes.push(format!("range={}", NumericBounds::of(field).describe()));
        }
        if let Some(allowed) = &field.allowed_values {
            notes.push(format!("allowed=[{}]", allowed.join(", ")));
        }

        writeln!(
            out,
            "  {} {}: {} {}",
            "-".blue(),
            field.name.bold(),
            field.field_type.to_string().cyan(),
            notes.join(" ")
        )
        .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contract_dq_core::{NoopObserver, Record, RowValidator};

    fn sample() -> (Vec<Record>, Schema) {
        let schema = Schema::from_json_str(
            r#"{"columns": {"age": {"type": "integer", "required": true, "min": 0, "max": 120}}}"#,
        )
        .unwrap();
        let records = vec![
            Record::new().with("age", "150").with("name", "x"),
            Record::new().with("age", "30").with("name", "y"),
        ];
        (records, schema)
    }

    fn plain(bytes: Vec<u8>) -> String {
        colored::control::set_override(false);
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_table_output() {
        colored::control::set_override(false);
        let (records, schema) = sample();
        let report = RowValidator::new(schema).run(&records, 0, &NoopObserver);
        let assembler = ReportAssembler::new(&report, &records);
        let output = ValidationOutput::from_report(&assembler, Path::new("errors.csv"));

        let mut buf = Vec::new();
        output.render_to(&mut buf, OutputFormat::Table, false).unwrap();
        let text = plain(buf);

        assert!(text.contains("Row 1:\n  - age: value 150 > max 120\n"));
        assert!(text.contains("   Total records: 2\n"));
        assert!(text.contains("   Failure rate: 50.0%\n"));
    }

    #[test]
    fn test_quiet_table_hides_rows() {
        colored::control::set_override(false);
        let (records, schema) = sample();
        let report = RowValidator::new(schema).run(&records, 0, &NoopObserver);
        let assembler = ReportAssembler::new(&report, &records);
        let output = ValidationOutput::from_report(&assembler, Path::new("errors.csv"));

        let mut buf = Vec::new();
        output.render_to(&mut buf, OutputFormat::Table, true).unwrap();
        let text = plain(buf);
        assert!(!text.contains("Row 1:"));
        assert!(text.contains("Validation Summary:"));
    }

    #[test]
    fn test_empty_run_summary() {
        colored::control::set_override(false);
        let (_, schema) = sample();
        let report = RowValidator::new(schema).run(&[], 0, &NoopObserver);
        let assembler = ReportAssembler::new(&report, &[]);
        let output = ValidationOutput::from_report(&assembler, Path::new("errors.csv"));
        assert_eq!(output.failure_rate_percent, None);

        let mut buf = Vec::new();
        output.render_to(&mut buf, OutputFormat::Table, true).unwrap();
        assert!(plain(buf).contains("   No data found.\n"));
    }

    #[test]
    fn test_json_output() {
        let (records, schema) = sample();
        let report = RowValidator::new(schema).run(&records, 0, &NoopObserver);
        let assembler = ReportAssembler::new(&report, &records);
        let output = ValidationOutput::from_report(&assembler, Path::new("errors.csv"));

        let mut buf = Vec::new();
        output.render_to(&mut buf, OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["failed"], 1);
        assert_eq!(value["failure_rate_percent"], 50.0);
        assert_eq!(value["failed_rows"][0]["row"], 1);
    }

    #[test]
    fn test_write_error_report() {
        let (records, schema) = sample();
        let report = RowValidator::new(schema).run(&records, 1, &NoopObserver);
        let failed = ReportAssembler::new(&report, &records).failed_rows();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.csv");
        write_error_report(&path, &failed).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("row,error,data"));
        assert_eq!(
            lines.next(),
            Some(r#"2,age: value 150 > max 120,"{""age"":""150"",""name"":""x""}""#)
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_header_only_error_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.csv");
        write_error_report(&path, &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "row,error,data\n");
    }

    #[test]
    fn test_render_schema_table() {
        colored::control::set_override(false);
        let (_, schema) = sample();
        let mut buf = Vec::new();
        render_schema(&mut buf, &schema, Path::new("c.json"), OutputFormat::Table).unwrap();
        let text = plain(buf);
        assert!(text.contains("Dialect: columns"));
        assert!(text.contains("age: integer required range=[0, 120]"));
    }
}
