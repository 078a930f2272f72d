//! Integration tests for the contract-validate binary
//!
//! Each test writes a contract and a data file into a temporary directory,
//! runs the command and checks the error report, stdout and exit code.

use clap::Parser;
use contract_dq_cli::{cli, ExitCode, ValidateCli};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const CONTRACT: &str = r#"{
    "columns": {
        "id": {"type": "integer", "required": true, "unique": true},
        "email": {"type": "string", "format": "email"},
        "age": {"type": "integer", "min": 0, "max": 120},
        "status": {"type": "string", "allowed_values": ["active", "inactive"]}
    }
}"#;

const DATA: &str = "\
id,email,age,status
1,a@b.co,30,active
2,not-an-email,150,active
1,c@d.io,40,paused
3,e@f.io,,inactive
";

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn contract_validate(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_contract-validate"))
        .args(args)
        .env_remove("DQ_ROW_OFFSET")
        .env_remove("DQ_EMAIL_MATCHING")
        .env_remove("DQ_DELIMITER")
        .env_remove("DQ_LOG_FORMAT")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .unwrap()
}

#[test]
fn test_validate_reports_failed_rows() {
    let ws = Workspace::new();
    let schema = ws.file("contract.json", CONTRACT);
    let data = ws.file("data.csv", DATA);
    let errors = ws.path("errors.csv");

    let output = contract_validate(&[
        "validate",
        "--schema",
        arg(&schema),
        "--data",
        arg(&data),
        "--output",
        arg(&errors),
    ]);
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Row 2:\n  - email: invalid email format\n  - age: value 150 > max 120\n"));
    assert!(stdout.contains("Row 3:\n  - id: duplicate value '1'\n  - status: value 'paused' not allowed\n"));
    assert!(stdout.contains("   Total records: 4\n"));
    assert!(stdout.contains("   Passed: 2\n"));
    assert!(stdout.contains("   Failed: 2\n"));
    assert!(stdout.contains("   Failure rate: 50.0%\n"));

    let report = fs::read_to_string(&errors).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "row,error,data");
    assert!(lines[1].starts_with("2,email: invalid email format; age: value 150 > max 120,"));
    assert!(lines[2].starts_with("3,id: duplicate value '1'; status: value 'paused' not allowed,"));
}

#[test]
fn test_run_progress_is_logged_by_default() {
    let ws = Workspace::new();
    let schema = ws.file("contract.json", CONTRACT);
    let data = ws.file("data.csv", DATA);
    let errors = ws.path("errors.csv");

    let output = contract_validate(&["validate", "-s", arg(&schema), "-d", arg(&data), "-o", arg(&errors)]);
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Validation started"));
    assert!(stderr.contains("Validation complete. Processed 4 rows. Failed: 2. Passed: 2."));

    let output = contract_validate(&["-q", "validate", "-s", arg(&schema), "-d", arg(&data), "-o", arg(&errors)]);
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(!stderr.contains("Validation complete"));
}

#[test]
fn test_error_report_data_column() {
    let ws = Workspace::new();
    let schema = ws.file("contract.json", CONTRACT);
    let data = ws.file("data.csv", DATA);
    let errors = ws.path("errors.csv");

    contract_validate(&[
        "validate",
        "-s",
        arg(&schema),
        "-d",
        arg(&data),
        "-o",
        arg(&errors),
    ]);

    let mut reader = csv::Reader::from_path(&errors).unwrap();
    let first = reader.records().next().unwrap().unwrap();
    let data: serde_json::Value = serde_json::from_str(&first[2]).unwrap();
    assert_eq!(data["email"], "not-an-email");
    assert_eq!(data["age"], "150");
}

#[test]
fn test_row_offset_and_clean_run() {
    let ws = Workspace::new();
    let schema = ws.file("contract.json", CONTRACT);
    let data = ws.file("data.csv", "id,email\n1,a@b.co\n2,x\n");
    let errors = ws.path("errors.csv");

    let output = contract_validate(&[
        "validate",
        "-s",
        arg(&schema),
        "-d",
        arg(&data),
        "-o",
        arg(&errors),
        "--row-offset",
        "1",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stdout).unwrap().contains("Row 3:"));

    let clean = ws.file("clean.csv", "id,email\n1,a@b.co\n2,b@c.de\n");
    let output = contract_validate(&[
        "validate",
        "-s",
        arg(&schema),
        "-d",
        arg(&clean),
        "-o",
        arg(&errors),
    ]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(fs::read_to_string(&errors).unwrap(), "row,error,data\n");
}

#[test]
fn test_missing_column_is_warned_once() {
    let ws = Workspace::new();
    let schema = ws.file("contract.json", CONTRACT);
    let data = ws.file("data.csv", "email\na@b.co\nc@d.io\n");
    let errors = ws.path("errors.csv");

    let output = contract_validate(&[
        "validate",
        "-s",
        arg(&schema),
        "-d",
        arg(&data),
        "-o",
        arg(&errors),
    ]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(stderr.matches("not present in the data header").count(), 3);

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.matches("id: missing required value").count(), 2);
}

#[test]
fn test_json_summary_and_metrics() {
    let ws = Workspace::new();
    let schema = ws.file("contract.yaml", "fields:\n  - name: id\n    type: int\n    unique: true\n");
    let data = ws.file("data.csv", "id\n1\n1\n2\n");
    let errors = ws.path("errors.csv");
    let metrics = ws.path("run.prom");

    let output = contract_validate(&[
        "validate",
        "-s",
        arg(&schema),
        "-d",
        arg(&data),
        "-o",
        arg(&errors),
        "--format",
        "json",
        "--metrics-out",
        arg(&metrics),
    ]);
    assert_eq!(output.status.code(), Some(1));

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["total"], 3);
    assert_eq!(summary["failed"], 1);
    assert_eq!(summary["failure_rate_percent"], 33.33);
    assert_eq!(summary["failed_rows"][0]["row"], 2);

    let text = fs::read_to_string(&metrics).unwrap();
    assert!(text.contains("dq_rows_total{outcome=\"failed\"} 1"));
    assert!(text.contains("dq_violations_total{category=\"unique\"} 1"));
    assert!(text.contains("dq_runs_total 1"));
}

#[test]
fn test_semicolon_delimiter_from_env() {
    let ws = Workspace::new();
    let schema = ws.file("contract.json", CONTRACT);
    let data = ws.file("data.csv", "id;email\n1;a@b.co\n");
    let errors = ws.path("errors.csv");

    let output = Command::new(env!("CARGO_BIN_EXE_contract-validate"))
        .args(["validate", "-s", arg(&schema), "-d", arg(&data), "-o", arg(&errors)])
        .env("DQ_DELIMITER", ";")
        .env("NO_COLOR", "1")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_fatal_exit_codes() {
    let ws = Workspace::new();
    let schema = ws.file("contract.json", CONTRACT);
    let broken = ws.file("broken.json", r#"{"columns": {"id": {"type": "uuid"}}}"#);
    let data = ws.file("data.csv", DATA);
    let errors = ws.path("errors.csv");

    let missing = ws.path("missing.csv");
    let output = contract_validate(&["validate", "-s", arg(&schema), "-d", arg(&missing), "-o", arg(&errors)]);
    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8(output.stderr).unwrap().contains("Error: File error"));

    let output = contract_validate(&["validate", "-s", arg(&broken), "-d", arg(&data), "-o", arg(&errors)]);
    assert_eq!(output.status.code(), Some(5));

    let output = contract_validate(&["validate", "-s", arg(&schema)]);
    assert_eq!(output.status.code(), Some(3));

    let output = contract_validate(&["--version"]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_inspect_in_process() {
    let ws = Workspace::new();
    let schema = ws.file("contract.toml", "[columns.age]\ntype = \"integer\"\nmin = 0\nmax = 120\n");

    let cli = ValidateCli::try_parse_from([
        "contract-validate",
        "inspect",
        "--schema",
        arg(&schema),
        "--format",
        "json",
    ])
    .unwrap();
    assert_eq!(cli::run(cli).unwrap(), ExitCode::Success);

    let output = contract_validate(&["inspect", "-s", arg(&schema), "--format", "json"]);
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["dialect"], "columns");
    assert_eq!(value["fields"][0]["name"], "age");
    assert_eq!(value["fields"][0]["max"], 120.0);
}
