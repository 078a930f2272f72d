//! Row results, run summaries and failed-row assembly

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::engine::rules::Violation;
use crate::record::Record;

/// Separator used when a row's violations are joined into one string
pub const VIOLATION_SEPARATOR: &str = "; ";

/// Format a rounded percentage: whole numbers keep one decimal (`30.0%`)
pub fn format_percent(pct: f64) -> String {
    if pct.fract() == 0.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{}%", pct)
    }
}

/// Outcome of validating one record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowResult {
    /// 0-based position in the input sequence
    pub index: usize,
    /// Reported row identifier (1-based position plus offset)
    pub row: usize,
    /// Violations in field order, then pipeline order
    pub violations: Vec<Violation>,
}

impl RowResult {
    pub fn new(index: usize, row: usize, violations: Vec<Violation>) -> Self {
        Self {
            index,
            row,
            violations,
        }
    }

    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn failed(&self) -> bool {
        !self.passed()
    }

    /// Violation strings in order
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }

    /// Violations joined into a single line
    pub fn joined(&self) -> String {
        self.messages().join(VIOLATION_SEPARATOR)
    }
}

/// Pass/fail counts of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_rows(rows: &[RowResult]) -> Self {
        let failed = rows.iter().filter(|r| r.failed()).count();
        Self {
            total: rows.len(),
            passed: rows.len() - failed,
            failed,
        }
    }

    /// Fraction of failed rows; 0 for an empty run
    pub fn failure_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.failed as f64 / self.total as f64
        }
    }

    /// Failure percentage rounded to 2 decimals; `None` for an empty run
    pub fn failure_rate_percent(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        let pct = self.failed as f64 * 100.0 / self.total as f64;
        Some((pct * 100.0).round() / 100.0)
    }

    /// Display form: `30.0%`, `33.33%`, or `No data found.`
    pub fn failure_rate_display(&self) -> String {
        match self.failure_rate_percent() {
            Some(pct) => format_percent(pct),
            None => "No data found.".to_string(),
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Everything a finished run produced
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub rows: Vec<RowResult>,
    pub summary: RunSummary,
}

impl RunReport {
    pub fn failed_rows(&self) -> impl Iterator<Item = &RowResult> {
        self.rows.iter().filter(|r| r.failed())
    }
}

/// Output record for a failed row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedRow {
    pub row: usize,
    pub error: String,
    pub data: Record,
}

/// Pairs a run report with the records it was computed from
pub struct ReportAssembler<'a> {
    report: &'a RunReport,
    records: &'a [Record],
}

impl<'a> ReportAssembler<'a> {
    pub fn new(report: &'a RunReport, records: &'a [Record]) -> Self {
        Self { report, records }
    }

    pub fn report(&self) -> &'a RunReport {
        self.report
    }

    /// Failed rows in input order, with their original data
    pub fn failed_rows(&self) -> Vec<FailedRow> {
        self.report
            .failed_rows()
            .map(|result| FailedRow {
                row: result.row,
                error: result.joined(),
                data: self.records.get(result.index).cloned().unwrap_or_default(),
            })
            .collect()
    }

    pub fn summary(&self) -> RunSummary {
        self.report.summary
    }
}
