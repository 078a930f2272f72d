//! Row validation engine
//!
//! [`RowValidator`] applies a [`Schema`] to one record at a time.
//! [`ValidationRun`] drives it over an ordered record sequence, owning the
//! run-scoped [`UniquenessTracker`] and reporting to a [`RunObserver`].

pub mod rules;
pub mod tracker;

use chrono::{DateTime, Utc};
use std::time::Instant;
use uuid::Uuid;

use crate::record::Record;
use crate::report::{RowResult, RunReport, RunSummary};
use crate::schema::Schema;
use crate::telemetry::RunObserver;
use rules::{BoxedCheck, FieldContext, Flow, Violation};
use tracker::UniquenessTracker;

pub use rules::format::EmailMatching;

/// Tunables for the row validator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// How `format: email` is matched
    pub email_matching: EmailMatching,
}

impl ValidatorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the email matching mode
    pub fn with_email_matching(mut self, matching: EmailMatching) -> Self {
        self.email_matching = matching;
        self
    }
}

/// Applies a schema to individual records
pub struct RowValidator {
    schema: Schema,
    checks: Vec<BoxedCheck>,
    options: ValidatorOptions,
}

impl RowValidator {
    /// Create a validator with the built-in check pipeline
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            checks: rules::default_checks(),
            options: ValidatorOptions::default(),
        }
    }

    /// Set the validator options
    pub fn with_options(mut self, options: ValidatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Registered checks in evaluation order
    pub fn checks(&self) -> &[BoxedCheck] {
        &self.checks
    }

    /// Validate one record
    ///
    /// Violations come out in field declaration order, and within a field
    /// in pipeline order. The only side effect is on `tracker`.
    pub fn validate(&self, record: &Record, tracker: &mut UniquenessTracker) -> Vec<Violation> {
        let mut findings = Vec::new();

        for field in self.schema.fields() {
            let mut ctx = FieldContext {
                field,
                value: record.value(&field.name),
                typed: None,
                options: &self.options,
                tracker: &mut *tracker,
            };

            for check in &self.checks {
                if !check.applies_to(field) {
                    continue;
                }
                if check.evaluate(&mut ctx, &mut findings) == Flow::Stop {
                    tracing::trace!(field = %field.name, check = check.id(), "Field pipeline stopped");
                    break;
                }
            }
        }

        findings
    }

    /// Begin a run over an ordered record sequence
    pub fn start_run<'a>(&'a self, observer: &'a dyn RunObserver) -> ValidationRun<'a> {
        ValidationRun::new(self, observer)
    }

    /// Validate a whole batch with a fresh tracker
    pub fn run(&self, records: &[Record], row_offset: usize, observer: &dyn RunObserver) -> RunReport {
        let mut run = self.start_run(observer).with_row_offset(row_offset);
        for record in records {
            run.process(record);
        }
        run.finish()
    }
}

/// A single validation run
///
/// Records must be fed in source order: duplicate detection keeps the
/// first occurrence.
pub struct ValidationRun<'a> {
    run_id: Uuid,
    validator: &'a RowValidator,
    observer: &'a dyn RunObserver,
    tracker: UniquenessTracker,
    row_offset: usize,
    rows: Vec<RowResult>,
    started_at: DateTime<Utc>,
    started: Instant,
}

impl<'a> ValidationRun<'a> {
    pub fn new(validator: &'a RowValidator, observer: &'a dyn RunObserver) -> Self {
        let run_id = Uuid::new_v4();
        observer.on_run_started(run_id, validator.schema());

        Self {
            run_id,
            validator,
            observer,
            tracker: UniquenessTracker::new(),
            row_offset: 0,
            rows: Vec::new(),
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    /// Offset added to the 1-based row position
    pub fn with_row_offset(mut self, offset: usize) -> Self {
        self.row_offset = offset;
        self
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Validate the next record of the sequence
    pub fn process(&mut self, record: &Record) -> &RowResult {
        let index = self.rows.len();
        let violations = self.validator.validate(record, &mut self.tracker);
        let result = RowResult::new(index, index + 1 + self.row_offset, violations);

        self.observer.on_row(&result);
        self.rows.push(result);
        &self.rows[index]
    }

    /// Close the run and produce its report
    pub fn finish(self) -> RunReport {
        let summary = RunSummary::from_rows(&self.rows);
        self.observer.on_run_finished(self.run_id, &summary);

        RunReport {
            run_id: self.run_id,
            started_at: self.started_at,
            duration_ms: self.started.elapsed().as_millis() as u64,
            rows: self.rows,
            summary,
        }
    }
}
