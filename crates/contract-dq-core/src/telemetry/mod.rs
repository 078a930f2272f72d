//! Run observers
//!
//! The engine never logs on its own. A [`RunObserver`] is passed into each
//! validation run and receives its lifecycle events:
//!
//! - `TracingObserver` - structured log events through `tracing`
//! - [`MetricsObserver`] - Prometheus counters and gauges
//! - `NoopObserver` - discards everything
//! - `ObserverSet` - fans events out to several observers

pub mod metrics;

pub use metrics::MetricsObserver;

use thiserror::Error;
use uuid::Uuid;

use crate::report::{RowResult, RunSummary};
use crate::schema::Schema;

/// Telemetry errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Metrics error: {0}")]
    MetricsError(#[from] prometheus::Error),

    #[error("Failed to encode metrics: {0}")]
    EncodingFailed(String),
}

pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Receiver of validation run events
///
/// All hooks default to doing nothing.
pub trait RunObserver {
    /// A run is about to process its first record
    fn on_run_started(&self, _run_id: Uuid, _schema: &Schema) {}

    /// A record has been validated
    fn on_row(&self, _result: &RowResult) {}

    /// The run has processed its last record
    fn on_run_finished(&self, _run_id: Uuid, _summary: &RunSummary) {}
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// Observer that emits `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RunObserver for TracingObserver {
    fn on_run_started(&self, run_id: Uuid, schema: &Schema) {
        tracing::info!(
            %run_id,
            dialect = %schema.dialect,
            field_count = schema.len(),
            unique_fields = ?schema.unique_fields(),
            "Validation started"
        );
    }

    fn on_row(&self, result: &RowResult) {
        if result.failed() {
            tracing::debug!(
                row = result.row,
                violations = result.violations.len(),
                errors = %result.joined(),
                "Row failed validation"
            );
        } else {
            tracing::trace!(row = result.row, "Row passed validation");
        }
    }

    fn on_run_finished(&self, run_id: Uuid, summary: &RunSummary) {
        tracing::info!(
            %run_id,
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            "Validation complete. Processed {} rows. Failed: {}. Passed: {}.",
            summary.total,
            summary.failed,
            summary.passed
        );
    }
}

/// Fan-out to several observers, in insertion order
#[derive(Default)]
pub struct ObserverSet<'a> {
    observers: Vec<&'a dyn RunObserver>,
}

impl<'a> ObserverSet<'a> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Add an observer
    pub fn with(mut self, observer: &'a dyn RunObserver) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl RunObserver for ObserverSet<'_> {
    fn on_run_started(&self, run_id: Uuid, schema: &Schema) {
        for observer in &self.observers {
            observer.on_run_started(run_id, schema);
        }
    }

    fn on_row(&self, result: &RowResult) {
        for observer in &self.observers {
            observer.on_row(result);
        }
    }

    fn on_run_finished(&self, run_id: Uuid, summary: &RunSummary) {
        for observer in &self.observers {
            observer.on_run_finished(run_id, summary);
        }
    }
}
