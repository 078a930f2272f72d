//! Prometheus metrics for validation runs
//!
//! - `dq_rows_total` (counter) - Validated rows by outcome
//! - `dq_violations_total` (counter) - Violations by check category
//! - `dq_runs_total` (counter) - Completed runs
//! - `dq_run_duration_seconds` (histogram) - Run wall time
//! - `dq_last_run_failure_rate` (gauge) - Failed fraction of the last run
//!
//! # Example
//!
//! ```rust,no_run
//! use contract_dq_core::telemetry::MetricsObserver;
//!
//! let metrics = MetricsObserver::new().unwrap();
//! // pass `&metrics` to `RowValidator::run`, then:
//! let text = metrics.gather_text().unwrap();
//! ```

use prometheus::{Counter, CounterVec, Gauge, Histogram, HistogramOpts, Opts, Registry};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use uuid::Uuid;

use super::{Result, RunObserver, TelemetryError};
use crate::report::{RowResult, RunSummary};
use crate::schema::Schema;

const NAMESPACE: &str = "dq";

/// Run observer that records Prometheus metrics
pub struct MetricsObserver {
    registry: Arc<Registry>,

    /// Validated rows (by outcome)
    rows_total: CounterVec,

    /// Violations (by category)
    violations_total: CounterVec,

    /// Completed runs
    runs_total: Counter,

    /// Run duration in seconds
    run_duration_seconds: Histogram,

    /// Failure rate of the most recent run
    last_run_failure_rate: Gauge,

    started: Mutex<Option<Instant>>,
}

impl MetricsObserver {
    /// Create an observer with its own registry
    pub fn new() -> Result<Self> {
        Self::with_registry(Arc::new(Registry::new()))
    }

    /// Create an observer registering into an existing registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let rows_total = CounterVec::new(
            Opts::new("rows_total", "Total number of validated rows by outcome")
                .namespace(NAMESPACE),
            &["outcome"],
        )?;

        let violations_total = CounterVec::new(
            Opts::new(
                "violations_total",
                "Total number of field violations by check category",
            )
            .namespace(NAMESPACE),
            &["category"],
        )?;

        let runs_total = Counter::with_opts(
            Opts::new("runs_total", "Total number of completed validation runs")
                .namespace(NAMESPACE),
        )?;

        let run_duration_seconds = Histogram::with_opts(
            HistogramOpts::new("run_duration_seconds", "Validation run duration in seconds")
                .namespace(NAMESPACE)
                .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0]),
        )?;

        let last_run_failure_rate = Gauge::with_opts(
            Opts::new(
                "last_run_failure_rate",
                "Fraction of failed rows in the last run (0.0 - 1.0)",
            )
            .namespace(NAMESPACE),
        )?;

        registry.register(Box::new(rows_total.clone()))?;
        registry.register(Box::new(violations_total.clone()))?;
        registry.register(Box::new(runs_total.clone()))?;
        registry.register(Box::new(run_duration_seconds.clone()))?;
        registry.register(Box::new(last_run_failure_rate.clone()))?;

        Ok(Self {
            registry,
            rows_total,
            violations_total,
            runs_total,
            run_duration_seconds,
            last_run_failure_rate,
            started: Mutex::new(None),
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    /// Number of rows counted with the given outcome (`passed` or `failed`)
    pub fn rows(&self, outcome: &str) -> f64 {
        self.rows_total.with_label_values(&[outcome]).get()
    }

    /// Number of violations counted for a category
    pub fn violations(&self, category: &str) -> f64 {
        self.violations_total.with_label_values(&[category]).get()
    }

    pub fn runs(&self) -> f64 {
        self.runs_total.get()
    }

    pub fn last_failure_rate(&self) -> f64 {
        self.last_run_failure_rate.get()
    }

    /// Gather all metrics in Prometheus format
    pub fn gather(&self) -> Vec<prometheus::proto::MetricFamily> {
        self.registry.gather()
    }

    /// Encode metrics in the text exposition format
    pub fn gather_text(&self) -> Result<String> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&self.gather(), &mut buffer)
            .map_err(|e| TelemetryError::EncodingFailed(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::EncodingFailed(e.to_string()))
    }
}

impl RunObserver for MetricsObserver {
    fn on_run_started(&self, _run_id: Uuid, _schema: &Schema) {
        if let Ok(mut started) = self.started.lock() {
            *started = Some(Instant::now());
        }
    }

    fn on_row(&self, result: &RowResult) {
        let outcome = if result.passed() { "passed" } else { "failed" };
        self.rows_total.with_label_values(&[outcome]).inc();

        for violation in &result.violations {
            self.violations_total
                .with_label_values(&[violation.category.as_str()])
                .inc();
        }
    }

    fn on_run_finished(&self, _run_id: Uuid, summary: &RunSummary) {
        self.runs_total.inc();
        self.last_run_failure_rate.set(summary.failure_rate());

        let started = self.started.lock().ok().and_then(|mut s| s.take());
        if let Some(started) = started {
            self.run_duration_seconds
                .observe(started.elapsed().as_secs_f64());
        }
    }
}
