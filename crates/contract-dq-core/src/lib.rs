//! Contract-first data-quality engine
//!
//! Validates tabular records against a declarative contract and reports
//! every violation per row, with a pass/fail summary.
//!
//! ## Architecture
//!
//! 1. **Schema** (`schema/`): the field rule model and the two contract
//!    dialects (`columns` and `fields`) that parse into it.
//!
//! 2. **Engine** (`engine/`): the per-field check pipeline, the row
//!    validator and the run driver that owns uniqueness state.
//!
//! 3. **Report** (`report`): row results, run summary and failed-row
//!    assembly for the error report.
//!
//! 4. **Telemetry** (`telemetry/`): injected run observers for `tracing`
//!    events and Prometheus metrics.
//!
//! ## Example
//!
//! ```rust
//! use contract_dq_core::{Record, RowValidator, Schema, TracingObserver};
//!
//! let schema = Schema::from_json_str(
//!     r#"{"columns": {"age": {"type": "integer", "required": true, "min": 0, "max": 120}}}"#,
//! )
//! .unwrap();
//!
//! let records = vec![
//!     Record::new().with("age", "42"),
//!     Record::new().with("age", "150"),
//! ];
//!
//! let report = RowValidator::new(schema).run(&records, 0, &TracingObserver);
//! assert_eq!(report.summary.failed, 1);
//! assert_eq!(report.rows[1].joined(), "age: value 150 > max 120");
//! ```

pub mod engine;
pub mod error;
pub mod record;
pub mod report;
pub mod schema;
pub mod telemetry;

pub use engine::rules::{FieldCheck, RuleCategory, Violation};
pub use engine::tracker::UniquenessTracker;
pub use engine::{EmailMatching, RowValidator, ValidationRun, ValidatorOptions};
pub use error::{Result, SchemaParseError};
pub use record::Record;
pub use report::{FailedRow, ReportAssembler, RowResult, RunReport, RunSummary};
pub use schema::{Dialect, FieldFormat, FieldRule, FieldType, Schema, SchemaBuilder};
pub use telemetry::{MetricsObserver, NoopObserver, ObserverSet, RunObserver, TracingObserver};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
