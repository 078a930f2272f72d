//! Field check framework
//!
//! Every declared field is run through an ordered pipeline of checks:
//! presence, type, format, range, allowed values, uniqueness. A check may
//! stop the pipeline for the current field, in which case later checks
//! are not evaluated for it.

pub mod bounds;
pub mod enum_check;
pub mod format;
pub mod required;
pub mod type_check;
pub mod unique;

use serde::Serialize;
use std::fmt;

use super::tracker::UniquenessTracker;
use super::ValidatorOptions;
use crate::schema::FieldRule;
use type_check::TypedValue;

/// Categories of field checks, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Value must be present
    Required,
    /// Value must coerce to the declared type
    Type,
    /// Value must match the declared format
    Format,
    /// Numeric value must be within bounds
    Range,
    /// Value must be one of a fixed set
    AllowedValues,
    /// Value must not repeat within a run
    Unique,
}

impl RuleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCategory::Required => "required",
            RuleCategory::Type => "type",
            RuleCategory::Format => "format",
            RuleCategory::Range => "range",
            RuleCategory::AllowedValues => "allowed_values",
            RuleCategory::Unique => "unique",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single failed constraint on one field of one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Field the violation belongs to
    pub field: String,
    /// Check that produced it
    pub category: RuleCategory,
    /// Message without the field prefix
    pub detail: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, category: RuleCategory, detail: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            category,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.detail)
    }
}

/// Whether the pipeline continues for the current field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// State threaded through the checks of one field of one record
pub struct FieldContext<'a> {
    /// Rule being evaluated
    pub field: &'a FieldRule,
    /// Trimmed value, `None` when absent or blank
    pub value: Option<&'a str>,
    /// Coerced value, set by the type check
    pub typed: Option<TypedValue>,
    /// Validator options
    pub options: &'a ValidatorOptions,
    /// Run-scoped uniqueness state
    pub tracker: &'a mut UniquenessTracker,
}

impl<'a> FieldContext<'a> {
    /// Build a violation for the current field
    pub fn violation(&self, category: RuleCategory, detail: impl Into<String>) -> Violation {
        Violation::new(self.field.name.clone(), category, detail)
    }
}

/// A single step of the per-field pipeline
///
/// Checks are deterministic. The only state they may touch is the
/// uniqueness tracker carried by the context.
pub trait FieldCheck: Send + Sync {
    /// Stable identifier
    fn id(&self) -> &str;

    /// Category of violations this check emits
    fn category(&self) -> RuleCategory;

    /// Whether the check has anything to do for this field
    fn applies_to(&self, _field: &FieldRule) -> bool {
        true
    }

    /// Evaluate the check, pushing any violations onto `findings`
    fn evaluate(&self, ctx: &mut FieldContext<'_>, findings: &mut Vec<Violation>) -> Flow;
}

/// A boxed check for dynamic dispatch
pub type BoxedCheck = Box<dyn FieldCheck>;

/// The built-in pipeline in evaluation order
pub fn default_checks() -> Vec<BoxedCheck> {
    vec![
        Box::new(required::PresenceCheck),
        Box::new(type_check::TypeCheck),
        Box::new(format::FormatCheck),
        Box::new(bounds::RangeCheck),
        Box::new(enum_check::AllowedValuesCheck),
        Box::new(unique::UniqueCheck),
    ]
}
