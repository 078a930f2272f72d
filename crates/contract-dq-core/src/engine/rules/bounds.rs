//! Numeric range check
//!
//! Bounds are inclusive. Both ends are evaluated independently, though a
//! consistent schema (`min <= max`) means at most one can fire.
//! Integers are shown by value, floats as written in the data.

use super::type_check::TypedValue;
use super::{FieldCheck, FieldContext, Flow, RuleCategory, Violation};
use crate::schema::FieldRule;

/// Inclusive numeric bounds
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NumericBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericBounds {
    pub fn of(field: &FieldRule) -> Self {
        Self {
            min: field.min,
            max: field.max,
        }
    }

    /// Whether the value falls below the lower bound
    pub fn below_min(&self, value: f64) -> Option<f64> {
        self.min.filter(|min| value < *min)
    }

    /// Whether the value exceeds the upper bound
    pub fn above_max(&self, value: f64) -> Option<f64> {
        self.max.filter(|max| value > *max)
    }

    /// Human readable description, e.g. `[0, 120]`
    pub fn describe(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("[{}, {}]", min, max),
            (Some(min), None) => format!(">= {}", min),
            (None, Some(max)) => format!("<= {}", max),
            (None, None) => "unbounded".to_string(),
        }
    }
}

pub struct RangeCheck;

impl FieldCheck for RangeCheck {
    fn id(&self) -> &str {
        "range"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Range
    }

    fn applies_to(&self, field: &FieldRule) -> bool {
        field.has_range()
    }

    fn evaluate(&self, ctx: &mut FieldContext<'_>, findings: &mut Vec<Violation>) -> Flow {
        let Some(typed) = ctx.typed else {
            return Flow::Continue;
        };
        let Some(number) = typed.as_f64() else {
            return Flow::Continue;
        };

        let bounds = NumericBounds::of(ctx.field);
        let shown = match (typed, ctx.value) {
            (TypedValue::Float(_), Some(raw)) => raw.to_string(),
            _ => typed.to_string(),
        };

        if let Some(min) = bounds.below_min(number) {
            findings.push(ctx.violation(
                RuleCategory::Range,
                format!("value {} < min {}", shown, min),
            ));
        }

        if let Some(max) = bounds.above_max(number) {
            findings.push(ctx.violation(
                RuleCategory::Range,
                format!("value {} > max {}", shown, max),
            ));
        }

        Flow::Continue
    }
}
