//! Type coercion check
//!
//! Coerces the trimmed raw value to the declared type. A value that cannot
//! be coerced ends the pipeline for its field: range, format and set checks
//! are meaningless on it.

use std::fmt;

use super::{FieldCheck, FieldContext, Flow, RuleCategory, Violation};
use crate::schema::FieldType;

/// A value after successful coercion
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypedValue {
    Integer(i64),
    Float(f64),
    /// String-like value; the raw text is used as is
    Text,
}

impl TypedValue {
    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TypedValue::Integer(i) => Some(*i as f64),
            TypedValue::Float(f) => Some(*f),
            TypedValue::Text => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Integer(i) => write!(f, "{}", i),
            TypedValue::Float(v) => write!(f, "{}", v),
            TypedValue::Text => write!(f, "<text>"),
        }
    }
}

/// Whether the text is written as a whole number: optional sign, ASCII digits
pub fn is_whole_number(value: &str) -> bool {
    let digits = value
        .strip_prefix('-')
        .or_else(|| value.strip_prefix('+'))
        .unwrap_or(value);

    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a whole number that fits a signed 64-bit integer
pub fn parse_integer(value: &str) -> Option<i64> {
    if !is_whole_number(value) {
        return None;
    }
    value.parse::<i64>().ok()
}

/// Parse a floating point number using the standard grammar
///
/// NaN is rejected: it compares false against every bound.
pub fn parse_float(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|f| !f.is_nan())
}

/// Coerce a non-null value to the given type
pub fn coerce(field_type: FieldType, value: &str) -> Option<TypedValue> {
    match field_type {
        FieldType::Integer => parse_integer(value).map(TypedValue::Integer),
        FieldType::Float => parse_float(value).map(TypedValue::Float),
        FieldType::String | FieldType::Unspecified => Some(TypedValue::Text),
    }
}

/// Detail for a value that failed coercion
fn coercion_failure(field_type: FieldType, value: &str) -> String {
    if field_type == FieldType::Integer && is_whole_number(value) {
        format!("integer out of range, got '{}'", value)
    } else {
        format!("expected {}, got '{}'", field_type, value)
    }
}

pub struct TypeCheck;

impl FieldCheck for TypeCheck {
    fn id(&self) -> &str {
        "type"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Type
    }

    fn evaluate(&self, ctx: &mut FieldContext<'_>, findings: &mut Vec<Violation>) -> Flow {
        let Some(value) = ctx.value else {
            return Flow::Stop;
        };

        match coerce(ctx.field.field_type, value) {
            Some(typed) => {
                ctx.typed = Some(typed);
                Flow::Continue
            }
            None => {
                findings.push(ctx.violation(
                    RuleCategory::Type,
                    coercion_failure(ctx.field.field_type, value),
                ));
                Flow::Stop
            }
        }
    }
}
