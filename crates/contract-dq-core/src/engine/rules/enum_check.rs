//! Allowed-value set check

use super::type_check::{parse_float, TypedValue};
use super::{FieldCheck, FieldContext, Flow, RuleCategory, Violation};
use crate::schema::FieldRule;

/// Membership test against a normalized allowed-value list
///
/// Textual equality always counts. For numeric values, numeric equality
/// with a numeric entry also counts, so `"007"` is a member of `[7]`.
pub fn is_allowed(allowed: &[String], value: &str, typed: Option<TypedValue>) -> bool {
    if allowed.iter().any(|a| a == value) {
        return true;
    }

    match typed.and_then(|t| t.as_f64()) {
        Some(number) => allowed
            .iter()
            .filter_map(|a| parse_float(a))
            .any(|a| a == number),
        None => false,
    }
}

pub struct AllowedValuesCheck;

impl FieldCheck for AllowedValuesCheck {
    fn id(&self) -> &str {
        "allowed_values"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::AllowedValues
    }

    fn applies_to(&self, field: &FieldRule) -> bool {
        field.allowed_values.is_some()
    }

    fn evaluate(&self, ctx: &mut FieldContext<'_>, findings: &mut Vec<Violation>) -> Flow {
        let (Some(value), Some(allowed)) = (ctx.value, ctx.field.allowed_values.as_deref()) else {
            return Flow::Continue;
        };

        if !is_allowed(allowed, value, ctx.typed) {
            findings.push(ctx.violation(
                RuleCategory::AllowedValues,
                format!("value '{}' not allowed", value),
            ));
        }

        Flow::Continue
    }
}
