//! Presence check
//!
//! Runs first for every field. A null value (absent column, or blank after
//! trimming) ends the pipeline for the field; it is a violation only when
//! the field is required.

use super::{FieldCheck, FieldContext, Flow, RuleCategory, Violation};

pub struct PresenceCheck;

impl FieldCheck for PresenceCheck {
    fn id(&self) -> &str {
        "presence"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Required
    }

    fn evaluate(&self, ctx: &mut FieldContext<'_>, findings: &mut Vec<Violation>) -> Flow {
        if ctx.value.is_some() {
            return Flow::Continue;
        }

        if ctx.field.required {
            findings.push(ctx.violation(RuleCategory::Required, "missing required value"));
        }

        // Nothing left to check on a null value
        Flow::Stop
    }
}
