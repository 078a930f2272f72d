//! Uniqueness check
//!
//! The first occurrence of a value is recorded and passes; later ones are
//! duplicates. Results therefore depend on record order.

use super::{FieldCheck, FieldContext, Flow, RuleCategory, Violation};
use crate::schema::FieldRule;

pub struct UniqueCheck;

impl FieldCheck for UniqueCheck {
    fn id(&self) -> &str {
        "unique"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Unique
    }

    fn applies_to(&self, field: &FieldRule) -> bool {
        field.unique
    }

    fn evaluate(&self, ctx: &mut FieldContext<'_>, findings: &mut Vec<Violation>) -> Flow {
        let Some(value) = ctx.value else {
            return Flow::Continue;
        };

        if !ctx.tracker.observe(&ctx.field.name, value) {
            findings.push(ctx.violation(
                RuleCategory::Unique,
                format!("duplicate value '{}'", value),
            ));
        }

        Flow::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tracker::UniquenessTracker;
    use crate::engine::ValidatorOptions;
    use crate::schema::FieldType;

    #[test]
    fn test_second_occurrence_is_duplicate() {
        let rule = FieldRule::new("id", FieldType::Integer).unique(true);
        let options = ValidatorOptions::default();
        let mut tracker = UniquenessTracker::new();
        let mut findings = Vec::new();

        for _ in 0..3 {
            let mut ctx = FieldContext {
                field: &rule,
                value: Some("7"),
                typed: None,
                options: &options,
                tracker: &mut tracker,
            };
            UniqueCheck.evaluate(&mut ctx, &mut findings);
        }

        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].to_string(), "id: duplicate value '7'");
        assert_eq!(tracker.seen_count("id"), 1);
    }
}
