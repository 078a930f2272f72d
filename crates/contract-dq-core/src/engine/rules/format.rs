//! Format pattern check

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use super::{FieldCheck, FieldContext, Flow, RuleCategory, Violation};
use crate::schema::{FieldFormat, FieldRule};

const EMAIL_PATTERN: &str = r"[^@]+@[^@]+\.[^@]+";

/// How the email pattern is matched against a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailMatching {
    /// The whole value must match
    #[default]
    Anchored,
    /// Any matching substring is enough
    Substring,
}

impl fmt::Display for EmailMatching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmailMatching::Anchored => write!(f, "anchored"),
            EmailMatching::Substring => write!(f, "substring"),
        }
    }
}

impl FromStr for EmailMatching {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anchored" | "full" => Ok(EmailMatching::Anchored),
            "substring" | "search" => Ok(EmailMatching::Substring),
            _ => Err(format!("Unknown email matching mode: {}", s)),
        }
    }
}

fn email_regex(matching: EmailMatching) -> &'static Regex {
    static ANCHORED: OnceLock<Regex> = OnceLock::new();
    static SUBSTRING: OnceLock<Regex> = OnceLock::new();

    match matching {
        EmailMatching::Anchored => ANCHORED.get_or_init(|| {
            Regex::new(&format!("^{}$", EMAIL_PATTERN)).expect("email pattern is a valid regex")
        }),
        EmailMatching::Substring => SUBSTRING
            .get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex")),
    }
}

/// Whether a value looks like an email address
pub fn is_email(value: &str, matching: EmailMatching) -> bool {
    email_regex(matching).is_match(value)
}

pub struct FormatCheck;

impl FieldCheck for FormatCheck {
    fn id(&self) -> &str {
        "format"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Format
    }

    fn applies_to(&self, field: &FieldRule) -> bool {
        field.format.is_some() && field.field_type.is_string_like()
    }

    fn evaluate(&self, ctx: &mut FieldContext<'_>, findings: &mut Vec<Violation>) -> Flow {
        let Some(value) = ctx.value else {
            return Flow::Continue;
        };

        match ctx.field.format {
            Some(FieldFormat::Email) => {
                if !is_email(value, ctx.options.email_matching) {
                    findings.push(ctx.violation(RuleCategory::Format, "invalid email format"));
                }
            }
            None => {}
        }

        Flow::Continue
    }
}
