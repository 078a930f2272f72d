//! Adapters for the two contract dialects
//!
//! Dialect A keys its rules under `columns`, dialect B under `fields`.
//! Either section may be a mapping (field name to descriptor) or a list of
//! descriptors that carry their own `name`. Every rule key is understood in
//! both dialects; unknown keys are ignored.

use serde::Serialize;
use serde_json::{Map, Value};

use super::{FieldFormat, FieldRule, FieldType, Schema};
use crate::error::{Result, SchemaParseError};

/// Surface shape a schema came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// `{"columns": ...}`
    Columns,
    /// `{"fields": ...}`
    Fields,
    /// Assembled in code
    Builder,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Columns => write!(f, "columns"),
            Dialect::Fields => write!(f, "fields"),
            Dialect::Builder => write!(f, "builder"),
        }
    }
}

/// Parse a decoded schema document of either dialect
pub(crate) fn parse_document(document: &Value) -> Result<Schema> {
    let root = document
        .as_object()
        .ok_or_else(|| SchemaParseError::malformed("schema document must be an object"))?;

    let (dialect, section) = if let Some(section) = root.get("columns") {
        (Dialect::Columns, section)
    } else if let Some(section) = root.get("fields") {
        (Dialect::Fields, section)
    } else {
        return Err(SchemaParseError::malformed(
            "expected a `columns` or `fields` section",
        ));
    };

    let rules = match section {
        Value::Object(entries) => entries
            .iter()
            .map(|(name, descriptor)| {
                let descriptor = descriptor.as_object().ok_or_else(|| {
                    SchemaParseError::malformed(format!(
                        "descriptor for field '{}' must be an object",
                        name
                    ))
                })?;
                parse_descriptor(name, descriptor)
            })
            .collect::<Result<Vec<_>>>()?,
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, descriptor)| {
                let descriptor = descriptor.as_object().ok_or_else(|| {
                    SchemaParseError::malformed(format!(
                        "field descriptor #{} must be an object",
                        index
                    ))
                })?;
                let name = descriptor
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .ok_or(SchemaParseError::MissingName { index })?;
                parse_descriptor(name, descriptor)
            })
            .collect::<Result<Vec<_>>>()?,
        _ => {
            return Err(SchemaParseError::malformed(format!(
                "`{}` section must be a mapping or a list",
                dialect
            )))
        }
    };

    tracing::debug!(%dialect, fields = rules.len(), "Parsed schema document");

    Schema::from_rules(dialect, rules)
}

/// Turn one field descriptor into a rule
fn parse_descriptor(name: &str, descriptor: &Map<String, Value>) -> Result<FieldRule> {
    let field_type = match descriptor.get("type") {
        None | Some(Value::Null) => FieldType::Unspecified,
        Some(Value::String(s)) => {
            FieldType::parse(s).ok_or_else(|| SchemaParseError::UnknownType {
                field: name.to_string(),
                found: s.clone(),
            })?
        }
        Some(other) => {
            return Err(SchemaParseError::UnknownType {
                field: name.to_string(),
                found: other.to_string(),
            })
        }
    };

    let format = match descriptor.get("format") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => {
            Some(FieldFormat::parse(s).ok_or_else(|| SchemaParseError::UnknownFormat {
                field: name.to_string(),
                found: s.clone(),
            })?)
        }
        Some(_) => {
            return Err(SchemaParseError::invalid_attribute(
                name,
                "format",
                "must be a string",
            ))
        }
    };

    let allowed_values = descriptor
        .get("allowed_values")
        .or_else(|| descriptor.get("allowedValues"));

    Ok(FieldRule {
        name: name.to_string(),
        field_type,
        required: bool_attribute(name, descriptor, "required")?,
        format,
        min: number_attribute(name, descriptor, "min")?,
        max: number_attribute(name, descriptor, "max")?,
        allowed_values: allowed_values_attribute(name, allowed_values)?,
        unique: bool_attribute(name, descriptor, "unique")?,
    })
}

fn bool_attribute(field: &str, descriptor: &Map<String, Value>, key: &str) -> Result<bool> {
    match descriptor.get(key) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(SchemaParseError::invalid_attribute(
            field,
            key,
            "must be a boolean",
        )),
    }
}

fn number_attribute(
    field: &str,
    descriptor: &Map<String, Value>,
    key: &str,
) -> Result<Option<f64>> {
    match descriptor.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(|| {
            SchemaParseError::invalid_attribute(field, key, "is not representable as a number")
        }),
        Some(_) => Err(SchemaParseError::invalid_attribute(
            field,
            key,
            "must be a number",
        )),
    }
}

fn allowed_values_attribute(field: &str, value: Option<&Value>) -> Result<Option<Vec<String>>> {
    let items = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(SchemaParseError::invalid_attribute(
                field,
                "allowed_values",
                "must be a list",
            ))
        }
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.trim().to_string()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            _ => Err(SchemaParseError::invalid_attribute(
                field,
                "allowed_values",
                "must contain only strings, numbers or booleans",
            )),
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}
