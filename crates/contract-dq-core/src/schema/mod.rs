//! Schema model for field-level data contracts
//!
//! A [`Schema`] is an ordered list of [`FieldRule`]s. It can be parsed from
//! either contract dialect (see [`dialect`]) or assembled in code with a
//! [`SchemaBuilder`]. Both paths enforce the same structural invariants.

pub mod dialect;

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::error::{Result, SchemaParseError};

pub use dialect::Dialect;

/// Expected type of a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Whole number (signed 64-bit)
    Integer,
    /// Floating point number
    Float,
    /// Any text
    String,
    /// No type check is performed
    #[default]
    Unspecified,
}

impl FieldType {
    /// Parse a surface spelling from either dialect
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "integer" | "int" => Some(FieldType::Integer),
            "float" | "number" => Some(FieldType::Float),
            "string" | "str" => Some(FieldType::String),
            _ => None,
        }
    }

    /// Whether range checks apply to this type
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Float)
    }

    /// Whether format checks apply to this type
    pub fn is_string_like(&self) -> bool {
        matches!(self, FieldType::String | FieldType::Unspecified)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Integer => write!(f, "integer"),
            FieldType::Float => write!(f, "float"),
            FieldType::String => write!(f, "string"),
            FieldType::Unspecified => write!(f, "unspecified"),
        }
    }
}

/// Supported value formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldFormat {
    Email,
}

impl FieldFormat {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "email" => Some(FieldFormat::Email),
            _ => None,
        }
    }
}

impl fmt::Display for FieldFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldFormat::Email => write!(f, "email"),
        }
    }
}

/// Constraint set for a single declared field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldRule {
    /// Field (column) name, unique within a schema
    pub name: String,

    /// Expected value type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Whether a non-empty value must be present
    pub required: bool,

    /// Format pattern, evaluated for string-like types only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<FieldFormat>,

    /// Inclusive lower bound, evaluated for numeric types only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    /// Inclusive upper bound, evaluated for numeric types only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Permitted values in their textual form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,

    /// Whether values must not repeat across a validation run
    pub unique: bool,
}

impl FieldRule {
    /// Create a rule with no constraints besides the type
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            format: None,
            min: None,
            max: None,
            allowed_values: None,
            unique: false,
        }
    }

    /// Set the required flag
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the format
    pub fn with_format(mut self, format: FieldFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set the inclusive lower bound
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set the inclusive upper bound
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Set the permitted values
    pub fn with_allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Set the uniqueness flag
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Whether the declared bounds are usable for this field's type
    pub fn has_range(&self) -> bool {
        self.field_type.is_numeric() && (self.min.is_some() || self.max.is_some())
    }

    /// Check structural invariants of a single rule
    pub(crate) fn check(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(SchemaParseError::InvalidRange {
                    field: self.name.clone(),
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}

/// Ordered collection of field rules
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    /// Surface dialect the schema was read from
    pub dialect: Dialect,
    fields: Vec<FieldRule>,
}

impl Schema {
    /// Start building a schema in code
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Parse a schema from an already-decoded document
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        dialect::parse_document(value)
    }

    /// Parse a schema from JSON text
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        Self::from_value(&value)
    }

    /// Parse a schema from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let value: serde_json::Value = serde_yaml::from_str(content)?;
        Self::from_value(&value)
    }

    /// Parse a schema from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let value: serde_json::Value = toml::from_str(content)?;
        Self::from_value(&value)
    }

    /// Validate invariants and assemble a schema
    pub(crate) fn from_rules(dialect: Dialect, fields: Vec<FieldRule>) -> Result<Self> {
        let mut seen = HashSet::new();
        for rule in &fields {
            if !seen.insert(rule.name.as_str()) {
                return Err(SchemaParseError::DuplicateField(rule.name.clone()));
            }
            rule.check()?;
        }
        Ok(Self { dialect, fields })
    }

    /// Field rules in declaration order
    pub fn fields(&self) -> &[FieldRule] {
        &self.fields
    }

    /// Look up a rule by field name
    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Declared field names in order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Names of fields flagged `unique`
    pub fn unique_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.unique)
            .map(|f| f.name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for [`Schema`]
pub struct SchemaBuilder {
    fields: Vec<FieldRule>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field rule
    pub fn field(mut self, rule: FieldRule) -> Self {
        self.fields.push(rule);
        self
    }

    /// Build the schema, enforcing the same invariants as parsing
    pub fn build(self) -> Result<Schema> {
        Schema::from_rules(Dialect::Builder, self.fields)
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_parsing() {
        assert_eq!(FieldType::parse("integer"), Some(FieldType::Integer));
        assert_eq!(FieldType::parse("int"), Some(FieldType::Integer));
        assert_eq!(FieldType::parse("Float"), Some(FieldType::Float));
        assert_eq!(FieldType::parse("number"), Some(FieldType::Float));
        assert_eq!(FieldType::parse("str"), Some(FieldType::String));
        assert_eq!(FieldType::parse("uuid"), None);
    }

    #[test]
    fn test_field_type_classes() {
        assert!(FieldType::Integer.is_numeric());
        assert!(FieldType::Float.is_numeric());
        assert!(!FieldType::String.is_numeric());
        assert!(FieldType::String.is_string_like());
        assert!(FieldType::Unspecified.is_string_like());
        assert!(!FieldType::Integer.is_string_like());
    }

    #[test]
    fn test_builder_preserves_order() {
        let schema = Schema::builder()
            .field(FieldRule::new("id", FieldType::Integer).unique(true))
            .field(FieldRule::new("email", FieldType::String).with_format(FieldFormat::Email))
            .field(FieldRule::new("age", FieldType::Integer).min(0.0).max(120.0))
            .build()
            .unwrap();

        let names: Vec<_> = schema.field_names().collect();
        assert_eq!(names, vec!["id", "email", "age"]);
        assert_eq!(schema.unique_fields(), vec!["id"]);
        assert_eq!(schema.dialect, Dialect::Builder);
        assert!(schema.field("age").unwrap().has_range());
    }

    #[test]
    fn test_builder_rejects_inverted_range() {
        let err = Schema::builder()
            .field(FieldRule::new("age", FieldType::Integer).min(10.0).max(1.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaParseError::InvalidRange { .. }));
    }

    #[test]
    fn test_builder_rejects_duplicates() {
        let err = Schema::builder()
            .field(FieldRule::new("id", FieldType::Integer))
            .field(FieldRule::new("id", FieldType::String))
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaParseError::DuplicateField("id".to_string()));
    }

    #[test]
    fn test_range_ignored_for_strings() {
        let rule = FieldRule::new("name", FieldType::String).min(1.0);
        assert!(!rule.has_range());
    }
}
