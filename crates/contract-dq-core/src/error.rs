//! Error types for the contract engine
//!
//! Only structural problems surface as errors. Data-quality findings are
//! never errors; they are reported as [`Violation`](crate::Violation)s.

use thiserror::Error;

/// Raised when a contract document cannot be turned into a [`Schema`](crate::Schema)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaParseError {
    /// The document does not have the expected overall shape
    #[error("Malformed schema: {0}")]
    Malformed(String),

    /// A descriptor in a field list has no usable `name`
    #[error("Field descriptor #{index} is missing a name")]
    MissingName { index: usize },

    /// The `type` of a field is not one we know how to coerce to
    #[error("Field '{field}' declares unrecognized type '{found}'")]
    UnknownType { field: String, found: String },

    /// The `format` of a field is not supported
    #[error("Field '{field}' declares unrecognized format '{found}'")]
    UnknownFormat { field: String, found: String },

    /// A known attribute carries a value of the wrong kind
    #[error("Field '{field}': attribute '{attribute}' {message}")]
    InvalidAttribute {
        field: String,
        attribute: String,
        message: String,
    },

    /// Lower bound is greater than upper bound
    #[error("Field '{field}' declares min {min} greater than max {max}")]
    InvalidRange { field: String, min: f64, max: f64 },

    /// The same field name was declared twice
    #[error("Field '{0}' is declared more than once")]
    DuplicateField(String),

    /// The raw text could not be read as JSON, YAML or TOML
    #[error("Syntax error: {0}")]
    Syntax(String),
}

impl SchemaParseError {
    /// Create a malformed-document error
    pub fn malformed(msg: impl Into<String>) -> Self {
        SchemaParseError::Malformed(msg.into())
    }

    /// Create an invalid-attribute error
    pub fn invalid_attribute(
        field: impl Into<String>,
        attribute: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        SchemaParseError::InvalidAttribute {
            field: field.into(),
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    /// Name of the offending field, when the error is tied to one
    pub fn field(&self) -> Option<&str> {
        match self {
            SchemaParseError::UnknownType { field, .. }
            | SchemaParseError::UnknownFormat { field, .. }
            | SchemaParseError::InvalidAttribute { field, .. }
            | SchemaParseError::InvalidRange { field, .. } => Some(field),
            SchemaParseError::DuplicateField(field) => Some(field),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SchemaParseError {
    fn from(err: serde_json::Error) -> Self {
        SchemaParseError::Syntax(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for SchemaParseError {
    fn from(err: serde_yaml::Error) -> Self {
        SchemaParseError::Syntax(format!("YAML error: {}", err))
    }
}

impl From<toml::de::Error> for SchemaParseError {
    fn from(err: toml::de::Error) -> Self {
        SchemaParseError::Syntax(format!("TOML error: {}", err))
    }
}

/// Result type alias for schema operations
pub type Result<T> = std::result::Result<T, SchemaParseError>;
