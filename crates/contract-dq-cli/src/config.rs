//! Run configuration
//!
//! Layered lowest to highest: built-in defaults, `DQ_*` environment
//! variables, command-line flags. Environment values that do not parse are
//! ignored and the default is kept.

use clap::ValueEnum;
use contract_dq_core::EmailMatching;
use serde::Serialize;
use std::str::FromStr;

pub const ENV_ROW_OFFSET: &str = "DQ_ROW_OFFSET";
pub const ENV_EMAIL_MATCHING: &str = "DQ_EMAIL_MATCHING";
pub const ENV_DELIMITER: &str = "DQ_DELIMITER";
pub const ENV_LOG_FORMAT: &str = "DQ_LOG_FORMAT";

/// Log line format on stderr
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Parse a field delimiter: a single ASCII character, or `tab` / `\t`
pub fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "tab" | "\\t" | "\t" => return Ok(b'\t'),
        _ => {}
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => Err(format!(
            "Delimiter must be a single ASCII character, got '{}'",
            s
        )),
    }
}

/// Settings for one validation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunConfig {
    /// Added to the 1-based data-row position to form the row id
    pub row_offset: usize,
    /// How `format: email` is matched
    pub email_matching: EmailMatching,
    /// Field delimiter of the data file
    pub delimiter: u8,
    /// Log line format
    pub log_format: LogFormat,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            row_offset: 0,
            email_matching: EmailMatching::default(),
            delimiter: b',',
            log_format: LogFormat::default(),
        }
    }
}

impl RunConfig {
    /// Create a builder for RunConfig
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::new()
    }

    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            row_offset: lookup(ENV_ROW_OFFSET)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.row_offset),
            email_matching: lookup(ENV_EMAIL_MATCHING)
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.email_matching),
            delimiter: lookup(ENV_DELIMITER)
                .and_then(|v| parse_delimiter(&v).ok())
                .unwrap_or(defaults.delimiter),
            log_format: lookup(ENV_LOG_FORMAT)
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.log_format),
        }
    }

    /// Start a builder seeded with this config
    pub fn to_builder(&self) -> RunConfigBuilder {
        RunConfigBuilder {
            config: self.clone(),
        }
    }
}

/// Builder for RunConfig
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    /// Create a new builder with defaults
    pub fn new() -> Self {
        Self {
            config: RunConfig::default(),
        }
    }

    pub fn row_offset(mut self, offset: usize) -> Self {
        self.config.row_offset = offset;
        self
    }

    pub fn email_matching(mut self, matching: EmailMatching) -> Self {
        self.config.email_matching = matching;
        self
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.config.log_format = format;
        self
    }

    /// Apply an override only when one was given
    pub fn maybe<T>(self, value: Option<T>, apply: fn(Self, T) -> Self) -> Self {
        match value {
            Some(value) => apply(self, value),
            None => self,
        }
    }

    pub fn build(self) -> RunConfig {
        self.config
    }
}

impl Default for RunConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
