//! Error types for configuration, analysis and baselines.

use std::path::PathBuf;
use thiserror::Error;
use treelint_syntax::ParseError;

/// An error raised while loading configuration or reading a value from it.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config '{origin}': {source}")]
    Parse {
        origin: String,
        source: toml::de::Error,
    },

    /// A key is present but its value has the wrong shape.
    #[error("Invalid value for '{key}': expected {expected}, found '{found}'")]
    InvalidValue {
        key: String,
        expected: &'static str,
        found: String,
    },

    /// A key holds a regular expression that does not compile.
    #[error("Invalid pattern '{pattern}' for '{key}': {source}")]
    InvalidPattern {
        key: String,
        pattern: String,
        source: regex::Error,
    },
}

/// Errors produced while analyzing source files.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to parse '{path}': {source}")]
    Parse { path: String, source: ParseError },

    /// A rule failed while visiting a tree. `rule_id` names the rule that
    /// failed, also when it ran as part of a composite rule.
    #[error("Rule '{rule_id}' failed: {source}")]
    Rule {
        rule_id: String,
        source: Box<Error>,
    },

    #[error("Failed to access baseline '{}': {source}", .path.display())]
    BaselineIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid baseline '{}': {source}", .path.display())]
    BaselineFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Error {
    /// Wrap an error raised by the rule `rule_id`.
    ///
    /// Errors that already name a rule are returned unchanged.
    pub fn in_rule(rule_id: &str, error: Error) -> Self {
        match error {
            Error::Rule { .. } => error,
            other => Error::Rule {
                rule_id: rule_id.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// Id of the rule that raised this error, if any.
    pub fn rule_id(&self) -> Option<&str> {
        match self {
            Error::Rule { rule_id, .. } => Some(rule_id),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
