//! Configuration loaded from `.treelint.toml`.
//!
//! The file is a TOML document with one table per rule set and one nested
//! table per rule:
//!
//! ```toml
//! [engine]
//! onRuleError = "skip"
//!
//! [complexity.LongParameterList]
//! threshold = 5
//!
//! [naming.FunctionNaming]
//! aliases = ["FunctionName", "MethodName"]
//! functionPattern = "[a-z][a-zA-Z0-9]*"
//! ```
//!
//! A [`Config`] is an immutable, cheaply cloned view of one table. Rules
//! receive the view scoped to their own table and read typed values with a
//! default, so a missing key never fails while a malformed one always does.

use crate::error::ConfigError;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use toml::{Table, Value};

/// Name of the configuration file searched by [`Config::find_and_load`].
pub const CONFIG_FILE_NAME: &str = ".treelint.toml";

/// A read-only view of one configuration table.
#[derive(Debug, Clone, Default)]
pub struct Config {
    values: Arc<Table>,
    /// Views of the nested tables, built once when the document is loaded.
    tables: Arc<BTreeMap<String, Config>>,
    /// Dotted path of this table from the document root, for error messages.
    path: String,
}

impl Config {
    /// Configuration without any keys; every lookup yields its default.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<inline>")
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Find and load `.treelint.toml` from the given directory or its parents
    pub fn find_and_load(dir: &Path) -> Result<Option<Self>, ConfigError> {
        let mut current = dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Self::from_file(&config_path).map(Some);
            }

            if !current.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Flat configuration from string pairs, mostly useful in tests.
    ///
    /// Values keep their string form and are coerced on lookup, so
    /// `("active", "false")` reads as a boolean.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), Value::String(v.into())))
            .collect();
        Self::from_table(values, String::new())
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let values: Table = toml::from_str(content).map_err(|e| ConfigError::Parse {
            origin: origin.to_string(),
            source: e,
        })?;
        Ok(Self::from_table(values, String::new()))
    }

    fn from_table(values: Table, path: String) -> Self {
        let tables = values
            .iter()
            .filter_map(|(key, value)| match value {
                Value::Table(nested) => {
                    let nested_path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", path, key)
                    };
                    Some((key.clone(), Config::from_table(nested.clone(), nested_path)))
                }
                _ => None,
            })
            .collect();
        Self {
            values: Arc::new(values),
            tables: Arc::new(tables),
            path,
        }
    }

    /// The nested table `id`, or an empty view when it is absent.
    pub fn sub_config(&self, id: &str) -> Config {
        match self.tables.get(id) {
            Some(config) => config.clone(),
            None => Config {
                path: self.qualified(id),
                ..Config::default()
            },
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Dotted path of this view (`""` for the document root).
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.values.get(key) {
            None => Ok(default),
            Some(Value::Boolean(b)) => Ok(*b),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map_err(|_| self.invalid(key, "a boolean", s.clone())),
            Some(other) => Err(self.invalid(key, "a boolean", other.to_string())),
        }
    }

    pub fn get_int(&self, key: &str, default: i64) -> Result<i64, ConfigError> {
        match self.values.get(key) {
            None => Ok(default),
            Some(Value::Integer(i)) => Ok(*i),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map_err(|_| self.invalid(key, "an integer", s.clone())),
            Some(other) => Err(self.invalid(key, "an integer", other.to_string())),
        }
    }

    pub fn get_str(&self, key: &str, default: &str) -> Result<String, ConfigError> {
        Ok(self
            .get_opt_str(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// A string value, or `None` when the key is absent.
    pub fn get_opt_str(&self, key: &str) -> Result<Option<String>, ConfigError> {
        match self.values.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.invalid(key, "a string", other.to_string())),
        }
    }

    /// A list of strings.
    ///
    /// Accepts a TOML array of strings, or a single string holding a
    /// comma separated list with optional brackets (`"[a, b]"`, `"a,b"`).
    pub fn get_list(&self, key: &str, default: &[&str]) -> Result<Vec<String>, ConfigError> {
        match self.values.get(key) {
            None => Ok(default.iter().map(|s| s.to_string()).collect()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(self.invalid(key, "a list of strings", other.to_string())),
                })
                .collect(),
            Some(Value::String(s)) => Ok(split_list(s)),
            Some(other) => Err(self.invalid(key, "a list of strings", other.to_string())),
        }
    }

    /// A regular expression that must match a whole name.
    pub fn get_pattern(&self, key: &str, default: &str) -> Result<Regex, ConfigError> {
        let pattern = self.get_str(key, default)?;
        Regex::new(&format!("^(?:{pattern})$")).map_err(|e| ConfigError::InvalidPattern {
            key: self.qualified(key),
            pattern,
            source: e,
        })
    }

    fn qualified(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    pub(crate) fn invalid(&self, key: &str, expected: &'static str, found: String) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.qualified(key),
            expected,
            found,
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(trimmed);
    inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
