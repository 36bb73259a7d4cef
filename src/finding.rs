//! Findings reported by rules and the metadata that describes them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use treelint_syntax::{NodeId, Span, SyntaxTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Info => write!(f, "INFO"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            other => Err(format!(
                "invalid severity '{}', expected 'error', 'warning', or 'info'",
                other
            )),
        }
    }
}

/// Estimated effort to fix a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Debt {
    pub days: u32,
    pub hours: u32,
    pub mins: u32,
}

impl Debt {
    pub const FIVE_MINS: Debt = Debt::new(0, 0, 5);
    pub const TEN_MINS: Debt = Debt::new(0, 0, 10);
    pub const TWENTY_MINS: Debt = Debt::new(0, 0, 20);

    pub const fn new(days: u32, hours: u32, mins: u32) -> Self {
        Self { days, hours, mins }
    }
}

impl fmt::Display for Debt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.days > 0 {
            parts.push(format!("{}d", self.days));
        }
        if self.hours > 0 {
            parts.push(format!("{}h", self.hours));
        }
        if self.mins > 0 || parts.is_empty() {
            parts.push(format!("{}min", self.mins));
        }
        write!(f, "{}", parts.join(" "))
    }
}

/// Static description of what a rule reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Rule id, also the name used in suppressions and configuration.
    pub id: String,
    pub severity: Severity,
    pub description: String,
    pub debt: Debt,
}

impl Issue {
    pub fn new(
        id: impl Into<String>,
        severity: Severity,
        description: impl Into<String>,
        debt: Debt,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            description: description.into(),
            debt,
        }
    }
}

/// A 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub start: SourceLocation,
    pub end: SourceLocation,
    pub file: String,
}

impl Location {
    pub fn from_span(span: Span, file: &str) -> Self {
        Self {
            start: SourceLocation::new(span.start.line, span.start.column),
            end: SourceLocation::new(span.end.line, span.end.column),
            file: file.to_string(),
        }
    }
}

/// The code element a finding points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub name: String,
    /// Stable identifier of the element: file name and the names of the
    /// enclosing declarations, e.g. `Test.kt$Service.run`.
    pub signature: String,
    pub location: Location,
    /// Node the finding was reported on; suppression is resolved from here.
    #[serde(skip)]
    pub node: NodeId,
}

impl Entity {
    pub fn from_node(tree: &SyntaxTree, id: NodeId) -> Self {
        let node = tree.get(id);
        let file = tree.file_name();
        let file_stem = Path::new(file)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.to_string());

        let mut names: Vec<&str> = tree
            .ancestors(id)
            .filter_map(|ancestor| tree.get(ancestor).name.as_deref())
            .collect();
        names.reverse();

        Self {
            name: node.name.clone().unwrap_or_else(|| file_stem.clone()),
            signature: format!("{}${}", file_stem, names.join(".")),
            location: Location::from_span(node.report_span(), file),
            node: id,
        }
    }
}

/// A single finding produced by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub rule_id: String,
    /// Set when the rule ran as a member of a rule set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_set_id: Option<String>,
    pub severity: Severity,
    pub debt: Debt,
    pub message: String,
    pub entity: Entity,
}

impl Finding {
    /// A finding for `issue` at `entity`. An empty message falls back to the
    /// issue description.
    pub fn new(issue: &Issue, entity: Entity, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            rule_id: issue.id.clone(),
            rule_set_id: None,
            severity: issue.severity,
            debt: issue.debt,
            message: if message.is_empty() {
                issue.description.clone()
            } else {
                message
            },
            entity,
        }
    }

    pub fn location(&self) -> &Location {
        &self.entity.location
    }

    /// Key identifying this finding across runs, used by baselines.
    pub fn baseline_id(&self) -> String {
        format!("{}:{}", self.rule_id, self.entity.signature)
    }
}
