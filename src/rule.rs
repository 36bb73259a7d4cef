//! The rule abstraction and its per-file execution.
//!
//! A [`Rule`] only inspects nodes and reports findings; everything around it
//! (activation, aliases, severity overrides, suppression and clearing state
//! between files) is handled by the [`RuleRunner`] that owns it.

use crate::config::Config;
use crate::error::{ConfigError, Error, Result};
use crate::finding::{Finding, Issue, Severity};
use crate::suppression::RuleIdentity;
use tracing::{debug, trace};
use treelint_syntax::{NodeId, SyntaxTree};

/// A single check over a syntax tree.
pub trait Rule: Send {
    /// What this rule reports. `issue().id` is the rule id.
    fn issue(&self) -> &Issue;

    /// Configuration scoped to this rule.
    fn config(&self) -> &Config;

    fn rule_id(&self) -> &str {
        &self.issue().id
    }

    /// Aliases that suppress this rule in addition to the configured `aliases`.
    fn default_aliases(&self) -> &[&'static str] {
        &[]
    }

    /// Called once per file before any node is visited, only when the rule
    /// is active. Read and validate configuration here.
    fn start_file(&mut self, _tree: &SyntaxTree) -> Result<()> {
        Ok(())
    }

    /// Called for every node of the tree in preorder.
    fn visit_node(&mut self, node: NodeId, ctx: &mut RuleContext<'_>) -> Result<()>;

    /// Called after the last node of a file.
    fn finish_file(&mut self, _ctx: &mut RuleContext<'_>) -> Result<()> {
        Ok(())
    }
}

/// Access to the tree being visited and the sink for findings.
pub struct RuleContext<'a> {
    tree: &'a SyntaxTree,
    identity: &'a RuleIdentity,
    severity: Option<Severity>,
    findings: &'a mut Vec<Finding>,
    suppressed: &'a mut usize,
}

impl<'a> RuleContext<'a> {
    pub fn tree(&self) -> &'a SyntaxTree {
        self.tree
    }

    pub fn identity(&self) -> &'a RuleIdentity {
        self.identity
    }

    /// Record a finding unless its node, or an enclosing one, suppresses the rule.
    pub fn report(&mut self, mut finding: Finding) {
        if self.identity.is_suppressed_at(self.tree, finding.entity.node) {
            trace!(
                rule = %self.identity.rule_id,
                entity = %finding.entity.signature,
                "finding suppressed"
            );
            *self.suppressed += 1;
            return;
        }
        finding.rule_set_id = self.identity.rule_set_id.clone();
        if let Some(severity) = self.severity {
            finding.severity = severity;
        }
        self.findings.push(finding);
    }
}

/// Settings resolved when a file starts.
struct FileState {
    identity: RuleIdentity,
    severity: Option<Severity>,
}

/// Owns a rule and runs it over one file at a time.
///
/// Findings belong to the last visited file; each [`visit`](Self::visit)
/// starts from an empty list.
pub struct RuleRunner {
    rule: Box<dyn Rule>,
    rule_set_id: Option<String>,
    state: Option<FileState>,
    findings: Vec<Finding>,
    suppressed: usize,
}

impl RuleRunner {
    pub fn new<R: Rule + 'static>(rule: R) -> Self {
        Self::from_boxed(Box::new(rule))
    }

    pub fn from_boxed(rule: Box<dyn Rule>) -> Self {
        Self {
            rule,
            rule_set_id: None,
            state: None,
            findings: Vec::new(),
            suppressed: 0,
        }
    }

    /// Run as a member of the rule set `id`, which makes `id` usable in suppressions.
    pub fn with_rule_set_id(mut self, id: impl Into<String>) -> Self {
        self.rule_set_id = Some(id.into());
        self
    }

    pub(crate) fn set_rule_set_id(&mut self, id: &str) {
        self.rule_set_id = Some(id.to_string());
    }

    pub fn rule(&self) -> &dyn Rule {
        self.rule.as_ref()
    }

    pub fn rule_id(&self) -> &str {
        self.rule.rule_id()
    }

    pub fn rule_set_id(&self) -> Option<&str> {
        self.rule_set_id.as_deref()
    }

    /// Findings of the last visited file.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn take_findings(&mut self) -> Vec<Finding> {
        std::mem::take(&mut self.findings)
    }

    /// Number of findings dropped by suppressions in the last visited file.
    pub fn suppressed_count(&self) -> usize {
        self.suppressed
    }

    /// Visit every node of `tree` and collect the findings of this file.
    pub fn visit(&mut self, tree: &SyntaxTree) -> Result<()> {
        if !self.prepare(tree)? {
            return Ok(());
        }
        for node in tree.preorder() {
            self.visit_node(tree, node)?;
        }
        self.finish(tree)
    }

    /// Reset state for a new file and decide whether the rule takes part.
    ///
    /// Returns false when the rule is inactive or suppressed for the whole
    /// file; nothing of the rule is evaluated in that case.
    pub(crate) fn prepare(&mut self, tree: &SyntaxTree) -> Result<bool> {
        self.findings.clear();
        self.suppressed = 0;
        self.state = None;

        let identity = match self.resolve_identity() {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                debug!(rule = %self.rule_id(), "rule is inactive");
                return Ok(false);
            }
            Err(e) => return Err(Error::in_rule(self.rule_id(), e.into())),
        };
        let severity = self
            .resolve_severity()
            .map_err(|e| Error::in_rule(self.rule_id(), e.into()))?;

        if identity.is_suppressed_at(tree, tree.root()) {
            debug!(rule = %self.rule_id(), file = %tree.file_name(), "rule is suppressed for file");
            return Ok(false);
        }

        if let Err(e) = self.rule.start_file(tree) {
            return Err(Error::in_rule(self.rule_id(), e));
        }
        self.state = Some(FileState { identity, severity });
        Ok(true)
    }

    fn resolve_identity(&self) -> std::result::Result<Option<RuleIdentity>, ConfigError> {
        let config = self.rule.config();
        if !config.get_bool("active", true)? {
            return Ok(None);
        }
        let mut aliases = config.get_list("aliases", &[])?;
        for alias in self.rule.default_aliases() {
            if !aliases.iter().any(|a| a == alias) {
                aliases.push(alias.to_string());
            }
        }
        Ok(Some(RuleIdentity {
            rule_id: self.rule_id().to_string(),
            rule_set_id: self.rule_set_id.clone(),
            aliases,
        }))
    }

    fn resolve_severity(&self) -> std::result::Result<Option<Severity>, ConfigError> {
        let config = self.rule.config();
        match config.get_opt_str("severity")? {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| config.invalid("severity", "'error', 'warning', or 'info'", raw)),
        }
    }

    /// Dispatch one node to the rule. A no-op unless [`prepare`](Self::prepare)
    /// returned true for the current file.
    pub(crate) fn visit_node(&mut self, tree: &SyntaxTree, node: NodeId) -> Result<()> {
        let Some(state) = &self.state else {
            return Ok(());
        };
        let mut ctx = RuleContext {
            tree,
            identity: &state.identity,
            severity: state.severity,
            findings: &mut self.findings,
            suppressed: &mut self.suppressed,
        };
        let result = self.rule.visit_node(node, &mut ctx);
        result.map_err(|e| Error::in_rule(self.rule.rule_id(), e))
    }

    pub(crate) fn finish(&mut self, tree: &SyntaxTree) -> Result<()> {
        let Some(state) = self.state.take() else {
            return Ok(());
        };
        let mut ctx = RuleContext {
            tree,
            identity: &state.identity,
            severity: state.severity,
            findings: &mut self.findings,
            suppressed: &mut self.suppressed,
        };
        let result = self.rule.finish_file(&mut ctx);
        result.map_err(|e| Error::in_rule(self.rule.rule_id(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::{Debt, Entity};
    use treelint_syntax::{parse_string, NodeKind};

    /// Reports every class-like declaration.
    struct ClassReporter {
        issue: Issue,
        config: Config,
    }

    impl ClassReporter {
        fn new(config: Config) -> Self {
            Self {
                issue: Issue::new("Test", Severity::Warning, "", Debt::TWENTY_MINS),
                config,
            }
        }
    }

    impl Rule for ClassReporter {
        fn issue(&self) -> &Issue {
            &self.issue
        }

        fn config(&self) -> &Config {
            &self.config
        }

        fn visit_node(&mut self, node: NodeId, ctx: &mut RuleContext<'_>) -> Result<()> {
            let tree = ctx.tree();
            if tree.get(node).kind.is_class_like() {
                let finding = Finding::new(&self.issue, Entity::from_node(tree, node), "class");
                ctx.report(finding);
            }
            Ok(())
        }
    }

    #[test]
    fn test_findings_do_not_leak_between_files() {
        let first = parse_string("class A\nclass B\n").unwrap();
        let second = parse_string("object C\n").unwrap();
        let mut runner = RuleRunner::new(ClassReporter::new(Config::empty()));

        runner.visit(&first).unwrap();
        assert_eq!(runner.findings().len(), 2);

        runner.visit(&second).unwrap();
        assert_eq!(runner.findings().len(), 1);
        assert_eq!(runner.findings()[0].entity.name, "C");
    }

    #[test]
    fn test_inactive_rule_does_nothing() {
        let tree = parse_string("class A\n").unwrap();
        let mut runner = RuleRunner::new(ClassReporter::new(Config::from_pairs([(
            "active", "false",
        )])));

        runner.visit(&tree).unwrap();
        assert!(runner.findings().is_empty());
    }

    #[test]
    fn test_file_suppression_skips_the_rule() {
        let tree = parse_string("@file:Suppress(\"Detekt.ALL\")\nobject Suppressed\n").unwrap();
        let mut runner = RuleRunner::new(ClassReporter::new(Config::empty()));

        runner.visit(&tree).unwrap();
        assert!(runner.findings().is_empty());
        assert_eq!(runner.suppressed_count(), 0);
    }

    #[test]
    fn test_suppressed_findings_are_counted() {
        let tree = parse_string("@Suppress(\"Test\")\nclass A\nclass B\n").unwrap();
        let mut runner = RuleRunner::new(ClassReporter::new(Config::empty()));

        runner.visit(&tree).unwrap();
        assert_eq!(runner.findings().len(), 1);
        assert_eq!(runner.suppressed_count(), 1);
    }

    #[test]
    fn test_configured_aliases_and_severity() {
        let tree = parse_string("@Suppress(\"MyTest\")\nclass A\nclass B\n").unwrap();
        let config = Config::from_pairs([("aliases", "[MyTest]"), ("severity", "info")]);
        let mut runner = RuleRunner::new(ClassReporter::new(config)).with_rule_set_id("style");

        runner.visit(&tree).unwrap();
        let findings = runner.take_findings();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Info);
        assert_eq!(findings[0].rule_set_id.as_deref(), Some("style"));
    }

    #[test]
    fn test_invalid_severity_is_a_rule_error() {
        let tree = parse_string("class A\n").unwrap();
        let config = Config::from_pairs([("severity", "fatal")]);
        let mut runner = RuleRunner::new(ClassReporter::new(config));

        let error = runner.visit(&tree).unwrap_err();
        assert_eq!(error.rule_id(), Some("Test"));
    }

    #[test]
    fn test_reports_interfaces() {
        let tree = parse_string("interface I\n").unwrap();
        let mut runner = RuleRunner::new(ClassReporter::new(Config::empty()));
        runner.visit(&tree).unwrap();
        assert_eq!(
            tree.get(runner.findings()[0].entity.node).kind,
            NodeKind::Interface
        );
    }
}
