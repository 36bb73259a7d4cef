//! Named groups of rules and how they are built from configuration.

use crate::config::Config;
use crate::error::{ConfigError, Error, Result};
use crate::finding::Finding;
use crate::multi_rule::MultiRule;
use crate::rule::{Rule, RuleRunner};
use tracing::{debug, warn};
use treelint_syntax::SyntaxTree;

/// What a rule set does when one of its members fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop and return the error.
    #[default]
    Abort,
    /// Log the error, drop that member's findings and keep going.
    SkipRule,
}

impl FailurePolicy {
    /// Read `engine.onRuleError` (`"abort"` or `"skip"`).
    pub fn from_config(config: &Config) -> std::result::Result<Self, ConfigError> {
        let engine = config.sub_config("engine");
        let raw = engine.get_str("onRuleError", "abort")?;
        match raw.as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "skip" => Ok(FailurePolicy::SkipRule),
            _ => Err(engine.invalid("onRuleError", "'abort' or 'skip'", raw)),
        }
    }
}

/// One entry of a rule set: a plain rule or a group sharing a traversal.
pub enum RuleSetMember {
    Single(RuleRunner),
    Multi(MultiRule),
}

impl RuleSetMember {
    pub fn rule<R: Rule + 'static>(rule: R) -> Self {
        RuleSetMember::Single(RuleRunner::new(rule))
    }

    pub fn multi(rules: Vec<Box<dyn Rule>>) -> Self {
        RuleSetMember::Multi(MultiRule::new(rules))
    }

    /// Ids of the rules in this member.
    pub fn rule_ids(&self) -> Vec<&str> {
        match self {
            RuleSetMember::Single(runner) => vec![runner.rule_id()],
            RuleSetMember::Multi(multi) => multi.rule_ids().collect(),
        }
    }

    pub(crate) fn set_rule_set_id(&mut self, id: &str) {
        match self {
            RuleSetMember::Single(runner) => runner.set_rule_set_id(id),
            RuleSetMember::Multi(multi) => multi.set_rule_set_id(id),
        }
    }

    pub(crate) fn visit(&mut self, tree: &SyntaxTree) -> Result<()> {
        match self {
            RuleSetMember::Single(runner) => runner.visit(tree),
            RuleSetMember::Multi(multi) => multi.visit(tree),
        }
    }

    pub(crate) fn take_findings(&mut self) -> Vec<Finding> {
        match self {
            RuleSetMember::Single(runner) => runner.take_findings(),
            RuleSetMember::Multi(multi) => multi.take_findings(),
        }
    }
}

impl From<RuleRunner> for RuleSetMember {
    fn from(runner: RuleRunner) -> Self {
        RuleSetMember::Single(runner)
    }
}

impl From<MultiRule> for RuleSetMember {
    fn from(multi: MultiRule) -> Self {
        RuleSetMember::Multi(multi)
    }
}

/// A member that failed under [`FailurePolicy::SkipRule`].
#[derive(Debug)]
pub struct RuleFailure {
    pub rule_set_id: String,
    pub rule_id: String,
    pub error: Error,
}

/// A named, ordered collection of rules.
pub struct RuleSet {
    id: String,
    members: Vec<RuleSetMember>,
    policy: FailurePolicy,
    failures: Vec<RuleFailure>,
}

impl RuleSet {
    /// Every member runs under this rule set's id, which suppressions can name.
    pub fn new(id: impl Into<String>, members: Vec<RuleSetMember>) -> Self {
        let id = id.into();
        let mut members = members;
        for member in &mut members {
            member.set_rule_set_id(&id);
        }
        Self {
            id,
            members,
            policy: FailurePolicy::default(),
            failures: Vec::new(),
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn members(&self) -> &[RuleSetMember] {
        &self.members
    }

    pub fn rule_ids(&self) -> Vec<&str> {
        self.members.iter().flat_map(|m| m.rule_ids()).collect()
    }

    /// Failures skipped during the last [`execute`](Self::execute).
    pub fn failures(&self) -> &[RuleFailure] {
        &self.failures
    }

    pub fn take_failures(&mut self) -> Vec<RuleFailure> {
        std::mem::take(&mut self.failures)
    }

    /// Run every member over `tree` and return the findings in member order.
    pub fn execute(&mut self, tree: &SyntaxTree) -> Result<Vec<Finding>> {
        self.failures.clear();
        let mut findings = Vec::new();

        for member in &mut self.members {
            match member.visit(tree) {
                Ok(()) => findings.extend(member.take_findings()),
                Err(error) => match self.policy {
                    FailurePolicy::Abort => return Err(error),
                    FailurePolicy::SkipRule => {
                        member.take_findings();
                        let rule_id = error
                            .rule_id()
                            .map(str::to_string)
                            .unwrap_or_else(|| member.rule_ids().join(","));
                        warn!(
                            rule_set = %self.id,
                            rule = %rule_id,
                            file = %tree.file_name(),
                            "skipping rule after error: {}",
                            error
                        );
                        self.failures.push(RuleFailure {
                            rule_set_id: self.id.clone(),
                            rule_id,
                            error,
                        });
                    }
                },
            }
        }

        debug!(
            rule_set = %self.id,
            file = %tree.file_name(),
            findings = findings.len(),
            "rule set executed"
        );
        Ok(findings)
    }
}

/// Builds a fresh [`RuleSet`] from configuration.
///
/// Providers are shared between threads; every analyzed file gets its own
/// rule set instance.
pub trait RuleSetProvider: Send + Sync {
    fn rule_set_id(&self) -> &'static str;

    /// Build the rule set. `config` is scoped to [`rule_set_id`](Self::rule_set_id).
    fn instance(&self, config: &Config) -> RuleSet;
}
