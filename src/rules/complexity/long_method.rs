use crate::config::Config;
use crate::error::Result;
use crate::finding::{Debt, Entity, Finding, Issue, Severity};
use crate::rule::{Rule, RuleContext};
use treelint_syntax::{NodeId, NodeKind, SyntaxTree};

/// Check for functions spanning too many lines
pub struct LongMethod {
    issue: Issue,
    config: Config,
    threshold: usize,
}

impl LongMethod {
    pub const ID: &'static str = "LongMethod";
    pub const THRESHOLD: &'static str = "threshold";
    pub const DEFAULT_THRESHOLD: i64 = 60;

    pub fn new(config: Config) -> Self {
        Self {
            issue: Issue::new(
                Self::ID,
                Severity::Warning,
                "One method should have one responsibility. Long methods tend to handle \
                 many things at once. Extract smaller methods.",
                Debt::TWENTY_MINS,
            ),
            config,
            threshold: Self::DEFAULT_THRESHOLD as usize,
        }
    }
}

impl Default for LongMethod {
    fn default() -> Self {
        Self::new(Config::empty())
    }
}

impl Rule for LongMethod {
    fn issue(&self) -> &Issue {
        &self.issue
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn start_file(&mut self, _tree: &SyntaxTree) -> Result<()> {
        let threshold = self
            .config
            .get_int(Self::THRESHOLD, Self::DEFAULT_THRESHOLD)?;
        if threshold < 1 {
            return Err(self
                .config
                .invalid(Self::THRESHOLD, "a positive integer", threshold.to_string())
                .into());
        }
        self.threshold = threshold as usize;
        Ok(())
    }

    fn visit_node(&mut self, id: NodeId, ctx: &mut RuleContext<'_>) -> Result<()> {
        let tree = ctx.tree();
        let node = tree.get(id);
        if node.kind != NodeKind::Function {
            return Ok(());
        }

        // The span starts at leading annotations and ends after the body.
        let lines = node.span.end.line.saturating_sub(node.span.start.line) + 1;
        if lines >= self.threshold {
            let name = node.name.as_deref().unwrap_or_default();
            ctx.report(Finding::new(
                &self.issue,
                Entity::from_node(tree, id),
                format!(
                    "The function {} is too long ({}). The maximum length is {}.",
                    name, lines, self.threshold
                ),
            ));
        }
        Ok(())
    }
}
