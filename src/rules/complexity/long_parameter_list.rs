use crate::config::Config;
use crate::error::Result;
use crate::finding::{Debt, Entity, Finding, Issue, Severity};
use crate::rule::{Rule, RuleContext};
use treelint_syntax::{NodeId, NodeKind, SyntaxTree};

/// Check for functions that take too many parameters
pub struct LongParameterList {
    issue: Issue,
    config: Config,
    threshold: usize,
}

impl LongParameterList {
    pub const ID: &'static str = "LongParameterList";
    pub const THRESHOLD: &'static str = "threshold";
    pub const DEFAULT_THRESHOLD: i64 = 6;

    pub fn new(config: Config) -> Self {
        Self {
            issue: Issue::new(
                Self::ID,
                Severity::Warning,
                "Functions with many parameters are hard to call and to understand. \
                 Group related parameters into a class.",
                Debt::TWENTY_MINS,
            ),
            config,
            threshold: Self::DEFAULT_THRESHOLD as usize,
        }
    }
}

impl Default for LongParameterList {
    fn default() -> Self {
        Self::new(Config::empty())
    }
}

impl Rule for LongParameterList {
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

        let count = tree
            .children(id)
            .iter()
            .filter(|child| tree.get(**child).kind == NodeKind::Parameter)
            .count();
        if count >= self.threshold {
            let name = node.name.as_deref().unwrap_or_default();
            ctx.report(Finding::new(
                &self.issue,
                Entity::from_node(tree, id),
                format!(
                    "The function {} has {} parameters. The current threshold is set to {}.",
                    name, count, self.threshold
                ),
            ));
        }
        Ok(())
    }
}
