//! Several rules sharing a single traversal.

use crate::error::Result;
use crate::finding::Finding;
use crate::rule::{Rule, RuleRunner};
use treelint_syntax::SyntaxTree;

/// A group of rules visited together in one preorder walk.
///
/// Each child keeps its own configuration, activation and suppression, so the
/// findings are the same as running every child on its own. Per node, children
/// are called in the order they were given.
pub struct MultiRule {
    rules: Vec<RuleRunner>,
}

impl MultiRule {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self {
            rules: rules.into_iter().map(RuleRunner::from_boxed).collect(),
        }
    }

    pub fn rules(&self) -> &[RuleRunner] {
        &self.rules
    }

    pub fn rule_ids(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|runner| runner.rule_id())
    }

    pub(crate) fn set_rule_set_id(&mut self, id: &str) {
        for runner in &mut self.rules {
            runner.set_rule_set_id(id);
        }
    }

    /// Visit `tree` once and dispatch every node to the participating rules.
    pub fn visit(&mut self, tree: &SyntaxTree) -> Result<()> {
        let mut participating = Vec::with_capacity(self.rules.len());
        for (index, runner) in self.rules.iter_mut().enumerate() {
            if runner.prepare(tree)? {
                participating.push(index);
            }
        }
        if participating.is_empty() {
            return Ok(());
        }

        for node in tree.preorder() {
            for &index in &participating {
                self.rules[index].visit_node(tree, node)?;
            }
        }
        for &index in &participating {
            self.rules[index].finish(tree)?;
        }
        Ok(())
    }

    /// Findings of the last visited file, in child order.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.rules.iter().flat_map(|runner| runner.findings())
    }

    pub fn take_findings(&mut self) -> Vec<Finding> {
        self.rules
            .iter_mut()
            .flat_map(|runner| runner.take_findings())
            .collect()
    }

    pub fn suppressed_count(&self) -> usize {
        self.rules.iter().map(RuleRunner::suppressed_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::finding::{Debt, Entity, Issue, Severity};
    use crate::rule::RuleContext;
    use treelint_syntax::{parse_string, NodeId, NodeKind};

    /// Reports every node of one kind and records the visit order in its message.
    struct KindReporter {
        issue: Issue,
        config: Config,
        kind: NodeKind,
    }

    impl KindReporter {
        fn boxed(id: &str, kind: NodeKind, config: Config) -> Box<dyn Rule> {
            Box::new(Self {
                issue: Issue::new(id, Severity::Warning, "", Debt::FIVE_MINS),
                config,
                kind,
            })
        }
    }

    impl Rule for KindReporter {
        fn issue(&self) -> &Issue {
            &self.issue
        }

        fn config(&self) -> &Config {
            &self.config
        }

        fn visit_node(&mut self, node: NodeId, ctx: &mut RuleContext<'_>) -> Result<()> {
            let tree = ctx.tree();
            if tree.get(node).kind == self.kind {
                ctx.report(Finding::new(&self.issue, Entity::from_node(tree, node), "found"));
            }
            Ok(())
        }
    }

    const CODE: &str = "class A {\n    fun f() = Unit\n}\nfun g() = Unit\n";

    #[test]
    fn test_findings_in_child_order() {
        let tree = parse_string(CODE).unwrap();
        let mut multi = MultiRule::new(vec![
            KindReporter::boxed("Functions", NodeKind::Function, Config::empty()),
            KindReporter::boxed("Classes", NodeKind::Class, Config::empty()),
        ]);

        multi.visit(&tree).unwrap();
        let ids: Vec<&str> = multi.findings().map(|f| f.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["Functions", "Functions", "Classes"]);
    }

    #[test]
    fn test_inactive_child_is_skipped() {
        let tree = parse_string(CODE).unwrap();
        let mut multi = MultiRule::new(vec![
            KindReporter::boxed(
                "Functions",
                NodeKind::Function,
                Config::from_pairs([("active", "false")]),
            ),
            KindReporter::boxed("Classes", NodeKind::Class, Config::empty()),
        ]);

        multi.visit(&tree).unwrap();
        assert_eq!(multi.findings().count(), 1);
    }

    #[test]
    fn test_children_are_suppressed_individually() {
        let tree = parse_string("@Suppress(\"Classes\")\nclass A {\n    fun f() = Unit\n}\n")
            .unwrap();
        let mut multi = MultiRule::new(vec![
            KindReporter::boxed("Functions", NodeKind::Function, Config::empty()),
            KindReporter::boxed("Classes", NodeKind::Class, Config::empty()),
        ]);

        multi.visit(&tree).unwrap();
        let findings = multi.take_findings();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule_id, "Functions");
        assert_eq!(multi.suppressed_count(), 1);
    }

    #[test]
    fn test_no_leak_between_visits() {
        let mut multi = MultiRule::new(vec![KindReporter::boxed(
            "Functions",
            NodeKind::Function,
            Config::empty(),
        )]);

        multi.visit(&parse_string(CODE).unwrap()).unwrap();
        multi.visit(&parse_string("class Empty\n").unwrap()).unwrap();
        assert_eq!(multi.findings().count(), 0);
    }
}
