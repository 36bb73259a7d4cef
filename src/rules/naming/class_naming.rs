use crate::config::Config;
use crate::error::Result;
use crate::finding::{Debt, Entity, Finding, Issue, Severity};
use crate::rule::{Rule, RuleContext};
use regex::Regex;
use treelint_syntax::{NodeId, SyntaxTree};

/// Check that class, object and interface names follow the configured pattern
pub struct ClassNaming {
    issue: Issue,
    config: Config,
    pattern: Option<(String, Regex)>,
}

impl ClassNaming {
    pub const ID: &'static str = "ClassNaming";
    pub const CLASS_PATTERN: &'static str = "classPattern";

    const DEFAULT_CLASS_PATTERN: &'static str = "[A-Z][a-zA-Z0-9]*";

    pub fn new(config: Config) -> Self {
        Self {
            issue: Issue::new(
                Self::ID,
                Severity::Warning,
                "A class or object name should fit the naming pattern defined in the configuration.",
                Debt::FIVE_MINS,
            ),
            config,
            pattern: None,
        }
    }
}

impl Default for ClassNaming {
    fn default() -> Self {
        Self::new(Config::empty())
    }
}

impl Rule for ClassNaming {
    fn issue(&self) -> &Issue {
        &self.issue
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn default_aliases(&self) -> &[&'static str] {
        &["ClassName"]
    }

    fn start_file(&mut self, _tree: &SyntaxTree) -> Result<()> {
        if self.pattern.is_none() {
            let raw = self
                .config
                .get_str(Self::CLASS_PATTERN, Self::DEFAULT_CLASS_PATTERN)?;
            let regex = self
                .config
                .get_pattern(Self::CLASS_PATTERN, Self::DEFAULT_CLASS_PATTERN)?;
            self.pattern = Some((raw, regex));
        }
        Ok(())
    }

    fn visit_node(&mut self, id: NodeId, ctx: &mut RuleContext<'_>) -> Result<()> {
        let tree = ctx.tree();
        let node = tree.get(id);
        if !node.kind.is_class_like() {
            return Ok(());
        }
        // Companion objects and object expressions have no name
        let (Some(name), Some((raw, regex))) = (node.name.as_deref(), &self.pattern) else {
            return Ok(());
        };

        if !regex.is_match(name) {
            ctx.report(Finding::new(
                &self.issue,
                Entity::from_node(tree, id),
                format!("Class and Object names should match the pattern: {}", raw),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RuleTestRunner;

    #[test]
    fn test_reports_lowercase_class_names() {
        let mut runner = RuleTestRunner::new(ClassNaming::default());
        runner.assert_locations(
            "class fooBar\nobject _Registry\ninterface Shape\n",
            &[(1, 7), (2, 8)],
        );
    }

    #[test]
    fn test_companion_objects_are_ignored() {
        let mut runner = RuleTestRunner::new(ClassNaming::default());
        runner.assert_no_findings("class Widget {\n    companion object {\n        val X = 1\n    }\n}\n");
    }

    #[test]
    fn test_class_name_alias() {
        let mut runner = RuleTestRunner::new(ClassNaming::default());
        runner.assert_no_findings("@Suppress(\"ClassName\")\nclass lower_case\n");
    }

    #[test]
    fn test_custom_pattern() {
        let config = Config::from_pairs([(ClassNaming::CLASS_PATTERN, "[A-Z][a-z]+")]);
        let mut runner = RuleTestRunner::new(ClassNaming::new(config));
        runner.assert_findings("class HttpClient\nclass Client\n", 1);
    }
}
