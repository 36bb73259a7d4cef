use crate::config::Config;
use crate::error::Result;
use crate::finding::{Debt, Entity, Finding, Issue, Severity};
use crate::rule::{Rule, RuleContext};
use regex::Regex;
use treelint_syntax::{NodeId, NodeKind, SyntaxTree};

/// Check that function names follow the configured pattern
///
/// Skipped: overriding functions (unless `ignoreOverridden` is false),
/// functions inside classes matching `excludeClassPattern`, and factory
/// functions named after the type they return (`fun Foo(): Foo`).
pub struct FunctionNaming {
    issue: Issue,
    config: Config,
    settings: Option<Settings>,
}

struct Settings {
    pattern: String,
    function: Regex,
    exclude_class: Regex,
    ignore_overridden: bool,
}

impl FunctionNaming {
    pub const ID: &'static str = "FunctionNaming";
    pub const FUNCTION_PATTERN: &'static str = "functionPattern";
    pub const EXCLUDE_CLASS_PATTERN: &'static str = "excludeClassPattern";
    pub const IGNORE_OVERRIDDEN: &'static str = "ignoreOverridden";

    const DEFAULT_FUNCTION_PATTERN: &'static str = "[a-z][a-zA-Z0-9]*";
    const DEFAULT_EXCLUDE_CLASS_PATTERN: &'static str = "$^";

    pub fn new(config: Config) -> Self {
        Self {
            issue: Issue::new(
                Self::ID,
                Severity::Warning,
                "Function names should follow the naming convention set in the configuration.",
                Debt::FIVE_MINS,
            ),
            config,
            settings: None,
        }
    }
}

impl Default for FunctionNaming {
    fn default() -> Self {
        Self::new(Config::empty())
    }
}

impl Rule for FunctionNaming {
    fn issue(&self) -> &Issue {
        &self.issue
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn default_aliases(&self) -> &[&'static str] {
        &["FunctionName"]
    }

    fn start_file(&mut self, _tree: &SyntaxTree) -> Result<()> {
        if self.settings.is_some() {
            return Ok(());
        }
        let config = &self.config;
        self.settings = Some(Settings {
            pattern: config.get_str(Self::FUNCTION_PATTERN, Self::DEFAULT_FUNCTION_PATTERN)?,
            function: config.get_pattern(Self::FUNCTION_PATTERN, Self::DEFAULT_FUNCTION_PATTERN)?,
            exclude_class: config
                .get_pattern(Self::EXCLUDE_CLASS_PATTERN, Self::DEFAULT_EXCLUDE_CLASS_PATTERN)?,
            ignore_overridden: config.get_bool(Self::IGNORE_OVERRIDDEN, true)?,
        });
        Ok(())
    }

    fn visit_node(&mut self, id: NodeId, ctx: &mut RuleContext<'_>) -> Result<()> {
        let tree = ctx.tree();
        let node = tree.get(id);
        if node.kind != NodeKind::Function {
            return Ok(());
        }
        let (Some(name), Some(settings)) = (node.name.as_deref(), &self.settings) else {
            return Ok(());
        };

        if settings.ignore_overridden && node.has_modifier("override") {
            return Ok(());
        }
        if node
            .return_type
            .as_deref()
            .is_some_and(|ty| ty.trim_end_matches('?') == name)
        {
            return Ok(());
        }
        if let Some(class) = tree.enclosing_class(id)
            && let Some(class_name) = tree.get(class).name.as_deref()
            && settings.exclude_class.is_match(class_name)
        {
            return Ok(());
        }

        if !settings.function.is_match(name) {
            ctx.report(Finding::new(
                &self.issue,
                Entity::from_node(tree, id),
                format!("Function names should match the pattern: {}", settings.pattern),
            ));
        }
        Ok(())
    }
}
