//! In-source suppression of findings.
//!
//! A finding is suppressed when the node it points at, or any of that node's
//! ancestors up to and including the file, carries a suppression annotation
//! naming the rule.
//!
//! # Annotation Format
//!
//! ```kotlin
//! @file:Suppress("complexity")                 // whole rule set, whole file
//!
//! @Suppress("LongParameterList")               // rule id
//! fun configure(a: Int, b: Int, c: Int, d: Int, e: Int, f: Int) = Unit
//!
//! @SuppressWarnings("detekt:naming:FunctionNaming", "all")
//! fun Run() = Unit
//! ```
//!
//! - `Suppress` and `SuppressWarnings` are recognized, with or without a
//!   package qualifier
//! - An argument may start with a case-insensitive `detekt:` or `detekt.` prefix
//! - The rest is either one name (`all`, the rule id, an alias or the rule set
//!   id) or `ruleSet:name` / `ruleSet.name` where `name` is the rule id, an
//!   alias or `all`
//! - `all` is case-insensitive; every other name is compared exactly

use treelint_syntax::{Annotation, Node, NodeId, SyntaxTree};

/// Namespace prefix accepted in front of any suppression argument.
const NAMESPACE: &str = "detekt";

/// Argument suppressing every rule.
const ALL: &str = "all";

/// The kind of annotation that acts as a suppression directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    Suppress,
    SuppressWarnings,
}

impl DirectiveKind {
    /// Classify an annotation by its simple name; other annotations are not directives.
    pub fn of(annotation: &Annotation) -> Option<Self> {
        match annotation.simple_name() {
            "Suppress" => Some(DirectiveKind::Suppress),
            "SuppressWarnings" => Some(DirectiveKind::SuppressWarnings),
            _ => None,
        }
    }
}

/// A suppression annotation and its string arguments.
#[derive(Debug, Clone, Copy)]
pub struct Directive<'a> {
    pub kind: DirectiveKind,
    pub arguments: &'a [String],
}

/// Suppression directives attached directly to `node`.
pub fn directives(node: &Node) -> impl Iterator<Item = Directive<'_>> {
    node.annotations.iter().filter_map(|annotation| {
        DirectiveKind::of(annotation).map(|kind| Directive {
            kind,
            arguments: &annotation.args,
        })
    })
}

/// One parsed suppression argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Argument<'a> {
    /// `all` in any letter case.
    All,
    /// A single name: rule id, alias or rule set id.
    Name(&'a str),
    /// `ruleSet:name`, where `name` may itself be `all`.
    ///
    /// `ruleSet:all` is accepted on purpose and suppresses every rule of
    /// that rule set, like the bare `ruleSet` form.
    Scoped { rule_set: &'a str, name: &'a str },
    /// Anything else; never matches.
    Invalid,
}

impl<'a> Argument<'a> {
    pub fn parse(raw: &'a str) -> Self {
        let rest = strip_namespace(raw);
        if rest.is_empty() {
            return Argument::Invalid;
        }

        let mut segments = rest.split([':', '.']);
        match (segments.next(), segments.next(), segments.next()) {
            (Some(name), None, None) if name.eq_ignore_ascii_case(ALL) => Argument::All,
            (Some(name), None, None) => Argument::Name(name),
            (Some(rule_set), Some(name), None) if !rule_set.is_empty() && !name.is_empty() => {
                Argument::Scoped { rule_set, name }
            }
            _ => Argument::Invalid,
        }
    }

    /// Check whether this argument names the rule described by `identity`.
    pub fn matches(&self, identity: &RuleIdentity) -> bool {
        match *self {
            Argument::All => true,
            Argument::Name(name) => {
                identity.names_rule(name) || identity.rule_set_id.as_deref() == Some(name)
            }
            Argument::Scoped { rule_set, name } => {
                identity.rule_set_id.as_deref() == Some(rule_set)
                    && (name.eq_ignore_ascii_case(ALL) || identity.names_rule(name))
            }
            Argument::Invalid => false,
        }
    }
}

fn strip_namespace(raw: &str) -> &str {
    let Some(prefix) = raw.get(..NAMESPACE.len()) else {
        return raw;
    };
    if !prefix.eq_ignore_ascii_case(NAMESPACE) {
        return raw;
    }
    let rest = &raw[NAMESPACE.len()..];
    rest.strip_prefix(':')
        .or_else(|| rest.strip_prefix('.'))
        .unwrap_or(raw)
}

/// Everything a suppression argument can refer to for one rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleIdentity {
    pub rule_id: String,
    pub rule_set_id: Option<String>,
    pub aliases: Vec<String>,
}

impl RuleIdentity {
    pub fn new(rule_id: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            ..Self::default()
        }
    }

    pub fn with_rule_set(mut self, rule_set_id: impl Into<String>) -> Self {
        self.rule_set_id = Some(rule_set_id.into());
        self
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    fn names_rule(&self, name: &str) -> bool {
        self.rule_id == name || self.aliases.iter().any(|alias| alias == name)
    }

    /// Check whether `node` or one of its ancestors suppresses this rule
    pub fn is_suppressed_at(&self, tree: &SyntaxTree, node: NodeId) -> bool {
        tree.ancestors(node)
            .any(|ancestor| self.is_suppressed_by(tree.get(ancestor)))
    }

    /// Check whether annotations directly on `node` suppress this rule
    pub fn is_suppressed_by(&self, node: &Node) -> bool {
        directives(node)
            .flat_map(|directive| directive.arguments.iter())
            .any(|argument| Argument::parse(argument).matches(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treelint_syntax::{parse_string, NodeKind, TreeBuilder};

    fn is_suppressed_by(annotation: &str, argument: &str) -> bool {
        let source = format!("@{}(\"{}\")\nclass Test\n", annotation, argument);
        let tree = parse_string(&source).unwrap();
        let class = tree.nodes_of_kind(NodeKind::Class).next().unwrap();
        RuleIdentity::new("Test")
            .with_aliases(["alias"])
            .is_suppressed_at(&tree, class)
    }

    #[test]
    fn test_not_suppressed_by_other_annotations() {
        assert!(!is_suppressed_by("Deprecated", "This should no longer be used"));
        assert!(!is_suppressed_by("Deprecated", "Test"));
    }

    #[test]
    fn test_not_suppressed_for_another_rule() {
        assert!(!is_suppressed_by("Suppress", "NotATest"));
        assert!(!is_suppressed_by("SuppressWarnings", "NotATest"));
    }

    #[test]
    fn test_suppressed_by_rule_id() {
        assert!(is_suppressed_by("Suppress", "Test"));
        assert!(is_suppressed_by("SuppressWarnings", "Test"));
        assert!(is_suppressed_by("kotlin.Suppress", "Test"));
    }

    #[test]
    fn test_suppressed_by_all() {
        assert!(is_suppressed_by("Suppress", "all"));
        assert!(is_suppressed_by("SuppressWarnings", "ALL"));
        assert!(is_suppressed_by("Suppress", "aLl"));
        assert!(!is_suppressed_by("Suppress", "Allx"));
    }

    #[test]
    fn test_foreign_prefix_is_not_accepted() {
        assert!(!is_suppressed_by("Suppress", "Checkstyle:Test"));
        assert!(!is_suppressed_by("SuppressWarnings", "Checkstyle:Test"));
    }

    #[test]
    fn test_namespace_prefix() {
        for argument in ["Detekt:Test", "detekt:Test", "detekt.Test", "DETEKT.Test"] {
            assert!(is_suppressed_by("Suppress", argument), "{}", argument);
            assert!(is_suppressed_by("SuppressWarnings", argument), "{}", argument);
        }
    }

    #[test]
    fn test_wrong_separator() {
        assert!(!is_suppressed_by("Suppress", "detekt/Test"));
        assert!(!is_suppressed_by("SuppressWarnings", "detekt/Test"));
    }

    #[test]
    fn test_suppressed_by_alias() {
        assert!(is_suppressed_by("Suppress", "alias"));
        assert!(is_suppressed_by("SuppressWarnings", "alias"));
    }

    #[test]
    fn test_names_are_compared_exactly() {
        assert!(!is_suppressed_by("Suppress", "test"));
        assert!(!is_suppressed_by("Suppress", "Tes"));
        assert!(!is_suppressed_by("Suppress", "TestRule"));
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!(Argument::parse("ALL"), Argument::All);
        assert_eq!(Argument::parse("detekt.all"), Argument::All);
        assert_eq!(Argument::parse("LongMethod"), Argument::Name("LongMethod"));
        assert_eq!(
            Argument::parse("detekt:complexity:LongMethod"),
            Argument::Scoped {
                rule_set: "complexity",
                name: "LongMethod"
            }
        );
        assert_eq!(
            Argument::parse("complexity.LongMethod"),
            Argument::Scoped {
                rule_set: "complexity",
                name: "LongMethod"
            }
        );
        assert_eq!(Argument::parse("detekt:"), Argument::Invalid);
        assert_eq!(Argument::parse(""), Argument::Invalid);
        assert_eq!(Argument::parse("a.b.c"), Argument::Invalid);
        assert_eq!(Argument::parse("complexity:"), Argument::Invalid);
    }

    #[test]
    fn test_rule_set_forms() {
        let identity = RuleIdentity::new("LongParameterList").with_rule_set("complexity");
        let matches = |raw: &str| Argument::parse(raw).matches(&identity);

        assert!(matches("complexity"));
        assert!(matches("detekt.complexity"));
        assert!(matches("complexity.LongParameterList"));
        assert!(matches("complexity:LongParameterList"));
        assert!(matches("detekt:complexity:LongParameterList"));
        assert!(matches("detekt.complexity.LongParameterList"));
        assert!(matches("complexity:all"));
        assert!(!matches("naming"));
        assert!(!matches("naming:LongParameterList"));
        assert!(!matches("complexity:LongMethod"));
        assert!(!matches("wrong_name_used"));
    }

    #[test]
    fn test_rule_set_id_needs_a_rule_set() {
        let identity = RuleIdentity::new("LongParameterList");
        assert!(!Argument::parse("complexity").matches(&identity));
        assert!(!Argument::parse("complexity:LongParameterList").matches(&identity));
        assert!(Argument::parse("LongParameterList").matches(&identity));
    }

    #[test]
    fn test_alias_in_rule_set_form() {
        let identity = RuleIdentity::new("FunctionNaming")
            .with_rule_set("naming")
            .with_aliases(["FunctionName"]);
        assert!(Argument::parse("naming:FunctionName").matches(&identity));
        assert!(Argument::parse("detekt:FunctionName").matches(&identity));
    }

    #[test]
    fn test_suppression_walks_to_file_root() {
        let tree = parse_string(
            "@file:Suppress(\"Test\")\n\nclass A {\n    fun f(x: Int) = x\n}\n",
        )
        .unwrap();
        let parameter = tree.nodes_of_kind(NodeKind::Parameter).next().unwrap();
        let identity = RuleIdentity::new("Test");

        assert!(identity.is_suppressed_at(&tree, parameter));
        assert!(identity.is_suppressed_by(tree.get(tree.root())));
        assert!(!identity.is_suppressed_by(tree.get(parameter)));
    }

    #[test]
    fn test_suppression_does_not_leak_to_siblings() {
        let tree = parse_string(
            "class A {\n    @Suppress(\"Test\")\n    fun f() = Unit\n    fun g() = Unit\n}\n",
        )
        .unwrap();
        let mut functions = tree.nodes_of_kind(NodeKind::Function);
        let f = functions.next().unwrap();
        let g = functions.next().unwrap();
        let identity = RuleIdentity::new("Test");

        assert!(identity.is_suppressed_at(&tree, f));
        assert!(!identity.is_suppressed_at(&tree, g));
    }

    #[test]
    fn test_grouped_annotation_suppresses() {
        let tree = parse_string("@[Suppress(\"Test\")]\nclass Test\n").unwrap();
        let class = tree.nodes_of_kind(NodeKind::Class).next().unwrap();
        assert!(RuleIdentity::new("Test").is_suppressed_at(&tree, class));
        assert!(!RuleIdentity::new("Other").is_suppressed_at(&tree, class));

        let tree = parse_string("@[Deprecated(\"x\") SuppressWarnings(\"Test\")]\nclass Test\n")
            .unwrap();
        let class = tree.nodes_of_kind(NodeKind::Class).next().unwrap();
        assert!(RuleIdentity::new("Test").is_suppressed_at(&tree, class));
    }

    #[test]
    fn test_any_argument_of_a_directive_suppresses() {
        let mut builder = TreeBuilder::new("Sample.kt");
        let class = builder.add(
            builder.root(),
            treelint_syntax::Node::new(NodeKind::Class).with_annotation(Annotation::new(
                "SuppressWarnings",
                vec!["unused".to_string(), "Test".to_string()],
            )),
        );
        let tree = builder.build();
        assert!(RuleIdentity::new("Test").is_suppressed_at(&tree, class));
        assert!(!RuleIdentity::new("Other").is_suppressed_at(&tree, class));
    }
}
