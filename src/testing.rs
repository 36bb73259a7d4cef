//! Testing utilities for rule development
//!
//! # Directory Structure
//!
//! Fixture directories hold one subdirectory per case:
//! ```text
//! tests/fixtures/rules/long_parameter_list/
//! └── 001_basic/
//!     ├── error/
//!     │   └── Source.kt    # Code that should trigger findings
//!     └── expected/
//!         └── Source.kt    # Code without findings for this rule
//! ```
//!
//! # Example
//!
//! ```
//! use treelint::config::Config;
//! use treelint::rules::complexity::LongParameterList;
//! use treelint::testing::RuleTestRunner;
//!
//! let config = Config::from_pairs([("threshold", "2")]);
//! let mut runner = RuleTestRunner::new(LongParameterList::new(config));
//! runner.assert_findings("fun f(a: Int, b: Int) = Unit", 1);
//! runner.assert_no_findings("fun f(a: Int) = Unit");
//! ```

use crate::finding::Finding;
use crate::multi_rule::MultiRule;
use crate::rule::{Rule, RuleRunner};
use crate::rule_set::RuleSetMember;
use std::path::{Path, PathBuf};
use treelint_syntax::{parse_named, parse_string};

/// Test runner for a rule or a group of rules
pub struct RuleTestRunner {
    member: RuleSetMember,
}

impl RuleTestRunner {
    pub fn new<R: Rule + 'static>(rule: R) -> Self {
        Self {
            member: RuleSetMember::Single(RuleRunner::new(rule)),
        }
    }

    /// Run several rules through one shared traversal
    pub fn multi(rules: Vec<Box<dyn Rule>>) -> Self {
        Self {
            member: RuleSetMember::Multi(MultiRule::new(rules)),
        }
    }

    /// Run as part of the rule set `id`
    pub fn in_rule_set(mut self, id: &str) -> Self {
        self.member.set_rule_set_id(id);
        self
    }

    fn rule_ids(&self) -> Vec<String> {
        self.member.rule_ids().into_iter().map(str::to_string).collect()
    }

    /// Run the rules on a source string
    pub fn check_string(&mut self, content: &str) -> Result<Vec<Finding>, String> {
        let tree = parse_string(content).map_err(|e| format!("Failed to parse source: {}", e))?;
        self.member
            .visit(&tree)
            .map_err(|e| format!("Rule failed: {}", e))?;
        Ok(self.member.take_findings())
    }

    /// Run the rules on a file
    pub fn check_file(&mut self, path: &Path) -> Result<Vec<Finding>, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("Failed to read file: {}", e))?;
        let tree = parse_named(&path.to_string_lossy(), &content)
            .map_err(|e| format!("Failed to parse source: {}", e))?;
        self.member
            .visit(&tree)
            .map_err(|e| format!("Rule failed: {}", e))?;
        Ok(self.member.take_findings())
    }

    /// Test all fixtures in a directory
    ///
    /// Every case directory holds `error/Source.kt` and optionally
    /// `expected/Source.kt`.
    pub fn test_fixtures(&mut self, fixtures_dir: &str) {
        let fixtures_path = PathBuf::from(fixtures_dir);
        if !fixtures_path.exists() {
            panic!("Fixtures directory not found: {}", fixtures_dir);
        }

        let mut cases: Vec<PathBuf> = std::fs::read_dir(&fixtures_path)
            .unwrap_or_else(|e| panic!("Failed to read fixtures directory: {}", e))
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_dir())
            .collect();
        cases.sort();

        if cases.is_empty() {
            panic!("No test cases found in {}", fixtures_dir);
        }
        for case_path in cases {
            self.test_case(&case_path);
        }
    }

    fn test_case(&mut self, case_path: &Path) {
        let case_name = case_path.display().to_string();
        let error_path = case_path.join("error").join("Source.kt");
        let expected_path = case_path.join("expected").join("Source.kt");
        let rule_ids = self.rule_ids();

        if error_path.exists() {
            let findings = self
                .check_file(&error_path)
                .unwrap_or_else(|e| panic!("Failed to check error fixture {}: {}", case_name, e));
            assert!(
                findings.iter().any(|f| rule_ids.contains(&f.rule_id)),
                "Expected {:?} findings in {}/error/Source.kt, got none",
                rule_ids,
                case_name
            );
        }

        if expected_path.exists() {
            let findings = self.check_file(&expected_path).unwrap_or_else(|e| {
                panic!("Failed to check expected fixture {}: {}", case_name, e)
            });
            assert!(
                findings.is_empty(),
                "Expected no findings in {}/expected/Source.kt, got: {:?}",
                case_name,
                findings
            );
        }
    }

    /// Assert that a source string produces a number of findings
    pub fn assert_findings(&mut self, content: &str, expected_count: usize) -> Vec<Finding> {
        let findings = self
            .check_string(content)
            .unwrap_or_else(|e| panic!("{}", e));
        assert_eq!(
            findings.len(),
            expected_count,
            "Expected {} findings, got {}: {:?}",
            expected_count,
            findings.len(),
            findings
        );
        findings
    }

    pub fn assert_no_findings(&mut self, content: &str) {
        self.assert_findings(content, 0);
    }

    /// Assert findings start exactly at the given (line, column) pairs, in order
    pub fn assert_locations(&mut self, content: &str, expected: &[(usize, usize)]) {
        let findings = self
            .check_string(content)
            .unwrap_or_else(|e| panic!("{}", e));
        let actual: Vec<(usize, usize)> = findings
            .iter()
            .map(|f| (f.location().start.line, f.location().start.column))
            .collect();
        assert_eq!(actual, expected, "Unexpected finding locations");
    }

    /// Assert that some finding message contains a substring
    pub fn assert_message_contains(&mut self, content: &str, expected_substring: &str) {
        let findings = self
            .check_string(content)
            .unwrap_or_else(|e| panic!("{}", e));
        assert!(
            findings.iter().any(|f| f.message.contains(expected_substring)),
            "Expected finding message containing '{}', got messages: {:?}",
            expected_substring,
            findings.iter().map(|f| &f.message).collect::<Vec<_>>()
        );
    }
}
