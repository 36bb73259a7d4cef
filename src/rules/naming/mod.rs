//! Naming convention rules, run together over a single traversal.

mod class_naming;
mod function_naming;

pub use class_naming::ClassNaming;
pub use function_naming::FunctionNaming;

use crate::config::Config;
use crate::rule_set::{RuleSet, RuleSetMember, RuleSetProvider};

pub struct NamingProvider;

impl RuleSetProvider for NamingProvider {
    fn rule_set_id(&self) -> &'static str {
        "naming"
    }

    fn instance(&self, config: &Config) -> RuleSet {
        RuleSet::new(
            self.rule_set_id(),
            vec![RuleSetMember::multi(vec![
                Box::new(FunctionNaming::new(config.sub_config(FunctionNaming::ID))),
                Box::new(ClassNaming::new(config.sub_config(ClassNaming::ID))),
            ])],
        )
    }
}
