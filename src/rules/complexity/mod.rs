//! Rules flagging code that is hard to read or to change.

mod long_method;
mod long_parameter_list;

pub use long_method::LongMethod;
pub use long_parameter_list::LongParameterList;

use crate::config::Config;
use crate::rule_set::{RuleSet, RuleSetMember, RuleSetProvider};

pub struct ComplexityProvider;

impl RuleSetProvider for ComplexityProvider {
    fn rule_set_id(&self) -> &'static str {
        "complexity"
    }

    fn instance(&self, config: &Config) -> RuleSet {
        RuleSet::new(
            self.rule_set_id(),
            vec![
                RuleSetMember::rule(LongParameterList::new(
                    config.sub_config(LongParameterList::ID),
                )),
                RuleSetMember::rule(LongMethod::new(config.sub_config(LongMethod::ID))),
            ],
        )
    }
}
