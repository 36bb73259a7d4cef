//! Built-in rule sets.

pub mod complexity;
pub mod naming;

pub use complexity::{ComplexityProvider, LongMethod, LongParameterList};
pub use naming::{ClassNaming, FunctionNaming, NamingProvider};

use crate::rule_set::RuleSetProvider;

/// Providers for every built-in rule set, in execution order.
pub fn default_providers() -> Vec<Box<dyn RuleSetProvider>> {
    vec![Box::new(ComplexityProvider), Box::new(NamingProvider)]
}
