//! Rule execution and suppression resolution for a Kotlin-like source tree.
//!
//! Rules walk a [`treelint_syntax::SyntaxTree`] and report [`Finding`]s.
//! Every finding is checked against `@Suppress`/`@SuppressWarnings`
//! annotations on the reported node and its ancestors before it is kept.
//!
//! Rules are grouped into [`RuleSet`]s built by [`RuleSetProvider`]s; an
//! [`Analyzer`] runs every active rule set over a batch of files.
//!
//! ```
//! use treelint::{Analyzer, Config, SourceFile};
//!
//! let analyzer = Analyzer::with_default_rule_sets(Config::empty()).unwrap();
//! let report = analyzer
//!     .analyze_sources(&[SourceFile::new("Bad.kt", "class bad_name\n")])
//!     .unwrap();
//! assert_eq!(report.findings().next().unwrap().rule_id, "ClassNaming");
//! ```

pub mod analyzer;
pub mod baseline;
pub mod config;
pub mod error;
pub mod finding;
pub mod multi_rule;
#[cfg(feature = "cli")]
pub mod reporter;
pub mod rule;
pub mod rule_set;
pub mod rules;
pub mod suppression;
pub mod testing;

pub use analyzer::{AnalysisReport, Analyzer, FileReport, ParseFailure, SourceFile};
pub use baseline::Baseline;
pub use config::Config;
pub use error::{ConfigError, Error, Result};
pub use finding::{Debt, Entity, Finding, Issue, Location, Severity};
pub use multi_rule::MultiRule;
#[cfg(feature = "cli")]
pub use reporter::{OutputFormat, Reporter};
pub use rule::{Rule, RuleContext, RuleRunner};
pub use rule_set::{FailurePolicy, RuleFailure, RuleSet, RuleSetMember, RuleSetProvider};
pub use suppression::{Argument, RuleIdentity};
