use crate::baseline::Baseline;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::finding::Finding;
use crate::rule_set::{FailurePolicy, RuleFailure, RuleSet, RuleSetProvider};
#[cfg(feature = "cli")]
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};
use treelint_syntax::{parse_file, parse_named, ParseError, SyntaxTree};

/// Source text held in memory, analyzed under `path`.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Findings of one file.
#[derive(Debug, Default)]
pub struct FileReport {
    pub path: String,
    pub findings: Vec<Finding>,
    /// Findings hidden because the baseline lists them.
    pub baselined: usize,
    /// Rules skipped after an error under [`FailurePolicy::SkipRule`].
    pub failures: Vec<RuleFailure>,
}

/// A file that could not be parsed.
#[derive(Debug)]
pub struct ParseFailure {
    pub path: String,
    pub error: ParseError,
}

enum FileOutcome {
    Analyzed(FileReport),
    Unparsable(ParseFailure),
    Skipped,
}

/// Result of analyzing a batch of files, in input order.
#[derive(Debug, Default)]
pub struct AnalysisReport {
    pub files: Vec<FileReport>,
    pub parse_failures: Vec<ParseFailure>,
    /// True when the run was cancelled before every file was analyzed.
    pub cancelled: bool,
}

impl AnalysisReport {
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.files.iter().flat_map(|file| file.findings.iter())
    }

    pub fn finding_count(&self) -> usize {
        self.files.iter().map(|file| file.findings.len()).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &RuleFailure> {
        self.files.iter().flat_map(|file| file.failures.iter())
    }
}

/// Runs the configured rule sets over source files.
pub struct Analyzer {
    providers: Vec<Box<dyn RuleSetProvider>>,
    config: Config,
    policy: FailurePolicy,
    baseline: Option<Baseline>,
    cancelled: Arc<AtomicBool>,
}

impl Analyzer {
    /// An analyzer without rule sets.
    pub fn new(config: Config) -> Result<Self> {
        let policy = FailurePolicy::from_config(&config)?;
        Ok(Self {
            providers: Vec::new(),
            config,
            policy,
            baseline: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn with_default_rule_sets(config: Config) -> Result<Self> {
        let mut analyzer = Self::new(config)?;
        for provider in crate::rules::default_providers() {
            analyzer.add_provider(provider);
        }
        Ok(analyzer)
    }

    pub fn add_provider(&mut self, provider: Box<dyn RuleSetProvider>) {
        self.providers.push(provider);
    }

    pub fn providers(&self) -> &[Box<dyn RuleSetProvider>] {
        &self.providers
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn with_baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = Some(baseline);
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Flag checked between files; setting it stops the current run early.
    pub fn cancellation_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fresh instances of every active rule set, in provider order.
    pub fn rule_sets(&self) -> Result<Vec<RuleSet>> {
        let mut rule_sets = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            let config = self.config.sub_config(provider.rule_set_id());
            if !config.get_bool("active", true)? {
                debug!(rule_set = provider.rule_set_id(), "rule set is inactive");
                continue;
            }
            rule_sets.push(provider.instance(&config).with_failure_policy(self.policy));
        }
        Ok(rule_sets)
    }

    /// Run every active rule set over one tree.
    pub fn analyze_tree(&self, tree: &SyntaxTree) -> Result<FileReport> {
        let mut report = FileReport {
            path: tree.file_name().to_string(),
            ..FileReport::default()
        };

        for mut rule_set in self.rule_sets()? {
            let findings = rule_set.execute(tree)?;
            report.failures.extend(rule_set.take_failures());
            for finding in findings {
                if self.baseline.as_ref().is_some_and(|b| b.contains(&finding)) {
                    report.baselined += 1;
                } else {
                    report.findings.push(finding);
                }
            }
        }

        debug!(
            file = %report.path,
            findings = report.findings.len(),
            baselined = report.baselined,
            "file analyzed"
        );
        Ok(report)
    }

    /// Parse and analyze a single in-memory source.
    pub fn analyze_source(&self, source: &SourceFile) -> Result<FileReport> {
        let tree = parse_named(&source.path, &source.content).map_err(|e| Error::Parse {
            path: source.path.clone(),
            source: e,
        })?;
        self.analyze_tree(&tree)
    }

    /// Analyze in-memory sources.
    pub fn analyze_sources(&self, sources: &[SourceFile]) -> Result<AnalysisReport> {
        self.run(sources, |source: &SourceFile| {
            parse_named(&source.path, &source.content).map_err(|error| ParseFailure {
                path: source.path.clone(),
                error,
            })
        })
    }

    /// Read, parse and analyze files from disk.
    pub fn analyze_paths(&self, paths: &[PathBuf]) -> Result<AnalysisReport> {
        self.run(paths, |path: &PathBuf| {
            parse_file(path).map_err(|error| ParseFailure {
                path: display_path(path),
                error,
            })
        })
    }

    fn analyze_one<T, F>(&self, input: &T, parse: &F) -> Result<FileOutcome>
    where
        F: Fn(&T) -> std::result::Result<SyntaxTree, ParseFailure>,
    {
        if self.is_cancelled() {
            return Ok(FileOutcome::Skipped);
        }
        match parse(input) {
            Ok(tree) => self.analyze_tree(&tree).map(FileOutcome::Analyzed),
            Err(failure) => Ok(FileOutcome::Unparsable(failure)),
        }
    }

    /// Analyze inputs in parallel, keeping input order.
    #[cfg(feature = "cli")]
    fn run<T, F>(&self, inputs: &[T], parse: F) -> Result<AnalysisReport>
    where
        T: Sync,
        F: Fn(&T) -> std::result::Result<SyntaxTree, ParseFailure> + Sync,
    {
        let outcomes = inputs
            .par_iter()
            .map(|input| self.analyze_one(input, &parse))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.summarize(outcomes))
    }

    /// Analyze inputs one after another (sequential version without the cli feature)
    #[cfg(not(feature = "cli"))]
    fn run<T, F>(&self, inputs: &[T], parse: F) -> Result<AnalysisReport>
    where
        F: Fn(&T) -> std::result::Result<SyntaxTree, ParseFailure>,
    {
        let mut outcomes = Vec::with_capacity(inputs.len());
        for input in inputs {
            outcomes.push(self.analyze_one(input, &parse)?);
        }
        Ok(self.summarize(outcomes))
    }

    fn summarize(&self, outcomes: Vec<FileOutcome>) -> AnalysisReport {
        let mut report = AnalysisReport::default();
        for outcome in outcomes {
            match outcome {
                FileOutcome::Analyzed(file) => report.files.push(file),
                FileOutcome::Unparsable(failure) => report.parse_failures.push(failure),
                FileOutcome::Skipped => report.cancelled = true,
            }
        }
        info!(
            files = report.files.len(),
            findings = report.finding_count(),
            parse_failures = report.parse_failures.len(),
            cancelled = report.cancelled,
            "analysis finished"
        );
        report
    }
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}
