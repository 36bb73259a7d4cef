use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use treelint::{
    AnalysisReport, Analyzer, Baseline, Config, OutputFormat, Reporter, Severity,
};

const SOURCE_EXTENSIONS: &[&str] = &["kt", "kts"];

#[derive(Parser)]
#[command(name = "treelint")]
#[command(author, version, about = "Static analysis for Kotlin sources", long_about = None)]
struct Cli {
    /// Files, directories or glob patterns to analyze
    #[arg(value_name = "PATH", required_unless_present = "list_rules")]
    paths: Vec<String>,

    /// Configuration file (defaults to .treelint.toml in the current directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,

    /// Hide findings listed in this baseline file
    #[arg(long, value_name = "FILE")]
    baseline: Option<PathBuf>,

    /// Write the current findings to the baseline file instead of reporting them
    #[arg(long, requires = "baseline")]
    create_baseline: bool,

    /// Print the active rule sets and their rules
    #[arg(long)]
    list_rules: bool,

    /// Exit with a failure status on warnings too
    #[arg(long)]
    fail_on_warnings: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Format {
    Text,
    Json,
    GithubActions,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::GithubActions => OutputFormat::GithubActions,
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "treelint=debug" } else { "treelint=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config, String> {
    match path {
        Some(path) => Config::from_file(path).map_err(|e| e.to_string()),
        None => {
            let cwd = std::env::current_dir().map_err(|e| e.to_string())?;
            Ok(Config::find_and_load(&cwd)
                .map_err(|e| e.to_string())?
                .unwrap_or_else(Config::empty))
        }
    }
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Expand directories and glob patterns into a sorted, deduplicated file list
fn collect_files(patterns: &[String]) -> Result<Vec<PathBuf>, String> {
    let mut files = Vec::new();

    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_dir() {
            for ext in SOURCE_EXTENSIONS {
                let dir_pattern = format!("{}/**/*.{}", pattern.trim_end_matches('/'), ext);
                files.extend(expand_glob(&dir_pattern)?);
            }
        } else if path.is_file() {
            files.push(path.to_path_buf());
        } else {
            let matched: Vec<PathBuf> = expand_glob(pattern)?
                .into_iter()
                .filter(|p| is_source_file(p))
                .collect();
            if matched.is_empty() {
                return Err(format!("No source files match '{}'", pattern));
            }
            files.extend(matched);
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>, String> {
    let entries =
        glob::glob(pattern).map_err(|e| format!("Invalid pattern '{}': {}", pattern, e))?;
    Ok(entries.filter_map(|entry| entry.ok()).filter(|p| p.is_file()).collect())
}

fn list_rules(analyzer: &Analyzer) -> Result<(), String> {
    for rule_set in analyzer.rule_sets().map_err(|e| e.to_string())? {
        println!("{}", rule_set.id());
        for rule_id in rule_set.rule_ids() {
            println!("  {}", rule_id);
        }
    }
    Ok(())
}

fn exit_status(report: &AnalysisReport, fail_on_warnings: bool) -> ExitCode {
    let failing = report.findings().any(|f| {
        f.severity == Severity::Error || (fail_on_warnings && f.severity == Severity::Warning)
    });
    if failing || !report.parse_failures.is_empty() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: &Cli) -> Result<ExitCode, String> {
    let config = load_config(cli.config.as_deref())?;
    let mut analyzer = Analyzer::with_default_rule_sets(config).map_err(|e| e.to_string())?;

    if cli.list_rules {
        list_rules(&analyzer)?;
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(path) = &cli.baseline
        && !cli.create_baseline
        && path.exists()
    {
        let baseline = Baseline::load(path).map_err(|e| e.to_string())?;
        tracing::debug!(path = %path.display(), entries = baseline.len(), "baseline loaded");
        analyzer = analyzer.with_baseline(baseline);
    }

    let files = collect_files(&cli.paths)?;
    if cli.verbose {
        eprintln!("Analyzing {} file(s)", files.len());
    }

    let report = analyzer.analyze_paths(&files).map_err(|e| e.to_string())?;

    if cli.create_baseline
        && let Some(path) = &cli.baseline
    {
        let baseline = Baseline::from_findings(report.findings());
        baseline.save(path).map_err(|e| e.to_string())?;
        eprintln!(
            "Wrote {} finding(s) to {}",
            baseline.len(),
            path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let reporter = Reporter::new(cli.format.into()).with_color(!cli.no_color);
    reporter.report(&report);

    Ok(exit_status(&report, cli.fail_on_warnings))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}
