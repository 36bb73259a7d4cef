use std::path::{Path, PathBuf};
use tempfile::TempDir;
use treelint::{Analyzer, Baseline, Config, Severity};

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/project")
}

fn fixture_files() -> Vec<PathBuf> {
    let src = fixture_dir().join("src");
    vec![
        src.join("Generated.kt"),
        src.join("orders/Orders.kt"),
        src.join("orders/Repository.kt"),
    ]
}

fn project_analyzer() -> Analyzer {
    let config = Config::find_and_load(&fixture_dir())
        .unwrap()
        .expect("fixture project has a config file");
    Analyzer::with_default_rule_sets(config).unwrap()
}

#[test]
fn test_analyze_fixture_project() {
    let report = project_analyzer().analyze_paths(&fixture_files()).unwrap();

    assert!(report.parse_failures.is_empty());
    assert!(!report.cancelled);
    assert_eq!(report.files.len(), 3);
    assert!(report.files[0].findings.is_empty(), "file suppression hides everything");

    let found: Vec<(&str, usize, Severity)> = report
        .findings()
        .map(|f| (f.rule_id.as_str(), f.location().start.line, f.severity))
        .collect();
    assert_eq!(
        found,
        vec![
            ("LongParameterList", 5, Severity::Warning),
            ("FunctionNaming", 14, Severity::Error),
            ("LongParameterList", 4, Severity::Warning),
        ]
    );
}

#[test]
fn test_baseline_round_trip() {
    let dir = TempDir::new().unwrap();
    let baseline_path = dir.path().join("baseline.json");

    let first = project_analyzer().analyze_paths(&fixture_files()).unwrap();
    Baseline::from_findings(first.findings())
        .save(&baseline_path)
        .unwrap();

    let baseline = Baseline::load(&baseline_path).unwrap();
    let second = project_analyzer()
        .with_baseline(baseline)
        .analyze_paths(&fixture_files())
        .unwrap();

    assert_eq!(second.finding_count(), 0);
    let baselined: usize = second.files.iter().map(|f| f.baselined).sum();
    assert_eq!(baselined, first.finding_count());
}

#[test]
fn test_new_code_is_reported_despite_baseline() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("Service.kt");
    std::fs::write(&source, "class Service {\n    fun run() = Unit\n}\n").unwrap();

    let analyzer = Analyzer::with_default_rule_sets(Config::empty()).unwrap();
    let baseline = Baseline::from_findings(analyzer.analyze_paths(&[source.clone()]).unwrap().findings());
    assert!(baseline.is_empty());

    std::fs::write(
        &source,
        "class Service {\n    fun run() = Unit\n    fun Stop() = Unit\n}\n",
    )
    .unwrap();
    let report = Analyzer::with_default_rule_sets(Config::empty())
        .unwrap()
        .with_baseline(baseline)
        .analyze_paths(&[source])
        .unwrap();

    assert_eq!(report.finding_count(), 1);
    assert!(report.findings().next().unwrap().entity.signature.ends_with("Service.Stop"));
}

#[test]
fn test_unreadable_and_unparsable_files() {
    let dir = TempDir::new().unwrap();
    let broken = dir.path().join("Broken.kt");
    std::fs::write(&broken, "class Broken {\n    fun run() {\n}\n").unwrap();
    let missing = dir.path().join("Missing.kt");

    let analyzer = Analyzer::with_default_rule_sets(Config::empty()).unwrap();
    let report = analyzer.analyze_paths(&[broken, missing]).unwrap();

    assert!(report.files.is_empty());
    assert_eq!(report.parse_failures.len(), 2);
    assert!(report.parse_failures[1].error.position().is_none());
}

#[test]
fn test_config_errors_surface_on_construction() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".treelint.toml"), "[engine\n").unwrap();
    assert!(Config::find_and_load(dir.path()).is_err());

    let empty = TempDir::new().unwrap();
    assert!(Config::find_and_load(empty.path()).unwrap().is_none());
}
