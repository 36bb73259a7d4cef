use crate::analyzer::AnalysisReport;
use crate::finding::{Finding, Severity};
use colored::Colorize;

pub(crate) fn format(report: &AnalysisReport, color: bool) -> String {
    let mut lines = Vec::new();

    for failure in &report.parse_failures {
        let label = "error[parse]";
        let label = if color {
            label.red().bold().to_string()
        } else {
            label.to_string()
        };
        lines.push(format!("{}: {}: {}", failure.path, label, failure.error));
    }

    for file in &report.files {
        for finding in &file.findings {
            lines.push(format_line(finding, color));
        }
        for failure in &file.failures {
            lines.push(format!(
                "{}: rule {}/{} skipped: {}",
                file.path, failure.rule_set_id, failure.rule_id, failure.error
            ));
        }
    }

    if let Some(summary) = summary(report) {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(summary);
    }
    lines.join("\n")
}

pub(crate) fn format_line(finding: &Finding, color: bool) -> String {
    let location = finding.location();
    let severity_label = match finding.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "info",
    };
    let label = match &finding.rule_set_id {
        Some(rule_set) => format!("{}[{}/{}]", severity_label, rule_set, finding.rule_id),
        None => format!("{}[{}]", severity_label, finding.rule_id),
    };
    let label = if !color {
        label
    } else {
        match finding.severity {
            Severity::Error => label.red().bold().to_string(),
            Severity::Warning => label.yellow().bold().to_string(),
            Severity::Info => label.blue().bold().to_string(),
        }
    };

    format!(
        "{}:{}:{}: {}: {}",
        location.file, location.start.line, location.start.column, label, finding.message
    )
}

fn summary(report: &AnalysisReport) -> Option<String> {
    let count = |severity: Severity| report.findings().filter(|f| f.severity == severity).count();
    let baselined: usize = report.files.iter().map(|f| f.baselined).sum();

    let mut parts = Vec::new();
    let errors = count(Severity::Error);
    if errors > 0 {
        parts.push(format!("{} error(s)", errors));
    }
    let warnings = count(Severity::Warning);
    if warnings > 0 {
        parts.push(format!("{} warning(s)", warnings));
    }
    let infos = count(Severity::Info);
    if infos > 0 {
        parts.push(format!("{} info", infos));
    }
    if baselined > 0 {
        parts.push(format!("{} baselined", baselined));
    }
    if !report.parse_failures.is_empty() {
        parts.push(format!("{} unparsable file(s)", report.parse_failures.len()));
    }

    let mut summary = if parts.is_empty() {
        None
    } else {
        Some(format!("Found {}", parts.join(", ")))
    };
    if report.cancelled {
        let note = "Analysis was cancelled before all files were checked";
        summary = Some(match summary {
            Some(s) => format!("{}\n{}", s, note),
            None => note.to_string(),
        });
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{Analyzer, SourceFile};
    use crate::config::Config;

    fn analyze(sources: &[(&str, &str)]) -> AnalysisReport {
        let analyzer = Analyzer::with_default_rule_sets(Config::empty()).unwrap();
        let sources: Vec<SourceFile> = sources
            .iter()
            .map(|(path, content)| SourceFile::new(*path, *content))
            .collect();
        analyzer.analyze_sources(&sources).unwrap()
    }

    #[test]
    fn test_format_line() {
        let report = analyze(&[(
            "src/Lpl.kt",
            "fun lpl(a: Int, b: Int, c: Int, d: Int, e: Int, f: Int) = Unit\n",
        )]);
        let finding = report.findings().next().unwrap();
        assert_eq!(
            format_line(finding, false),
            "src/Lpl.kt:1:5: warning[complexity/LongParameterList]: The function lpl has 6 parameters. The current threshold is set to 6."
        );
    }

    #[test]
    fn test_findings_keep_reported_order() {
        let report = analyze(&[("Names.kt", "class lower {\n    fun Upper() = Unit\n}\n")]);
        let output = format(&report, false);
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].contains("naming/FunctionNaming"), "{}", output);
        assert!(lines[1].contains("naming/ClassNaming"), "{}", output);
        assert_eq!(lines.last(), Some(&"Found 2 warning(s)"));
    }

    #[test]
    fn test_parse_failures_are_listed() {
        let report = analyze(&[("Broken.kt", "class A {")]);
        let output = format(&report, false);
        assert!(output.starts_with("Broken.kt: error[parse]: Unclosed '{'"), "{}", output);
        assert!(output.ends_with("Found 1 unparsable file(s)"));
    }

    #[test]
    fn test_clean_report_is_empty() {
        let report = analyze(&[("Clean.kt", "class Clean {\n    fun run() = Unit\n}\n")]);
        assert_eq!(format(&report, false), "");
    }
}
