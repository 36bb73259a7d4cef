use crate::analyzer::AnalysisReport;
use crate::finding::{Finding, Severity};

#[derive(serde::Serialize)]
struct JsonReport<'a> {
    files: Vec<JsonFile<'a>>,
    parse_failures: Vec<JsonParseFailure>,
    summary: Summary,
}

#[derive(serde::Serialize)]
struct JsonFile<'a> {
    file: &'a str,
    findings: &'a [Finding],
    baselined: usize,
}

#[derive(serde::Serialize)]
struct JsonParseFailure {
    file: String,
    message: String,
}

#[derive(serde::Serialize)]
struct Summary {
    errors: usize,
    warnings: usize,
    infos: usize,
    baselined: usize,
    cancelled: bool,
}

pub(crate) fn format(report: &AnalysisReport) -> String {
    let count = |severity: Severity| report.findings().filter(|f| f.severity == severity).count();

    let json = JsonReport {
        files: report
            .files
            .iter()
            .map(|file| JsonFile {
                file: &file.path,
                findings: &file.findings,
                baselined: file.baselined,
            })
            .collect(),
        parse_failures: report
            .parse_failures
            .iter()
            .map(|failure| JsonParseFailure {
                file: failure.path.clone(),
                message: failure.error.to_string(),
            })
            .collect(),
        summary: Summary {
            errors: count(Severity::Error),
            warnings: count(Severity::Warning),
            infos: count(Severity::Info),
            baselined: report.files.iter().map(|f| f.baselined).sum(),
            cancelled: report.cancelled,
        },
    };

    serde_json::to_string_pretty(&json).unwrap_or_else(|e| {
        serde_json::json!({ "error": e.to_string() }).to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{Analyzer, SourceFile};
    use crate::config::Config;

    #[test]
    fn test_json_structure() {
        let analyzer = Analyzer::with_default_rule_sets(Config::empty()).unwrap();
        let report = analyzer
            .analyze_sources(&[SourceFile::new(
                "Lpl.kt",
                "fun lpl(a: Int, b: Int, c: Int, d: Int, e: Int, f: Int) = Unit\n",
            )])
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&format(&report)).unwrap();

        let finding = &json["files"][0]["findings"][0];
        assert_eq!(json["files"][0]["file"], "Lpl.kt");
        assert_eq!(finding["rule_id"], "LongParameterList");
        assert_eq!(finding["rule_set_id"], "complexity");
        assert_eq!(finding["severity"], "warning");
        assert_eq!(finding["entity"]["signature"], "Lpl.kt$lpl");
        assert_eq!(finding["entity"]["location"]["start"]["line"], 1);
        assert_eq!(finding["entity"]["location"]["start"]["column"], 5);
        assert_eq!(json["summary"]["warnings"], 1);
        assert_eq!(json["summary"]["cancelled"], false);
    }

    #[test]
    fn test_json_empty_report() {
        let json: serde_json::Value =
            serde_json::from_str(&format(&AnalysisReport::default())).unwrap();
        assert!(json["files"].as_array().unwrap().is_empty());
        assert_eq!(json["summary"]["errors"], 0);
    }
}
