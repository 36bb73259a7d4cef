use crate::analyzer::AnalysisReport;
use crate::finding::Severity;

pub(crate) fn format(report: &AnalysisReport) -> Vec<String> {
    let mut lines = Vec::new();

    for failure in &report.parse_failures {
        let mut params = format!("file={}", failure.path);
        if let Some(position) = failure.error.position() {
            params.push_str(&format!(",line={},col={}", position.line, position.column));
        }
        lines.push(format!("::error {},title=parse::{}", params, failure.error));
    }

    for finding in report.findings() {
        let level = match finding.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "notice",
        };
        let location = finding.location();
        let title = match &finding.rule_set_id {
            Some(rule_set) => format!("{}/{}", rule_set, finding.rule_id),
            None => finding.rule_id.clone(),
        };
        lines.push(format!(
            "::{} file={},line={},col={},title={}::{}",
            level, location.file, location.start.line, location.start.column, title, finding.message
        ));
    }
    lines
}
