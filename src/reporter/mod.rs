mod github_actions;
mod json;
mod text;

use crate::analyzer::AnalysisReport;

#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    GithubActions,
}

pub struct Reporter {
    format: OutputFormat,
    color: bool,
}

impl Reporter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: true,
        }
    }

    /// Enable or disable colored text output
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Render findings in file order, then in the order rules reported them
    pub fn render(&self, report: &AnalysisReport) -> String {
        match self.format {
            OutputFormat::Text => text::format(report, self.color),
            OutputFormat::Json => json::format(report),
            OutputFormat::GithubActions => github_actions::format(report).join("\n"),
        }
    }

    pub fn report(&self, report: &AnalysisReport) {
        let output = self.render(report);
        if !output.is_empty() {
            println!("{}", output);
        }
    }
}
