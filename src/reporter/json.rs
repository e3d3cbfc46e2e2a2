//! JSON reporter for machine-readable output

use super::LintSummary;
use crate::FileReport;
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Report a single file as JSON
    pub fn report(&self, report: &FileReport) -> String {
        self.to_json(report, "{}")
    }

    /// Report with summary
    pub fn report_with_summary(&self, results: &[FileReport], summary: &LintSummary) -> String {
        let output = JsonOutput {
            results,
            summary: JsonSummary {
                files_linted: summary.files_linted,
                files_with_diagnostics: summary.files_with_diagnostics,
                errors: summary.errors,
                warnings: summary.warnings,
                infos: summary.infos,
                fixable: summary.fixable,
            },
        };
        self.to_json(&output, "{}")
    }

    fn to_json<T: Serialize>(&self, value: &T, fallback: &str) -> String {
        let out = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        out.unwrap_or_else(|_| fallback.to_string())
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    results: &'a [FileReport],
    summary: JsonSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    files_linted: usize,
    files_with_diagnostics: usize,
    errors: usize,
    warnings: usize,
    infos: usize,
    fixable: usize,
}
