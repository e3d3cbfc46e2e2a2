//! Reporter module for output formatting

pub mod console;
pub mod json;
pub mod sarif;

pub use console::ConsoleReporter;
pub use json::JsonReporter;
pub use sarif::SarifReporter;

use crate::{FileReport, Severity};

/// Totals across every linted file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LintSummary {
    pub files_linted: usize,
    pub files_with_diagnostics: usize,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub fixable: usize,
}

impl LintSummary {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        let mut summary = Self {
            files_linted: reports.len(),
            ..Self::default()
        };
        for report in reports {
            if !report.is_clean() {
                summary.files_with_diagnostics += 1;
            }
            summary.errors += report.count(Severity::Error);
            summary.warnings += report.count(Severity::Warning);
            summary.infos += report.count(Severity::Info);
            summary.fixable += report.fixable_count();
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.infos
    }
}
