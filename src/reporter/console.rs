//! Console reporter with colored output

use super::LintSummary;
use crate::{Diagnostic, FileReport, Severity};
use colored::Colorize;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to show suggestion details under each diagnostic
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a single file. Clean files print nothing.
    pub fn report(&self, result: &FileReport) {
        if result.is_clean() {
            return;
        }
        println!();
        println!("{}", result.file_path.display().to_string().bold().underline());
        for diagnostic in &result.diagnostics {
            println!("{}", self.format_diagnostic(diagnostic));
            if self.verbose {
                for suggestion in &diagnostic.suggestions {
                    println!("       {} {}", "→".dimmed(), suggestion.message.italic());
                }
            }
        }
    }

    /// Report multiple results with summary
    pub fn report_many(&self, results: &[FileReport], summary: &LintSummary) {
        for result in results {
            self.report(result);
        }
        self.print_summary(summary);
    }

    /// Report in quiet mode (one line per file with diagnostics)
    pub fn report_quiet(&self, result: &FileReport) {
        if result.is_clean() {
            return;
        }
        println!(
            "{}: {} error(s), {} warning(s)",
            result.file_path.display(),
            result.count(Severity::Error),
            result.count(Severity::Warning)
        );
    }

    /// One diagnostic line: `  L3:21  ✗ error  message  [rule]`
    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let icon = match diagnostic.severity {
            Severity::Error => "✗".red(),
            Severity::Warning => "⚠".yellow(),
            Severity::Info => "ℹ".blue(),
        };
        let location = format!("L{}:{}", diagnostic.location.line, diagnostic.location.column);
        let fixable = if diagnostic.suggestions.is_empty() {
            String::new()
        } else {
            format!(" {}", "(fixable)".cyan())
        };
        format!(
            "   {} {} {}{} {}",
            icon,
            location.dimmed(),
            diagnostic.message,
            fixable,
            format!("[{}]", diagnostic.rule).dimmed()
        )
    }

    fn print_summary(&self, summary: &LintSummary) {
        println!();
        println!("{}", "═".repeat(60));
        println!("{}", "Summary".bold());
        println!("{}", "═".repeat(60));
        println!("   Files linted:   {}", summary.files_linted.to_string().bold());
        println!("   Files affected: {}", summary.files_with_diagnostics);

        let errors = summary.errors.to_string();
        let errors = if summary.errors > 0 {
            errors.red().bold()
        } else {
            errors.green()
        };
        println!(
            "   Problems:       {} ({} errors, {} warnings, {} info)",
            summary.total(),
            errors,
            summary.warnings,
            summary.infos
        );
        if summary.fixable > 0 {
            println!(
                "   {} {} fixable with {}",
                "→".cyan(),
                summary.fixable,
                "--fix".bold()
            );
        }
        println!();
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
