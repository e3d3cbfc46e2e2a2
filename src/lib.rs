//! nodone: done-callback detector for TypeScript/JavaScript tests
//!
//! Flags tests and hooks whose function argument takes a completion ("done")
//! callback, and offers a rewrite that returns a `Promise` instead.

pub mod analyzer;
pub mod config;
pub mod detector;
pub mod fixer;
pub mod parser;
pub mod reporter;

use fixer::EditPlan;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The result of linting one file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    /// Path to the linted file
    pub file_path: PathBuf,
    /// Diagnostics found, in source order
    pub diagnostics: Vec<Diagnostic>,
}

impl FileReport {
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            diagnostics: Vec::new(),
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Number of diagnostics that carry a rewrite suggestion
    pub fn fixable_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| !d.suggestions.is_empty())
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// A finding anchored at the callback parameter of a test or hook
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Rule that produced this diagnostic
    pub rule: Rule,
    /// Which message variant applies
    pub kind: MessageKind,
    /// Severity (after config is applied)
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Location of the callback parameter
    pub location: Location,
    /// Byte range of the callback parameter
    pub span: Span,
    /// Zero or one rewrite suggestions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
}

/// An opt-in rewrite offered alongside a diagnostic
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub kind: MessageKind,
    pub message: String,
    pub data: SuggestionData,
    /// Edits that must be applied together
    pub edits: EditPlan,
}

/// Values interpolated into a suggestion message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionData {
    /// Name of the completion callback parameter
    pub callback: String,
}

/// Message variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageKind {
    /// The function takes a completion callback; return a promise instead
    PlainCallbackDiscouraged,
    /// An async function also takes a completion callback
    UseAwaitInsteadOfCallback,
    /// Suggestion: wrap the body in `new Promise(cb => ...)`
    SuggestWrapInPromise,
}

impl MessageKind {
    /// Render the message, interpolating the callback name where the template needs one
    pub fn render(self, data: Option<&SuggestionData>) -> String {
        match self {
            MessageKind::PlainCallbackDiscouraged => {
                "Return a promise instead of relying on callback parameter".to_string()
            }
            MessageKind::UseAwaitInsteadOfCallback => {
                "Use await instead of callback in async functions".to_string()
            }
            MessageKind::SuggestWrapInPromise => format!(
                "Wrap in `new Promise({} => ...`",
                data.map(|d| d.callback.as_str()).unwrap_or("callback")
            ),
        }
    }
}

/// Severity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Lint rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    NoDoneCallback,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::NoDoneCallback => write!(f, "no-done-callback"),
        }
    }
}

/// Location in a source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed, in bytes)
    pub column: usize,
    /// End line (optional)
    pub end_line: Option<usize>,
    /// End column (optional)
    pub end_column: Option<usize>,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            end_line: None,
            end_column: None,
        }
    }

    pub fn with_end(mut self, end_line: usize, end_column: usize) -> Self {
        self.end_line = Some(end_line);
        self.end_column = Some(end_column);
        self
    }
}

/// Half-open byte range `[start, end)` into the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Public API: lint a single file. Used by the LSP and other programmatic consumers.
///
/// * `path` - path to the file
/// * `work_dir` - project root (for config lookup)
/// * `config_path` - optional path to .nodonerc.json; if None, searches from work_dir
pub fn lint_file(
    path: &std::path::Path,
    work_dir: &std::path::Path,
    config_path: Option<&std::path::Path>,
) -> anyhow::Result<FileReport> {
    let config = crate::config::load_config(work_dir, config_path)?;
    let linter = crate::analyzer::Linter::new(&config);
    linter.lint_path(path)
}
