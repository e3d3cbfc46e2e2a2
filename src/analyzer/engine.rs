//! Lint engine - parses a file and runs the rules over its call sites

use crate::config::Config;
use crate::detector::TestCallDetector;
use crate::parser::{IgnoreDirectives, Syntax, TypeScriptParser};
use crate::{Diagnostic, FileReport};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tree_sitter::{Node, Tree};

use super::rules::{LintRule, NoDoneCallbackRule, RuleContext};

/// Main lint engine
pub struct Linter {
    rules: Vec<Box<dyn LintRule>>,
    detector: TestCallDetector,
    config: Config,
}

impl Linter {
    /// Create a linter for the given config
    pub fn new(config: &Config) -> Self {
        Self {
            rules: vec![Box::new(NoDoneCallbackRule::new())],
            detector: TestCallDetector::new().with_aliases(&config.global_aliases),
            config: config.clone(),
        }
    }

    /// Lint a file on disk
    pub fn lint_path(&self, path: &Path) -> Result<FileReport> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read test file: {}", path.display()))?;
        self.lint_source(path, &source)
    }

    /// Lint source from a string (e.g. an unsaved editor buffer).
    /// `path` selects the grammar and the config overrides that apply.
    pub fn lint_source(&self, path: &Path, source: &str) -> Result<FileReport> {
        let mut report = FileReport::new(path.to_path_buf());

        let severity = self.config.effective_severity_for_file(path);
        let Some(severity) = severity.to_severity() else {
            tracing::debug!(file = %path.display(), "linting disabled for file");
            return Ok(report);
        };

        let mut parser = TypeScriptParser::for_file(path)?;
        let tree = parser
            .parse(source)
            .with_context(|| format!("Failed to parse test file: {}", path.display()))?;

        let diagnostics = self
            .check_tree(&tree, source)
            .with_context(|| format!("Failed to lint {}", path.display()))?;

        let ignore_directives = IgnoreDirectives::parse(source);
        report.diagnostics = diagnostics
            .into_iter()
            .filter(|d| !ignore_directives.is_ignored(d.location.line))
            .map(|mut d| {
                d.severity = severity;
                d
            })
            .collect();

        tracing::debug!(
            file = %path.display(),
            diagnostics = report.diagnostics.len(),
            fixable = report.fixable_count(),
            "linted file"
        );
        Ok(report)
    }

    /// Run every rule over every call site, outer calls before inner ones
    fn check_tree(&self, tree: &Tree, source: &str) -> Result<Vec<Diagnostic>> {
        let ctx = RuleContext {
            source,
            detector: &self.detector,
        };
        let mut diagnostics = Vec::new();
        let mut stack: Vec<Node> = vec![tree.root_node()];

        while let Some(node) = stack.pop() {
            if let Syntax::Call(call) = Syntax::of(node, source) {
                for rule in &self.rules {
                    if let Some(diagnostic) = rule.check_call(&ctx, &call)? {
                        tracing::trace!(
                            rule = %diagnostic.rule,
                            line = diagnostic.location.line,
                            column = diagnostic.location.column,
                            "{}",
                            diagnostic.message
                        );
                        diagnostics.push(diagnostic);
                    }
                }
            }

            let mut cursor = node.walk();
            let children: Vec<Node> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }

        Ok(diagnostics)
    }
}

impl Default for Linter {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MessageKind, Severity};
    use std::collections::HashMap;

    fn lint(source: &str) -> FileReport {
        Linter::default()
            .lint_source(Path::new("sample.test.ts"), source)
            .unwrap()
    }

    #[test]
    fn reports_in_source_order() {
        let report = lint(
            "beforeEach(done => done());\n\
             test('a', function (done) { done(); });\n\
             test('b', async (done) => { done(); });\n",
        );
        let lines: Vec<usize> = report.diagnostics.iter().map(|d| d.location.line).collect();
        assert_eq!(lines, vec![1, 2, 3]);
        assert_eq!(report.diagnostics[2].kind, MessageKind::UseAwaitInsteadOfCallback);
        assert_eq!(report.fixable_count(), 2);
    }

    #[test]
    fn ignore_directive_suppresses_diagnostic() {
        let report = lint(
            "// nodone-ignore-next-line\n\
             test('a', done => done());\n\
             test('b', done => done());\n",
        );
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].location.line, 3);
    }

    #[test]
    fn configured_severity_is_applied() {
        let config: Config = serde_json::from_str(r#"{ "severity": "warning" }"#).unwrap();
        let report = Linter::new(&config)
            .lint_source(Path::new("a.test.ts"), "it('x', done => done());")
            .unwrap();
        assert_eq!(report.diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn severity_off_for_matching_override() {
        let config: Config = serde_json::from_str(
            r#"{ "overrides": [{ "files": ["**/legacy/**"], "severity": "off" }] }"#,
        )
        .unwrap();
        let linter = Linter::new(&config);
        let source = "it('x', done => done());";
        assert!(linter
            .lint_source(Path::new("src/legacy/a.test.ts"), source)
            .unwrap()
            .is_clean());
        assert!(!linter
            .lint_source(Path::new("src/a.test.ts"), source)
            .unwrap()
            .is_clean());
    }

    #[test]
    fn global_aliases_are_resolved() {
        let mut config = Config::default();
        let mut aliases = HashMap::new();
        aliases.insert("it".to_string(), vec!["spec".to_string()]);
        config.global_aliases = aliases;
        let report = Linter::new(&config)
            .lint_source(Path::new("a.test.ts"), "spec('x', done => done());")
            .unwrap();
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn tsx_source_is_parsed_with_tsx_grammar() {
        let report = Linter::default()
            .lint_source(
                Path::new("view.test.tsx"),
                "it('renders', done => { render(<App />); done(); });",
            )
            .unwrap();
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn clean_file_has_no_diagnostics() {
        let report = lint("test('x', async () => { await run(); });\n");
        assert!(report.is_clean());
    }
}
