//! Integration tests: full lint pipeline against test-repos/fake-project/

use nodone::analyzer::Linter;
use nodone::config::load_config;
use nodone::fixer::{apply_file_fixes, fix_source};
use nodone::{FileReport, MessageKind, Severity};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const FAKE_PROJECT_ROOT: &str = "test-repos/fake-project";

fn lint(test_path: &str) -> FileReport {
    nodone::lint_file(Path::new(test_path), Path::new(FAKE_PROJECT_ROOT), None)
        .unwrap_or_else(|e| panic!("lint({}) failed: {:#}", test_path, e))
}

fn kinds(report: &FileReport) -> Vec<(usize, MessageKind, bool)> {
    report
        .diagnostics
        .iter()
        .map(|d| (d.location.line, d.kind, !d.suggestions.is_empty()))
        .collect()
}

// --- Fixture expectations ---

#[test]
fn hooks_fixture() {
    let r = lint("test-repos/fake-project/tests/hooks.test.ts");
    assert_eq!(
        kinds(&r),
        vec![
            (5, MessageKind::PlainCallbackDiscouraged, true),
            (12, MessageKind::PlainCallbackDiscouraged, true),
            (14, MessageKind::UseAwaitInsteadOfCallback, false),
        ]
    );
}

#[test]
fn timers_fixture_honors_ignore_comment() {
    let r = lint("test-repos/fake-project/tests/timers.test.ts");
    assert_eq!(
        kinds(&r),
        vec![
            (2, MessageKind::PlainCallbackDiscouraged, true),
            (9, MessageKind::PlainCallbackDiscouraged, true),
            (13, MessageKind::PlainCallbackDiscouraged, false),
        ]
    );
    assert_eq!(r.diagnostics[1].suggestions[0].data.callback, "finish");
}

#[test]
fn table_fixture_flags_tagged_each_only() {
    let r = lint("test-repos/fake-project/tests/table.test.ts");
    assert_eq!(
        kinds(&r),
        vec![(5, MessageKind::PlainCallbackDiscouraged, true)]
    );
}

#[test]
fn clean_fixture_has_no_diagnostics() {
    assert!(lint("test-repos/fake-project/tests/clean.test.ts").is_clean());
}

#[test]
fn legacy_override_lowers_severity() {
    let r = lint("test-repos/fake-project/tests/legacy/old.test.js");
    assert_eq!(r.diagnostics.len(), 1);
    assert_eq!(r.diagnostics[0].severity, Severity::Warning);
}

// --- Fixing ---

#[test]
fn fixing_hooks_fixture_leaves_only_unfixable() {
    let source = fs::read_to_string("test-repos/fake-project/tests/hooks.test.ts").unwrap();
    let r = lint("test-repos/fake-project/tests/hooks.test.ts");
    let (fixed, outcome) = fix_source(&source, &r).unwrap();
    assert_eq!(outcome.applied, 2);
    assert_eq!(outcome.skipped, 0);

    assert!(fixed.contains("beforeAll(function () {return new Promise(done => {"));
    assert!(fixed.contains("afterEach(() => new Promise(done => db.reset(done)));"));

    let after = Linter::default()
        .lint_source(Path::new("hooks.test.ts"), &fixed)
        .unwrap();
    assert_eq!(
        kinds(&after),
        vec![(14, MessageKind::UseAwaitInsteadOfCallback, false)]
    );
}

#[test]
fn fixing_table_fixture_keeps_row_parameter() {
    let source = fs::read_to_string("test-repos/fake-project/tests/table.test.ts").unwrap();
    let r = lint("test-repos/fake-project/tests/table.test.ts");
    let (fixed, _) = fix_source(&source, &r).unwrap();
    assert!(fixed.contains("({ a, b, expected }) => {return new Promise(done => {"));
    // the direct `.each(table)` form is left untouched
    assert!(fixed.contains("(a, b, expected, done) => {"));
}

#[test]
fn apply_file_fixes_rewrites_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("timers.test.ts");
    fs::copy("test-repos/fake-project/tests/timers.test.ts", &path).unwrap();

    let linter = Linter::new(&load_config(dir.path(), None).unwrap());
    let before = linter.lint_path(&path).unwrap();
    let outcome = apply_file_fixes(&path, &before).unwrap();
    assert_eq!(outcome.applied, 2);

    let after = linter.lint_path(&path).unwrap();
    assert_eq!(after.diagnostics.len(), 1);
    assert_eq!(after.fixable_count(), 0);

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("it('fires once', () => {return new Promise(done => {"));
    assert!(content.contains("function () {return new Promise(finish => {"));
}

#[test]
fn nested_fixes_apply_in_one_pass() {
    let source = "test('outer', function (done) {\n  beforeEach(cb => cb());\n  done();\n});\n";
    let r = Linter::default()
        .lint_source(Path::new("n.test.ts"), source)
        .unwrap();
    assert_eq!(r.fixable_count(), 2);
    let (fixed, outcome) = fix_source(source, &r).unwrap();
    assert_eq!(outcome.applied, 2);
    assert_eq!(
        fixed,
        "test('outer', function () {return new Promise(done => {\n  beforeEach(() => new Promise(cb => cb()));\n  done();\n})});\n"
    );
}

// --- Config discovery ---

#[test]
fn config_in_parent_directory_is_used() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".nodonerc.json"),
        r#"{ "severity": "info", "globalAliases": { "test": ["scenario"] } }"#,
    )
    .unwrap();
    let nested = dir.path().join("pkg/tests");
    fs::create_dir_all(&nested).unwrap();
    let file = nested.join("a.test.ts");
    fs::write(&file, "scenario('x', done => done());\n").unwrap();

    let r = nodone::lint_file(&file, &nested, None).unwrap();
    assert_eq!(r.diagnostics.len(), 1);
    assert_eq!(r.diagnostics[0].severity, Severity::Info);
}
