//! Name-based detection of test and hook registration calls.
//!
//! A callee path such as `it.concurrent.only` is split on `.`; the root is
//! resolved through configured global aliases, then the whole chain is
//! matched against the known test and hook call shapes.

use std::collections::HashMap;

/// What a call registers, judged by its callee name alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestCallKind {
    /// Not a test or hook call (includes `describe` blocks)
    None,
    /// `beforeAll`, `beforeEach`, `afterAll`, `afterEach`
    Hook,
    /// `it`, `test` and their modifier chains
    Test,
}

const HOOKS: &[&str] = &["beforeAll", "beforeEach", "afterAll", "afterEach"];

/// Test call chains, `.each` variants excluded (those are handled by the rule).
const TEST_CHAINS: &[&str] = &[
    "fit",
    "fit.failing",
    "it",
    "it.concurrent",
    "it.concurrent.only",
    "it.concurrent.skip",
    "it.failing",
    "it.only",
    "it.only.failing",
    "it.skip",
    "it.skip.failing",
    "it.todo",
    "test",
    "test.concurrent",
    "test.concurrent.only",
    "test.concurrent.skip",
    "test.failing",
    "test.only",
    "test.only.failing",
    "test.skip",
    "test.skip.failing",
    "test.todo",
    "xit",
    "xit.failing",
    "xtest",
    "xtest.failing",
];

/// Classifies callee paths as tests or hooks
#[derive(Debug, Clone, Default)]
pub struct TestCallDetector {
    /// alias root -> canonical root (e.g. "spec" -> "it")
    aliases: HashMap<String, String>,
}

impl TestCallDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register global aliases: canonical name -> alternative root identifiers.
    pub fn with_aliases(mut self, aliases: &HashMap<String, Vec<String>>) -> Self {
        for (canonical, alternatives) in aliases {
            for alias in alternatives {
                self.aliases.insert(alias.clone(), canonical.clone());
            }
        }
        self
    }

    /// Classify a resolved callee path.
    pub fn classify(&self, path: &str) -> TestCallKind {
        let (root, rest) = match path.split_once('.') {
            Some((root, rest)) => (root, Some(rest)),
            None => (path, None),
        };
        let root = self.aliases.get(root).map(String::as_str).unwrap_or(root);

        if rest.is_none() && HOOKS.contains(&root) {
            return TestCallKind::Hook;
        }

        let canonical = match rest {
            Some(rest) => format!("{}.{}", root, rest),
            None => root.to_string(),
        };
        if TEST_CHAINS.contains(&canonical.as_str()) {
            TestCallKind::Test
        } else {
            TestCallKind::None
        }
    }
}
