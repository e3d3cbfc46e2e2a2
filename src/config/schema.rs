//! Config schema and deserialization

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Configured severity (error, warning, info, off)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    #[default]
    Error,
    Warning,
    Info,
    /// Disable the rule entirely
    Off,
}

impl RuleSeverity {
    /// Convert to crate::Severity if not Off
    pub fn to_severity(self) -> Option<crate::Severity> {
        match self {
            RuleSeverity::Error => Some(crate::Severity::Error),
            RuleSeverity::Warning => Some(crate::Severity::Warning),
            RuleSeverity::Info => Some(crate::Severity::Info),
            RuleSeverity::Off => None,
        }
    }
}

/// Per-path override configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverride {
    /// Glob patterns this override applies to
    pub files: Vec<String>,

    /// Severity for matched files
    #[serde(default)]
    pub severity: Option<RuleSeverity>,
}

/// Root config structure for .nodonerc.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config, or package name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Severity of reported diagnostics. Default: error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<RuleSeverity>,

    /// Glob patterns for files/directories to exclude from linting
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Custom test file suffixes (default: .test.ts, .spec.ts, etc.)
    #[serde(default)]
    pub test_patterns: Vec<String>,

    /// Alternative global names: canonical name -> aliases
    /// e.g. { "it": ["spec"] }
    #[serde(default)]
    pub global_aliases: HashMap<String, Vec<String>>,

    /// Per-path configuration overrides (for monorepos, legacy code, etc.)
    #[serde(default)]
    pub overrides: Vec<ConfigOverride>,
}

impl Config {
    /// Effective severity for a file, applying matching overrides in order
    pub fn effective_severity_for_file(&self, file_path: &Path) -> RuleSeverity {
        let mut severity = self.severity.unwrap_or_default();
        for override_cfg in &self.overrides {
            if Self::matches_override(file_path, &override_cfg.files) {
                if let Some(s) = override_cfg.severity {
                    severity = s;
                }
            }
        }
        severity
    }

    /// Check if a file path matches any of the override patterns
    fn matches_override(file_path: &Path, patterns: &[String]) -> bool {
        let path_str = file_path.to_string_lossy();
        for pattern in patterns {
            if let Ok(glob) = globset::Glob::new(pattern) {
                let matcher = glob.compile_matcher();
                if matcher.is_match(file_path)
                    || path_str.contains(pattern.trim_start_matches("**/"))
                {
                    return true;
                }
            }
        }
        false
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.severity.is_none() {
            self.severity = base.severity;
        }
        if self.extends.is_none() {
            self.extends = base.extends;
        }

        let mut all_ignores = base.ignore;
        all_ignores.append(&mut self.ignore);
        self.ignore = all_ignores;

        if self.test_patterns.is_empty() {
            self.test_patterns = base.test_patterns;
        }

        for (canonical, aliases) in base.global_aliases {
            self.global_aliases.entry(canonical).or_insert(aliases);
        }

        // Prepend base overrides
        let mut all_overrides = base.overrides;
        all_overrides.append(&mut self.overrides);
        self.overrides = all_overrides;
    }

    /// Get default test file patterns
    pub fn get_test_patterns(&self) -> Vec<&str> {
        if self.test_patterns.is_empty() {
            vec![
                ".test.ts",
                ".test.tsx",
                ".spec.ts",
                ".spec.tsx",
                ".test.js",
                ".test.jsx",
                ".spec.js",
                ".spec.jsx",
                ".test.mjs",
                ".test.cjs",
                ".spec.mjs",
                ".spec.cjs",
            ]
        } else {
            self.test_patterns.iter().map(|s| s.as_str()).collect()
        }
    }

    /// Config written by `nodone init`
    pub fn starter() -> Self {
        Self {
            severity: Some(RuleSeverity::Error),
            ignore: vec!["**/node_modules/**".to_string(), "**/dist/**".to_string()],
            ..Self::default()
        }
    }
}
