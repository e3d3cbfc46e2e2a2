//! Lint rules for test files

pub mod no_done_callback;

pub use no_done_callback::NoDoneCallbackRule;

use crate::detector::TestCallDetector;
use crate::fixer::RewriteError;
use crate::parser::CallSite;
use crate::{Diagnostic, Rule};

/// What a rule can see while checking a call
pub struct RuleContext<'a> {
    pub source: &'a str,
    pub detector: &'a TestCallDetector,
}

/// Trait for lint rules. A rule is shown one call site at a time and
/// reports at most one diagnostic for it.
pub trait LintRule: Send + Sync {
    /// Rule identifier
    fn rule(&self) -> Rule;

    /// Check a call site. `Err` means the tree did not have the shape the
    /// rule's rewrite relies on and the file cannot be linted.
    fn check_call(
        &self,
        ctx: &RuleContext<'_>,
        call: &CallSite<'_>,
    ) -> Result<Option<Diagnostic>, RewriteError>;
}
