//! Text edits and their application.
//!
//! Rules never touch source text; they describe changes as an [`EditPlan`]
//! that a host applies after the walk. A plan is all-or-nothing: applying a
//! subset of its edits can leave the file unparseable.

pub mod promise_wrap;

pub use promise_wrap::{wrap_in_promise, Anchor, RewriteError};

use crate::{FileReport, Span};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// How an edit changes the text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditKind {
    Replace,
    InsertBefore,
    InsertAfter,
    Remove,
}

/// A single edit: replace `span` with `text`. Insertions have an empty span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub kind: EditKind,
    pub span: Span,
    pub text: String,
}

impl TextEdit {
    pub fn replace(span: Span, text: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Replace,
            span,
            text: text.into(),
        }
    }

    /// Insert text so that it ends right at `offset` (before the token starting there)
    pub fn insert_before(offset: usize, text: impl Into<String>) -> Self {
        Self {
            kind: EditKind::InsertBefore,
            span: Span::new(offset, offset),
            text: text.into(),
        }
    }

    /// Insert text starting right at `offset` (after the token ending there)
    pub fn insert_after(offset: usize, text: impl Into<String>) -> Self {
        Self {
            kind: EditKind::InsertAfter,
            span: Span::new(offset, offset),
            text: text.into(),
        }
    }

    pub fn remove(span: Span) -> Self {
        Self {
            kind: EditKind::Remove,
            span,
            text: String::new(),
        }
    }

    /// Two edits conflict if their ranges share a byte, an insertion falls
    /// strictly inside the other's range, or both insert at the same offset.
    pub fn conflicts_with(&self, other: &TextEdit) -> bool {
        let (a, b) = (self.span, other.span);
        match (a.is_empty(), b.is_empty()) {
            (true, true) => a.start == b.start,
            (true, false) => b.start < a.start && a.start < b.end,
            (false, true) => a.start < b.start && b.start < a.end,
            (false, false) => a.start < b.end && b.start < a.end,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("edit at {start}..{end} is out of bounds or not on a character boundary")]
    OutOfBounds { start: usize, end: usize },

    #[error("edits at {first:?} and {second:?} overlap")]
    Overlap { first: Span, second: Span },
}

/// An ordered set of disjoint edits applied together
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditPlan {
    edits: Vec<TextEdit>,
}

impl EditPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, edit: TextEdit) {
        self.edits.push(edit);
    }

    pub fn edits(&self) -> &[TextEdit] {
        &self.edits
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Edits sorted by position. Insertions at the same offset keep plan order.
    pub fn sorted(&self) -> Vec<&TextEdit> {
        let mut sorted: Vec<&TextEdit> = self.edits.iter().collect();
        sorted.sort_by_key(|e| (e.span.start, e.span.end));
        sorted
    }

    /// Reject plans whose edits overlap. Insertions sharing an offset are
    /// allowed within one plan; they apply in plan order.
    pub fn validate(&self) -> Result<(), EditError> {
        for (i, a) in self.edits.iter().enumerate() {
            for b in &self.edits[i + 1..] {
                if a.span.is_empty() && b.span.is_empty() {
                    continue;
                }
                if a.conflicts_with(b) {
                    return Err(EditError::Overlap {
                        first: a.span,
                        second: b.span,
                    });
                }
            }
        }
        Ok(())
    }

    /// Apply the plan to `source`, producing the rewritten text.
    pub fn apply(&self, source: &str) -> Result<String, EditError> {
        self.validate()?;
        let mut out = String::with_capacity(source.len() + 64);
        let mut cursor = 0;
        for edit in self.sorted() {
            let Span { start, end } = edit.span;
            let kept = source
                .get(cursor..start)
                .ok_or(EditError::OutOfBounds { start, end })?;
            if source.get(start..end).is_none() {
                return Err(EditError::OutOfBounds { start, end });
            }
            out.push_str(kept);
            out.push_str(&edit.text);
            cursor = end;
        }
        out.push_str(&source[cursor..]);
        Ok(out)
    }

    fn conflicts_with(&self, other: &EditPlan) -> bool {
        self.edits
            .iter()
            .any(|a| other.edits.iter().any(|b| a.conflicts_with(b)))
    }
}

/// Combine plans for one file. A plan that conflicts with an already accepted
/// plan is dropped whole. Returns the merged plan and the number dropped.
pub fn merge_plans<'a>(plans: impl IntoIterator<Item = &'a EditPlan>) -> (EditPlan, usize) {
    let mut accepted: Vec<&EditPlan> = Vec::new();
    let mut dropped = 0;
    for plan in plans {
        if accepted.iter().any(|p| p.conflicts_with(plan)) {
            dropped += 1;
            continue;
        }
        accepted.push(plan);
    }
    let mut merged = EditPlan::new();
    for plan in accepted {
        for edit in &plan.edits {
            merged.push(edit.clone());
        }
    }
    (merged, dropped)
}

/// Outcome of fixing one file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixOutcome {
    /// Suggestions applied
    pub applied: usize,
    /// Suggestions skipped because they conflicted with another
    pub skipped: usize,
}

/// Apply every suggestion in `report` to `source`.
pub fn fix_source(source: &str, report: &FileReport) -> Result<(String, FixOutcome), EditError> {
    let plans: Vec<&EditPlan> = report
        .diagnostics
        .iter()
        .flat_map(|d| d.suggestions.iter().map(|s| &s.edits))
        .collect();
    let total = plans.len();
    let (merged, skipped) = merge_plans(plans);
    if skipped > 0 {
        tracing::warn!(
            file = %report.file_path.display(),
            skipped,
            "dropped conflicting rewrites; run again to apply them"
        );
    }
    let fixed = merged.apply(source)?;
    Ok((
        fixed,
        FixOutcome {
            applied: total - skipped,
            skipped,
        },
    ))
}

/// Apply every suggestion in `report` to the file on disk.
pub fn apply_file_fixes(path: &Path, report: &FileReport) -> anyhow::Result<FixOutcome> {
    use anyhow::Context;

    if report.fixable_count() == 0 {
        return Ok(FixOutcome::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let (fixed, outcome) = fix_source(&content, report)
        .with_context(|| format!("Failed to apply fixes to {}", path.display()))?;
    if fixed != content {
        fs::write(path, fixed).with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(edits: Vec<TextEdit>) -> EditPlan {
        let mut p = EditPlan::new();
        for e in edits {
            p.push(e);
        }
        p
    }

    #[test]
    fn apply_replace_and_inserts() {
        let source = "f(done => done());";
        let p = plan(vec![
            TextEdit::replace(Span::new(2, 6), "()"),
            TextEdit::insert_before(10, "new Promise(done => "),
            TextEdit::insert_after(16, ")"),
        ]);
        assert_eq!(
            p.apply(source).unwrap(),
            "f(() => new Promise(done => done()));"
        );
    }

    #[test]
    fn same_offset_insertions_keep_plan_order() {
        let p = plan(vec![
            TextEdit::insert_after(1, "A"),
            TextEdit::insert_before(1, "B"),
        ]);
        assert_eq!(p.apply("{}").unwrap(), "{AB}");
    }

    #[test]
    fn overlapping_ranges_are_rejected() {
        let p = plan(vec![
            TextEdit::remove(Span::new(0, 4)),
            TextEdit::replace(Span::new(2, 6), "x"),
        ]);
        assert!(matches!(p.apply("abcdefgh"), Err(EditError::Overlap { .. })));
    }

    #[test]
    fn insertion_inside_removed_range_is_rejected() {
        let p = plan(vec![
            TextEdit::remove(Span::new(0, 4)),
            TextEdit::insert_before(2, "x"),
        ]);
        assert!(p.validate().is_err());
    }

    #[test]
    fn out_of_bounds_is_an_error() {
        let p = plan(vec![TextEdit::remove(Span::new(3, 40))]);
        assert_eq!(
            p.apply("abc"),
            Err(EditError::OutOfBounds { start: 3, end: 40 })
        );
    }

    #[test]
    fn conflict_rules() {
        let removal = TextEdit::remove(Span::new(4, 8));
        assert!(removal.conflicts_with(&TextEdit::insert_before(6, "x")));
        assert!(!removal.conflicts_with(&TextEdit::insert_before(4, "x")));
        assert!(!removal.conflicts_with(&TextEdit::insert_after(8, "x")));
        assert!(!removal.conflicts_with(&TextEdit::remove(Span::new(8, 9))));
        assert!(removal.conflicts_with(&TextEdit::remove(Span::new(7, 9))));
        assert!(TextEdit::insert_after(3, "a").conflicts_with(&TextEdit::insert_before(3, "b")));
    }

    #[test]
    fn merge_drops_conflicting_plan_whole() {
        let first = plan(vec![TextEdit::replace(Span::new(0, 2), "xx")]);
        let second = plan(vec![
            TextEdit::insert_before(5, "y"),
            TextEdit::replace(Span::new(1, 3), "zz"),
        ]);
        let third = plan(vec![TextEdit::insert_after(6, "w")]);
        let (merged, dropped) = merge_plans([&first, &second, &third]);
        assert_eq!(dropped, 1);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.apply("abcdefg").unwrap(), "xxcdefwg");
    }
}
