//! Rewrite a done-callback function into one that returns a `Promise`.
//!
//! ```text
//! test('x', function (done) { done(); })
//! test('x', function () {return new Promise(done => { done(); })})
//!
//! hook(done => done())
//! hook(() => new Promise(done => done()))
//! ```

use super::{EditPlan, TextEdit};
use crate::parser::{first_token, last_token, node_span, token_after, token_before};
use crate::parser::{FunctionBody, FunctionLiteral};
use crate::Span;
use std::fmt;
use thiserror::Error;
use tree_sitter::Node;

/// Tokens the rewrite is anchored on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    FirstBodyToken,
    LastBodyToken,
    TokenBeforeParameter,
    TokenAfterParameter,
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::FirstBodyToken => write!(f, "first body token"),
            Anchor::LastBodyToken => write!(f, "last body token"),
            Anchor::TokenBeforeParameter => write!(f, "token before the callback parameter"),
            Anchor::TokenAfterParameter => write!(f, "token after the callback parameter"),
        }
    }
}

/// The tree did not have the shape the rewrite relies on. This is a parser or
/// traversal bug, never a property of the user's code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RewriteError {
    #[error("internal error: could not locate the {anchor} at byte {offset}")]
    MissingAnchor { anchor: Anchor, offset: usize },

    #[error("internal error: expected `{expected}` as the {anchor}, found `{found}` at byte {offset}")]
    UnexpectedToken {
        anchor: Anchor,
        expected: &'static str,
        found: String,
        offset: usize,
    },

    #[error("internal error: function has no parameter at index {index}")]
    NoParameter { index: usize },
}

/// Compute the edits that drop the parameter at `index` (named `callback`)
/// and wrap the body in `new Promise(callback => ...)`.
///
/// The function must be synchronous; an async function would need its
/// callback calls turned into awaits, which is not a textual rewrite.
pub fn wrap_in_promise(
    function: &FunctionLiteral<'_>,
    index: usize,
    callback: &str,
) -> Result<EditPlan, RewriteError> {
    let param = function
        .params
        .get(index)
        .ok_or(RewriteError::NoParameter { index })?
        .node();
    let body = function.body.node();

    let first_body = anchor(first_token(body), Anchor::FirstBodyToken, body)?;
    let last_body = anchor(last_token(body), Anchor::LastBodyToken, body)?;
    let before = anchor(token_before(param), Anchor::TokenBeforeParameter, param)?;
    let after = anchor(token_after(param), Anchor::TokenAfterParameter, param)?;

    let mut plan = EditPlan::new();
    plan.push(parameter_edit(param, before, after, index)?);

    match function.body {
        FunctionBody::Block(_) => {
            expect_token(first_body, "{", Anchor::FirstBodyToken)?;
            expect_token(last_body, "}", Anchor::LastBodyToken)?;
            plan.push(TextEdit::insert_after(
                first_body.end_byte(),
                format!("return new Promise({} => {{", callback),
            ));
            plan.push(TextEdit::insert_before(last_body.start_byte(), "})"));
        }
        FunctionBody::Expression(_) => {
            plan.push(TextEdit::insert_before(
                first_body.start_byte(),
                format!("new Promise({} => ", callback),
            ));
            plan.push(TextEdit::insert_after(last_body.end_byte(), ")"));
        }
    }

    Ok(plan)
}

fn parameter_edit(
    param: Node,
    before: Node,
    after: Node,
    index: usize,
) -> Result<TextEdit, RewriteError> {
    if index > 0 {
        // `(row, done)` -> `(row)`: drop the separating comma with the parameter
        expect_token(before, ",", Anchor::TokenBeforeParameter)?;
        return Ok(TextEdit::remove(Span::new(
            before.start_byte(),
            param.end_byte(),
        )));
    }

    let closing = if after.kind() == "," {
        anchor(token_after(after), Anchor::TokenAfterParameter, after)?
    } else {
        after
    };
    if before.kind() == "(" && closing.kind() == ")" {
        // `(done)` -> `()`
        Ok(TextEdit::remove(Span::new(
            before.end_byte(),
            closing.start_byte(),
        )))
    } else {
        // `done => ...` -> `() => ...`
        Ok(TextEdit::replace(node_span(param), "()"))
    }
}

fn anchor<'t>(
    token: Option<Node<'t>>,
    which: Anchor,
    near: Node,
) -> Result<Node<'t>, RewriteError> {
    token.ok_or(RewriteError::MissingAnchor {
        anchor: which,
        offset: near.start_byte(),
    })
}

fn expect_token(token: Node, expected: &'static str, anchor: Anchor) -> Result<(), RewriteError> {
    if token.kind() == expected {
        Ok(())
    } else {
        Err(RewriteError::UnexpectedToken {
            anchor,
            expected,
            found: token.kind().to_string(),
            offset: token.start_byte(),
        })
    }
}
