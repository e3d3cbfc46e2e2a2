//! Shared tree-sitter helpers: node text, callee name resolution, and token
//! navigation.
//!
//! A "token" here is a leaf node of the concrete syntax tree (keywords and
//! punctuation included). Comments are tree-sitter extras and are skipped by
//! every token helper.

use crate::{Location, Span};
use tree_sitter::Node;

/// Text of a node, or "" if the range is not valid UTF-8.
pub fn node_text<'a>(node: Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

pub fn is_comment(node: Node) -> bool {
    node.kind() == "comment" || node.kind() == "html_comment"
}

/// Arrow functions, function expressions and generator function expressions.
pub fn is_function_literal(node: Node) -> bool {
    matches!(
        node.kind(),
        "arrow_function" | "function_expression" | "function" | "generator_function"
    )
}

/// Resolve a callee expression to its dotted member path, e.g. `it.only`,
/// `test.each` or `describe.skip`.
///
/// Calls and tagged templates resolve through their callee, so
/// ``test.each`table` `` and `test.each(table)` both resolve to `test.each`.
/// Bracket access with a string key (`test["only"]`) resolves like dot access.
/// Any other shape (computed keys, `this`, parenthesized expressions) is `None`.
pub fn callee_path(node: Node, source: &str) -> Option<String> {
    match node.kind() {
        "identifier" | "property_identifier" => Some(node_text(node, source).to_string()),
        "string" | "template_string" => string_content(node, source),
        "member_expression" => join_path(
            callee_path(node.child_by_field_name("object")?, source)?,
            callee_path(node.child_by_field_name("property")?, source)?,
        ),
        "subscript_expression" => join_path(
            callee_path(node.child_by_field_name("object")?, source)?,
            string_content(node.child_by_field_name("index")?, source)?,
        ),
        "call_expression" => callee_path(node.child_by_field_name("function")?, source),
        "new_expression" => callee_path(node.child_by_field_name("constructor")?, source),
        _ => None,
    }
}

fn join_path(object: String, property: String) -> Option<String> {
    Some(format!("{}.{}", object, property))
}

/// Literal content of a string, or of a template string without substitutions.
pub fn string_content(node: Node, source: &str) -> Option<String> {
    match node.kind() {
        "string" => {}
        "template_string" => {
            let mut cursor = node.walk();
            let has_substitution = node
                .named_children(&mut cursor)
                .any(|c| c.kind() == "template_substitution");
            if has_substitution {
                return None;
            }
        }
        _ => return None,
    }
    let text = node_text(node, source);
    if text.len() < 2 {
        return None;
    }
    text.get(1..text.len() - 1).map(str::to_string)
}

/// Named, non-comment children of a node.
pub fn named_children_of(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| !is_comment(*c))
        .collect()
}

/// First token inside a node. `None` for nodes that contain no tokens.
pub fn first_token(node: Node) -> Option<Node> {
    let mut current = node;
    loop {
        if current.child_count() == 0 {
            return (!is_comment(current)).then_some(current);
        }
        let mut cursor = current.walk();
        let next = current.children(&mut cursor).find(|c| !is_comment(*c))?;
        current = next;
    }
}

/// Last token inside a node. `None` for nodes that contain no tokens.
pub fn last_token(node: Node) -> Option<Node> {
    let mut current = node;
    loop {
        if current.child_count() == 0 {
            return (!is_comment(current)).then_some(current);
        }
        let mut cursor = current.walk();
        let next = current
            .children(&mut cursor)
            .filter(|c| !is_comment(*c))
            .last()?;
        current = next;
    }
}

/// The token immediately preceding a node in source order.
pub fn token_before(node: Node) -> Option<Node> {
    let mut current = node;
    loop {
        match current.prev_sibling() {
            Some(prev) if is_comment(prev) || prev.start_byte() == prev.end_byte() => {
                current = prev;
            }
            Some(prev) => return last_token(prev),
            None => current = current.parent()?,
        }
    }
}

/// The token immediately following a node in source order.
pub fn token_after(node: Node) -> Option<Node> {
    let mut current = node;
    loop {
        match current.next_sibling() {
            Some(next) if is_comment(next) || next.start_byte() == next.end_byte() => {
                current = next;
            }
            Some(next) => return first_token(next),
            None => current = current.parent()?,
        }
    }
}

/// Convert a tree-sitter Node to Location.
pub fn node_to_location(node: Node) -> Location {
    Location::new(
        node.start_position().row + 1,
        node.start_position().column + 1,
    )
    .with_end(node.end_position().row + 1, node.end_position().column + 1)
}

pub fn node_span(node: Node) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}
