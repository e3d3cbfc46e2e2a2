//! Parser module: tree-sitter parsing, typed node views and token navigation

pub mod ast_helpers;
pub mod ignore_directives;
pub mod syntax;
pub mod typescript;

pub use ast_helpers::{
    callee_path, first_token, is_function_literal, last_token, node_span, node_text,
    node_to_location, token_after, token_before,
};
pub use ignore_directives::IgnoreDirectives;
pub use syntax::{CallSite, FunctionBody, FunctionLiteral, Param, Syntax};
pub use typescript::TypeScriptParser;
