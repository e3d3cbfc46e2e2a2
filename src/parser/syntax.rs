//! Typed views over the handful of node shapes the linter inspects.
//!
//! Raw tree-sitter nodes are dispatched on their kind string exactly once,
//! here; everything downstream matches on these enums.

use super::ast_helpers::{is_comment, is_function_literal, named_children_of, node_text};
use tree_sitter::Node;

/// A node classified by shape.
#[derive(Debug, Clone)]
pub enum Syntax<'t> {
    Call(CallSite<'t>),
    Function(FunctionLiteral<'t>),
    Other(Node<'t>),
}

impl<'t> Syntax<'t> {
    pub fn of(node: Node<'t>, source: &str) -> Self {
        if node.kind() == "call_expression" {
            if let Some(call) = CallSite::from_node(node) {
                return Syntax::Call(call);
            }
        } else if is_function_literal(node) {
            if let Some(function) = FunctionLiteral::from_node(node, source) {
                return Syntax::Function(function);
            }
        }
        Syntax::Other(node)
    }
}

/// A call expression with a parenthesized argument list.
#[derive(Debug, Clone)]
pub struct CallSite<'t> {
    pub node: Node<'t>,
    pub callee: Node<'t>,
    pub arguments: Vec<Node<'t>>,
    /// Callee is itself a tagged template, as in ``test.each`table`(name, fn)``
    pub tagged_callee: bool,
}

impl<'t> CallSite<'t> {
    /// `None` for tagged templates (``tag`text` `` parses as a call whose
    /// arguments are a template string); those are not calls.
    pub fn from_node(node: Node<'t>) -> Option<Self> {
        let callee = node.child_by_field_name("function")?;
        let args = node.child_by_field_name("arguments")?;
        if args.kind() != "arguments" {
            return None;
        }
        Some(Self {
            node,
            callee,
            arguments: named_children_of(args),
            tagged_callee: is_tagged_template(callee),
        })
    }

    pub fn argument(&self, index: usize) -> Option<Node<'t>> {
        self.arguments.get(index).copied()
    }
}

fn is_tagged_template(node: Node) -> bool {
    node.kind() == "call_expression"
        && node
            .child_by_field_name("arguments")
            .is_some_and(|a| a.kind() == "template_string")
}

/// An arrow function, function expression or generator function expression.
#[derive(Debug, Clone)]
pub struct FunctionLiteral<'t> {
    pub node: Node<'t>,
    pub params: Vec<Param<'t>>,
    pub body: FunctionBody<'t>,
    pub is_async: bool,
    /// `function* () {}`; its body may `yield`
    pub is_generator: bool,
}

impl<'t> FunctionLiteral<'t> {
    pub fn from_node(node: Node<'t>, source: &str) -> Option<Self> {
        if !is_function_literal(node) {
            return None;
        }
        let params = if let Some(single) = node.child_by_field_name("parameter") {
            // Unparenthesized arrow parameter: `done => ...`
            vec![Param::from_node(single, source)]
        } else {
            let list = node.child_by_field_name("parameters")?;
            named_children_of(list)
                .into_iter()
                .map(|p| Param::from_node(p, source))
                .collect()
        };
        let body = FunctionBody::from_node(node.child_by_field_name("body")?);
        Some(Self {
            node,
            params,
            body,
            is_async: has_async_keyword(node),
            is_generator: is_generator(node),
        })
    }
}

fn has_async_keyword(node: Node) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .filter(|c| !is_comment(*c))
        .any(|c| c.kind() == "async");
    found
}

fn is_generator(node: Node) -> bool {
    if node.kind() == "generator_function" {
        return true;
    }
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == "*");
    found
}

/// A formal parameter.
#[derive(Debug, Clone)]
pub enum Param<'t> {
    /// A plain name, optionally type-annotated (`done`, `done: DoneCallback`, `done?`)
    Identifier { node: Node<'t>, name: String },
    /// Destructuring, defaults, rest elements, `this` parameters
    Pattern(Node<'t>),
}

impl<'t> Param<'t> {
    pub fn from_node(node: Node<'t>, source: &str) -> Self {
        match node.kind() {
            "identifier" => Param::Identifier {
                node,
                name: node_text(node, source).to_string(),
            },
            "required_parameter" | "optional_parameter" => {
                let pattern = node.child_by_field_name("pattern");
                let has_default = node.child_by_field_name("value").is_some();
                match pattern {
                    Some(p) if p.kind() == "identifier" && !has_default => Param::Identifier {
                        node,
                        name: node_text(p, source).to_string(),
                    },
                    _ => Param::Pattern(node),
                }
            }
            _ => Param::Pattern(node),
        }
    }

    /// The whole parameter, including any type annotation.
    pub fn node(&self) -> Node<'t> {
        match self {
            Param::Identifier { node, .. } | Param::Pattern(node) => *node,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Param::Identifier { name, .. } => Some(name),
            Param::Pattern(_) => None,
        }
    }
}

/// A function body: a `{ ... }` block or a single arrow expression.
#[derive(Debug, Clone, Copy)]
pub enum FunctionBody<'t> {
    Block(Node<'t>),
    Expression(Node<'t>),
}

impl<'t> FunctionBody<'t> {
    pub fn from_node(node: Node<'t>) -> Self {
        if node.kind() == "statement_block" {
            FunctionBody::Block(node)
        } else {
            FunctionBody::Expression(node)
        }
    }

    pub fn node(&self) -> Node<'t> {
        match self {
            FunctionBody::Block(n) | FunctionBody::Expression(n) => *n,
        }
    }
}
