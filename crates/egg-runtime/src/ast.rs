//! Abstract Syntax Tree (AST) definitions
//!
//! Three node kinds cover the whole language: literals, words, and applications.
//! The tree is pure data; all behavior lives in the interpreter.

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// AST schema version
pub const AST_VERSION: u32 = 1;

/// Versioned AST wrapper for JSON serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedProgram {
    /// AST schema version
    pub ast_version: u32,
    /// Root expression of the program
    pub root: Node,
}

impl VersionedProgram {
    /// Create a new versioned program wrapper
    pub fn new(root: Node) -> Self {
        Self {
            ast_version: AST_VERSION,
            root,
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<Node> for VersionedProgram {
    fn from(root: Node) -> Self {
        Self::new(root)
    }
}

/// Literal payload of a `Value` node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Literal {
    /// Unquoted text of a string literal
    String(String),
    Number(f64),
}

/// Expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "lowercase")]
pub enum Node {
    /// String or numeric literal
    Value { raw: Literal, span: Span },
    /// Variable reference, operator symbol, or special-form name
    Word { name: String, span: Span },
    /// Call of `operator` with `args`; the operator is any node, so `f(x)(y)` nests
    Apply {
        operator: Box<Node>,
        args: Vec<Node>,
        span: Span,
    },
}

impl Node {
    pub fn string(text: impl Into<String>, span: Span) -> Self {
        Node::Value {
            raw: Literal::String(text.into()),
            span,
        }
    }

    pub fn number(n: f64, span: Span) -> Self {
        Node::Value {
            raw: Literal::Number(n),
            span,
        }
    }

    pub fn word(name: impl Into<String>, span: Span) -> Self {
        Node::Word {
            name: name.into(),
            span,
        }
    }

    pub fn apply(operator: Node, args: Vec<Node>, span: Span) -> Self {
        Node::Apply {
            operator: Box::new(operator),
            args,
            span,
        }
    }

    /// Get the span of this node
    pub fn span(&self) -> Span {
        match self {
            Node::Value { span, .. } | Node::Word { span, .. } | Node::Apply { span, .. } => *span,
        }
    }

    /// The name of a `Word` node
    pub fn as_word(&self) -> Option<&str> {
        match self {
            Node::Word { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Structural equality that ignores spans
    pub fn same_shape(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Value { raw: a, .. }, Node::Value { raw: b, .. }) => a == b,
            (Node::Word { name: a, .. }, Node::Word { name: b, .. }) => a == b,
            (
                Node::Apply {
                    operator: op_a,
                    args: args_a,
                    ..
                },
                Node::Apply {
                    operator: op_b,
                    args: args_b,
                    ..
                },
            ) => {
                op_a.same_shape(op_b)
                    && args_a.len() == args_b.len()
                    && args_a.iter().zip(args_b).all(|(a, b)| a.same_shape(b))
            }
            _ => false,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "\"{}\"", s),
            Literal::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Renders the node back into call syntax, e.g. `do(define(x, 1), print(x))`
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Value { raw, .. } => write!(f, "{}", raw),
            Node::Word { name, .. } => write!(f, "{}", name),
            Node::Apply { operator, args, .. } => {
                write!(f, "{}(", operator)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}
