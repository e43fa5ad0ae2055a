//! Parsing (source text to AST)
//!
//! Recursive descent straight over the source text: there is no separate token stream.
//! The parser keeps a `rest` slice of unconsumed input and shrinks it as tokens are
//! recognized, so every decision needs only the next character or token shape.
//!
//! Trees are limited to [`MAX_NESTING_DEPTH`] levels. Argument lists and call-chain links
//! both add a level, so `f(x)(y)` is as deep as `f(g(y))`.

use crate::ast::Node;
use crate::diagnostic::error_codes;
use crate::error::{EggResult, Error};
use crate::span::Span;
use crate::stack::ensure_sufficient_stack;

/// Deepest syntax tree the parser will build
pub const MAX_NESTING_DEPTH: usize = 1000;

/// Parse a complete program: one expression, optionally surrounded by whitespace
pub fn parse_program(source: &str) -> EggResult<Node> {
    Parser::new(source).parse()
}

/// Parser state: the full source and the unconsumed remainder
pub struct Parser<'src> {
    source: &'src str,
    rest: &'src str,
    /// Argument lists currently open
    depth: usize,
}

/// Shape of the token at the current position
enum TokenShape<'src> {
    String(&'src str),
    Number(&'src str),
    Word(&'src str),
}

impl<'src> Parser<'src> {
    /// Create a new parser for the given source text
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            rest: source,
            depth: 0,
        }
    }

    /// Parse the whole input as a single expression
    pub fn parse(mut self) -> EggResult<Node> {
        let node = self.parse_expression()?;
        self.skip_space();
        if !self.rest.is_empty() {
            let start = self.offset();
            return Err(Error::syntax(
                error_codes::TRAILING_INPUT,
                format!("unexpected text after program: {}", preview(self.rest)),
                Span::new(start, self.source.len()),
            ));
        }
        tracing::debug!(bytes = self.source.len(), "parsed program");
        Ok(node)
    }

    /// Parse one expression: a literal or word followed by any number of call suffixes
    pub fn parse_expression(&mut self) -> EggResult<Node> {
        self.parse_nested().map(|(node, _height)| node)
    }

    /// Parse one expression and report the height of its tree
    fn parse_nested(&mut self) -> EggResult<(Node, usize)> {
        ensure_sufficient_stack(|| {
            let atom = self.parse_atom()?;
            self.parse_apply(atom)
        })
    }

    fn parse_atom(&mut self) -> EggResult<Node> {
        self.skip_space();
        let start = self.offset();

        match self.scan_token() {
            Some(TokenShape::String(lexeme)) => {
                self.advance(lexeme.len());
                // lexeme includes both quotes
                Ok(Node::string(&lexeme[1..lexeme.len() - 1], Span::new(start, self.offset())))
            }
            Some(TokenShape::Number(digits)) => {
                self.advance(digits.len());
                let value: f64 = digits.parse().map_err(|_| {
                    Error::syntax(
                        error_codes::UNEXPECTED_SYNTAX,
                        format!("invalid number literal: {}", digits),
                        Span::new(start, self.offset()),
                    )
                })?;
                Ok(Node::number(value, Span::new(start, self.offset())))
            }
            Some(TokenShape::Word(name)) => {
                self.advance(name.len());
                Ok(Node::word(name, Span::new(start, self.offset())))
            }
            None => {
                let end = self.rest.chars().next().map_or(start, |c| start + c.len_utf8());
                Err(Error::syntax(
                    error_codes::UNEXPECTED_SYNTAX,
                    format!("unexpected syntax: {}", preview(self.rest)),
                    Span::new(start, end),
                ))
            }
        }
    }

    /// Wrap `node` in one application per `(...)` suffix, so `f(x)(y)` becomes
    /// `Apply(Apply(f, [x]), [y])`
    fn parse_apply(&mut self, mut node: Node) -> EggResult<(Node, usize)> {
        let mut height = 1;

        loop {
            self.skip_space();
            if !self.rest.starts_with('(') {
                return Ok((node, height));
            }

            let open = self.offset();
            if self.depth >= MAX_NESTING_DEPTH {
                return Err(too_deep(Span::new(open, open + 1)));
            }
            self.advance(1);

            self.depth += 1;
            let parsed = self.parse_arguments();
            self.depth -= 1;
            let (args, args_height) = parsed?;

            // Consume the closing ')'
            self.advance(1);
            let span = node.span().merge(Span::new(self.offset() - 1, self.offset()));
            height = height.max(args_height) + 1;
            if height > MAX_NESTING_DEPTH {
                return Err(too_deep(span));
            }

            tracing::trace!(argc = args.len(), "parsed application");
            node = Node::apply(node, args, span);
        }
    }

    /// Parse `arg, arg, ...` up to, not including, the closing `)`
    fn parse_arguments(&mut self) -> EggResult<(Vec<Node>, usize)> {
        let mut args = Vec::new();
        let mut height = 0;
        loop {
            self.skip_space();
            if self.rest.starts_with(')') {
                return Ok((args, height));
            }

            let (arg, arg_height) = self.parse_nested()?;
            args.push(arg);
            height = height.max(arg_height);

            self.skip_space();
            if self.rest.starts_with(',') {
                self.advance(1);
            } else if !self.rest.starts_with(')') {
                let at = self.offset();
                let found = self.rest.chars().next();
                let message = match found {
                    Some(c) => format!("expected ',' or ')', found '{}'", c),
                    None => "expected ',' or ')', found end of input".to_string(),
                };
                let end = found.map_or(at, |c| at + c.len_utf8());
                return Err(Error::syntax(
                    error_codes::EXPECTED_SEPARATOR,
                    message,
                    Span::new(at, end),
                ));
            }
        }
    }

    /// Classify the token at the current position without consuming it.
    ///
    /// Patterns are tried in fixed order: string, digit run, word. The first match wins.
    fn scan_token(&self) -> Option<TokenShape<'src>> {
        let rest = self.rest;

        if let Some(body) = rest.strip_prefix('"') {
            if let Some(close) = body.find('"') {
                return Some(TokenShape::String(&rest[..close + 2]));
            }
        }

        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits > 0 && at_word_boundary(&rest[digits..]) {
            return Some(TokenShape::Number(&rest[..digits]));
        }

        let word = rest.len() - rest.trim_start_matches(is_word_char).len();
        if word > 0 {
            return Some(TokenShape::Word(&rest[..word]));
        }

        None
    }

    fn skip_space(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn advance(&mut self, bytes: usize) {
        self.rest = &self.rest[bytes..];
    }

    /// Byte offset of the current position within the full source
    fn offset(&self) -> usize {
        self.source.len() - self.rest.len()
    }
}

/// Characters allowed in a bare word: everything except whitespace, `(`, `)`, `,` and `"`
fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | ',' | '"')
}

/// A digit run only counts as a number when no ASCII word character (`[A-Za-z0-9_]`) follows it
fn at_word_boundary(after: &str) -> bool {
    match after.chars().next() {
        None => true,
        Some(c) => !(c.is_ascii_alphanumeric() || c == '_'),
    }
}

fn too_deep(span: Span) -> Error {
    Error::syntax(
        error_codes::NESTING_TOO_DEEP,
        format!("program nested too deeply (max depth: {})", MAX_NESTING_DEPTH),
        span,
    )
}

/// Short excerpt of the remaining input for error messages
fn preview(text: &str) -> String {
    const MAX_PREVIEW: usize = 20;
    let mut excerpt: String = text.chars().take(MAX_PREVIEW).collect();
    if text.chars().count() > MAX_PREVIEW {
        excerpt.push_str("...");
    }
    excerpt.replace('\n', "\\n")
}
