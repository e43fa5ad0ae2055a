//! Error type shared by the parser and the interpreter
//!
//! Every failure is fatal to the current evaluation and unwinds straight to the caller.
//! Variants carry the span of the offending text so diagnostics can point at it.

use crate::diagnostic::error_codes;
use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result alias used throughout the runtime
pub type EggResult<T> = Result<T, Error>;

/// Distinguishable error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    SyntaxError,
    ReferenceError,
    TypeError,
    RecursionLimit,
    IoError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::ReferenceError => "ReferenceError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::RecursionLimit => "RecursionLimit",
            ErrorKind::IoError => "IoError",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Malformed program text or misuse of a special form
    #[error("SyntaxError: {message}")]
    Syntax {
        code: &'static str,
        message: String,
        span: Span,
    },
    /// Lookup of a name bound nowhere in the environment chain
    #[error("ReferenceError: undefined variable: {name}")]
    Reference { name: String, span: Span },
    /// Applying a non-function, wrong argument count, or wrong operand types
    #[error("TypeError: {message}")]
    Type {
        code: &'static str,
        message: String,
        span: Span,
    },
    /// Function calls nested deeper than the interpreter allows
    #[error("RecursionLimit: maximum call depth of {limit} exceeded")]
    RecursionLimit { limit: usize, span: Span },
    /// Writing `print` output failed
    #[error("IoError: {message}")]
    Io { message: String, span: Span },
}

impl Error {
    pub fn syntax(code: &'static str, message: impl Into<String>, span: Span) -> Self {
        Error::Syntax {
            code,
            message: message.into(),
            span,
        }
    }

    pub fn undefined(name: impl Into<String>, span: Span) -> Self {
        Error::Reference {
            name: name.into(),
            span,
        }
    }

    pub fn type_error(code: &'static str, message: impl Into<String>, span: Span) -> Self {
        Error::Type {
            code,
            message: message.into(),
            span,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Syntax { .. } => ErrorKind::SyntaxError,
            Error::Reference { .. } => ErrorKind::ReferenceError,
            Error::Type { .. } => ErrorKind::TypeError,
            Error::RecursionLimit { .. } => ErrorKind::RecursionLimit,
            Error::Io { .. } => ErrorKind::IoError,
        }
    }

    /// Stable diagnostic code (see [`error_codes`])
    pub fn code(&self) -> &'static str {
        match self {
            Error::Syntax { code, .. } | Error::Type { code, .. } => *code,
            Error::Reference { .. } => error_codes::UNDEFINED_VARIABLE,
            Error::RecursionLimit { .. } => error_codes::RECURSION_LIMIT,
            Error::Io { .. } => error_codes::OUTPUT_FAILED,
        }
    }

    /// Get the source span for this error
    pub fn span(&self) -> Span {
        match self {
            Error::Syntax { span, .. }
            | Error::Reference { span, .. }
            | Error::Type { span, .. }
            | Error::RecursionLimit { span, .. }
            | Error::Io { span, .. } => *span,
        }
    }

    /// Message without the kind prefix
    pub fn message(&self) -> String {
        match self {
            Error::Syntax { message, .. } | Error::Type { message, .. } => message.clone(),
            Error::Reference { name, .. } => format!("undefined variable: {}", name),
            Error::RecursionLimit { limit, .. } => {
                format!("maximum call depth of {} exceeded", limit)
            }
            Error::Io { message, .. } => message.clone(),
        }
    }
}
