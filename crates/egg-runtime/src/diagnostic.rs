//! Diagnostic system for errors
//!
//! Parser and interpreter failures are turned into a [`Diagnostic`] at the API boundary,
//! so the CLI and REPL render every error the same way.

use crate::error::{Error, ErrorKind};
use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic schema version
pub const DIAG_VERSION: u32 = 1;

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// A rendered error with its source location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Diagnostic schema version
    pub diag_version: u32,
    pub level: DiagnosticLevel,
    /// Error category, absent for diagnostics not produced by evaluation
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub kind: Option<ErrorKind>,
    /// Error code (e.g., "EG0200")
    pub code: String,
    pub message: String,
    pub file: String,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Length of error span
    pub length: usize,
    /// Source line string
    pub snippet: String,
    /// Short label for caret range
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic with code
    pub fn error_with_code(
        code: impl Into<String>,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            diag_version: DIAG_VERSION,
            level: DiagnosticLevel::Error,
            kind: None,
            code: code.into(),
            message: message.into(),
            file: "<input>".to_string(),
            line: 1,
            column: span.start + 1,
            length: span.len(),
            snippet: String::new(),
            label: String::new(),
            help: None,
        }
    }

    /// Create a new error diagnostic (uses generic error code)
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::error_with_code(error_codes::GENERIC_ERROR, message, span)
    }

    /// Build a diagnostic for `error`, resolving its span against `source`
    pub fn from_error(error: &Error, source: &str) -> Self {
        let span = error.span();
        let (line, column) = span.line_col(source);
        let snippet = span.source_line(source);
        // Carets never run past the end of the snippet line
        let remaining = snippet.chars().count().saturating_sub(column - 1);
        let length = source
            .get(span.start..span.end)
            .map(|s| s.chars().count())
            .unwrap_or(0)
            .min(remaining);

        let mut diag = Self::error_with_code(error.code(), error.message(), span)
            .with_line(line)
            .with_column(column)
            .with_length(length)
            .with_snippet(snippet)
            .with_label(label_for(error));
        diag.kind = Some(error.kind());
        if let Some(help) = help_for(error) {
            diag = diag.with_help(help);
        }
        diag
    }

    /// Set the file path
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    /// Set the line number
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = column;
        self
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    /// Set the snippet (source line)
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    /// Set the label (caret description)
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Format as human-readable string
    pub fn to_human_string(&self) -> String {
        let mut output = String::new();

        // Header: error[EG0200]: undefined variable: x
        output.push_str(&format!(
            "{}[{}]: {}\n",
            self.level, self.code, self.message
        ));

        // Location: --> program.egg:1:4
        output.push_str(&format!(
            "  --> {}:{}:{}\n",
            self.file, self.line, self.column
        ));

        if !self.snippet.is_empty() {
            output.push_str("   |\n");
            output.push_str(&format!("{:>2} | {}\n", self.line, self.snippet));

            if self.length > 0 {
                let padding = " ".repeat(self.column.saturating_sub(1));
                let carets = "^".repeat(self.length);
                output.push_str(&format!("   | {}{}", padding, carets));

                if !self.label.is_empty() {
                    output.push_str(&format!(" {}", self.label));
                }
                output.push('\n');
            }
        }

        if let Some(help) = &self.help {
            output.push_str(&format!("   = help: {}\n", help));
        }

        output
    }

    /// Format as JSON string
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Format as compact JSON string
    pub fn to_json_compact(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}: {}", self.line, self.column, self.level, self.message)
    }
}

fn label_for(error: &Error) -> &'static str {
    match error.kind() {
        ErrorKind::SyntaxError => "syntax error here",
        ErrorKind::ReferenceError => "not defined in any enclosing scope",
        ErrorKind::TypeError => "type error here",
        ErrorKind::RecursionLimit => "call nested too deeply",
        ErrorKind::IoError => "output failed here",
    }
}

fn help_for(error: &Error) -> Option<String> {
    match error {
        Error::Reference { name, .. } => Some(format!(
            "bind `{}` with define({}, <value>) before using it",
            name, name
        )),
        Error::Syntax { code, .. } if *code == error_codes::EXPECTED_SEPARATOR => {
            Some("separate call arguments with ',' and close the call with ')'".to_string())
        }
        Error::Syntax { code, .. } if *code == error_codes::NESTING_TOO_DEEP => {
            Some("split the expression into smaller functions bound with define".to_string())
        }
        Error::RecursionLimit { .. } => {
            Some("raise the limit with --max-depth or EGG_MAX_CALL_DEPTH".to_string())
        }
        _ => None,
    }
}

/// Error code registry
///
/// - EG01xx: syntax errors (scanner, call syntax, special-form shape)
/// - EG02xx: reference errors
/// - EG03xx: type errors
/// - EG04xx: implementation limits
/// - EG05xx: I/O errors
/// - EG9xxx: generic
pub mod error_codes {
    pub const UNEXPECTED_SYNTAX: &str = "EG0100";
    pub const EXPECTED_SEPARATOR: &str = "EG0101";
    pub const TRAILING_INPUT: &str = "EG0102";
    pub const BAD_SPECIAL_FORM: &str = "EG0103";
    pub const NESTING_TOO_DEEP: &str = "EG0104";

    pub const UNDEFINED_VARIABLE: &str = "EG0200";

    pub const NOT_CALLABLE: &str = "EG0300";
    pub const ARITY_MISMATCH: &str = "EG0301";
    pub const OPERAND_TYPE: &str = "EG0302";

    pub const RECURSION_LIMIT: &str = "EG0400";

    pub const OUTPUT_FAILED: &str = "EG0500";

    pub const GENERIC_ERROR: &str = "EG9999";
}
