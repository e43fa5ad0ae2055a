//! Egg Runtime - Core language implementation
//!
//! This library provides the complete Egg language runtime:
//! - Recursive-descent parsing into a three-node syntax tree
//! - Lexically scoped environments and closures
//! - Tree-walking evaluation with special forms
//! - The bootstrap global environment

/// Egg runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Public API modules
pub mod ast;
pub mod diagnostic;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod repl;
pub mod runtime;
pub mod span;
mod stack;
pub mod stdlib;
pub mod value;

// Re-export commonly used types
pub use ast::{Literal, Node, VersionedProgram, AST_VERSION};
pub use diagnostic::{error_codes, Diagnostic, DiagnosticLevel, DIAG_VERSION};
pub use environment::Environment;
pub use error::{EggResult, Error, ErrorKind};
pub use interpreter::{Interpreter, Output, DEFAULT_MAX_CALL_DEPTH, MAX_CALL_DEPTH_LIMIT};
pub use parser::{parse_program, Parser, MAX_NESTING_DEPTH};
pub use repl::{ReplBinding, ReplCore, ReplResult};
pub use runtime::{Egg, RuntimeOptions, RuntimeResult};
pub use span::Span;
pub use value::{Closure, Function, Value};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoke() {
        assert_eq!(VERSION, "0.1.0");
    }
}
