pub mod ast;
pub mod eval;
pub mod repl;
pub mod run;

use egg_runtime::Diagnostic;

/// Write a diagnostic to stderr, as pretty JSON or in human-readable form
pub fn report_diagnostic(diag: &Diagnostic, json: bool) {
    if json {
        match diag.to_json_string() {
            Ok(text) => eprintln!("{}", text),
            Err(_) => eprint!("{}", diag.to_human_string()),
        }
    } else {
        eprint!("{}", diag.to_human_string());
    }
}
