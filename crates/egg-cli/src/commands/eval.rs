//! Eval command - evaluate program text given on the command line

use super::report_diagnostic;
use anyhow::Result;
use egg_runtime::{Egg, Output, RuntimeOptions};

/// Evaluate `lines` joined with newlines and print the resulting value
pub fn run(lines: &[String], json: bool, max_call_depth: usize) -> Result<()> {
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();

    let runtime = Egg::with_options(RuntimeOptions {
        max_call_depth,
        output: Output::Stdout,
    });
    match runtime.run_lines(&lines) {
        Ok(value) => {
            println!("{}", value);
            Ok(())
        }
        Err(diag) => {
            report_diagnostic(&diag.with_file("<eval>"), json);
            Err(anyhow::anyhow!("Failed to evaluate program"))
        }
    }
}
