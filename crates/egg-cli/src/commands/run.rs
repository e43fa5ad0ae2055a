//! Run command - execute Egg source files

use super::report_diagnostic;
use anyhow::{Context, Result};
use egg_runtime::{Egg, Output, RuntimeOptions};
use std::fs;

/// Options for `egg run`
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Emit diagnostics as JSON
    pub json: bool,
    /// Print the program text before running it
    pub echo: bool,
    pub max_call_depth: usize,
}

/// Run an Egg source file
///
/// Evaluates the program and prints its value to stdout. `print` output appears as it happens.
pub fn run(file_path: &str, options: &RunOptions) -> Result<()> {
    // Read source file
    let source = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read source file: {}", file_path))?;

    if options.echo {
        println!("{}", source.trim_end());
    }

    tracing::debug!(file = file_path, max_call_depth = options.max_call_depth, "running file");

    let runtime = Egg::with_options(RuntimeOptions {
        max_call_depth: options.max_call_depth,
        output: Output::Stdout,
    });
    match runtime.eval(&source) {
        Ok(value) => {
            println!("{}", value);
            Ok(())
        }
        Err(diag) => {
            report_diagnostic(&diag.with_file(file_path), options.json);
            Err(anyhow::anyhow!("Failed to execute program"))
        }
    }
}
