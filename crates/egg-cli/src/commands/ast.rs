//! AST dump command - output AST as JSON

use anyhow::{Context, Result};
use egg_runtime::{Egg, VersionedProgram};
use std::fs;

/// Dump AST to JSON
///
/// Parses the source file and outputs the syntax tree as JSON to stdout.
/// Parse errors are written to stderr as JSON diagnostics.
pub fn run(file_path: &str) -> Result<()> {
    // Read source file
    let source = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read source file: {}", file_path))?;

    let root = match Egg::new().parse(&source) {
        Ok(root) => root,
        Err(diag) => {
            super::report_diagnostic(&diag.with_file(file_path), true);
            return Err(anyhow::anyhow!("Parse errors"));
        }
    };

    let json = VersionedProgram::new(root).to_json()?;
    println!("{}", json);

    Ok(())
}
