//! REPL command implementation

use anyhow::Result;
use egg_runtime::{Diagnostic, ReplBinding, ReplCore, VersionedProgram};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Options for `egg repl`
#[derive(Debug, Clone)]
pub struct ReplOptions {
    /// Where to load and save history; `None` disables persistence
    pub history_path: Option<PathBuf>,
    pub max_call_depth: usize,
    pub show_types: bool,
    pub no_color: bool,
}

/// A `:`-prefixed REPL command
#[derive(Debug, PartialEq)]
enum ReplCommand<'a> {
    Quit,
    Reset,
    Help,
    Vars,
    Ast(&'a str),
    Unknown(&'a str),
}

/// Recognize a REPL command; `None` means the line is Egg source
fn parse_command(line: &str) -> Option<ReplCommand<'_>> {
    let command = line.trim().strip_prefix(':')?;
    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };
    Some(match name {
        "quit" | "q" => ReplCommand::Quit,
        "reset" => ReplCommand::Reset,
        "help" | "h" => ReplCommand::Help,
        "vars" | "v" => ReplCommand::Vars,
        "ast" => ReplCommand::Ast(rest),
        _ => ReplCommand::Unknown(name),
    })
}

/// Run the interactive REPL
pub fn run(options: &ReplOptions) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut repl = ReplCore::with_max_call_depth(options.max_call_depth);

    // Load history from file (ignore errors if it doesn't exist yet)
    if let Some(path) = &options.history_path {
        let _ = rl.load_history(path);
    }

    // Display welcome message
    println!("Egg v{} REPL", egg_runtime::VERSION);
    println!("Type an expression to evaluate it, or :quit to exit");
    println!("Commands: :quit (or :q), :reset, :help, :vars, :ast <expr>");
    println!();

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                if let Some(command) = parse_command(&line) {
                    match command {
                        ReplCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ReplCommand::Reset => {
                            repl.reset();
                            println!("REPL state reset");
                        }
                        ReplCommand::Help => print_help(),
                        ReplCommand::Vars => print_vars(&repl.variables(), options),
                        ReplCommand::Ast("") => println!("Usage: :ast <expression>"),
                        ReplCommand::Ast(expr) => match repl.parse_line(expr) {
                            Ok(node) => match VersionedProgram::new(node).to_json() {
                                Ok(json) => println!("{}", json),
                                Err(err) => eprintln!("Error: {}", err),
                            },
                            Err(diag) => println!("{}", format_diagnostic(&diag)),
                        },
                        ReplCommand::Unknown(name) => {
                            println!("Unknown command ':{}'. Type :help for a list.", name)
                        }
                    }
                    continue;
                }

                // `print` writes straight to stdout while the line runs
                let result = repl.eval_line(&line);

                for diag in &result.diagnostics {
                    println!("{}", format_diagnostic(diag));
                }

                if let Some(value) = result.value {
                    if options.show_types {
                        println!("{} : {}", value, format_type(value.type_name(), options.no_color));
                    } else {
                        println!("{}", value);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                println!("^C");
                println!("Use :quit or :q to exit");
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                println!("^D");
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    // Save history to file
    if let Some(path) = &options.history_path {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(err) = rl.save_history(path) {
            tracing::debug!(path = %path.display(), error = %err, "could not save history");
        }
    }

    Ok(())
}

/// Print help information
fn print_help() {
    println!("Egg REPL Commands:");
    println!("  :quit, :q         Exit the REPL");
    println!("  :reset            Clear all definitions");
    println!("  :help, :h         Show this help message");
    println!("  :vars, :v         List defined variables with types and values");
    println!("  :ast <expr>       Show the syntax tree of an expression as JSON");
    println!();
    println!("Definitions persist between lines. Examples:");
    println!("  >> define(square, fun(n, *(n, n)))");
    println!("  >> square(12)");
    println!("  >> if(>(square(3), 5), \"big\", \"small\")");
}

/// Format a diagnostic for display: the message with a caret under the offending text
fn format_diagnostic(diag: &Diagnostic) -> String {
    let mut text = format!("{}[{}]: {}", diag.level, diag.code, diag.message);
    if !diag.snippet.is_empty() && diag.length > 0 {
        text.push_str(&format!(
            "\n   {}\n   {}{}",
            diag.snippet,
            " ".repeat(diag.column.saturating_sub(1)),
            "^".repeat(diag.length)
        ));
    }
    if let Some(help) = &diag.help {
        text.push_str(&format!("\n   = help: {}", help));
    }
    text
}

fn format_type(type_name: &str, no_color: bool) -> String {
    if no_color {
        type_name.to_string()
    } else {
        format!("\x1b[36m{}\x1b[0m", type_name)
    }
}

fn print_vars(bindings: &[ReplBinding], options: &ReplOptions) {
    if bindings.is_empty() {
        println!("No variables defined.");
        return;
    }

    println!("{:<16} {:<10} {}", "name", "type", "value");
    println!("{}", "-".repeat(44));
    for binding in bindings {
        println!(
            "{:<16} {:<10} {}",
            binding.name,
            format_type(binding.type_name, options.no_color),
            binding.value
        );
    }
}
