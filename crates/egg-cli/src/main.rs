use anyhow::Result;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;

mod commands;
mod config;

/// Egg language interpreter.
///
/// Egg is a tiny expression language: every program is a single expression built from
/// literals, words and applications such as `do(define(x, 10), print(x))`.
///
/// EXAMPLES:
///     egg run main.egg                     Run a program
///     egg eval 'print(+(1, 2))'            Evaluate a one-liner
///     egg ast main.egg                     Dump the syntax tree as JSON
///     egg repl                             Start interactive REPL
///
/// ENVIRONMENT VARIABLES:
///     EGG_DIAGNOSTICS     Set to 'json' for JSON diagnostics by default
///     EGG_MAX_CALL_DEPTH  Maximum nesting of function calls
///     EGG_NO_HISTORY      Set to '1' to disable REPL history
///     EGG_HISTORY_FILE    REPL history location
///     NO_COLOR            Set to disable colored output
///     RUST_LOG            Log filter (e.g. egg_runtime=debug)
#[derive(Parser)]
#[command(name = "egg")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log output on stderr (-v debug, -vv trace)
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an Egg source file
    ///
    /// Evaluates the program in the file and prints its value. Output from
    /// `print` appears as the program runs.
    ///
    /// EXAMPLES:
    ///     egg run main.egg                 Run a program
    ///     egg run main.egg --echo          Show the program before its output
    ///     egg run main.egg --json          Output diagnostics as JSON
    ///     egg run deep.egg --max-depth 4096
    #[command(visible_alias = "r")]
    Run {
        /// Path to the Egg source file
        file: String,
        /// Output diagnostics in JSON format
        #[arg(long)]
        json: bool,
        /// Print the program text before running it
        #[arg(long)]
        echo: bool,
        /// Maximum nesting of function calls (1 to 10000)
        #[arg(long, value_name = "N", value_parser = parse_max_depth)]
        max_depth: Option<usize>,
    },

    /// Evaluate program text given on the command line
    ///
    /// Multiple arguments are joined with newlines into one program.
    ///
    /// EXAMPLES:
    ///     egg eval '+(1, 2)'
    ///     egg eval 'do(define(x, 4),' '   *(x, x))'
    #[command(visible_alias = "e")]
    Eval {
        /// Program lines
        #[arg(required = true)]
        lines: Vec<String>,
        /// Output diagnostics in JSON format
        #[arg(long)]
        json: bool,
        /// Maximum nesting of function calls (1 to 10000)
        #[arg(long, value_name = "N", value_parser = parse_max_depth)]
        max_depth: Option<usize>,
    },

    /// Dump AST to JSON
    ///
    /// Parses the source file and outputs the syntax tree in JSON format
    /// for tooling or debugging purposes. The program is not evaluated.
    ///
    /// EXAMPLES:
    ///     egg ast main.egg                 Print AST
    ///     egg ast main.egg > ast.json      Save to file
    Ast {
        /// Path to the Egg source file
        file: String,
    },

    /// Start an interactive REPL
    ///
    /// Opens an interactive Read-Eval-Print Loop. Definitions persist
    /// between lines.
    ///
    /// REPL COMMANDS:
    ///     :help, :h      Show help
    ///     :quit, :q      Exit REPL
    ///     :reset         Clear all definitions
    ///     :vars          List defined variables
    ///     :ast <expr>    Show the syntax tree of an expression
    ///
    /// EXAMPLES:
    ///     egg repl                         Start REPL
    ///     egg repl --no-history            Disable history persistence
    Repl {
        /// Disable history persistence (for privacy)
        #[arg(long)]
        no_history: bool,
    },

    /// Generate shell completions
    ///
    /// Outputs shell completion scripts for bash, zsh, fish, or powershell.
    ///
    /// EXAMPLES:
    ///     egg completions bash > ~/.bash_completions/egg.bash
    ///     egg completions zsh > ~/.zfunc/_egg
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Accept a call depth the evaluator can reach without exhausting memory
fn parse_max_depth(value: &str) -> Result<usize, String> {
    let depth: usize = value
        .parse()
        .map_err(|_| format!("`{}` is not a positive integer", value))?;
    if (1..=egg_runtime::MAX_CALL_DEPTH_LIMIT).contains(&depth) {
        Ok(depth)
    } else {
        Err(format!(
            "must be between 1 and {}",
            egg_runtime::MAX_CALL_DEPTH_LIMIT
        ))
    }
}

/// Send log events to stderr so program output on stdout stays clean
///
/// `-v` flags take precedence over `RUST_LOG`; without either only warnings are shown.
fn init_tracing(verbosity: u8) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("egg=debug,egg_runtime=debug"),
        _ => EnvFilter::new("egg=trace,egg_runtime=trace"),
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_writer(io::stderr),
        )
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Only evaluating commands read ~/.egg/config.toml
    match cli.command {
        Commands::Run {
            file,
            json,
            echo,
            max_depth,
        } => {
            let cli_config = config::Config::load()?;
            // Command-line flags override configuration
            let options = commands::run::RunOptions {
                json: json || cli_config.default_json,
                echo: echo || cli_config.settings.echo_program,
                max_call_depth: cli_config.max_call_depth(max_depth),
            };
            commands::run::run(&file, &options)?;
        }
        Commands::Eval {
            lines,
            json,
            max_depth,
        } => {
            let cli_config = config::Config::load()?;
            let use_json = json || cli_config.default_json;
            commands::eval::run(&lines, use_json, cli_config.max_call_depth(max_depth))?;
        }
        Commands::Ast { file } => {
            commands::ast::run(&file)?;
        }
        Commands::Repl { no_history } => {
            let cli_config = config::Config::load()?;
            let options = commands::repl::ReplOptions {
                history_path: cli_config.history_path(no_history),
                max_call_depth: cli_config.max_call_depth(None),
                show_types: cli_config.settings.show_types,
                no_color: cli_config.no_color,
            };
            commands::repl::run(&options)?;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
        }
    }

    Ok(())
}
