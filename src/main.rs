// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Quill - a small tree-walking interpreter for a JavaScript-like language
//!
//! This is the main entry point for the quill CLI/REPL.
//!
//! ## Features
//!
//! - Interactive REPL with syntax highlighting and history
//! - File and inline evaluation
//! - AST and token dumps for debugging the front end

mod repl;

use anyhow::Context as _;
use clap::Parser;
use owo_colors::OwoColorize;
use quill_engine::lexer::Scanner;
use quill_engine::{Context, Error, Value, parse, parse_expression};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "quill",
    about = "Tree-walking interpreter for a small JavaScript-like language",
    version,
    author = "Pegasus Heavy Industries"
)]
struct Cli {
    /// Source file to execute
    file: Option<PathBuf>,

    /// Evaluate code from the command line
    #[arg(short = 'e', long = "eval", value_name = "CODE")]
    eval: Option<String>,

    /// Treat the code as a single expression
    #[arg(short = 'x', long = "expression", requires = "eval")]
    expression: bool,

    /// Print the syntax tree instead of evaluating
    #[arg(long, conflicts_with = "tokens")]
    ast: bool,

    /// Print the token stream instead of evaluating
    #[arg(long)]
    tokens: bool,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

/// What to do with a piece of source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Evaluate,
    PrintAst,
    PrintTokens,
}

impl Cli {
    fn action(&self) -> Action {
        if self.ast {
            Action::PrintAst
        } else if self.tokens {
            Action::PrintTokens
        } else {
            Action::Evaluate
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let action = cli.action();
    if let Some(code) = &cli.eval {
        return run_source(code, action, cli.expression);
    }
    match &cli.file {
        Some(path) => run_file(path, action),
        None => run_repl(),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("quill=debug,quill_engine=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("quill=warn,quill_engine=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Start the interactive REPL
fn run_repl() -> ExitCode {
    match repl::Repl::new() {
        Ok(mut repl) => {
            if let Err(e) = repl.run() {
                eprintln!("{}: {:?}", "REPL Error".red().bold(), e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!(
                "{}: Failed to initialize REPL: {:?}",
                "Error".red().bold(),
                e
            );
            ExitCode::FAILURE
        }
    }
}

/// Execute a source file.
fn run_file(path: &Path, action: Action) -> ExitCode {
    match read_source(path) {
        Ok(source) => run_source(&source, action, false),
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
}

/// Evaluate or dump code from the command line or a file.
fn run_source(source: &str, action: Action, expression: bool) -> ExitCode {
    let result = match action {
        Action::Evaluate => evaluate(source, expression).map(|value| {
            if !value.is_undefined() {
                println!("{}", value);
            }
        }),
        Action::PrintAst => format_ast(source, expression).map(|ast| println!("{}", ast)),
        Action::PrintTokens => format_tokens(source).map(|tokens| {
            for line in tokens {
                println!("{}", line);
            }
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn evaluate(source: &str, expression: bool) -> Result<Value, Error> {
    let ctx = Context::new();
    if expression {
        ctx.eval_expression(source)
    } else {
        ctx.eval(source)
    }
}

/// Pretty-printed syntax tree of `source`.
pub(crate) fn format_ast(source: &str, expression: bool) -> Result<String, Error> {
    if expression {
        Ok(format!("{:#?}", parse_expression(source)?))
    } else {
        Ok(format!("{:#?}", parse(source)?))
    }
}

/// One line per token: `start..end kind`.
pub(crate) fn format_tokens(source: &str) -> Result<Vec<String>, Error> {
    Scanner::new(source)
        .map(|token| {
            token.map(|token| format!("{:>4}..{:<4} {}", token.span.start, token.span.end, token.kind))
        })
        .collect()
}

/// Print an engine error, colouring its `Kind:` prefix.
pub(crate) fn print_error(error: &Error) {
    let error_str = error.to_string();

    if let Some(colon_pos) = error_str.find(':') {
        let (error_type, message) = error_str.split_at(colon_pos);
        eprintln!("{}{}", error_type.red().bold(), message);
    } else {
        eprintln!("{}", error_str.red());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_eval_flags() {
        let cli = Cli::parse_from(["quill", "-e", "1 + 2", "-x"]);
        assert_eq!(cli.eval.as_deref(), Some("1 + 2"));
        assert!(cli.expression);
        assert_eq!(cli.action(), Action::Evaluate);
    }

    #[test]
    fn test_cli_dump_actions() {
        assert_eq!(Cli::parse_from(["quill", "--ast", "a.js"]).action(), Action::PrintAst);
        assert_eq!(Cli::parse_from(["quill", "--tokens", "a.js"]).action(), Action::PrintTokens);
        assert!(Cli::try_parse_from(["quill", "--ast", "--tokens"]).is_err());
    }

    #[test]
    fn test_expression_requires_eval() {
        assert!(Cli::try_parse_from(["quill", "-x"]).is_err());
    }

    #[test]
    fn test_evaluate_program_and_expression() {
        assert_eq!(evaluate("var a = 4; a * a", false).unwrap(), Value::Number(16.0));
        assert_eq!(evaluate("'foo' + 1", true).unwrap(), Value::from("foo1"));
        assert!(evaluate("var a = 4", true).is_err());
    }

    #[test]
    fn test_format_tokens() {
        let lines = format_tokens("a = 1").unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("identifier `a`"));
        assert!(format_tokens("'open").is_err());
    }

    #[test]
    fn test_format_ast() {
        let ast = format_ast("1 + 2", true).unwrap();
        assert!(ast.contains("Binary"));
        assert!(ast.contains("Add"));
    }
}
