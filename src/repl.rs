// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Interactive REPL (Read-Eval-Print Loop) for Quill.

use crate::{format_ast, format_tokens, print_error, read_source};
use owo_colors::OwoColorize;
use quill_engine::{Context, Value};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Config, Editor, Helper};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// REPL configuration constants
const HISTORY_FILE: &str = ".quill_history";
const MAX_HISTORY_SIZE: usize = 1000;

/// Words the language reserves.
const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "export",
    "extends",
    "finally",
    "for",
    "function",
    "if",
    "import",
    "in",
    "instanceof",
    "new",
    "return",
    "super",
    "switch",
    "this",
    "throw",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
];

const LITERALS: &[&str] = &["true", "false", "null"];

/// REPL commands that can be executed with a dot prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Exit,
    Clear,
    Version,
    Load,
    Ast,
    Tokens,
}

impl ReplCommand {
    /// Parse a REPL command from input string
    pub fn parse(input: &str) -> Option<(Self, Option<&str>)> {
        let input = input.trim();
        let rest = input.strip_prefix('.')?;

        let mut parts = rest.splitn(2, char::is_whitespace);
        let cmd = parts.next()?.to_lowercase();
        let arg = parts.next().map(str::trim).filter(|arg| !arg.is_empty());

        let command = match cmd.as_str() {
            "help" | "h" | "?" => ReplCommand::Help,
            "exit" | "quit" | "q" => ReplCommand::Exit,
            "clear" | "cls" => ReplCommand::Clear,
            "version" | "v" => ReplCommand::Version,
            "load" | "l" => ReplCommand::Load,
            "ast" => ReplCommand::Ast,
            "tokens" => ReplCommand::Tokens,
            _ => return None,
        };
        Some((command, arg))
    }

    /// Get all available commands for help/completion
    pub fn all_commands() -> &'static [(&'static str, &'static str)] {
        &[
            (".help", "Show this help message"),
            (".exit", "Exit the REPL"),
            (".clear", "Clear the screen"),
            (".version", "Show version information"),
            (".load <file>", "Load and execute a source file"),
            (".ast <code>", "Print the syntax tree of a program"),
            (".tokens <code>", "Print the token stream of some code"),
        ]
    }
}

/// Helper struct for rustyline that provides completion, hints, and validation
struct QuillHelper {
    /// Keywords and REPL commands for completion
    words: Vec<&'static str>,
}

impl QuillHelper {
    fn new() -> Self {
        let commands = [
            ".help", ".exit", ".clear", ".version", ".load", ".ast", ".tokens",
        ];
        let words = KEYWORDS
            .iter()
            .chain(LITERALS)
            .chain(&["undefined"])
            .chain(&commands)
            .copied()
            .collect();

        Self { words }
    }

    fn matches<'w>(&'w self, word: &'w str) -> impl Iterator<Item = &'static str> + 'w {
        self.words
            .iter()
            .copied()
            .filter(move |candidate| candidate.starts_with(word) && candidate.len() > word.len())
    }

    /// The untyped remainder of the first word that completes `word`.
    fn completion_suffix(&self, word: &str) -> Option<&'static str> {
        self.matches(word).next().map(|candidate| &candidate[word.len()..])
    }
}

/// Start of the word that ends at `pos`.
fn word_start(line: &str, pos: usize) -> usize {
    line[..pos]
        .rfind(|c: char| !c.is_alphanumeric() && c != '_' && c != '$' && c != '.')
        .map(|i| i + 1)
        .unwrap_or(0)
}

impl Completer for QuillHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let word = &line[word_start(line, pos)..pos];
        if word.is_empty() {
            return Ok((pos, vec![]));
        }

        let candidates = self
            .matches(word)
            .map(|candidate| Pair {
                display: candidate.to_string(),
                replacement: candidate[word.len()..].to_string(),
            })
            .collect();

        Ok((pos, candidates))
    }
}

impl Hinter for QuillHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<Self::Hint> {
        if pos < line.len() {
            return None;
        }

        let word = &line[word_start(line, pos)..];
        if word.len() < 2 {
            return None;
        }

        self.completion_suffix(word)
            .map(|rest| rest.dimmed().to_string())
    }
}

impl Highlighter for QuillHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('.') {
            return Cow::Owned(line.magenta().to_string());
        }

        let mut result = String::with_capacity(line.len() * 2);
        let mut current_word = String::new();
        let mut in_string = None;

        for c in line.chars() {
            if let Some(quote) = in_string {
                result.push_str(&c.green().to_string());
                if c == quote {
                    in_string = None;
                }
                continue;
            }

            if c.is_alphanumeric() || c == '_' || c == '$' {
                current_word.push(c);
                continue;
            }

            if !current_word.is_empty() {
                result.push_str(&highlight_word(&current_word));
                current_word.clear();
            }

            let colored = match c {
                '\'' | '"' => {
                    in_string = Some(c);
                    c.green().to_string()
                }
                '(' | ')' | '[' | ']' | '{' | '}' => c.yellow().to_string(),
                '+' | '-' | '*' | '/' | '%' | '=' | '<' | '>' | '!' | '&' | '|' | '^' | '~'
                | '?' | ':' => c.cyan().to_string(),
                _ => c.to_string(),
            };
            result.push_str(&colored);
        }

        if !current_word.is_empty() {
            result.push_str(&highlight_word(&current_word));
        }

        Cow::Owned(result)
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

fn highlight_word(word: &str) -> String {
    if KEYWORDS.contains(&word) {
        word.magenta().bold().to_string()
    } else if LITERALS.contains(&word) || word == "undefined" {
        word.blue().to_string()
    } else if word.starts_with(|c: char| c.is_ascii_digit()) {
        word.yellow().to_string()
    } else {
        word.to_string()
    }
}

impl Validator for QuillHelper {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> rustyline::Result<ValidationResult> {
        let input = ctx.input();

        if !is_balanced(input) {
            return Ok(ValidationResult::Incomplete);
        }

        // A trailing binary operator means the expression continues
        let trimmed = input.trim_end();
        if !trimmed.starts_with('.')
            && trimmed.ends_with(['\\', '+', '-', '*', '/', '=', ',', '&', '|', '?', ':'])
        {
            return Ok(ValidationResult::Incomplete);
        }

        Ok(ValidationResult::Valid(None))
    }
}

/// Check if brackets, braces, and parentheses are balanced
///
/// String literals have no escapes, so a quote always closes the string it
/// opened.
fn is_balanced(input: &str) -> bool {
    let mut stack = Vec::new();
    let mut in_string = None;

    for c in input.chars() {
        match in_string {
            Some(quote) if c == quote => in_string = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => in_string = Some(c),
                '(' => stack.push(')'),
                '[' => stack.push(']'),
                '{' => stack.push('}'),
                ')' | ']' | '}' => {
                    if stack.pop() != Some(c) {
                        // Let the parser report the mismatch
                        return true;
                    }
                }
                _ => {}
            },
        }
    }

    stack.is_empty() && in_string.is_none()
}

impl Helper for QuillHelper {}

/// The interactive REPL
pub struct Repl {
    context: Context,
    editor: Editor<QuillHelper, DefaultHistory>,
    history_path: PathBuf,
}

impl Repl {
    /// Create a new REPL instance
    pub fn new() -> rustyline::Result<Self> {
        let config = Config::builder()
            .history_ignore_dups(true)?
            .history_ignore_space(true)
            .max_history_size(MAX_HISTORY_SIZE)?
            .auto_add_history(true)
            .build();

        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(QuillHelper::new()));

        let history_path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quill")
            .join(HISTORY_FILE);

        if let Some(parent) = history_path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(path = %parent.display(), error = %e, "cannot create history directory");
            }
        }

        if let Err(e) = editor.load_history(&history_path) {
            tracing::debug!(error = %e, "no history loaded");
        }

        Ok(Self {
            context: Context::new(),
            editor,
            history_path,
        })
    }

    /// Run the REPL main loop
    pub fn run(&mut self) -> rustyline::Result<()> {
        self.print_banner();

        loop {
            let prompt = format!("{} ", "quill>".bright_green().bold());

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();

                    if trimmed.is_empty() {
                        continue;
                    }

                    if let Some((cmd, arg)) = ReplCommand::parse(trimmed) {
                        match self.execute_command(cmd, arg) {
                            CommandResult::Continue => continue,
                            CommandResult::Exit => break,
                        }
                    }

                    self.eval_and_print(&line);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "^C".dimmed());
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", "^D".dimmed());
                    break;
                }
                Err(err) => {
                    eprintln!("{}: {:?}", "Error".red().bold(), err);
                    break;
                }
            }
        }

        if let Err(e) = self.editor.save_history(&self.history_path) {
            tracing::warn!(error = %e, "failed to save history");
        }

        println!();
        Ok(())
    }

    fn print_banner(&self) {
        let version = env!("CARGO_PKG_VERSION");
        println!();
        println!(
            "  {} {} {}",
            "Quill".white().bold(),
            "v".dimmed(),
            version.bright_yellow()
        );
        println!(
            "  {} {} {}",
            "Type".dimmed(),
            ".help".cyan(),
            "for available commands".dimmed()
        );
        println!();
    }

    fn execute_command(&mut self, cmd: ReplCommand, arg: Option<&str>) -> CommandResult {
        match cmd {
            ReplCommand::Help => self.print_help(),
            ReplCommand::Exit => return CommandResult::Exit,
            ReplCommand::Clear => print!("\x1B[2J\x1B[H"),
            ReplCommand::Version => {
                println!(
                    "{}: {}",
                    "Quill".bright_cyan().bold(),
                    env!("CARGO_PKG_VERSION").yellow()
                );
            }
            ReplCommand::Load => match arg {
                Some(path) => self.load_file(Path::new(path)),
                None => missing_argument(".load", "a file path"),
            },
            ReplCommand::Ast => match arg {
                Some(code) => match format_ast(code, false) {
                    Ok(ast) => println!("{}", ast),
                    Err(e) => print_error(&e),
                },
                None => missing_argument(".ast", "some code"),
            },
            ReplCommand::Tokens => match arg {
                Some(code) => match format_tokens(code) {
                    Ok(tokens) => {
                        for line in tokens {
                            println!("{}", line.dimmed());
                        }
                    }
                    Err(e) => print_error(&e),
                },
                None => missing_argument(".tokens", "some code"),
            },
        }
        CommandResult::Continue
    }

    fn print_help(&self) {
        println!();
        println!("{}", "REPL Commands:".white().bold());
        println!();

        for (cmd, desc) in ReplCommand::all_commands() {
            println!("  {:16} {}", cmd.cyan(), desc.dimmed());
        }

        println!();
        println!("{}", "Keyboard Shortcuts:".white().bold());
        println!();
        println!("  {:16} {}", "Ctrl+C".yellow(), "Cancel current input".dimmed());
        println!("  {:16} {}", "Ctrl+D".yellow(), "Exit REPL".dimmed());
        println!("  {:16} {}", "Tab".yellow(), "Autocomplete".dimmed());
        println!("  {:16} {}", "↑/↓".yellow(), "Navigate history".dimmed());
        println!();
    }

    fn load_file(&mut self, path: &Path) {
        match read_source(path) {
            Ok(source) => self.eval_and_print(&source),
            Err(e) => eprintln!("{}: {:#}", "Error".red().bold(), e),
        }
    }

    fn eval_and_print(&mut self, input: &str) {
        match self.context.eval(input) {
            Ok(value) => println!("{}", format_value(&value)),
            Err(e) => print_error(&e),
        }
    }
}

/// Result of executing a REPL command
enum CommandResult {
    Continue,
    Exit,
}

fn missing_argument(command: &str, what: &str) {
    eprintln!(
        "{}: {} {}",
        "Error".red().bold(),
        command.cyan(),
        format!("requires {}", what).dimmed()
    );
}

/// Format a value for display with syntax coloring
fn format_value(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".blue().dimmed().to_string(),
        Value::Null => "null".blue().to_string(),
        Value::Boolean(_) | Value::Number(_) => value.to_string().yellow().to_string(),
        Value::String(s) => format!("'{}'", s).green().to_string(),
        Value::Function(_) => value.to_string().magenta().to_string(),
    }
}
