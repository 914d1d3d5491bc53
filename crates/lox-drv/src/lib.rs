//! The `loxi` command-line driver: argument parsing, file/REPL execution,
//! and diagnostic reporting, the single boundary where a lex, parse, or
//! runtime error finally gets printed and turned into a process exit code.
//!
//! Exit codes follow the reference implementation this interpreter is
//! modeled on: `0` on success, `64` on a usage error, `65` on an uncaught
//! lex/parse/resolve error, `74` when the input file cannot be read. A
//! runtime error aborts only the top-level statement that raised it; it is
//! reported on stderr the same way a lex/parse error is, but does not change
//! the process exit code, matching `run()`'s own catch-and-print in the
//! original driver.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use lox_eval::{resolve, Interpreter, RuntimeError};
use lox_parse::ast::Stmt;
use lox_util::{Diagnostic, Span};

const EXIT_OK: i32 = 0;
const EXIT_USAGE: i32 = 64;
const EXIT_DATA_ERROR: i32 = 65;
const EXIT_NO_INPUT: i32 = 74;

/// A tree-walking interpreter for Lox.
///
/// Run with no arguments to start a REPL, or pass a single script path to
/// execute it and exit.
#[derive(Parser, Debug)]
#[command(name = "loxi", author, version, about, long_about = None)]
pub struct Cli {
    /// Script to run. Omit to start an interactive REPL.
    #[arg(value_name = "SCRIPT")]
    args: Vec<PathBuf>,
}

/// Parses `argv`-derived [`Cli`] and runs it, returning the process exit code.
pub fn run(cli: Cli) -> i32 {
    match cli.args.as_slice() {
        [] => run_repl(),
        [script] => run_file(script),
        _ => {
            eprintln!("Usage: loxi [script]");
            EXIT_USAGE
        }
    }
}

fn run_file(path: &Path) -> i32 {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Could not read file '{}': {err}", path.display());
            return EXIT_NO_INPUT;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut interp = Interpreter::new(Default::default());

    match compile(&source) {
        Err(diagnostics) => {
            report(&diagnostics);
            EXIT_DATA_ERROR
        }
        Ok((stmts, locals)) => {
            interp.extend_locals(locals);
            let errors = interp.run(&stmts, &mut |line: &str| {
                let _ = writeln!(out, "{line}");
            });
            let _ = out.flush();
            if !errors.is_empty() {
                report(&errors.iter().map(runtime_diagnostic).collect::<Vec<_>>());
            }
            EXIT_OK
        }
    }
}

/// Runs a persistent REPL: one [`Interpreter`] reused across lines, so
/// `var`/`fun`/`class` declarations on one line stay visible to the next.
/// Each line is lexed, parsed, and resolved independently; see
/// [`Interpreter::extend_locals`] for why merging resolved `locals`
/// line-by-line is safe here.
fn run_repl() -> i32 {
    let mut interp = Interpreter::new(Default::default());
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    loop {
        let _ = write!(out, "> ");
        let _ = out.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF (Ctrl-D)
            Ok(_) => {}
            Err(_) => break,
        }

        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        if line == "exit" {
            break;
        }

        match compile(line) {
            Err(diagnostics) => report(&diagnostics),
            Ok((stmts, locals)) => {
                interp.extend_locals(locals);
                let errors = interp.run(&stmts, &mut |text: &str| {
                    let _ = writeln!(out, "{text}");
                });
                let _ = out.flush();
                if !errors.is_empty() {
                    report(&errors.iter().map(runtime_diagnostic).collect::<Vec<_>>());
                }
            }
        }
    }
    EXIT_OK
}

/// Lexes, parses, and resolves `source`, collecting every diagnostic from
/// whichever phase fails rather than stopping at the first: lexing fails
/// fast with at most one error, but the parser and resolver both keep
/// going and may each report several.
fn compile(source: &str) -> Result<(Vec<Stmt>, lox_util::FxHashMap<lox_parse::ast::NodeId, u32>), Vec<Diagnostic>> {
    let tokens = lox_lex::tokenize(source).map_err(|err| vec![source_diagnostic(&err)])?;

    let (stmts, parse_errors) = lox_parse::parse(tokens);
    if !parse_errors.is_empty() {
        return Err(parse_errors.iter().map(source_diagnostic).collect());
    }

    let (locals, resolve_errors) = resolve(&stmts);
    if !resolve_errors.is_empty() {
        return Err(resolve_errors.iter().map(source_diagnostic).collect());
    }

    Ok((stmts, locals))
}

fn source_diagnostic(err: &lox_util::SourceError) -> Diagnostic {
    Diagnostic::error(err.message.clone(), err.span)
}

fn runtime_diagnostic(err: &RuntimeError) -> Diagnostic {
    Diagnostic::error(err.message.clone(), Span::new(err.line()))
}

fn report(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{diagnostic}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_reports_every_parse_error_not_just_the_first() {
        let err = compile("1 + ; 2 + ;").unwrap_err();
        assert_eq!(err.len(), 2);
    }

    #[test]
    fn compile_succeeds_on_well_formed_source() {
        assert!(compile("print 1 + 2;").is_ok());
    }

    #[test]
    fn compile_reports_resolver_errors() {
        let err = compile("return 1;").unwrap_err();
        assert_eq!(err.len(), 1);
    }

    #[test]
    fn no_args_means_repl() {
        let cli = Cli::try_parse_from(["loxi"]).unwrap();
        assert!(cli.args.is_empty());
    }

    #[test]
    fn one_arg_is_a_script_path() {
        let cli = Cli::try_parse_from(["loxi", "main.lox"]).unwrap();
        assert_eq!(cli.args, vec![PathBuf::from("main.lox")]);
    }

    #[test]
    fn two_args_parse_fine_but_run_rejects_them_as_a_usage_error() {
        let cli = Cli::try_parse_from(["loxi", "a.lox", "b.lox"]).unwrap();
        assert_eq!(run(cli), EXIT_USAGE);
    }
}
