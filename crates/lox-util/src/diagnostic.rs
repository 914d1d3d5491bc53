//! Diagnostic reporting.
//!
//! Lex, parse, and runtime errors all render through the same narrow
//! surface: a single stable-format line written to the driver's chosen
//! stream. Keeping one [`Diagnostic`] shape for all three error kinds
//! (rather than one ad hoc error-printing path per phase) is what lets
//! `lox-drv` treat them uniformly at the single top-level boundary the
//! evaluator never reaches past (see the evaluator's `RuntimeError`
//! propagation in `lox-eval`).

use crate::span::Span;
use std::fmt;

/// Diagnostic severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "Erro"),
            Level::Warning => write!(f, "Aviso"),
        }
    }
}

/// A single reportable diagnostic.
///
/// `Display` renders the stable `[line N] Erro: message` prefix that
/// scenario tests key off of; extra notes print as indented follow-up
/// lines and never change that first line.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub span: Span,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn new(level: Level, message: impl Into<String>, span: Span) -> Self {
        Self { level, message: message.into(), span, notes: Vec::new() }
    }

    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Error, message, span)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[linha {}] {}: {}", self.span.line, self.level, self.message)?;
        for note in &self.notes {
            write!(f, "\n    note: {note}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_stable_prefix() {
        let diag = Diagnostic::error("Division by zero.", Span::new(3));
        assert_eq!(diag.to_string(), "[linha 3] Erro: Division by zero.");
    }

    #[test]
    fn notes_print_as_indented_follow_up_lines() {
        let mut diag = Diagnostic::error("Undefined variable 'x'.", Span::new(2));
        diag.notes.push("did you mean 'y'?".to_string());
        assert_eq!(diag.to_string(), "[linha 2] Erro: Undefined variable 'x'.\n    note: did you mean 'y'?");
    }

    #[test]
    fn warning_level_renders_as_aviso() {
        let diag = Diagnostic::new(Level::Warning, "unused variable", Span::DUMMY);
        assert!(diag.to_string().starts_with("[linha 0] Aviso:"));
    }
}
