//! The evaluator's error type: same shape as the lexer's and parser's, so
//! the driver can render all three through one `Diagnostic` path.

pub type RuntimeError = lox_util::SourceError;
