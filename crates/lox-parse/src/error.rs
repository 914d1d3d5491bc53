//! The parser's error type: same shape as every other phase's error, kept
//! under its own name so call sites read as `ParseError` rather than the
//! lexer's `LexError`.

pub type ParseError = lox_util::SourceError;
