//! Shared error kinds used across the lex/parse/eval boundary.
//!
//! Each phase defines its own richer error enum (`LexError`, `ParseError`,
//! `RuntimeError`) downstream; this module only holds the pieces common to
//! all of them so that one doesn't have to reimplement `Display`/`Error`
//! boilerplate three times.

use crate::span::Span;
use thiserror::Error;

/// An error tied to a specific source line, independent of which phase
/// raised it. Phase-specific error enums convert into this via `From` so
/// the driver can render any of them uniformly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SourceError {
    pub span: Span,
    pub message: String,
}

impl SourceError {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self { span, message: message.into() }
    }

    pub fn line(&self) -> u32 {
        self.span.line
    }
}
