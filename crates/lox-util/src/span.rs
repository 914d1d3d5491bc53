//! Source location tracking.
//!
//! Lox only ever interprets a single source unit per run (a file or one
//! REPL line), so unlike a multi-file compiler frontend there is no
//! `FileId`/`SourceMap` layer here — a bare 1-based line number is enough
//! to reproduce the `[line N] ...` diagnostics the driver prints.

/// A location in the source text, currently just a line number.
///
/// Kept as its own type (rather than a bare `u32`) so diagnostics code
/// reads the same way it would if richer span tracking were added later.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub line: u32,
}

impl Span {
    pub const DUMMY: Span = Span { line: 0 };

    #[inline]
    pub const fn new(line: u32) -> Self {
        Self { line }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}", self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sets_line() {
        assert_eq!(Span::new(7).line, 7);
    }

    #[test]
    fn dummy_is_line_zero() {
        assert_eq!(Span::DUMMY.line, 0);
    }
}
