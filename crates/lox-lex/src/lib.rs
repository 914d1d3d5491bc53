//! Tokenizes Lox source text into a flat token stream.
//!
//! Lexing fails fast: the first bad character or unterminated string or
//! comment aborts the whole source unit rather than synchronizing and
//! collecting further errors the way the parser does. Diagnostic
//! rendering (the `[linha N] Erro: ...` prefix) is shared with the rest
//! of the toolchain via `lox_util::Diagnostic`, so a `LexError` is just
//! that type under a name scoped to this phase.

mod cursor;
mod lexer;
mod token;

pub use lexer::Lexer;
pub use token::{keyword_kind, Literal, Token, TokenKind};

/// A lexing failure: an unexpected character, an unterminated string, or
/// an unterminated block comment, tied to the line it started on.
pub type LexError = lox_util::SourceError;

/// Convenience entry point: tokenize a full source string.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::tokenize(source)
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn atom() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-zA-Z_][a-zA-Z0-9_]{0,6}",
            "[0-9]{1,4}",
            Just("+".to_string()),
            Just("-".to_string()),
            Just("(".to_string()),
            Just(")".to_string()),
            Just(";".to_string()),
        ]
    }

    proptest! {
        /// Joining random atoms with single spaces and re-tokenizing
        /// reproduces exactly those lexemes in order: the lexemes plus the
        /// skipped whitespace reconstruct the source.
        #[test]
        fn lexeme_concatenation_round_trips(atoms in proptest::collection::vec(atom(), 0..12)) {
            let source = atoms.join(" ");
            let tokens = tokenize(&source).expect("generated source is always lexable");
            let lexemes: Vec<&str> = tokens
                .iter()
                .filter(|t| t.kind != TokenKind::Eof)
                .map(|t| t.lexeme.as_str())
                .collect();
            prop_assert_eq!(lexemes, atoms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_a_small_program() {
        let tokens = tokenize("var x = 1 + 2;\nprint x;").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Var,
                TokenKind::Identifier,
                TokenKind::Equal,
                TokenKind::Number,
                TokenKind::Plus,
                TokenKind::Number,
                TokenKind::Semicolon,
                TokenKind::Print,
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }
}
