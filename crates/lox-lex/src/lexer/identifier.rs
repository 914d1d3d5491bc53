//! Identifier and keyword lexing.

use super::core::{is_ident_continue, Lexer};
use crate::token::{Token, TokenKind};

impl<'a> Lexer<'a> {
    pub(crate) fn lex_identifier(&mut self) -> Token {
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(self.token_start);
        let kind = crate::token::keyword_kind(text).unwrap_or(TokenKind::Identifier);
        self.make(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::super::core::Lexer;
    use crate::token::TokenKind;

    #[test]
    fn plain_identifier() {
        let tokens = Lexer::tokenize("foo_bar").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].lexeme, "foo_bar");
    }

    #[test]
    fn keyword_is_not_an_identifier() {
        let tokens = Lexer::tokenize("while").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::While);
    }

    #[test]
    fn identifier_may_start_with_underscore() {
        let tokens = Lexer::tokenize("_private").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
    }

    #[test]
    fn identifier_followed_by_digits() {
        let tokens = Lexer::tokenize("value1").unwrap();
        assert_eq!(tokens[0].lexeme, "value1");
    }
}
