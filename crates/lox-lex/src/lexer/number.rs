//! Number literal lexing: one or more decimal digits, optionally followed
//! by `.` and one or more digits. No hex/octal/binary/exponent forms.

use super::core::Lexer;
use crate::token::{Literal, Token, TokenKind};

impl<'a> Lexer<'a> {
    pub(crate) fn lex_number(&mut self) -> Token {
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        let lexeme = self.cursor.slice_from(self.token_start).to_string();
        let value: f64 = lexeme.parse().expect("number lexeme is always valid f64 text");
        Token::with_literal(TokenKind::Number, lexeme, Literal::Number(value), self.token_start_line)
    }
}

#[cfg(test)]
mod tests {
    use super::super::core::Lexer;
    use crate::token::Literal;

    #[test]
    fn integer_literal() {
        let tokens = Lexer::tokenize("123").unwrap();
        assert_eq!(tokens[0].literal, Some(Literal::Number(123.0)));
    }

    #[test]
    fn float_literal() {
        let tokens = Lexer::tokenize("3.14").unwrap();
        assert_eq!(tokens[0].literal, Some(Literal::Number(3.14)));
    }

    #[test]
    fn trailing_dot_without_digit_is_not_consumed() {
        let tokens = Lexer::tokenize("1.").unwrap();
        assert_eq!(tokens[0].literal, Some(Literal::Number(1.0)));
        assert_eq!(tokens[1].kind, crate::token::TokenKind::Dot);
    }
}
