//! String literal lexing: `"..."` with a small escape set, spanning
//! multiple source lines freely.

use super::core::Lexer;
use crate::token::{Literal, Token, TokenKind};
use crate::LexError;

impl<'a> Lexer<'a> {
    pub(crate) fn lex_string(&mut self) -> Result<Token, LexError> {
        let start_line = self.cursor.line();
        self.cursor.advance();

        let mut value = String::new();
        loop {
            if self.cursor.is_at_end() {
                return Err(LexError::new(
                    lox_util::Span::new(start_line),
                    "Unterminated string.",
                ));
            }
            match self.cursor.current_char() {
                '"' => {
                    self.cursor.advance();
                    break;
                }
                '\\' => {
                    self.cursor.advance();
                    let escaped = self.cursor.current_char();
                    if self.cursor.is_at_end() {
                        return Err(LexError::new(
                            lox_util::Span::new(start_line),
                            "Unterminated string.",
                        ));
                    }
                    self.cursor.advance();
                    value.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        '"' => '"',
                        '\\' => '\\',
                        other => {
                            return Err(self.error(format!("Invalid escape sequence '\\{other}'.")))
                        }
                    });
                }
                c => {
                    value.push(c);
                    self.cursor.advance();
                }
            }
        }

        let lexeme = self.cursor.slice_from(self.token_start).to_string();
        Ok(Token::with_literal(TokenKind::String, lexeme, Literal::String(value), start_line))
    }
}

#[cfg(test)]
mod tests {
    use super::super::core::Lexer;
    use crate::token::Literal;

    #[test]
    fn simple_string() {
        let tokens = Lexer::tokenize("\"hello\"").unwrap();
        assert_eq!(tokens[0].literal, Some(Literal::String("hello".to_string())));
    }

    #[test]
    fn escapes_are_decoded() {
        let tokens = Lexer::tokenize(r#""a\nb\tc\"d\\e""#).unwrap();
        assert_eq!(tokens[0].literal, Some(Literal::String("a\nb\tc\"d\\e".to_string())));
    }

    #[test]
    fn strings_may_span_multiple_lines() {
        let tokens = Lexer::tokenize("\"line1\nline2\"").unwrap();
        assert_eq!(tokens[0].literal, Some(Literal::String("line1\nline2".to_string())));
    }

    #[test]
    fn unterminated_string_errors() {
        let err = Lexer::tokenize("\"never closes").unwrap_err();
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn invalid_escape_errors() {
        assert!(Lexer::tokenize(r#""\q""#).is_err());
    }
}
