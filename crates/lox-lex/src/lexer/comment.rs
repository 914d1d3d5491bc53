//! Whitespace and comment skipping, including nestable block comments.

use super::core::Lexer;
use crate::LexError;

impl<'a> Lexer<'a> {
    pub(crate) fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.cursor.current_char() {
                ' ' | '\r' | '\t' | '\n' => {
                    self.cursor.advance();
                }
                '/' if self.cursor.peek_char(1) == '/' => {
                    self.skip_line_comment();
                }
                '/' if self.cursor.peek_char(1) == '*' => {
                    self.skip_block_comment()?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while self.cursor.current_char() != '\n' && !self.cursor.is_at_end() {
            self.cursor.advance();
        }
    }

    /// Consumes a `/* ... */` comment, tracking nesting depth so that
    /// `/* outer /* inner */ still outer */` closes only at the matching `*/`.
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_line = self.cursor.line();
        self.cursor.advance();
        self.cursor.advance();
        let mut depth = 1usize;

        while depth > 0 {
            if self.cursor.is_at_end() {
                return Err(LexError::new(
                    lox_util::Span::new(start_line),
                    "Unterminated block comment.",
                ));
            }
            if self.cursor.current_char() == '/' && self.cursor.peek_char(1) == '*' {
                self.cursor.advance();
                self.cursor.advance();
                depth += 1;
            } else if self.cursor.current_char() == '*' && self.cursor.peek_char(1) == '/' {
                self.cursor.advance();
                self.cursor.advance();
                depth -= 1;
            } else {
                self.cursor.advance();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::core::Lexer;
    use crate::token::TokenKind;

    #[test]
    fn skips_line_comment() {
        let tokens = Lexer::tokenize("// hello\nvar").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Var);
    }

    #[test]
    fn skips_simple_block_comment() {
        let tokens = Lexer::tokenize("/* hi */ var").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Var);
    }

    #[test]
    fn skips_nested_block_comment() {
        let tokens = Lexer::tokenize("/* outer /* inner */ still outer */ var").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Var);
    }

    #[test]
    fn unterminated_block_comment_errors() {
        let err = Lexer::tokenize("/* never closes").unwrap_err();
        assert_eq!(err.line(), 1);
    }
}
