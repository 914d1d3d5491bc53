//! Core lexer: the `Lexer` struct and its token-dispatch entry point.

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};
use crate::LexError;

pub struct Lexer<'a> {
    pub(crate) cursor: Cursor<'a>,
    pub(crate) token_start: usize,
    pub(crate) token_start_line: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { cursor: Cursor::new(source), token_start: 0, token_start_line: 1 }
    }

    /// Scans the whole source, returning a token list ending in `Eof`, or
    /// the first [`LexError`] encountered — lex errors abort the unit
    /// rather than synchronizing the way parse errors do.
    pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
        let mut lexer = Self::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }

    /// Skips whitespace/comments, then scans and returns one token.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments()?;

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();

        if self.cursor.is_at_end() {
            return Ok(self.make(TokenKind::Eof));
        }

        let c = self.cursor.current_char();
        let token = match c {
            '(' => self.single(TokenKind::LeftParen),
            ')' => self.single(TokenKind::RightParen),
            '{' => self.single(TokenKind::LeftBrace),
            '}' => self.single(TokenKind::RightBrace),
            '[' => self.single(TokenKind::LeftBracket),
            ']' => self.single(TokenKind::RightBracket),
            ',' => self.single(TokenKind::Comma),
            '.' => self.single(TokenKind::Dot),
            ';' => self.single(TokenKind::Semicolon),
            '*' => self.single(TokenKind::Star),
            '%' => self.single(TokenKind::Percent),
            '+' => self.lex_plus_minus('+', TokenKind::Plus, TokenKind::PlusEqual),
            '-' => self.lex_plus_minus('-', TokenKind::Minus, TokenKind::MinusEqual),
            '!' => self.lex_relational('!', TokenKind::Bang, TokenKind::BangEqual),
            '=' => self.lex_relational('=', TokenKind::Equal, TokenKind::EqualEqual),
            '<' => self.lex_relational('<', TokenKind::Less, TokenKind::LessEqual),
            '>' => self.lex_relational('>', TokenKind::Greater, TokenKind::GreaterEqual),
            '/' => return self.lex_slash(),
            '"' => return self.lex_string(),
            c if c.is_ascii_digit() => self.lex_number(),
            c if is_ident_start(c) => self.lex_identifier(),
            c => {
                self.cursor.advance();
                return Err(self.error(format!("Unexpected character '{c}'.")));
            }
        };
        Ok(token)
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        self.cursor.advance();
        self.make(kind)
    }

    fn lex_plus_minus(&mut self, c: char, plain: TokenKind, fused: TokenKind) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(fused)
        } else {
            let _ = c;
            self.make(plain)
        }
    }

    fn lex_relational(&mut self, c: char, plain: TokenKind, fused: TokenKind) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(fused)
        } else {
            let _ = c;
            self.make(plain)
        }
    }

    pub(crate) fn make(&self, kind: TokenKind) -> Token {
        let lexeme = self.cursor.slice_from(self.token_start);
        Token::new(kind, lexeme, self.token_start_line)
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> LexError {
        LexError::new(lox_util::Span::new(self.token_start_line), message)
    }
}

pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub(crate) fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_char_tokens() {
        let tokens = Lexer::tokenize("(){}[],.;*%").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
                TokenKind::Comma,
                TokenKind::Dot,
                TokenKind::Semicolon,
                TokenKind::Star,
                TokenKind::Percent,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn fused_compound_assignment() {
        let tokens = Lexer::tokenize("+= -=").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::PlusEqual);
        assert_eq!(tokens[1].kind, TokenKind::MinusEqual);
    }

    #[test]
    fn plain_plus_minus_without_equals() {
        let tokens = Lexer::tokenize("+ -").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Plus);
        assert_eq!(tokens[1].kind, TokenKind::Minus);
    }

    #[test]
    fn relational_operators() {
        let tokens = Lexer::tokenize("! != = == < <= > >=").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Bang,
                TokenKind::BangEqual,
                TokenKind::Equal,
                TokenKind::EqualEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unexpected_character_errors_with_line() {
        let err = Lexer::tokenize("var x = 1;\n#").unwrap_err();
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn empty_source_yields_only_eof() {
        let tokens = Lexer::tokenize("").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }
}
