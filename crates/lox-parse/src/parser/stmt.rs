//! `statement := exprStmt | forStmt | ifStmt | printStmt | returnStmt
//!             | whileStmt | breakStmt | continueStmt | block`

use super::Parser;
use crate::ast::{Expr, LiteralValueOrString, Stmt};
use crate::error::ParseError;
use lox_lex::TokenKind;

impl Parser {
    pub(crate) fn statement(&mut self) -> Result<Stmt, ParseError> {
        if self.matches(&[TokenKind::For]) {
            return self.for_statement();
        }
        if self.matches(&[TokenKind::If]) {
            return self.if_statement();
        }
        if self.matches(&[TokenKind::Print]) {
            return self.print_statement();
        }
        if self.matches(&[TokenKind::Return]) {
            return self.return_statement();
        }
        if self.matches(&[TokenKind::While]) {
            return self.while_statement();
        }
        if self.matches(&[TokenKind::Break]) {
            return self.break_statement();
        }
        if self.matches(&[TokenKind::Continue]) {
            return self.continue_statement();
        }
        if self.matches(&[TokenKind::LeftBrace]) {
            return Ok(Stmt::Block(self.block()?));
        }
        self.expression_statement()
    }

    pub(crate) fn block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }
        self.consume(TokenKind::RightBrace, "Expect '}' after block.")?;
        Ok(statements)
    }

    /// Desugars `for (init; cond; incr) body` into a `while`, but keeps
    /// `incr` out of the body so that a `continue` inside `body` still
    /// runs it before the next condition check (see the loop-increment
    /// design note this crate follows, rather than folding `incr` into a
    /// block wrapping `body` the way a naive desugaring would).
    fn for_statement(&mut self) -> Result<Stmt, ParseError> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = if self.matches(&[TokenKind::Semicolon]) {
            None
        } else if self.matches(&[TokenKind::Var]) {
            Some(self.var_declaration_after_var()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if self.check(TokenKind::Semicolon) {
            Expr::Literal { id: self.ids.fresh(), value: LiteralValueOrString::Bool(true) }
        } else {
            self.expression()?
        };
        self.consume(TokenKind::Semicolon, "Expect ';' after loop condition.")?;

        let increment =
            if self.check(TokenKind::RightParen) { None } else { Some(self.expression()?) };
        self.consume(TokenKind::RightParen, "Expect ')' after for clauses.")?;

        let body = Box::new(self.statement()?);
        let while_stmt = Stmt::While { condition, body, increment };

        Ok(match initializer {
            Some(init) => Stmt::Block(vec![init, while_stmt]),
            None => while_stmt,
        })
    }

    /// `for`'s own initializer branch already consumed `var`; reuse the
    /// shared declaration body without re-matching the keyword.
    fn var_declaration_after_var(&mut self) -> Result<Stmt, ParseError> {
        let name = self.consume(TokenKind::Identifier, "Expect variable name.")?;
        let init = if self.matches(&[TokenKind::Equal]) { Some(self.expression()?) } else { None };
        self.consume(TokenKind::Semicolon, "Expect ';' after variable declaration.")?;
        Ok(Stmt::Var { name, init })
    }

    fn if_statement(&mut self) -> Result<Stmt, ParseError> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch =
            if self.matches(&[TokenKind::Else]) { Some(Box::new(self.statement()?)) } else { None };

        Ok(Stmt::If { condition, then_branch, else_branch })
    }

    fn print_statement(&mut self) -> Result<Stmt, ParseError> {
        let value = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print(value))
    }

    fn return_statement(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.previous().clone();
        let value = if self.check(TokenKind::Semicolon) { None } else { Some(self.expression()?) };
        self.consume(TokenKind::Semicolon, "Expect ';' after return value.")?;
        Ok(Stmt::Return { keyword, value })
    }

    fn while_statement(&mut self) -> Result<Stmt, ParseError> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after condition.")?;
        let body = Box::new(self.statement()?);
        Ok(Stmt::While { condition, body, increment: None })
    }

    fn break_statement(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.previous().clone();
        self.consume(TokenKind::Semicolon, "Expect ';' after 'break'.")?;
        Ok(Stmt::Break { keyword })
    }

    fn continue_statement(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.previous().clone();
        self.consume(TokenKind::Semicolon, "Expect ';' after 'continue'.")?;
        Ok(Stmt::Continue { keyword })
    }

    fn expression_statement(&mut self) -> Result<Stmt, ParseError> {
        let expr = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression(expr))
    }
}
