//! Expression grammar, precedence low to high: assignment, logic_or,
//! logic_and, equality, comparison, term, factor, unary, call, primary.

use super::Parser;
use crate::ast::{Expr, LiteralValueOrString};
use crate::error::ParseError;
use lox_lex::{Literal, Token, TokenKind};

const MAX_ARGS: usize = 255;

impl Parser {
    pub(crate) fn expression(&mut self) -> Result<Expr, ParseError> {
        self.assignment()
    }

    /// `( call "." )? IDENT ( "=" | "+=" | "-=" ) assignment | logic_or`
    ///
    /// `+=`/`-=` rewrite to `x = x + e` / `x = x - e` right here, and only
    /// ever do so when the LHS is a bare variable — `obj.field += 1` and
    /// `arr[i] += 1` are deliberately not accepted.
    fn assignment(&mut self) -> Result<Expr, ParseError> {
        let expr = self.or()?;

        if self.matches(&[TokenKind::Equal, TokenKind::PlusEqual, TokenKind::MinusEqual]) {
            let equals = self.previous().clone();
            let value = self.assignment()?;

            return match expr {
                Expr::Variable { name, .. } => {
                    let rhs = match equals.kind {
                        TokenKind::PlusEqual => Expr::Binary {
                            id: self.ids.fresh(),
                            left: Box::new(Expr::Variable { id: self.ids.fresh(), name: name.clone() }),
                            operator: Token::new(TokenKind::Plus, "+", equals.line),
                            right: Box::new(value),
                        },
                        TokenKind::MinusEqual => Expr::Binary {
                            id: self.ids.fresh(),
                            left: Box::new(Expr::Variable { id: self.ids.fresh(), name: name.clone() }),
                            operator: Token::new(TokenKind::Minus, "-", equals.line),
                            right: Box::new(value),
                        },
                        _ => value,
                    };
                    Ok(Expr::Assign { id: self.ids.fresh(), name, value: Box::new(rhs) })
                }
                Expr::Get { object, name, .. } if equals.kind == TokenKind::Equal => {
                    Ok(Expr::Set { id: self.ids.fresh(), object, name, value: Box::new(value) })
                }
                Expr::Index { object, index, bracket, .. } if equals.kind == TokenKind::Equal => {
                    Ok(Expr::IndexSet { id: self.ids.fresh(), object, index, value: Box::new(value), bracket })
                }
                _ => Err(self.error_at_token(&equals, "Invalid assignment target.")),
            };
        }

        Ok(expr)
    }

    fn or(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.and()?;
        while self.matches(&[TokenKind::Or]) {
            let operator = self.previous().clone();
            let right = self.and()?;
            expr = Expr::Logical { id: self.ids.fresh(), left: Box::new(expr), operator, right: Box::new(right) };
        }
        Ok(expr)
    }

    fn and(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.equality()?;
        while self.matches(&[TokenKind::And]) {
            let operator = self.previous().clone();
            let right = self.equality()?;
            expr = Expr::Logical { id: self.ids.fresh(), left: Box::new(expr), operator, right: Box::new(right) };
        }
        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.comparison()?;
        while self.matches(&[TokenKind::BangEqual, TokenKind::EqualEqual]) {
            let operator = self.previous().clone();
            let right = self.comparison()?;
            expr = Expr::Binary { id: self.ids.fresh(), left: Box::new(expr), operator, right: Box::new(right) };
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.term()?;
        while self.matches(&[
            TokenKind::Greater,
            TokenKind::GreaterEqual,
            TokenKind::Less,
            TokenKind::LessEqual,
        ]) {
            let operator = self.previous().clone();
            let right = self.term()?;
            expr = Expr::Binary { id: self.ids.fresh(), left: Box::new(expr), operator, right: Box::new(right) };
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.factor()?;
        while self.matches(&[TokenKind::Minus, TokenKind::Plus]) {
            let operator = self.previous().clone();
            let right = self.factor()?;
            expr = Expr::Binary { id: self.ids.fresh(), left: Box::new(expr), operator, right: Box::new(right) };
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.unary()?;
        while self.matches(&[TokenKind::Slash, TokenKind::Star, TokenKind::Percent]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            expr = Expr::Binary { id: self.ids.fresh(), left: Box::new(expr), operator, right: Box::new(right) };
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        if self.matches(&[TokenKind::Bang, TokenKind::Minus]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            return Ok(Expr::Unary { id: self.ids.fresh(), operator, right: Box::new(right) });
        }
        self.call()
    }

    /// `primary ( "(" args? ")" | "." IDENT | "[" expression "]" )*`
    fn call(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.primary()?;
        loop {
            if self.matches(&[TokenKind::LeftParen]) {
                expr = self.finish_call(expr)?;
            } else if self.matches(&[TokenKind::Dot]) {
                let name = self.consume(TokenKind::Identifier, "Expect property name after '.'.")?;
                expr = Expr::Get { id: self.ids.fresh(), object: Box::new(expr), name };
            } else if self.matches(&[TokenKind::LeftBracket]) {
                let index = self.expression()?;
                let bracket = self.consume(TokenKind::RightBracket, "Expect ']' after index.")?;
                expr = Expr::Index {
                    id: self.ids.fresh(),
                    object: Box::new(expr),
                    index: Box::new(index),
                    bracket,
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> Result<Expr, ParseError> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                if args.len() >= MAX_ARGS {
                    return Err(self.error_at_current("Can't have more than 255 arguments."));
                }
                args.push(self.expression()?);
                if !self.matches(&[TokenKind::Comma]) {
                    break;
                }
            }
        }
        let paren = self.consume(TokenKind::RightParen, "Expect ')' after arguments.")?;
        Ok(Expr::Call { id: self.ids.fresh(), callee: Box::new(callee), paren, args })
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        if self.matches(&[TokenKind::False]) {
            return Ok(Expr::Literal { id: self.ids.fresh(), value: LiteralValueOrString::Bool(false) });
        }
        if self.matches(&[TokenKind::True]) {
            return Ok(Expr::Literal { id: self.ids.fresh(), value: LiteralValueOrString::Bool(true) });
        }
        if self.matches(&[TokenKind::Nil]) {
            return Ok(Expr::Literal { id: self.ids.fresh(), value: LiteralValueOrString::Nil });
        }
        if self.matches(&[TokenKind::This]) {
            return Ok(Expr::This { id: self.ids.fresh(), keyword: self.previous().clone() });
        }
        if self.matches(&[TokenKind::Number]) {
            let value = match &self.previous().literal {
                Some(Literal::Number(n)) => *n,
                _ => unreachable!("lexer always attaches a Number literal to a NUMBER token"),
            };
            return Ok(Expr::Literal { id: self.ids.fresh(), value: LiteralValueOrString::Number(value) });
        }
        if self.matches(&[TokenKind::String]) {
            let value = match &self.previous().literal {
                Some(Literal::String(s)) => s.clone(),
                _ => unreachable!("lexer always attaches a String literal to a STRING token"),
            };
            return Ok(Expr::Literal { id: self.ids.fresh(), value: LiteralValueOrString::String(value) });
        }
        if self.matches(&[TokenKind::Super]) {
            let keyword = self.previous().clone();
            self.consume(TokenKind::Dot, "Expect '.' after 'super'.")?;
            let method = self.consume(TokenKind::Identifier, "Expect superclass method name.")?;
            return Ok(Expr::Super { id: self.ids.fresh(), keyword, method });
        }
        if self.matches(&[TokenKind::Identifier]) {
            return Ok(Expr::Variable { id: self.ids.fresh(), name: self.previous().clone() });
        }
        if self.matches(&[TokenKind::LeftParen]) {
            let expr = self.expression()?;
            self.consume(TokenKind::RightParen, "Expect ')' after expression.")?;
            return Ok(Expr::Grouping { id: self.ids.fresh(), expr: Box::new(expr) });
        }
        if self.matches(&[TokenKind::LeftBracket]) {
            let mut elements = Vec::new();
            if !self.check(TokenKind::RightBracket) {
                elements.push(self.expression()?);
                while self.matches(&[TokenKind::Comma]) {
                    elements.push(self.expression()?);
                }
            }
            self.consume(TokenKind::RightBracket, "Expect ']' after array elements.")?;
            return Ok(Expr::Array { id: self.ids.fresh(), elements });
        }

        Err(self.error_at_current("Expect expression."))
    }

    fn error_at_token(&self, token: &Token, message: &str) -> ParseError {
        ParseError::new(lox_util::Span::new(token.line), message.to_string())
    }
}
