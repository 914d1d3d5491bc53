//! Expression evaluation.

use lox_lex::TokenKind;
use lox_parse::ast::{Expr, LiteralValueOrString};
use lox_util::Span;

use crate::error::RuntimeError;
use crate::value::Value;

use super::{EvalResult, Interpreter, Print};

impl Interpreter {
    pub(crate) fn evaluate_expr(&mut self, expr: &Expr, print: Print<'_>) -> EvalResult {
        match expr {
            Expr::Literal { value, .. } => Ok(match value {
                LiteralValueOrString::Nil => Value::Nil,
                LiteralValueOrString::Bool(b) => Value::Bool(*b),
                LiteralValueOrString::Number(n) => Value::Number(*n),
                LiteralValueOrString::String(s) => Value::string(s.clone()),
            }),

            Expr::Variable { id, name } => self.lookup(*id, &name.lexeme, name),

            Expr::Assign { id, name, value } => {
                let value = self.evaluate_expr(value, print)?;
                match self.locals.get(id) {
                    Some(&distance) => {
                        self.env.assign_at(self.current, distance, name, value.clone());
                    }
                    None => self.env.assign(self.globals, name, value.clone())?,
                }
                Ok(value)
            }

            Expr::Unary { operator, right, .. } => {
                let value = self.evaluate_expr(right, print)?;
                match operator.kind {
                    TokenKind::Minus => Ok(Value::Number(-expect_number(&value, operator.line)?)),
                    TokenKind::Bang => Ok(Value::Bool(!value.is_truthy())),
                    _ => unreachable!("parser never attaches this operator to Unary"),
                }
            }

            Expr::Binary { left, operator, right, .. } => {
                let left = self.evaluate_expr(left, print)?;
                let right = self.evaluate_expr(right, print)?;
                let line = operator.line;
                match operator.kind {
                    TokenKind::Plus => self.add(&left, &right, line),
                    TokenKind::Minus => Ok(Value::Number(expect_number(&left, line)? - expect_number(&right, line)?)),
                    TokenKind::Star => Ok(Value::Number(expect_number(&left, line)? * expect_number(&right, line)?)),
                    TokenKind::Slash => {
                        let (a, b) = (expect_number(&left, line)?, expect_number(&right, line)?);
                        divide(a, b, line)
                    }
                    TokenKind::Percent => {
                        let (a, b) = (expect_number(&left, line)?, expect_number(&right, line)?);
                        if b == 0.0 {
                            return Err(division_by_zero(line));
                        }
                        Ok(Value::Number(a % b))
                    }
                    TokenKind::Greater => Ok(Value::Bool(expect_number(&left, line)? > expect_number(&right, line)?)),
                    TokenKind::GreaterEqual => {
                        Ok(Value::Bool(expect_number(&left, line)? >= expect_number(&right, line)?))
                    }
                    TokenKind::Less => Ok(Value::Bool(expect_number(&left, line)? < expect_number(&right, line)?)),
                    TokenKind::LessEqual => {
                        Ok(Value::Bool(expect_number(&left, line)? <= expect_number(&right, line)?))
                    }
                    TokenKind::EqualEqual => Ok(Value::Bool(left.lox_eq(&right))),
                    TokenKind::BangEqual => Ok(Value::Bool(!left.lox_eq(&right))),
                    _ => unreachable!("parser never attaches this operator to Binary"),
                }
            }

            Expr::Logical { left, operator, right, .. } => {
                let left = self.evaluate_expr(left, print)?;
                match operator.kind {
                    TokenKind::Or if left.is_truthy() => Ok(left),
                    TokenKind::And if !left.is_truthy() => Ok(left),
                    _ => self.evaluate_expr(right, print),
                }
            }

            Expr::Grouping { expr, .. } => self.evaluate_expr(expr, print),

            Expr::Call { callee, paren, args, .. } => {
                let callee = self.evaluate_expr(callee, print)?;
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.evaluate_expr(arg, print)?);
                }
                match callee {
                    Value::Function(id) => {
                        let arity = self.heap.functions[id].arity();
                        if values.len() != arity {
                            return Err(arity_error(paren.line, arity, values.len()));
                        }
                        self.call_function(id, values, print)
                    }
                    Value::Native(native) => {
                        if values.len() != native.arity {
                            return Err(arity_error(paren.line, native.arity, values.len()));
                        }
                        (native.call)(&self.heap, &values, paren.line)
                    }
                    Value::Class(id) => {
                        let arity = self
                            .heap
                            .find_method(id, "init")
                            .map(|method| self.heap.functions[method].arity())
                            .unwrap_or(0);
                        if values.len() != arity {
                            return Err(arity_error(paren.line, arity, values.len()));
                        }
                        self.construct_instance(id, values, print)
                    }
                    other => Err(RuntimeError::new(
                        Span::new(paren.line),
                        format!("Can only call functions and classes, not a {}.", other.type_name()),
                    )),
                }
            }

            Expr::Get { object, name, .. } => {
                let object = self.evaluate_expr(object, print)?;
                match object {
                    Value::Instance(id) => {
                        if let Some(value) = self.heap.instances[id].fields.get(&name.lexeme).cloned() {
                            return Ok(value);
                        }
                        let class = self.heap.instances[id].class;
                        match self.heap.find_method(class, &name.lexeme) {
                            Some(method) => Ok(Value::Function(self.bind_method(method, id))),
                            None => Err(undefined_property(name.line, &name.lexeme)),
                        }
                    }
                    other => Err(RuntimeError::new(
                        Span::new(name.line),
                        format!("Only instances have properties, not a {}.", other.type_name()),
                    )),
                }
            }

            Expr::Set { object, name, value, .. } => {
                let object = self.evaluate_expr(object, print)?;
                let id = match object {
                    Value::Instance(id) => id,
                    other => {
                        return Err(RuntimeError::new(
                            Span::new(name.line),
                            format!("Only instances have fields, not a {}.", other.type_name()),
                        ))
                    }
                };
                let value = self.evaluate_expr(value, print)?;
                self.heap.instances[id].fields.insert(name.lexeme.clone(), value.clone());
                Ok(value)
            }

            Expr::This { id, keyword } => self.lookup(*id, "this", keyword),

            Expr::Super { id, keyword, method } => {
                let distance = *self.locals.get(id).expect("resolver always resolves `super`");
                let superclass = match self.env.get_at(self.current, distance, "super") {
                    Value::Class(id) => id,
                    _ => unreachable!("`super` always resolves to a Class value"),
                };
                let instance = match self.env.get_at(self.current, distance - 1, "this") {
                    Value::Instance(id) => id,
                    _ => unreachable!("`this` always sits one scope inside `super`"),
                };
                let method = self
                    .heap
                    .find_method(superclass, &method.lexeme)
                    .ok_or_else(|| undefined_property(keyword.line, &method.lexeme))?;
                Ok(Value::Function(self.bind_method(method, instance)))
            }

            Expr::Array { elements, .. } => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.evaluate_expr(element, print)?);
                }
                Ok(Value::Array(self.heap.alloc_array(values)))
            }

            Expr::Index { object, index, bracket, .. } => {
                let object = self.evaluate_expr(object, print)?;
                let index = self.evaluate_expr(index, print)?;
                let i = expect_index(&index, bracket.line)?;
                match object {
                    Value::Array(id) => {
                        let array = &self.heap.arrays[id];
                        index_get(i, array.len())
                            .map(|i| array[i].clone())
                            .ok_or_else(|| out_of_bounds(bracket.line, i, array.len()))
                    }
                    Value::String(s) => {
                        let len = s.chars().count();
                        index_get(i, len)
                            .and_then(|i| s.chars().nth(i))
                            .map(|c| Value::string(c.to_string()))
                            .ok_or_else(|| out_of_bounds(bracket.line, i, len))
                    }
                    other => Err(RuntimeError::new(
                        Span::new(bracket.line),
                        format!("Can't index a {}.", other.type_name()),
                    )),
                }
            }

            Expr::IndexSet { object, index, value, bracket, .. } => {
                let object = self.evaluate_expr(object, print)?;
                let id = match object {
                    Value::Array(id) => id,
                    other => {
                        return Err(RuntimeError::new(
                            Span::new(bracket.line),
                            format!("Can't index a {}.", other.type_name()),
                        ))
                    }
                };
                let index = self.evaluate_expr(index, print)?;
                let i = expect_index(&index, bracket.line)?;
                let value = self.evaluate_expr(value, print)?;
                let len = self.heap.arrays[id].len();
                let Some(i) = index_get(i, len) else {
                    return Err(out_of_bounds(bracket.line, i, len));
                };
                self.heap.arrays[id][i] = value.clone();
                Ok(value)
            }
        }
    }

    /// `+`'s overload order: number + number adds; if either side is a
    /// string both sides are stringified and concatenated; array + array
    /// concatenates into a fresh array; anything else is a type error.
    fn add(&mut self, left: &Value, right: &Value, line: u32) -> EvalResult {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::String(_), _) | (_, Value::String(_)) => {
                Ok(Value::string(format!("{}{}", self.stringify(left), self.stringify(right))))
            }
            (Value::Array(a), Value::Array(b)) => {
                let mut combined = self.heap.arrays[*a].clone();
                combined.extend(self.heap.arrays[*b].iter().cloned());
                Ok(Value::Array(self.heap.alloc_array(combined)))
            }
            _ => Err(RuntimeError::new(
                Span::new(line),
                "Operands must be two numbers, two strings, or two arrays.".to_string(),
            )),
        }
    }
}

fn expect_number(value: &Value, line: u32) -> Result<f64, RuntimeError> {
    match value {
        Value::Number(n) => Ok(*n),
        other => {
            Err(RuntimeError::new(Span::new(line), format!("Operand must be a number, got a {}.", other.type_name())))
        }
    }
}

/// A numeric index is required but truncated toward zero rather than
/// rejecting a non-integral index outright. Bounds (including negative
/// indices) are checked separately by [`index_get`].
fn expect_index(value: &Value, line: u32) -> Result<i64, RuntimeError> {
    match value {
        Value::Number(n) => Ok(n.trunc() as i64),
        other => Err(RuntimeError::new(
            Span::new(line),
            format!("Index must be a number, got a {}.", other.type_name()),
        )),
    }
}

/// `0 <= i < len` in-bounds check, done after truncation so a negative
/// index is reported as out-of-bounds rather than silently wrapping.
fn index_get(i: i64, len: usize) -> Option<usize> {
    if i >= 0 && (i as usize) < len {
        Some(i as usize)
    } else {
        None
    }
}

fn out_of_bounds(line: u32, index: i64, len: usize) -> RuntimeError {
    RuntimeError::new(Span::new(line), format!("Index {index} out of bounds for length {len}."))
}

fn divide(a: f64, b: f64, line: u32) -> EvalResult {
    if b == 0.0 {
        return Err(division_by_zero(line));
    }
    Ok(Value::Number(a / b))
}

fn division_by_zero(line: u32) -> RuntimeError {
    RuntimeError::new(Span::new(line), "Division by zero.".to_string())
}

fn arity_error(line: u32, expected: usize, got: usize) -> RuntimeError {
    RuntimeError::new(Span::new(line), format!("Expected {expected} arguments but got {got}."))
}

fn undefined_property(line: u32, name: &str) -> RuntimeError {
    RuntimeError::new(Span::new(line), format!("Undefined property '{name}'."))
}
