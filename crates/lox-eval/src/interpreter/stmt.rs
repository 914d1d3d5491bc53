//! Statement execution.

use lox_util::FxHashMap;

use crate::error::RuntimeError;
use crate::value::Value;
use lox_parse::ast::Stmt;

use super::{ExecResult, Flow, Interpreter, Print};

impl Interpreter {
    pub(crate) fn execute_stmt(&mut self, stmt: &Stmt, print: Print<'_>) -> ExecResult {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate_expr(expr, print)?;
                Ok(Flow::Normal)
            }

            Stmt::Print(expr) => {
                let value = self.evaluate_expr(expr, print)?;
                let text = self.stringify(&value);
                print(&text);
                Ok(Flow::Normal)
            }

            Stmt::Var { name, init } => {
                let value = match init {
                    Some(expr) => self.evaluate_expr(expr, print)?,
                    None => Value::Nil,
                };
                self.env.define(self.current, &name.lexeme, value);
                Ok(Flow::Normal)
            }

            Stmt::Block(statements) => {
                let scope = self.env.child(self.current);
                self.execute_block(statements, scope, print)
            }

            Stmt::If { condition, then_branch, else_branch } => {
                if self.evaluate_expr(condition, print)?.is_truthy() {
                    self.execute_stmt(then_branch, print)
                } else if let Some(else_branch) = else_branch {
                    self.execute_stmt(else_branch, print)
                } else {
                    Ok(Flow::Normal)
                }
            }

            // The increment runs after the body on *every* iteration,
            // including one the body ended early with `continue` — see the
            // `While::increment` field's doc comment in `lox-parse`.
            Stmt::While { condition, body, increment } => {
                while self.evaluate_expr(condition, print)?.is_truthy() {
                    match self.execute_stmt(body, print)? {
                        Flow::Break => break,
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                        Flow::Normal | Flow::Continue => {}
                    }
                    if let Some(increment) = increment {
                        self.evaluate_expr(increment, print)?;
                    }
                }
                Ok(Flow::Normal)
            }

            Stmt::Function(decl) => {
                let id = self.declare_function(decl, false);
                self.env.define(self.current, &decl.name.lexeme, Value::Function(id));
                Ok(Flow::Normal)
            }

            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate_expr(expr, print)?,
                    None => Value::Nil,
                };
                Ok(Flow::Return(value))
            }

            Stmt::Class { name, superclass, methods } => {
                self.env.define(self.current, &name.lexeme, Value::Nil);

                let superclass_id = match superclass {
                    Some(expr) => match self.evaluate_expr(expr, print)? {
                        Value::Class(id) => Some(id),
                        _ => {
                            return Err(RuntimeError::new(
                                lox_util::Span::new(expr.line()),
                                "Superclass must be a class.".to_string(),
                            ))
                        }
                    },
                    None => None,
                };

                let enclosing = self.current;
                if let Some(superclass_id) = superclass_id {
                    self.current = self.env.child(self.current);
                    self.env.define(self.current, "super", Value::Class(superclass_id));
                }

                let mut method_ids = FxHashMap::default();
                for method in methods {
                    let is_initializer = method.name.lexeme == "init";
                    let id = self.declare_function(method, is_initializer);
                    method_ids.insert(method.name.lexeme.clone(), id);
                }

                self.current = enclosing;

                let class_id = self.heap.alloc_class(name.lexeme.clone(), superclass_id, method_ids);
                self.env.define(self.current, &name.lexeme, Value::Class(class_id));
                Ok(Flow::Normal)
            }

            Stmt::Break { .. } => Ok(Flow::Break),
            Stmt::Continue { .. } => Ok(Flow::Continue),
        }
    }
}
