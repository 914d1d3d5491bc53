//! The tree-walking evaluator: AST × environment → side effects + values.
//!
//! Evaluation is depth-first and synchronous. `return`, `break`, and
//! `continue` are modeled as a [`Flow`] riding alongside every `Result`,
//! rather than an actual host-language unwind — a statement that produces
//! `Ok(Flow::Return(v))` or an `Err` both stop their enclosing block from
//! running further statements, and [`Interpreter::execute_block`] restores
//! the previous environment on every one of those exits, which is the
//! Rust-idiomatic way to guarantee scope-exit logic runs on all paths
//! without an actual unwind.

mod expr;
mod stmt;

use std::rc::Rc;

use lox_parse::ast::{FunctionDecl, NodeId, Stmt};
use lox_util::FxHashMap;

use crate::builtins;
use crate::env::{EnvId, Environment};
use crate::error::RuntimeError;
use crate::heap::{ClassId, FunctionId, Heap, InstanceId};
use crate::value::{stringify as stringify_value, Value};

/// A sink for `print` output, kept as a trait object so the driver can
/// hand the interpreter real stdout while tests hand it a `Vec<String>`
/// without the interpreter itself knowing or caring which.
pub type Print<'a> = &'a mut dyn FnMut(&str);

/// Non-local exits `return`/`break`/`continue` produce, threaded through
/// statement execution results instead of unwinding the host stack.
pub(crate) enum Flow {
    Normal,
    Return(Value),
    Break,
    Continue,
}

pub(crate) type ExecResult = Result<Flow, RuntimeError>;
pub(crate) type EvalResult = Result<Value, RuntimeError>;

pub struct Interpreter {
    pub(crate) env: Environment,
    pub(crate) heap: Heap,
    pub(crate) globals: EnvId,
    pub(crate) current: EnvId,
    pub(crate) locals: FxHashMap<NodeId, u32>,
}

impl Interpreter {
    pub fn new(locals: FxHashMap<NodeId, u32>) -> Self {
        let mut env = Environment::new();
        let globals = env.globals();
        builtins::install(|name, value| env.define(globals, name, value));
        Self { env, heap: Heap::new(), globals, current: globals, locals }
    }

    /// Merges freshly resolved `locals` into the interpreter's side table.
    /// A REPL resolves and evaluates one line at a time against a single
    /// persistent interpreter; each line's `NodeId`s start
    /// over from zero, but by the time the next line is resolved the
    /// previous line's statements are gone and nothing still live queries
    /// their ids, so merging rather than replacing never loses a binding
    /// a currently executing statement still needs.
    pub fn extend_locals(&mut self, locals: FxHashMap<NodeId, u32>) {
        self.locals.extend(locals);
    }

    /// Interprets a list of top-level statements.
    ///
    /// A runtime error aborts only the statement that raised it; execution
    /// resumes with the next top-level statement, matching the REPL's
    /// line-at-a-time model reusing one interpreter across lines.
    pub fn run(&mut self, statements: &[Stmt], print: Print<'_>) -> Vec<RuntimeError> {
        let mut errors = Vec::new();
        for statement in statements {
            if let Err(err) = self.execute_stmt(statement, print) {
                errors.push(err);
            }
        }
        errors
    }

    /// Executes `statements` in a freshly entered scope, restoring the
    /// previous scope on every exit path.
    pub(crate) fn execute_block(&mut self, statements: &[Stmt], env: EnvId, print: Print<'_>) -> ExecResult {
        let previous = self.current;
        self.current = env;
        let mut result = Ok(Flow::Normal);
        for statement in statements {
            match self.execute_stmt(statement, print) {
                Ok(Flow::Normal) => continue,
                other => {
                    result = other;
                    break;
                }
            }
        }
        self.current = previous;
        result
    }

    pub(crate) fn stringify(&self, value: &Value) -> String {
        stringify_value(value, &self.heap)
    }

    /// Resolved-aware lookup shared by `Variable`, `This`, and `Super`: a
    /// name present in `locals` is read at its exact distance; anything
    /// else is a global.
    pub(crate) fn lookup(&self, id: NodeId, name: &str, token: &lox_lex::Token) -> EvalResult {
        match self.locals.get(&id) {
            Some(&distance) => Ok(self.env.get_at(self.current, distance, name)),
            None => self.env.get(self.globals, token),
        }
    }

    pub(crate) fn call_function(&mut self, id: FunctionId, args: Vec<Value>, print: Print<'_>) -> EvalResult {
        let (declaration, closure, is_initializer) = {
            let function = &self.heap.functions[id];
            (Rc::clone(&function.declaration), function.closure, function.is_initializer)
        };

        let call_env = self.env.child(closure);
        for (param, arg) in declaration.params.iter().zip(args) {
            self.env.define(call_env, &param.lexeme, arg);
        }

        let flow = self.execute_block(&declaration.body, call_env, print)?;

        if is_initializer {
            return Ok(self.env.get_at(closure, 0, "this"));
        }

        match flow {
            Flow::Return(value) => Ok(value),
            _ => Ok(Value::Nil),
        }
    }

    /// Rebuilds a method's closure with `this` bound one level over it.
    /// Produces a fresh [`FunctionId`] rather than mutating the original
    /// so the unbound method stays reusable for other instances.
    pub(crate) fn bind_method(&mut self, method: FunctionId, instance: InstanceId) -> FunctionId {
        let function = &self.heap.functions[method];
        let declaration = Rc::clone(&function.declaration);
        let is_initializer = function.is_initializer;
        let bound_env = self.env.child(function.closure);
        self.env.define(bound_env, "this", Value::Instance(instance));
        self.heap.alloc_function(declaration, bound_env, is_initializer)
    }

    pub(crate) fn construct_instance(&mut self, class: ClassId, args: Vec<Value>, print: Print<'_>) -> EvalResult {
        let instance = self.heap.alloc_instance(class);
        if let Some(initializer) = self.heap.find_method(class, "init") {
            let bound = self.bind_method(initializer, instance);
            self.call_function(bound, args, print)?;
        }
        Ok(Value::Instance(instance))
    }

    /// Allocates a user function's runtime representation, closing over
    /// whatever scope is current — the enclosing scope for a plain
    /// declaration, or the `super`/no-`super` method scope `Stmt::Class`
    /// sets up before calling this for each method.
    pub(crate) fn declare_function(&mut self, decl: &FunctionDecl, is_initializer: bool) -> FunctionId {
        self.heap.alloc_function(Rc::new(decl.clone()), self.current, is_initializer)
    }
}
