//! A static resolver pass that walks the parsed AST before any evaluation
//! happens and records, for every variable, `this`, and `super` reference,
//! how many enclosing scopes to walk out to find its binding. The
//! evaluator then looks those up by exact distance
//! (`Environment::get_at`/`assign_at`) instead of rediscovering them by
//! dynamically walking the chain every time, which is what makes a
//! closure's free variables always resolve against its *declaration* site
//! rather than wherever it happens to be called from.
//!
//! The scope stack here is a plain `Vec` rather than a tree, since this
//! resolver only ever needs its current chain, never random access into
//! sibling scopes.

use lox_parse::ast::{Expr, FunctionDecl, NodeId, Stmt};
use lox_util::{FxHashMap, Span};

pub type ResolveError = lox_util::SourceError;

#[derive(Clone, Copy, PartialEq, Eq)]
enum FunctionKind {
    None,
    Function,
    Method,
    Initializer,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ClassKind {
    None,
    Class,
    Subclass,
}

struct Resolver {
    /// Innermost scope last. The global scope is never pushed here — an
    /// unresolved name falls through to `globals` at evaluation time.
    scopes: Vec<FxHashMap<String, bool>>,
    locals: FxHashMap<NodeId, u32>,
    errors: Vec<ResolveError>,
    current_function: FunctionKind,
    current_class: ClassKind,
    loop_depth: u32,
}

/// Resolves a whole program, returning the `locals` side table and every
/// scoping error found. Errors are collected rather than aborting at the
/// first one, matching the parser's synchronize-and-keep-going policy.
pub fn resolve(statements: &[Stmt]) -> (FxHashMap<NodeId, u32>, Vec<ResolveError>) {
    let mut resolver = Resolver {
        scopes: Vec::new(),
        locals: FxHashMap::default(),
        errors: Vec::new(),
        current_function: FunctionKind::None,
        current_class: ClassKind::None,
        loop_depth: 0,
    };
    resolver.resolve_stmts(statements);
    (resolver.locals, resolver.errors)
}

impl Resolver {
    fn push_scope(&mut self) {
        log::trace!("resolver: entering scope (depth {})", self.scopes.len() + 1);
        self.scopes.push(FxHashMap::default());
    }

    fn pop_scope(&mut self) {
        log::trace!("resolver: leaving scope (depth {})", self.scopes.len());
        self.scopes.pop();
    }

    fn declare(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), false);
        }
    }

    fn define(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), true);
        }
    }

    fn resolve_local(&mut self, id: NodeId, name: &str) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(name) {
                self.locals.insert(id, depth as u32);
                return;
            }
        }
        // Not found in any tracked scope: resolves against `globals` at
        // evaluation time instead.
    }

    fn resolve_stmts(&mut self, statements: &[Stmt]) {
        for stmt in statements {
            self.resolve_stmt(stmt);
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression(expr) | Stmt::Print(expr) => self.resolve_expr(expr),
            Stmt::Var { name, init } => {
                self.declare(&name.lexeme);
                if let Some(init) = init {
                    self.resolve_expr(init);
                }
                self.define(&name.lexeme);
            }
            Stmt::Block(stmts) => {
                self.push_scope();
                self.resolve_stmts(stmts);
                self.pop_scope();
            }
            Stmt::If { condition, then_branch, else_branch } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch);
                }
            }
            Stmt::While { condition, body, increment } => {
                self.resolve_expr(condition);
                self.loop_depth += 1;
                self.resolve_stmt(body);
                self.loop_depth -= 1;
                if let Some(increment) = increment {
                    self.resolve_expr(increment);
                }
            }
            Stmt::Function(decl) => {
                self.declare(&decl.name.lexeme);
                self.define(&decl.name.lexeme);
                self.resolve_function(decl, FunctionKind::Function);
            }
            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionKind::None {
                    self.error(keyword.line, "Can't return from top-level code.");
                }
                if let Some(value) = value {
                    if self.current_function == FunctionKind::Initializer {
                        self.error(keyword.line, "Can't return a value from an initializer.");
                    }
                    self.resolve_expr(value);
                }
            }
            Stmt::Class { name, superclass, methods } => self.resolve_class(name, superclass, methods),
            Stmt::Break { keyword } => {
                if self.loop_depth == 0 {
                    self.error(keyword.line, "Can't break outside of a loop.");
                }
            }
            Stmt::Continue { keyword } => {
                if self.loop_depth == 0 {
                    self.error(keyword.line, "Can't continue outside of a loop.");
                }
            }
        }
    }

    fn resolve_class(&mut self, name: &lox_lex::Token, superclass: &Option<Expr>, methods: &[FunctionDecl]) {
        let enclosing_class = self.current_class;
        self.current_class = if superclass.is_some() { ClassKind::Subclass } else { ClassKind::Class };

        self.declare(&name.lexeme);
        self.define(&name.lexeme);

        if let Some(superclass_expr) = superclass {
            self.resolve_expr(superclass_expr);
            self.push_scope();
            self.define("super");
        }

        self.push_scope();
        self.define("this");

        for method in methods {
            let kind =
                if method.name.lexeme == "init" { FunctionKind::Initializer } else { FunctionKind::Method };
            self.resolve_function(method, kind);
        }

        self.pop_scope();
        if superclass.is_some() {
            self.pop_scope();
        }

        self.current_class = enclosing_class;
    }

    fn resolve_function(&mut self, decl: &FunctionDecl, kind: FunctionKind) {
        let enclosing_function = self.current_function;
        self.current_function = kind;
        // A loop enclosing this declaration does not make `break`/`continue`
        // inside the function body valid: calling the function later cannot
        // unwind a loop frame that may no longer even be on the stack.
        let enclosing_loop_depth = self.loop_depth;
        self.loop_depth = 0;

        self.push_scope();
        for param in &decl.params {
            self.declare(&param.lexeme);
            self.define(&param.lexeme);
        }
        self.resolve_stmts(&decl.body);
        self.pop_scope();

        self.loop_depth = enclosing_loop_depth;
        self.current_function = enclosing_function;
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal { .. } => {}
            Expr::Variable { id, name } => {
                if let Some(scope) = self.scopes.last() {
                    if scope.get(&name.lexeme) == Some(&false) {
                        self.error(name.line, "Can't read local variable in its own initializer.");
                    }
                }
                self.resolve_local(*id, &name.lexeme);
            }
            Expr::Assign { id, name, value } => {
                self.resolve_expr(value);
                self.resolve_local(*id, &name.lexeme);
            }
            Expr::Unary { right, .. } => self.resolve_expr(right),
            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            Expr::Grouping { expr, .. } => self.resolve_expr(expr),
            Expr::Call { callee, args, .. } => {
                self.resolve_expr(callee);
                for arg in args {
                    self.resolve_expr(arg);
                }
            }
            Expr::Get { object, .. } => self.resolve_expr(object),
            Expr::Set { object, value, .. } => {
                self.resolve_expr(value);
                self.resolve_expr(object);
            }
            Expr::This { id, keyword } => {
                if self.current_class == ClassKind::None {
                    self.error(keyword.line, "Can't use 'this' outside of a class.");
                }
                self.resolve_local(*id, "this");
            }
            Expr::Super { id, keyword, .. } => {
                match self.current_class {
                    ClassKind::None => self.error(keyword.line, "Can't use 'super' outside of a class."),
                    ClassKind::Class => {
                        self.error(keyword.line, "Can't use 'super' in a class with no superclass.")
                    }
                    ClassKind::Subclass => {}
                }
                self.resolve_local(*id, "super");
            }
            Expr::Array { elements, .. } => {
                for element in elements {
                    self.resolve_expr(element);
                }
            }
            Expr::Index { object, index, .. } => {
                self.resolve_expr(object);
                self.resolve_expr(index);
            }
            Expr::IndexSet { object, index, value, .. } => {
                self.resolve_expr(object);
                self.resolve_expr(index);
                self.resolve_expr(value);
            }
        }
    }

    fn error(&mut self, line: u32, message: &str) {
        self.errors.push(ResolveError::new(Span::new(line), message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lox_lex::tokenize;
    use lox_parse::parse;

    fn resolve_source(source: &str) -> (FxHashMap<NodeId, u32>, Vec<ResolveError>) {
        let tokens = tokenize(source).unwrap();
        let (stmts, parse_errors) = parse(tokens);
        assert!(parse_errors.is_empty());
        resolve(&stmts)
    }

    #[test]
    fn return_outside_function_is_an_error() {
        let (_, errors) = resolve_source("return 1;");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn this_outside_class_is_an_error() {
        let (_, errors) = resolve_source("print this;");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn super_without_superclass_is_an_error() {
        let (_, errors) = resolve_source("class A { m() { super.m(); } }");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn break_and_continue_outside_loop_are_errors() {
        let (_, errors) = resolve_source("break;");
        assert_eq!(errors.len(), 1);
        let (_, errors) = resolve_source("continue;");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn break_inside_nested_function_in_a_loop_is_still_an_error() {
        let (_, errors) = resolve_source("while (true) { fun f() { break; } }");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn closure_over_block_local_resolves_to_declaration_depth() {
        let (locals, errors) = resolve_source(
            r#"var a = "global"; { fun show(){print a;} var a = "block"; show(); }"#,
        );
        assert!(errors.is_empty());
        assert!(locals.is_empty(), "`a` in `show` resolves to globals, not the block local");
    }

    #[test]
    fn reading_variable_in_its_own_initializer_is_an_error() {
        let (_, errors) = resolve_source("{ var a = a; }");
        assert_eq!(errors.len(), 1);
    }
}
