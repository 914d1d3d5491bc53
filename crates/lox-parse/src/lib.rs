//! Recursive-descent parser turning a Lox token stream into statements.
//!
//! Parsing never aborts on the first bad declaration: like the lexer's
//! `LexError`, a `ParseError` shares its shape with every other phase via
//! `lox_util::SourceError`, but unlike lexing, the parser synchronizes
//! past the error and keeps going so a single run can surface more than
//! one syntax mistake.

pub mod ast;
mod error;
mod parser;

pub use error::ParseError;
pub use parser::parse;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, LiteralValueOrString, Stmt};
    use lox_lex::tokenize;

    fn parse_source(source: &str) -> (Vec<Stmt>, Vec<ParseError>) {
        let tokens = tokenize(source).expect("test sources are always lexable");
        parse(tokens)
    }

    #[test]
    fn parses_arithmetic_precedence() {
        let (stmts, errors) = parse_source("print 1 + 2 * 3;");
        assert!(errors.is_empty());
        match &stmts[0] {
            Stmt::Print(Expr::Binary { operator, .. }) => assert_eq!(operator.lexeme, "+"),
            other => panic!("expected a binary print expression, got {other:?}"),
        }
    }

    #[test]
    fn compound_assignment_rewrites_to_binary_add() {
        let (stmts, errors) = parse_source("x += 1;");
        assert!(errors.is_empty());
        match &stmts[0] {
            Stmt::Expression(Expr::Assign { value, .. }) => match value.as_ref() {
                Expr::Binary { operator, .. } => assert_eq!(operator.lexeme, "+"),
                other => panic!("expected rewritten binary, got {other:?}"),
            },
            other => panic!("expected an assignment expression statement, got {other:?}"),
        }
    }

    #[test]
    fn compound_assignment_on_field_is_rejected() {
        let (_, errors) = parse_source("obj.field += 1;");
        assert!(!errors.is_empty());
    }

    #[test]
    fn invalid_assignment_target_is_reported_without_aborting_parse() {
        let (stmts, errors) = parse_source("1 + 2 = 3; print 4;");
        assert_eq!(errors.len(), 1);
        assert_eq!(stmts.len(), 1);
        matches!(&stmts[0], Stmt::Print(_));
    }

    #[test]
    fn for_loop_desugars_increment_outside_body() {
        let (stmts, errors) = parse_source("for (var i=0;i<3;i=i+1) print i;");
        assert!(errors.is_empty());
        let Stmt::Block(block) = &stmts[0] else { panic!("expected desugared block") };
        assert!(matches!(block[0], Stmt::Var { .. }));
        match &block[1] {
            Stmt::While { increment, .. } => assert!(increment.is_some()),
            other => panic!("expected a while statement, got {other:?}"),
        }
    }

    #[test]
    fn array_literal_parses_elements() {
        let (stmts, errors) = parse_source("var xs = [1, 2, 3];");
        assert!(errors.is_empty());
        match &stmts[0] {
            Stmt::Var { init: Some(Expr::Array { elements, .. }), .. } => {
                assert_eq!(elements.len(), 3)
            }
            other => panic!("expected an array literal initializer, got {other:?}"),
        }
    }

    #[test]
    fn class_with_superclass_and_methods() {
        let (stmts, errors) = parse_source("class A < B { greet() { print 1; } }");
        assert!(errors.is_empty());
        match &stmts[0] {
            Stmt::Class { superclass, methods, .. } => {
                assert!(superclass.is_some());
                assert_eq!(methods.len(), 1);
            }
            other => panic!("expected a class declaration, got {other:?}"),
        }
    }

    #[test]
    fn parameter_cap_is_enforced() {
        let params = (0..300).map(|i| format!("p{i}")).collect::<Vec<_>>().join(", ");
        let source = format!("fun f({params}) {{}}");
        let (_, errors) = parse_source(&source);
        assert!(!errors.is_empty());
    }

    #[test]
    fn synchronization_recovers_after_error_in_block() {
        let (stmts, errors) = parse_source("{ 1 + ; print 1; }");
        assert_eq!(errors.len(), 1);
        let Stmt::Block(block) = &stmts[0] else { panic!("expected a block") };
        assert!(!block.is_empty());
    }

    #[test]
    fn string_literal_carries_its_value() {
        let (stmts, _) = parse_source(r#"print "hi";"#);
        match &stmts[0] {
            Stmt::Print(Expr::Literal { value: LiteralValueOrString::String(s), .. }) => {
                assert_eq!(s, "hi")
            }
            other => panic!("expected a string literal, got {other:?}"),
        }
    }
}
