// ABOUTME: Integration-level parser tests against the public API

use april::ast::{Expr, Stmt};
use april::lexer::Lexer;
use april::parser::parse;

fn parse_ok(src: &str) -> Vec<Stmt> {
    let (program, errors) = parse(Lexer::new(src));
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
    program
}

#[test]
fn if_expression_parses_without_the_legacy_call_hack() {
    let program = parse_ok("if (x) { 1; } else { 2; }");
    match &program[0] {
        Stmt::Expr { expr: Expr::If { else_branch, .. }, .. } => {
            assert!(else_branch.is_some());
        }
        other => panic!("expected an if expression statement, got {other:?}"),
    }
}

#[test]
fn range_for_header_yields_an_implicit_decl_condition() {
    let program = parse_ok("for (x := [1,2,3]) { x; }");
    match &program[0] {
        Stmt::For { decl, step, cond: Some(Expr::ImplicitDecl { .. }), .. } => {
            assert!(decl.is_none());
            assert!(step.is_none());
        }
        other => panic!("expected a range-for statement, got {other:?}"),
    }
}

#[test]
fn classical_for_header_keeps_decl_and_step() {
    let program = parse_ok("for (i := 0; i < 3; i++) { }");
    match &program[0] {
        Stmt::For { decl: Some(_), step: Some(_), .. } => {}
        other => panic!("expected a classical for statement, got {other:?}"),
    }
}

#[test]
fn malformed_for_header_accumulates_an_error() {
    let (_, errors) = parse(Lexer::new("for (i := 0; i < 3) { }"));
    assert!(!errors.is_empty());
}

#[test]
fn function_closure_expression_parses_as_func_typed() {
    let program = parse_ok("var f:func = fn(x:int) int { return x; };");
    match &program[0] {
        Stmt::Var { init: Some(Expr::FunctionClosure { params, .. }), .. } => {
            assert_eq!(params.len(), 1);
        }
        other => panic!("expected a function closure initializer, got {other:?}"),
    }
}
