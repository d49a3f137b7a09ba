//! Unit tests for the parser module.
//!
//! This module contains tests for parsing the language constructs including:
//! - Variable and array declarations
//! - Subroutine declarations and calls
//! - Expressions and precedence
//! - Control flow statements
//! - Syntax errors

use std::collections::HashSet;
use std::rc::Rc;

use super::parser::parse;
use crate::ast::ast::{Expr, ExprKind, Program, Stmt};
use crate::ast::expressions::{BinaryOp, UnaryOp};
use crate::ast::types::{BaseType, TypeSpec};
use crate::errors::errors::Error;
use crate::lexer::lexer::tokenize;

fn parse_source(source: &str) -> Result<Program, Error> {
    let tokens = tokenize(source.to_string(), Some("test.sprout".to_string())).unwrap();
    let (_, result) = parse(tokens, Rc::new("test.sprout".to_string()));
    result
}

fn single_vomit_expr(source: &str) -> Expr {
    let program = parse_source(source).unwrap();
    match &program.block.body[0] {
        Stmt::Vomit(vomit) => vomit.expression.clone(),
        other => panic!("expected vomit, found {:?}", other),
    }
}

#[test]
fn test_parse_variable_declaration() {
    let program = parse_source("create int x;").unwrap();

    match &program.block.body[0] {
        Stmt::VarDecl(decl) => {
            assert_eq!(decl.name.name, "x");
            assert_eq!(decl.type_, TypeSpec::Simple(BaseType::Int));
        }
        other => panic!("expected declaration, found {:?}", other),
    }
}

#[test]
fn test_parse_array_declaration() {
    let program = parse_source("create [char, 10] letters;").unwrap();

    match &program.block.body[0] {
        Stmt::VarDecl(decl) => assert_eq!(
            decl.type_,
            TypeSpec::Array {
                element: BaseType::Char,
                size: 10
            }
        ),
        other => panic!("expected declaration, found {:?}", other),
    }
}

#[test]
fn test_parse_subroutine_declaration() {
    let program = parse_source("sprout add(int a, int b) { vomit a + b; }").unwrap();

    match &program.block.body[0] {
        Stmt::SubroutineDecl(decl) => {
            assert_eq!(decl.name.name, "add");
            assert_eq!(decl.parameters.len(), 2);
            assert_eq!(decl.parameters[1].name.name, "b");
            assert_eq!(decl.parameters[1].type_, BaseType::Int);
            assert_eq!(decl.body.body.len(), 1);
        }
        other => panic!("expected subroutine, found {:?}", other),
    }
}

#[test]
fn test_parse_calls() {
    let program = parse_source("bloom f(1, 2); g();").unwrap();

    match (&program.block.body[0], &program.block.body[1]) {
        (Stmt::Call(first), Stmt::Call(second)) => {
            assert_eq!(first.call.callee.name, "f");
            assert_eq!(first.call.arguments.len(), 2);
            assert_eq!(second.call.callee.name, "g");
            assert!(second.call.arguments.is_empty());
        }
        other => panic!("expected two calls, found {:?}", other),
    }
}

#[test]
fn test_parse_if_chain() {
    let source = "si (x < 1) { vomit 1; } o sino (x < 2) { vomit 2; } o sino (x < 3) { vomit 3; } sino { vomit 4; }";
    let program = parse_source(source).unwrap();

    match &program.block.body[0] {
        Stmt::If(if_stmt) => {
            assert_eq!(if_stmt.else_ifs.len(), 2);
            assert!(if_stmt.else_body.is_some());
        }
        other => panic!("expected if, found {:?}", other),
    }
}

#[test]
fn test_parse_repeat_loops() {
    let program = parse_source("repeat 3 times { vomit 1; } repeat until (x > 2) { x = x + 1; }").unwrap();

    assert!(matches!(program.block.body[0], Stmt::RepeatTimes(_)));
    assert!(matches!(program.block.body[1], Stmt::RepeatUntil(_)));
}

#[test]
fn test_parse_assignments_and_io() {
    let program = parse_source("x = 1; arr[2] = x; listenCarefully x;").unwrap();

    assert!(matches!(program.block.body[0], Stmt::VarAssignment(_)));
    assert!(matches!(program.block.body[1], Stmt::ArrayAssignment(_)));
    assert!(matches!(program.block.body[2], Stmt::Listen(_)));
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let expr = single_vomit_expr("vomit 1 + 2 * 3;");

    match expr.kind {
        ExprKind::Binary(binary) => {
            assert_eq!(binary.operator, BinaryOp::Plus);
            assert!(matches!(
                binary.right.kind,
                ExprKind::Binary(ref inner) if inner.operator == BinaryOp::Multiply
            ));
        }
        other => panic!("expected binary, found {:?}", other),
    }
}

#[test]
fn test_and_binds_tighter_than_or() {
    let expr = single_vomit_expr("vomit a || b && c;");

    match expr.kind {
        ExprKind::Binary(binary) => {
            assert_eq!(binary.operator, BinaryOp::Or);
            assert!(matches!(
                binary.right.kind,
                ExprKind::Binary(ref inner) if inner.operator == BinaryOp::And
            ));
        }
        other => panic!("expected binary, found {:?}", other),
    }
}

#[test]
fn test_unary_binds_tighter_than_binary() {
    let expr = single_vomit_expr("vomit -a + b;");

    match expr.kind {
        ExprKind::Binary(binary) => {
            assert_eq!(binary.operator, BinaryOp::Plus);
            assert!(matches!(
                binary.left.kind,
                ExprKind::Unary(ref inner) if inner.operator == UnaryOp::Minus
            ));
        }
        other => panic!("expected binary, found {:?}", other),
    }
}

#[test]
fn test_assignment_is_right_associative() {
    let expr = single_vomit_expr("vomit a = b = 3;");

    match expr.kind {
        ExprKind::Binary(binary) => {
            assert_eq!(binary.operator, BinaryOp::Assign);
            assert!(matches!(binary.left.kind, ExprKind::Var(_)));
            assert!(matches!(
                binary.right.kind,
                ExprKind::Binary(ref inner) if inner.operator == BinaryOp::Assign
            ));
        }
        other => panic!("expected binary, found {:?}", other),
    }
}

#[test]
fn test_index_and_call_expressions() {
    let expr = single_vomit_expr("vomit arr[i + 1] + f(2);");

    match expr.kind {
        ExprKind::Binary(binary) => {
            assert!(matches!(binary.left.kind, ExprKind::ArrayElement(_)));
            assert!(matches!(binary.right.kind, ExprKind::Call(_)));
        }
        other => panic!("expected binary, found {:?}", other),
    }
}

#[test]
fn test_literals() {
    assert!(matches!(single_vomit_expr("vomit 'z';").kind, ExprKind::CharLiteral('z')));
    assert!(matches!(single_vomit_expr("vomit true;").kind, ExprKind::BoolLiteral(true)));
    assert!(matches!(single_vomit_expr("vomit (7);").kind, ExprKind::IntLiteral(7)));
}

#[test]
fn test_node_ids_are_unique() {
    let program = parse_source("create int x; x = x + 1; vomit f(x, x);").unwrap();

    let mut ids = HashSet::new();
    fn collect(expr: &Expr, ids: &mut HashSet<u32>) {
        assert!(ids.insert(expr.id.0));
        match &expr.kind {
            ExprKind::Var(ident) => assert!(ids.insert(ident.id.0)),
            ExprKind::Binary(binary) => {
                collect(&binary.left, ids);
                collect(&binary.right, ids);
            }
            ExprKind::Call(call) => {
                assert!(ids.insert(call.callee.id.0));
                for argument in &call.arguments {
                    collect(argument, ids);
                }
            }
            _ => {}
        }
    }

    for stmt in program.block.iter() {
        match stmt {
            Stmt::VarDecl(decl) => assert!(ids.insert(decl.name.id.0)),
            Stmt::VarAssignment(assignment) => {
                assert!(ids.insert(assignment.target.id.0));
                collect(&assignment.value, &mut ids);
            }
            Stmt::Vomit(vomit) => collect(&vomit.expression, &mut ids),
            _ => {}
        }
    }

    assert_eq!(ids.len(), 12);
}

#[test]
fn test_missing_semicolon() {
    let error = parse_source("create int x").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedToken");
}

#[test]
fn test_only_names_can_be_called() {
    let error = parse_source("vomit (1)(2);").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_statement_must_start_with_keyword_or_name() {
    let error = parse_source("5;").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_unclosed_block() {
    let error = parse_source("si (x) { vomit x;").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_number_too_large() {
    let error = parse_source("vomit 99999999999;").unwrap_err();
    assert_eq!(error.get_error_name(), "NumberParseError");
}

#[test]
fn test_ast_dump_is_indented_by_nesting() {
    let source = "
        create [int, 3] arr;
        sprout f(int a, char c) { vomit a; }
        si (x < 1) { x = -x; } o sino (x > 1) { bloom f(arr[x + 1], 'q'); } sino { vomit f(1, 'z') + 2; }
    ";
    let program = parse_source(source).unwrap();

    let expected = concat!(
        "Program\n",
        "  Create [int, 3] arr\n",
        "  Sprout f(int a, char c)\n",
        "    Vomit a\n",
        "  Si (x < 1)\n",
        "    Assign x = (-x)\n",
        "  O sino (x > 1)\n",
        "    Bloom f(arr[(x + 1)], 'q')\n",
        "  Sino\n",
        "    Vomit (f(1, 'z') + 2)\n",
    );
    assert_eq!(program.to_string(), expected);
}

#[test]
fn test_ast_dump_of_loops_and_io() {
    let program =
        parse_source("repeat 2 times { listenCarefully x; } repeat until (x == 0) { arr[0] = x; }")
            .unwrap();

    assert_eq!(
        program.to_string(),
        "Program\n  Repeat 2 times\n    ListenCarefully x\n  Repeat until (x == 0)\n    Assign arr[0] = x\n"
    );
}
