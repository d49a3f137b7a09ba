//! Unit tests for the symbol table and the checker.

use std::rc::Rc;

use proptest::prelude::*;

use super::{
    semantic_model::{SemanticModel, SymbolKind},
    symbol_table::SymbolTable,
    type_checker::type_check,
};
use crate::{
    ast::types::{BaseType, TypeSpec},
    errors::diagnostics::Diagnostics,
    lexer::lexer::tokenize,
    parser::parser::parse,
    Position,
};

fn position() -> Position {
    Position(0, Rc::new("test.sprout".to_string()))
}

fn check(source: &str) -> (SemanticModel, Diagnostics) {
    let tokens = tokenize(source.to_string(), Some("test.sprout".to_string())).unwrap();
    let (_, program) = parse(tokens, Rc::new("test.sprout".to_string()));
    let program = program.unwrap();

    let mut diagnostics = Diagnostics::new();
    let model = type_check(&program, &mut diagnostics);
    (model, diagnostics)
}

fn error_names(diagnostics: &Diagnostics) -> Vec<String> {
    diagnostics
        .errors()
        .map(|error| error.get_error_name().to_string())
        .collect()
}

// Symbol table

#[test]
fn test_enter_then_retrieve() {
    let mut table = SymbolTable::new();
    table.enter("x", 1, position()).unwrap();

    assert_eq!(table.retrieve("x"), Some(&1));
    assert_eq!(table.retrieve("y"), None);
}

#[test]
fn test_duplicate_in_same_scope_is_rejected() {
    let mut table = SymbolTable::new();
    table.enter("x", 1, position()).unwrap();

    let error = table.enter("x", 2, position()).unwrap_err();
    assert_eq!(error.get_error_name(), "IdentifierAlreadyDeclared");
    assert_eq!(table.retrieve("x"), Some(&1));
    assert_eq!(table.len(), 1);
}

#[test]
fn test_shadowing_and_restore() {
    let mut table = SymbolTable::new();
    table.enter("x", "outer", position()).unwrap();

    table.open_scope();
    table.enter("x", "inner", position()).unwrap();
    assert_eq!(table.retrieve("x"), Some(&"inner"));

    table.close_scope();
    assert_eq!(table.retrieve("x"), Some(&"outer"));
}

#[test]
fn test_close_scope_keeps_enclosing_entries() {
    let mut table = SymbolTable::new();
    table.enter("a", 0, position()).unwrap();
    table.open_scope();
    table.enter("b", 1, position()).unwrap();
    table.open_scope();
    table.enter("c", 2, position()).unwrap();

    table.close_scope();
    assert_eq!(table.retrieve("c"), None);
    assert_eq!(table.retrieve("b"), Some(&1));

    table.close_scope();
    assert_eq!(table.retrieve("b"), None);
    assert_eq!(table.retrieve("a"), Some(&0));
    assert_eq!(table.level(), 0);
}

proptest! {
    #[test]
    fn prop_enter_then_retrieve(name in "[a-z][a-z0-9]{0,7}", declaration in any::<u32>()) {
        let mut table = SymbolTable::new();
        table.enter(&name, declaration, position()).unwrap();
        prop_assert_eq!(table.retrieve(&name), Some(&declaration));
    }

    #[test]
    fn prop_close_scope_removes_exactly_its_entries(
        outer in prop::collection::hash_set("[a-z]{1,4}", 0..8),
        inner in prop::collection::hash_set("[a-z]{1,4}", 0..8),
    ) {
        let mut table = SymbolTable::new();
        for name in &outer {
            table.enter(name, 0, position()).unwrap();
        }

        table.open_scope();
        for name in &inner {
            table.enter(name, 1, position()).unwrap();
        }
        prop_assert_eq!(table.len(), outer.len() + inner.len());

        table.close_scope();
        prop_assert_eq!(table.len(), outer.len());
        for name in &outer {
            prop_assert_eq!(table.retrieve(name), Some(&0));
        }
        for name in inner.difference(&outer) {
            prop_assert_eq!(table.retrieve(name), None);
        }
    }

    /// Whole-table "last match wins" agrees with an innermost-scope-first
    /// search because no entry outlives its scope.
    #[test]
    fn prop_no_entry_deeper_than_current_level(
        operations in prop::collection::vec(0u8..3, 0..40),
    ) {
        let mut table = SymbolTable::new();
        let mut open = 0u32;

        for (step, operation) in operations.into_iter().enumerate() {
            match operation {
                0 => {
                    table.open_scope();
                    open += 1;
                }
                1 if open > 0 => {
                    table.close_scope();
                    open -= 1;
                }
                _ => {
                    let _ = table.enter(&format!("n{}", step % 5), step, position());
                }
            }

            prop_assert_eq!(table.level(), open);
            if let Some(deepest) = table.deepest_entry_level() {
                prop_assert!(deepest <= table.level());
            }
        }
    }
}

// Checker

#[test]
fn test_clean_program_has_no_diagnostics() {
    let (model, diagnostics) = check(
        "create int x; create [char, 3] word; x = 10; word[0] = 'a'; vomit x + 1; vomit word[2];",
    );

    assert_eq!(diagnostics.entries().len(), 0);
    let word = model.find_symbol("word").unwrap();
    assert_eq!(
        model.symbol(word).kind,
        SymbolKind::Variable(TypeSpec::Array {
            element: BaseType::Char,
            size: 3
        })
    );
}

#[test]
fn test_redeclaration_in_same_scope() {
    let (_, diagnostics) = check("create int x; create char x;");

    assert_eq!(error_names(&diagnostics), vec!["IdentifierAlreadyDeclared"]);
}

#[test]
fn test_redeclaration_keeps_first_binding() {
    let (_, diagnostics) = check("create int x; create char x; x = 1;");

    assert_eq!(error_names(&diagnostics), vec!["IdentifierAlreadyDeclared"]);
}

#[test]
fn test_shadowing_in_nested_block() {
    let (_, diagnostics) = check("create int x; si (true) { create char x; x = 'c'; } x = 5;");

    assert!(diagnostics.entries().is_empty());
}

#[test]
fn test_undeclared_identifier() {
    let (_, diagnostics) = check("vomit y;");

    assert_eq!(error_names(&diagnostics), vec!["IdentifierNotDeclared"]);
}

#[test]
fn test_use_before_declaration_is_rejected() {
    let (_, diagnostics) = check("x = 1; create int x;");

    assert_eq!(error_names(&diagnostics), vec!["IdentifierNotDeclared"]);
}

#[test]
fn test_block_locals_are_not_visible_after_the_block() {
    let (_, diagnostics) = check("repeat 2 times { create int tmp; } vomit tmp;");

    assert_eq!(error_names(&diagnostics), vec!["IdentifierNotDeclared"]);
}

#[test]
fn test_assignment_type_mismatch() {
    let (_, diagnostics) = check("create int x; x = 'a';");

    assert_eq!(error_names(&diagnostics), vec!["TypeMismatch"]);
}

#[test]
fn test_binary_operand_mismatch() {
    let (_, diagnostics) = check("create int x; create bool b; vomit x + b;");

    assert_eq!(error_names(&diagnostics), vec!["TypeMismatch"]);
}

#[test]
fn test_comparison_yields_bool() {
    let (_, diagnostics) = check("create bool b; b = 1 < 2; b = 3 == 3;");

    assert!(diagnostics.entries().is_empty());
}

#[test]
fn test_assignment_expression_requires_lvalue() {
    let (_, diagnostics) = check("vomit 3 = 4;");

    assert_eq!(error_names(&diagnostics), vec!["NotAnLValue"]);
}

#[test]
fn test_assignment_expression_to_variable() {
    let (_, diagnostics) = check("create int a; create int b; vomit a = b = 2;");

    assert!(diagnostics.entries().is_empty());
}

#[test]
fn test_not_operator_is_disallowed() {
    let (_, diagnostics) = check("create bool b; vomit !b;");

    assert_eq!(error_names(&diagnostics), vec!["DisallowedUnaryOperator"]);
}

#[test]
fn test_unary_minus_is_allowed() {
    let (model, diagnostics) = check("create int x; vomit -x;");

    assert!(diagnostics.entries().is_empty());
    assert!(model.find_symbol("x").is_some());
}

#[test]
fn test_literal_index_out_of_bounds() {
    let (_, diagnostics) = check("create [int, 10] arr; arr[11] = 5;");

    assert_eq!(error_names(&diagnostics), vec!["IndexOutOfBounds"]);
}

#[test]
fn test_literal_index_bounds_on_read() {
    let (_, diagnostics) = check("create [int, 4] arr; vomit arr[3]; vomit arr[4];");

    assert_eq!(error_names(&diagnostics), vec!["IndexOutOfBounds"]);
}

#[test]
fn test_computed_index_is_not_range_checked() {
    let (_, diagnostics) = check("create [int, 4] arr; create int i; i = 9; arr[i] = 1;");

    assert!(diagnostics.entries().is_empty());
}

#[test]
fn test_index_must_be_int() {
    let (_, diagnostics) = check("create [int, 4] arr; arr['a'] = 1;");

    assert_eq!(error_names(&diagnostics), vec!["TypeMismatch"]);
}

#[test]
fn test_indexing_a_scalar() {
    let (_, diagnostics) = check("create int x; x[0] = 1;");

    assert_eq!(error_names(&diagnostics), vec!["NotAnArray"]);
}

#[test]
fn test_wrong_argument_count() {
    let (_, diagnostics) = check("sprout f(int a, int b) { vomit a; } f(1, 2, 3);");

    assert_eq!(error_names(&diagnostics), vec!["IncorrectArgumentCount"]);
}

#[test]
fn test_argument_type_mismatch() {
    let (_, diagnostics) = check("sprout f(char c) { vomit c; } f(1);");

    assert_eq!(error_names(&diagnostics), vec!["ArgumentTypeMismatch"]);
}

#[test]
fn test_calling_a_variable() {
    let (_, diagnostics) = check("create int x; x(1);");

    assert_eq!(error_names(&diagnostics), vec!["NotAFunction"]);
}

#[test]
fn test_subroutine_is_not_a_variable() {
    let (_, diagnostics) = check("sprout f() { } vomit f;");

    assert_eq!(error_names(&diagnostics), vec!["NotAVariable"]);
}

#[test]
fn test_recursion_resolves() {
    let (_, diagnostics) = check("sprout countdown(int n) { si (n > 0) { countdown(n - 1); } }");

    assert!(diagnostics.entries().is_empty());
}

#[test]
fn test_parameters_are_local_to_subroutine() {
    let (_, diagnostics) = check("sprout f(int a) { vomit a; } vomit a;");

    assert_eq!(error_names(&diagnostics), vec!["IdentifierNotDeclared"]);
}

#[test]
fn test_parameter_and_local_share_a_scope() {
    let (_, diagnostics) = check("sprout f(int a) { create int a; }");

    assert_eq!(error_names(&diagnostics), vec!["IdentifierAlreadyDeclared"]);
}

#[test]
fn test_listen_target_must_be_scalar() {
    let (_, diagnostics) = check("create [int, 2] arr; listenCarefully arr;");

    assert_eq!(error_names(&diagnostics), vec!["NotAVariable"]);
}

#[test]
fn test_uses_resolve_to_their_declarations() {
    let tokens = tokenize(
        "create int x; si (true) { create int x; x = 1; } x = 2;".to_string(),
        None,
    )
    .unwrap();
    let (_, program) = parse(tokens, Rc::new("shell".to_string()));
    let program = program.unwrap();
    let mut diagnostics = Diagnostics::new();
    let model = type_check(&program, &mut diagnostics);

    use crate::ast::ast::Stmt;
    let (outer_decl, inner_decl, inner_use) = match (&program.block.body[0], &program.block.body[1]) {
        (Stmt::VarDecl(outer), Stmt::If(if_stmt)) => match (&if_stmt.branch.body.body[0], &if_stmt.branch.body.body[1]) {
            (Stmt::VarDecl(inner), Stmt::VarAssignment(assignment)) => {
                (outer.name.id, inner.name.id, assignment.target.id)
            }
            other => panic!("unexpected branch body {:?}", other),
        },
        other => panic!("unexpected program {:?}", other),
    };
    let outer_use = match &program.block.body[2] {
        Stmt::VarAssignment(assignment) => assignment.target.id,
        other => panic!("unexpected statement {:?}", other),
    };

    assert_eq!(model.resolve(inner_use), model.declared_symbol(inner_decl));
    assert_eq!(model.resolve(outer_use), model.declared_symbol(outer_decl));
    assert_ne!(model.resolve(inner_use), model.resolve(outer_use));
}

#[test]
fn test_expression_types_are_recorded() {
    let tokens = tokenize("create char c; vomit c;".to_string(), None).unwrap();
    let (_, program) = parse(tokens, Rc::new("shell".to_string()));
    let program = program.unwrap();
    let mut diagnostics = Diagnostics::new();
    let model = type_check(&program, &mut diagnostics);

    use crate::ast::ast::Stmt;
    match &program.block.body[1] {
        Stmt::Vomit(vomit) => assert_eq!(model.type_of(vomit.expression.id), Some(BaseType::Char)),
        other => panic!("unexpected statement {:?}", other),
    }
}
