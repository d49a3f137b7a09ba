use tracing::debug;

use crate::{
    ast::{
        ast::{Expr, ExprKind, Ident, Program, Stmt},
        expressions::{BinaryExpr, BinaryOp, CallExpr, UnaryOp},
        statements::{BlockStmt, SubroutineDeclStmt},
        types::{BaseType, TypeSpec},
    },
    errors::{
        diagnostics::{DiagnosticSink, Severity},
        errors::ErrorImpl,
    },
    Position,
};

use super::{
    semantic_model::{SemanticModel, Symbol, SymbolId, SymbolKind},
    symbol_table::SymbolTable,
};

/// Outcome of checking one expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeResult {
    pub type_: Option<BaseType>,
    pub is_lvalue: bool,
}

impl TypeResult {
    pub fn value(type_: BaseType) -> Self {
        TypeResult {
            type_: Some(type_),
            is_lvalue: false,
        }
    }

    /// Neutral result substituted after an error.
    pub fn none() -> Self {
        TypeResult {
            type_: None,
            is_lvalue: false,
        }
    }
}

pub struct TypeChecker<'a> {
    pub table: SymbolTable<SymbolId>,
    pub model: SemanticModel,
    sink: &'a mut dyn DiagnosticSink,
}

impl<'a> TypeChecker<'a> {
    pub fn new(sink: &'a mut dyn DiagnosticSink) -> Self {
        TypeChecker {
            table: SymbolTable::new(),
            model: SemanticModel::default(),
            sink,
        }
    }

    fn report(&mut self, kind: ErrorImpl, position: &Position) {
        self.sink.error(kind, position.clone());
    }

    /// Creates the symbol for a declaration and binds it in the current scope.
    ///
    /// The symbol exists even when the name clashes, so storage can still be
    /// laid out for it.
    pub fn declare(&mut self, name: &Ident, kind: SymbolKind) -> SymbolId {
        let id = self.model.add_symbol(
            name.id,
            Symbol {
                name: name.name.clone(),
                kind,
                span: name.span.clone(),
            },
        );

        if let Err(error) = self.table.enter(&name.name, id, name.span.start.clone()) {
            self.sink.report(Severity::Error, error);
        }
        id
    }

    /// Looks `name` up and records the resolution of this use.
    pub fn resolve(&mut self, name: &Ident) -> Option<(SymbolId, SymbolKind)> {
        let id = *self.table.retrieve(&name.name)?;
        self.model.resolutions.insert(name.id, id);
        Some((id, self.model.symbol(id).kind.clone()))
    }

    fn check_mismatch(
        &mut self,
        context: &str,
        expected: TypeResult,
        received: TypeResult,
        position: &Position,
    ) {
        if let (Some(expected), Some(received)) = (expected.type_, received.type_) {
            if expected != received {
                self.report(
                    ErrorImpl::TypeMismatch {
                        context: context.to_string(),
                        expected: expected.to_string(),
                        received: received.to_string(),
                    },
                    position,
                );
            }
        }
    }
}

pub fn type_check_expr(type_checker: &mut TypeChecker, expr: &Expr) -> TypeResult {
    let result = match &expr.kind {
        ExprKind::IntLiteral(_) => TypeResult::value(BaseType::Int),
        ExprKind::BoolLiteral(_) => TypeResult::value(BaseType::Bool),
        ExprKind::CharLiteral(_) => TypeResult::value(BaseType::Char),
        ExprKind::Var(ident) => type_check_var(type_checker, ident),
        ExprKind::ArrayElement(element) => {
            type_check_array_element(type_checker, &element.array, &element.index)
        }
        ExprKind::Call(call) => type_check_call(type_checker, call, &expr.span.start),
        ExprKind::Binary(binary) => type_check_binary(type_checker, binary, &expr.span.start),
        ExprKind::Unary(unary) => {
            let operand = type_check_expr(type_checker, &unary.operand);
            if unary.operator == UnaryOp::Not {
                type_checker.report(
                    ErrorImpl::DisallowedUnaryOperator {
                        operator: unary.operator.to_string(),
                    },
                    &expr.span.start,
                );
            }

            TypeResult {
                type_: operand.type_,
                is_lvalue: false,
            }
        }
    };

    if let Some(type_) = result.type_ {
        type_checker.model.types.insert(expr.id, type_);
    }
    result
}

fn type_check_var(type_checker: &mut TypeChecker, ident: &Ident) -> TypeResult {
    match type_checker.resolve(ident) {
        Some((_, SymbolKind::Variable(type_))) => TypeResult {
            type_: type_.scalar(),
            is_lvalue: true,
        },
        Some((_, SymbolKind::Parameter(type_))) => TypeResult {
            type_: Some(type_),
            is_lvalue: true,
        },
        Some((_, SymbolKind::Subroutine { .. })) => {
            type_checker.report(
                ErrorImpl::NotAVariable {
                    identifier: ident.name.clone(),
                },
                &ident.span.start,
            );
            TypeResult::none()
        }
        None => {
            type_checker.report(
                ErrorImpl::IdentifierNotDeclared {
                    identifier: ident.name.clone(),
                },
                &ident.span.start,
            );
            TypeResult::none()
        }
    }
}

/// Resolves an indexed array and checks the index. Returns the element type.
fn type_check_indexing(
    type_checker: &mut TypeChecker,
    array: &Ident,
    index: &Expr,
) -> Option<BaseType> {
    let index_type = type_check_expr(type_checker, index);

    let (element, size) = match type_checker.resolve(array) {
        Some((_, SymbolKind::Variable(TypeSpec::Array { element, size }))) => (element, size),
        Some(_) => {
            type_checker.report(
                ErrorImpl::NotAnArray {
                    identifier: array.name.clone(),
                },
                &array.span.start,
            );
            return None;
        }
        None => {
            type_checker.report(
                ErrorImpl::IdentifierNotDeclared {
                    identifier: array.name.clone(),
                },
                &array.span.start,
            );
            return None;
        }
    };

    type_checker.check_mismatch(
        "array index",
        TypeResult::value(BaseType::Int),
        index_type,
        &index.span.start,
    );

    if let ExprKind::IntLiteral(value) = index.kind {
        if value < 0 || value >= size {
            type_checker.report(
                ErrorImpl::IndexOutOfBounds {
                    array: array.name.clone(),
                    index: value,
                    size,
                },
                &index.span.start,
            );
        }
    }

    Some(element)
}

fn type_check_array_element(type_checker: &mut TypeChecker, array: &Ident, index: &Expr) -> TypeResult {
    match type_check_indexing(type_checker, array, index) {
        Some(element) => TypeResult {
            type_: Some(element),
            is_lvalue: true,
        },
        None => TypeResult::none(),
    }
}

fn type_check_call(type_checker: &mut TypeChecker, call: &CallExpr, position: &Position) -> TypeResult {
    let arguments: Vec<TypeResult> = call
        .arguments
        .iter()
        .map(|argument| type_check_expr(type_checker, argument))
        .collect();

    match type_checker.resolve(&call.callee) {
        Some((_, SymbolKind::Subroutine { parameters })) => {
            if parameters.len() != arguments.len() {
                type_checker.report(
                    ErrorImpl::IncorrectArgumentCount {
                        function: call.callee.name.clone(),
                        expected: parameters.len(),
                        received: arguments.len(),
                    },
                    position,
                );
            } else {
                for ((parameter, argument), expr) in
                    parameters.iter().zip(&arguments).zip(&call.arguments)
                {
                    if let Some(received) = argument.type_ {
                        if received != *parameter {
                            type_checker.report(
                                ErrorImpl::ArgumentTypeMismatch {
                                    expected: parameter.to_string(),
                                    received: received.to_string(),
                                },
                                &expr.span.start,
                            );
                        }
                    }
                }
            }
        }
        _ => type_checker.report(
            ErrorImpl::NotAFunction {
                identifier: call.callee.name.clone(),
            },
            &call.callee.span.start,
        ),
    }

    TypeResult::none()
}

fn type_check_binary(type_checker: &mut TypeChecker, binary: &BinaryExpr, position: &Position) -> TypeResult {
    let left = type_check_expr(type_checker, &binary.left);
    let right = type_check_expr(type_checker, &binary.right);

    match binary.operator {
        BinaryOp::Assign => {
            if !left.is_lvalue {
                type_checker.report(ErrorImpl::NotAnLValue, position);
            }
            type_checker.check_mismatch("assignment", left, right, position);

            TypeResult {
                type_: left.type_,
                is_lvalue: false,
            }
        }
        operator if operator.is_comparison() => {
            type_checker.check_mismatch("comparison", left, right, position);
            TypeResult::value(BaseType::Bool)
        }
        operator => {
            type_checker.check_mismatch(
                &format!("operator `{}`", operator),
                left,
                right,
                position,
            );

            TypeResult {
                type_: left.type_,
                is_lvalue: false,
            }
        }
    }
}

/// Assignment target of `x = e;`: scalar variables and parameters only.
fn type_check_scalar_target(type_checker: &mut TypeChecker, target: &Ident) -> TypeResult {
    match type_checker.resolve(target) {
        Some((_, SymbolKind::Variable(TypeSpec::Simple(type_))))
        | Some((_, SymbolKind::Parameter(type_))) => TypeResult {
            type_: Some(type_),
            is_lvalue: true,
        },
        Some(_) => {
            type_checker.report(
                ErrorImpl::NotAVariable {
                    identifier: target.name.clone(),
                },
                &target.span.start,
            );
            TypeResult::none()
        }
        None => {
            type_checker.report(
                ErrorImpl::IdentifierNotDeclared {
                    identifier: target.name.clone(),
                },
                &target.span.start,
            );
            TypeResult::none()
        }
    }
}

pub fn type_check_stmt(type_checker: &mut TypeChecker, stmt: &Stmt) {
    match stmt {
        Stmt::VarDecl(decl) => {
            type_checker.declare(&decl.name, SymbolKind::Variable(decl.type_));
        }
        Stmt::SubroutineDecl(decl) => type_check_subroutine(type_checker, decl),
        Stmt::VarAssignment(assignment) => {
            let target = type_check_scalar_target(type_checker, &assignment.target);
            let value = type_check_expr(type_checker, &assignment.value);
            type_checker.check_mismatch("assignment", target, value, &assignment.span.start);
        }
        Stmt::ArrayAssignment(assignment) => {
            let element = type_check_indexing(type_checker, &assignment.target, &assignment.index);
            let value = type_check_expr(type_checker, &assignment.value);
            let target = TypeResult {
                type_: element,
                is_lvalue: true,
            };
            type_checker.check_mismatch("assignment", target, value, &assignment.span.start);
        }
        Stmt::If(if_stmt) => {
            type_check_expr(type_checker, &if_stmt.branch.condition);
            type_check_scoped_block(type_checker, &if_stmt.branch.body);
            for branch in &if_stmt.else_ifs {
                type_check_expr(type_checker, &branch.condition);
                type_check_scoped_block(type_checker, &branch.body);
            }
            if let Some(else_body) = &if_stmt.else_body {
                type_check_scoped_block(type_checker, else_body);
            }
        }
        Stmt::RepeatTimes(repeat) => {
            type_check_expr(type_checker, &repeat.count);
            type_check_scoped_block(type_checker, &repeat.body);
        }
        Stmt::RepeatUntil(repeat) => {
            type_check_scoped_block(type_checker, &repeat.body);
            type_check_expr(type_checker, &repeat.condition);
        }
        Stmt::Vomit(vomit) => {
            type_check_expr(type_checker, &vomit.expression);
        }
        Stmt::Listen(listen) => {
            type_check_scalar_target(type_checker, &listen.target);
        }
        Stmt::Call(call) => {
            type_check_call(type_checker, &call.call, &call.span.start);
        }
    }
}

fn type_check_subroutine(type_checker: &mut TypeChecker, decl: &SubroutineDeclStmt) {
    let parameters = decl
        .parameters
        .iter()
        .map(|parameter| parameter.type_)
        .collect();
    type_checker.declare(&decl.name, SymbolKind::Subroutine { parameters });

    type_checker.table.open_scope();
    for parameter in &decl.parameters {
        type_checker.declare(&parameter.name, SymbolKind::Parameter(parameter.type_));
    }
    type_check_block(type_checker, &decl.body);
    type_checker.table.close_scope();
}

pub fn type_check_block(type_checker: &mut TypeChecker, block: &BlockStmt) {
    for stmt in block.iter() {
        type_check_stmt(type_checker, stmt);
    }
}

/// Checks a nested block inside its own scope.
pub fn type_check_scoped_block(type_checker: &mut TypeChecker, block: &BlockStmt) {
    type_checker.table.open_scope();
    type_check_block(type_checker, block);
    type_checker.table.close_scope();
}

/// Checks a whole program and returns what the encoder needs to know about it.
///
/// Never aborts: every problem goes to `sink` and checking carries on.
pub fn type_check(program: &Program, sink: &mut dyn DiagnosticSink) -> SemanticModel {
    let mut type_checker = TypeChecker::new(sink);
    type_check_block(&mut type_checker, &program.block);

    debug!(
        symbols = type_checker.model.symbols.len(),
        resolutions = type_checker.model.resolutions.len(),
        "checked program"
    );
    type_checker.model
}
