use std::slice::Iter;

use crate::Span;

use super::{
    ast::{Expr, Ident, Stmt},
    expressions::CallExpr,
    types::{BaseType, TypeSpec},
};

#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl BlockStmt {
    pub fn iter(&self) -> Iter<'_, Stmt> {
        self.body.iter()
    }
}

/// `create <type> <name>;`
#[derive(Debug, Clone)]
pub struct VarDeclStmt {
    pub name: Ident,
    pub type_: TypeSpec,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: Ident,
    pub type_: BaseType,
    pub span: Span,
}

/// `sprout <name>(<params>) { ... }`
#[derive(Debug, Clone)]
pub struct SubroutineDeclStmt {
    pub name: Ident,
    pub parameters: Vec<Parameter>,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct VarAssignmentStmt {
    pub target: Ident,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ArrayAssignmentStmt {
    pub target: Ident,
    pub index: Expr,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ConditionalBranch {
    pub condition: Expr,
    pub body: BlockStmt,
}

/// `si (...) { } o sino (...) { } sino { }`
#[derive(Debug, Clone)]
pub struct IfStmt {
    pub branch: ConditionalBranch,
    pub else_ifs: Vec<ConditionalBranch>,
    pub else_body: Option<BlockStmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct RepeatTimesStmt {
    pub count: Expr,
    pub body: BlockStmt,
    pub span: Span,
}

/// Post-tested: the body always runs at least once.
#[derive(Debug, Clone)]
pub struct RepeatUntilStmt {
    pub body: BlockStmt,
    pub condition: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct VomitStmt {
    pub expression: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ListenStmt {
    pub target: Ident,
    pub span: Span,
}

/// A call whose result is discarded.
#[derive(Debug, Clone)]
pub struct CallStmt {
    pub call: CallExpr,
    pub span: Span,
}
