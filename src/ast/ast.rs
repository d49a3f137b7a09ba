use std::fmt::Display;

use crate::Span;

use super::{
    expressions::{ArrayElementExpr, BinaryExpr, CallExpr, UnaryExpr},
    statements::{
        ArrayAssignmentStmt, BlockStmt, CallStmt, IfStmt, ListenStmt, RepeatTimesStmt,
        RepeatUntilStmt, SubroutineDeclStmt, VarAssignmentStmt, VarDeclStmt, VomitStmt,
    },
};

/// Stable identity of an identifier occurrence or expression node.
///
/// Assigned by the parser, never reused within one parse. The checker and
/// the encoder key their side tables on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Root of a parsed source file.
#[derive(Debug, Clone)]
pub struct Program {
    pub block: BlockStmt,
}

/// A name as written in the source, either declaring or using a symbol.
#[derive(Debug, Clone)]
pub struct Ident {
    pub id: NodeId,
    pub name: String,
    pub span: Span,
}

/// Statement
///
/// Closed set of statement kinds; every pass matches on it exhaustively.
#[derive(Debug, Clone)]
pub enum Stmt {
    VarDecl(VarDeclStmt),
    SubroutineDecl(SubroutineDeclStmt),
    VarAssignment(VarAssignmentStmt),
    ArrayAssignment(ArrayAssignmentStmt),
    If(IfStmt),
    RepeatTimes(RepeatTimesStmt),
    RepeatUntil(RepeatUntilStmt),
    Vomit(VomitStmt),
    Listen(ListenStmt),
    Call(CallStmt),
}

impl Stmt {
    /// Declarations get storage in the layout pass; everything else is code.
    pub fn is_declaration(&self) -> bool {
        matches!(self, Stmt::VarDecl(_) | Stmt::SubroutineDecl(_))
    }

    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::VarDecl(stmt) => &stmt.span,
            Stmt::SubroutineDecl(stmt) => &stmt.span,
            Stmt::VarAssignment(stmt) => &stmt.span,
            Stmt::ArrayAssignment(stmt) => &stmt.span,
            Stmt::If(stmt) => &stmt.span,
            Stmt::RepeatTimes(stmt) => &stmt.span,
            Stmt::RepeatUntil(stmt) => &stmt.span,
            Stmt::Vomit(stmt) => &stmt.span,
            Stmt::Listen(stmt) => &stmt.span,
            Stmt::Call(stmt) => &stmt.span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
    pub span: Span,
}

/// Expression kinds
#[derive(Debug, Clone)]
pub enum ExprKind {
    IntLiteral(i32),
    BoolLiteral(bool),
    CharLiteral(char),
    Var(Ident),
    ArrayElement(ArrayElementExpr),
    Call(CallExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
}
