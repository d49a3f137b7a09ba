//! Indented tree dump of a parsed program, used by `sprout --ast`.

use std::fmt::{self, Display, Write};

use super::{
    ast::{Expr, ExprKind, Program, Stmt},
    statements::BlockStmt,
};

const INDENT: &str = "  ";

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Program")?;
        write_block(f, &self.block, 1)
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::IntLiteral(value) => write!(f, "{}", value),
            ExprKind::BoolLiteral(value) => write!(f, "{}", value),
            ExprKind::CharLiteral(value) => write!(f, "{:?}", value),
            ExprKind::Var(ident) => write!(f, "{}", ident.name),
            ExprKind::ArrayElement(element) => {
                write!(f, "{}[{}]", element.array.name, element.index)
            }
            ExprKind::Call(call) => {
                write!(f, "{}(", call.callee.name)?;
                for (i, argument) in call.arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                write!(f, ")")
            }
            ExprKind::Binary(binary) => {
                write!(f, "({} {} {})", binary.left, binary.operator, binary.right)
            }
            ExprKind::Unary(unary) => write!(f, "({}{})", unary.operator, unary.operand),
        }
    }
}

fn write_block<W: Write>(out: &mut W, block: &BlockStmt, depth: usize) -> fmt::Result {
    for stmt in block.iter() {
        write_stmt(out, stmt, depth)?;
    }
    Ok(())
}

fn write_stmt<W: Write>(out: &mut W, stmt: &Stmt, depth: usize) -> fmt::Result {
    let pad = INDENT.repeat(depth);

    match stmt {
        Stmt::VarDecl(decl) => writeln!(out, "{}Create {} {}", pad, decl.type_, decl.name.name),
        Stmt::SubroutineDecl(decl) => {
            let parameters = decl
                .parameters
                .iter()
                .map(|parameter| format!("{} {}", parameter.type_, parameter.name.name))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(out, "{}Sprout {}({})", pad, decl.name.name, parameters)?;
            write_block(out, &decl.body, depth + 1)
        }
        Stmt::VarAssignment(assignment) => writeln!(
            out,
            "{}Assign {} = {}",
            pad, assignment.target.name, assignment.value
        ),
        Stmt::ArrayAssignment(assignment) => writeln!(
            out,
            "{}Assign {}[{}] = {}",
            pad, assignment.target.name, assignment.index, assignment.value
        ),
        Stmt::If(if_stmt) => {
            writeln!(out, "{}Si {}", pad, if_stmt.branch.condition)?;
            write_block(out, &if_stmt.branch.body, depth + 1)?;
            for branch in &if_stmt.else_ifs {
                writeln!(out, "{}O sino {}", pad, branch.condition)?;
                write_block(out, &branch.body, depth + 1)?;
            }
            if let Some(else_body) = &if_stmt.else_body {
                writeln!(out, "{}Sino", pad)?;
                write_block(out, else_body, depth + 1)?;
            }
            Ok(())
        }
        Stmt::RepeatTimes(repeat) => {
            writeln!(out, "{}Repeat {} times", pad, repeat.count)?;
            write_block(out, &repeat.body, depth + 1)
        }
        Stmt::RepeatUntil(repeat) => {
            writeln!(out, "{}Repeat until {}", pad, repeat.condition)?;
            write_block(out, &repeat.body, depth + 1)
        }
        Stmt::Vomit(vomit) => writeln!(out, "{}Vomit {}", pad, vomit.expression),
        Stmt::Listen(listen) => writeln!(out, "{}ListenCarefully {}", pad, listen.target.name),
        Stmt::Call(call) => {
            let arguments = call
                .call
                .arguments
                .iter()
                .map(|argument| argument.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(out, "{}Bloom {}({})", pad, call.call.callee.name, arguments)
        }
    }
}
