use crate::{
    ast::{
        ast::{Expr, ExprKind, Ident},
        expressions::{BinaryExpr, BinaryOp, CallExpr, UnaryOp},
    },
    tam::machine::{Opcode, Primitive, Register, FALSE_REP, TRUE_REP},
};

use super::compiler::Encoder;

/// Emits code that leaves the value of `expr` on top of the stack.
pub fn gen_expression(encoder: &mut Encoder, expr: &Expr) {
    encoder.position = expr.span.start.clone();

    match &expr.kind {
        ExprKind::IntLiteral(value) => {
            encoder.emit(Opcode::LoadL, 0, Register::CB, *value);
        }
        ExprKind::BoolLiteral(value) => {
            let value = if *value { TRUE_REP } else { FALSE_REP };
            encoder.emit(Opcode::LoadL, 0, Register::CB, value);
        }
        ExprKind::CharLiteral(value) => {
            encoder.emit(Opcode::LoadL, 0, Register::CB, *value as i32);
        }
        ExprKind::Var(ident) => {
            let address = encoder.variable_address(ident);
            let register = encoder.display_register(address.level);
            encoder.emit(Opcode::Load, 1, register, address.displacement);
        }
        ExprKind::ArrayElement(element) => {
            gen_element_address(encoder, &element.array, &element.index);
            encoder.emit(Opcode::LoadI, 1, Register::CB, 0);
        }
        ExprKind::Call(call) => gen_call(encoder, call),
        ExprKind::Binary(binary) if binary.operator == BinaryOp::Assign => {
            gen_assignment(encoder, binary)
        }
        ExprKind::Binary(binary) => {
            gen_expression(encoder, &binary.left);
            gen_expression(encoder, &binary.right);
            gen_operator(encoder, binary.operator);
        }
        ExprKind::Unary(unary) => {
            gen_expression(encoder, &unary.operand);
            match unary.operator {
                UnaryOp::Plus => {}
                UnaryOp::Minus => encoder.emit_primitive(Primitive::Neg),
                UnaryOp::Not => encoder.emit_primitive(Primitive::Not),
            }
        }
    }
}

fn gen_operator(encoder: &mut Encoder, operator: BinaryOp) {
    let primitive = match operator {
        BinaryOp::Plus => Primitive::Add,
        BinaryOp::Minus => Primitive::Sub,
        BinaryOp::Multiply => Primitive::Mult,
        BinaryOp::Divide => Primitive::Div,
        BinaryOp::Less => Primitive::Lt,
        BinaryOp::Greater => Primitive::Gt,
        BinaryOp::And => Primitive::And,
        BinaryOp::Or => Primitive::Or,
        BinaryOp::Equals | BinaryOp::NotEquals => {
            // eq and ne take the operand size as an extra argument
            encoder.emit(Opcode::LoadL, 0, Register::CB, 1);
            if operator == BinaryOp::Equals {
                Primitive::Eq
            } else {
                Primitive::Ne
            }
        }
        BinaryOp::Assign => return,
    };

    encoder.emit_primitive(primitive);
}

/// `target = value` as an expression: stores the value and leaves a copy
/// of it on the stack.
fn gen_assignment(encoder: &mut Encoder, assignment: &BinaryExpr) {
    gen_expression(encoder, &assignment.right);

    match &assignment.left.kind {
        ExprKind::Var(ident) => {
            encoder.emit(Opcode::Load, 1, Register::ST, -1);

            let address = encoder.variable_address(ident);
            let register = encoder.display_register(address.level);
            encoder.emit(Opcode::Store, 1, register, address.displacement);
        }
        ExprKind::ArrayElement(element) => {
            encoder.emit(Opcode::Load, 1, Register::ST, -1);

            gen_element_address(encoder, &element.array, &element.index);
            encoder.emit(Opcode::StoreI, 1, Register::CB, 0);
        }
        // Not assignable; the value alone is the result.
        _ => {}
    }
}

/// Pushes the address of `array[index]`.
pub fn gen_element_address(encoder: &mut Encoder, array: &Ident, index: &Expr) {
    let address = encoder.variable_address(array);
    let register = encoder.display_register(address.level);
    encoder.emit(Opcode::LoadA, 0, register, address.displacement);

    gen_expression(encoder, index);
    encoder.emit_primitive(Primitive::Add);
}

/// Pushes the arguments left to right and calls the subroutine through the
/// static link of the level it was declared at.
pub fn gen_call(encoder: &mut Encoder, call: &CallExpr) {
    for argument in &call.arguments {
        gen_expression(encoder, argument);
    }

    let entry = encoder.routine_address(&call.callee);
    let link = encoder.display_register(entry.level);
    encoder.emit(Opcode::Call, link as i32, Register::CB, entry.displacement);
}
