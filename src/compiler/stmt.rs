use crate::{
    ast::{
        ast::Stmt,
        statements::{IfStmt, ListenStmt, RepeatTimesStmt, RepeatUntilStmt, VomitStmt},
        types::BaseType,
    },
    tam::machine::{Opcode, Primitive, Register},
};

use super::{
    compiler::Encoder,
    expr::{gen_call, gen_element_address, gen_expression},
};

/// Emits the code for one non-declaration statement.
///
/// Declarations are handled by the layout pass of the enclosing block and
/// emit nothing here.
pub fn gen_statement(encoder: &mut Encoder, statement: &Stmt) {
    encoder.position = statement.get_span().start.clone();

    match statement {
        Stmt::VarDecl(_) | Stmt::SubroutineDecl(_) => {}
        Stmt::VarAssignment(assignment) => {
            gen_expression(encoder, &assignment.value);

            let address = encoder.variable_address(&assignment.target);
            let register = encoder.display_register(address.level);
            encoder.emit(Opcode::Store, 1, register, address.displacement);
        }
        Stmt::ArrayAssignment(assignment) => {
            gen_expression(encoder, &assignment.value);
            gen_element_address(encoder, &assignment.target, &assignment.index);
            encoder.emit(Opcode::StoreI, 1, Register::CB, 0);
        }
        Stmt::If(if_stmt) => gen_if(encoder, if_stmt),
        Stmt::RepeatTimes(repeat) => gen_repeat_times(encoder, repeat),
        Stmt::RepeatUntil(repeat) => gen_repeat_until(encoder, repeat),
        Stmt::Vomit(vomit) => gen_vomit(encoder, vomit),
        Stmt::Listen(listen) => gen_listen(encoder, listen),
        Stmt::Call(call) => {
            gen_call(encoder, &call.call);
            // Discard the dummy result word every subroutine returns.
            encoder.emit(Opcode::Pop, 0, Register::CB, 1);
        }
    }
}

fn gen_if(encoder: &mut Encoder, if_stmt: &IfStmt) {
    let mut exits = vec![];

    for branch in std::iter::once(&if_stmt.branch).chain(&if_stmt.else_ifs) {
        gen_expression(encoder, &branch.condition);
        let skip = encoder.emit(Opcode::JumpIf, 0, Register::CB, 0);

        encoder.encode_nested_block(&branch.body);
        exits.push(encoder.emit(Opcode::Jump, 0, Register::CB, 0));

        let next = encoder.next_address();
        encoder.patch(skip, next);
    }

    if let Some(else_body) = &if_stmt.else_body {
        encoder.encode_nested_block(else_body);
    }

    let end = encoder.next_address();
    for exit in exits {
        encoder.patch(exit, end);
    }
}

/// The counter stays on top of the stack while the body runs and is
/// decremented in place until it reaches zero.
fn gen_repeat_times(encoder: &mut Encoder, repeat: &RepeatTimesStmt) {
    gen_expression(encoder, &repeat.count);
    let frame_top = encoder.frame_top;
    encoder.frame_top = frame_top.saturating_add(1);

    let start = encoder.next_address();
    encoder.emit(Opcode::Load, 1, Register::ST, -1);
    encoder.emit(Opcode::LoadL, 0, Register::CB, 0);
    encoder.emit_primitive(Primitive::Gt);
    let exit = encoder.emit(Opcode::JumpIf, 0, Register::CB, 0);

    encoder.encode_nested_block(&repeat.body);

    encoder.emit(Opcode::Load, 1, Register::ST, -1);
    encoder.emit(Opcode::LoadL, 0, Register::CB, 1);
    encoder.emit_primitive(Primitive::Sub);
    encoder.emit(Opcode::Store, 1, Register::ST, -2);
    encoder.emit(Opcode::Jump, 0, Register::CB, start);

    let end = encoder.next_address();
    encoder.patch(exit, end);
    encoder.emit(Opcode::Pop, 0, Register::CB, 1);
    encoder.frame_top = frame_top;
}

fn gen_repeat_until(encoder: &mut Encoder, repeat: &RepeatUntilStmt) {
    let start = encoder.next_address();

    encoder.encode_nested_block(&repeat.body);
    gen_expression(encoder, &repeat.condition);
    encoder.emit(Opcode::JumpIf, 0, Register::CB, start);
}

fn gen_vomit(encoder: &mut Encoder, vomit: &VomitStmt) {
    gen_expression(encoder, &vomit.expression);

    match encoder.model.type_of(vomit.expression.id) {
        Some(BaseType::Char) => encoder.emit_primitive(Primitive::Put),
        _ => encoder.emit_primitive(Primitive::Putint),
    }
    encoder.emit_primitive(Primitive::Puteol);
}

fn gen_listen(encoder: &mut Encoder, listen: &ListenStmt) {
    let address = encoder.variable_address(&listen.target);
    let register = encoder.display_register(address.level);
    encoder.emit(Opcode::LoadA, 0, register, address.displacement);

    let type_ = encoder
        .model
        .resolve(listen.target.id)
        .and_then(|symbol| encoder.model.symbol(symbol).value_type());
    match type_ {
        Some(BaseType::Char) => encoder.emit_primitive(Primitive::Get),
        _ => encoder.emit_primitive(Primitive::Getint),
    }
}
