use crate::{
    ast::{
        ast::{Expr, Stmt},
        expressions::CallExpr,
        statements::{
            ArrayAssignmentStmt, BlockStmt, CallStmt, ConditionalBranch, IfStmt, ListenStmt,
            Parameter, RepeatTimesStmt, RepeatUntilStmt, SubroutineDeclStmt, VarAssignmentStmt,
            VarDeclStmt, VomitStmt,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::{
        expr::{parse_arguments, parse_expr},
        lookups::BindingPower,
    },
    Span,
};

use super::{
    parser::Parser,
    types::{parse_base_type, parse_type},
};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    match parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        Some(handler) => handler(parser),
        None => Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("expected the start of a statement"),
            },
            parser.get_position(),
        )),
    }
}

pub fn parse_block(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let error = parser.unexpected("expected `{` to open a block");
    let start = parser.expect_error(TokenKind::OpenCurly, Some(error))?.span.start;

    let mut body = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.unexpected("expected `}` to close the block"));
        }
        body.push(parse_stmt(parser)?);
    }
    parser.expect(TokenKind::CloseCurly)?;

    Ok(BlockStmt {
        body,
        span: Span {
            start,
            end: parser.previous_end(),
        },
    })
}

/// `( expr )` as used by `si`, `o sino` and `repeat until`.
fn parse_condition(parser: &mut Parser) -> Result<Expr, Error> {
    let error = parser.unexpected("expected `(` before the condition");
    parser.expect_error(TokenKind::OpenParen, Some(error))?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(condition)
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let type_ = parse_type(parser)?;
    let name = parser.expect_ident("expected identifier during variable declaration")?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::VarDecl(VarDeclStmt {
        name,
        type_,
        span: Span {
            start,
            end: parser.previous_end(),
        },
    }))
}

pub fn parse_subroutine_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let name = parser.expect_ident("expected subroutine name after `sprout`")?;

    parser.expect(TokenKind::OpenParen)?;
    let mut parameters = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        let param_start = parser.get_position();
        let type_ = parse_base_type(parser)?;
        let param_name = parser.expect_ident("expected parameter name")?;

        parameters.push(Parameter {
            name: param_name,
            type_,
            span: Span {
                start: param_start,
                end: parser.previous_end(),
            },
        });

        if parser.current_token_kind() != TokenKind::CloseParen {
            let error = parser.unexpected("expected `,` or `)` in parameter list");
            parser.expect_error(TokenKind::Comma, Some(error))?;
        }
    }
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_block(parser)?;

    Ok(Stmt::SubroutineDecl(SubroutineDeclStmt {
        name,
        parameters,
        body,
        span: Span {
            start,
            end: parser.previous_end(),
        },
    }))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_condition(parser)?;
    let body = parse_block(parser)?;

    let mut else_ifs = vec![];
    while parser.current_token_kind() == TokenKind::O {
        parser.advance();
        let error = parser.unexpected("expected `sino` after `o`");
        parser.expect_error(TokenKind::Sino, Some(error))?;

        let condition = parse_condition(parser)?;
        let body = parse_block(parser)?;
        else_ifs.push(ConditionalBranch { condition, body });
    }

    let else_body = if parser.current_token_kind() == TokenKind::Sino {
        parser.advance();
        Some(parse_block(parser)?)
    } else {
        None
    };

    Ok(Stmt::If(IfStmt {
        branch: ConditionalBranch { condition, body },
        else_ifs,
        else_body,
        span: Span {
            start,
            end: parser.previous_end(),
        },
    }))
}

/// `repeat <count> times { }` or `repeat until (<cond>) { }`.
pub fn parse_repeat_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    if parser.current_token_kind() == TokenKind::Until {
        parser.advance();
        let condition = parse_condition(parser)?;
        let body = parse_block(parser)?;

        return Ok(Stmt::RepeatUntil(RepeatUntilStmt {
            body,
            condition,
            span: Span {
                start,
                end: parser.previous_end(),
            },
        }));
    }

    let count = parse_expr(parser, BindingPower::Default)?;
    let error = parser.unexpected("expected `times` after the repeat count");
    parser.expect_error(TokenKind::Times, Some(error))?;
    let body = parse_block(parser)?;

    Ok(Stmt::RepeatTimes(RepeatTimesStmt {
        count,
        body,
        span: Span {
            start,
            end: parser.previous_end(),
        },
    }))
}

pub fn parse_vomit_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let expression = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Vomit(VomitStmt {
        expression,
        span: Span {
            start,
            end: parser.previous_end(),
        },
    }))
}

pub fn parse_listen_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let target = parser.expect_ident("expected a variable to read into")?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Listen(ListenStmt {
        target,
        span: Span {
            start,
            end: parser.previous_end(),
        },
    }))
}

pub fn parse_bloom_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let callee = parser.expect_ident("expected subroutine name after `bloom`")?;
    let arguments = parse_arguments(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Call(CallStmt {
        call: CallExpr { callee, arguments },
        span: Span {
            start,
            end: parser.previous_end(),
        },
    }))
}

/// `x = e;`, `a[i] = e;` or `f(args);`
pub fn parse_assignment_or_call_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.get_position();
    let target = parser.expect_ident("expected identifier")?;

    let stmt = match parser.current_token_kind() {
        TokenKind::Assignment => {
            parser.advance();
            let value = parse_expr(parser, BindingPower::Default)?;
            parser.expect(TokenKind::Semicolon)?;

            Stmt::VarAssignment(VarAssignmentStmt {
                target,
                value,
                span: Span {
                    start,
                    end: parser.previous_end(),
                },
            })
        }
        TokenKind::OpenBracket => {
            parser.advance();
            let index = parse_expr(parser, BindingPower::Default)?;
            parser.expect(TokenKind::CloseBracket)?;
            let error = parser.unexpected("expected `=` after the array element");
            parser.expect_error(TokenKind::Assignment, Some(error))?;
            let value = parse_expr(parser, BindingPower::Default)?;
            parser.expect(TokenKind::Semicolon)?;

            Stmt::ArrayAssignment(ArrayAssignmentStmt {
                target,
                index,
                value,
                span: Span {
                    start,
                    end: parser.previous_end(),
                },
            })
        }
        TokenKind::OpenParen => {
            let arguments = parse_arguments(parser)?;
            parser.expect(TokenKind::Semicolon)?;

            Stmt::Call(CallStmt {
                call: CallExpr {
                    callee: target,
                    arguments,
                },
                span: Span {
                    start,
                    end: parser.previous_end(),
                },
            })
        }
        _ => return Err(parser.unexpected("expected `=`, `[` or `(` after identifier")),
    };

    Ok(stmt)
}
