use crate::{
    ast::{
        ast::{Expr, ExprKind, Ident},
        expressions::{ArrayElementExpr, BinaryExpr, BinaryOp, CallExpr, UnaryExpr, UnaryOp},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind).copied() {
        Some(nud) => nud,
        None => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: parser.current_token().value.clone(),
                },
                parser.get_position(),
            ))
        }
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let token_bp = *parser
            .get_bp_lookup()
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);
        if token_bp <= bp {
            break;
        }

        let led = match parser.get_led_lookup().get(&token_kind).copied() {
            Some(led) => led,
            None => {
                return Err(Error::new(
                    ErrorImpl::UnexpectedToken {
                        token: parser.current_token().value.clone(),
                    },
                    parser.get_position(),
                ))
            }
        };

        left = led(parser, left, token_bp)?;
    }

    Ok(left)
}

fn make_expr(parser: &mut Parser, kind: ExprKind, span: Span) -> Expr {
    Expr {
        id: parser.advance_id(),
        kind,
        span,
    }
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.current_token().clone();

    let kind = match token.kind {
        TokenKind::Number => match token.value.parse::<i32>() {
            Ok(value) => ExprKind::IntLiteral(value),
            Err(_) => {
                return Err(Error::new(
                    ErrorImpl::NumberParseError { token: token.value },
                    token.span.start,
                ))
            }
        },
        TokenKind::CharLiteral => match token.value.chars().next() {
            Some(value) => ExprKind::CharLiteral(value),
            None => {
                return Err(Error::new(
                    ErrorImpl::InvalidCharLiteral { token: token.value },
                    token.span.start,
                ))
            }
        },
        TokenKind::True => ExprKind::BoolLiteral(true),
        TokenKind::False => ExprKind::BoolLiteral(false),
        TokenKind::Identifier => ExprKind::Var(Ident {
            id: parser.advance_id(),
            name: token.value.clone(),
            span: token.span.clone(),
        }),
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken { token: token.value },
                token.span.start,
            ))
        }
    };

    parser.advance();
    Ok(make_expr(parser, kind, token.span))
}

fn binary_operator(kind: TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Assignment => BinaryOp::Assign,
        TokenKind::Or => BinaryOp::Or,
        TokenKind::And => BinaryOp::And,
        TokenKind::Equals => BinaryOp::Equals,
        TokenKind::NotEquals => BinaryOp::NotEquals,
        TokenKind::Less => BinaryOp::Less,
        TokenKind::Greater => BinaryOp::Greater,
        TokenKind::Plus => BinaryOp::Plus,
        TokenKind::Dash => BinaryOp::Minus,
        TokenKind::Star => BinaryOp::Multiply,
        TokenKind::Slash => BinaryOp::Divide,
        _ => return None,
    })
}

fn build_binary(
    parser: &mut Parser,
    left: Expr,
    operator_token: TokenKind,
    right: Expr,
) -> Result<Expr, Error> {
    let operator = match binary_operator(operator_token) {
        Some(operator) => operator,
        None => return Err(parser.unexpected("expected a binary operator")),
    };

    let span = Span {
        start: left.span.start.clone(),
        end: right.span.end.clone(),
    };

    Ok(make_expr(
        parser,
        ExprKind::Binary(BinaryExpr {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }),
        span,
    ))
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().kind;
    let right = parse_expr(parser, bp)?;

    build_binary(parser, left, operator_token, right)
}

/// Right associative: `a = b = c` stores `c` into `b` first.
pub fn parse_assignment_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    let operator_token = parser.advance().kind;
    let right = parse_expr(parser, BindingPower::Comma)?;

    build_binary(parser, left, operator_token, right)
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let operator = match operator_token.kind {
        TokenKind::Dash => UnaryOp::Minus,
        TokenKind::Plus => UnaryOp::Plus,
        _ => UnaryOp::Not,
    };
    let operand = parse_expr(parser, BindingPower::Unary)?;

    let span = Span {
        start: operator_token.span.start.clone(),
        end: operand.span.end.clone(),
    };

    Ok(make_expr(
        parser,
        ExprKind::Unary(UnaryExpr {
            operator,
            operand: Box::new(operand),
        }),
        span,
    ))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// Only a bare name can be called or indexed.
fn expect_name(parser: &Parser, left: Expr, what: &str) -> Result<Ident, Error> {
    match left.kind {
        ExprKind::Var(ident) => Ok(ident),
        _ => Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: format!("only a name can be {}", what),
            },
            parser.get_position(),
        )),
    }
}

/// Parses a comma separated argument list; the opening `(` is current.
pub fn parse_arguments(parser: &mut Parser) -> Result<Vec<Expr>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut arguments = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        arguments.push(parse_expr(parser, BindingPower::Comma)?);

        if parser.current_token_kind() != TokenKind::CloseParen {
            let error = parser.unexpected("expected `,` or `)` in argument list");
            parser.expect_error(TokenKind::Comma, Some(error))?;
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    Ok(arguments)
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let start = left.span.start.clone();
    let callee = expect_name(parser, left, "called")?;
    let arguments = parse_arguments(parser)?;

    let span = Span {
        start,
        end: parser.previous_end(),
    };

    Ok(make_expr(
        parser,
        ExprKind::Call(CallExpr { callee, arguments }),
        span,
    ))
}

pub fn parse_index_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let start = left.span.start.clone();
    let array = expect_name(parser, left, "indexed")?;

    parser.expect(TokenKind::OpenBracket)?;
    let index = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;

    let span = Span {
        start,
        end: parser.previous_end(),
    };

    Ok(make_expr(
        parser,
        ExprKind::ArrayElement(ArrayElementExpr {
            array,
            index: Box::new(index),
        }),
        span,
    ))
}
