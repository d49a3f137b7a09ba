//! Type parsing implementation.
//!
//! This module handles parsing of type annotations. It supports:
//!
//! - Scalar types (`int`, `bool`, `char`)
//! - Fixed-size array types (`[int, 10]`)
//!
//! Like expression parsing, each type form is found through a NUD lookup
//! keyed by its first token.

use std::collections::HashMap;

use crate::{
    ast::types::{BaseType, TypeSpec},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<TypeSpec, Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Initializes the type parsing lookup table.
///
/// # Arguments
///
/// * `parser` - Mutable reference to the parser to initialize
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Int, parse_simple_type);
    parser.type_nud(TokenKind::Bool, parse_simple_type);
    parser.type_nud(TokenKind::Char, parse_simple_type);
    parser.type_nud(TokenKind::OpenBracket, parse_array_type);
}

pub fn parse_base_type(parser: &mut Parser) -> Result<BaseType, Error> {
    let base = match parser.current_token_kind() {
        TokenKind::Int => BaseType::Int,
        TokenKind::Bool => BaseType::Bool,
        TokenKind::Char => BaseType::Char,
        _ => return Err(parser.unexpected("expected `int`, `bool` or `char`")),
    };
    parser.advance();

    Ok(base)
}

pub fn parse_simple_type(parser: &mut Parser) -> Result<TypeSpec, Error> {
    Ok(TypeSpec::Simple(parse_base_type(parser)?))
}

/// `[<element>, <size>]`
pub fn parse_array_type(parser: &mut Parser) -> Result<TypeSpec, Error> {
    parser.expect(TokenKind::OpenBracket)?;
    let element = parse_base_type(parser)?;
    parser.expect(TokenKind::Comma)?;

    let size_token = parser.expect(TokenKind::Number)?;
    let size = match size_token.value.parse::<i32>() {
        Ok(size) => size,
        Err(_) => {
            return Err(Error::new(
                ErrorImpl::NumberParseError {
                    token: size_token.value,
                },
                size_token.span.start,
            ))
        }
    };

    parser.expect(TokenKind::CloseBracket)?;

    Ok(TypeSpec::Array { element, size })
}

pub fn parse_type(parser: &mut Parser) -> Result<TypeSpec, Error> {
    let token_kind = parser.current_token_kind();
    match parser.get_type_nud_lookup().get(&token_kind).copied() {
        Some(handler) => handler(parser),
        None => Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: parser.current_token().value.clone(),
            },
            parser.get_position(),
        )),
    }
}
