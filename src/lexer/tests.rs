//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Integer and character literals
//! - Operators and punctuation
//! - Comments
//! - Error cases

use super::{lexer::tokenize, tokens::TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source.to_string(), Some("test.sprout".to_string()))
        .unwrap()
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_keywords() {
    assert_eq!(
        kinds("create int bool char true false si o sino repeat times until vomit listenCarefully sprout bloom"),
        vec![
            TokenKind::Create,
            TokenKind::Int,
            TokenKind::Bool,
            TokenKind::Char,
            TokenKind::True,
            TokenKind::False,
            TokenKind::Si,
            TokenKind::O,
            TokenKind::Sino,
            TokenKind::Repeat,
            TokenKind::Times,
            TokenKind::Until,
            TokenKind::Vomit,
            TokenKind::ListenCarefully,
            TokenKind::Sprout,
            TokenKind::Bloom,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let source = "foo bar2 _tmp sinon listen".to_string();
    let tokens = tokenize(source, Some("test.sprout".to_string())).unwrap();

    let values: Vec<&str> = tokens.iter().map(|token| token.value.as_str()).collect();
    assert_eq!(values, vec!["foo", "bar2", "_tmp", "sinon", "listen", "EOF"]);
    assert!(tokens[..5]
        .iter()
        .all(|token| token.kind == TokenKind::Identifier));
}

#[test]
fn test_tokenize_numbers() {
    let tokens = tokenize("42 0 32767".to_string(), None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].value, "0");
    assert_eq!(tokens[2].value, "32767");
}

#[test]
fn test_tokenize_char_literals() {
    let tokens = tokenize("'a' '\\n' '\\'' ' '".to_string(), None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::CharLiteral);
    assert_eq!(tokens[0].value, "a");
    assert_eq!(tokens[1].value, "\n");
    assert_eq!(tokens[2].value, "'");
    assert_eq!(tokens[3].value, " ");
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_invalid_escape_is_an_error() {
    let result = tokenize("'\\q'".to_string(), None);

    let error = result.unwrap_err();
    assert_eq!(error.get_error_name(), "InvalidCharLiteral");
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        kinds("= == != ! < > && || + - * /"),
        vec![
            TokenKind::Assignment,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Not,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    assert_eq!(
        kinds("[ ] { } ( ) ; ,"),
        vec![
            TokenKind::OpenBracket,
            TokenKind::CloseBracket,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::Semicolon,
            TokenKind::Comma,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_comments_are_skipped() {
    assert_eq!(
        kinds("# a comment\nvomit 1; # trailing\n"),
        vec![
            TokenKind::Vomit,
            TokenKind::Number,
            TokenKind::Semicolon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_token_spans() {
    let tokens = tokenize("create int count;".to_string(), None).unwrap();

    assert_eq!(tokens[2].span.start.0, 11);
    assert_eq!(tokens[2].span.end.0, 16);
    assert_eq!(tokens[3].span.start.0, 16);
    assert_eq!(tokens[0].span.start.1.as_str(), "shell");
}

#[test]
fn test_unrecognised_token() {
    let error = tokenize("create int x @ 3;".to_string(), None).unwrap_err();

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 13);
}
