use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::InvalidCharLiteral { .. } => "InvalidCharLiteral",
            ErrorImpl::IdentifierAlreadyDeclared { .. } => "IdentifierAlreadyDeclared",
            ErrorImpl::IdentifierNotDeclared { .. } => "IdentifierNotDeclared",
            ErrorImpl::NotAVariable { .. } => "NotAVariable",
            ErrorImpl::NotAnArray { .. } => "NotAnArray",
            ErrorImpl::NotAFunction { .. } => "NotAFunction",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::NotAnLValue => "NotAnLValue",
            ErrorImpl::DisallowedUnaryOperator { .. } => "DisallowedUnaryOperator",
            ErrorImpl::IncorrectArgumentCount { .. } => "IncorrectArgumentCount",
            ErrorImpl::ArgumentTypeMismatch { .. } => "ArgumentTypeMismatch",
            ErrorImpl::IndexOutOfBounds { .. } => "IndexOutOfBounds",
            ErrorImpl::UnresolvedAddress { .. } => "UnresolvedAddress",
            ErrorImpl::NestingTooDeep { .. } => "NestingTooDeep",
            ErrorImpl::OperandOverflow { .. } => "OperandOverflow",
            ErrorImpl::CodeStoreExhausted { .. } => "CodeStoreExhausted",
            ErrorImpl::FrameTooLarge { .. } => "FrameTooLarge",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::InvalidCharLiteral { token } => ErrorTip::Suggestion(format!(
                "Invalid character literal `{}`, unknown escape sequence",
                token
            )),
            ErrorImpl::IdentifierAlreadyDeclared { identifier } => ErrorTip::Suggestion(
                format!("`{}` is already declared in this scope", identifier),
            ),
            ErrorImpl::IdentifierNotDeclared { identifier } => {
                ErrorTip::Suggestion(format!("`{}` is not declared", identifier))
            }
            ErrorImpl::NotAVariable { identifier } => ErrorTip::Suggestion(format!(
                "`{}` is not a variable, only scalar variables and parameters hold a value here",
                identifier
            )),
            ErrorImpl::NotAnArray { identifier } => {
                ErrorTip::Suggestion(format!("`{}` is not an array", identifier))
            }
            ErrorImpl::NotAFunction { identifier } => ErrorTip::Suggestion(format!(
                "`{}` is not a function, declare it with `sprout`",
                identifier
            )),
            ErrorImpl::TypeMismatch {
                context,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "Expected type `{}` in {}, received `{}`",
                expected, context, received
            )),
            ErrorImpl::NotAnLValue => ErrorTip::Suggestion(String::from(
                "The left operand of an assignment must be a variable or an array element",
            )),
            ErrorImpl::DisallowedUnaryOperator { operator } => ErrorTip::Suggestion(format!(
                "Only `+` and `-` are allowed as unary operators, found `{}`",
                operator
            )),
            ErrorImpl::IncorrectArgumentCount {
                function,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "`{}` expects {} arguments, received {}",
                function, expected, received
            )),
            ErrorImpl::ArgumentTypeMismatch { expected, received } => {
                ErrorTip::Suggestion(format!(
                    "Expected argument type `{}`, received `{}`",
                    expected, received
                ))
            }
            ErrorImpl::IndexOutOfBounds { array, index, size } => ErrorTip::Suggestion(format!(
                "Index {} is outside `{}`, valid indices are 0 to {}",
                index,
                array,
                size - 1
            )),
            ErrorImpl::UnresolvedAddress { identifier } => ErrorTip::Suggestion(format!(
                "No storage was allocated for `{}`, the zero address is used instead",
                identifier
            )),
            ErrorImpl::NestingTooDeep { current, entity } => ErrorTip::Suggestion(format!(
                "Routine level {} cannot reach level {}, at most 6 levels apart are supported",
                current, entity
            )),
            ErrorImpl::OperandOverflow { field, value, limit } => ErrorTip::Suggestion(format!(
                "Operand `{}` value {} does not fit, truncated to {}",
                field, value, limit
            )),
            ErrorImpl::CodeStoreExhausted { capacity } => ErrorTip::Suggestion(format!(
                "The program needs more than {} instructions",
                capacity
            )),
            ErrorImpl::FrameTooLarge { identifier } => ErrorTip::Suggestion(format!(
                "Storage for `{}` does not fit in the frame, make the array smaller",
                identifier
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}:{}", self.internal_error, self.position.1, self.position.0)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("invalid character literal: {token:?}")]
    InvalidCharLiteral { token: String },
    #[error("identifier {identifier:?} already declared")]
    IdentifierAlreadyDeclared { identifier: String },
    #[error("identifier {identifier:?} not declared")]
    IdentifierNotDeclared { identifier: String },
    #[error("{identifier:?} is not a variable")]
    NotAVariable { identifier: String },
    #[error("{identifier:?} is not an array")]
    NotAnArray { identifier: String },
    #[error("{identifier:?} is not a function")]
    NotAFunction { identifier: String },
    #[error("types do not match in {context}: expected {expected:?}, received {received:?}")]
    TypeMismatch {
        context: String,
        expected: String,
        received: String,
    },
    #[error("left operand must be an l-value")]
    NotAnLValue,
    #[error("unary operator {operator:?} is not allowed")]
    DisallowedUnaryOperator { operator: String },
    #[error("incorrect number of arguments for {function:?}: expected {expected}, received {received}")]
    IncorrectArgumentCount {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("argument types do not match: expected {expected:?}, received {received:?}")]
    ArgumentTypeMismatch { expected: String, received: String },
    #[error("array index {index} out of bounds for {array:?} of size {size}")]
    IndexOutOfBounds { array: String, index: i32, size: i32 },
    #[error("no address allocated for {identifier:?}")]
    UnresolvedAddress { identifier: String },
    #[error("cannot address level {entity} from routine level {current}")]
    NestingTooDeep { current: u32, entity: u32 },
    #[error("operand {field} overflow: {value} truncated to {limit}")]
    OperandOverflow {
        field: &'static str,
        value: i32,
        limit: i32,
    },
    #[error("code store of {capacity} instructions exhausted")]
    CodeStoreExhausted { capacity: usize },
    #[error("storage for {identifier:?} overflows the frame")]
    FrameTooLarge { identifier: String },
}
