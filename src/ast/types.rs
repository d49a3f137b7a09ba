use std::fmt::Display;

use crate::tam::machine::{BOOL_SIZE, CHAR_SIZE, INT_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Int,
    Bool,
    Char,
}

impl BaseType {
    pub fn size(&self) -> i32 {
        match self {
            BaseType::Int => INT_SIZE,
            BaseType::Bool => BOOL_SIZE,
            BaseType::Char => CHAR_SIZE,
        }
    }
}

impl Display for BaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BaseType::Int => write!(f, "int"),
            BaseType::Bool => write!(f, "bool"),
            BaseType::Char => write!(f, "char"),
        }
    }
}

/// Declared type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSpec {
    Simple(BaseType),
    Array { element: BaseType, size: i32 },
}

impl TypeSpec {
    /// Number of frame words a declaration of this type occupies, or `None`
    /// when that does not fit in an `i32`.
    pub fn size(&self) -> Option<i32> {
        match self {
            TypeSpec::Simple(base) => Some(base.size()),
            TypeSpec::Array { element, size } => element.size().checked_mul(*size),
        }
    }

    /// The scalar type a bare reference to the variable produces, if any.
    pub fn scalar(&self) -> Option<BaseType> {
        match self {
            TypeSpec::Simple(base) => Some(*base),
            TypeSpec::Array { .. } => None,
        }
    }
}

impl Display for TypeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeSpec::Simple(base) => write!(f, "{}", base),
            TypeSpec::Array { element, size } => write!(f, "[{}, {}]", element, size),
        }
    }
}
