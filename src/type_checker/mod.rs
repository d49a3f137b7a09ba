//! Type checking and semantic analysis module.
//!
//! This module performs identification and type checking on the AST.
//! Instead of rewriting the tree it fills side tables keyed by node id:
//!
//! - A scoped symbol table with shadowing and duplicate detection
//! - Resolution of every identifier use to its declaring symbol
//! - Inferred expression types and l-value discipline
//! - Subroutine arity and argument type checks
//! - Array index type and literal bounds checks
//!
//! Problems are reported to a diagnostic sink; checking never aborts.

pub mod semantic_model;
pub mod symbol_table;
pub mod type_checker;

#[cfg(test)]
mod tests;
