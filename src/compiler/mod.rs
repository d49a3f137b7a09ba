//! Code generation module for the compiler.
//!
//! This module contains the TAM encoder that transforms a checked program
//! into a sequence of machine instructions. It handles:
//!
//! - Storage layout of variables, arrays and parameters in stack frames
//! - Compilation of expressions and statements
//! - Forward jumps with backpatching
//! - Subroutine frames, static links and display registers
//! - Serialization of the resulting object file

pub mod compiler;
pub mod expr;
pub mod stmt;
