//! Error types and error handling for the compiler.
//!
//! This module defines the error types used throughout the compilation
//! process. It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for each compilation phase
//! - The diagnostic sink the checker and encoder report into
//! - Helpful error messages and suggestions

pub mod diagnostics;
pub mod errors;
