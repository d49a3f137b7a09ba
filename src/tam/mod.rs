//! Model of the Triangle Abstract Machine (TAM), the compilation target.
//!
//! This module contains:
//!
//! - Opcodes, registers and the primitive routine table
//! - Code store and data representation constants
//! - The instruction record and its 16-byte big-endian serialization
//! - Decoding of serialized programs and mnemonic disassembly

pub mod instruction;
pub mod machine;
