/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Node ids, the program root and the closed statement/expression enums
/// - expressions: Definitions for the compound expression kinds and operators
/// - statements: Definitions for the statement kinds
/// - types: Declared types and their storage sizes
/// - printer: Indented textual dump of a program
pub mod ast;
pub mod expressions;
pub mod printer;
pub mod statements;
pub mod types;
