use std::collections::HashMap;

use crate::{
    ast::{
        ast::NodeId,
        types::{BaseType, TypeSpec},
    },
    Span,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    Variable(TypeSpec),
    Parameter(BaseType),
    Subroutine { parameters: Vec<BaseType> },
}

/// One declaration, whatever its kind.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub span: Span,
}

impl Symbol {
    /// Scalar type the name evaluates to when used as a variable.
    pub fn value_type(&self) -> Option<BaseType> {
        match &self.kind {
            SymbolKind::Variable(type_) => type_.scalar(),
            SymbolKind::Parameter(type_) => Some(*type_),
            SymbolKind::Subroutine { .. } => None,
        }
    }
}

/// Everything the checker learned about a program.
///
/// Only the checker can build one, so code generation cannot run on a tree
/// that has not been checked.
#[derive(Debug, Default)]
pub struct SemanticModel {
    pub(crate) symbols: Vec<Symbol>,
    /// Declaring identifier -> symbol.
    pub(crate) declarations: HashMap<NodeId, SymbolId>,
    /// Using identifier -> symbol it resolved to.
    pub(crate) resolutions: HashMap<NodeId, SymbolId>,
    /// Expression -> inferred type, for expressions that have one.
    pub(crate) types: HashMap<NodeId, BaseType>,
}

impl SemanticModel {
    pub(crate) fn add_symbol(&mut self, declared_by: NodeId, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len());
        self.symbols.push(symbol);
        self.declarations.insert(declared_by, id);
        id
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0]
    }

    pub fn symbols(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(index, symbol)| (SymbolId(index), symbol))
    }

    pub fn declared_symbol(&self, ident: NodeId) -> Option<SymbolId> {
        self.declarations.get(&ident).copied()
    }

    pub fn resolve(&self, ident: NodeId) -> Option<SymbolId> {
        self.resolutions.get(&ident).copied()
    }

    pub fn type_of(&self, expr: NodeId) -> Option<BaseType> {
        self.types.get(&expr).copied()
    }

    /// First declared symbol called `name`.
    pub fn find_symbol(&self, name: &str) -> Option<SymbolId> {
        self.symbols()
            .find(|(_, symbol)| symbol.name == name)
            .map(|(id, _)| id)
    }
}
