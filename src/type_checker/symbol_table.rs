use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

#[derive(Debug, Clone)]
pub struct Entry<D> {
    pub level: u32,
    pub name: String,
    pub declaration: D,
}

/// Names visible at each lexical level.
///
/// Entries live in one list in declaration order. Closing a scope removes
/// every entry of the closed level, so the list never holds an entry deeper
/// than the current level and a reverse scan finds the innermost binding.
#[derive(Debug, Clone)]
pub struct SymbolTable<D> {
    entries: Vec<Entry<D>>,
    level: u32,
}

impl<D> Default for SymbolTable<D> {
    fn default() -> Self {
        SymbolTable {
            entries: vec![],
            level: 0,
        }
    }
}

impl<D> SymbolTable<D> {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn open_scope(&mut self) {
        self.level += 1;
    }

    /// Drops every entry of the current level. Must pair with `open_scope`.
    pub fn close_scope(&mut self) {
        let level = self.level;
        self.entries.retain(|entry| entry.level != level);
        self.level = self.level.saturating_sub(1);
    }

    /// Binds `name` at the current level.
    ///
    /// A second binding of the same name at the same level is rejected and
    /// the existing entry stays as it was.
    pub fn enter(&mut self, name: &str, declaration: D, position: Position) -> Result<(), Error> {
        let duplicate = self
            .entries
            .iter()
            .any(|entry| entry.level == self.level && entry.name == name);

        if duplicate {
            return Err(Error::new(
                ErrorImpl::IdentifierAlreadyDeclared {
                    identifier: name.to_string(),
                },
                position,
            ));
        }

        self.entries.push(Entry {
            level: self.level,
            name: name.to_string(),
            declaration,
        });
        Ok(())
    }

    /// Most recently entered binding of `name`, if any.
    pub fn retrieve(&self, name: &str) -> Option<&D> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.declaration)
    }

    /// Deepest level held by any entry; never above `level()`.
    pub fn deepest_entry_level(&self) -> Option<u32> {
        self.entries.iter().map(|entry| entry.level).max()
    }
}
