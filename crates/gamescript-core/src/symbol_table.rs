//! Name lookup for symbols met outside of the resolved tree.
//!
//! Scoping rules live in the type checker; the back end only needs a flat
//! name → symbol view to fold identifiers into constants.

use rustc_hash::FxHashMap;

use crate::Symbol;

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: FxHashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a symbol under its own name. Returns `false` if the name was
    /// already taken, in which case the table is left unchanged.
    pub fn insert(&mut self, symbol: Symbol) -> bool {
        let name = symbol.name().to_string();
        if self.symbols.contains_key(&name) {
            return false;
        }
        self.symbols.insert(name, symbol);
        true
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
