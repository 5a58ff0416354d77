//! Local variable slots of a compiled script.

use std::rc::Rc;

use gamescript_core::{BaseVarType, LocalVariableSymbol};
use rustc_hash::FxHashMap;

/// A local variable and its slot.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalSlot {
    pub symbol: Rc<LocalVariableSymbol>,
    /// Index within the slot space of the variable's base type.
    pub index: u32,
    pub is_parameter: bool,
}

/// Parameters followed by declared locals.
///
/// Each base type has its own slot space, so the first string local and the
/// first int local both get index 0.
#[derive(Debug, Clone, Default)]
pub struct LocalTable {
    slots: Vec<LocalSlot>,
    by_name: FxHashMap<String, usize>,
    counts: [u32; 3],
    parameter_counts: [u32; 3],
}

fn space(base: BaseVarType) -> usize {
    match base {
        BaseVarType::Integer => 0,
        BaseVarType::String => 1,
        BaseVarType::Long => 2,
    }
}

impl LocalTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter. Parameters must be added before any local.
    pub fn add_parameter(&mut self, symbol: Rc<LocalVariableSymbol>) -> u32 {
        debug_assert!(self.slots.iter().all(|s| s.is_parameter));
        let base = space(symbol.base_type());
        self.parameter_counts[base] += 1;
        self.insert(symbol, true)
    }

    /// Add a declared local, returning its slot.
    ///
    /// Declaring a name that already has a slot reuses it.
    pub fn add(&mut self, symbol: Rc<LocalVariableSymbol>) -> u32 {
        if let Some(&i) = self.by_name.get(&symbol.name) {
            return self.slots[i].index;
        }
        self.insert(symbol, false)
    }

    fn insert(&mut self, symbol: Rc<LocalVariableSymbol>, is_parameter: bool) -> u32 {
        let counter = &mut self.counts[space(symbol.base_type())];
        let index = *counter;
        *counter += 1;

        self.by_name.insert(symbol.name.clone(), self.slots.len());
        self.slots.push(LocalSlot {
            symbol,
            index,
            is_parameter,
        });
        index
    }

    pub fn get(&self, name: &str) -> Option<&LocalSlot> {
        self.by_name.get(name).map(|&i| &self.slots[i])
    }

    pub fn index_of(&self, name: &str) -> Option<u32> {
        self.get(name).map(|slot| slot.index)
    }

    /// Number of slots, parameters included, in the `base` space.
    pub fn count(&self, base: BaseVarType) -> u32 {
        self.counts[space(base)]
    }

    pub fn parameter_count(&self, base: BaseVarType) -> u32 {
        self.parameter_counts[space(base)]
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocalSlot> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
