//! Output of the emitter for one script.

use std::fmt;
use std::rc::Rc;

use gamescript_core::{ScriptSymbol, SymbolHash};
use rustc_hash::FxHashMap;

use super::{Block, Instruction, Label, LocalTable, SwitchTable, SwitchTableId};

/// One compiled script: blocks in layout order, switch tables and locals.
///
/// Frozen once the emitter hands it out.
#[derive(Debug, Clone)]
pub struct CompiledScript {
    pub symbol: Rc<ScriptSymbol>,
    pub blocks: Vec<Block>,
    pub switch_tables: Vec<SwitchTable>,
    pub locals: LocalTable,
    block_indices: FxHashMap<Label, usize>,
}

impl CompiledScript {
    pub fn new(
        symbol: Rc<ScriptSymbol>,
        blocks: Vec<Block>,
        switch_tables: Vec<SwitchTable>,
        locals: LocalTable,
    ) -> Self {
        let block_indices = blocks
            .iter()
            .enumerate()
            .map(|(i, block)| (block.label.clone(), i))
            .collect();
        Self {
            symbol,
            blocks,
            switch_tables,
            locals,
            block_indices,
        }
    }

    pub fn hash(&self) -> SymbolHash {
        self.symbol.hash()
    }

    pub fn block(&self, label: &Label) -> Option<&Block> {
        self.block_index(label).map(|i| &self.blocks[i])
    }

    pub fn block_index(&self, label: &Label) -> Option<usize> {
        self.block_indices.get(label).copied()
    }

    pub fn switch_table(&self, id: SwitchTableId) -> Option<&SwitchTable> {
        self.switch_tables.iter().find(|t| t.id == id)
    }

    /// All instructions in layout order, markers included.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.blocks.iter().flat_map(|b| b.instructions.iter())
    }
}

impl fmt::Display for CompiledScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.symbol)?;
        for block in &self.blocks {
            writeln!(f, "  {}:", block.label)?;
            for instruction in &block.instructions {
                writeln!(f, "    {instruction}")?;
            }
        }
        Ok(())
    }
}
