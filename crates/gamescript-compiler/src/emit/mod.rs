//! Block-structured instruction emitter.
//!
//! The [`BlockEmitter`] owns the blocks of the script being compiled. New
//! branch targets are created with [`BlockEmitter::generate_block`] and laid
//! out when [`BlockEmitter::bind`] makes them the active block, so the block
//! order is the order in which targets were bound. A block that does not end
//! in a terminal instruction falls through into the next bound block.
//!
//! # Example
//!
//! ```ignore
//! let mut emitter = BlockEmitter::new(true);
//! emitter.start_script();
//!
//! let end = emitter.generate_block("if_end");
//! emitter.emit(Instruction::branch(Opcode::Branch, end.clone()));
//! emitter.bind(end);
//!
//! let (blocks, switch_tables) = emitter.finish();
//! ```

mod labels;
mod lines;

use gamescript_core::Span;

use crate::bytecode::{Block, Instruction, Label, SwitchTable, SwitchTableId};

pub use labels::{ENTRY, LabelGenerator};
pub use lines::LineTracker;

/// Emits instructions into the active block of one script at a time.
#[derive(Debug)]
pub struct BlockEmitter {
    /// Bound blocks in layout order; the last one is active.
    blocks: Vec<Block>,

    switch_tables: Vec<SwitchTable>,

    labels: LabelGenerator,

    lines: LineTracker,
}

impl BlockEmitter {
    pub fn new(line_numbers: bool) -> Self {
        Self {
            blocks: Vec::new(),
            switch_tables: Vec::new(),
            labels: LabelGenerator::new(),
            lines: LineTracker::new(line_numbers),
        }
    }

    /// Begin a new script: clear all per-script state and bind `entry`.
    pub fn start_script(&mut self) {
        self.blocks.clear();
        self.switch_tables.clear();
        self.labels.reset();
        self.lines.reset();
        self.bind(Label::new(ENTRY));
    }

    // ==========================================================================
    // Blocks
    // ==========================================================================

    /// Allocate a label for a block that will be bound later.
    pub fn generate_block(&mut self, name: &str) -> Label {
        self.labels.generate(name)
    }

    /// Lay out a new block for `label` and make it active.
    pub fn bind(&mut self, label: Label) {
        debug_assert!(
            self.blocks.iter().all(|b| b.label != label),
            "label {label} bound twice"
        );
        self.blocks.push(Block::new(label));
    }

    /// Label of the active block.
    pub fn current_label(&self) -> Option<&Label> {
        self.blocks.last().map(|b| &b.label)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    // ==========================================================================
    // Emission
    // ==========================================================================

    /// Append an instruction to the active block.
    pub fn emit(&mut self, instruction: Instruction) {
        if self.blocks.is_empty() {
            self.bind(Label::new(ENTRY));
        }
        if let Some(block) = self.blocks.last_mut() {
            block.instructions.push(instruction);
        }
    }

    /// Emit a line marker if `span` is on a new line.
    pub fn line(&mut self, span: Span) {
        if let Some(marker) = self.lines.mark(span) {
            self.emit(marker);
        }
    }

    // ==========================================================================
    // Switch tables
    // ==========================================================================

    pub fn new_switch_table(&mut self) -> SwitchTableId {
        let id = SwitchTableId(self.switch_tables.len() as u32);
        self.switch_tables.push(SwitchTable::new(id));
        id
    }

    pub fn switch_table_mut(&mut self, id: SwitchTableId) -> Option<&mut SwitchTable> {
        self.switch_tables.get_mut(id.0 as usize)
    }

    /// Take the finished blocks and switch tables of the current script.
    pub fn finish(&mut self) -> (Vec<Block>, Vec<SwitchTable>) {
        (
            std::mem::take(&mut self.blocks),
            std::mem::take(&mut self.switch_tables),
        )
    }
}
