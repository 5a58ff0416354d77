//! Labels, basic blocks and switch tables.

use std::fmt;
use std::rc::Rc;

use super::{Constant, Instruction};

/// Identity of a branch target.
///
/// Labels are unique within a script; the label generator guarantees it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(Rc<str>);

impl Label {
    pub fn new(name: &str) -> Self {
        Label(Rc::from(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A labeled, straight-line run of instructions.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub label: Label,
    pub instructions: Vec<Instruction>,
}

impl Block {
    pub fn new(label: Label) -> Self {
        Self {
            label,
            instructions: Vec::new(),
        }
    }

    /// The last instruction that is not a line marker.
    pub fn last_real(&self) -> Option<&Instruction> {
        self.instructions
            .iter()
            .rev()
            .find(|i| !i.opcode.is_marker())
    }

    /// Whether control can leave the block by falling into the next one.
    pub fn falls_through(&self) -> bool {
        self.last_real().is_none_or(|i| !i.opcode.is_terminal())
    }
}

/// Index of a switch table within its script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SwitchTableId(pub u32);

/// One case of a switch table: every key dispatches to `label`.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// Empty for the default case.
    pub keys: Vec<Constant>,
    pub label: Label,
}

/// Dispatch table for one switch statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchTable {
    pub id: SwitchTableId,
    pub cases: Vec<SwitchCase>,
}

impl SwitchTable {
    pub fn new(id: SwitchTableId) -> Self {
        Self {
            id,
            cases: Vec::new(),
        }
    }

    pub fn add_case(&mut self, keys: Vec<Constant>, label: Label) {
        self.cases.push(SwitchCase { keys, label });
    }

    /// The case a key dispatches to, if any.
    pub fn find(&self, key: &Constant) -> Option<&SwitchCase> {
        self.cases.iter().find(|c| c.keys.contains(key))
    }
}
