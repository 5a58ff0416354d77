//! Intermediate representation produced by the emitter.
//!
//! - [`Opcode`] and [`Instruction`] - the instruction set
//! - [`Block`] and [`Label`] - basic blocks and their names
//! - [`SwitchTable`] - per-switch dispatch tables
//! - [`CompiledScript`] - everything emitted for one script
//!
//! Numeric ids for symbols, labels and tables are assigned later by the
//! binary writer; here every operand is still symbolic.

mod block;
mod instruction;
mod locals;
mod opcode;
mod script;

pub use block::{Block, Label, SwitchCase, SwitchTable, SwitchTableId};
pub use instruction::{Constant, Instruction, Operand};
pub use locals::{LocalSlot, LocalTable};
pub use opcode::{Comparison, Opcode};
pub use script::CompiledScript;
