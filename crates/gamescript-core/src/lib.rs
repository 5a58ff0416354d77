//! Core types shared by every phase of the gamescript back end.
//!
//! ## Modules
//!
//! - [`span`]: Source locations
//! - [`diagnostic`]: Diagnostics accumulated per compilation phase
//! - [`types`]: Script types and their stack representation
//! - [`symbol`]: Resolved symbols (scripts, commands, variables, constants)
//! - [`trigger`]: Script triggers and the pointers they provide at entry
//! - [`pointer`]: Engine pointer sets and per-command pointer metadata
//! - [`symbol_table`]: Name lookup used while folding constants

pub mod diagnostic;
pub mod pointer;
pub mod span;
pub mod symbol;
pub mod symbol_table;
pub mod trigger;
pub mod types;

pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
pub use pointer::{CommandPointers, PointerEffects, PointerSet};
pub use span::Span;
pub use symbol::{
    CommandSymbol, ConfigSymbol, ConstantSymbol, GameVarKind, GameVariableSymbol,
    LocalVariableSymbol, ScriptSymbol, Symbol, SymbolHash,
};
pub use symbol_table::SymbolTable;
pub use trigger::Trigger;
pub use types::{BaseVarType, PrimitiveType, Type};
