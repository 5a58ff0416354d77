//! gamescript pointer analysis
//!
//! - [`cfg`]: Control-flow graphs over compiled scripts
//! - [`pointer`]: Pointer effect summaries and the corruption check

pub mod cfg;
mod error;
pub mod pointer;

pub use cfg::{CfgBuilder, CfgCache, CfgEdge, CfgNode, ControlFlowGraph, InstructionLocation};
pub use error::{CfgError, Result};
pub use pointer::{CorruptionPath, PointerChecker, PointerSites};
