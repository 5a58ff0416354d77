//! Errors raised while building control-flow graphs.

use gamescript_compiler::Opcode;
use gamescript_core::{Diagnostic, Span};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CfgError>;

/// A malformed instruction sequence. Aborts analysis of the script.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CfgError {
    #[error("branch to unknown label '{label}'")]
    MissingLabel { label: String, span: Span },

    #[error("switch references unknown table {table}")]
    MissingSwitchTable { table: u32, span: Span },

    #[error("{opcode:?} without a {expected} operand")]
    MalformedOperand {
        opcode: Opcode,
        expected: &'static str,
        span: Span,
    },
}

impl CfgError {
    pub fn span(&self) -> Span {
        match self {
            Self::MissingLabel { span, .. }
            | Self::MissingSwitchTable { span, .. }
            | Self::MalformedOperand { span, .. } => *span,
        }
    }
}

impl From<CfgError> for Diagnostic {
    fn from(error: CfgError) -> Self {
        Diagnostic::error(error.span(), format!("internal compiler error: {error}"))
    }
}
