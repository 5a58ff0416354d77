//! Errors raised while lowering a script.

use gamescript_core::{Diagnostic, Span, Type};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CompileError>;

/// An error that aborts emission of the current script.
///
/// Apart from [`CompileError::UnresolvedCaseKey`] these indicate a tree that
/// did not go through type checking correctly.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// A node had no resolved symbol, or one of the wrong kind.
    #[error("unresolved {expected} '{name}'")]
    UnresolvedSymbol {
        name: String,
        /// What kind of symbol the node needed.
        expected: &'static str,
        span: Span,
    },

    /// A type without a stack representation where one is needed.
    #[error("unsupported type '{ty}' in {context}")]
    UnsupportedType {
        ty: Type,
        context: &'static str,
        span: Span,
    },

    /// A condition that is neither a comparison nor a logical operator.
    #[error("invalid condition: {kind}")]
    InvalidCondition { kind: &'static str, span: Span },

    /// An expression kind that is only valid in another position.
    #[error("unexpected {kind} in {context}")]
    UnexpectedExpression {
        kind: &'static str,
        context: &'static str,
        span: Span,
    },

    /// An assignment target that is not a variable.
    #[error("{kind} cannot be assigned to")]
    NotAssignable { kind: &'static str, span: Span },

    /// Only the first target of a multiple assignment may be an array element.
    #[error("array element must be the first assignment target")]
    IndexedTargetInMultiAssignment { span: Span },

    /// A switch case key that does not fold to a constant.
    #[error("switch case key {kind} is not a constant value")]
    UnresolvedCaseKey { kind: &'static str, span: Span },
}

impl CompileError {
    pub fn span(&self) -> Span {
        match self {
            Self::UnresolvedSymbol { span, .. }
            | Self::UnsupportedType { span, .. }
            | Self::InvalidCondition { span, .. }
            | Self::UnexpectedExpression { span, .. }
            | Self::NotAssignable { span, .. }
            | Self::IndexedTargetInMultiAssignment { span }
            | Self::UnresolvedCaseKey { span, .. } => *span,
        }
    }

    /// Whether this is a defect in an earlier phase rather than in the script.
    pub fn is_internal(&self) -> bool {
        !matches!(self, Self::UnresolvedCaseKey { .. })
    }
}

impl From<CompileError> for Diagnostic {
    fn from(error: CompileError) -> Self {
        let message = if error.is_internal() {
            format!("internal compiler error: {error}")
        } else {
            error.to_string()
        };
        Diagnostic::error(error.span(), message)
    }
}
