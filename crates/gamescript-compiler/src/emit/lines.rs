use gamescript_core::Span;

use crate::bytecode::{Instruction, Opcode, Operand};

/// Emits a line marker only when the source line changes.
#[derive(Debug)]
pub struct LineTracker {
    enabled: bool,
    last: Option<u32>,
}

impl LineTracker {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            last: None,
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
    }

    /// The marker to emit for `span`, if any.
    pub fn mark(&mut self, span: Span) -> Option<Instruction> {
        if !self.enabled || !span.is_known() || self.last == Some(span.line) {
            return None;
        }
        self.last = Some(span.line);
        Some(Instruction::new(Opcode::LineNumber, Operand::Line(span.line)).with_span(span))
    }
}
