//! Instructions and their operands.

use std::fmt;

use gamescript_core::{BaseVarType, Span, Symbol};

use super::{Label, Opcode, SwitchTableId};

/// Operand of an instruction. Which variant is valid depends on the opcode.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    None,
    Int(i32),
    Long(i64),
    String(String),
    Symbol(Symbol),
    Label(Label),
    Switch(SwitchTableId),
    /// Number of stack values consumed, e.g. by `JoinString`.
    Count(u32),
    BaseType(BaseVarType),
    Line(u32),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::None => Ok(()),
            Operand::Int(v) => write!(f, "{v}"),
            Operand::Long(v) => write!(f, "{v}L"),
            Operand::String(s) => write!(f, "{s:?}"),
            Operand::Symbol(s) => write!(f, "{s}"),
            Operand::Label(l) => write!(f, "{l}"),
            Operand::Switch(id) => write!(f, "table{}", id.0),
            Operand::Count(n) => write!(f, "{n}"),
            Operand::BaseType(b) => write!(f, "{b}"),
            Operand::Line(n) => write!(f, "line {n}"),
        }
    }
}

/// A single bytecode operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operand: Operand,
    pub span: Option<Span>,
}

impl Instruction {
    pub fn new(opcode: Opcode, operand: Operand) -> Self {
        Self {
            opcode,
            operand,
            span: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn simple(opcode: Opcode) -> Self {
        Self::new(opcode, Operand::None)
    }

    pub fn push_int(value: i32) -> Self {
        Self::new(Opcode::PushConstantInt, Operand::Int(value))
    }

    pub fn push_string(value: impl Into<String>) -> Self {
        Self::new(Opcode::PushConstantString, Operand::String(value.into()))
    }

    pub fn push_long(value: i64) -> Self {
        Self::new(Opcode::PushConstantLong, Operand::Long(value))
    }

    pub fn branch(opcode: Opcode, label: Label) -> Self {
        debug_assert!(opcode.is_branch());
        Self::new(opcode, Operand::Label(label))
    }

    pub fn label(&self) -> Option<&Label> {
        match &self.operand {
            Operand::Label(l) => Some(l),
            _ => None,
        }
    }

    pub fn int(&self) -> Option<i32> {
        match self.operand {
            Operand::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn symbol(&self) -> Option<&Symbol> {
        match &self.operand {
            Operand::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn switch_table(&self) -> Option<SwitchTableId> {
        match self.operand {
            Operand::Switch(id) => Some(id),
            _ => None,
        }
    }

    /// `PushConstantInt` with exactly `value`.
    pub fn is_push_int(&self, value: i32) -> bool {
        self.opcode == Opcode::PushConstantInt && self.int() == Some(value)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operand {
            Operand::None => write!(f, "{:?}", self.opcode),
            _ => write!(f, "{:?} {}", self.opcode, self.operand),
        }
    }
}

/// A constant a switch case key resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Int(i32),
    Long(i64),
    String(String),
    /// Config entry or constant, numbered by the binary writer.
    Symbol(Symbol),
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int(v) => write!(f, "{v}"),
            Constant::Long(v) => write!(f, "{v}L"),
            Constant::String(s) => write!(f, "{s:?}"),
            Constant::Symbol(s) => write!(f, "{s}"),
        }
    }
}
