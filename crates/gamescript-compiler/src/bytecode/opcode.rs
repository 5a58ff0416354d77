//! Instruction set.
//!
//! Opcodes are symbolic here; the binary writer assigns the numeric ids the
//! interpreter expects. The discriminant is still stable so that tables can
//! be indexed by it.

use num_enum::{IntoPrimitive, TryFromPrimitive};

use gamescript_core::BaseVarType;

/// Operation codes.
///
/// The interpreter is a stack machine with separate integer, string and
/// long stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u16)]
pub enum Opcode {
    // =========================================================================
    // Constants
    // =========================================================================
    /// Operand: `Int`
    PushConstantInt = 0,
    /// Operand: `String`
    PushConstantString,
    /// Operand: `Long`
    PushConstantLong,
    /// Config entry or constant reference. Operand: `Symbol`
    PushConstantSymbol,

    // =========================================================================
    // Locals
    // =========================================================================
    /// Operand: `Symbol` (local)
    PushLocal,
    /// Operand: `Symbol` (local)
    PopLocal,
    /// Size on the stack. Operand: `Symbol` (local array)
    DefineArray,
    /// Index on the stack. Operand: `Symbol` (local array)
    PushArrayInt,
    /// Index then value on the stack. Operand: `Symbol` (local array)
    PopArrayInt,

    // =========================================================================
    // Engine variables
    // =========================================================================
    /// Operand: `Symbol` (game variable)
    PushVar,
    /// Operand: `Symbol` (game variable)
    PopVar,
    /// Secondary pointer slot. Operand: `Symbol` (game variable)
    PushVar2,
    /// Secondary pointer slot. Operand: `Symbol` (game variable)
    PopVar2,

    // =========================================================================
    // Branches (operand: `Label`)
    // =========================================================================
    /// Unconditional.
    Branch,
    BranchNot,
    BranchEquals,
    BranchLessThan,
    BranchGreaterThan,
    BranchLessThanOrEquals,
    BranchGreaterThanOrEquals,
    LongBranchNot,
    LongBranchEquals,
    LongBranchLessThan,
    LongBranchGreaterThan,
    LongBranchLessThanOrEquals,
    LongBranchGreaterThanOrEquals,
    /// String and object comparison.
    ObjBranchNot,
    ObjBranchEquals,

    // =========================================================================
    // Control
    // =========================================================================
    /// Operand: `Switch`
    Switch,
    /// Call a proc and continue. Operand: `Symbol` (script)
    Gosub,
    /// Transfer to a label, never returning. Operand: `Symbol` (script)
    Jump,
    /// Operand: `Symbol` (command)
    Command,
    Return,

    // =========================================================================
    // Values
    // =========================================================================
    /// Operand: `Count`
    JoinString,
    /// Drop the top of a stack. Operand: `BaseType`
    Discard,

    // =========================================================================
    // Arithmetic
    // =========================================================================
    Add,
    Sub,
    Multiply,
    Divide,
    Modulo,
    And,
    Or,
    LongAdd,
    LongSub,
    LongMultiply,
    LongDivide,
    LongModulo,
    LongAnd,
    LongOr,

    // =========================================================================
    // Debug
    // =========================================================================
    /// Source line marker for the line table. Operand: `Line`
    LineNumber,
}

impl Opcode {
    /// Every opcode whose operand is a label.
    pub fn is_branch(self) -> bool {
        matches!(
            self,
            Opcode::Branch
                | Opcode::BranchNot
                | Opcode::BranchEquals
                | Opcode::BranchLessThan
                | Opcode::BranchGreaterThan
                | Opcode::BranchLessThanOrEquals
                | Opcode::BranchGreaterThanOrEquals
                | Opcode::LongBranchNot
                | Opcode::LongBranchEquals
                | Opcode::LongBranchLessThan
                | Opcode::LongBranchGreaterThan
                | Opcode::LongBranchLessThanOrEquals
                | Opcode::LongBranchGreaterThanOrEquals
                | Opcode::ObjBranchNot
                | Opcode::ObjBranchEquals
        )
    }

    /// Branches that compare two operands and may fall through.
    pub fn is_conditional_branch(self) -> bool {
        self.is_branch() && self != Opcode::Branch
    }

    /// Control never continues to the next instruction.
    pub fn is_terminal(self) -> bool {
        matches!(self, Opcode::Branch | Opcode::Jump | Opcode::Return)
    }

    /// Carries no control-flow or stack meaning.
    pub fn is_marker(self) -> bool {
        self == Opcode::LineNumber
    }

    /// Stable index of this opcode, usable for fixed-size tables.
    pub fn index(self) -> usize {
        u16::from(self) as usize
    }
}

/// Comparison kinds a compare-and-branch can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Equals,
    NotEquals,
    LessThan,
    GreaterThan,
    LessThanOrEquals,
    GreaterThanOrEquals,
}

impl Comparison {
    /// The compare-and-branch opcode for operands of `base` type.
    ///
    /// Strings and objects only support (in)equality.
    pub fn branch_opcode(self, base: BaseVarType) -> Option<Opcode> {
        use Comparison::*;
        Some(match (base, self) {
            (BaseVarType::Integer, Equals) => Opcode::BranchEquals,
            (BaseVarType::Integer, NotEquals) => Opcode::BranchNot,
            (BaseVarType::Integer, LessThan) => Opcode::BranchLessThan,
            (BaseVarType::Integer, GreaterThan) => Opcode::BranchGreaterThan,
            (BaseVarType::Integer, LessThanOrEquals) => Opcode::BranchLessThanOrEquals,
            (BaseVarType::Integer, GreaterThanOrEquals) => Opcode::BranchGreaterThanOrEquals,
            (BaseVarType::Long, Equals) => Opcode::LongBranchEquals,
            (BaseVarType::Long, NotEquals) => Opcode::LongBranchNot,
            (BaseVarType::Long, LessThan) => Opcode::LongBranchLessThan,
            (BaseVarType::Long, GreaterThan) => Opcode::LongBranchGreaterThan,
            (BaseVarType::Long, LessThanOrEquals) => Opcode::LongBranchLessThanOrEquals,
            (BaseVarType::Long, GreaterThanOrEquals) => Opcode::LongBranchGreaterThanOrEquals,
            (BaseVarType::String, Equals) => Opcode::ObjBranchEquals,
            (BaseVarType::String, NotEquals) => Opcode::ObjBranchNot,
            (BaseVarType::String, _) => return None,
        })
    }
}
