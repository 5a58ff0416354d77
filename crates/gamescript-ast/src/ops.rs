//! Operators and call kinds.

use std::fmt;

/// Operators of condition expressions.
///
/// Conditions are only legal in `if` / `while` heads; they never produce a
/// value on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `=`
    Equals,
    /// `!`
    NotEquals,
    /// `<`
    LessThan,
    /// `>`
    GreaterThan,
    /// `<=`
    LessThanOrEquals,
    /// `>=`
    GreaterThanOrEquals,
    /// `&`
    And,
    /// `|`
    Or,
}

impl BinaryOp {
    /// `&` and `|`, which short-circuit.
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Equals => "=",
            BinaryOp::NotEquals => "!",
            BinaryOp::LessThan => "<",
            BinaryOp::GreaterThan => ">",
            BinaryOp::LessThanOrEquals => "<=",
            BinaryOp::GreaterThanOrEquals => ">=",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operators valid inside `calc(...)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Multiply,
    Divide,
    Modulo,
    /// Bitwise `&`.
    And,
    /// Bitwise `|`.
    Or,
}

impl ArithmeticOp {
    pub fn as_str(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Multiply => "*",
            ArithmeticOp::Divide => "/",
            ArithmeticOp::Modulo => "%",
            ArithmeticOp::And => "&",
            ArithmeticOp::Or => "|",
        }
    }
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a call transfers control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    /// Engine command, `name(args)`.
    Command,
    /// Procedure call that returns, `~name(args)`.
    Proc,
    /// Tail transfer to a label that never returns, `@name(args)`.
    Jump,
}
