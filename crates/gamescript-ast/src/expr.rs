//! Expression nodes.

use gamescript_core::{Span, Symbol, Type};

use crate::{ArithmeticOp, BinaryOp, CallKind};

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// Literal value
    Literal(LiteralExpr<'ast>),
    /// Bare identifier, bound to a config entry, constant, or argument-less call
    Identifier(IdentifierExpr<'ast>),
    /// `$name` or `$name(index)`
    LocalVariable(LocalVariableExpr<'ast>),
    /// `%name` or `.%name`
    GameVariable(GameVariableExpr<'ast>),
    /// `^name`
    ConstantVariable(ConstantVariableExpr<'ast>),
    /// Condition (`=`, `<`, `&`, ...)
    Binary(&'ast BinaryExpr<'ast>),
    /// Arithmetic inside `calc`
    Arithmetic(&'ast ArithmeticExpr<'ast>),
    /// `calc(...)`
    Calc(&'ast CalcExpr<'ast>),
    /// `( ... )`
    Paren(&'ast ParenExpr<'ast>),
    /// Command, proc or jump call
    Call(&'ast CallExpr<'ast>),
    /// String with `<...>` interpolations
    JoinedString(JoinedStringExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(e) => e.span,
            Self::Identifier(e) => e.span,
            Self::LocalVariable(e) => e.span,
            Self::GameVariable(e) => e.span,
            Self::ConstantVariable(e) => e.span,
            Self::Binary(e) => e.span,
            Self::Arithmetic(e) => e.span,
            Self::Calc(e) => e.span,
            Self::Paren(e) => e.span,
            Self::Call(e) => e.span,
            Self::JoinedString(e) => e.span,
        }
    }

    /// The type resolved by the type checker.
    pub fn ty(&self) -> Type {
        match self {
            Self::Literal(e) => e.ty,
            Self::Identifier(e) => e.ty,
            Self::LocalVariable(e) => e.ty,
            Self::GameVariable(e) => e.ty,
            Self::ConstantVariable(e) => e.ty,
            Self::Binary(_) => Type::BOOLEAN,
            Self::Arithmetic(e) => e.ty,
            Self::Calc(e) => e.ty,
            Self::Paren(e) => e.expr.ty(),
            Self::Call(e) => e.ty,
            Self::JoinedString(_) => Type::STRING,
        }
    }

    /// Name of the node kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::Identifier(_) => "identifier",
            Self::LocalVariable(_) => "local variable",
            Self::GameVariable(_) => "game variable",
            Self::ConstantVariable(_) => "constant",
            Self::Binary(_) => "condition",
            Self::Arithmetic(_) => "arithmetic",
            Self::Calc(_) => "calc",
            Self::Paren(_) => "parenthesis",
            Self::Call(_) => "call",
            Self::JoinedString(_) => "joined string",
        }
    }
}

/// A literal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralExpr<'ast> {
    pub kind: LiteralKind<'ast>,
    pub ty: Type,
    /// A string literal that names a config entry is bound to it.
    pub symbol: Option<&'ast Symbol>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralKind<'ast> {
    Int(i32),
    Bool(bool),
    /// Character literal, stored as its code point.
    Char(i32),
    /// Packed coordinate.
    Coord(i32),
    Long(i64),
    String(&'ast str),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdentifierExpr<'ast> {
    pub name: &'ast str,
    pub ty: Type,
    pub symbol: Option<&'ast Symbol>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalVariableExpr<'ast> {
    pub name: &'ast str,
    /// Element index for array access.
    pub index: Option<&'ast Expr<'ast>>,
    pub ty: Type,
    pub symbol: Option<&'ast Symbol>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameVariableExpr<'ast> {
    pub name: &'ast str,
    /// Access through the secondary pointer slot (`.%name`).
    pub dot: bool,
    pub ty: Type,
    pub symbol: Option<&'ast Symbol>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantVariableExpr<'ast> {
    pub name: &'ast str,
    pub ty: Type,
    /// The constant's value, parsed and checked against `ty`.
    pub sub_expression: Option<&'ast Expr<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    pub left: &'ast Expr<'ast>,
    pub op: BinaryOp,
    pub right: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArithmeticExpr<'ast> {
    pub left: &'ast Expr<'ast>,
    pub op: ArithmeticOp,
    pub right: &'ast Expr<'ast>,
    pub ty: Type,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalcExpr<'ast> {
    pub expr: &'ast Expr<'ast>,
    pub ty: Type,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParenExpr<'ast> {
    pub expr: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallExpr<'ast> {
    pub kind: CallKind,
    pub name: &'ast str,
    pub args: &'ast [Expr<'ast>],
    /// Command invoked against the secondary pointer slot (`.name(...)`).
    pub dot: bool,
    /// Single return type, [`Type::Unit`] for none. Multi-value returns are
    /// read from the callee symbol.
    pub ty: Type,
    pub symbol: Option<&'ast Symbol>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinedStringExpr<'ast> {
    /// Literal pieces and interpolated expressions, in source order.
    pub parts: &'ast [Expr<'ast>],
    pub span: Span,
}
