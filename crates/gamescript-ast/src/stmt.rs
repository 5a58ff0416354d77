//! Statement nodes.

use gamescript_core::{Span, Symbol, Type};

use crate::Expr;

/// A statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stmt<'ast> {
    /// `{ ... }`
    Block(BlockStmt<'ast>),
    If(&'ast IfStmt<'ast>),
    While(&'ast WhileStmt<'ast>),
    Switch(&'ast SwitchStmt<'ast>),
    Return(ReturnStmt<'ast>),
    /// `$a, %b = x, y;`
    Assignment(AssignmentStmt<'ast>),
    /// `def_int $x = ...;`
    Declaration(DeclarationStmt<'ast>),
    /// `def_int $xs(size);`
    ArrayDeclaration(ArrayDeclarationStmt<'ast>),
    /// Call evaluated for its side effects.
    Expr(ExprStmt<'ast>),
    /// `;`
    Empty(Span),
}

impl<'ast> Stmt<'ast> {
    /// Get the span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Self::Block(s) => s.span,
            Self::If(s) => s.span,
            Self::While(s) => s.span,
            Self::Switch(s) => s.span,
            Self::Return(s) => s.span,
            Self::Assignment(s) => s.span,
            Self::Declaration(s) => s.span,
            Self::ArrayDeclaration(s) => s.span,
            Self::Expr(s) => s.span,
            Self::Empty(span) => *span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockStmt<'ast> {
    pub stmts: &'ast [Stmt<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfStmt<'ast> {
    pub condition: &'ast Expr<'ast>,
    pub then_stmt: &'ast Stmt<'ast>,
    pub else_stmt: Option<&'ast Stmt<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhileStmt<'ast> {
    pub condition: &'ast Expr<'ast>,
    pub body: &'ast Stmt<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwitchStmt<'ast> {
    /// Type of the subject, e.g. `int` for `switch_int`.
    pub ty: Type,
    pub subject: &'ast Expr<'ast>,
    pub cases: &'ast [SwitchCase<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwitchCase<'ast> {
    pub keys: &'ast [Expr<'ast>],
    /// `case default`.
    pub is_default: bool,
    pub stmts: &'ast [Stmt<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStmt<'ast> {
    pub exprs: &'ast [Expr<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignmentStmt<'ast> {
    /// Local or game variable expressions, in declared order.
    pub targets: &'ast [Expr<'ast>],
    pub values: &'ast [Expr<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeclarationStmt<'ast> {
    pub name: &'ast str,
    pub ty: Type,
    pub symbol: Option<&'ast Symbol>,
    pub initializer: Option<&'ast Expr<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrayDeclarationStmt<'ast> {
    pub name: &'ast str,
    /// The array type, e.g. `intarray`.
    pub ty: Type,
    pub symbol: Option<&'ast Symbol>,
    pub size: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprStmt<'ast> {
    pub expr: &'ast Expr<'ast>,
    pub span: Span,
}
