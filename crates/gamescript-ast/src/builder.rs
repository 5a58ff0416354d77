//! Arena-backed constructors for resolved trees.
//!
//! The type checker and the tests build trees through this instead of
//! spelling out every node. All nodes get the builder's current span, which
//! [`TreeBuilder::at`] moves.

use std::cell::Cell;
use std::rc::Rc;

use bumpalo::Bump;
use gamescript_core::{
    CommandSymbol, ConfigSymbol, ConstantSymbol, GameVariableSymbol, LocalVariableSymbol,
    ScriptSymbol, Span, Symbol, Type,
};

use crate::*;

pub struct TreeBuilder<'ast> {
    arena: &'ast Bump,
    span: Cell<Span>,
}

impl<'ast> TreeBuilder<'ast> {
    pub fn new(arena: &'ast Bump) -> Self {
        Self {
            arena,
            span: Cell::new(Span::line(1)),
        }
    }

    /// Nodes built after this call are placed on `line`.
    pub fn at(&self, line: u32) -> &Self {
        self.span.set(Span::line(line));
        self
    }

    pub fn span(&self) -> Span {
        self.span.get()
    }

    fn symbol(&self, symbol: Symbol) -> &'ast Symbol {
        self.arena.alloc(symbol)
    }

    fn exprs(&self, exprs: &[Expr<'ast>]) -> &'ast [Expr<'ast>] {
        self.arena.alloc_slice_copy(exprs)
    }

    fn stmts(&self, stmts: &[Stmt<'ast>]) -> &'ast [Stmt<'ast>] {
        self.arena.alloc_slice_copy(stmts)
    }

    // ==========================================================================
    // Literals
    // ==========================================================================

    fn literal(&self, kind: LiteralKind<'ast>, ty: Type) -> Expr<'ast> {
        Expr::Literal(LiteralExpr {
            kind,
            ty,
            symbol: None,
            span: self.span(),
        })
    }

    pub fn int(&self, value: i32) -> Expr<'ast> {
        self.literal(LiteralKind::Int(value), Type::INT)
    }

    pub fn boolean(&self, value: bool) -> Expr<'ast> {
        self.literal(LiteralKind::Bool(value), Type::BOOLEAN)
    }

    pub fn coord(&self, packed: i32) -> Expr<'ast> {
        self.literal(LiteralKind::Coord(packed), Type::COORD)
    }

    pub fn long(&self, value: i64) -> Expr<'ast> {
        self.literal(LiteralKind::Long(value), Type::LONG)
    }

    pub fn string(&self, value: &str) -> Expr<'ast> {
        let value = self.arena.alloc_str(value);
        self.literal(LiteralKind::String(value), Type::STRING)
    }

    pub fn null(&self, ty: Type) -> Expr<'ast> {
        self.literal(LiteralKind::Null, ty)
    }

    /// A string literal the type checker resolved to a config entry.
    pub fn config_string(&self, config: &Rc<ConfigSymbol>) -> Expr<'ast> {
        let value = self.arena.alloc_str(&config.name);
        Expr::Literal(LiteralExpr {
            kind: LiteralKind::String(value),
            ty: config.ty,
            symbol: Some(self.symbol(Symbol::Config(config.clone()))),
            span: self.span(),
        })
    }

    // ==========================================================================
    // References
    // ==========================================================================

    pub fn identifier(&self, symbol: Symbol, ty: Type) -> Expr<'ast> {
        let name = self.arena.alloc_str(symbol.name());
        Expr::Identifier(IdentifierExpr {
            name,
            ty,
            symbol: Some(self.symbol(symbol)),
            span: self.span(),
        })
    }

    pub fn config(&self, config: &Rc<ConfigSymbol>) -> Expr<'ast> {
        self.identifier(Symbol::Config(config.clone()), config.ty)
    }

    /// An identifier the type checker left unbound.
    pub fn unresolved_identifier(&self, name: &str, ty: Type) -> Expr<'ast> {
        Expr::Identifier(IdentifierExpr {
            name: self.arena.alloc_str(name),
            ty,
            symbol: None,
            span: self.span(),
        })
    }

    pub fn local(&self, local: &Rc<LocalVariableSymbol>) -> Expr<'ast> {
        Expr::LocalVariable(LocalVariableExpr {
            name: self.arena.alloc_str(&local.name),
            index: None,
            ty: local.ty,
            symbol: Some(self.symbol(Symbol::Local(local.clone()))),
            span: self.span(),
        })
    }

    /// `$name(index)`; the element type is the array's element type.
    pub fn local_element(&self, local: &Rc<LocalVariableSymbol>, index: Expr<'ast>) -> Expr<'ast> {
        let element = match local.ty {
            Type::Array(p) => Type::Primitive(p),
            other => other,
        };
        Expr::LocalVariable(LocalVariableExpr {
            name: self.arena.alloc_str(&local.name),
            index: Some(self.arena.alloc(index)),
            ty: element,
            symbol: Some(self.symbol(Symbol::Local(local.clone()))),
            span: self.span(),
        })
    }

    pub fn game(&self, var: &Rc<GameVariableSymbol>) -> Expr<'ast> {
        self.game_var(var, false)
    }

    pub fn dot_game(&self, var: &Rc<GameVariableSymbol>) -> Expr<'ast> {
        self.game_var(var, true)
    }

    fn game_var(&self, var: &Rc<GameVariableSymbol>, dot: bool) -> Expr<'ast> {
        Expr::GameVariable(GameVariableExpr {
            name: self.arena.alloc_str(&var.name),
            dot,
            ty: var.ty,
            symbol: Some(self.symbol(Symbol::Game(var.clone()))),
            span: self.span(),
        })
    }

    /// `^name`, with the value the type checker parsed from its definition.
    pub fn constant(&self, constant: &Rc<ConstantSymbol>, ty: Type, value: Option<Expr<'ast>>) -> Expr<'ast> {
        Expr::ConstantVariable(ConstantVariableExpr {
            name: self.arena.alloc_str(&constant.name),
            ty,
            sub_expression: value.map(|v| &*self.arena.alloc(v)),
            span: self.span(),
        })
    }

    // ==========================================================================
    // Operators
    // ==========================================================================

    pub fn binary(&self, left: Expr<'ast>, op: BinaryOp, right: Expr<'ast>) -> Expr<'ast> {
        Expr::Binary(self.arena.alloc(BinaryExpr {
            left: self.arena.alloc(left),
            op,
            right: self.arena.alloc(right),
            span: self.span(),
        }))
    }

    pub fn equals(&self, left: Expr<'ast>, right: Expr<'ast>) -> Expr<'ast> {
        self.binary(left, BinaryOp::Equals, right)
    }

    pub fn and(&self, left: Expr<'ast>, right: Expr<'ast>) -> Expr<'ast> {
        self.binary(left, BinaryOp::And, right)
    }

    pub fn or(&self, left: Expr<'ast>, right: Expr<'ast>) -> Expr<'ast> {
        self.binary(left, BinaryOp::Or, right)
    }

    pub fn arithmetic(&self, left: Expr<'ast>, op: ArithmeticOp, right: Expr<'ast>) -> Expr<'ast> {
        let ty = left.ty();
        Expr::Arithmetic(self.arena.alloc(ArithmeticExpr {
            left: self.arena.alloc(left),
            op,
            right: self.arena.alloc(right),
            ty,
            span: self.span(),
        }))
    }

    pub fn calc(&self, expr: Expr<'ast>) -> Expr<'ast> {
        let ty = expr.ty();
        Expr::Calc(self.arena.alloc(CalcExpr {
            expr: self.arena.alloc(expr),
            ty,
            span: self.span(),
        }))
    }

    pub fn paren(&self, expr: Expr<'ast>) -> Expr<'ast> {
        Expr::Paren(self.arena.alloc(ParenExpr {
            expr: self.arena.alloc(expr),
            span: self.span(),
        }))
    }

    pub fn joined(&self, parts: &[Expr<'ast>]) -> Expr<'ast> {
        Expr::JoinedString(JoinedStringExpr {
            parts: self.exprs(parts),
            span: self.span(),
        })
    }

    // ==========================================================================
    // Calls
    // ==========================================================================

    fn call(
        &self,
        kind: CallKind,
        name: &str,
        args: &[Expr<'ast>],
        dot: bool,
        returns: &[Type],
        symbol: Option<Symbol>,
    ) -> Expr<'ast> {
        let ty = match returns {
            [single] => *single,
            _ => Type::Unit,
        };
        Expr::Call(self.arena.alloc(CallExpr {
            kind,
            name: self.arena.alloc_str(name),
            args: self.exprs(args),
            dot,
            ty,
            symbol: symbol.map(|s| self.symbol(s)),
            span: self.span(),
        }))
    }

    pub fn command(&self, command: &Rc<CommandSymbol>, args: &[Expr<'ast>]) -> Expr<'ast> {
        self.call(
            CallKind::Command,
            &command.name,
            args,
            false,
            &command.returns,
            Some(Symbol::Command(command.clone())),
        )
    }

    /// `.name(args)`, run against the secondary pointers.
    pub fn dot_command(&self, command: &Rc<CommandSymbol>, args: &[Expr<'ast>]) -> Expr<'ast> {
        self.call(
            CallKind::Command,
            &command.name,
            args,
            true,
            &command.returns,
            Some(Symbol::Command(command.clone())),
        )
    }

    pub fn proc(&self, script: &Rc<ScriptSymbol>, args: &[Expr<'ast>]) -> Expr<'ast> {
        self.call(
            CallKind::Proc,
            &script.name,
            args,
            false,
            &script.returns,
            Some(Symbol::Script(script.clone())),
        )
    }

    pub fn jump(&self, script: &Rc<ScriptSymbol>, args: &[Expr<'ast>]) -> Expr<'ast> {
        self.call(
            CallKind::Jump,
            &script.name,
            args,
            false,
            &[],
            Some(Symbol::Script(script.clone())),
        )
    }

    /// A call whose callee the type checker failed to bind.
    pub fn unresolved_call(&self, kind: CallKind, name: &str, args: &[Expr<'ast>]) -> Expr<'ast> {
        self.call(kind, name, args, false, &[], None)
    }

    // ==========================================================================
    // Statements
    // ==========================================================================

    pub fn block(&self, stmts: &[Stmt<'ast>]) -> Stmt<'ast> {
        Stmt::Block(BlockStmt {
            stmts: self.stmts(stmts),
            span: self.span(),
        })
    }

    pub fn if_stmt(
        &self,
        condition: Expr<'ast>,
        then_stmt: Stmt<'ast>,
        else_stmt: Option<Stmt<'ast>>,
    ) -> Stmt<'ast> {
        Stmt::If(self.arena.alloc(IfStmt {
            condition: self.arena.alloc(condition),
            then_stmt: self.arena.alloc(then_stmt),
            else_stmt: else_stmt.map(|s| &*self.arena.alloc(s)),
            span: self.span(),
        }))
    }

    pub fn while_stmt(&self, condition: Expr<'ast>, body: Stmt<'ast>) -> Stmt<'ast> {
        Stmt::While(self.arena.alloc(WhileStmt {
            condition: self.arena.alloc(condition),
            body: self.arena.alloc(body),
            span: self.span(),
        }))
    }

    pub fn switch(&self, ty: Type, subject: Expr<'ast>, cases: &[SwitchCase<'ast>]) -> Stmt<'ast> {
        Stmt::Switch(self.arena.alloc(SwitchStmt {
            ty,
            subject: self.arena.alloc(subject),
            cases: self.arena.alloc_slice_copy(cases),
            span: self.span(),
        }))
    }

    pub fn case(&self, keys: &[Expr<'ast>], stmts: &[Stmt<'ast>]) -> SwitchCase<'ast> {
        SwitchCase {
            keys: self.exprs(keys),
            is_default: false,
            stmts: self.stmts(stmts),
            span: self.span(),
        }
    }

    pub fn default_case(&self, stmts: &[Stmt<'ast>]) -> SwitchCase<'ast> {
        SwitchCase {
            keys: &[],
            is_default: true,
            stmts: self.stmts(stmts),
            span: self.span(),
        }
    }

    pub fn return_stmt(&self, exprs: &[Expr<'ast>]) -> Stmt<'ast> {
        Stmt::Return(ReturnStmt {
            exprs: self.exprs(exprs),
            span: self.span(),
        })
    }

    pub fn assign(&self, targets: &[Expr<'ast>], values: &[Expr<'ast>]) -> Stmt<'ast> {
        Stmt::Assignment(AssignmentStmt {
            targets: self.exprs(targets),
            values: self.exprs(values),
            span: self.span(),
        })
    }

    pub fn declare(&self, local: &Rc<LocalVariableSymbol>, initializer: Option<Expr<'ast>>) -> Stmt<'ast> {
        Stmt::Declaration(DeclarationStmt {
            name: self.arena.alloc_str(&local.name),
            ty: local.ty,
            symbol: Some(self.symbol(Symbol::Local(local.clone()))),
            initializer: initializer.map(|e| &*self.arena.alloc(e)),
            span: self.span(),
        })
    }

    pub fn declare_array(&self, local: &Rc<LocalVariableSymbol>, size: Expr<'ast>) -> Stmt<'ast> {
        Stmt::ArrayDeclaration(ArrayDeclarationStmt {
            name: self.arena.alloc_str(&local.name),
            ty: local.ty,
            symbol: Some(self.symbol(Symbol::Local(local.clone()))),
            size: self.arena.alloc(size),
            span: self.span(),
        })
    }

    pub fn expr_stmt(&self, expr: Expr<'ast>) -> Stmt<'ast> {
        Stmt::Expr(ExprStmt {
            expr: self.arena.alloc(expr),
            span: self.span(),
        })
    }

    pub fn empty(&self) -> Stmt<'ast> {
        Stmt::Empty(self.span())
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    pub fn script(
        &self,
        symbol: &Rc<ScriptSymbol>,
        parameters: &[Rc<LocalVariableSymbol>],
        body: &[Stmt<'ast>],
    ) -> ScriptDecl<'ast> {
        ScriptDecl {
            symbol: self.arena.alloc(symbol.clone()),
            parameters: self.arena.alloc_slice_clone(parameters),
            body: self.stmts(body),
            span: self.span(),
        }
    }

    pub fn file(&self, name: &str, scripts: &[ScriptDecl<'ast>]) -> ScriptFile<'ast> {
        ScriptFile {
            name: self.arena.alloc_str(name),
            scripts: self.arena.alloc_slice_copy(scripts),
        }
    }
}
