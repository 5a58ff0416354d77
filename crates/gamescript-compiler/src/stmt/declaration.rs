//! Local declarations and expression statements.

use std::rc::Rc;

use gamescript_ast::{ArrayDeclarationStmt, CallKind, DeclarationStmt, Expr, ExprStmt};
use gamescript_core::{LocalVariableSymbol, Span, Symbol, Type};

use crate::bytecode::{Instruction, Opcode, Operand};
use crate::error::{CompileError, Result};

use super::{ScriptCompiler, default_value};

fn local_symbol(
    symbol: Option<&Symbol>,
    name: &str,
    span: Span,
) -> Result<Rc<LocalVariableSymbol>> {
    match symbol {
        Some(Symbol::Local(local)) => Ok(local.clone()),
        _ => Err(CompileError::UnresolvedSymbol {
            name: name.to_string(),
            expected: "local variable",
            span,
        }),
    }
}

impl<'a> ScriptCompiler<'a> {
    /// `def_int $x = value;` or, without an initializer, the type default.
    pub fn compile_declaration<'ast>(&mut self, stmt: &DeclarationStmt<'ast>) -> Result<()> {
        let local = local_symbol(stmt.symbol, stmt.name, stmt.span)?;

        match stmt.initializer {
            Some(value) => self.expression(value)?,
            None => {
                let value = default_value(stmt.ty, stmt.span)?;
                self.emit(value);
            }
        }

        self.locals.add(local.clone());
        self.emit(
            Instruction::new(Opcode::PopLocal, Operand::Symbol(Symbol::Local(local)))
                .with_span(stmt.span),
        );
        Ok(())
    }

    /// `def_int $xs(size);`
    pub fn compile_array_declaration<'ast>(
        &mut self,
        stmt: &ArrayDeclarationStmt<'ast>,
    ) -> Result<()> {
        let local = local_symbol(stmt.symbol, stmt.name, stmt.span)?;
        if !matches!(stmt.ty, Type::Array(_)) {
            return Err(CompileError::UnsupportedType {
                ty: stmt.ty,
                context: "array declaration",
                span: stmt.span,
            });
        }

        self.expression(stmt.size)?;
        self.locals.add(local.clone());
        self.emit(
            Instruction::new(Opcode::DefineArray, Operand::Symbol(Symbol::Local(local)))
                .with_span(stmt.span),
        );
        Ok(())
    }

    /// Evaluate an expression for its side effects and drop what it leaves
    /// on the stacks, last value first.
    pub fn compile_expr_stmt<'ast>(&mut self, stmt: &ExprStmt<'ast>) -> Result<()> {
        self.expression(stmt.expr)?;

        let produced = produced_types(stmt.expr);
        for ty in produced.iter().rev() {
            let base = ty.base_type().ok_or(CompileError::UnsupportedType {
                ty: *ty,
                context: "discarded value",
                span: stmt.span,
            })?;
            self.emit(Instruction::new(Opcode::Discard, Operand::BaseType(base)).with_span(stmt.span));
        }
        Ok(())
    }
}

/// Types of the values an expression leaves on the stacks.
fn produced_types(expr: &Expr<'_>) -> Vec<Type> {
    match expr {
        Expr::Call(call) if call.kind == CallKind::Jump => Vec::new(),
        Expr::Call(call) => match call.symbol {
            Some(Symbol::Script(script)) => script.returns.clone(),
            Some(Symbol::Command(command)) => command.returns.clone(),
            _ => single(call.ty),
        },
        Expr::Paren(paren) => produced_types(paren.expr),
        other => single(other.ty()),
    }
}

fn single(ty: Type) -> Vec<Type> {
    match ty {
        Type::Unit => Vec::new(),
        ty => vec![ty],
    }
}
