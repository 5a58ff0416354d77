//! Command, proc and jump calls.

use gamescript_ast::{CallExpr, CallKind, Expr};
use gamescript_core::{Symbol, Trigger};

use crate::bytecode::{Instruction, Opcode, Operand};
use crate::error::{CompileError, Result};
use crate::stmt::ScriptCompiler;

impl<'a> ScriptCompiler<'a> {
    /// Lower a call, deferring to a dynamic handler when one is registered
    /// for the command.
    pub fn call<'ast>(&mut self, call: &CallExpr<'ast>) -> Result<()> {
        if call.kind == CallKind::Command {
            let dynamic = self.dynamic;
            if let Some(handler) = dynamic.get(call.name) {
                return handler.generate(self, call);
            }
        }

        self.arguments(call.args)?;
        self.invoke(call)
    }

    /// Arguments, left to right.
    pub fn arguments<'ast>(&mut self, args: &[Expr<'ast>]) -> Result<()> {
        for arg in args {
            self.expression(arg)?;
        }
        Ok(())
    }

    /// The call instruction itself, against the resolved callee.
    pub fn invoke<'ast>(&mut self, call: &CallExpr<'ast>) -> Result<()> {
        let (opcode, expected) = match call.kind {
            CallKind::Command => (Opcode::Command, "command"),
            CallKind::Proc => (Opcode::Gosub, "proc"),
            CallKind::Jump => (Opcode::Jump, "label"),
        };

        let symbol = match (call.kind, call.symbol) {
            (CallKind::Command, Some(symbol @ Symbol::Command(_))) => symbol.clone(),
            (CallKind::Proc, Some(symbol @ Symbol::Script(script)))
                if script.trigger == Trigger::Proc =>
            {
                symbol.clone()
            }
            (CallKind::Jump, Some(symbol @ Symbol::Script(script)))
                if script.trigger == Trigger::Label =>
            {
                symbol.clone()
            }
            _ => {
                return Err(CompileError::UnresolvedSymbol {
                    name: call.name.to_string(),
                    expected,
                    span: call.span,
                });
            }
        };

        self.emit(Instruction::new(opcode, Operand::Symbol(symbol)).with_span(call.span));
        Ok(())
    }
}
