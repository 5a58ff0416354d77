//! Assignment lowering.

use gamescript_ast::{AssignmentStmt, Expr};
use gamescript_core::Symbol;

use crate::bytecode::{Instruction, Opcode, Operand};
use crate::error::{CompileError, Result};

use super::ScriptCompiler;

impl<'a> ScriptCompiler<'a> {
    /// Compile `$a, %b = x, y;`.
    ///
    /// The index of an array element in first position is evaluated before
    /// the values, leaving it directly under the element's value once the
    /// later targets are popped. Values are evaluated left to right and the
    /// targets popped right to left, so each target receives its matching
    /// value.
    pub fn compile_assignment<'ast>(&mut self, stmt: &AssignmentStmt<'ast>) -> Result<()> {
        let Some((first, rest)) = stmt.targets.split_first() else {
            return Ok(());
        };

        if let Some(indexed) = rest.iter().find(|t| is_element(t)) {
            return Err(CompileError::IndexedTargetInMultiAssignment {
                span: indexed.span(),
            });
        }
        if let Expr::LocalVariable(target) = first
            && let Some(index) = target.index
        {
            self.expression(index)?;
        }

        for value in stmt.values {
            self.expression(value)?;
        }

        for target in stmt.targets.iter().rev() {
            self.pop_target(target)?;
        }
        Ok(())
    }

    fn pop_target<'ast>(&mut self, target: &Expr<'ast>) -> Result<()> {
        let span = target.span();
        let instruction = match target {
            Expr::LocalVariable(local) => {
                let symbol = match local.symbol {
                    Some(symbol @ Symbol::Local(_)) => symbol.clone(),
                    _ => {
                        return Err(CompileError::UnresolvedSymbol {
                            name: local.name.to_string(),
                            expected: "local variable",
                            span,
                        });
                    }
                };
                let opcode = if local.index.is_some() {
                    Opcode::PopArrayInt
                } else {
                    Opcode::PopLocal
                };
                Instruction::new(opcode, Operand::Symbol(symbol))
            }
            Expr::GameVariable(var) => {
                let symbol = match var.symbol {
                    Some(symbol @ Symbol::Game(_)) => symbol.clone(),
                    _ => {
                        return Err(CompileError::UnresolvedSymbol {
                            name: var.name.to_string(),
                            expected: "game variable",
                            span,
                        });
                    }
                };
                let opcode = if var.dot { Opcode::PopVar2 } else { Opcode::PopVar };
                Instruction::new(opcode, Operand::Symbol(symbol))
            }
            other => {
                return Err(CompileError::NotAssignable {
                    kind: other.kind_name(),
                    span,
                });
            }
        };
        self.emit(instruction.with_span(span));
        Ok(())
    }
}

fn is_element(target: &Expr<'_>) -> bool {
    matches!(target, Expr::LocalVariable(local) if local.index.is_some())
}
