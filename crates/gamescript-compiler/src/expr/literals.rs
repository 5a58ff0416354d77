//! Literal lowering.

use gamescript_ast::{LiteralExpr, LiteralKind};
use gamescript_core::BaseVarType;

use crate::bytecode::{Instruction, Opcode, Operand};
use crate::error::{CompileError, Result};
use crate::stmt::ScriptCompiler;

impl<'a> ScriptCompiler<'a> {
    pub(crate) fn literal<'ast>(&mut self, literal: &LiteralExpr<'ast>) -> Result<()> {
        let instruction = match literal.kind {
            LiteralKind::Int(v) | LiteralKind::Char(v) | LiteralKind::Coord(v) => {
                Instruction::push_int(v)
            }
            LiteralKind::Bool(v) => Instruction::push_int(v as i32),
            LiteralKind::Long(v) => Instruction::push_long(v),
            // A string naming a config entry is a reference to that entry.
            LiteralKind::String(value) => match literal.symbol {
                Some(symbol) => {
                    Instruction::new(Opcode::PushConstantSymbol, Operand::Symbol(symbol.clone()))
                }
                None => Instruction::push_string(value),
            },
            LiteralKind::Null => match literal.ty.base_type() {
                Some(BaseVarType::Integer) => Instruction::push_int(-1),
                Some(BaseVarType::Long) => Instruction::push_long(-1),
                _ => {
                    return Err(CompileError::UnsupportedType {
                        ty: literal.ty,
                        context: "null literal",
                        span: literal.span,
                    });
                }
            },
        };
        self.emit(instruction.with_span(literal.span));
        Ok(())
    }
}
