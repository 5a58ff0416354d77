//! Return statements and default return values.

use gamescript_ast::ReturnStmt;
use gamescript_core::{BaseVarType, PrimitiveType, Span, Type};

use crate::bytecode::{Instruction, Opcode};
use crate::error::{CompileError, Result};

use super::ScriptCompiler;

/// The push of the default value for `ty`.
///
/// `int` defaults to `0`, every other integer-based type to `-1`.
pub(crate) fn default_value(ty: Type, span: Span) -> Result<Instruction> {
    let instruction = match ty {
        Type::Primitive(PrimitiveType::Int) => Instruction::push_int(0),
        Type::Primitive(p) => match p.base_type() {
            BaseVarType::Integer => Instruction::push_int(-1),
            BaseVarType::String => Instruction::push_string(""),
            BaseVarType::Long => Instruction::push_long(-1),
        },
        Type::Array(_) | Type::Unit => {
            return Err(CompileError::UnsupportedType {
                ty,
                context: "default value",
                span,
            });
        }
    };
    Ok(instruction.with_span(span))
}

impl<'a> ScriptCompiler<'a> {
    /// Compile `return(...)`: values left to right, then `Return`.
    pub fn compile_return<'ast>(&mut self, stmt: &ReturnStmt<'ast>) -> Result<()> {
        for expr in stmt.exprs {
            self.expression(expr)?;
        }
        self.emit(Instruction::simple(Opcode::Return).with_span(stmt.span));
        Ok(())
    }

    /// Push a default for every declared return type, then `Return`.
    ///
    /// Emitted after every body, so control can never run off the end of the
    /// last block.
    pub(super) fn default_return(&mut self, span: Span) -> Result<()> {
        let script = self.script;
        for &ty in &script.returns {
            let value = default_value(ty, span)?;
            self.emit(value);
        }
        self.emit(Instruction::simple(Opcode::Return).with_span(span));
        Ok(())
    }
}
