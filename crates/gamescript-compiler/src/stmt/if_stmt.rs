//! If/else lowering.

use gamescript_ast::IfStmt;

use crate::bytecode::{Instruction, Opcode};
use crate::error::Result;

use super::ScriptCompiler;

impl<'a> ScriptCompiler<'a> {
    /// Compile an if statement.
    ///
    /// Layout:
    /// ```text
    /// [condition -> if_true / (if_else | if_end)]
    /// if_true:  [then] Branch if_end
    /// if_else:  [else] Branch if_end
    /// if_end:
    /// ```
    pub fn compile_if<'ast>(&mut self, stmt: &IfStmt<'ast>) -> Result<()> {
        let when_true = self.emitter.generate_block("if_true");
        let when_else = stmt
            .else_stmt
            .map(|_| self.emitter.generate_block("if_else"));
        let end = self.emitter.generate_block("if_end");

        let when_false = when_else.clone().unwrap_or_else(|| end.clone());
        self.generate_condition(stmt.condition, &when_true, &when_false)?;

        self.emitter.bind(when_true);
        self.statement(stmt.then_stmt)?;
        self.emit(Instruction::branch(Opcode::Branch, end.clone()).with_span(stmt.span));

        if let (Some(label), Some(else_stmt)) = (when_else, stmt.else_stmt) {
            self.emitter.bind(label);
            self.statement(else_stmt)?;
            self.emit(Instruction::branch(Opcode::Branch, end.clone()).with_span(stmt.span));
        }

        self.emitter.bind(end);
        Ok(())
    }
}
