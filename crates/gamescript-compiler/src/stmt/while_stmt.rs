//! While loop lowering.

use gamescript_ast::WhileStmt;

use crate::bytecode::{Instruction, Opcode};
use crate::error::Result;

use super::ScriptCompiler;

impl<'a> ScriptCompiler<'a> {
    /// Compile a while loop.
    ///
    /// Layout:
    /// ```text
    /// while_start: [condition -> while_body / while_end]
    /// while_body:  [body] Branch while_start
    /// while_end:
    /// ```
    pub fn compile_while<'ast>(&mut self, stmt: &WhileStmt<'ast>) -> Result<()> {
        let start = self.emitter.generate_block("while_start");
        let body = self.emitter.generate_block("while_body");
        let end = self.emitter.generate_block("while_end");

        self.emitter.bind(start.clone());
        self.generate_condition(stmt.condition, &body, &end)?;

        self.emitter.bind(body);
        self.statement(stmt.body)?;
        self.emit(Instruction::branch(Opcode::Branch, start).with_span(stmt.span));

        self.emitter.bind(end);
        Ok(())
    }
}
