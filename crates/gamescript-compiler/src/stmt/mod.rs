//! Statement lowering.
//!
//! The [`ScriptCompiler`] walks the body of one script and lowers it into the
//! blocks of a [`BlockEmitter`]. Expression lowering lives in
//! [`crate::expr`] as further `impl` blocks on the same type.
//!
//! # Example
//!
//! ```ignore
//! let mut compiler = ScriptCompiler::new(&mut emitter, &mut locals, &symbols, &dynamic, &script);
//! compiler.compile_body(decl.body, decl.span)?;
//! ```

mod assignment;
mod declaration;
mod if_stmt;
mod return_stmt;
mod switch_stmt;
mod while_stmt;

use gamescript_ast::Stmt;
use gamescript_core::{ScriptSymbol, Span, SymbolTable};

use crate::bytecode::{Instruction, LocalTable};
use crate::dynamic::DynamicCommands;
use crate::emit::BlockEmitter;
use crate::error::Result;

pub(crate) use return_stmt::default_value;

/// Lowers the statements and expressions of a single script.
pub struct ScriptCompiler<'a> {
    /// Emitter holding the blocks of the script
    pub(crate) emitter: &'a mut BlockEmitter,
    /// Parameters and locals declared so far
    pub(crate) locals: &'a mut LocalTable,
    /// Fallback lookup for identifiers folded into switch keys
    pub(crate) symbols: &'a SymbolTable,
    /// Commands whose code generation is overridden
    pub(crate) dynamic: &'a DynamicCommands,
    /// The script being compiled
    pub(crate) script: &'a ScriptSymbol,
}

impl<'a> ScriptCompiler<'a> {
    pub fn new(
        emitter: &'a mut BlockEmitter,
        locals: &'a mut LocalTable,
        symbols: &'a SymbolTable,
        dynamic: &'a DynamicCommands,
        script: &'a ScriptSymbol,
    ) -> Self {
        Self {
            emitter,
            locals,
            symbols,
            dynamic,
            script,
        }
    }

    pub fn script(&self) -> &ScriptSymbol {
        self.script
    }

    pub fn emitter(&mut self) -> &mut BlockEmitter {
        &mut *self.emitter
    }

    /// Append an instruction to the active block.
    pub fn emit(&mut self, instruction: Instruction) {
        self.emitter.emit(instruction);
    }

    /// Lower a script body followed by its default return.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_body<'ast>(&mut self, body: &[Stmt<'ast>], span: Span) -> Result<()> {
        self.statements(body)?;
        self.default_return(span)
    }

    pub fn statements<'ast>(&mut self, stmts: &[Stmt<'ast>]) -> Result<()> {
        for stmt in stmts {
            self.statement(stmt)?;
        }
        Ok(())
    }

    pub fn statement<'ast>(&mut self, stmt: &Stmt<'ast>) -> Result<()> {
        if !matches!(stmt, Stmt::Block(_)) {
            self.emitter.line(stmt.span());
        }

        match stmt {
            Stmt::Block(block) => self.statements(block.stmts),
            Stmt::If(if_stmt) => self.compile_if(if_stmt),
            Stmt::While(while_stmt) => self.compile_while(while_stmt),
            Stmt::Switch(switch) => self.compile_switch(switch),
            Stmt::Return(ret) => self.compile_return(ret),
            Stmt::Assignment(assign) => self.compile_assignment(assign),
            Stmt::Declaration(decl) => self.compile_declaration(decl),
            Stmt::ArrayDeclaration(decl) => self.compile_array_declaration(decl),
            Stmt::Expr(expr) => self.compile_expr_stmt(expr),
            Stmt::Empty(_) => Ok(()),
        }
    }
}
