//! gamescript bytecode generator
//!
//! Lowers type-resolved script trees into labeled basic blocks.
//!
//! ## Modules
//!
//! - [`bytecode`]: The emitted representation (opcodes, instructions, blocks, switch tables)
//! - [`emit`]: Block emitter with label generation and line tracking
//! - [`stmt`]: Statement lowering ([`ScriptCompiler`])
//! - [`expr`]: Expression and short-circuit condition lowering
//! - [`dynamic`]: Commands with custom code generation

pub mod bytecode;
pub mod dynamic;
pub mod emit;
mod error;
pub mod expr;
pub mod stmt;

use std::rc::Rc;

use gamescript_ast::{ScriptDecl, ScriptFile};
use gamescript_core::{Diagnostic, Diagnostics, SymbolTable};
use tracing::debug;

pub use bytecode::{CompiledScript, Instruction, Label, Opcode, Operand};
pub use dynamic::{ArgumentTypeTrailer, DynamicCommandHandler, DynamicCommands};
pub use emit::BlockEmitter;
pub use error::{CompileError, Result};
pub use stmt::ScriptCompiler;

/// Result of generating code for one file.
#[derive(Debug, Default)]
pub struct CodegenResult {
    /// Every script that was emitted without error, in declaration order.
    pub scripts: Vec<CompiledScript>,
    pub diagnostics: Diagnostics,
}

impl CodegenResult {
    pub fn is_success(&self) -> bool {
        !self.diagnostics.has_errors()
    }
}

/// Generates code for whole files.
///
/// One generator can be reused for many files; all per-script state is reset
/// at the start of each script.
pub struct CodeGenerator<'a> {
    symbols: &'a SymbolTable,
    dynamic: DynamicCommands,
    emitter: BlockEmitter,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self {
            symbols,
            dynamic: DynamicCommands::default(),
            emitter: BlockEmitter::new(true),
        }
    }

    /// Whether to emit `LineNumber` markers.
    pub fn with_line_numbers(mut self, enabled: bool) -> Self {
        self.emitter = BlockEmitter::new(enabled);
        self
    }

    pub fn with_dynamic_commands(mut self, dynamic: DynamicCommands) -> Self {
        self.dynamic = dynamic;
        self
    }

    /// Register a handler that replaces code generation for `command`.
    pub fn register_dynamic(
        &mut self,
        command: impl Into<String>,
        handler: Rc<dyn DynamicCommandHandler>,
    ) {
        self.dynamic.insert(command.into(), handler);
    }

    /// Generate code for every script of a file.
    ///
    /// A script that fails to compile is reported and skipped; the others are
    /// still generated.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn generate(&mut self, file: &ScriptFile<'_>) -> CodegenResult {
        let mut result = CodegenResult::default();

        for decl in file.scripts() {
            match self.generate_script(decl) {
                Ok(script) => {
                    debug!(
                        script = %script.symbol,
                        blocks = script.blocks.len(),
                        "compiled script"
                    );
                    result.scripts.push(script);
                }
                Err(error) => {
                    debug!(script = %decl.symbol, %error, "script emission aborted");
                    result.diagnostics.push(Diagnostic::from(error));
                }
            }
        }

        result
    }

    /// Generate code for a single script.
    pub fn generate_script(&mut self, decl: &ScriptDecl<'_>) -> Result<CompiledScript> {
        self.emitter.start_script();

        let mut locals = bytecode::LocalTable::new();
        for parameter in decl.parameters {
            locals.add_parameter(parameter.clone());
        }

        let symbol = decl.symbol;
        let mut compiler = ScriptCompiler::new(
            &mut self.emitter,
            &mut locals,
            self.symbols,
            &self.dynamic,
            symbol,
        );
        compiler.compile_body(decl.body, decl.span)?;

        let (blocks, switch_tables) = self.emitter.finish();
        Ok(CompiledScript::new(symbol.clone(), blocks, switch_tables, locals))
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use bumpalo::Bump;
    use gamescript_ast::{CallKind, TreeBuilder};
    use gamescript_core::{CommandSymbol, ScriptSymbol, Trigger, Type};

    use super::*;

    #[test]
    fn failing_script_does_not_stop_the_file() {
        let arena = Bump::new();
        let b = TreeBuilder::new(&arena);
        let good = Rc::new(ScriptSymbol::new(Trigger::Proc, "good", vec![], vec![]));
        let bad = Rc::new(ScriptSymbol::new(Trigger::Proc, "bad", vec![], vec![]));

        let broken = [b.at(7).expr_stmt(b.unresolved_call(CallKind::Command, "nope", &[]))];
        let file = b.file(
            "test.gs",
            &[
                b.at(1).script(&bad, &[], &broken),
                b.at(9).script(&good, &[], &[]),
            ],
        );

        let symbols = SymbolTable::new();
        let mut generator = CodeGenerator::new(&symbols);
        let result = generator.generate(&file);

        assert!(!result.is_success());
        assert_eq!(result.scripts.len(), 1);
        assert_eq!(result.scripts[0].symbol.name, "good");
        assert_eq!(result.diagnostics.error_count(), 1);
        let diagnostic = result.diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.span.line, 7);
    }

    #[test]
    fn line_markers_follow_statements() {
        let arena = Bump::new();
        let b = TreeBuilder::new(&arena);
        let mes = Rc::new(CommandSymbol::new("mes", vec![Type::STRING], vec![]));
        let script = Rc::new(ScriptSymbol::new(Trigger::Proc, "lines", vec![], vec![]));

        let body = [
            b.at(2).expr_stmt(b.command(&mes, &[b.string("a")])),
            b.at(2).expr_stmt(b.command(&mes, &[b.string("b")])),
            b.at(3).expr_stmt(b.command(&mes, &[b.string("c")])),
        ];
        let decl = b.at(1).script(&script, &[], &body);

        let symbols = SymbolTable::new();
        let mut generator = CodeGenerator::new(&symbols);
        let compiled = generator.generate_script(&decl).unwrap();
        let markers = compiled
            .instructions()
            .filter(|i| i.opcode == Opcode::LineNumber)
            .count();
        assert_eq!(markers, 2);

        let mut quiet = CodeGenerator::new(&symbols).with_line_numbers(false);
        let compiled = quiet.generate_script(&decl).unwrap();
        assert!(compiled.instructions().all(|i| !i.opcode.is_marker()));
    }
}
