//! Commands with custom code generation.
//!
//! Some commands need bytecode whose shape depends on the arguments at the
//! call site, e.g. variadic commands that the interpreter can only decode
//! with a trailing string describing the argument types. A
//! [`DynamicCommandHandler`] registered under the command's name replaces
//! the default lowering for every call of that command.

use std::rc::Rc;

use gamescript_ast::CallExpr;
use gamescript_core::Type;
use rustc_hash::FxHashMap;

use crate::bytecode::Instruction;
use crate::error::{CompileError, Result};
use crate::stmt::ScriptCompiler;

/// Handlers by command name.
pub type DynamicCommands = FxHashMap<String, Rc<dyn DynamicCommandHandler>>;

/// Custom code generation for one command.
pub trait DynamicCommandHandler {
    /// Emit the complete call, arguments included.
    fn generate<'ast>(
        &self,
        compiler: &mut ScriptCompiler<'_>,
        call: &CallExpr<'ast>,
    ) -> Result<()>;
}

/// Appends a string of argument type codes before the command.
///
/// The first `fixed` arguments are part of the command's own signature and
/// are not described. `queue(script, delay, 5, "x")` with `fixed = 2`
/// pushes the four arguments, then `"is"`, then the command.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgumentTypeTrailer {
    fixed: usize,
}

impl ArgumentTypeTrailer {
    pub fn new(fixed: usize) -> Self {
        Self { fixed }
    }

    fn type_codes<'ast>(&self, call: &CallExpr<'ast>) -> Result<String> {
        call.args
            .iter()
            .skip(self.fixed)
            .map(|arg| match arg.ty() {
                Type::Primitive(p) => Ok(p.code()),
                ty => Err(CompileError::UnsupportedType {
                    ty,
                    context: "argument type string",
                    span: arg.span(),
                }),
            })
            .collect()
    }
}

impl DynamicCommandHandler for ArgumentTypeTrailer {
    fn generate<'ast>(
        &self,
        compiler: &mut ScriptCompiler<'_>,
        call: &CallExpr<'ast>,
    ) -> Result<()> {
        let codes = self.type_codes(call)?;
        compiler.arguments(call.args)?;
        compiler.emit(Instruction::push_string(codes).with_span(call.span));
        compiler.invoke(call)
    }
}
