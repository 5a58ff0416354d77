//! Script declarations and source files.

use std::rc::Rc;

use gamescript_core::{LocalVariableSymbol, ScriptSymbol, Span};

use crate::Stmt;

/// One `[trigger,name](params)(returns)` declaration with its body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptDecl<'ast> {
    pub symbol: &'ast Rc<ScriptSymbol>,
    pub parameters: &'ast [Rc<LocalVariableSymbol>],
    pub body: &'ast [Stmt<'ast>],
    pub span: Span,
}

/// All declarations of one source file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptFile<'ast> {
    pub name: &'ast str,
    pub scripts: &'ast [ScriptDecl<'ast>],
}

impl<'ast> ScriptFile<'ast> {
    pub fn scripts(&self) -> &'ast [ScriptDecl<'ast>] {
        self.scripts
    }
}
