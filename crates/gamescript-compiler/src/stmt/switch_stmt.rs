//! Switch statement lowering.
//!
//! Every switch gets its own [`SwitchTable`](crate::bytecode::SwitchTable)
//! mapping case keys to case blocks. Case bodies never fall through: each
//! one ends in a branch to the end of the switch.

use gamescript_ast::{Expr, LiteralKind, SwitchStmt};

use crate::bytecode::{Constant, Instruction, Opcode, Operand};
use crate::error::{CompileError, Result};

use super::ScriptCompiler;

impl<'a> ScriptCompiler<'a> {
    /// Compile a switch statement.
    ///
    /// Layout:
    /// ```text
    /// [subject]
    /// Switch table
    /// Branch switch_default | switch_end   (unless the first case is default)
    /// switch_case_N:  [stmts] Branch switch_end
    /// ...
    /// switch_end:
    /// ```
    pub fn compile_switch<'ast>(&mut self, stmt: &SwitchStmt<'ast>) -> Result<()> {
        let table = self.emitter.new_switch_table();
        let end = self.emitter.generate_block("switch_end");
        let default = stmt
            .cases
            .iter()
            .any(|c| c.is_default)
            .then(|| self.emitter.generate_block("switch_default_case"));

        self.expression(stmt.subject)?;
        self.emit(Instruction::new(Opcode::Switch, Operand::Switch(table)).with_span(stmt.span));

        // Unmatched values fall through to the next instruction, which is
        // only right when that is the default case.
        if !stmt.cases.first().is_some_and(|c| c.is_default) {
            let target = default.clone().unwrap_or_else(|| end.clone());
            self.emit(Instruction::branch(Opcode::Branch, target).with_span(stmt.span));
        }

        for case in stmt.cases {
            let label = match (&default, case.is_default) {
                (Some(default), true) => default.clone(),
                _ => self.emitter.generate_block("switch_case"),
            };

            let keys = case
                .keys
                .iter()
                .map(|key| self.case_key(key))
                .collect::<Result<Vec<_>>>()?;
            if let Some(table) = self.emitter.switch_table_mut(table) {
                table.add_case(keys, label.clone());
            }

            self.emitter.bind(label);
            self.statements(case.stmts)?;
            self.emit(Instruction::branch(Opcode::Branch, end.clone()).with_span(case.span));
        }

        self.emitter.bind(end);
        Ok(())
    }

    /// Fold a case key into the constant the switch table stores.
    fn case_key<'ast>(&self, key: &Expr<'ast>) -> Result<Constant> {
        match key {
            Expr::ConstantVariable(constant) => match constant.sub_expression {
                Some(value) => self.case_key(value),
                None => Err(CompileError::UnresolvedCaseKey {
                    kind: key.kind_name(),
                    span: key.span(),
                }),
            },
            Expr::Identifier(identifier) => identifier
                .symbol
                .cloned()
                .or_else(|| self.symbols.lookup(identifier.name).cloned())
                .map(Constant::Symbol)
                .ok_or(CompileError::UnresolvedCaseKey {
                    kind: key.kind_name(),
                    span: key.span(),
                }),
            Expr::Literal(literal) => Ok(match literal.kind {
                LiteralKind::String(value) => match literal.symbol {
                    Some(symbol) => Constant::Symbol(symbol.clone()),
                    None => Constant::String(value.to_string()),
                },
                LiteralKind::Int(v) | LiteralKind::Char(v) | LiteralKind::Coord(v) => {
                    Constant::Int(v)
                }
                LiteralKind::Bool(v) => Constant::Int(v as i32),
                LiteralKind::Long(v) => Constant::Long(v),
                LiteralKind::Null => Constant::Int(-1),
            }),
            _ => Err(CompileError::UnresolvedCaseKey {
                kind: key.kind_name(),
                span: key.span(),
            }),
        }
    }
}
