//! Expression lowering.
//!
//! Value expressions leave their result on the stack of their base type.
//! Conditions are never materialized as values; they are lowered straight
//! into branches by [`ScriptCompiler::condition`].

mod arithmetic;
mod calls;
mod condition;
mod literals;

use gamescript_ast::{Expr, GameVariableExpr, IdentifierExpr, LocalVariableExpr};
use gamescript_core::{Symbol, Trigger};

use crate::bytecode::{Instruction, Opcode, Operand};
use crate::error::{CompileError, Result};
use crate::stmt::ScriptCompiler;

impl<'a> ScriptCompiler<'a> {
    /// Lower a value expression.
    pub fn expression<'ast>(&mut self, expr: &Expr<'ast>) -> Result<()> {
        match expr {
            Expr::Literal(literal) => self.literal(literal),
            Expr::Identifier(identifier) => self.identifier(identifier),
            Expr::LocalVariable(local) => self.local_variable(local),
            Expr::GameVariable(var) => self.game_variable(var),
            Expr::ConstantVariable(constant) => match constant.sub_expression {
                Some(value) => self.expression(value),
                None => Err(CompileError::UnresolvedSymbol {
                    name: constant.name.to_string(),
                    expected: "constant",
                    span: constant.span,
                }),
            },
            Expr::Binary(binary) => Err(CompileError::UnexpectedExpression {
                kind: expr.kind_name(),
                context: "value position",
                span: binary.span,
            }),
            Expr::Arithmetic(arithmetic) => Err(CompileError::UnexpectedExpression {
                kind: expr.kind_name(),
                context: "value position outside calc",
                span: arithmetic.span,
            }),
            Expr::Calc(calc) => self.calc(calc),
            Expr::Paren(paren) => self.expression(paren.expr),
            Expr::Call(call) => self.call(call),
            Expr::JoinedString(joined) => self.joined_string(joined),
        }
    }

    /// A bare name: config entries and constants push their symbol,
    /// argument-less commands and procs are invoked.
    fn identifier<'ast>(&mut self, identifier: &IdentifierExpr<'ast>) -> Result<()> {
        let span = identifier.span;
        let Some(symbol) = identifier.symbol else {
            return Err(CompileError::UnresolvedSymbol {
                name: identifier.name.to_string(),
                expected: "identifier",
                span,
            });
        };

        let opcode = match symbol {
            Symbol::Config(_) | Symbol::Constant(_) => Opcode::PushConstantSymbol,
            Symbol::Command(_) => Opcode::Command,
            Symbol::Script(script) if script.trigger == Trigger::Label => Opcode::Jump,
            Symbol::Script(_) => Opcode::Gosub,
            Symbol::Local(_) => Opcode::PushLocal,
            Symbol::Game(_) => Opcode::PushVar,
        };
        self.emit(Instruction::new(opcode, Operand::Symbol(symbol.clone())).with_span(span));
        Ok(())
    }

    fn local_variable<'ast>(&mut self, local: &LocalVariableExpr<'ast>) -> Result<()> {
        let symbol = match local.symbol {
            Some(symbol @ Symbol::Local(_)) => symbol.clone(),
            _ => {
                return Err(CompileError::UnresolvedSymbol {
                    name: local.name.to_string(),
                    expected: "local variable",
                    span: local.span,
                });
            }
        };

        let opcode = match local.index {
            Some(index) => {
                self.expression(index)?;
                Opcode::PushArrayInt
            }
            None => Opcode::PushLocal,
        };
        self.emit(Instruction::new(opcode, Operand::Symbol(symbol)).with_span(local.span));
        Ok(())
    }

    fn game_variable<'ast>(&mut self, var: &GameVariableExpr<'ast>) -> Result<()> {
        let symbol = match var.symbol {
            Some(symbol @ Symbol::Game(_)) => symbol.clone(),
            _ => {
                return Err(CompileError::UnresolvedSymbol {
                    name: var.name.to_string(),
                    expected: "game variable",
                    span: var.span,
                });
            }
        };

        let opcode = if var.dot { Opcode::PushVar2 } else { Opcode::PushVar };
        self.emit(Instruction::new(opcode, Operand::Symbol(symbol)).with_span(var.span));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use bumpalo::Bump;
    use gamescript_ast::TreeBuilder;
    use gamescript_core::{
        ConfigSymbol, ConstantSymbol, GameVarKind, GameVariableSymbol, PrimitiveType,
        ScriptSymbol, Trigger, Type,
    };

    use crate::error::CompileError;
    use crate::stmt::test_support::{compile, listing};

    #[test]
    fn variables_and_symbols() {
        let arena = Bump::new();
        let b = TreeBuilder::new(&arena);
        let obj = Type::Primitive(PrimitiveType::Obj);
        let coins = Rc::new(ConfigSymbol::new("coins", obj));
        let hunger = Rc::new(GameVariableSymbol::new("hunger", GameVarKind::Npc, Type::INT));
        let max = Rc::new(ConstantSymbol {
            name: "max_coins".into(),
            value: "1000".into(),
        });
        let script = Rc::new(ScriptSymbol::new(
            Trigger::Proc,
            "values",
            vec![],
            vec![obj, Type::INT, Type::INT, Type::INT],
        ));

        let body = [b.return_stmt(&[
            b.config(&coins),
            b.game(&hunger),
            b.dot_game(&hunger),
            b.constant(&max, Type::INT, Some(b.int(1000))),
        ])];
        let decl = b.script(&script, &[], &body);

        let compiled = compile(&decl).unwrap();
        assert_eq!(
            &listing(&compiled)[..5],
            [
                "PushConstantSymbol coins",
                "PushVar %hunger",
                "PushVar2 %hunger",
                "PushConstantInt 1000",
                "Return",
            ]
        );
    }

    #[test]
    fn bare_condition_is_not_a_value() {
        let arena = Bump::new();
        let b = TreeBuilder::new(&arena);
        let script = Rc::new(ScriptSymbol::new(Trigger::Proc, "bad", vec![], vec![Type::BOOLEAN]));
        let body = [b.return_stmt(&[b.equals(b.int(1), b.int(1))])];
        let decl = b.script(&script, &[], &body);

        assert!(matches!(
            compile(&decl),
            Err(CompileError::UnexpectedExpression { kind: "condition", .. })
        ));
    }

    #[test]
    fn unresolved_identifier_is_internal() {
        let arena = Bump::new();
        let b = TreeBuilder::new(&arena);
        let script = Rc::new(ScriptSymbol::new(Trigger::Proc, "bad", vec![], vec![Type::INT]));
        let body = [b.return_stmt(&[b.unresolved_identifier("nothing", Type::INT)])];
        let decl = b.script(&script, &[], &body);

        let error = compile(&decl).unwrap_err();
        assert!(error.is_internal());
        assert_eq!(error.to_string(), "unresolved identifier 'nothing'");
    }
}
