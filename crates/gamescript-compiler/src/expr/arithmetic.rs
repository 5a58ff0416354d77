//! `calc(...)` arithmetic and string interpolation.

use gamescript_ast::{ArithmeticExpr, ArithmeticOp, CalcExpr, Expr, JoinedStringExpr};
use gamescript_core::BaseVarType;

use crate::bytecode::{Instruction, Opcode, Operand};
use crate::error::{CompileError, Result};
use crate::stmt::ScriptCompiler;

fn arithmetic_opcode(op: ArithmeticOp, base: BaseVarType) -> Option<Opcode> {
    use ArithmeticOp::*;
    Some(match (base, op) {
        (BaseVarType::Integer, Add) => Opcode::Add,
        (BaseVarType::Integer, Sub) => Opcode::Sub,
        (BaseVarType::Integer, Multiply) => Opcode::Multiply,
        (BaseVarType::Integer, Divide) => Opcode::Divide,
        (BaseVarType::Integer, Modulo) => Opcode::Modulo,
        (BaseVarType::Integer, And) => Opcode::And,
        (BaseVarType::Integer, Or) => Opcode::Or,
        (BaseVarType::Long, Add) => Opcode::LongAdd,
        (BaseVarType::Long, Sub) => Opcode::LongSub,
        (BaseVarType::Long, Multiply) => Opcode::LongMultiply,
        (BaseVarType::Long, Divide) => Opcode::LongDivide,
        (BaseVarType::Long, Modulo) => Opcode::LongModulo,
        (BaseVarType::Long, And) => Opcode::LongAnd,
        (BaseVarType::Long, Or) => Opcode::LongOr,
        (BaseVarType::String, _) => return None,
    })
}

impl<'a> ScriptCompiler<'a> {
    pub(crate) fn calc<'ast>(&mut self, calc: &CalcExpr<'ast>) -> Result<()> {
        self.calc_operand(calc.expr)
    }

    fn calc_operand<'ast>(&mut self, expr: &Expr<'ast>) -> Result<()> {
        match expr {
            Expr::Arithmetic(arithmetic) => self.arithmetic(arithmetic),
            Expr::Paren(paren) => self.calc_operand(paren.expr),
            other => self.expression(other),
        }
    }

    fn arithmetic<'ast>(&mut self, expr: &ArithmeticExpr<'ast>) -> Result<()> {
        self.calc_operand(expr.left)?;
        self.calc_operand(expr.right)?;

        let opcode = expr
            .ty
            .base_type()
            .and_then(|base| arithmetic_opcode(expr.op, base))
            .ok_or(CompileError::UnsupportedType {
                ty: expr.ty,
                context: "arithmetic",
                span: expr.span,
            })?;
        self.emit(Instruction::simple(opcode).with_span(expr.span));
        Ok(())
    }

    /// `"a<$b>c"`: every part in order, then one join of all of them.
    pub(crate) fn joined_string<'ast>(&mut self, joined: &JoinedStringExpr<'ast>) -> Result<()> {
        for part in joined.parts {
            self.expression(part)?;
        }
        self.emit(
            Instruction::new(Opcode::JoinString, Operand::Count(joined.parts.len() as u32))
                .with_span(joined.span),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use bumpalo::Bump;
    use gamescript_ast::{ArithmeticOp, TreeBuilder};
    use gamescript_core::{LocalVariableSymbol, ScriptSymbol, Trigger, Type};

    use crate::error::CompileError;
    use crate::stmt::test_support::{compile, listing};

    #[test]
    fn nested_calc_is_postfix() {
        let arena = Bump::new();
        let b = TreeBuilder::new(&arena);
        let x = Rc::new(LocalVariableSymbol::new("x", Type::INT));
        let script = Rc::new(ScriptSymbol::new(Trigger::Proc, "math", vec![Type::INT], vec![Type::INT]));

        // calc(($x + 2) * 3)
        let sum = b.paren(b.arithmetic(b.local(&x), ArithmeticOp::Add, b.int(2)));
        let body = [b.return_stmt(&[b.calc(b.arithmetic(sum, ArithmeticOp::Multiply, b.int(3)))])];
        let decl = b.script(&script, &[x], &body);

        let compiled = compile(&decl).unwrap();
        assert_eq!(
            &listing(&compiled)[..6],
            ["PushLocal $x", "PushConstantInt 2", "Add", "PushConstantInt 3", "Multiply", "Return"]
        );
    }

    #[test]
    fn long_arithmetic_uses_long_opcodes() {
        let arena = Bump::new();
        let b = TreeBuilder::new(&arena);
        let script = Rc::new(ScriptSymbol::new(Trigger::Proc, "math", vec![], vec![Type::LONG]));
        let body = [b.return_stmt(&[b.calc(b.arithmetic(b.long(1), ArithmeticOp::Modulo, b.long(2)))])];
        let decl = b.script(&script, &[], &body);

        let compiled = compile(&decl).unwrap();
        assert_eq!(listing(&compiled)[2], "LongModulo");
    }

    #[test]
    fn string_arithmetic_is_unsupported() {
        let arena = Bump::new();
        let b = TreeBuilder::new(&arena);
        let script = Rc::new(ScriptSymbol::new(Trigger::Proc, "math", vec![], vec![Type::STRING]));
        let body = [b.return_stmt(&[b.calc(b.arithmetic(b.string("a"), ArithmeticOp::Add, b.string("b")))])];
        let decl = b.script(&script, &[], &body);

        assert!(matches!(
            compile(&decl),
            Err(CompileError::UnsupportedType { context: "arithmetic", .. })
        ));
    }

    #[test]
    fn joined_string_counts_parts() {
        let arena = Bump::new();
        let b = TreeBuilder::new(&arena);
        let name = Rc::new(LocalVariableSymbol::new("name", Type::STRING));
        let script = Rc::new(ScriptSymbol::new(Trigger::Proc, "greet", vec![Type::STRING], vec![Type::STRING]));
        let body = [b.return_stmt(&[b.joined(&[b.string("Hello, "), b.local(&name), b.string("!")])])];
        let decl = b.script(&script, &[name], &body);

        let compiled = compile(&decl).unwrap();
        assert_eq!(listing(&compiled)[3], "JoinString 3");
    }
}
