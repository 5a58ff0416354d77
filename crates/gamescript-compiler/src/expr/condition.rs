//! Short-circuit condition lowering.
//!
//! Conditions compile to jumping code: every condition ends by branching to
//! either its true or its false target, and the right operand of `&`/`|`
//! lives in its own continuation block that is only reached when the left
//! operand did not already decide the outcome.

use gamescript_ast::{BinaryOp, Expr};

use crate::bytecode::{Comparison, Instruction, Label, Opcode};
use crate::error::{CompileError, Result};
use crate::stmt::ScriptCompiler;

fn comparison(op: BinaryOp) -> Option<Comparison> {
    Some(match op {
        BinaryOp::Equals => Comparison::Equals,
        BinaryOp::NotEquals => Comparison::NotEquals,
        BinaryOp::LessThan => Comparison::LessThan,
        BinaryOp::GreaterThan => Comparison::GreaterThan,
        BinaryOp::LessThanOrEquals => Comparison::LessThanOrEquals,
        BinaryOp::GreaterThanOrEquals => Comparison::GreaterThanOrEquals,
        BinaryOp::And | BinaryOp::Or => return None,
    })
}

impl<'a> ScriptCompiler<'a> {
    /// Lower `expr` into branches to `when_true` or `when_false`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn generate_condition<'ast>(
        &mut self,
        expr: &Expr<'ast>,
        when_true: &Label,
        when_false: &Label,
    ) -> Result<()> {
        match expr {
            Expr::Binary(binary) if binary.op.is_logical() => {
                let next = match binary.op {
                    BinaryOp::And => self.emitter.generate_block("condition_and"),
                    _ => self.emitter.generate_block("condition_or"),
                };

                // `a | b`: a true decides, a false tries b.
                // `a & b`: a false decides, a true tries b.
                match binary.op {
                    BinaryOp::Or => self.generate_condition(binary.left, when_true, &next)?,
                    _ => self.generate_condition(binary.left, &next, when_false)?,
                }

                self.emitter.bind(next);
                self.generate_condition(binary.right, when_true, when_false)
            }
            Expr::Binary(binary) => {
                self.expression(binary.left)?;
                self.expression(binary.right)?;

                let ty = binary.left.ty();
                let opcode = ty
                    .base_type()
                    .zip(comparison(binary.op))
                    .and_then(|(base, cmp)| cmp.branch_opcode(base))
                    .ok_or(CompileError::UnsupportedType {
                        ty,
                        context: "comparison",
                        span: binary.span,
                    })?;

                self.emit(Instruction::branch(opcode, when_true.clone()).with_span(binary.span));
                self.emit(Instruction::branch(Opcode::Branch, when_false.clone()).with_span(binary.span));
                Ok(())
            }
            Expr::Paren(paren) => self.generate_condition(paren.expr, when_true, when_false),
            other => Err(CompileError::InvalidCondition {
                kind: other.kind_name(),
                span: other.span(),
            }),
        }
    }
}
