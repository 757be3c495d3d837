//! Expression lowering.
//!
//! Each expression lowers to at most one `BasicValueEnum`. A subtree
//! that fails (an undeclared name, an unknown callee) reports through
//! `diagnostics` and yields `None`; lowering of sibling and ancestor
//! nodes keeps going, so one bad expression never aborts the pass.

use inkwell::values::{BasicMetadataValueEnum, BasicValueEnum};

use crate::ast::{BinaryOp, Expr};
use crate::codegen::{CodeGen, ScopeStack};
use crate::diagnostics::{self, Diagnostic};

impl<'a> CodeGen<'a> {
    pub fn lower_expr(&self, expr: &Expr, scopes: &mut ScopeStack<'a>) -> Option<BasicValueEnum<'a>> {
        match expr {
            Expr::Integer(v) => Some(self.i64_t.const_int(*v as u64, true).into()),
            Expr::Double(v) => Some(self.f64_t.const_float(*v).into()),
            Expr::Ident(name) => {
                let Some((ptr, _ty)) = scopes.lookup(name) else {
                    diagnostics::emit_diagnostic(&Diagnostic::simple(format!(
                        "undeclared variable `{}`",
                        name
                    )));
                    return None;
                };
                self.builder.build_load(ptr, name).ok()
            }
            Expr::Neg(operand) => match self.lower_expr(operand, scopes)? {
                BasicValueEnum::IntValue(v) => {
                    self.builder.build_int_neg(v, "negtmp").ok().map(Into::into)
                }
                BasicValueEnum::FloatValue(v) => {
                    self.builder.build_float_neg(v, "negtmp").ok().map(Into::into)
                }
                _ => None,
            },
            Expr::Binary { op, lhs, rhs } => {
                // Left strictly before right; either side may call and
                // so may have side effects.
                let l = self.lower_expr(lhs, scopes)?;
                let r = self.lower_expr(rhs, scopes)?;
                self.lower_binary(*op, l, r)
            }
            Expr::Call { callee, args } => {
                // Callees resolve against functions already lowered into
                // the module, so declaration order matters.
                let Some(function) = self.module.get_function(callee) else {
                    diagnostics::emit_diagnostic(&Diagnostic::simple(format!(
                        "no such function `{}`",
                        callee
                    )));
                    return None;
                };
                let mut lowered: Vec<BasicMetadataValueEnum> = Vec::with_capacity(args.len());
                for arg in args {
                    lowered.push(self.lower_expr(arg, scopes)?.into());
                }
                let call = self.builder.build_call(function, &lowered, "calltmp").ok()?;
                match call.try_as_basic_value() {
                    inkwell::Either::Left(value) => Some(value),
                    // Void calls produce no value; that is not a failure,
                    // but there is nothing to propagate either.
                    inkwell::Either::Right(_) => None,
                }
            }
            Expr::Assign { target, value } => {
                let Some((ptr, _ty)) = scopes.lookup(target) else {
                    diagnostics::emit_diagnostic(&Diagnostic::simple(format!(
                        "undeclared variable `{}`",
                        target
                    )));
                    return None;
                };
                // RHS first, then the store; the slot must never observe
                // a half-built right-hand side.
                let Some(rhs) = self.lower_expr(value, scopes) else {
                    self.note_valueless_call(value);
                    return None;
                };
                self.builder.build_store(ptr, rhs).ok()?;
                Some(rhs)
            }
        }
    }

    /// A void-returning call leaves nothing to store where a value is
    /// required. Every other degrade path has already reported by the
    /// time `None` reaches the consuming site.
    fn note_valueless_call(&self, expr: &Expr) {
        if let Expr::Call { callee, .. } = expr
            && let Some(function) = self.module.get_function(callee)
            && function.get_type().get_return_type().is_none()
        {
            diagnostics::emit_diagnostic(&Diagnostic::simple(format!(
                "call to `{}` produces no value",
                callee
            )));
        }
    }

    fn lower_binary(
        &self,
        op: BinaryOp,
        l: BasicValueEnum<'a>,
        r: BasicValueEnum<'a>,
    ) -> Option<BasicValueEnum<'a>> {
        use BasicValueEnum::{FloatValue, IntValue};

        match (l, r) {
            (IntValue(li), IntValue(ri)) => {
                let v = match op {
                    BinaryOp::Add => self.builder.build_int_add(li, ri, "addtmp"),
                    BinaryOp::Sub => self.builder.build_int_sub(li, ri, "subtmp"),
                    BinaryOp::Mul => self.builder.build_int_mul(li, ri, "multmp"),
                    BinaryOp::Div => self.builder.build_int_signed_div(li, ri, "sdivtmp"),
                    // Comparisons parse but do not lower yet.
                    _ => return None,
                };
                v.ok().map(Into::into)
            }
            (FloatValue(lf), FloatValue(rf)) => {
                let v = match op {
                    BinaryOp::Add => self.builder.build_float_add(lf, rf, "addtmp"),
                    BinaryOp::Sub => self.builder.build_float_sub(lf, rf, "subtmp"),
                    BinaryOp::Mul => self.builder.build_float_mul(lf, rf, "multmp"),
                    BinaryOp::Div => self.builder.build_float_div(lf, rf, "divtmp"),
                    _ => return None,
                };
                v.ok().map(Into::into)
            }
            // Mixed int/double operands have no implicit coercion.
            _ => None,
        }
    }
}
