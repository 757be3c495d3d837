//! Statement lowering.
//!
//! Statements lower in source order. A failed statement degrades to
//! `None` and lowering continues with the next one; the last lowered
//! value becomes the block's result, which is only used for last-value
//! reporting, never for semantics.

use inkwell::values::{BasicValue, BasicValueEnum, FunctionValue};

use crate::ast::{Block, Expr, Stmt};
use crate::codegen::{CodeGen, ScopeStack};
use crate::diagnostics::{self, Diagnostic};
use crate::types::GritsType;

impl<'a> CodeGen<'a> {
    pub(crate) fn lower_block(
        &self,
        block: &Block,
        function: FunctionValue<'a>,
        scopes: &mut ScopeStack<'a>,
    ) -> Option<BasicValueEnum<'a>> {
        let mut last = None;
        for stmt in &block.stmts {
            last = self.lower_stmt(stmt, function, scopes);
        }
        last
    }

    pub(crate) fn lower_stmt(
        &self,
        stmt: &Stmt,
        function: FunctionValue<'a>,
        scopes: &mut ScopeStack<'a>,
    ) -> Option<BasicValueEnum<'a>> {
        match stmt {
            Stmt::Expr(expr) => self.lower_expr(expr, scopes),
            Stmt::Return(expr) => {
                let value = self.lower_expr(expr, scopes)?;
                // Recorded only; the terminator is synthesized once the
                // whole body has been lowered.
                scopes.set_return_value(value);
                Some(value)
            }
            Stmt::VarDecl { ty, name, init } => {
                let resolved = GritsType::from_name(ty);
                let Some(llvm_ty) = self.map_type_to_llvm(resolved) else {
                    diagnostics::emit_diagnostic(&Diagnostic::with_note(
                        format!("variable `{}` has type `{}`, which holds no value", name, ty),
                        "only `int` and `double` variables can be declared",
                    ));
                    return None;
                };
                // Always in the entry block, never the current one.
                let alloca = self.create_entry_block_alloca(function, llvm_ty, name)?;
                scopes.bind(name, alloca, llvm_ty);
                if let Some(init) = init {
                    // Reuse assignment lowering so initialization and
                    // assignment stay in lockstep.
                    let assign = Expr::Assign {
                        target: name.clone(),
                        value: Box::new(init.clone()),
                    };
                    self.lower_expr(&assign, scopes);
                }
                Some(alloca.as_basic_value_enum())
            }
            Stmt::Function(decl) => {
                let _ = self.gen_function_ir(decl, scopes);
                // Declaration lowering moved the builder into the new
                // function; put it back on this scope's block.
                self.builder.position_at_end(scopes.current_block());
                None
            }
            Stmt::Extern(decl) => {
                let _ = self.gen_extern_ir(decl);
                None
            }
        }
    }
}
