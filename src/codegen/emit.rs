//! Top-level lowering: function and extern declarations, plus the
//! synthetic program entry point.

use inkwell::module::Linkage;
use inkwell::types::{BasicMetadataTypeEnum, BasicType, FunctionType};
use inkwell::values::FunctionValue;

use crate::ast::{Block, ExternDecl, FunctionDecl, Param, Stmt};
use crate::codegen::{CodeGen, ScopeStack};
use crate::diagnostics::{self, Diagnostic};
use crate::types::GritsType;

impl<'a> CodeGen<'a> {
    /// Build the LLVM function type for a declaration signature. A
    /// parameter whose type has no value representation degrades the
    /// whole declaration; a return type falls back to `void` instead.
    fn build_fn_type(
        &self,
        ret: GritsType,
        params: &[Param],
        decl_name: &str,
    ) -> Option<FunctionType<'a>> {
        let mut param_types: Vec<BasicMetadataTypeEnum> = Vec::with_capacity(params.len());
        for param in params {
            let resolved = GritsType::from_name(&param.ty);
            let Some(ty) = self.map_type_to_llvm(resolved) else {
                diagnostics::emit_diagnostic(&Diagnostic::simple(format!(
                    "parameter `{}` of `{}` has type `{}`, which holds no value",
                    param.name, decl_name, param.ty
                )));
                return None;
            };
            param_types.push(ty.into());
        }
        Some(match self.map_type_to_llvm(ret) {
            Some(ty) => ty.fn_type(&param_types, false),
            None => self.context.void_type().fn_type(&param_types, false),
        })
    }

    /// Externs get a signature and external linkage, no body.
    pub fn gen_extern_ir(&self, decl: &ExternDecl) -> Option<FunctionValue<'a>> {
        let ret = GritsType::from_name(&decl.ret_ty);
        let fn_type = self.build_fn_type(ret, &decl.params, &decl.name)?;
        Some(
            self.module
                .add_function(&decl.name, fn_type, Some(Linkage::External)),
        )
    }

    /// Lower one function declaration: signature, entry block, parameter
    /// slots, body, one synthesized return, then per-function
    /// verification and the optimization pipeline.
    pub fn gen_function_ir(
        &self,
        decl: &FunctionDecl,
        scopes: &mut ScopeStack<'a>,
    ) -> Option<FunctionValue<'a>> {
        let ret = GritsType::from_name(&decl.ret_ty);
        let fn_type = self.build_fn_type(ret, &decl.params, &decl.name)?;
        let function = self
            .module
            .add_function(&decl.name, fn_type, Some(Linkage::Internal));
        let entry = self.context.append_basic_block(function, "entry");
        self.builder.position_at_end(entry);
        scopes.push(entry);

        // Parameters take the same entry-block slots as locals; the
        // incoming argument value is then stored into the slot. Name the
        // argument before its slot so the argument keeps the bare name.
        for (i, param) in decl.params.iter().enumerate() {
            let Some(arg) = function.get_nth_param(i as u32) else {
                continue;
            };
            arg.set_name(&param.name);
            let slot = Stmt::VarDecl {
                ty: param.ty.clone(),
                name: param.name.clone(),
                init: None,
            };
            self.lower_stmt(&slot, function, scopes);
            if let Some((ptr, _ty)) = scopes.lookup(&param.name) {
                let _ = self.builder.build_store(ptr, arg);
            }
        }

        self.lower_block(&decl.body, function, scopes);

        // Exactly one return per function. A body that never executed a
        // return statement yields an unspecified value, not a
        // verification failure.
        match scopes.return_value() {
            Some(value) => {
                let _ = self.builder.build_return(Some(&value));
            }
            None => match self.map_type_to_llvm(ret) {
                Some(ty) => {
                    let undef = self.undef_value(ty);
                    let _ = self.builder.build_return(Some(&undef));
                }
                None => {
                    let _ = self.builder.build_return(None);
                }
            },
        }
        scopes.pop();

        if !function.verify(true) {
            diagnostics::emit_diagnostic(&Diagnostic::simple(format!(
                "function `{}` failed verification",
                decl.name
            )));
        }
        self.optimize_function(function);

        Some(function)
    }

    /// Synthesize the process entry point: an internal `main` with no
    /// arguments whose body is the whole top-level statement sequence,
    /// lowered inside one implicit scope.
    pub fn gen_program_ir(&self, program: &Block) -> Result<FunctionValue<'a>, Diagnostic> {
        let fn_type = self.context.void_type().fn_type(&[], false);
        let function = self
            .module
            .add_function("main", fn_type, Some(Linkage::Internal));
        let entry = self.context.append_basic_block(function, "entry");
        self.builder.position_at_end(entry);

        let mut scopes = ScopeStack::new();
        scopes.push(entry);
        self.lower_block(program, function, &mut scopes);

        // The entry function returns nothing; a top-level return value
        // is recorded but unused.
        self.builder.position_at_end(scopes.current_block());
        self.builder
            .build_return(None)
            .map_err(|_| Diagnostic::simple("failed to terminate the program entry function"))?;
        scopes.pop();

        Ok(function)
    }
}
