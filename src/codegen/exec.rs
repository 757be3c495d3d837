//! Module verification, the per-function optimization pipeline, and
//! interpreted execution.

use anyhow::Result;
use inkwell::passes::PassManager;
use inkwell::values::{FunctionValue, GenericValue};

use crate::codegen::CodeGen;

impl<'a> CodeGen<'a> {
    /// Pipeline run over each function right after it is lowered:
    /// peephole instruction combining, reassociation, common-
    /// subexpression elimination, and CFG simplification. Only
    /// `function` itself is touched — other functions (notably the
    /// synthetic entry point) may still be mid-construction. The legacy
    /// pass manager used on LLVM 14 has no failure mode, so the
    /// pipeline never stops lowering.
    pub(crate) fn optimize_function(&self, function: FunctionValue<'a>) {
        let fpm = PassManager::create(&self.module);
        fpm.add_instruction_combining_pass();
        fpm.add_reassociate_pass();
        fpm.add_gvn_pass();
        fpm.add_cfg_simplification_pass();
        fpm.initialize();
        fpm.run_on(&function);
    }

    /// Verify the completed module, then interpret `entry` with no
    /// arguments. Verification and engine-construction failures are
    /// fatal to execution but never crash the process; they surface as
    /// errors for the caller to report.
    pub fn run(&self, entry: FunctionValue<'a>) -> Result<GenericValue<'a>> {
        self.module
            .verify()
            .map_err(|e| anyhow::anyhow!("module verification failed:\n{}", e.to_string()))?;

        let engine = self
            .module
            .create_interpreter_execution_engine()
            .map_err(|e| anyhow::anyhow!("failed to construct execution engine: {}", e))?;

        // Straight-line IR over module-owned storage; the interpreter
        // never calls back into the process.
        Ok(unsafe { engine.run_function(entry, &[]) })
    }
}
