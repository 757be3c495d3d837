//! LLVM lowering context for grits programs.
//!
//! [`CodeGen`] owns the module, builder, and cached LLVM types; the
//! [`ScopeStack`] is the core's only name index. Lowering is a strict
//! depth-first walk with no concurrency: expressions in `expr`,
//! statements in `stmt`, declarations and the synthetic entry point in
//! `emit`, verification and execution in `exec`. Everything the backend
//! allocates (functions, blocks, values) is owned by the module for its
//! whole lifetime; the scope stack only indexes it.

use std::collections::HashMap;

use anyhow::Result;
use inkwell::OptimizationLevel;
use inkwell::basic_block::BasicBlock;
use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::targets::{CodeModel, InitializationConfig, RelocMode, Target, TargetMachine};
use inkwell::types::{BasicType, BasicTypeEnum};
use inkwell::values::{BasicValueEnum, FunctionValue, PointerValue};

use crate::types::GritsType;

mod emit;
mod exec;
mod expr;
mod stmt;

/// Storage binding for one declared variable: the alloca pointer plus
/// its pointee type, so loads never have to inspect the handle.
type StorageEntry<'a> = (PointerValue<'a>, BasicTypeEnum<'a>);

/// One lexical variable-binding region: a function body or the implicit
/// top level. Holds the block the scope emits into and the pending
/// return value recorded by `return` statements.
struct Scope<'a> {
    locals: HashMap<String, StorageEntry<'a>>,
    block: BasicBlock<'a>,
    return_value: Option<BasicValueEnum<'a>>,
}

/// Stack of scopes: push on entering a function body, pop on leaving.
/// Depth is 0 or 1 plus the implicit top-level scope, since function
/// declarations do not nest.
#[derive(Default)]
pub struct ScopeStack<'a> {
    scopes: Vec<Scope<'a>>,
}

impl<'a> ScopeStack<'a> {
    pub fn new() -> Self {
        ScopeStack { scopes: Vec::new() }
    }

    pub fn push(&mut self, block: BasicBlock<'a>) {
        self.scopes.push(Scope {
            locals: HashMap::new(),
            block,
            return_value: None,
        });
    }

    /// Drops the scope's name bindings. The allocas themselves are owned
    /// by the module and stay valid.
    pub fn pop(&mut self) {
        self.scopes.pop();
    }

    pub fn current_block(&self) -> BasicBlock<'a> {
        self.top().block
    }

    pub fn bind(&mut self, name: &str, ptr: PointerValue<'a>, ty: BasicTypeEnum<'a>) {
        self.top_mut().locals.insert(name.to_string(), (ptr, ty));
    }

    /// Innermost scope only. The language deliberately has no
    /// outer-scope fallback.
    pub fn lookup(&self, name: &str) -> Option<StorageEntry<'a>> {
        self.top().locals.get(name).copied()
    }

    pub fn set_return_value(&mut self, value: BasicValueEnum<'a>) {
        self.top_mut().return_value = Some(value);
    }

    pub fn return_value(&self) -> Option<BasicValueEnum<'a>> {
        self.top().return_value
    }

    fn top(&self) -> &Scope<'a> {
        self.scopes.last().expect("scope stack is empty")
    }

    fn top_mut(&mut self) -> &mut Scope<'a> {
        self.scopes.last_mut().expect("scope stack is empty")
    }
}

pub struct CodeGen<'a> {
    pub context: &'a Context,
    pub module: Module<'a>,
    pub builder: Builder<'a>,
    // Cache commonly used LLVM types to avoid repeated calls into Context
    pub i64_t: inkwell::types::IntType<'a>,
    pub f64_t: inkwell::types::FloatType<'a>,
    /// Target machine backing the per-function pass pipeline.
    pub target_machine: TargetMachine,
}

impl<'a> CodeGen<'a> {
    pub fn new(context: &'a Context, module_name: &str) -> Result<CodeGen<'a>> {
        let module = context.create_module(module_name);
        let triple = TargetMachine::get_default_triple();
        module.set_triple(&triple);
        let builder = context.create_builder();

        Target::initialize_native(&InitializationConfig::default())
            .map_err(|e| anyhow::anyhow!("failed to initialize native target: {}", e))?;
        let target = Target::from_triple(&triple).map_err(|e| anyhow::anyhow!("{}", e))?;
        let target_machine = target
            .create_target_machine(
                &triple,
                "generic",
                "",
                OptimizationLevel::Default,
                RelocMode::Default,
                CodeModel::Default,
            )
            .ok_or_else(|| anyhow::anyhow!("failed to create target machine for {}", triple))?;

        Ok(CodeGen {
            context,
            module,
            builder,
            i64_t: context.i64_type(),
            f64_t: context.f64_type(),
            target_machine,
        })
    }

    /// Map a resolved grits type to the LLVM type used for value slots.
    /// `Void` has no storage representation; callers degrade the
    /// declaration that asked for one.
    pub(crate) fn map_type_to_llvm(&self, t: GritsType) -> Option<BasicTypeEnum<'a>> {
        match t {
            GritsType::Int => Some(self.i64_t.as_basic_type_enum()),
            GritsType::Double => Some(self.f64_t.as_basic_type_enum()),
            GritsType::Void => None,
        }
    }

    /// Allocate stack storage at the top of `function`'s entry block no
    /// matter where the builder currently sits. Backend analyses assume
    /// every local slot originates in the entry block.
    pub(crate) fn create_entry_block_alloca(
        &self,
        function: FunctionValue<'a>,
        ty: BasicTypeEnum<'a>,
        name: &str,
    ) -> Option<PointerValue<'a>> {
        let entry = function.get_first_basic_block()?;
        let tmp = self.context.create_builder();
        match entry.get_first_instruction() {
            Some(first) => tmp.position_before(&first),
            None => tmp.position_at_end(entry),
        }
        tmp.build_alloca(ty, name).ok()
    }

    /// `undef` of `ty`, used when a function body never recorded a
    /// return value. The result is unspecified, not a verification
    /// failure.
    pub(crate) fn undef_value(&self, ty: BasicTypeEnum<'a>) -> BasicValueEnum<'a> {
        match ty {
            BasicTypeEnum::IntType(t) => t.get_undef().into(),
            BasicTypeEnum::FloatType(t) => t.get_undef().into(),
            BasicTypeEnum::PointerType(t) => t.get_undef().into(),
            BasicTypeEnum::ArrayType(t) => t.get_undef().into(),
            BasicTypeEnum::StructType(t) => t.get_undef().into(),
            BasicTypeEnum::VectorType(t) => t.get_undef().into(),
            BasicTypeEnum::ScalableVectorType(t) => t.get_undef().into(),
        }
    }
}
