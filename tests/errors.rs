//! Recoverable-failure behavior: a bad subtree is reported and dropped,
//! but lowering of everything around it continues and the module still
//! comes out structurally valid.

mod common;

use anyhow::Result;
use grits::diagnostics;
use inkwell::context::Context;

#[test]
fn undeclared_variable_degrades_subtree_only() -> Result<()> {
    let _quiet = diagnostics::suppress();
    let context = Context::create();
    let (codegen, _entry) =
        common::lower_program(&context, "int x = missing + 1;\nint y = 4;\n")?;

    // The bad initializer is dropped; the sibling declaration still lands.
    let ir = codegen.module.print_to_string().to_string();
    assert!(ir.contains("%x = alloca i64"));
    assert!(ir.contains("%y = alloca i64"));
    assert!(ir.contains("store i64 4"));
    assert!(!ir.contains("store i64 1"));

    codegen
        .module
        .verify()
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(())
}

#[test]
fn assignment_to_undeclared_target_is_not_fatal() -> Result<()> {
    let _quiet = diagnostics::suppress();
    let context = Context::create();
    let (codegen, _entry) = common::lower_program(&context, "q = 3;\nint kept = 1;\n")?;

    let ir = codegen.module.print_to_string().to_string();
    assert!(ir.contains("%kept = alloca i64"));

    codegen
        .module
        .verify()
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(())
}

#[test]
fn unknown_function_call_is_reported_not_fatal() -> Result<()> {
    let _quiet = diagnostics::suppress();
    let context = Context::create();
    let (codegen, _entry) = common::lower_program(&context, "int x = nope(1);\nint y = 2;\n")?;

    // No call instruction is emitted for the unknown callee.
    let ir = codegen.module.print_to_string().to_string();
    assert!(!ir.contains("call"));
    assert!(ir.contains("%y = alloca i64"));

    codegen
        .module
        .verify()
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(())
}

#[test]
fn void_typed_variable_declaration_degrades() -> Result<()> {
    let _quiet = diagnostics::suppress();
    let context = Context::create();
    let (codegen, _entry) = common::lower_program(&context, "blob b;\nint y = 1;\n")?;

    let ir = codegen.module.print_to_string().to_string();
    assert!(!ir.contains("%b = alloca"));
    assert!(ir.contains("%y = alloca i64"));

    codegen
        .module
        .verify()
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(())
}

#[test]
fn void_call_as_initializer_degrades() -> Result<()> {
    let _quiet = diagnostics::suppress();
    let context = Context::create();
    let src = "extern void put(int v);\nint x = put(1);\nint y = 2;\n";
    let (codegen, _entry) = common::lower_program(&context, src)?;

    // The call itself still happens; only the store into `x` is dropped.
    let ir = codegen.module.print_to_string().to_string();
    assert!(ir.contains("call void @put"));
    assert!(ir.contains("%x = alloca i64"));
    assert!(ir.contains("store i64 2"));
    assert!(!ir.contains("store i64 %"));

    codegen
        .module
        .verify()
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(())
}

#[test]
fn degraded_program_still_runs() -> Result<()> {
    let _quiet = diagnostics::suppress();
    let context = Context::create();
    // The broken statement vanishes; the rest executes normally.
    let (codegen, entry) =
        common::lower_program(&context, "int x = missing + 1;\nint y = 4;\ny = y + 1;\n")?;
    codegen.run(entry)?;
    Ok(())
}
