//! IR-shape tests: lower small programs and assert on the printed
//! module rather than executing it.

mod common;

use anyhow::Result;
use inkwell::context::Context;

#[test]
fn top_level_declarations_allocate_in_entry_block() -> Result<()> {
    let context = Context::create();
    let (codegen, _entry) =
        common::lower_program(&context, "int x = 2;\nint y = 3;\nint z = x + y;\n")?;

    let ir = codegen.module.print_to_string().to_string();
    assert!(ir.contains("define internal void @main()"));
    assert!(ir.contains("entry:"));
    assert!(ir.contains("alloca i64"));
    assert!(ir.contains("store i64 2"));
    assert!(ir.contains("store i64 3"));
    assert!(ir.contains("load i64"));
    assert!(ir.contains("add"));

    // Every alloca must precede every store: local storage originates at
    // the top of the entry block.
    let last_alloca = ir.rfind("alloca").expect("allocas present");
    let first_store = ir.find("store").expect("stores present");
    assert!(last_alloca < first_store);

    codegen
        .module
        .verify()
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(())
}

#[test]
fn function_declaration_gets_internal_linkage_and_named_params() -> Result<()> {
    let context = Context::create();
    let (codegen, _entry) =
        common::lower_program(&context, "int add(int a, int b) { return a + b; }\n")?;

    let ir = codegen.module.print_to_string().to_string();
    assert!(ir.contains("define internal i64 @add(i64 %a, i64 %b)"));
    assert!(ir.contains("ret i64"));

    codegen
        .module
        .verify()
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(())
}

#[test]
fn extern_declaration_registers_signature_without_body() -> Result<()> {
    let context = Context::create();
    let (codegen, _entry) = common::lower_program(&context, "extern int put(int v);\n")?;

    let ir = codegen.module.print_to_string().to_string();
    assert!(ir.contains("declare i64 @put(i64"));
    assert!(codegen.module.get_function("put").is_some());
    assert_eq!(
        codegen
            .module
            .get_function("put")
            .expect("extern registered")
            .count_basic_blocks(),
        0
    );

    codegen
        .module
        .verify()
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(())
}

#[test]
fn unrecognized_type_name_falls_back_to_void() -> Result<()> {
    let context = Context::create();
    let (codegen, _entry) = common::lower_program(&context, "extern whatsit ping();\n")?;

    let ir = codegen.module.print_to_string().to_string();
    assert!(ir.contains("declare void @ping()"));

    codegen
        .module
        .verify()
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(())
}

#[test]
fn function_without_return_still_verifies() -> Result<()> {
    let context = Context::create();
    let (codegen, _entry) = common::lower_program(&context, "int nop() { int x = 1; }\n")?;

    // The return value is unspecified, never a verification failure.
    codegen
        .module
        .verify()
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(())
}

#[test]
fn double_arithmetic_lowers_to_float_instructions() -> Result<()> {
    let context = Context::create();
    let (codegen, _entry) = common::lower_program(
        &context,
        "double x = 1.5;\ndouble y = 2.5;\ndouble z = x + y;\n",
    )?;

    let ir = codegen.module.print_to_string().to_string();
    assert!(ir.contains("alloca double"));
    assert!(ir.contains("fadd double"));

    codegen
        .module
        .verify()
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(())
}

#[test]
fn binary_operands_lower_left_to_right() -> Result<()> {
    let context = Context::create();
    let src = "\
int one() { return 1; }
int two() { return 2; }
int r = one() + two();
";
    let (codegen, _entry) = common::lower_program(&context, src)?;

    // Both operands call, so their order is observable.
    let ir = codegen.module.print_to_string().to_string();
    let main_at = ir.find("@main").expect("entry function present");
    let call_one = ir[main_at..].find("call i64 @one").expect("call to one");
    let call_two = ir[main_at..].find("call i64 @two").expect("call to two");
    assert!(call_one < call_two);

    codegen
        .module
        .verify()
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(())
}

#[test]
fn call_arguments_lower_left_to_right() -> Result<()> {
    let context = Context::create();
    let src = "\
int one() { return 1; }
int two() { return 2; }
int both(int a, int b) { return a + b; }
int r = both(one(), two());
";
    let (codegen, _entry) = common::lower_program(&context, src)?;

    let ir = codegen.module.print_to_string().to_string();
    let main_at = ir.find("@main").expect("entry function present");
    let call_one = ir[main_at..].find("call i64 @one").expect("call to one");
    let call_two = ir[main_at..].find("call i64 @two").expect("call to two");
    let call_both = ir[main_at..].find("call i64 @both").expect("call to both");
    assert!(call_one < call_two);
    assert!(call_two < call_both);

    codegen
        .module
        .verify()
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(())
}

#[test]
fn lowering_is_stateless_across_runs() -> Result<()> {
    let src = "int add(int a, int b) { return a + b; }\nint r = add(2, 3);\n";

    // Two independent contexts and modules from the same AST shape; both
    // must come out structurally valid.
    let first = Context::create();
    let (codegen_a, _) = common::lower_program(&first, src)?;
    codegen_a
        .module
        .verify()
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let second = Context::create();
    let (codegen_b, _) = common::lower_program(&second, src)?;
    codegen_b
        .module
        .verify()
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(())
}
