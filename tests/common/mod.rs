use anyhow::Result;

use grits::ast::Block;
use grits::codegen::CodeGen;
use grits::lexer;
use grits::parser::Parser;

use inkwell::context::Context;
use inkwell::values::FunctionValue;

#[allow(dead_code)]
pub fn parse_program(src: &str) -> Result<Block> {
    let tokens = lexer::lex(src).map_err(|e| anyhow::anyhow!("{}", e))?;
    Parser::new(tokens)
        .parse_program()
        .map_err(|e| anyhow::anyhow!("{}", e))
}

/// Lower `src` into a fresh module owned by the returned `CodeGen`,
/// together with the synthesized entry function.
#[allow(dead_code)]
pub fn lower_program<'a>(
    context: &'a Context,
    src: &str,
) -> Result<(CodeGen<'a>, FunctionValue<'a>)> {
    let program = parse_program(src)?;
    let codegen = CodeGen::new(context, "test_module")?;
    let entry = codegen
        .gen_program_ir(&program)
        .map_err(|d| anyhow::anyhow!("{}", d))?;
    Ok((codegen, entry))
}
