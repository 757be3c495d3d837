use anyhow::Result;
use clap::Parser as CliParser;
use std::io::Read;

use grits::codegen::CodeGen;
use grits::lexer;
use grits::parser::Parser;

use inkwell::context::Context;

/// Compile and run grits programs with the in-process interpreter.
#[derive(CliParser)]
#[command(name = "gritsc", about = "Compile and run grits programs")]
struct Opts {
    /// Path to the source file. Reads standard input when omitted.
    src: Option<String>,

    /// Print the generated module IR before running it.
    #[arg(long)]
    emit_ir: bool,
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    let source = match &opts.src {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let tokens = lexer::lex(&source).map_err(|e| anyhow::anyhow!("{}", e))?;
    let program = Parser::new(tokens)
        .parse_program()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let context = Context::create();
    let codegen = CodeGen::new(&context, "grits")?;
    let entry = codegen
        .gen_program_ir(&program)
        .map_err(|d| anyhow::anyhow!("{}", d))?;

    if opts.emit_ir {
        println!("{}", codegen.module.print_to_string().to_string());
    }

    codegen.run(entry)?;
    Ok(())
}
