//! grits: a small imperative language lowered to LLVM IR and executed
//! in-process.
//!
//! The crate follows the compilation pipeline: [`lexer`] and [`parser`]
//! build the AST ([`ast`]), [`types`] resolves source type names, and
//! [`codegen`] lowers the AST into LLVM IR through `inkwell` before
//! verifying, optimizing, and interpreting the module. Recoverable
//! lowering failures go through [`diagnostics`].

pub mod ast;
pub mod codegen;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod types;
