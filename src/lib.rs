pub mod ast;
pub mod context;
pub mod emitter;
pub mod env;
pub mod error;
pub mod eval;
pub mod types;

use context::CodegenContext;
use error::CodegenError;

/// Lowers a whole program to textual LLVM IR.
///
/// This is the single entry point the core exposes: build a [`ast::Program`]
/// (normally by deserializing the output of some out-of-scope front end),
/// hand it here, and get back IR text or the first [`CodegenError`]
/// encountered. A fresh [`CodegenContext`] is created per call, so nothing
/// from one compilation can leak into the next.
pub fn compile_program(program: &ast::Program) -> Result<String, CodegenError> {
    let mut ctx = CodegenContext::new();
    eval::evaluate_program(&mut ctx, program)?;
    Ok(ctx.emitter.finish())
}
