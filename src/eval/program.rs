//! Program-level evaluation: two-pass function handling so calls can target
//! functions declared later in the source, including a function's own name
//! for recursion.

use std::rc::Rc;

use crate::{
    ast::Program,
    context::CodegenContext,
    error::CodegenError,
    eval::function::{build_function_handle, evaluate_function},
};

/// Registers every function's signature, then lowers every function body.
/// Splitting the passes is what lets `fib` call `fib` and lets functions
/// appear in any order.
pub fn evaluate_program(ctx: &mut CodegenContext, program: &Program) -> Result<(), CodegenError> {
    let decls: Vec<Rc<crate::ast::FunctionDecl>> =
        program.functions.iter().cloned().map(Rc::new).collect();

    for decl in &decls {
        let handle = build_function_handle(decl)?;
        ctx.register_function(handle, decl.position)?;
    }

    for decl in &decls {
        let handle = ctx
            .lookup_function(&decl.name)
            .cloned()
            .expect("just registered above");
        evaluate_function(ctx, &handle)?;
    }

    Ok(())
}
