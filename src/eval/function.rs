//! Function declaration handling: building the signature ([`FunctionHandle`])
//! used for the two-pass registration, and lowering a function body once all
//! signatures are known.

use std::rc::Rc;

use crate::{
    ast::FunctionDecl,
    context::CodegenContext,
    env::{FunctionHandle, Scope, VarHandle},
    error::CodegenError,
    eval::{analysis::block_always_returns, resolve_type, stmt::evaluate_block},
    types::{PrimKind, Ty},
};

/// Builds the callable signature for `decl` without touching its body — used
/// during the registration pass so forward references and recursive calls
/// resolve regardless of declaration order.
pub fn build_function_handle(decl: &Rc<FunctionDecl>) -> Result<FunctionHandle, CodegenError> {
    let return_kind = PrimKind::parse(&decl.return_type.name, decl.position)?;

    let mut params = Vec::with_capacity(decl.params.len());
    for param in &decl.params {
        let ty = resolve_type(&param.type_annotation)?;
        params.push((param.name.clone(), ty));
    }

    Ok(FunctionHandle {
        name: decl.name.clone(),
        return_kind,
        params,
        decl: Rc::clone(decl),
    })
}

/// Lowers one function's body into the emitter's body buffer. Requires
/// `handle` to already be registered in `ctx` (so the function can call
/// itself).
pub fn evaluate_function(ctx: &mut CodegenContext, handle: &FunctionHandle) -> Result<(), CodegenError> {
    let decl = &handle.decl;

    let params_str = handle
        .params
        .iter()
        .map(|(name, ty)| format!("{} %{name}", ty.ir_type()))
        .collect::<Vec<_>>()
        .join(", ");

    ctx.emitter.emit(&format!(
        "define {} @{}({params_str}) {{",
        handle.return_kind.ir_type(),
        handle.name
    ));
    ctx.emitter.emit_label("entry");

    let scope = Scope::root();
    for (name, ty) in &handle.params {
        match ty {
            Ty::Primitive(kind) => {
                let id = ctx.emitter.fresh_id();
                let ptr_reg = format!("%ptr.{name}.{id}");
                ctx.emitter.emit(&format!("{ptr_reg} = alloca {}", kind.ir_type()));
                ctx.emitter.emit(&format!(
                    "store {} %{name}, ptr {ptr_reg}",
                    kind.ir_type()
                ));
                scope.declare(name, VarHandle::new(ptr_reg, *ty), decl.position)?;
            }
            Ty::Array(_) => {
                // Arrays are passed by reference: the incoming pointer
                // register is the variable's storage directly, no alloca.
                scope.declare(name, VarHandle::new(format!("%{name}"), *ty), decl.position)?;
            }
        }
    }

    ctx.enter_function(Ty::Primitive(handle.return_kind));
    evaluate_block(ctx, &scope, &decl.body)?;
    ctx.exit_function();

    // A guarding `ret` always follows the body, even when every path through
    // it already returns (spec.md §9 resolves the dangling-terminator open
    // question this way: a synthetic label keeps the extra `ret` reachable
    // by nothing rather than dropping it, so a function that already returns
    // on every path still parses).
    if block_always_returns(&decl.body) {
        let id = ctx.emitter.fresh_id();
        ctx.emitter.close_label();
        ctx.emitter.emit_label(&format!("afterReturn.{id}"));
    }
    let default_literal = match handle.return_kind {
        PrimKind::Int => "0",
        PrimKind::Float => "0.0",
    };
    ctx.emitter.emit(&format!(
        "ret {} {default_literal}",
        handle.return_kind.ir_type()
    ));

    ctx.emitter.close_label();
    ctx.emitter.emit("}");
    Ok(())
}
