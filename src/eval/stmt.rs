//! Statement evaluation.

use crate::{
    ast::{
        Assignment, Block, IfStmt, LValue, PrintStmt, ReturnStmt, ScanStmt, Statement, VarDecl,
        WhileStmt,
    },
    context::CodegenContext,
    env::{Scope, ValueHandle, VarHandle},
    error::CodegenError,
    eval::{
        analysis::block_always_returns,
        expr::{evaluate_expression, evaluate_indexed_target_ptr},
        resolve_type,
    },
    types::{PrimKind, Ty},
};

/// Evaluates `block` in a fresh scope nested under `parent_scope`. Every
/// `Block` value in the AST — a function body, an `if` arm, a loop body, or a
/// bare `{ ... }` statement — goes through here, so declarations never leak
/// past the braces that introduced them.
pub fn evaluate_block(
    ctx: &mut CodegenContext,
    parent_scope: &Scope,
    block: &Block,
) -> Result<(), CodegenError> {
    let scope = parent_scope.child();
    for stmt in &block.statements {
        evaluate_statement(ctx, &scope, stmt)?;
    }
    Ok(())
}

pub fn evaluate_statement(
    ctx: &mut CodegenContext,
    scope: &Scope,
    stmt: &Statement,
) -> Result<(), CodegenError> {
    match stmt {
        Statement::VarDecl(decl) => evaluate_var_decl(ctx, scope, decl),
        Statement::Assignment(assignment) => evaluate_assignment(ctx, scope, assignment),
        Statement::Block(block) => evaluate_block(ctx, scope, block),
        Statement::If(if_stmt) => evaluate_if(ctx, scope, if_stmt),
        Statement::While(while_stmt) => evaluate_while(ctx, scope, while_stmt),
        Statement::Return(return_stmt) => evaluate_return(ctx, scope, return_stmt),
        Statement::Print(print_stmt) => evaluate_print(ctx, scope, print_stmt),
        Statement::Scan(scan_stmt) => evaluate_scan(ctx, scope, scan_stmt),
        Statement::Expr(expr) => evaluate_expression(ctx, scope, expr).map(|_| ()),
    }
}

fn evaluate_var_decl(
    ctx: &mut CodegenContext,
    scope: &Scope,
    decl: &VarDecl,
) -> Result<(), CodegenError> {
    let ty = resolve_type(&decl.type_annotation)?;

    match ty {
        Ty::Primitive(kind) => {
            let id = ctx.emitter.fresh_id();
            let ptr_reg = format!("%ptr.{}.{id}", decl.name);
            ctx.emitter.emit(&format!("{ptr_reg} = alloca {}", kind.ir_type()));

            if let Some(init_expr) = &decl.init {
                let value = evaluate_expression(ctx, scope, init_expr)?;
                if value.ty != Ty::Primitive(kind) {
                    return Err(CodegenError::type_mismatch(
                        Ty::Primitive(kind),
                        value.ty,
                        init_expr.position(),
                    ));
                }
                ctx.emitter.emit(&format!(
                    "store {} {}, ptr {ptr_reg}",
                    kind.ir_type(),
                    value.reg_name
                ));
            }

            scope.declare(&decl.name, VarHandle::new(ptr_reg, Ty::Primitive(kind)), decl.position)
        }
        Ty::Array(kind) => {
            if decl.init.is_some() {
                return Err(CodegenError::cannot_assign_to_array(&decl.name, decl.position));
            }
            let Some(size_expr) = &decl.size else {
                return Err(CodegenError::missing_array_size(&decl.name, decl.position));
            };
            let size_value = evaluate_expression(ctx, scope, size_expr)?;
            if size_value.ty != Ty::Primitive(PrimKind::Int) {
                return Err(CodegenError::index_must_be_int(size_expr.position()));
            }

            let array_id = ctx.emitter.fresh_id();
            let array_reg = format!("%arrayptr.{array_id}");
            ctx.emitter.emit(&format!(
                "{array_reg} = alloca {}, i64 {}",
                kind.ir_type(),
                size_value.reg_name
            ));

            let ptr_id = ctx.emitter.fresh_id();
            let ptr_reg = format!("%ptr.{}.{ptr_id}", decl.name);
            ctx.emitter.emit(&format!(
                "{ptr_reg} = getelementptr {ty}, {ty}* {array_reg}, i64 0",
                ty = kind.ir_type()
            ));

            scope.declare(&decl.name, VarHandle::new(ptr_reg, Ty::Array(kind)), decl.position)
        }
    }
}

fn evaluate_assignment(
    ctx: &mut CodegenContext,
    scope: &Scope,
    assignment: &Assignment,
) -> Result<(), CodegenError> {
    let LValue { name, index, position } = &assignment.target;

    match index {
        None => {
            let var = scope
                .lookup(name)
                .ok_or_else(|| CodegenError::undefined_variable(name, *position))?;
            if var.ty.is_array() {
                return Err(CodegenError::cannot_assign_to_array(name, *position));
            }

            let value = evaluate_expression(ctx, scope, &assignment.value)?;
            if value.ty != var.ty {
                return Err(CodegenError::type_mismatch(
                    var.ty,
                    value.ty,
                    assignment.value.position(),
                ));
            }

            ctx.emitter.emit(&format!(
                "store {} {}, ptr {}",
                var.ty.ir_type(),
                value.reg_name,
                var.ptr_name
            ));
            Ok(())
        }
        Some(index_expr) => {
            let (ptr_reg, elem_kind) =
                evaluate_indexed_target_ptr(ctx, scope, name, index_expr, *position)?;

            let value = evaluate_expression(ctx, scope, &assignment.value)?;
            if value.ty != Ty::Primitive(elem_kind) {
                return Err(CodegenError::type_mismatch(
                    Ty::Primitive(elem_kind),
                    value.ty,
                    assignment.value.position(),
                ));
            }

            ctx.emitter.emit(&format!(
                "store {} {}, ptr {ptr_reg}",
                elem_kind.ir_type(),
                value.reg_name
            ));
            Ok(())
        }
    }
}

/// Lowers `condition` to an `i1` via `icmp ne 0`, checking it is an `int`
/// first. Shared by `if` and `while`.
fn evaluate_condition(
    ctx: &mut CodegenContext,
    scope: &Scope,
    condition: &crate::ast::Expression,
) -> Result<String, CodegenError> {
    let value = evaluate_expression(ctx, scope, condition)?;
    if value.ty != Ty::Primitive(PrimKind::Int) {
        return Err(CodegenError::condition_must_be_int(condition.position()));
    }
    let id = ctx.emitter.fresh_id();
    let reg = format!("%conditionCast.{id}");
    ctx.emitter
        .emit(&format!("{reg} = icmp ne i64 {}, 0", value.reg_name));
    Ok(reg)
}

fn evaluate_if(
    ctx: &mut CodegenContext,
    scope: &Scope,
    if_stmt: &IfStmt,
) -> Result<(), CodegenError> {
    let cond_reg = evaluate_condition(ctx, scope, &if_stmt.condition)?;

    let id = ctx.emitter.fresh_id();
    let then_label = format!("then.{id}");
    let else_label = format!("else.{id}");
    let end_label = format!("end.{id}");

    ctx.emitter.emit(&format!(
        "br i1 {cond_reg}, label %{then_label}, label %{else_label}"
    ));

    ctx.emitter.close_label();
    ctx.emitter.emit_label(&then_label);
    evaluate_block(ctx, scope, &if_stmt.then_block)?;
    let then_always_returns = block_always_returns(&if_stmt.then_block);
    if !then_always_returns {
        ctx.emitter.emit(&format!("br label %{end_label}"));
    }

    ctx.emitter.close_label();
    ctx.emitter.emit_label(&else_label);
    // Both branches are emitted unconditionally, even when the source has no
    // `else` — an absent else is just an empty block that falls through.
    let else_always_returns = match &if_stmt.else_block {
        Some(else_block) => {
            evaluate_block(ctx, scope, else_block)?;
            block_always_returns(else_block)
        }
        None => false,
    };
    if !else_always_returns {
        ctx.emitter.emit(&format!("br label %{end_label}"));
    }

    ctx.emitter.close_label();
    ctx.emitter.emit_label(&end_label);
    if then_always_returns && else_always_returns {
        // Neither arm falls through, so nothing branches here — give the
        // block its own terminator instead of leaving it empty.
        ctx.emitter.emit("unreachable");
    }
    Ok(())
}

fn evaluate_while(
    ctx: &mut CodegenContext,
    scope: &Scope,
    while_stmt: &WhileStmt,
) -> Result<(), CodegenError> {
    let id = ctx.emitter.fresh_id();
    let cond_label = format!("while.{id}");
    let body_label = format!("block.{id}");
    let end_label = format!("end.{id}");

    ctx.emitter.emit(&format!("br label %{cond_label}"));

    ctx.emitter.close_label();
    ctx.emitter.emit_label(&cond_label);
    let cond_reg = evaluate_condition(ctx, scope, &while_stmt.condition)?;
    ctx.emitter.emit(&format!(
        "br i1 {cond_reg}, label %{body_label}, label %{end_label}"
    ));

    ctx.emitter.close_label();
    ctx.emitter.emit_label(&body_label);
    evaluate_block(ctx, scope, &while_stmt.block)?;
    if !block_always_returns(&while_stmt.block) {
        ctx.emitter.emit(&format!("br label %{cond_label}"));
    }

    ctx.emitter.close_label();
    ctx.emitter.emit_label(&end_label);
    Ok(())
}

fn evaluate_return(
    ctx: &mut CodegenContext,
    scope: &Scope,
    return_stmt: &ReturnStmt,
) -> Result<(), CodegenError> {
    let value = evaluate_expression(ctx, scope, &return_stmt.value)?;
    let expected = ctx
        .current_return_type()
        .expect("return statement evaluated outside of a function body");
    if value.ty != expected {
        return Err(CodegenError::type_mismatch(
            expected,
            value.ty,
            return_stmt.value.position(),
        ));
    }
    ctx.emitter
        .emit(&format!("ret {} {}", value.ty.ir_type(), value.reg_name));
    Ok(())
}

fn evaluate_print(
    ctx: &mut CodegenContext,
    scope: &Scope,
    print_stmt: &PrintStmt,
) -> Result<(), CodegenError> {
    let fmt_global = ctx.emitter.intern_string(&print_stmt.format.value);

    // No type is rejected here: the format string governs interpretation,
    // and an array operand evaluates to its base pointer like any other
    // identifier reference.
    let mut arg_values: Vec<ValueHandle> = Vec::with_capacity(print_stmt.args.len());
    for arg in &print_stmt.args {
        arg_values.push(evaluate_expression(ctx, scope, arg)?);
    }

    let mut call_args = format!("i8* {fmt_global}");
    for value in &arg_values {
        call_args.push_str(&format!(", {} {}", value.ty.ir_type(), value.reg_name));
    }

    let id = ctx.emitter.fresh_id();
    ctx.emitter.emit(&format!(
        "%printfRet.{id} = call i32 (i8*, ...) @printf({call_args})"
    ));
    Ok(())
}

fn evaluate_scan(
    ctx: &mut CodegenContext,
    scope: &Scope,
    scan_stmt: &ScanStmt,
) -> Result<(), CodegenError> {
    let fmt_global = ctx.emitter.intern_string(&scan_stmt.format.value);

    let mut call_args = format!("i8* {fmt_global}");
    for target in &scan_stmt.targets {
        let (ptr_reg, elem_ty) = match &target.index {
            None => {
                let var = scope
                    .lookup(&target.name)
                    .ok_or_else(|| CodegenError::undefined_variable(&target.name, target.position))?;
                if var.ty.is_array() {
                    return Err(CodegenError::cannot_scan_into_array(&target.name, target.position));
                }
                (var.ptr_name, var.ty)
            }
            Some(index_expr) => {
                let (ptr_reg, elem_kind) =
                    evaluate_indexed_target_ptr(ctx, scope, &target.name, index_expr, target.position)?;
                (ptr_reg, Ty::Primitive(elem_kind))
            }
        };
        call_args.push_str(&format!(", {}* {ptr_reg}", elem_ty.ir_type()));
    }

    let id = ctx.emitter.fresh_id();
    ctx.emitter.emit(&format!(
        "%scanfRet.{id} = call i32 (i8*, ...) @scanf({call_args})"
    ));
    Ok(())
}
