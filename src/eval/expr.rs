//! Expression evaluation: every variant returns a [`ValueHandle`].

use crate::{
    ast::{
        BinaryExpr, BinaryOperator, CallExpr, CastExpr, Expression, Identifier, IndexedIdentifier,
        LogicalBinaryExpr, LogicalNotExpr, LogicalOperator, UnaryExpr, UnaryOperator,
    },
    context::CodegenContext,
    env::{Scope, ValueHandle},
    error::{CodegenError, Position},
    types::{PrimKind, Ty},
};

pub fn evaluate_expression(
    ctx: &mut CodegenContext,
    scope: &Scope,
    expr: &Expression,
) -> Result<ValueHandle, CodegenError> {
    match expr {
        Expression::IntLiteral(lit) => {
            let id = ctx.emitter.fresh_id();
            let reg = format!("%val.{id}");
            ctx.emitter.emit(&format!("{reg} = add i64 0, {}", lit.value));
            Ok(ValueHandle::new(reg, Ty::Primitive(PrimKind::Int)))
        }
        Expression::FloatLiteral(lit) => {
            let id = ctx.emitter.fresh_id();
            let reg = format!("%val.{id}");
            ctx.emitter
                .emit(&format!("{reg} = fadd double 0.0, {:?}", lit.value));
            Ok(ValueHandle::new(reg, Ty::Primitive(PrimKind::Float)))
        }
        Expression::StringLiteral(_) => unreachable!(
            "string literals are only legal as the format argument of print/scan, \
             which consume them directly rather than calling evaluate_expression"
        ),
        Expression::Identifier(id) => evaluate_identifier(ctx, scope, id),
        Expression::Indexed(indexed) => evaluate_indexed_rvalue(ctx, scope, indexed),
        Expression::Unary(unary) => evaluate_unary(ctx, scope, unary),
        Expression::Binary(binary) => evaluate_binary(ctx, scope, binary),
        Expression::LogicalNot(not_expr) => evaluate_logical_not(ctx, scope, not_expr),
        Expression::LogicalBinary(logical) => evaluate_logical_binary(ctx, scope, logical),
        Expression::Cast(cast) => evaluate_cast(ctx, scope, cast),
        Expression::Call(call) => evaluate_call(ctx, scope, call),
    }
}

fn evaluate_identifier(
    ctx: &mut CodegenContext,
    scope: &Scope,
    id: &Identifier,
) -> Result<ValueHandle, CodegenError> {
    let handle = scope
        .lookup(&id.name)
        .ok_or_else(|| CodegenError::undefined_variable(&id.name, id.position))?;

    if handle.ty.is_array() {
        // Arrays are manipulated by pointer; no load.
        return Ok(ValueHandle::new(handle.ptr_name, handle.ty));
    }

    let reg_id = ctx.emitter.fresh_id();
    let reg = format!("%var.{reg_id}");
    ctx.emitter.emit(&format!(
        "{reg} = load {}, ptr {}",
        handle.ty.ir_type(),
        handle.ptr_name
    ));
    Ok(ValueHandle::new(reg, handle.ty))
}

/// Computes the element pointer for `name[index]`, used by both the rvalue
/// path (load) and the assignment path (store) so the index expression is
/// only ever evaluated once.
fn array_element_ptr(
    ctx: &mut CodegenContext,
    scope: &Scope,
    name: &str,
    index: &Expression,
    position: Position,
) -> Result<(String, PrimKind), CodegenError> {
    let array = scope
        .lookup(name)
        .ok_or_else(|| CodegenError::undefined_variable(name, position))?;

    let Ty::Array(elem_kind) = array.ty else {
        return Err(CodegenError::not_an_array(name, position));
    };

    let index_value = evaluate_expression(ctx, scope, index)?;
    if index_value.ty != Ty::Primitive(PrimKind::Int) {
        return Err(CodegenError::index_must_be_int(index.position()));
    }

    let ptr_id = ctx.emitter.fresh_id();
    let ptr_reg = format!("%arrayPtr.{ptr_id}");
    ctx.emitter.emit(&format!(
        "{ptr_reg} = getelementptr {elem_ty}, {array_ty} {array_ptr}, i64 {idx_reg}",
        elem_ty = elem_kind.ir_type(),
        array_ty = array.ty.ir_type(),
        array_ptr = array.ptr_name,
        idx_reg = index_value.reg_name,
    ));

    Ok((ptr_reg, elem_kind))
}

fn evaluate_indexed_rvalue(
    ctx: &mut CodegenContext,
    scope: &Scope,
    indexed: &IndexedIdentifier,
) -> Result<ValueHandle, CodegenError> {
    let (ptr_reg, elem_kind) =
        array_element_ptr(ctx, scope, &indexed.name, &indexed.index, indexed.position)?;

    let reg_id = ctx.emitter.fresh_id();
    let reg = format!("%var.{reg_id}");
    ctx.emitter
        .emit(&format!("{reg} = load {}, ptr {ptr_reg}", elem_kind.ir_type()));
    Ok(ValueHandle::new(reg, Ty::Primitive(elem_kind)))
}

/// Used by the assignment statement so the index is evaluated exactly once,
/// with no extra load.
pub fn evaluate_indexed_target_ptr(
    ctx: &mut CodegenContext,
    scope: &Scope,
    name: &str,
    index: &Expression,
    position: Position,
) -> Result<(String, PrimKind), CodegenError> {
    array_element_ptr(ctx, scope, name, index, position)
}

fn evaluate_unary(
    ctx: &mut CodegenContext,
    scope: &Scope,
    unary: &UnaryExpr,
) -> Result<ValueHandle, CodegenError> {
    let operand = evaluate_expression(ctx, scope, &unary.operand)?;
    if operand.ty.is_array() {
        return Err(CodegenError::array_operand_forbidden(unary.position));
    }

    match unary.op {
        UnaryOperator::Plus => Ok(operand),
        UnaryOperator::Minus => {
            let id = ctx.emitter.fresh_id();
            let reg = format!("%unOp.{id}");
            match operand.ty {
                Ty::Primitive(PrimKind::Int) => {
                    ctx.emitter
                        .emit(&format!("{reg} = sub i64 0, {}", operand.reg_name));
                }
                Ty::Primitive(PrimKind::Float) => {
                    ctx.emitter
                        .emit(&format!("{reg} = fsub double 0.0, {}", operand.reg_name));
                }
                Ty::Array(_) => unreachable!("array operands are rejected above"),
            }
            Ok(ValueHandle::new(reg, operand.ty))
        }
    }
}

/// Promotes `int`/`float` mixes to `float`, matching the arithmetic and
/// relational promotion rule. Returns the (possibly converted) register for
/// each side plus the common type both now share.
fn promote(
    ctx: &mut CodegenContext,
    left: ValueHandle,
    right: ValueHandle,
) -> (String, String, Ty) {
    match (left.ty, right.ty) {
        (Ty::Primitive(PrimKind::Float), Ty::Primitive(PrimKind::Int)) => {
            let id = ctx.emitter.fresh_id();
            let reg = format!("%conv.{id}");
            ctx.emitter
                .emit(&format!("{reg} = sitofp i64 {} to double", right.reg_name));
            (left.reg_name, reg, Ty::Primitive(PrimKind::Float))
        }
        (Ty::Primitive(PrimKind::Int), Ty::Primitive(PrimKind::Float)) => {
            let id = ctx.emitter.fresh_id();
            let reg = format!("%conv.{id}");
            ctx.emitter
                .emit(&format!("{reg} = sitofp i64 {} to double", left.reg_name));
            (reg, right.reg_name, Ty::Primitive(PrimKind::Float))
        }
        _ => (left.reg_name, right.reg_name, left.ty),
    }
}

fn evaluate_binary(
    ctx: &mut CodegenContext,
    scope: &Scope,
    binary: &BinaryExpr,
) -> Result<ValueHandle, CodegenError> {
    let left = evaluate_expression(ctx, scope, &binary.lhs)?;
    let right = evaluate_expression(ctx, scope, &binary.rhs)?;

    if left.ty.is_array() || right.ty.is_array() {
        return Err(CodegenError::array_operand_forbidden(binary.position));
    }

    let (lreg, rreg, common_ty) = promote(ctx, left, right);
    let is_float = common_ty == Ty::Primitive(PrimKind::Float);

    if binary.op.is_relational() {
        let pred = relational_predicate(binary.op, is_float, binary.position)?;
        let temp_id = ctx.emitter.fresh_id();
        let temp = format!("%temp.{temp_id}");
        let instr = if is_float { "fcmp" } else { "icmp" };
        let ty = common_ty.ir_type();
        ctx.emitter
            .emit(&format!("{temp} = {instr} {pred} {ty} {lreg}, {rreg}"));

        let rel_id = ctx.emitter.fresh_id();
        let rel = format!("%relOp.{rel_id}");
        ctx.emitter
            .emit(&format!("{rel} = zext i1 {temp} to i64"));
        return Ok(ValueHandle::new(rel, Ty::Primitive(PrimKind::Int)));
    }

    let op_name = arithmetic_op_name(binary.op, is_float, binary.position)?;
    let ty = common_ty.ir_type();
    let id = ctx.emitter.fresh_id();
    let reg = format!("%binOp.{id}");
    ctx.emitter
        .emit(&format!("{reg} = {op_name} {ty} {lreg}, {rreg}"));
    Ok(ValueHandle::new(reg, common_ty))
}

fn arithmetic_op_name(
    op: BinaryOperator,
    is_float: bool,
    position: Position,
) -> Result<&'static str, CodegenError> {
    Ok(match (op, is_float) {
        (BinaryOperator::Add, false) => "add",
        (BinaryOperator::Add, true) => "fadd",
        (BinaryOperator::Sub, false) => "sub",
        (BinaryOperator::Sub, true) => "fsub",
        (BinaryOperator::Mul, false) => "mul",
        (BinaryOperator::Mul, true) => "fmul",
        (BinaryOperator::Div, false) => "sdiv",
        (BinaryOperator::Div, true) => "fdiv",
        (BinaryOperator::Mod, false) => "srem",
        (BinaryOperator::Mod, true) => {
            return Err(CodegenError::unknown_operator("%", position));
        }
        _ => return Err(CodegenError::unknown_operator("?", position)),
    })
}

fn relational_predicate(
    op: BinaryOperator,
    is_float: bool,
    position: Position,
) -> Result<&'static str, CodegenError> {
    Ok(match (op, is_float) {
        (BinaryOperator::Eq, false) => "eq",
        (BinaryOperator::Eq, true) => "oeq",
        (BinaryOperator::Ne, false) => "ne",
        (BinaryOperator::Ne, true) => "one",
        (BinaryOperator::Lt, false) => "slt",
        (BinaryOperator::Lt, true) => "olt",
        (BinaryOperator::Gt, false) => "sgt",
        (BinaryOperator::Gt, true) => "ogt",
        (BinaryOperator::Le, false) => "sle",
        (BinaryOperator::Le, true) => "ole",
        (BinaryOperator::Ge, false) => "sge",
        (BinaryOperator::Ge, true) => "oge",
        _ => return Err(CodegenError::unknown_operator("?", position)),
    })
}

fn evaluate_logical_not(
    ctx: &mut CodegenContext,
    scope: &Scope,
    not_expr: &LogicalNotExpr,
) -> Result<ValueHandle, CodegenError> {
    let operand = evaluate_expression(ctx, scope, &not_expr.operand)?;
    if operand.ty != Ty::Primitive(PrimKind::Int) {
        return Err(CodegenError::logical_operand_must_be_int(not_expr.position));
    }

    let zero_id = ctx.emitter.fresh_id();
    let is_zero = format!("%boolIsZero.{zero_id}");
    ctx.emitter
        .emit(&format!("{is_zero} = icmp eq i64 {}, 0", operand.reg_name));

    let result_id = ctx.emitter.fresh_id();
    let result = format!("%boolUnOp.{result_id}");
    ctx.emitter
        .emit(&format!("{result} = zext i1 {is_zero} to i64"));

    Ok(ValueHandle::new(result, Ty::Primitive(PrimKind::Int)))
}

fn evaluate_logical_binary(
    ctx: &mut CodegenContext,
    scope: &Scope,
    logical: &LogicalBinaryExpr,
) -> Result<ValueHandle, CodegenError> {
    // Both operands are always fully evaluated, in source order, even though
    // the first could already determine the result — this language's
    // `&&`/`||` do not short-circuit (spec.md §4.4, §9).
    let left = evaluate_expression(ctx, scope, &logical.lhs)?;
    if left.ty != Ty::Primitive(PrimKind::Int) {
        return Err(CodegenError::logical_operand_must_be_int(logical.position));
    }
    let right = evaluate_expression(ctx, scope, &logical.rhs)?;
    if right.ty != Ty::Primitive(PrimKind::Int) {
        return Err(CodegenError::logical_operand_must_be_int(logical.position));
    }

    let bitwise_op = match logical.op {
        LogicalOperator::And => "and",
        LogicalOperator::Or => "or",
    };

    let and_id = ctx.emitter.fresh_id();
    let and_reg = format!("%and.{and_id}");
    ctx.emitter.emit(&format!(
        "{and_reg} = {bitwise_op} i64 {}, {}",
        left.reg_name, right.reg_name
    ));

    let logic_id = ctx.emitter.fresh_id();
    let logic_reg = format!("%logic.{logic_id}");
    ctx.emitter
        .emit(&format!("{logic_reg} = icmp ne i64 {and_reg}, 0"));

    let result_id = ctx.emitter.fresh_id();
    let result = format!("%boolBinOp.{result_id}");
    ctx.emitter
        .emit(&format!("{result} = zext i1 {logic_reg} to i64"));

    Ok(ValueHandle::new(result, Ty::Primitive(PrimKind::Int)))
}

fn evaluate_cast(
    ctx: &mut CodegenContext,
    scope: &Scope,
    cast: &CastExpr,
) -> Result<ValueHandle, CodegenError> {
    let operand = evaluate_expression(ctx, scope, &cast.operand)?;
    if operand.ty.is_array() {
        return Err(CodegenError::array_operand_forbidden(cast.position));
    }

    if operand.ty == Ty::Primitive(cast.target) {
        return Ok(operand);
    }

    let id = ctx.emitter.fresh_id();
    let reg = format!("%conv.{id}");
    match cast.target {
        PrimKind::Float => {
            ctx.emitter
                .emit(&format!("{reg} = sitofp i64 {} to double", operand.reg_name));
        }
        PrimKind::Int => {
            ctx.emitter
                .emit(&format!("{reg} = fptosi double {} to i64", operand.reg_name));
        }
    }
    Ok(ValueHandle::new(reg, Ty::Primitive(cast.target)))
}

fn evaluate_call(
    ctx: &mut CodegenContext,
    scope: &Scope,
    call: &CallExpr,
) -> Result<ValueHandle, CodegenError> {
    let handle = ctx
        .lookup_function(&call.name)
        .cloned()
        .ok_or_else(|| CodegenError::undefined_function(&call.name, call.position))?;

    if call.args.len() != handle.params.len() {
        return Err(CodegenError::arity_mismatch(
            &call.name,
            handle.params.len(),
            call.args.len(),
            call.position,
        ));
    }

    let mut arg_values = Vec::with_capacity(call.args.len());
    for (arg_expr, (param_name, param_ty)) in call.args.iter().zip(&handle.params) {
        let value = evaluate_expression(ctx, scope, arg_expr)?;
        if value.ty != *param_ty {
            return Err(CodegenError::type_mismatch(
                format!("{param_ty} for parameter '{param_name}'"),
                value.ty,
                arg_expr.position(),
            ));
        }
        arg_values.push(value);
    }

    let args_text = arg_values
        .iter()
        .map(|v| format!("{} {}", v.ty.ir_type(), v.reg_name))
        .collect::<Vec<_>>()
        .join(", ");

    let id = ctx.emitter.fresh_id();
    let reg = format!("%call.{id}");
    let ret_ty = handle.return_kind.ir_type();
    ctx.emitter
        .emit(&format!("{reg} = call {ret_ty} @{}({args_text})", handle.name));

    Ok(ValueHandle::new(reg, Ty::Primitive(handle.return_kind)))
}
