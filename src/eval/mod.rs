//! The AST evaluator: walks a [`crate::ast::Program`] and emits textual LLVM
//! IR via a [`crate::context::CodegenContext`], performing name resolution
//! and type checking as it goes. One pass, depth-first, left-to-right —
//! there is no separate typechecking phase (see `spec.md` §9).

mod analysis;
pub mod expr;
mod function;
mod program;
mod stmt;

pub use function::evaluate_function;
pub use program::evaluate_program;

use crate::{ast::TypeAnnotation, error::CodegenError, types::{PrimKind, Ty}};

/// Resolves a parsed `int`/`float`(`[]`) annotation into the internal [`Ty`].
pub(crate) fn resolve_type(annotation: &TypeAnnotation) -> Result<Ty, CodegenError> {
    let kind = PrimKind::parse(&annotation.name, annotation.position)?;
    Ok(if annotation.is_array {
        Ty::Array(kind)
    } else {
        Ty::Primitive(kind)
    })
}
