//! The type model: primitive kinds and the two shapes a language value can take.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CodegenError, Position};

/// One of the two primitive kinds the language knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimKind {
    Int,
    Float,
}

impl PrimKind {
    /// The LLVM spelling of a bare value of this kind (`i64` or `double`).
    pub fn ir_type(&self) -> &'static str {
        match self {
            PrimKind::Int => "i64",
            PrimKind::Float => "double",
        }
    }

    /// Parses a type keyword from the AST. Only `int` and `float` are recognized.
    pub fn parse(name: &str, position: Position) -> Result<PrimKind, CodegenError> {
        match name {
            "int" => Ok(PrimKind::Int),
            "float" => Ok(PrimKind::Float),
            other => Err(CodegenError::unknown_type(other, position)),
        }
    }
}

impl fmt::Display for PrimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimKind::Int => write!(f, "int"),
            PrimKind::Float => write!(f, "float"),
        }
    }
}

/// A language type: either a bare primitive or a pointer-backed array of one.
///
/// Arrays are not values (see `spec.md` §3): they cannot be bound by
/// declaration-with-initializer, assigned whole, used as operator operands, or
/// read as a whole by `scan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ty {
    Primitive(PrimKind),
    Array(PrimKind),
}

impl Ty {
    pub fn is_array(&self) -> bool {
        matches!(self, Ty::Array(_))
    }

    /// The element kind, for both primitives (the kind itself) and arrays.
    pub fn element_kind(&self) -> PrimKind {
        match self {
            Ty::Primitive(kind) | Ty::Array(kind) => *kind,
        }
    }

    /// The LLVM spelling of this type: `i64`, `double`, `i64*`, or `double*`.
    pub fn ir_type(&self) -> String {
        match self {
            Ty::Primitive(kind) => kind.ir_type().to_owned(),
            Ty::Array(kind) => format!("{}*", kind.ir_type()),
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Primitive(kind) => write!(f, "{kind}"),
            Ty::Array(kind) => write!(f, "{kind}[]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_ir_types() {
        assert_eq!(PrimKind::Int.ir_type(), "i64");
        assert_eq!(PrimKind::Float.ir_type(), "double");
    }

    #[test]
    fn array_ir_type_is_pointer() {
        assert_eq!(Ty::Array(PrimKind::Int).ir_type(), "i64*");
        assert_eq!(Ty::Array(PrimKind::Float).ir_type(), "double*");
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!(Ty::Primitive(PrimKind::Int), Ty::Primitive(PrimKind::Int));
        assert_ne!(Ty::Primitive(PrimKind::Int), Ty::Array(PrimKind::Int));
        assert_ne!(Ty::Array(PrimKind::Int), Ty::Array(PrimKind::Float));
    }

    #[test]
    fn unknown_type_name_fails() {
        let pos = Position::synthetic();
        assert!(PrimKind::parse("bool", pos).is_err());
    }
}
