//! Error taxonomy for the code-generation core.
//!
//! Every variant listed in `spec.md` §7 gets one [`ErrorKind`]. All errors are
//! fatal to the compilation: the evaluator stops and propagates the first one
//! it hits via `?`, matching the teacher's `typechecker::error::TypeError`.

use std::{error::Error, fmt};

/// A source position, carried through from the (out-of-scope) parser.
///
/// The core never constructs these from source text itself; AST nodes carry
/// whatever position their producer assigned them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// A placeholder position for errors raised without a specific AST node
    /// in hand (e.g. during tests that build fragments directly).
    pub fn synthetic() -> Self {
        Self::default()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UndefinedVariable,
    DuplicateVariable,
    DuplicateFunction,
    UndefinedFunction,
    ArityMismatch,
    TypeMismatch,
    NotAnArray,
    CannotAssignToArray,
    CannotScanIntoArray,
    IndexMustBeInt,
    ConditionMustBeInt,
    LogicalOperandMustBeInt,
    ArrayOperandForbidden,
    MissingArraySize,
    UnknownOperator,
    UnknownType,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ErrorKind::UndefinedVariable => "undefined variable",
            ErrorKind::DuplicateVariable => "duplicate variable",
            ErrorKind::DuplicateFunction => "duplicate function",
            ErrorKind::UndefinedFunction => "undefined function",
            ErrorKind::ArityMismatch => "arity mismatch",
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::NotAnArray => "not an array",
            ErrorKind::CannotAssignToArray => "cannot assign to array",
            ErrorKind::CannotScanIntoArray => "cannot scan into array",
            ErrorKind::IndexMustBeInt => "index must be int",
            ErrorKind::ConditionMustBeInt => "condition must be int",
            ErrorKind::LogicalOperandMustBeInt => "logical operand must be int",
            ErrorKind::ArrayOperandForbidden => "array operand forbidden",
            ErrorKind::MissingArraySize => "missing array size",
            ErrorKind::UnknownOperator => "unknown operator",
            ErrorKind::UnknownType => "unknown type",
        };
        f.write_str(tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenError {
    pub kind: ErrorKind,
    pub message: String,
    pub position: Position,
}

impl CodegenError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            message: message.into(),
            position,
        }
    }

    pub fn undefined_variable(name: &str, position: Position) -> Self {
        Self::new(
            ErrorKind::UndefinedVariable,
            format!("undefined variable '{name}'"),
            position,
        )
    }

    pub fn duplicate_variable(name: &str, position: Position) -> Self {
        Self::new(
            ErrorKind::DuplicateVariable,
            format!("'{name}' is already declared in this scope"),
            position,
        )
    }

    pub fn duplicate_function(name: &str, position: Position) -> Self {
        Self::new(
            ErrorKind::DuplicateFunction,
            format!("function '{name}' is already declared"),
            position,
        )
    }

    pub fn undefined_function(name: &str, position: Position) -> Self {
        Self::new(
            ErrorKind::UndefinedFunction,
            format!("undefined function '{name}'"),
            position,
        )
    }

    pub fn arity_mismatch(name: &str, expected: usize, got: usize, position: Position) -> Self {
        Self::new(
            ErrorKind::ArityMismatch,
            format!("'{name}' expects {expected} argument(s), got {got}"),
            position,
        )
    }

    pub fn type_mismatch(expected: impl fmt::Display, got: impl fmt::Display, position: Position) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            format!("expected type {expected}, found {got}"),
            position,
        )
    }

    pub fn not_an_array(name: &str, position: Position) -> Self {
        Self::new(
            ErrorKind::NotAnArray,
            format!("'{name}' is not an array"),
            position,
        )
    }

    pub fn cannot_assign_to_array(name: &str, position: Position) -> Self {
        Self::new(
            ErrorKind::CannotAssignToArray,
            format!("cannot assign to array '{name}' as a whole value"),
            position,
        )
    }

    pub fn cannot_scan_into_array(name: &str, position: Position) -> Self {
        Self::new(
            ErrorKind::CannotScanIntoArray,
            format!("cannot scan into array '{name}' without an index"),
            position,
        )
    }

    pub fn index_must_be_int(position: Position) -> Self {
        Self::new(
            ErrorKind::IndexMustBeInt,
            "array index must be an int",
            position,
        )
    }

    pub fn condition_must_be_int(position: Position) -> Self {
        Self::new(
            ErrorKind::ConditionMustBeInt,
            "condition must be an int",
            position,
        )
    }

    pub fn logical_operand_must_be_int(position: Position) -> Self {
        Self::new(
            ErrorKind::LogicalOperandMustBeInt,
            "logical operator operand must be an int",
            position,
        )
    }

    pub fn array_operand_forbidden(position: Position) -> Self {
        Self::new(
            ErrorKind::ArrayOperandForbidden,
            "arrays cannot be used as operator operands",
            position,
        )
    }

    pub fn missing_array_size(name: &str, position: Position) -> Self {
        Self::new(
            ErrorKind::MissingArraySize,
            format!("array declaration for '{name}' is missing a size expression"),
            position,
        )
    }

    pub fn unknown_operator(op: &str, position: Position) -> Self {
        Self::new(
            ErrorKind::UnknownOperator,
            format!("unknown operator '{op}'"),
            position,
        )
    }

    pub fn unknown_type(name: &str, position: Position) -> Self {
        Self::new(
            ErrorKind::UnknownType,
            format!("unknown type '{name}'"),
            position,
        )
    }
}

impl fmt::Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.kind, self.message, self.position)
    }
}

impl Error for CodegenError {}
