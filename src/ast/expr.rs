use serde::{Deserialize, Serialize};

use crate::{error::Position, types::PrimKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expression {
    IntLiteral(IntLiteral),
    FloatLiteral(FloatLiteral),
    StringLiteral(StringLiteral),
    Identifier(Identifier),
    Indexed(IndexedIdentifier),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    LogicalNot(LogicalNotExpr),
    LogicalBinary(LogicalBinaryExpr),
    Cast(CastExpr),
    Call(CallExpr),
}

impl Expression {
    /// The source position of this expression, used to annotate errors.
    pub fn position(&self) -> Position {
        match self {
            Expression::IntLiteral(n) => n.position,
            Expression::FloatLiteral(n) => n.position,
            Expression::StringLiteral(n) => n.position,
            Expression::Identifier(n) => n.position,
            Expression::Indexed(n) => n.position,
            Expression::Unary(n) => n.position,
            Expression::Binary(n) => n.position,
            Expression::LogicalNot(n) => n.position,
            Expression::LogicalBinary(n) => n.position,
            Expression::Cast(n) => n.position,
            Expression::Call(n) => n.position,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntLiteral {
    pub value: i64,
    pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatLiteral {
    pub value: f64,
    pub position: Position,
}

/// A string literal. Only ever legal as the format argument of `print`/`scan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StringLiteral {
    pub value: String,
    pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedIdentifier {
    pub name: String,
    pub index: Box<Expression>,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub op: UnaryOperator,
    pub operand: Box<Expression>,
    pub position: Position,
}

/// Arithmetic and relational operators. Both families share the same
/// promotion rule (`spec.md` §4.4), so they share one node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl BinaryOperator {
    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Eq
                | BinaryOperator::Ne
                | BinaryOperator::Lt
                | BinaryOperator::Gt
                | BinaryOperator::Le
                | BinaryOperator::Ge
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub op: BinaryOperator,
    pub lhs: Box<Expression>,
    pub rhs: Box<Expression>,
    pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogicalNotExpr {
    pub operand: Box<Expression>,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOperator {
    And,
    Or,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogicalBinaryExpr {
    pub op: LogicalOperator,
    pub lhs: Box<Expression>,
    pub rhs: Box<Expression>,
    pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastExpr {
    pub target: PrimKind,
    pub operand: Box<Expression>,
    pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallExpr {
    pub name: String,
    pub args: Vec<Expression>,
    pub position: Position,
}
