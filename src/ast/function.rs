use serde::{Deserialize, Serialize};

use crate::error::Position;

use super::{Block, TypeAnnotation};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub type_annotation: TypeAnnotation,
    pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    pub return_type: TypeAnnotation,
    pub params: Vec<Param>,
    pub body: Block,
    pub position: Position,
}
