use serde::{Deserialize, Serialize};

use super::FunctionDecl;

/// The root of the AST: a flat list of function declarations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub functions: Vec<FunctionDecl>,
}
