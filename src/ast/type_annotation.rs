use serde::{Deserialize, Serialize};

use crate::error::Position;

/// A type as written in source: a keyword (`int`/`float`) plus whether it was
/// suffixed with an array marker (`int[3]`). Whether `name` is actually a
/// known keyword is not checked here — that happens in [`crate::types::PrimKind::parse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeAnnotation {
    pub name: String,
    pub is_array: bool,
    pub position: Position,
}
