//! The compilation context: owns everything that would otherwise be
//! process-wide global state (`spec.md` §9, "Global mutable state"). A fresh
//! [`CodegenContext`] starts from empty state every time, making
//! [`crate::compile_program`] safely callable more than once per process.

use std::collections::HashMap;

use crate::{
    emitter::IrEmitter,
    env::FunctionHandle,
    error::{CodegenError, Position},
    types::Ty,
};

pub struct CodegenContext {
    pub emitter: IrEmitter,
    functions: HashMap<String, FunctionHandle>,
    /// The declared return type of whichever function body is currently
    /// being evaluated, so a nested `return` can check itself against it.
    /// `None` outside of any function body.
    current_return_type: Option<Ty>,
}

impl CodegenContext {
    pub fn new() -> Self {
        Self {
            emitter: IrEmitter::new(),
            functions: HashMap::new(),
            current_return_type: None,
        }
    }

    pub(crate) fn enter_function(&mut self, return_type: Ty) {
        self.current_return_type = Some(return_type);
    }

    pub(crate) fn exit_function(&mut self) {
        self.current_return_type = None;
    }

    pub fn current_return_type(&self) -> Option<Ty> {
        self.current_return_type
    }

    /// Registers a function handle globally. Fails if the name is already
    /// known — a function name is declared at most once per compilation.
    pub fn register_function(&mut self, handle: FunctionHandle, position: Position) -> Result<(), CodegenError> {
        if self.functions.contains_key(&handle.name) {
            return Err(CodegenError::duplicate_function(&handle.name, position));
        }
        self.functions.insert(handle.name.clone(), handle);
        Ok(())
    }

    pub fn lookup_function(&self, name: &str) -> Option<&FunctionHandle> {
        self.functions.get(name)
    }
}

impl Default for CodegenContext {
    fn default() -> Self {
        Self::new()
    }
}
