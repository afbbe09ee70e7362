//! The symbol environment: lexically scoped variables, plus the process-wide
//! (well, per-[`crate::context::CodegenContext`]) function table.

use std::{
    cell::RefCell,
    collections::HashMap,
    rc::Rc,
};

use crate::{
    ast::FunctionDecl,
    error::{CodegenError, Position},
    types::{PrimKind, Ty},
};

/// A value handle: the register currently holding a value, plus its type.
/// Ephemeral — these flow up from child expression to parent expression and
/// are never stored anywhere.
#[derive(Debug, Clone)]
pub struct ValueHandle {
    pub reg_name: String,
    pub ty: Ty,
}

impl ValueHandle {
    pub fn new(reg_name: impl Into<String>, ty: Ty) -> Self {
        Self {
            reg_name: reg_name.into(),
            ty,
        }
    }
}

/// A variable handle: the stack pointer (or parameter-derived slot, or array
/// base pointer) backing a declared name.
#[derive(Debug, Clone)]
pub struct VarHandle {
    pub ptr_name: String,
    pub ty: Ty,
}

impl VarHandle {
    pub fn new(ptr_name: impl Into<String>, ty: Ty) -> Self {
        Self {
            ptr_name: ptr_name.into(),
            ty,
        }
    }
}

/// A registered function: its signature plus a handle back to the AST node
/// that defines it.
#[derive(Debug, Clone)]
pub struct FunctionHandle {
    pub name: String,
    pub return_kind: PrimKind,
    pub params: Vec<(String, Ty)>,
    pub decl: Rc<FunctionDecl>,
}

struct ScopeData {
    parent: Option<Scope>,
    variables: HashMap<String, VarHandle>,
}

/// A lexical scope. Cheap to clone (an `Rc` handle); cloning shares the same
/// underlying table rather than copying it.
#[derive(Clone)]
pub struct Scope(Rc<RefCell<ScopeData>>);

impl Scope {
    /// A fresh scope with no parent — used at the start of every function
    /// body. Crucially, this is *not* a child of whatever scope called into
    /// code generation: function bodies never see a caller's locals.
    pub fn root() -> Scope {
        Scope(Rc::new(RefCell::new(ScopeData {
            parent: None,
            variables: HashMap::new(),
        })))
    }

    /// A fresh, empty scope nested under `self` — used for each block.
    pub fn child(&self) -> Scope {
        Scope(Rc::new(RefCell::new(ScopeData {
            parent: Some(self.clone()),
            variables: HashMap::new(),
        })))
    }

    /// Inserts `name` into *this* scope's local table only. Fails if already
    /// present locally, even if a parent scope also binds `name` (shadowing
    /// across scopes is allowed; redeclaration within one scope is not).
    pub fn declare(&self, name: &str, handle: VarHandle, position: Position) -> Result<(), CodegenError> {
        let mut data = self.0.borrow_mut();
        if data.variables.contains_key(name) {
            return Err(CodegenError::duplicate_variable(name, position));
        }
        data.variables.insert(name.to_owned(), handle);
        Ok(())
    }

    /// Searches this scope, then each parent in turn, for `name`.
    pub fn lookup(&self, name: &str) -> Option<VarHandle> {
        let data = self.0.borrow();
        if let Some(handle) = data.variables.get(name) {
            return Some(handle.clone());
        }
        data.parent.as_ref().and_then(|parent| parent.lookup(name))
    }
}
