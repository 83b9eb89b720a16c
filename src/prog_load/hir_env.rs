//! Environment of the semantic analysis: a stack of lexical scopes.
//!
//! The global scope holds one `Fun`-class entry per declared function;
//! each function body is analyzed with one inner scope holding its
//! parameters and local variables. Lookup walks the stack innermost
//! first. The environment also carries the result type of the function
//! currently being analyzed, consulted by `return` statements.

use crate::prog::hir::*;
use crate::ty::{TyId, TyPool};

use super::diagnostic::*;

pub struct Env {
    scopes: Vec<Scope>,
    result_ty: TyId,
}

#[derive(Default)]
struct Scope {
    entries: Vec<Rc<HVar>>,
}

impl Env {
    pub fn new(result_ty: TyId) -> Self {
        Env {
            scopes: vec![Scope::default()],
            result_ty,
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Declares a binding in the innermost scope. A clash with a name
    /// already bound in the same scope keeps the first binding.
    pub fn declare(&mut self, var: &Rc<HVar>, dgns: &mut Vec<Diagnostic>) {
        let scope = self.scopes.last_mut().expect("scope stack is never empty");
        match scope.entries.iter().find(|v| v.name.ident == var.name.ident) {
            Some(old) => dgns.push(Diagnostic::AlreadyDeclaredIdent {
                new_name: var.name.clone(),
                old_name: old.name.clone(),
            }),
            None => scope.entries.push(var.clone()),
        }
    }

    /// Resolves a name, innermost scope first. An undeclared name is
    /// reported and yields an error-typed binding, so every use site
    /// still gets a link.
    pub fn resolve(
        &self,
        name: &Rc<HName>,
        tys: &TyPool,
        dgns: &mut Vec<Diagnostic>,
    ) -> Rc<HVar> {
        match self.maybe_resolve(name) {
            Some(var) => var,
            None => {
                dgns.push(Diagnostic::UndeclaredIdent { name: name.clone() });
                Rc::new(HVar {
                    name: name.clone(),
                    ty: tys.err(),
                    class: HVarClass::Local,
                })
            }
        }
    }

    fn maybe_resolve(&self, name: &Rc<HName>) -> Option<Rc<HVar>> {
        self.scopes
            .iter()
            .rev()
            .find_map(|s| s.entries.iter().find(|v| v.name.ident == name.ident).cloned())
    }

    pub fn set_result_ty(&mut self, ty: TyId) {
        self.result_ty = ty;
    }

    pub fn result_ty(&self) -> TyId {
        self.result_ty
    }

    /// True iff the global scope lacks a `main` function taking no
    /// parameters and returning nothing.
    pub fn no_main_properly_declared(&self, tys: &TyPool) -> bool {
        let entry = self
            .scopes
            .first()
            .and_then(|s| s.entries.iter().find(|v| v.name.ident == "main"));
        match entry {
            Some(var) => {
                !(var.class == HVarClass::Fun
                    && tys.fun_params(var.ty).is_empty()
                    && tys.is_void(tys.fun_result(var.ty)))
            }
            None => true,
        }
    }
}
