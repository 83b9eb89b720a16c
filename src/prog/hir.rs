//! Typed high-level representation of an Asl program.
//!
//! The HIR has the topology of the AST, plus a link from every name to the
//! binding that declares it. Expression and left-expression nodes carry
//! the type and the l-value flag computed by the semantic analysis, so
//! later passes read them as plain fields instead of consulting a side
//! table.
//!
//! Nodes only link to nodes built *before* them in the post-order
//! traversal of the AST, so the HIR is a DAG and plain `Rc` pointers
//! suffice.

use std::fmt;

pub use std::rc::Rc;

use crate::prog::kw;
use crate::prog::op::*;
use crate::ty::TyId;

#[derive(Debug)]
pub struct HProgram {
    pub funs: Vec<Rc<HFun>>,
}

/// A function definition, with its compiled signature and body.
#[derive(Debug)]
pub struct HFun {
    pub name: Rc<HName>,
    pub params: Vec<Rc<HVar>>,
    pub locals: Vec<Rc<HVar>>,
    /// Declared result type; `Void` when the function is a procedure.
    pub result_ty: TyId,
    /// The function type bound to the name in the global scope.
    pub ty: TyId,
    pub body: Vec<Rc<HStmt>>,
}

/// Binding of a name in some scope.
#[derive(Debug)]
pub struct HVar {
    pub name: Rc<HName>,
    pub ty: TyId,
    pub class: HVarClass,
}

/// Storage class of a binding. A local array denotes its storage
/// directly; an array parameter holds an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HVarClass {
    Local,
    Param,
    Fun,
}

#[derive(Debug)]
pub enum HStmt {
    Assign {
        target: Rc<HLexpr>,
        assign: syn::Token![=],
        value: Rc<HExpr>,
    },
    If {
        kw: syn::Token![if],
        cond: Rc<HExpr>,
        then_body: Vec<Rc<HStmt>>,
        else_body: Option<Vec<Rc<HStmt>>>,
    },
    While {
        kw: syn::Token![while],
        cond: Rc<HExpr>,
        body: Vec<Rc<HStmt>>,
    },
    Call {
        call: Rc<HCall>,
    },
    Read {
        kw: kw::read,
        target: Rc<HLexpr>,
    },
    WriteExpr {
        kw: kw::write,
        arg: Rc<HExpr>,
    },
    WriteStr {
        kw: kw::write,
        lit: syn::LitStr,
    },
    Return {
        kw: syn::Token![return],
        value: Option<Rc<HExpr>>,
    },
}

/// A left-expression: the target of an assignment or of a `read`.
#[derive(Debug)]
pub struct HLexpr {
    pub var: Rc<HVar>,
    pub name: Rc<HName>,
    pub index: Option<Rc<HExpr>>,
    pub ty: TyId,
    pub lvalue: bool,
}

/// An expression, decorated with its type and l-value flag.
#[derive(Debug)]
pub struct HExpr {
    pub kind: HExprKind,
    pub ty: TyId,
    pub lvalue: bool,
}

#[derive(Debug)]
pub enum HExprKind {
    Lit {
        lit: HLit,
    },
    Var {
        var: Rc<HVar>,
        name: Rc<HName>,
    },
    Subscript {
        var: Rc<HVar>,
        name: Rc<HName>,
        index: Rc<HExpr>,
    },
    Call {
        call: Rc<HCall>,
    },
    Paren {
        inner: Rc<HExpr>,
    },
    Unary {
        op: UnOp,
        expr: Rc<HExpr>,
    },
    Arith {
        op: ArithOp,
        left: Rc<HExpr>,
        right: Rc<HExpr>,
    },
    Rel {
        op: RelOp,
        left: Rc<HExpr>,
        right: Rc<HExpr>,
    },
    Log {
        op: LogOp,
        left: Rc<HExpr>,
        right: Rc<HExpr>,
    },
}

/// A literal value, kept as its source token.
#[derive(Debug)]
pub enum HLit {
    Int { token: syn::LitInt },
    Float { token: syn::LitFloat },
    Bool { token: syn::LitBool },
    Char { token: syn::LitChar },
}

/// A function or procedure call.
#[derive(Debug)]
pub struct HCall {
    pub fun: Rc<HVar>,
    pub name: Rc<HName>,
    pub args: Vec<Rc<HExpr>>,
}

/// An identifier (in any context).
#[derive(Debug)]
pub struct HName {
    pub ident: proc_macro2::Ident,
}

impl fmt::Display for HName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.ident, f)
    }
}
