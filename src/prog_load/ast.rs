//! Abstract Syntax Tree (AST), obtained by parsing Asl source syntax.

use syn::punctuated::Punctuated;

use crate::prog::kw;
use crate::prog::op::*;

/// AST of a source file as a whole: one or more function definitions.
#[derive(Debug)]
pub struct AProgram {
    pub funs: Vec<AFun>,
}

/// AST of, e.g., `func f(a: int): float ... endfunc`.
#[derive(Debug)]
pub struct AFun {
    pub kw: kw::func,
    pub name: AIdent,
    pub params_paren: syn::token::Paren,
    pub params: Punctuated<AParam, syn::Token![,]>,
    pub result: Option<(syn::Token![:], ABasicTy)>,
    pub decls: Vec<ADecl>,
    pub stmts: Vec<AStmt>,
    pub end: kw::endfunc,
}

/// AST of, e.g., `a: array [5] of int` in a parameter list.
#[derive(Debug)]
pub struct AParam {
    pub name: AIdent,
    pub colon: syn::Token![:],
    pub ty: ATy,
}

/// AST of, e.g., `var a, b: int;`.
#[derive(Debug)]
pub struct ADecl {
    pub kw: kw::var,
    pub names: Punctuated<AIdent, syn::Token![,]>,
    pub colon: syn::Token![:],
    pub ty: ATy,
    pub semi: syn::Token![;],
}

#[derive(Debug)]
pub enum ATy {
    Basic(ABasicTy),
    Array {
        kw: kw::array,
        bracket: syn::token::Bracket,
        len: syn::LitInt,
        of: kw::of,
        elem: ABasicTy,
    },
}

/// A basic type name; validated during semantic analysis.
#[derive(Debug)]
pub struct ABasicTy {
    pub ident: AIdent,
}

#[derive(Debug)]
pub enum AStmt {
    /// AST of, e.g., `x[i] = 3 + 4;`.
    Assign {
        target: ALexpr,
        assign: syn::Token![=],
        value: AExpr,
        semi: syn::Token![;],
    },
    /// AST of, e.g., `if b then ... else ... endif`.
    If {
        kw: syn::Token![if],
        cond: AExpr,
        then: kw::then,
        then_body: Vec<AStmt>,
        else_body: Option<(syn::Token![else], Vec<AStmt>)>,
        end: kw::endif,
    },
    /// AST of, e.g., `while i < n do ... endwhile`.
    While {
        kw: syn::Token![while],
        cond: AExpr,
        do_token: syn::Token![do],
        body: Vec<AStmt>,
        end: kw::endwhile,
    },
    /// AST of, e.g., `f(x, 3);`.
    Call { call: ACall, semi: syn::Token![;] },
    /// AST of, e.g., `read a[0];`.
    Read {
        kw: kw::read,
        target: ALexpr,
        semi: syn::Token![;],
    },
    /// AST of, e.g., `write x + 1;` or `write "done\n";`.
    Write {
        kw: kw::write,
        arg: AWriteArg,
        semi: syn::Token![;],
    },
    /// AST of, e.g., `return x;`.
    Return {
        kw: syn::Token![return],
        value: Option<AExpr>,
        semi: syn::Token![;],
    },
}

#[derive(Debug)]
pub enum AWriteArg {
    Str(syn::LitStr),
    Expr(AExpr),
}

/// AST of a left-expression: `ident` or `ident[expr]`.
#[derive(Debug)]
pub struct ALexpr {
    pub ident: AIdent,
    pub index: Option<(syn::token::Bracket, Box<AExpr>)>,
}

/// AST of, e.g., `f(x, a[i])`.
#[derive(Debug)]
pub struct ACall {
    pub name: AIdent,
    pub paren: syn::token::Paren,
    pub args: Punctuated<AExpr, syn::Token![,]>,
}

#[derive(Debug)]
pub enum AExpr {
    Lit {
        lit: ALit,
    },
    Ref {
        ident: AIdent,
    },
    Subscript {
        ident: AIdent,
        bracket: syn::token::Bracket,
        index: Box<AExpr>,
    },
    Call(ACall),
    Paren {
        paren: syn::token::Paren,
        inner: Box<AExpr>,
    },
    Unary {
        op: UnOp,
        expr: Box<AExpr>,
    },
    Arith {
        op: ArithOp,
        left: Box<AExpr>,
        right: Box<AExpr>,
    },
    Rel {
        op: RelOp,
        left: Box<AExpr>,
        right: Box<AExpr>,
    },
    Log {
        op: LogOp,
        left: Box<AExpr>,
        right: Box<AExpr>,
    },
}

#[derive(Debug)]
pub enum ALit {
    Int(syn::LitInt),
    Float(syn::LitFloat),
    Bool(syn::LitBool),
    Char(syn::LitChar),
}

/// AST of an identifier, including variable names, function names, and
/// type names.
#[derive(Debug)]
pub struct AIdent {
    pub token: proc_macro2::Ident,
}
