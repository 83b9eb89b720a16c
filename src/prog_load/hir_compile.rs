//! Transform an AST into typed HIR.
//!
//! The transformation traverses the AST in post-order, building HIR nodes
//! decorated with their type and l-value flag while pushing diagnostics.
//! Function signatures are collected into the global scope first, so a
//! body may call functions declared later in the file. An operand that
//! already failed to type keeps its checks silent: only the first cause
//! of an error is reported.

use std::str::FromStr;

use crate::basic::BasicTy;
use crate::prog::hir::*;
use crate::prog::hir_span::HasSpan;
use crate::prog::op::*;
use crate::ty::{TyId, TyPool};

use super::ast::*;
use super::diagnostic::*;
use super::hir_env::*;

/// Mutable state threaded through the whole compilation.
pub struct Cx<'a> {
    pub env: Env,
    pub tys: &'a mut TyPool,
    pub dgns: &'a mut Vec<Diagnostic>,
}

trait HirCompileFrom<T, E = ()> {
    fn compile(ast: T, env: &E, cx: &mut Cx) -> Self;
}

impl<T, U, E> HirCompileFrom<T, E> for Rc<U>
where
    U: HirCompileFrom<T, E>,
{
    fn compile(ast: T, env: &E, cx: &mut Cx) -> Self {
        Rc::new(U::compile(ast, env, cx))
    }
}

trait HirCompileInto<T, E = ()> {
    fn compile(self, env: &E, cx: &mut Cx) -> T;
}

impl<U, T, E> HirCompileInto<U, E> for T
where
    U: HirCompileFrom<T, E>,
{
    fn compile(self, env: &E, cx: &mut Cx) -> U {
        U::compile(self, env, cx)
    }
}

/// Signature of a function, resolved before any body is analyzed.
struct FunSig {
    var: Rc<HVar>,
    param_tys: Vec<TyId>,
    result_ty: TyId,
}

pub fn compile_hir(
    ast: AProgram,
    tys: &mut TyPool,
    dgns: &mut Vec<Diagnostic>,
) -> Result<Rc<HProgram>, ()> {
    let void = tys.void();
    let mut cx = Cx {
        env: Env::new(void),
        tys,
        dgns,
    };

    let mut sigs = Vec::new();
    for fun in &ast.funs {
        let param_tys: Vec<TyId> = fun
            .params
            .iter()
            .map(|p| compile_ty(&p.ty, &mut cx))
            .collect();
        let result_ty = match &fun.result {
            Some((_, ty)) => match compile_basic_ty(ty, &mut cx) {
                Some(basic) => cx.tys.basic(basic),
                None => cx.tys.err(),
            },
            None => cx.tys.void(),
        };
        let ty = cx.tys.fun_of(param_tys.clone(), result_ty);
        let var = Rc::new(HVar {
            name: Rc::new(HName {
                ident: fun.name.token.clone(),
            }),
            ty,
            class: HVarClass::Fun,
        });
        cx.env.declare(&var, cx.dgns);
        sigs.push(FunSig {
            var,
            param_tys,
            result_ty,
        });
    }

    let funs: Vec<Rc<HFun>> = ast
        .funs
        .into_iter()
        .zip(sigs)
        .map(|(fun, sig)| fun.compile(&sig, &mut cx))
        .collect();

    if cx.env.no_main_properly_declared(cx.tys) {
        cx.dgns.push(Diagnostic::NoMainProperlyDeclared);
    }

    if cx.dgns.iter().any(|d| d.is_critical()) {
        return Err(());
    }

    Ok(Rc::new(HProgram { funs }))
}

fn compile_basic_ty(ast: &ABasicTy, cx: &mut Cx) -> Option<BasicTy> {
    match BasicTy::from_str(&ast.ident.token.to_string()) {
        Ok(basic) => Some(basic),
        Err(()) => {
            cx.dgns.push(Diagnostic::InvalidBasicTy {
                name: Rc::new(HName {
                    ident: ast.ident.token.clone(),
                }),
            });
            None
        }
    }
}

fn compile_ty(ast: &ATy, cx: &mut Cx) -> TyId {
    match ast {
        ATy::Basic(basic) => match compile_basic_ty(basic, cx) {
            Some(basic) => cx.tys.basic(basic),
            None => cx.tys.err(),
        },
        ATy::Array { len, elem, .. } => {
            let len = match len.base10_parse::<usize>() {
                Ok(len) => len,
                Err(error) => {
                    cx.dgns.push(Diagnostic::ParseError { error });
                    0
                }
            };
            match compile_basic_ty(elem, cx) {
                Some(elem) => cx.tys.array_of(elem, len),
                None => cx.tys.err(),
            }
        }
    }
}

impl HirCompileFrom<AFun, FunSig> for HFun {
    fn compile(ast: AFun, sig: &FunSig, cx: &mut Cx) -> Self {
        cx.env.set_result_ty(sig.result_ty);
        cx.env.push_scope();

        let mut params = Vec::new();
        for (param, &ty) in ast.params.into_iter().zip(sig.param_tys.iter()) {
            let var = Rc::new(HVar {
                name: Rc::new(HName {
                    ident: param.name.token,
                }),
                ty,
                class: HVarClass::Param,
            });
            cx.env.declare(&var, cx.dgns);
            params.push(var);
        }

        let mut locals = Vec::new();
        for decl in ast.decls {
            let ty = compile_ty(&decl.ty, cx);
            for name in decl.names {
                let var = Rc::new(HVar {
                    name: Rc::new(HName { ident: name.token }),
                    ty,
                    class: HVarClass::Local,
                });
                cx.env.declare(&var, cx.dgns);
                locals.push(var);
            }
        }

        let body: Vec<Rc<HStmt>> = ast.stmts.into_iter().map(|s| s.compile(&(), cx)).collect();

        cx.env.pop_scope();

        HFun {
            name: sig.var.name.clone(),
            params,
            locals,
            result_ty: sig.result_ty,
            ty: sig.var.ty,
            body,
        }
    }
}

impl HirCompileFrom<AStmt> for HStmt {
    fn compile(ast: AStmt, _: &(), cx: &mut Cx) -> Self {
        match ast {
            AStmt::Assign {
                target,
                assign,
                value,
                ..
            } => {
                let target: Rc<HLexpr> = target.compile(&(), cx);
                let value: Rc<HExpr> = value.compile(&(), cx);
                if !cx.tys.is_err(target.ty)
                    && !cx.tys.is_err(value.ty)
                    && !cx.tys.copyable_tys(target.ty, value.ty)
                {
                    cx.dgns.push(Diagnostic::IncompatibleAssignment {
                        span: assign.spans[0],
                        target: target.ty,
                        value: value.ty,
                    });
                }
                if !cx.tys.is_err(target.ty) && !target.lvalue {
                    cx.dgns.push(Diagnostic::NonReferenceableLeftExpr {
                        span: target.span(),
                    });
                }
                HStmt::Assign {
                    target,
                    assign,
                    value,
                }
            }
            AStmt::If {
                kw,
                cond,
                then_body,
                else_body,
                ..
            } => {
                let cond: Rc<HExpr> = cond.compile(&(), cx);
                if !cx.tys.is_err(cond.ty) && !cx.tys.is_bool(cond.ty) {
                    cx.dgns.push(Diagnostic::BooleanRequired {
                        span: kw.span,
                        found: cond.ty,
                    });
                }
                let then_body = then_body.into_iter().map(|s| s.compile(&(), cx)).collect();
                let else_body = else_body
                    .map(|(_, stmts)| stmts.into_iter().map(|s| s.compile(&(), cx)).collect());
                HStmt::If {
                    kw,
                    cond,
                    then_body,
                    else_body,
                }
            }
            AStmt::While { kw, cond, body, .. } => {
                let cond: Rc<HExpr> = cond.compile(&(), cx);
                if !cx.tys.is_err(cond.ty) && !cx.tys.is_bool(cond.ty) {
                    cx.dgns.push(Diagnostic::BooleanRequired {
                        span: kw.span,
                        found: cond.ty,
                    });
                }
                let body = body.into_iter().map(|s| s.compile(&(), cx)).collect();
                HStmt::While { kw, cond, body }
            }
            AStmt::Call { call, .. } => {
                // The statement form accepts any function, returning or not.
                let call: Rc<HCall> = call.compile(&(), cx);
                HStmt::Call { call }
            }
            AStmt::Read { kw, target, .. } => {
                let target: Rc<HLexpr> = target.compile(&(), cx);
                if !cx.tys.is_err(target.ty)
                    && !cx.tys.is_basic(target.ty)
                    && !cx.tys.is_fun(target.ty)
                {
                    cx.dgns.push(Diagnostic::ReadWriteRequireBasic {
                        span: kw.span,
                        found: target.ty,
                    });
                }
                if !cx.tys.is_err(target.ty) && !target.lvalue {
                    cx.dgns
                        .push(Diagnostic::NonReferenceableExpression { span: kw.span });
                }
                HStmt::Read { kw, target }
            }
            AStmt::Write { kw, arg, .. } => match arg {
                AWriteArg::Expr(arg) => {
                    let arg: Rc<HExpr> = arg.compile(&(), cx);
                    if !cx.tys.is_err(arg.ty) && !cx.tys.is_basic(arg.ty) {
                        cx.dgns.push(Diagnostic::ReadWriteRequireBasic {
                            span: kw.span,
                            found: arg.ty,
                        });
                    }
                    HStmt::WriteExpr { kw, arg }
                }
                AWriteArg::Str(lit) => HStmt::WriteStr { kw, lit },
            },
            AStmt::Return { kw, value, .. } => {
                let result_ty = cx.env.result_ty();
                let value: Option<Rc<HExpr>> = value.map(|e| e.compile(&(), cx));
                match &value {
                    Some(e) => {
                        if !cx.tys.is_err(e.ty) {
                            let widened = cx.tys.is_float(result_ty) && cx.tys.is_int(e.ty);
                            if cx.tys.is_void(result_ty)
                                || !cx.tys.is_basic(e.ty)
                                || (e.ty != result_ty && !widened)
                            {
                                cx.dgns
                                    .push(Diagnostic::IncompatibleReturn { span: kw.span });
                            }
                        }
                    }
                    None => {
                        if !cx.tys.is_void(result_ty) {
                            cx.dgns
                                .push(Diagnostic::IncompatibleReturn { span: kw.span });
                        }
                    }
                }
                HStmt::Return { kw, value }
            }
        }
    }
}

impl HirCompileFrom<ALexpr> for HLexpr {
    fn compile(ast: ALexpr, _: &(), cx: &mut Cx) -> Self {
        let name = Rc::new(HName {
            ident: ast.ident.token,
        });
        let var = cx.env.resolve(&name, cx.tys, cx.dgns);
        let mut ty = var.ty;
        let mut lvalue = var.class != HVarClass::Fun;

        let index = ast.index.map(|(_, index)| {
            let index: Rc<HExpr> = (*index).compile(&(), cx);
            if !cx.tys.is_err(ty) {
                subscript_checks(&name, &index, &mut ty, &mut lvalue, cx);
            }
            index
        });

        HLexpr {
            var,
            name,
            index,
            ty,
            lvalue,
        }
    }
}

/// Shared typing rules of `id[E]`, in left-expression and expression
/// position alike: the index must be an integer, the base must be an
/// array; the result is the element type with the base's l-value flag.
fn subscript_checks(
    name: &Rc<HName>,
    index: &Rc<HExpr>,
    ty: &mut TyId,
    lvalue: &mut bool,
    cx: &mut Cx,
) {
    if !cx.tys.is_err(index.ty) && !cx.tys.is_int(index.ty) {
        cx.dgns.push(Diagnostic::NonIntegerIndexInArrayAccess {
            span: index.span(),
            found: index.ty,
        });
        *lvalue = false;
    }
    if !cx.tys.is_array(*ty) {
        cx.dgns.push(Diagnostic::NonArrayInArrayAccess {
            span: name.span(),
            found: *ty,
        });
        *lvalue = false;
        *ty = cx.tys.err();
    } else {
        *ty = cx.tys.basic(cx.tys.array_elem(*ty));
    }
}

impl HirCompileFrom<ACall> for HCall {
    fn compile(ast: ACall, _: &(), cx: &mut Cx) -> Self {
        let name = Rc::new(HName {
            ident: ast.name.token,
        });
        let fun = cx.env.resolve(&name, cx.tys, cx.dgns);
        // arguments are always visited, so that every node gets a type
        let args: Vec<Rc<HExpr>> = ast.args.into_iter().map(|a| a.compile(&(), cx)).collect();

        let fty = fun.ty;
        if !cx.tys.is_err(fty) && !cx.tys.is_fun(fty) {
            cx.dgns
                .push(Diagnostic::IsNotCallable { name: name.clone() });
        } else if !cx.tys.is_err(fty) {
            let param_tys = cx.tys.fun_params(fty).to_vec();
            if args.len() != param_tys.len() {
                cx.dgns
                    .push(Diagnostic::NumberOfParameters { name: name.clone() });
            } else {
                for (i, (arg, &param_ty)) in args.iter().zip(param_tys.iter()).enumerate() {
                    if !cx.tys.is_err(arg.ty)
                        && arg.ty != param_ty
                        && !(cx.tys.is_float(param_ty) && cx.tys.is_int(arg.ty))
                    {
                        cx.dgns.push(Diagnostic::IncompatibleParameter {
                            span: arg.span(),
                            index: i + 1,
                            expected: param_ty,
                            found: arg.ty,
                        });
                    }
                }
            }
        }

        HCall { fun, name, args }
    }
}

impl HirCompileFrom<AExpr> for HExpr {
    fn compile(ast: AExpr, _: &(), cx: &mut Cx) -> Self {
        match ast {
            AExpr::Lit { lit } => {
                let (lit, ty) = match lit {
                    ALit::Int(token) => (HLit::Int { token }, cx.tys.int()),
                    ALit::Float(token) => (HLit::Float { token }, cx.tys.float()),
                    ALit::Bool(token) => (HLit::Bool { token }, cx.tys.boolean()),
                    ALit::Char(token) => (HLit::Char { token }, cx.tys.character()),
                };
                HExpr {
                    kind: HExprKind::Lit { lit },
                    ty,
                    lvalue: false,
                }
            }
            AExpr::Ref { ident } => {
                let name = Rc::new(HName { ident: ident.token });
                let var = cx.env.resolve(&name, cx.tys, cx.dgns);
                let ty = var.ty;
                // l-value even when undeclared, to avoid cascading errors
                let lvalue = var.class != HVarClass::Fun;
                HExpr {
                    kind: HExprKind::Var { var, name },
                    ty,
                    lvalue,
                }
            }
            AExpr::Subscript { ident, index, .. } => {
                let name = Rc::new(HName { ident: ident.token });
                let var = cx.env.resolve(&name, cx.tys, cx.dgns);
                let index: Rc<HExpr> = (*index).compile(&(), cx);
                let mut ty = var.ty;
                let mut lvalue = var.class != HVarClass::Fun;
                if !cx.tys.is_err(ty) {
                    subscript_checks(&name, &index, &mut ty, &mut lvalue, cx);
                }
                HExpr {
                    kind: HExprKind::Subscript { var, name, index },
                    ty,
                    lvalue,
                }
            }
            AExpr::Call(ast) => {
                let call: Rc<HCall> = ast.compile(&(), cx);
                let fty = call.fun.ty;
                let mut ty = cx.tys.err();
                if cx.tys.is_fun(fty) {
                    ty = cx.tys.fun_result(fty);
                    if cx.tys.is_void(ty) {
                        cx.dgns.push(Diagnostic::IsNotFunction {
                            name: call.name.clone(),
                        });
                        ty = cx.tys.err();
                    }
                }
                HExpr {
                    kind: HExprKind::Call { call },
                    ty,
                    lvalue: false,
                }
            }
            AExpr::Paren { inner, .. } => {
                let inner: Rc<HExpr> = (*inner).compile(&(), cx);
                HExpr {
                    ty: inner.ty,
                    lvalue: false,
                    kind: HExprKind::Paren { inner },
                }
            }
            AExpr::Unary { op, expr } => {
                let expr: Rc<HExpr> = (*expr).compile(&(), cx);
                let ty = if cx.tys.is_err(expr.ty) {
                    cx.tys.err()
                } else {
                    match op {
                        UnOp::Not(_) => {
                            if !cx.tys.is_bool(expr.ty) {
                                cx.dgns.push(Diagnostic::BooleanRequired {
                                    span: expr.span(),
                                    found: expr.ty,
                                });
                            }
                            cx.tys.boolean()
                        }
                        UnOp::Plus(_) | UnOp::Minus(_) => {
                            if !cx.tys.is_numeric(expr.ty) {
                                cx.dgns.push(Diagnostic::IncompatibleOperator {
                                    op: op.to_string(),
                                    span: op.span(),
                                });
                            }
                            expr.ty
                        }
                    }
                };
                HExpr {
                    kind: HExprKind::Unary { op, expr },
                    ty,
                    lvalue: false,
                }
            }
            AExpr::Arith { op, left, right } => {
                let left: Rc<HExpr> = (*left).compile(&(), cx);
                let right: Rc<HExpr> = (*right).compile(&(), cx);
                let ty = if cx.tys.is_err(left.ty) || cx.tys.is_err(right.ty) {
                    cx.tys.err()
                } else {
                    match op {
                        ArithOp::Mod(_) => {
                            if !cx.tys.is_int(left.ty) || !cx.tys.is_int(right.ty) {
                                cx.dgns.push(Diagnostic::IncompatibleOperator {
                                    op: op.to_string(),
                                    span: op.span(),
                                });
                            }
                            cx.tys.int()
                        }
                        _ => {
                            if !cx.tys.is_numeric(left.ty) || !cx.tys.is_numeric(right.ty) {
                                cx.dgns.push(Diagnostic::IncompatibleOperator {
                                    op: op.to_string(),
                                    span: op.span(),
                                });
                            }
                            if cx.tys.is_float(left.ty) || cx.tys.is_float(right.ty) {
                                cx.tys.float()
                            } else {
                                cx.tys.int()
                            }
                        }
                    }
                };
                HExpr {
                    kind: HExprKind::Arith { op, left, right },
                    ty,
                    lvalue: false,
                }
            }
            AExpr::Rel { op, left, right } => {
                let left: Rc<HExpr> = (*left).compile(&(), cx);
                let right: Rc<HExpr> = (*right).compile(&(), cx);
                let ty = if cx.tys.is_err(left.ty) || cx.tys.is_err(right.ty) {
                    cx.tys.err()
                } else {
                    if !cx.tys.comparable_tys(left.ty, right.ty, op.comparison()) {
                        cx.dgns.push(Diagnostic::IncompatibleOperator {
                            op: op.to_string(),
                            span: op.span(),
                        });
                    }
                    cx.tys.boolean()
                };
                HExpr {
                    kind: HExprKind::Rel { op, left, right },
                    ty,
                    lvalue: false,
                }
            }
            AExpr::Log { op, left, right } => {
                let left: Rc<HExpr> = (*left).compile(&(), cx);
                let right: Rc<HExpr> = (*right).compile(&(), cx);
                let ty = if cx.tys.is_err(left.ty) || cx.tys.is_err(right.ty) {
                    cx.tys.err()
                } else {
                    if !cx.tys.is_bool(left.ty) || !cx.tys.is_bool(right.ty) {
                        cx.dgns.push(Diagnostic::IncompatibleOperator {
                            op: op.to_string(),
                            span: op.span(),
                        });
                    }
                    cx.tys.boolean()
                };
                HExpr {
                    kind: HExprKind::Log { op, left, right },
                    ty,
                    lvalue: false,
                }
            }
        }
    }
}
