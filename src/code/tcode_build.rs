//! Build t-code from the typed HIR.
//!
//! Expressions lower to an `(addr, offs, code)` triple: `addr` names the
//! symbol or temporary holding (or pointing at) the value, `offs` is the
//! index operand when `addr` denotes an array, and `code` computes it.
//! Statements lower to a plain instruction list. Temporary and label
//! numbering restarts at every function, so the output is deterministic.

use crate::prog::hir::*;
use crate::prog::op::*;
use crate::ty::{TyId, TyPool};

use super::tcode::*;

/// Address/offset/code triple computed for an expression.
struct CodeAttribs {
    addr: String,
    offs: String,
    code: Vec<Instr>,
}

impl CodeAttribs {
    fn new(addr: String, offs: String, code: Vec<Instr>) -> Self {
        CodeAttribs { addr, offs, code }
    }
}

pub struct Builder<'a> {
    tys: &'a TyPool,
    counters: Counters,
    result_ty: TyId,
}

pub fn build_code(prog: &HProgram, tys: &TyPool) -> TProgram {
    let mut builder = Builder {
        tys,
        counters: Counters::default(),
        result_ty: tys.void(),
    };
    TProgram {
        subs: prog.funs.iter().map(|f| builder.fun(f)).collect(),
    }
}

impl Builder<'_> {
    fn fun(&mut self, fun: &HFun) -> Subroutine {
        self.counters.reset();
        self.result_ty = fun.result_ty;

        let mut params = Vec::new();
        if !self.tys.is_void(fun.result_ty) {
            params.push("_result".to_string());
        }
        params.extend(fun.params.iter().map(|p| p.name.to_string()));

        let vars = fun
            .locals
            .iter()
            .map(|v| LocalVar {
                name: v.name.to_string(),
                size: self.tys.size_of(v.ty),
            })
            .collect();

        let mut instrs = self.stmts(&fun.body);
        instrs.push(Instr::Return);

        Subroutine {
            name: fun.name.to_string(),
            params,
            vars,
            instrs,
        }
    }

    fn stmts(&mut self, stmts: &[Rc<HStmt>]) -> Vec<Instr> {
        let mut code = Vec::new();
        for stmt in stmts {
            code.extend(self.stmt(stmt));
        }
        code
    }

    fn stmt(&mut self, stmt: &HStmt) -> Vec<Instr> {
        match stmt {
            HStmt::Assign { target, value, .. } => self.assign(target, value),
            HStmt::If {
                cond,
                then_body,
                else_body,
                ..
            } => {
                let cond = self.expr(cond);
                let then_code = self.stmts(then_body);
                let suffix = self.counters.new_label_if();
                let end_label = format!("endif{}", suffix);

                let mut code = cond.code;
                match else_body {
                    Some(else_body) => {
                        let else_label = format!("else{}", suffix);
                        let else_code = self.stmts(else_body);
                        code.push(Instr::FJump {
                            cond: cond.addr,
                            label: else_label.clone(),
                        });
                        code.extend(then_code);
                        code.push(Instr::UJump {
                            label: end_label.clone(),
                        });
                        code.push(Instr::Label { name: else_label });
                        code.extend(else_code);
                        code.push(Instr::Label { name: end_label });
                    }
                    None => {
                        code.push(Instr::FJump {
                            cond: cond.addr,
                            label: end_label.clone(),
                        });
                        code.extend(then_code);
                        code.push(Instr::Label { name: end_label });
                    }
                }
                code
            }
            HStmt::While { cond, body, .. } => {
                let cond = self.expr(cond);
                let body_code = self.stmts(body);
                let label = format!("while{}", self.counters.new_label_while());
                let end_label = format!("end{}", label);

                let mut code = vec![Instr::Label {
                    name: label.clone(),
                }];
                code.extend(cond.code);
                code.push(Instr::FJump {
                    cond: cond.addr,
                    label: end_label.clone(),
                });
                code.extend(body_code);
                code.push(Instr::UJump { label });
                code.push(Instr::Label { name: end_label });
                code
            }
            HStmt::Call { call } => {
                let (_, code) = self.call(call);
                code
            }
            HStmt::Read { target, .. } => {
                let ta = self.lexpr(target);
                let mut code = ta.code;
                if !ta.offs.is_empty() {
                    let temp = self.counters.new_temp();
                    code.push(self.read_instr(target.ty, temp.clone()));
                    code.push(Instr::XLoad {
                        base: ta.addr,
                        offs: ta.offs,
                        src: temp,
                    });
                } else {
                    code.push(self.read_instr(target.ty, ta.addr));
                }
                code
            }
            HStmt::WriteExpr { arg, .. } => {
                let a = self.expr(arg);
                let mut code = a.code;
                code.push(if self.tys.is_float(arg.ty) {
                    Instr::WriteF { src: a.addr }
                } else if self.tys.is_char(arg.ty) {
                    Instr::WriteC { src: a.addr }
                } else {
                    Instr::WriteI { src: a.addr }
                });
                code
            }
            HStmt::WriteStr { lit, .. } => self.write_str(lit),
            HStmt::Return { value, .. } => match value {
                Some(value) => {
                    let a = self.expr(value);
                    let mut code = a.code;
                    let mut addr = a.addr;
                    if self.tys.is_float(self.result_ty) && self.tys.is_int(value.ty) {
                        let temp = self.counters.new_temp();
                        code.push(Instr::Float {
                            dst: temp.clone(),
                            src: addr,
                        });
                        addr = temp;
                    }
                    code.push(Instr::Load {
                        dst: "_result".to_string(),
                        src: addr,
                    });
                    code
                }
                None => Vec::new(),
            },
        }
    }

    /// Assignment, by the shapes of the two sides: plain copy, array
    /// element on either side, or a whole-array copy loop.
    fn assign(&mut self, target: &HLexpr, value: &HExpr) -> Vec<Instr> {
        if self.tys.is_array(target.ty) && self.tys.is_array(value.ty) {
            return self.array_copy(target, value);
        }

        let ta = self.lexpr(target);
        let ea = match &value.kind {
            HExprKind::Subscript { var, name, index } => self.elem_addr(var, name, index),
            _ => self.expr(value),
        };

        let mut code = ta.code;
        code.extend(ea.code);
        match (ta.offs.is_empty(), ea.offs.is_empty()) {
            (true, true) => code.push(Instr::Load {
                dst: ta.addr,
                src: ea.addr,
            }),
            (false, true) => code.push(Instr::XLoad {
                base: ta.addr,
                offs: ta.offs,
                src: ea.addr,
            }),
            (true, false) => {
                let temp = self.counters.new_temp();
                code.push(Instr::LoadX {
                    dst: temp.clone(),
                    base: ea.addr,
                    offs: ea.offs,
                });
                code.push(Instr::Load {
                    dst: ta.addr,
                    src: temp,
                });
            }
            (false, false) => {
                let temp = self.counters.new_temp();
                code.push(Instr::LoadX {
                    dst: temp.clone(),
                    base: ea.addr,
                    offs: ea.offs,
                });
                code.push(Instr::XLoad {
                    base: ta.addr,
                    offs: ta.offs,
                    src: temp,
                });
            }
        }
        code
    }

    /// Canonical element-by-element copy loop between two whole arrays.
    /// Non-local operands hold an address, so their base pointer is
    /// first materialized into a temporary.
    fn array_copy(&mut self, target: &HLexpr, value: &HExpr) -> Vec<Instr> {
        let (src_var, src_name) = array_base(value);
        let dst_local = target.var.class == HVarClass::Local;
        let src_local = src_var.class == HVarClass::Local;

        let mut code = Vec::new();

        let temp_dst = self.counters.new_temp();
        let temp_src = self.counters.new_temp();
        if !dst_local {
            code.push(Instr::Load {
                dst: temp_dst.clone(),
                src: target.name.to_string(),
            });
        }
        if !src_local {
            code.push(Instr::Load {
                dst: temp_src.clone(),
                src: src_name.to_string(),
            });
        }
        let dst_base = if dst_local {
            target.name.to_string()
        } else {
            temp_dst
        };
        let src_base = if src_local {
            src_name.to_string()
        } else {
            temp_src
        };

        let index = self.counters.new_temp();
        let increm = self.counters.new_temp();
        let size = self.counters.new_temp();
        let stride = self.counters.new_temp();
        let offset = self.counters.new_temp();
        let compar = self.counters.new_temp();
        let value_temp = self.counters.new_temp();

        let label = format!("while{}", self.counters.new_label_while());
        let end_label = format!("end{}", label);

        let len = self.tys.array_len(src_var.ty);
        let elem = self.tys.array_elem(src_var.ty);
        let elem_size = self.tys.size_of(self.tys.basic(elem));

        code.push(Instr::ILoad {
            dst: index.clone(),
            lit: "0".to_string(),
        });
        code.push(Instr::ILoad {
            dst: increm.clone(),
            lit: "1".to_string(),
        });
        code.push(Instr::ILoad {
            dst: size.clone(),
            lit: len.to_string(),
        });
        code.push(Instr::ILoad {
            dst: stride.clone(),
            lit: elem_size.to_string(),
        });
        code.push(Instr::Label {
            name: label.clone(),
        });
        code.push(Instr::Lt {
            dst: compar.clone(),
            left: index.clone(),
            right: size,
        });
        code.push(Instr::FJump {
            cond: compar,
            label: end_label.clone(),
        });
        code.push(Instr::Mul {
            dst: offset.clone(),
            left: stride,
            right: index.clone(),
        });
        code.push(Instr::LoadX {
            dst: value_temp.clone(),
            base: src_base,
            offs: offset.clone(),
        });
        code.push(Instr::XLoad {
            base: dst_base,
            offs: offset,
            src: value_temp,
        });
        code.push(Instr::Add {
            dst: index.clone(),
            left: index,
            right: increm,
        });
        code.push(Instr::UJump { label });
        code.push(Instr::Label { name: end_label });
        code
    }

    /// Calls share one lowering: reserve the return slot for non-void
    /// callees, push arguments (widening ints passed for floats,
    /// passing arrays by address), call, pop the argument slots, and
    /// pop the result into a fresh temporary.
    fn call(&mut self, call: &HCall) -> (String, Vec<Instr>) {
        let tys = self.tys;
        let fty = call.fun.ty;
        let mut code = Vec::new();

        if !tys.is_void(tys.fun_result(fty)) {
            code.push(Instr::Push { src: None });
        }

        let param_tys = tys.fun_params(fty);
        for (arg, &param_ty) in call.args.iter().zip(param_tys.iter()) {
            let a = self.expr(arg);
            code.extend(a.code);
            if self.tys.is_float(param_ty) && self.tys.is_int(arg.ty) {
                let temp = self.counters.new_temp();
                code.push(Instr::Float {
                    dst: temp.clone(),
                    src: a.addr,
                });
                code.push(Instr::Push { src: Some(temp) });
            } else if self.tys.is_array(arg.ty) {
                let temp = self.counters.new_temp();
                code.push(Instr::ALoad {
                    dst: temp.clone(),
                    src: a.addr,
                });
                code.push(Instr::Push { src: Some(temp) });
            } else {
                code.push(Instr::Push { src: Some(a.addr) });
            }
        }

        code.push(Instr::Call {
            name: call.name.to_string(),
        });
        for _ in &call.args {
            code.push(Instr::Pop { dst: None });
        }

        let temp = self.counters.new_temp();
        code.push(Instr::Pop {
            dst: Some(temp.clone()),
        });
        (temp, code)
    }

    fn read_instr(&self, ty: TyId, dst: String) -> Instr {
        if self.tys.is_float(ty) {
            Instr::ReadF { dst }
        } else if self.tys.is_char(ty) {
            Instr::ReadC { dst }
        } else {
            Instr::ReadI { dst }
        }
    }

    /// Writes a string literal one character at a time, scanning the
    /// raw token text between the quotes. `\n` becomes WRITELN; `\t`,
    /// `\"` and `\\` keep their two-character escape; any other
    /// backslash is written as a literal character.
    fn write_str(&mut self, lit: &syn::LitStr) -> Vec<Instr> {
        let mut code = Vec::new();
        let temp = self.counters.new_temp();
        let chars: Vec<char> = lit.token().to_string().chars().collect();
        let mut i = 1;
        while i + 1 < chars.len() {
            if chars[i] != '\\' {
                code.push(Instr::ChLoad {
                    dst: temp.clone(),
                    lit: chars[i].to_string(),
                });
                code.push(Instr::WriteC { src: temp.clone() });
                i += 1;
            } else if chars[i + 1] == 'n' {
                code.push(Instr::WriteLn);
                i += 2;
            } else if chars[i + 1] == 't' || chars[i + 1] == '"' || chars[i + 1] == '\\' {
                code.push(Instr::ChLoad {
                    dst: temp.clone(),
                    lit: chars[i..i + 2].iter().collect(),
                });
                code.push(Instr::WriteC { src: temp.clone() });
                i += 2;
            } else {
                code.push(Instr::ChLoad {
                    dst: temp.clone(),
                    lit: chars[i].to_string(),
                });
                code.push(Instr::WriteC { src: temp.clone() });
                i += 1;
            }
        }
        code
    }

    /// A left-expression as an address: the bare symbol, or a
    /// base/offset pair for an array element.
    fn lexpr(&mut self, lexpr: &HLexpr) -> CodeAttribs {
        match &lexpr.index {
            Some(index) => self.elem_addr(&lexpr.var, &lexpr.name, index),
            None => CodeAttribs::new(lexpr.name.to_string(), String::new(), Vec::new()),
        }
    }

    /// Base/offset pair of `id[E]`. When `id` is not local-variable
    /// class it holds an address, materialized into a temporary first.
    fn elem_addr(&mut self, var: &Rc<HVar>, name: &HName, index: &HExpr) -> CodeAttribs {
        let idx = self.expr(index);
        let mut code = idx.code;
        if var.class == HVarClass::Local {
            CodeAttribs::new(name.to_string(), idx.addr, code)
        } else {
            let temp = self.counters.new_temp();
            code.push(Instr::Load {
                dst: temp.clone(),
                src: name.to_string(),
            });
            CodeAttribs::new(temp, idx.addr, code)
        }
    }

    fn expr(&mut self, expr: &HExpr) -> CodeAttribs {
        match &expr.kind {
            HExprKind::Lit { lit } => {
                let temp = self.counters.new_temp();
                let instr = match lit {
                    HLit::Int { token } => Instr::ILoad {
                        dst: temp.clone(),
                        lit: token.to_string(),
                    },
                    HLit::Float { token } => Instr::FLoad {
                        dst: temp.clone(),
                        lit: token.to_string(),
                    },
                    HLit::Bool { token } => Instr::Load {
                        dst: temp.clone(),
                        src: (if token.value { "1" } else { "0" }).to_string(),
                    },
                    HLit::Char { token } => Instr::ChLoad {
                        dst: temp.clone(),
                        lit: strip_quotes(token.token().to_string()),
                    },
                };
                CodeAttribs::new(temp, String::new(), vec![instr])
            }
            HExprKind::Var { name, .. } => {
                CodeAttribs::new(name.to_string(), String::new(), Vec::new())
            }
            HExprKind::Subscript { var, name, index } => {
                let idx = self.expr(index);
                let temp = self.counters.new_temp();
                let mut code = idx.code;
                let base = if var.class == HVarClass::Local {
                    name.to_string()
                } else {
                    let temp_a = self.counters.new_temp();
                    code.push(Instr::Load {
                        dst: temp_a.clone(),
                        src: name.to_string(),
                    });
                    temp_a
                };
                code.push(Instr::LoadX {
                    dst: temp.clone(),
                    base,
                    offs: idx.addr,
                });
                CodeAttribs::new(temp, String::new(), code)
            }
            HExprKind::Call { call } => {
                let (temp, code) = self.call(call);
                CodeAttribs::new(temp, String::new(), code)
            }
            HExprKind::Paren { inner } => self.expr(inner),
            HExprKind::Unary { op, expr: inner } => {
                let a = self.expr(inner);
                let temp = self.counters.new_temp();
                let mut code = a.code;
                code.push(match op {
                    UnOp::Not(_) => Instr::Not {
                        dst: temp.clone(),
                        src: a.addr,
                    },
                    UnOp::Minus(_) => {
                        if self.tys.is_float(inner.ty) {
                            Instr::FNeg {
                                dst: temp.clone(),
                                src: a.addr,
                            }
                        } else {
                            Instr::Neg {
                                dst: temp.clone(),
                                src: a.addr,
                            }
                        }
                    }
                    UnOp::Plus(_) => Instr::Load {
                        dst: temp.clone(),
                        src: a.addr,
                    },
                });
                CodeAttribs::new(temp, String::new(), code)
            }
            HExprKind::Arith { op, left, right } => {
                let l = self.expr(left);
                let r = self.expr(right);
                let mut code = l.code;
                code.extend(r.code);
                let temp = self.counters.new_temp();

                if !self.tys.is_float(left.ty) && !self.tys.is_float(right.ty) {
                    match op {
                        ArithOp::Mul(_) => code.push(Instr::Mul {
                            dst: temp.clone(),
                            left: l.addr,
                            right: r.addr,
                        }),
                        ArithOp::Div(_) => code.push(Instr::Div {
                            dst: temp.clone(),
                            left: l.addr,
                            right: r.addr,
                        }),
                        ArithOp::Add(_) => code.push(Instr::Add {
                            dst: temp.clone(),
                            left: l.addr,
                            right: r.addr,
                        }),
                        ArithOp::Sub(_) => code.push(Instr::Sub {
                            dst: temp.clone(),
                            left: l.addr,
                            right: r.addr,
                        }),
                        ArithOp::Mod(_) => {
                            // a % b  =  a - (a / b) * b
                            code.push(Instr::Div {
                                dst: temp.clone(),
                                left: l.addr.clone(),
                                right: r.addr.clone(),
                            });
                            code.push(Instr::Mul {
                                dst: temp.clone(),
                                left: temp.clone(),
                                right: r.addr,
                            });
                            code.push(Instr::Sub {
                                dst: temp.clone(),
                                left: l.addr,
                                right: temp.clone(),
                            });
                        }
                    }
                } else {
                    let (la, ra) = self.widen(l.addr, left.ty, r.addr, right.ty, &mut code);
                    match op {
                        ArithOp::Mul(_) => code.push(Instr::FMul {
                            dst: temp.clone(),
                            left: la,
                            right: ra,
                        }),
                        ArithOp::Div(_) => code.push(Instr::FDiv {
                            dst: temp.clone(),
                            left: la,
                            right: ra,
                        }),
                        ArithOp::Add(_) => code.push(Instr::FAdd {
                            dst: temp.clone(),
                            left: la,
                            right: ra,
                        }),
                        ArithOp::Sub(_) => code.push(Instr::FSub {
                            dst: temp.clone(),
                            left: la,
                            right: ra,
                        }),
                        ArithOp::Mod(_) => unreachable!("modulus is integer-only"),
                    }
                }
                CodeAttribs::new(temp, String::new(), code)
            }
            HExprKind::Rel { op, left, right } => {
                let l = self.expr(left);
                let r = self.expr(right);
                let mut code = l.code;
                code.extend(r.code);
                let temp = self.counters.new_temp();

                if !self.tys.is_float(left.ty) && !self.tys.is_float(right.ty) {
                    match op {
                        RelOp::Eq(_) => code.push(Instr::Eq {
                            dst: temp.clone(),
                            left: l.addr,
                            right: r.addr,
                        }),
                        RelOp::Ne(_) => {
                            code.push(Instr::Eq {
                                dst: temp.clone(),
                                left: l.addr,
                                right: r.addr,
                            });
                            code.push(Instr::Not {
                                dst: temp.clone(),
                                src: temp.clone(),
                            });
                        }
                        RelOp::Lt(_) => code.push(Instr::Lt {
                            dst: temp.clone(),
                            left: l.addr,
                            right: r.addr,
                        }),
                        RelOp::Le(_) => code.push(Instr::Le {
                            dst: temp.clone(),
                            left: l.addr,
                            right: r.addr,
                        }),
                        RelOp::Gt(_) => code.push(Instr::Lt {
                            dst: temp.clone(),
                            left: r.addr,
                            right: l.addr,
                        }),
                        RelOp::Ge(_) => code.push(Instr::Le {
                            dst: temp.clone(),
                            left: r.addr,
                            right: l.addr,
                        }),
                    }
                } else {
                    let (la, ra) = self.widen(l.addr, left.ty, r.addr, right.ty, &mut code);
                    match op {
                        RelOp::Eq(_) => code.push(Instr::FEq {
                            dst: temp.clone(),
                            left: la,
                            right: ra,
                        }),
                        RelOp::Ne(_) => {
                            code.push(Instr::FEq {
                                dst: temp.clone(),
                                left: la,
                                right: ra,
                            });
                            code.push(Instr::Not {
                                dst: temp.clone(),
                                src: temp.clone(),
                            });
                        }
                        RelOp::Lt(_) => code.push(Instr::FLt {
                            dst: temp.clone(),
                            left: la,
                            right: ra,
                        }),
                        RelOp::Le(_) => code.push(Instr::FLe {
                            dst: temp.clone(),
                            left: la,
                            right: ra,
                        }),
                        RelOp::Gt(_) => code.push(Instr::FLt {
                            dst: temp.clone(),
                            left: ra,
                            right: la,
                        }),
                        RelOp::Ge(_) => code.push(Instr::FLe {
                            dst: temp.clone(),
                            left: ra,
                            right: la,
                        }),
                    }
                }
                CodeAttribs::new(temp, String::new(), code)
            }
            HExprKind::Log { op, left, right } => {
                let l = self.expr(left);
                let r = self.expr(right);
                let mut code = l.code;
                code.extend(r.code);
                let temp = self.counters.new_temp();
                code.push(match op {
                    LogOp::And(_) => Instr::And {
                        dst: temp.clone(),
                        left: l.addr,
                        right: r.addr,
                    },
                    LogOp::Or(_) => Instr::Or {
                        dst: temp.clone(),
                        left: l.addr,
                        right: r.addr,
                    },
                });
                CodeAttribs::new(temp, String::new(), code)
            }
        }
    }

    /// Inserts the int-to-float conversion on the integer side of a
    /// mixed arithmetic or relational operation.
    fn widen(
        &mut self,
        left: String,
        left_ty: TyId,
        right: String,
        right_ty: TyId,
        code: &mut Vec<Instr>,
    ) -> (String, String) {
        if self.tys.is_int(left_ty) {
            let temp = self.counters.new_temp();
            code.push(Instr::Float {
                dst: temp.clone(),
                src: left,
            });
            (temp, right)
        } else if self.tys.is_int(right_ty) {
            let temp = self.counters.new_temp();
            code.push(Instr::Float {
                dst: temp.clone(),
                src: right,
            });
            (left, temp)
        } else {
            (left, right)
        }
    }
}

/// The variable named by a whole-array operand, looking through parens.
fn array_base(expr: &HExpr) -> (&Rc<HVar>, &Rc<HName>) {
    match &expr.kind {
        HExprKind::Var { var, name } => (var, name),
        HExprKind::Paren { inner } => array_base(inner),
        _ => unreachable!("a whole-array operand always names a variable"),
    }
}

/// Drops the surrounding quotes of a literal token.
fn strip_quotes(text: String) -> String {
    text[1..text.len() - 1].to_string()
}
