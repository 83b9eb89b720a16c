//! Parse an AST from a `syn::parse::ParseBuffer`.

use syn::ext::IdentExt;
use syn::parse::Parse;
use syn::parse::ParseBuffer;
use syn::punctuated::Punctuated;
use syn::Error;

use crate::prog::kw;
use crate::prog::op::*;

use super::ast::*;
use super::diagnostic::*;

pub fn parse_program(source: &str, dgns: &mut Vec<Diagnostic>) -> Result<AProgram, ()> {
    match syn::parse_str(source) {
        Ok(prog) => Ok(prog),
        Err(error) => {
            dgns.push(Diagnostic::ParseError { error });
            Err(())
        }
    }
}

impl Parse for AProgram {
    fn parse(input: &ParseBuffer) -> Result<Self, Error> {
        let mut funs = vec![];
        while !input.is_empty() {
            funs.push(input.parse()?);
        }
        Ok(AProgram { funs })
    }
}

impl Parse for AFun {
    fn parse(input: &ParseBuffer) -> Result<Self, Error> {
        let params_input;

        Ok(AFun {
            kw: input.parse()?,
            name: input.parse()?,
            params_paren: syn::parenthesized!(params_input in input),
            params: Punctuated::parse_terminated(&params_input)?,
            result: if input.peek(syn::Token![:]) {
                Some((input.parse()?, input.parse()?))
            } else {
                None
            },
            decls: {
                let mut decls = vec![];
                while input.peek(kw::var) {
                    decls.push(input.parse()?);
                }
                decls
            },
            stmts: parse_stmts(input)?,
            end: input.parse()?,
        })
    }
}

impl Parse for AParam {
    fn parse(input: &ParseBuffer) -> Result<Self, Error> {
        Ok(AParam {
            name: input.parse()?,
            colon: input.parse()?,
            ty: input.parse()?,
        })
    }
}

impl Parse for ADecl {
    fn parse(input: &ParseBuffer) -> Result<Self, Error> {
        Ok(ADecl {
            kw: input.parse()?,
            names: Punctuated::parse_separated_nonempty(input)?,
            colon: input.parse()?,
            ty: input.parse()?,
            semi: input.parse()?,
        })
    }
}

impl Parse for ATy {
    fn parse(input: &ParseBuffer) -> Result<Self, Error> {
        if input.peek(kw::array) {
            let len_input;
            Ok(ATy::Array {
                kw: input.parse()?,
                bracket: syn::bracketed!(len_input in input),
                len: len_input.parse()?,
                of: input.parse()?,
                elem: input.parse()?,
            })
        } else {
            Ok(ATy::Basic(input.parse()?))
        }
    }
}

impl Parse for ABasicTy {
    fn parse(input: &ParseBuffer) -> Result<Self, Error> {
        Ok(ABasicTy {
            ident: input.parse()?,
        })
    }
}

/// Parses statements up to (but not including) a closing keyword.
fn parse_stmts(input: &ParseBuffer) -> Result<Vec<AStmt>, Error> {
    let mut stmts = vec![];
    while !(input.is_empty()
        || input.peek(kw::endfunc)
        || input.peek(kw::endif)
        || input.peek(kw::endwhile)
        || input.peek(syn::Token![else]))
    {
        stmts.push(input.parse()?);
    }
    Ok(stmts)
}

impl Parse for AStmt {
    fn parse(input: &ParseBuffer) -> Result<Self, Error> {
        let lookahead = input.lookahead1();
        if lookahead.peek(syn::Token![if]) {
            Ok(AStmt::If {
                kw: input.parse()?,
                cond: input.parse()?,
                then: input.parse()?,
                then_body: parse_stmts(input)?,
                else_body: if input.peek(syn::Token![else]) {
                    Some((input.parse()?, parse_stmts(input)?))
                } else {
                    None
                },
                end: input.parse()?,
            })
        } else if lookahead.peek(syn::Token![while]) {
            Ok(AStmt::While {
                kw: input.parse()?,
                cond: input.parse()?,
                do_token: input.parse()?,
                body: parse_stmts(input)?,
                end: input.parse()?,
            })
        } else if lookahead.peek(kw::read) {
            Ok(AStmt::Read {
                kw: input.parse()?,
                target: input.parse()?,
                semi: input.parse()?,
            })
        } else if lookahead.peek(kw::write) {
            Ok(AStmt::Write {
                kw: input.parse()?,
                arg: if input.peek(syn::LitStr) {
                    AWriteArg::Str(input.parse()?)
                } else {
                    AWriteArg::Expr(input.parse()?)
                },
                semi: input.parse()?,
            })
        } else if lookahead.peek(syn::Token![return]) {
            Ok(AStmt::Return {
                kw: input.parse()?,
                value: if input.peek(syn::Token![;]) {
                    None
                } else {
                    Some(input.parse()?)
                },
                semi: input.parse()?,
            })
        } else if lookahead.peek(syn::Ident::peek_any) {
            let ident: AIdent = input.parse()?;
            if input.peek(syn::token::Paren) {
                let args_input;
                let call = ACall {
                    name: ident,
                    paren: syn::parenthesized!(args_input in input),
                    args: Punctuated::parse_terminated(&args_input)?,
                };
                Ok(AStmt::Call {
                    call,
                    semi: input.parse()?,
                })
            } else {
                let index = if input.peek(syn::token::Bracket) {
                    let index_input;
                    let bracket = syn::bracketed!(index_input in input);
                    Some((bracket, Box::new(index_input.parse()?)))
                } else {
                    None
                };
                Ok(AStmt::Assign {
                    target: ALexpr { ident, index },
                    assign: input.parse()?,
                    value: input.parse()?,
                    semi: input.parse()?,
                })
            }
        } else {
            Err(lookahead.error())
        }
    }
}

impl Parse for ALexpr {
    fn parse(input: &ParseBuffer) -> Result<Self, Error> {
        let ident = input.parse()?;
        let index = if input.peek(syn::token::Bracket) {
            let index_input;
            let bracket = syn::bracketed!(index_input in input);
            Some((bracket, Box::new(index_input.parse()?)))
        } else {
            None
        };
        Ok(ALexpr { ident, index })
    }
}

// Expressions, one parser per precedence level (high binds tight):
// unary, multiplicative, additive, relational (non-associative), `and`,
// `or`. The arithmetic and logical levels are left-associative.

impl Parse for AExpr {
    fn parse(input: &ParseBuffer) -> Result<Self, Error> {
        parse_or(input)
    }
}

fn parse_or(input: &ParseBuffer) -> Result<AExpr, Error> {
    let mut left = parse_and(input)?;
    while input.peek(kw::or) {
        let op = LogOp::Or(input.parse()?);
        let right = parse_and(input)?;
        left = AExpr::Log {
            op,
            left: Box::new(left),
            right: Box::new(right),
        };
    }
    Ok(left)
}

fn parse_and(input: &ParseBuffer) -> Result<AExpr, Error> {
    let mut left = parse_rel(input)?;
    while input.peek(kw::and) {
        let op = LogOp::And(input.parse()?);
        let right = parse_rel(input)?;
        left = AExpr::Log {
            op,
            left: Box::new(left),
            right: Box::new(right),
        };
    }
    Ok(left)
}

fn parse_rel(input: &ParseBuffer) -> Result<AExpr, Error> {
    let left = parse_add(input)?;
    let op = if input.peek(syn::Token![==]) {
        Some(RelOp::Eq(input.parse()?))
    } else if input.peek(syn::Token![!=]) {
        Some(RelOp::Ne(input.parse()?))
    } else if input.peek(syn::Token![<=]) {
        Some(RelOp::Le(input.parse()?))
    } else if input.peek(syn::Token![>=]) {
        Some(RelOp::Ge(input.parse()?))
    } else if input.peek(syn::Token![<]) {
        Some(RelOp::Lt(input.parse()?))
    } else if input.peek(syn::Token![>]) {
        Some(RelOp::Gt(input.parse()?))
    } else {
        None
    };
    match op {
        Some(op) => {
            let right = parse_add(input)?;
            Ok(AExpr::Rel {
                op,
                left: Box::new(left),
                right: Box::new(right),
            })
        }
        None => Ok(left),
    }
}

fn parse_add(input: &ParseBuffer) -> Result<AExpr, Error> {
    let mut left = parse_mul(input)?;
    loop {
        let op = if input.peek(syn::Token![+]) {
            ArithOp::Add(input.parse()?)
        } else if input.peek(syn::Token![-]) {
            ArithOp::Sub(input.parse()?)
        } else {
            break;
        };
        let right = parse_mul(input)?;
        left = AExpr::Arith {
            op,
            left: Box::new(left),
            right: Box::new(right),
        };
    }
    Ok(left)
}

fn parse_mul(input: &ParseBuffer) -> Result<AExpr, Error> {
    let mut left = parse_unary(input)?;
    loop {
        let op = if input.peek(syn::Token![*]) {
            ArithOp::Mul(input.parse()?)
        } else if input.peek(syn::Token![/]) {
            ArithOp::Div(input.parse()?)
        } else if input.peek(syn::Token![%]) {
            ArithOp::Mod(input.parse()?)
        } else {
            break;
        };
        let right = parse_unary(input)?;
        left = AExpr::Arith {
            op,
            left: Box::new(left),
            right: Box::new(right),
        };
    }
    Ok(left)
}

fn parse_unary(input: &ParseBuffer) -> Result<AExpr, Error> {
    let op = if input.peek(syn::Token![+]) {
        Some(UnOp::Plus(input.parse()?))
    } else if input.peek(syn::Token![-]) {
        Some(UnOp::Minus(input.parse()?))
    } else if input.peek(kw::not) {
        Some(UnOp::Not(input.parse()?))
    } else {
        None
    };
    match op {
        Some(op) => Ok(AExpr::Unary {
            op,
            expr: Box::new(parse_unary(input)?),
        }),
        None => parse_atom(input),
    }
}

fn parse_atom(input: &ParseBuffer) -> Result<AExpr, Error> {
    if input.peek(syn::token::Paren) {
        let inner_input;
        Ok(AExpr::Paren {
            paren: syn::parenthesized!(inner_input in input),
            inner: Box::new(inner_input.parse()?),
        })
    } else if input.peek(syn::Lit) {
        Ok(AExpr::Lit {
            lit: input.parse()?,
        })
    } else {
        let ident: AIdent = input.parse()?;
        if input.peek(syn::token::Paren) {
            let args_input;
            Ok(AExpr::Call(ACall {
                name: ident,
                paren: syn::parenthesized!(args_input in input),
                args: Punctuated::parse_terminated(&args_input)?,
            }))
        } else if input.peek(syn::token::Bracket) {
            let index_input;
            Ok(AExpr::Subscript {
                ident,
                bracket: syn::bracketed!(index_input in input),
                index: Box::new(index_input.parse()?),
            })
        } else {
            Ok(AExpr::Ref { ident })
        }
    }
}

impl Parse for ALit {
    fn parse(input: &ParseBuffer) -> Result<Self, Error> {
        let lit: syn::Lit = input.parse()?;
        match lit {
            syn::Lit::Int(token) => Ok(ALit::Int(token)),
            syn::Lit::Float(token) => Ok(ALit::Float(token)),
            syn::Lit::Bool(token) => Ok(ALit::Bool(token)),
            syn::Lit::Char(token) => Ok(ALit::Char(token)),
            other => Err(Error::new(other.span(), "unsupported literal")),
        }
    }
}

impl Parse for AIdent {
    fn parse(input: &ParseBuffer) -> Result<Self, Error> {
        // Parsing TokenTree instead of Ident to ignore Rust keywords
        let token_tree: proc_macro2::TokenTree = input.parse()?;
        match token_tree {
            proc_macro2::TokenTree::Ident(token) => Ok(AIdent { token }),
            _ => Err(Error::new(token_tree.span(), "expected identifier")),
        }
    }
}
