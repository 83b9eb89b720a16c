use proc_macro2::Span;

use crate::prog::hir::*;

pub trait HasSpan {
    fn span(&self) -> Span;
}

impl HasSpan for HName {
    fn span(&self) -> Span {
        self.ident.span()
    }
}

impl HasSpan for HLit {
    fn span(&self) -> Span {
        match self {
            HLit::Int { token } => token.span(),
            HLit::Float { token } => token.span(),
            HLit::Bool { token } => token.span(),
            HLit::Char { token } => token.span(),
        }
    }
}

impl HasSpan for HLexpr {
    fn span(&self) -> Span {
        self.name.span()
    }
}

impl HasSpan for HExpr {
    fn span(&self) -> Span {
        match &self.kind {
            HExprKind::Lit { lit } => lit.span(),
            HExprKind::Var { name, .. } => name.span(),
            HExprKind::Subscript { name, .. } => name.span(),
            HExprKind::Call { call } => call.name.span(),
            HExprKind::Paren { inner } => inner.span(),
            HExprKind::Unary { op, .. } => op.span(),
            HExprKind::Arith { op, .. } => op.span(),
            HExprKind::Rel { op, .. } => op.span(),
            HExprKind::Log { op, .. } => op.span(),
        }
    }
}
