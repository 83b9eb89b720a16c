use proc_macro2::Span;

use crate::prog::hir::*;
use crate::prog::hir_span::HasSpan;
use crate::prog::sess::Sess;
use crate::ty::{TyId, TyPool};

#[derive(Debug, Clone)]
pub enum Diagnostic {
    ParseError {
        error: syn::parse::Error,
    },
    InvalidBasicTy {
        name: Rc<HName>,
    },
    UndeclaredIdent {
        name: Rc<HName>,
    },
    AlreadyDeclaredIdent {
        new_name: Rc<HName>,
        old_name: Rc<HName>,
    },
    IsNotCallable {
        name: Rc<HName>,
    },
    IsNotFunction {
        name: Rc<HName>,
    },
    NumberOfParameters {
        name: Rc<HName>,
    },
    IncompatibleParameter {
        span: Span,
        index: usize,
        expected: TyId,
        found: TyId,
    },
    IncompatibleAssignment {
        span: Span,
        target: TyId,
        value: TyId,
    },
    NonReferenceableLeftExpr {
        span: Span,
    },
    NonReferenceableExpression {
        span: Span,
    },
    BooleanRequired {
        span: Span,
        found: TyId,
    },
    IncompatibleOperator {
        op: String,
        span: Span,
    },
    NonArrayInArrayAccess {
        span: Span,
        found: TyId,
    },
    NonIntegerIndexInArrayAccess {
        span: Span,
        found: TyId,
    },
    ReadWriteRequireBasic {
        span: Span,
        found: TyId,
    },
    IncompatibleReturn {
        span: Span,
    },
    NoMainProperlyDeclared,
}

impl Diagnostic {
    pub fn is_critical(&self) -> bool {
        true
    }

    /// Stable machine-readable name of the diagnostic kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::ParseError { .. } => "parse-error",
            Diagnostic::InvalidBasicTy { .. } => "invalid-basic-type",
            Diagnostic::UndeclaredIdent { .. } => "undeclared-ident",
            Diagnostic::AlreadyDeclaredIdent { .. } => "already-declared-ident",
            Diagnostic::IsNotCallable { .. } => "is-not-callable",
            Diagnostic::IsNotFunction { .. } => "is-not-function",
            Diagnostic::NumberOfParameters { .. } => "number-of-parameters",
            Diagnostic::IncompatibleParameter { .. } => "incompatible-parameter",
            Diagnostic::IncompatibleAssignment { .. } => "incompatible-assignment",
            Diagnostic::NonReferenceableLeftExpr { .. } => "non-referenceable-left-expr",
            Diagnostic::NonReferenceableExpression { .. } => "non-referenceable-expression",
            Diagnostic::BooleanRequired { .. } => "boolean-required",
            Diagnostic::IncompatibleOperator { .. } => "incompatible-operator",
            Diagnostic::NonArrayInArrayAccess { .. } => "non-array-in-array-access",
            Diagnostic::NonIntegerIndexInArrayAccess { .. } => {
                "non-integer-index-in-array-access"
            }
            Diagnostic::ReadWriteRequireBasic { .. } => "read-write-requires-basic",
            Diagnostic::IncompatibleReturn { .. } => "incompatible-return",
            Diagnostic::NoMainProperlyDeclared => "no-main-properly-declared",
        }
    }

    pub fn diagnostic_message(&self, sess: &Sess, tys: &TyPool) -> String {
        match self {
            Diagnostic::ParseError { error } => sess.error_snippet(
                &error.to_string(),
                vec![sess.error_ann("here", error.span())],
                vec![],
            ),
            Diagnostic::InvalidBasicTy { name } => sess.error_snippet(
                &format!("invalid basic type `{}`", name),
                vec![sess.error_ann("not a basic type", name.span())],
                vec![sess.footer_note("the basic types are `int`, `float`, `bool` and `char`")],
            ),
            Diagnostic::UndeclaredIdent { name } => sess.error_snippet(
                &format!("undeclared identifier `{}`", name),
                vec![sess.error_ann("not found in this scope", name.span())],
                vec![],
            ),
            Diagnostic::AlreadyDeclaredIdent { new_name, old_name } => sess.error_snippet(
                &format!("identifier `{}` already declared", new_name),
                vec![
                    sess.error_ann("cannot re-declare a name in the same scope", new_name.span()),
                    sess.info_ann("first declared here", old_name.span()),
                ],
                vec![],
            ),
            Diagnostic::IsNotCallable { name } => sess.error_snippet(
                &format!("`{}` is not callable", name),
                vec![sess.error_ann("not a function", name.span())],
                vec![],
            ),
            Diagnostic::IsNotFunction { name } => sess.error_snippet(
                &format!("`{}` does not return a value", name),
                vec![sess.error_ann("used as a function", name.span())],
                vec![sess.footer_note("a call used inside an expression must return a value")],
            ),
            Diagnostic::NumberOfParameters { name } => sess.error_snippet(
                &format!("wrong number of arguments in call to `{}`", name),
                vec![sess.error_ann("arguments do not match the declaration", name.span())],
                vec![],
            ),
            Diagnostic::IncompatibleParameter {
                span,
                index,
                expected,
                found,
            } => sess.error_snippet(
                &format!("incompatible argument {} in call", index),
                vec![sess.error_ann(
                    &format!(
                        "expected `{}`, found `{}`",
                        tys.name(*expected),
                        tys.name(*found)
                    ),
                    *span,
                )],
                vec![],
            ),
            Diagnostic::IncompatibleAssignment {
                span,
                target,
                value,
            } => sess.error_snippet(
                "incompatible assignment",
                vec![sess.error_ann(
                    &format!(
                        "cannot assign `{}` to `{}`",
                        tys.name(*value),
                        tys.name(*target)
                    ),
                    *span,
                )],
                vec![],
            ),
            Diagnostic::NonReferenceableLeftExpr { span } => sess.error_snippet(
                "left expression cannot be assigned",
                vec![sess.error_ann("does not denote a storage location", *span)],
                vec![],
            ),
            Diagnostic::NonReferenceableExpression { span } => sess.error_snippet(
                "expression cannot be read into",
                vec![sess.error_ann("does not denote a storage location", *span)],
                vec![],
            ),
            Diagnostic::BooleanRequired { span, found } => sess.error_snippet(
                "boolean expression required",
                vec![sess.error_ann(&format!("has type `{}`", tys.name(*found)), *span)],
                vec![],
            ),
            Diagnostic::IncompatibleOperator { op, span } => sess.error_snippet(
                &format!("incompatible operands for operator `{}`", op),
                vec![sess.error_ann("operands have the wrong types", *span)],
                vec![],
            ),
            Diagnostic::NonArrayInArrayAccess { span, found } => sess.error_snippet(
                "array access on a non-array",
                vec![sess.error_ann(
                    &format!("has type `{}`, not an array", tys.name(*found)),
                    *span,
                )],
                vec![],
            ),
            Diagnostic::NonIntegerIndexInArrayAccess { span, found } => sess.error_snippet(
                "array index must be an integer",
                vec![sess.error_ann(&format!("has type `{}`", tys.name(*found)), *span)],
                vec![],
            ),
            Diagnostic::ReadWriteRequireBasic { span, found } => sess.error_snippet(
                "read/write requires a value of basic type",
                vec![sess.error_ann(&format!("has type `{}`", tys.name(*found)), *span)],
                vec![],
            ),
            Diagnostic::IncompatibleReturn { span } => sess.error_snippet(
                "incompatible return",
                vec![sess.error_ann(
                    "does not match the declared function result",
                    *span,
                )],
                vec![],
            ),
            Diagnostic::NoMainProperlyDeclared => sess.error_snippet(
                "no `main` function properly declared",
                vec![],
                vec![sess.footer_note("declare `func main()` with no parameters and no result")],
            ),
        }
    }
}
