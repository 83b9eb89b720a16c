//! Compiler front- and mid-end for Asl, a small statically-typed
//! imperative language. Source text is parsed into an AST, compiled to
//! typed HIR by the semantic analysis, and lowered to three-address
//! t-code organized into subroutines.

pub mod basic;
pub mod ty;

pub mod prog;
pub mod prog_load;

pub mod code;
