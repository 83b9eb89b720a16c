//! Parses an Asl source file and compiles it to typed HIR.

pub mod ast;
pub mod ast_parse;

pub mod diagnostic;
pub mod hir_compile;
pub mod hir_env;

mod main;

pub use main::*;
