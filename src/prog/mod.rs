pub use main::*;

pub mod kw;
pub mod op;

pub mod sess;

pub mod hir;
pub mod hir_span;

mod main;
