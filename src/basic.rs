//! Basic (scalar) types of the Asl language.

use std::str::FromStr;

/// One of the four basic types a value can have.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum BasicTy {
    Int,
    Float,
    Bool,
    Char,
}

impl BasicTy {
    pub fn all() -> Vec<Self> {
        vec![BasicTy::Int, BasicTy::Float, BasicTy::Bool, BasicTy::Char]
    }

    pub fn name(self) -> &'static str {
        match self {
            BasicTy::Int => "int",
            BasicTy::Float => "float",
            BasicTy::Bool => "bool",
            BasicTy::Char => "char",
        }
    }
}

impl FromStr for BasicTy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all().into_iter().find(|b| b.name() == s).ok_or(())
    }
}
