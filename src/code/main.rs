use crate::prog::Program;

use super::tcode::TProgram;
use super::tcode_build::build_code;

pub fn code_gen(prog: &Program) -> TProgram {
    build_code(&prog.hir, &prog.tys)
}
