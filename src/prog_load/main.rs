use std::fs::read_to_string;
use std::path::Path;

use crate::prog::sess::Sess;
use crate::prog::Program;
use crate::ty::TyPool;

use super::ast_parse::parse_program;
use super::hir_compile::compile_hir;

/// Loads and analyzes the program at the given path.
/// Prints diagnostics on stderr.
pub fn program_load(path: &Path) -> Result<Program, ()> {
    let mut code_map = codemap::CodeMap::new();

    let file = code_map.add_file(
        path.to_str().expect("file path is not valid UTF-8").into(),
        read_to_string(path).expect("cannot read file"),
    );

    let sess = Sess::new(&file);

    let mut tys = TyPool::new();
    let mut dgns = Vec::new();

    let hir = parse_program(sess.file.clone().source(), &mut dgns)
        .and_then(|ast| compile_hir(ast, &mut tys, &mut dgns));

    for d in &dgns {
        eprintln!("{}", d.diagnostic_message(&sess, &tys));
    }

    let hir = hir?;

    Ok(Program { sess, tys, hir })
}
