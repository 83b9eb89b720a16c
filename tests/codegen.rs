//! Code generation tests: each valid source program is lowered and the
//! resulting t-code is compared against the expected instruction lists.

use aslc::code::tcode::{Instr, LocalVar, Subroutine, TProgram};
use aslc::code::tcode_build::build_code;
use aslc::prog_load::ast_parse::parse_program;
use aslc::prog_load::hir_compile::compile_hir;
use aslc::ty::TyPool;

fn tcode(source: &str) -> TProgram {
    let mut tys = TyPool::new();
    let mut dgns = Vec::new();
    let ast = parse_program(source, &mut dgns).expect("source does not parse");
    let hir = compile_hir(ast, &mut tys, &mut dgns).expect("source has semantic errors");
    build_code(&hir, &tys)
}

fn sub<'a>(prog: &'a TProgram, name: &str) -> &'a Subroutine {
    prog.subs
        .iter()
        .find(|s| s.name == name)
        .expect("no such subroutine")
}

fn load(dst: &str, src: &str) -> Instr {
    Instr::Load {
        dst: dst.into(),
        src: src.into(),
    }
}

fn iload(dst: &str, lit: &str) -> Instr {
    Instr::ILoad {
        dst: dst.into(),
        lit: lit.into(),
    }
}

fn label(name: &str) -> Instr {
    Instr::Label { name: name.into() }
}

#[test]
fn scalar_assignment_of_a_sum() {
    let prog = tcode("func main() var x: int; x = 3 + 4; endfunc");
    let main = sub(&prog, "main");
    assert!(main.params.is_empty());
    assert_eq!(
        main.vars,
        vec![LocalVar {
            name: "x".into(),
            size: 1
        }]
    );
    assert_eq!(
        main.instrs,
        vec![
            iload("%0", "3"),
            iload("%1", "4"),
            Instr::Add {
                dst: "%2".into(),
                left: "%0".into(),
                right: "%1".into()
            },
            load("x", "%2"),
            Instr::Return,
        ]
    );
}

#[test]
fn returning_an_int_from_a_float_function_widens() {
    let prog = tcode("func f(a: int): float return a; endfunc func main() endfunc");
    let f = sub(&prog, "f");
    assert_eq!(f.params, vec!["_result".to_string(), "a".to_string()]);
    assert_eq!(
        f.instrs,
        vec![
            Instr::Float {
                dst: "%0".into(),
                src: "a".into()
            },
            load("_result", "%0"),
            Instr::Return,
        ]
    );
}

#[test]
fn whole_array_assignment_emits_a_copy_loop() {
    let prog = tcode(
        "func main() var v: array [3] of int; var w: array [3] of int; v = w; endfunc",
    );
    let main = sub(&prog, "main");
    assert_eq!(
        main.instrs,
        vec![
            iload("%2", "0"),
            iload("%3", "1"),
            iload("%4", "3"),
            iload("%5", "1"),
            label("while0"),
            Instr::Lt {
                dst: "%7".into(),
                left: "%2".into(),
                right: "%4".into()
            },
            Instr::FJump {
                cond: "%7".into(),
                label: "endwhile0".into()
            },
            Instr::Mul {
                dst: "%6".into(),
                left: "%5".into(),
                right: "%2".into()
            },
            Instr::LoadX {
                dst: "%8".into(),
                base: "w".into(),
                offs: "%6".into()
            },
            Instr::XLoad {
                base: "v".into(),
                offs: "%6".into(),
                src: "%8".into()
            },
            Instr::Add {
                dst: "%2".into(),
                left: "%2".into(),
                right: "%3".into()
            },
            Instr::UJump {
                label: "while0".into()
            },
            label("endwhile0"),
            Instr::Return,
        ]
    );
}

#[test]
fn array_copy_between_parameters_materializes_both_bases() {
    let prog = tcode(
        "func g(a: array [2] of int, b: array [2] of int) a = b; endfunc func main() endfunc",
    );
    let g = sub(&prog, "g");
    assert_eq!(g.instrs[0], load("%0", "a"));
    assert_eq!(g.instrs[1], load("%1", "b"));
    assert!(g.instrs.contains(&Instr::LoadX {
        dst: "%8".into(),
        base: "%1".into(),
        offs: "%6".into()
    }));
    assert!(g.instrs.contains(&Instr::XLoad {
        base: "%0".into(),
        offs: "%6".into(),
        src: "%8".into()
    }));
}

#[test]
fn array_parameter_element_store_goes_through_its_address() {
    let prog = tcode("func g(a: array [5] of int) a[0] = 1; endfunc func main() endfunc");
    let g = sub(&prog, "g");
    assert_eq!(
        g.instrs,
        vec![
            iload("%0", "0"),
            load("%1", "a"),
            iload("%2", "1"),
            Instr::XLoad {
                base: "%1".into(),
                offs: "%0".into(),
                src: "%2".into()
            },
            Instr::Return,
        ]
    );
}

#[test]
fn mixed_arithmetic_widens_the_integer_operand() {
    let prog = tcode("func main() var a: int; var b: float; b = a + 1.0; endfunc");
    let main = sub(&prog, "main");
    assert_eq!(
        main.instrs,
        vec![
            Instr::FLoad {
                dst: "%0".into(),
                lit: "1.0".into()
            },
            Instr::Float {
                dst: "%2".into(),
                src: "a".into()
            },
            Instr::FAdd {
                dst: "%1".into(),
                left: "%2".into(),
                right: "%0".into()
            },
            load("b", "%1"),
            Instr::Return,
        ]
    );
}

#[test]
fn if_else_lowers_to_labels_and_jumps() {
    let prog = tcode("func main() var x: int; if x == 0 then x = 1; else x = 2; endif endfunc");
    let main = sub(&prog, "main");
    assert_eq!(
        main.instrs,
        vec![
            iload("%0", "0"),
            Instr::Eq {
                dst: "%1".into(),
                left: "x".into(),
                right: "%0".into()
            },
            Instr::FJump {
                cond: "%1".into(),
                label: "else0".into()
            },
            iload("%2", "1"),
            load("x", "%2"),
            Instr::UJump {
                label: "endif0".into()
            },
            label("else0"),
            iload("%3", "2"),
            load("x", "%3"),
            label("endif0"),
            Instr::Return,
        ]
    );
}

#[test]
fn nested_ifs_get_unique_labels() {
    let prog = tcode("func main() var x: int; if x == 0 then if x == 1 then endif endif endfunc");
    let main = sub(&prog, "main");
    let labels: Vec<&str> = main
        .instrs
        .iter()
        .filter_map(|i| match i {
            Instr::Label { name } => Some(name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec!["endif0", "endif1"]);
    for instr in &main.instrs {
        if let Instr::FJump { label, .. } = instr {
            assert!(labels.contains(&label.as_str()));
        }
    }
}

#[test]
fn while_lowers_with_a_swapped_greater_than() {
    let prog = tcode("func main() var x: int; while x > 0 do x = x - 1; endwhile endfunc");
    let main = sub(&prog, "main");
    assert_eq!(
        main.instrs,
        vec![
            label("while0"),
            iload("%0", "0"),
            Instr::Lt {
                dst: "%1".into(),
                left: "%0".into(),
                right: "x".into()
            },
            Instr::FJump {
                cond: "%1".into(),
                label: "endwhile0".into()
            },
            iload("%2", "1"),
            Instr::Sub {
                dst: "%3".into(),
                left: "x".into(),
                right: "%2".into()
            },
            load("x", "%3"),
            Instr::UJump {
                label: "while0".into()
            },
            label("endwhile0"),
            Instr::Return,
        ]
    );
}

#[test]
fn call_widens_int_arguments_and_passes_arrays_by_address() {
    let prog = tcode(
        "func f(a: float, v: array [2] of int) endfunc \
         func main() var v: array [2] of int; f(1, v); endfunc",
    );
    let main = sub(&prog, "main");
    assert_eq!(
        main.instrs,
        vec![
            iload("%0", "1"),
            Instr::Float {
                dst: "%1".into(),
                src: "%0".into()
            },
            Instr::Push {
                src: Some("%1".into())
            },
            Instr::ALoad {
                dst: "%2".into(),
                src: "v".into()
            },
            Instr::Push {
                src: Some("%2".into())
            },
            Instr::Call { name: "f".into() },
            Instr::Pop { dst: None },
            Instr::Pop { dst: None },
            Instr::Pop {
                dst: Some("%3".into())
            },
            Instr::Return,
        ]
    );
}

#[test]
fn function_call_expression_reserves_and_pops_the_result() {
    let prog = tcode("func h(): int return 1; endfunc func main() var x: int; x = h(); endfunc");
    let main = sub(&prog, "main");
    assert_eq!(
        main.instrs,
        vec![
            Instr::Push { src: None },
            Instr::Call { name: "h".into() },
            Instr::Pop {
                dst: Some("%0".into())
            },
            load("x", "%0"),
            Instr::Return,
        ]
    );
    let pushes = main
        .instrs
        .iter()
        .filter(|i| matches!(i, Instr::Push { .. }))
        .count();
    let pops = main
        .instrs
        .iter()
        .filter(|i| matches!(i, Instr::Pop { .. }))
        .count();
    assert_eq!(pushes, pops);
}

#[test]
fn read_into_an_array_element_stores_through_the_index() {
    let prog = tcode("func main() var v: array [3] of int; read v[1]; endfunc");
    let main = sub(&prog, "main");
    assert_eq!(
        main.instrs,
        vec![
            iload("%0", "1"),
            Instr::ReadI { dst: "%1".into() },
            Instr::XLoad {
                base: "v".into(),
                offs: "%0".into(),
                src: "%1".into()
            },
            Instr::Return,
        ]
    );
}

#[test]
fn read_picks_the_opcode_from_the_type() {
    let prog = tcode("func main() var f: float; read f; endfunc");
    let main = sub(&prog, "main");
    assert_eq!(
        main.instrs,
        vec![Instr::ReadF { dst: "f".into() }, Instr::Return]
    );
}

#[test]
fn write_string_scans_escapes() {
    let prog = tcode("func main() write \"hi\\n\"; endfunc");
    let main = sub(&prog, "main");
    assert_eq!(
        main.instrs,
        vec![
            Instr::ChLoad {
                dst: "%0".into(),
                lit: "h".into()
            },
            Instr::WriteC { src: "%0".into() },
            Instr::ChLoad {
                dst: "%0".into(),
                lit: "i".into()
            },
            Instr::WriteC { src: "%0".into() },
            Instr::WriteLn,
            Instr::Return,
        ]
    );
}

#[test]
fn write_string_keeps_tab_escapes_as_two_characters() {
    let prog = tcode("func main() write \"a\\tb\"; endfunc");
    let main = sub(&prog, "main");
    assert_eq!(
        main.instrs,
        vec![
            Instr::ChLoad {
                dst: "%0".into(),
                lit: "a".into()
            },
            Instr::WriteC { src: "%0".into() },
            Instr::ChLoad {
                dst: "%0".into(),
                lit: "\\t".into()
            },
            Instr::WriteC { src: "%0".into() },
            Instr::ChLoad {
                dst: "%0".into(),
                lit: "b".into()
            },
            Instr::WriteC { src: "%0".into() },
            Instr::Return,
        ]
    );
}

#[test]
fn boolean_literals_and_not_equal() {
    let prog = tcode("func main() var b: bool; b = true != false; endfunc");
    let main = sub(&prog, "main");
    assert_eq!(
        main.instrs,
        vec![
            load("%0", "1"),
            load("%1", "0"),
            Instr::Eq {
                dst: "%2".into(),
                left: "%0".into(),
                right: "%1".into()
            },
            Instr::Not {
                dst: "%2".into(),
                src: "%2".into()
            },
            load("b", "%2"),
            Instr::Return,
        ]
    );
}

#[test]
fn modulus_is_synthesized_from_div_mul_sub() {
    let prog = tcode("func main() var x: int; x = 7 % 3; endfunc");
    let main = sub(&prog, "main");
    assert_eq!(
        main.instrs,
        vec![
            iload("%0", "7"),
            iload("%1", "3"),
            Instr::Div {
                dst: "%2".into(),
                left: "%0".into(),
                right: "%1".into()
            },
            Instr::Mul {
                dst: "%2".into(),
                left: "%2".into(),
                right: "%1".into()
            },
            Instr::Sub {
                dst: "%2".into(),
                left: "%0".into(),
                right: "%2".into()
            },
            load("x", "%2"),
            Instr::Return,
        ]
    );
}

#[test]
fn unary_minus_and_char_literals() {
    let prog = tcode("func main() var x: int; x = -x; endfunc");
    let main = sub(&prog, "main");
    assert_eq!(
        main.instrs,
        vec![
            Instr::Neg {
                dst: "%0".into(),
                src: "x".into()
            },
            load("x", "%0"),
            Instr::Return,
        ]
    );

    let prog = tcode("func main() var c: char; c = 'a'; endfunc");
    let main = sub(&prog, "main");
    assert_eq!(
        main.instrs,
        vec![
            Instr::ChLoad {
                dst: "%0".into(),
                lit: "a".into()
            },
            load("c", "%0"),
            Instr::Return,
        ]
    );
}

#[test]
fn scalar_gets_loaded_from_an_array_element() {
    let prog = tcode("func main() var v: array [3] of int; var x: int; x = v[2]; endfunc");
    let main = sub(&prog, "main");
    assert_eq!(
        main.instrs,
        vec![
            iload("%0", "2"),
            Instr::LoadX {
                dst: "%1".into(),
                base: "v".into(),
                offs: "%0".into()
            },
            load("x", "%1"),
            Instr::Return,
        ]
    );
}

#[test]
fn element_to_element_assignment_uses_a_temporary() {
    let prog = tcode("func main() var v: array [3] of int; v[0] = v[1]; endfunc");
    let main = sub(&prog, "main");
    assert_eq!(
        main.instrs,
        vec![
            iload("%0", "0"),
            iload("%1", "1"),
            Instr::LoadX {
                dst: "%2".into(),
                base: "v".into(),
                offs: "%1".into()
            },
            Instr::XLoad {
                base: "v".into(),
                offs: "%0".into(),
                src: "%2".into()
            },
            Instr::Return,
        ]
    );
}

#[test]
fn temporaries_are_unique_and_ascending() {
    let prog = tcode(
        "func main() var x: int; var b: bool; x = 1 + 2 * 3 - 4; b = x == 5 or x < 6; endfunc",
    );
    let main = sub(&prog, "main");
    let mut seen = Vec::new();
    for instr in &main.instrs {
        let dst = match instr {
            Instr::ILoad { dst, .. }
            | Instr::Add { dst, .. }
            | Instr::Sub { dst, .. }
            | Instr::Mul { dst, .. }
            | Instr::Eq { dst, .. }
            | Instr::Lt { dst, .. }
            | Instr::Or { dst, .. } => Some(dst),
            _ => None,
        };
        if let Some(dst) = dst {
            if !seen.contains(dst) {
                let n: u32 = dst.trim_start_matches('%').parse().unwrap();
                if let Some(last) = seen.last() {
                    let last_n: u32 = last.trim_start_matches('%').parse().unwrap();
                    assert!(n > last_n, "temporaries out of order: {:?}", main.instrs);
                }
                seen.push(dst.clone());
            }
        }
    }
    assert!(!seen.is_empty());
}

#[test]
fn textual_emission_lists_subroutines() {
    let prog = tcode("func main() var x: int; x = 3 + 4; endfunc");
    let text = prog.to_string();
    assert!(text.contains("subroutine main"));
    assert!(text.contains("  vars: x:1"));
    assert!(text.contains("    ILOAD %0,3"));
    assert!(text.contains("    RETURN"));
    assert!(text.contains("endsubroutine"));
}
