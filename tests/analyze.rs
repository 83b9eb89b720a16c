//! Semantic analysis tests: each source program is checked for the exact
//! diagnostics it must produce, in emission order.

use aslc::prog_load::ast_parse::parse_program;
use aslc::prog_load::hir_compile::compile_hir;
use aslc::ty::TyPool;

/// Analyzes a source string and returns the diagnostic kinds in order.
fn diagnostics(source: &str) -> Vec<&'static str> {
    let mut tys = TyPool::new();
    let mut dgns = Vec::new();
    let _ = parse_program(source, &mut dgns).and_then(|ast| compile_hir(ast, &mut tys, &mut dgns));
    dgns.iter().map(|d| d.kind()).collect()
}

#[test]
fn valid_program_has_no_diagnostics() {
    assert_eq!(
        diagnostics("func main() var x: int; x = 3 + 4; endfunc"),
        Vec::<&str>::new()
    );
}

#[test]
fn assigning_a_bool_to_an_int_is_incompatible() {
    assert_eq!(
        diagnostics("func main() var x: int; x = true; endfunc"),
        vec!["incompatible-assignment"]
    );
}

#[test]
fn widening_assignment_is_accepted() {
    assert_eq!(
        diagnostics("func main() var x: float; x = 3; endfunc"),
        Vec::<&str>::new()
    );
    assert_eq!(
        diagnostics("func main() var x: int; x = 3.0; endfunc"),
        vec!["incompatible-assignment"]
    );
}

#[test]
fn if_condition_must_be_boolean() {
    assert_eq!(
        diagnostics("func main() if 1 then endif endfunc"),
        vec!["boolean-required"]
    );
}

#[test]
fn while_condition_must_be_boolean() {
    assert_eq!(
        diagnostics("func main() while 1 do endwhile endfunc"),
        vec!["boolean-required"]
    );
}

#[test]
fn indexing_a_scalar_is_reported_once() {
    assert_eq!(
        diagnostics("func main() var x: int; x[0] = 1; endfunc"),
        vec!["non-array-in-array-access"]
    );
}

#[test]
fn array_index_must_be_an_integer() {
    assert_eq!(
        diagnostics(
            "func main() var v: array [3] of int; var x: int; x = v[true]; endfunc"
        ),
        vec!["non-integer-index-in-array-access"]
    );
}

#[test]
fn undeclared_identifier_does_not_cascade() {
    // the erroneous operand silences the operator and the assignment
    assert_eq!(
        diagnostics("func main() var x: int; x = y + 1; endfunc"),
        vec!["undeclared-ident"]
    );
}

#[test]
fn erroneous_argument_skips_the_parameter_check() {
    assert_eq!(
        diagnostics("func f(a: int) endfunc func main() f(y); endfunc"),
        vec!["undeclared-ident"]
    );
}

#[test]
fn calling_a_variable_is_not_callable() {
    assert_eq!(
        diagnostics("func main() var x: int; x(); endfunc"),
        vec!["is-not-callable"]
    );
}

#[test]
fn procedure_used_as_expression_is_not_function() {
    assert_eq!(
        diagnostics("func p() endfunc func main() var x: int; x = p(); endfunc"),
        vec!["is-not-function"]
    );
}

#[test]
fn procedure_call_statement_accepts_any_function() {
    assert_eq!(
        diagnostics("func h(): int return 1; endfunc func main() h(); endfunc"),
        Vec::<&str>::new()
    );
}

#[test]
fn argument_count_must_match() {
    assert_eq!(
        diagnostics("func f(a: int) endfunc func main() f(1, 2); endfunc"),
        vec!["number-of-parameters"]
    );
}

#[test]
fn each_incompatible_argument_is_reported() {
    assert_eq!(
        diagnostics("func f(a: int, b: bool) endfunc func main() f(true, 1); endfunc"),
        vec!["incompatible-parameter", "incompatible-parameter"]
    );
}

#[test]
fn integer_argument_widens_to_a_float_parameter() {
    assert_eq!(
        diagnostics("func f(a: float) endfunc func main() f(1); endfunc"),
        Vec::<&str>::new()
    );
}

#[test]
fn functions_may_be_called_before_their_declaration() {
    assert_eq!(
        diagnostics("func main() f(); endfunc func f() endfunc"),
        Vec::<&str>::new()
    );
}

#[test]
fn return_with_value_in_a_procedure_is_incompatible() {
    assert_eq!(
        diagnostics("func main() return 1; endfunc"),
        vec!["incompatible-return"]
    );
}

#[test]
fn return_without_value_in_a_function_is_incompatible() {
    assert_eq!(
        diagnostics("func f(): int return; endfunc func main() endfunc"),
        vec!["incompatible-return"]
    );
}

#[test]
fn returning_an_int_from_a_float_function_widens() {
    assert_eq!(
        diagnostics("func f(): float return 3; endfunc func main() endfunc"),
        Vec::<&str>::new()
    );
    assert_eq!(
        diagnostics("func f(): int return 3.0; endfunc func main() endfunc"),
        vec!["incompatible-return"]
    );
}

#[test]
fn reading_into_a_function_name_is_not_referenceable() {
    assert_eq!(
        diagnostics("func f() endfunc func main() read f; endfunc"),
        vec!["non-referenceable-expression"]
    );
}

#[test]
fn reading_a_whole_array_requires_basic() {
    assert_eq!(
        diagnostics("func main() var v: array [3] of int; read v; endfunc"),
        vec!["read-write-requires-basic"]
    );
}

#[test]
fn writing_a_whole_array_requires_basic() {
    assert_eq!(
        diagnostics("func main() var v: array [3] of int; write v; endfunc"),
        vec!["read-write-requires-basic"]
    );
}

#[test]
fn assigning_to_a_function_name_reports_both_errors() {
    assert_eq!(
        diagnostics("func f() endfunc func main() f = 1; endfunc"),
        vec!["incompatible-assignment", "non-referenceable-left-expr"]
    );
}

#[test]
fn modulus_requires_integer_operands() {
    assert_eq!(
        diagnostics("func main() var x: int; x = 1 % 2.0; endfunc"),
        vec!["incompatible-operator"]
    );
}

#[test]
fn relational_operators_compare_numerics_and_equals() {
    assert_eq!(
        diagnostics("func main() var b: bool; b = 1 < 2.0; endfunc"),
        Vec::<&str>::new()
    );
    assert_eq!(
        diagnostics("func main() var b: bool; b = 'a' == 'b'; endfunc"),
        Vec::<&str>::new()
    );
    assert_eq!(
        diagnostics("func main() var b: bool; b = 'a' < 'b'; endfunc"),
        vec!["incompatible-operator"]
    );
}

#[test]
fn logical_operators_require_booleans() {
    assert_eq!(
        diagnostics("func main() var b: bool; b = 1 and true; endfunc"),
        vec!["incompatible-operator"]
    );
}

#[test]
fn not_requires_a_boolean_operand() {
    assert_eq!(
        diagnostics("func main() var b: bool; b = not 1; endfunc"),
        vec!["boolean-required"]
    );
}

#[test]
fn whole_array_assignment_checks_length_and_element() {
    assert_eq!(
        diagnostics(
            "func main() var v: array [3] of int; var w: array [3] of int; v = w; endfunc"
        ),
        Vec::<&str>::new()
    );
    assert_eq!(
        diagnostics(
            "func main() var v: array [3] of int; var w: array [4] of int; v = w; endfunc"
        ),
        vec!["incompatible-assignment"]
    );
}

#[test]
fn duplicate_local_declaration_is_reported_once() {
    assert_eq!(
        diagnostics("func main() var x: int; var x: float; endfunc"),
        vec!["already-declared-ident"]
    );
}

#[test]
fn local_clashing_with_a_parameter_is_reported() {
    assert_eq!(
        diagnostics("func f(a: int) var a: int; endfunc func main() endfunc"),
        vec!["already-declared-ident"]
    );
}

#[test]
fn unknown_type_name_is_invalid() {
    assert_eq!(
        diagnostics("func main() var x: foo; endfunc"),
        vec!["invalid-basic-type"]
    );
}

#[test]
fn missing_main_is_reported_last() {
    assert_eq!(
        diagnostics("func f() var x: int; x = true; endfunc"),
        vec!["incompatible-assignment", "no-main-properly-declared"]
    );
}

#[test]
fn main_with_parameters_or_result_is_not_properly_declared() {
    assert_eq!(
        diagnostics("func main(a: int) endfunc"),
        vec!["no-main-properly-declared"]
    );
    assert_eq!(
        diagnostics("func main(): int return 1; endfunc"),
        vec!["no-main-properly-declared"]
    );
}

#[test]
fn unparseable_source_reports_a_parse_error() {
    assert_eq!(
        diagnostics("func main( endfunc"),
        vec!["parse-error"]
    );
}
