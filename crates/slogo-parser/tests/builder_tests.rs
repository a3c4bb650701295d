//! Tree builder tests: fixed arity binding, list and group brackets,
//! user-procedure argument bundles and inline error recovery.

use slogo_lexer::Classifier;
use slogo_parser::{build, TreeBuilder};
use slogo_types::{Command, CommandKind, ErrorCode, Procedure, ProcedureTable};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn classify(source: &str, procedures: &ProcedureTable) -> Vec<Command> {
    Classifier::english()
        .unwrap()
        .classify(source, procedures)
}

/// Classify and build with no user procedures.
fn forest(source: &str) -> Vec<Command> {
    build(classify(source, &ProcedureTable::new()))
}

/// Render each root of the forest.
fn rendered(source: &str) -> Vec<String> {
    forest(source).iter().map(ToString::to_string).collect()
}

/// First error code in depth-first order across the forest.
fn first_error_code(roots: &[Command]) -> Option<ErrorCode> {
    roots.iter().find_map(Command::first_error).map(|e| e.code)
}

/// A procedure table holding `square [ :side ] [ fd :side ]`.
fn square_table() -> ProcedureTable {
    let mut parts = forest("[ :side ] [ fd :side ]").into_iter();
    let params = parts.next().unwrap();
    let body = parts.next().unwrap();
    let mut procedures = ProcedureTable::new();
    procedures.define("square", Procedure::new(params, body));
    procedures
}

// ─────────────────────────────────────────────────────────────────────
// Fixed arity
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_one_root_per_command() {
    assert_eq!(rendered("fd 50 rt 90"), vec!["Forward(50)", "Right(90)"]);
}

#[test]
fn test_nested_expressions() {
    assert_eq!(
        rendered("fd sum 1 product 2 3"),
        vec!["Forward(Sum(1 Product(2 3)))"]
    );
}

#[test]
fn test_leaves_stand_alone() {
    assert_eq!(rendered("5 :x pi"), vec!["5", ":x", "Pi"]);
}

#[test]
fn test_satisfiable_sequence_is_fully_consumed() {
    let commands = classify("fd sum 1 2 rt 90 repeat 2 [ fd 1 ]", &ProcedureTable::new());
    let mut builder = TreeBuilder::new(commands);
    let mut roots = Vec::new();
    while let Some(root) = builder.build_next() {
        roots.push(root);
    }
    assert_eq!(builder.remaining(), 0);
    assert_eq!(roots.len(), 3);
    assert_eq!(first_error_code(&roots), None);
}

#[test]
fn test_child_count_matches_arity() {
    for root in forest("ifelse less? 1 2 [ fd 1 ] [ fd 2 ] setpalette 1 2 3 4 setxy 3 4") {
        assert_eq!(root.params.len(), root.arity(), "{root}");
    }
}

// ─────────────────────────────────────────────────────────────────────
// Lists and groups
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_list_literal() {
    assert_eq!(
        rendered("[ fd 10 rt 90 ]"),
        vec!["ListBody(Forward(10) Right(90))"]
    );
}

#[test]
fn test_empty_list() {
    let roots = forest("[ ]");
    assert_eq!(roots, vec![Command::list_body(vec![])]);
}

#[test]
fn test_loop_with_list_body() {
    assert_eq!(
        rendered("repeat 4 [ fd 10 rt 90 ]"),
        vec!["Repeat(4 ListBody(Forward(10) Right(90)))"]
    );
    assert_eq!(
        rendered("for [ :i 1 5 1 ] [ fd :i ]"),
        vec!["For(ListBody(:i 1 5 1) ListBody(Forward(:i)))"]
    );
}

#[test]
fn test_nested_lists() {
    assert_eq!(
        rendered("repeat 2 [ repeat 3 [ fd 1 ] ]"),
        vec!["Repeat(2 ListBody(Repeat(3 ListBody(Forward(1)))))"]
    );
}

#[test]
fn test_group_makes_sum_variadic() {
    assert_eq!(rendered("( sum 1 2 3 4 )"), vec!["Sum(1 2 3 4)"]);
}

#[test]
fn test_group_applies_motion_per_argument() {
    assert_eq!(rendered("( fd 10 20 30 )"), vec!["Forward(10 20 30)"]);
}

#[test]
fn test_group_with_nested_expressions() {
    assert_eq!(
        rendered("( product 2 sum 1 1 3 )"),
        vec!["Product(2 Sum(1 1) 3)"]
    );
}

#[test]
fn test_group_headed_by_group() {
    assert_eq!(rendered("( ( sum 1 2 ) 3 )"), vec!["Sum(1 2 3)"]);
}

#[test]
fn test_procedure_definition_shape() {
    assert_eq!(
        rendered("to square [ :side ] [ fd :side ]"),
        vec!["MakeUserInstruction square(ListBody(:side) ListBody(Forward(:side)))"]
    );
}

// ─────────────────────────────────────────────────────────────────────
// User-procedure calls
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_user_call_binds_argument_bundle() {
    let roots = build(classify("square 10 fd 5", &square_table()));
    assert_eq!(roots.len(), 2);
    let call = &roots[0];
    assert_eq!(
        call.kind,
        CommandKind::UserCommand {
            name: "square".into()
        }
    );
    assert_eq!(call.params.len(), 3);
    assert_eq!(call.params[2], Command::list_body(vec![Command::constant(10.0)]));
}

#[test]
fn test_user_call_takes_expression_arguments() {
    let roots = build(classify("square sum 1 2", &square_table()));
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].params[2].to_string(), "ListBody(Sum(1 2))");
}

#[test]
fn test_user_call_without_arguments() {
    let roots = build(classify("square", &square_table()));
    assert_eq!(first_error_code(&roots), Some(ErrorCode::NOT_ENOUGH_PARAMETERS));
}

#[test]
fn test_grouped_user_call() {
    let roots = build(classify("( square 10 20 )", &square_table()));
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].params[2].params.len(), 2);
}

#[test]
fn test_grouped_user_call_needs_every_formal() {
    let roots = build(classify("( square ) fd 5", &square_table()));
    assert_eq!(roots.len(), 2);
    assert_eq!(first_error_code(&roots), Some(ErrorCode::NOT_ENOUGH_PARAMETERS));
    assert_eq!(roots[1].to_string(), "Forward(5)");
}

// ─────────────────────────────────────────────────────────────────────
// Error recovery
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_not_enough_parameters() {
    let roots = forest("fd");
    assert_eq!(roots.len(), 1);
    assert!(roots[0].is_error());
    assert_eq!(first_error_code(&roots), Some(ErrorCode::NOT_ENOUGH_PARAMETERS));
}

#[test]
fn test_nested_shortage_does_not_overrun() {
    let roots = forest("fd sum 1");
    assert_eq!(roots.len(), 1);
    assert_eq!(first_error_code(&roots), Some(ErrorCode::NOT_ENOUGH_PARAMETERS));
}

#[test]
fn test_operand_stops_at_close_marker() {
    let roots = forest("sum 1 ] fd 10");
    assert_eq!(roots.len(), 3);
    assert_eq!(roots[0].params.len(), 2);
    assert!(roots[0].params[1].is_error());
    assert_eq!(roots[1].kind, CommandKind::ListEnd);
    assert_eq!(roots[2].to_string(), "Forward(10)");
}

#[test]
fn test_unterminated_list() {
    let roots = forest("repeat 2 [ fd 10");
    assert_eq!(first_error_code(&roots), Some(ErrorCode::MISSING_CLOSING_BRACKET));
}

#[test]
fn test_unterminated_group() {
    let roots = forest("( sum 1 2");
    assert_eq!(roots.len(), 1);
    assert_eq!(first_error_code(&roots), Some(ErrorCode::MISSING_CLOSING_BRACKET));
}

#[test]
fn test_empty_group_is_an_error() {
    let roots = forest("( )");
    assert_eq!(first_error_code(&roots), Some(ErrorCode::MISSING_CLOSING_BRACKET));
}

#[test]
fn test_stray_close_markers_are_leaves() {
    let roots = forest("] )");
    assert_eq!(roots.len(), 2);
    assert_eq!(first_error_code(&roots), None);
}

#[test]
fn test_error_token_keeps_later_roots() {
    let roots = forest("fd 10 jump fd 20");
    assert_eq!(roots.len(), 3);
    assert_eq!(first_error_code(&roots), Some(ErrorCode::COMMAND_NOT_FOUND));
    assert_eq!(roots[2].to_string(), "Forward(20)");
}

#[test]
fn test_error_operand_is_bound_as_child() {
    let roots = forest("fd jump");
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].kind.name(), "Forward");
    assert!(roots[0].params[0].is_error());
}

#[test]
fn test_group_headed_by_error() {
    let roots = forest("( jump 1 2 )");
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].kind, CommandKind::ListBody);
    assert_eq!(roots[0].params.len(), 3);
    assert_eq!(first_error_code(&roots), Some(ErrorCode::COMMAND_NOT_FOUND));
}

// ─────────────────────────────────────────────────────────────────────
// Determinism
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_build_is_deterministic() {
    let source = "to spiral [ :n ] [ repeat :n [ fd repcount rt 90 ] ] ( sum 1 2 3 ) fd";
    let first = forest(source);
    for _ in 0..50 {
        assert_eq!(forest(source), first);
    }
}
