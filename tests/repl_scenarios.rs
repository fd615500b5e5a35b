// ABOUTME: spec.md §8's nine concrete scenarios, run end-to-end through a scripted session

mod common;

use common::Session;

#[test]
fn scenario_1_plus_adds_two_numbers() {
    let mut session = Session::new(&["(PLUS 2 3)"]);
    assert_eq!(session.run_all(), vec!["5"]);
}

#[test]
fn scenario_2_setq_quote_then_cdr() {
    let mut session = Session::new(&["(SETQ X (QUOTE (A B C)))", "(CDR X)"]);
    let out = session.run_all();
    assert_eq!(out[1], "(B C)");
}

#[test]
fn scenario_3_recursive_factorial_via_shallow_binding() {
    let mut session = Session::new(&[
        "(SETQ F (LAMBDA (N) (COND ((EQ N 0) 1) (T (TIMES N (F (DIFFERENCE N 1)))))))",
        "(F 5)",
    ]);
    let out = session.run_all();
    assert_eq!(out[1], "120");
}

#[test]
fn scenario_4_shallow_binding_restores_after_call() {
    let mut session =
        Session::new(&["(SETQ X 1)", "(SETQ F (LAMBDA (X) X))", "(F 2)", "X"]);
    let out = session.run_all();
    assert_eq!(out, vec!["1", "{unnamed function}", "2", "1"]);
}

#[test]
fn scenario_5_car_cdr_of_dotted_pair() {
    let mut session = Session::new(&["(CAR (QUOTE (1 . 2)))", "(CDR (QUOTE (1 . 2)))"]);
    assert_eq!(session.run_all(), vec!["1", "2"]);
}

#[test]
fn scenario_6_cons_chain_prints_as_proper_list() {
    let mut session = Session::new(&["(CONS 1 (CONS 2 (CONS 3 NIL)))"]);
    assert_eq!(session.run_all(), vec!["(1 2 3)"]);
}

#[test]
fn scenario_7_single_symbol_formal_binds_whole_arglist() {
    let mut session = Session::new(&["(SETQ F (LAMBDA L L))", "(F 1 2 3)"]);
    let out = session.run_all();
    assert_eq!(out[1], "(1 2 3)");
}

#[test]
fn scenario_8_trace_toggle_brackets_evaluation_without_changing_the_result() {
    let mut session = Session::new(&["!TRACE", "(PLUS 1 2)", "!NOTRACE"]);
    let out = session.run_all();
    assert_eq!(out, vec!["3"]);
    assert!(!session.interp.trace, "!NOTRACE must leave tracing off");
}

#[test]
fn scenario_9_error_inside_user_function_unwinds_but_preserves_top_level_bindings() {
    let mut session = Session::new(&[
        "(SETQ X 1)",
        "(SETQ F (LAMBDA (N) ZZZ))",
        "(F 99)",
        "X",
    ]);
    let out = session.run_all();
    assert_eq!(out[0], "1");
    assert!(out[2].starts_with("::"), "unbound ZZZ must surface as an unwound error");
    assert_eq!(out[3], "1", "top-level X must survive the error unwind");
}
