mod common;
use common::*;
use postc::lang::ErrorCode;

#[test]
fn test_if_without_else() {
    assert_eq!(run("true if \"yes\" print ;"), "yes\n");
    assert_eq!(run("false if \"yes\" print ;"), "");
}

#[test]
fn test_if_else() {
    assert_eq!(run("3 4 < if \"less\" else \"not\" ; print"), "less\n");
    assert_eq!(run("4 3 < if \"less\" else \"not\" ; print"), "not\n");
}

#[test]
fn test_if_condition_from_stack() {
    assert_eq!(run("let ok true ; ok if 1 print ;"), "1\n");
}

#[test]
fn test_if_condition_must_be_boolean() {
    assert!(run_err("1 if 2 print ;") == ErrorCode::TypeMismatch);
}

#[test]
fn test_while_sums() {
    let source = "\
var sum 0 ;
var i 0 ;
i 10 < while
    sum i + sum =
    i 1 + i =
;
sum print";
    assert_eq!(run(source), "45\n");
}

#[test]
fn test_while_body_may_not_run() {
    assert_eq!(run("false while 1 print ; 2 print"), "2\n");
}

#[test]
fn test_for_counts_down() {
    assert_eq!(run("3 for \"hi\" print ;"), "hi\nhi\nhi\n");
    assert_eq!(run("0 for \"hi\" print ; \"done\" print"), "done\n");
}

#[test]
fn test_for_count_from_stack() {
    assert_eq!(run("1 1 + for \"x\" print ;"), "x\nx\n");
}

#[test]
fn test_nested_loops() {
    let source = "\
var total 0 ;
2 for
    3 for total 1 + total = ;
;
total print";
    assert_eq!(run(source), "6\n");
}

#[test]
fn test_while_requires_condition() {
    assert!(run_err("while 1 print ;") == ErrorCode::UnexpectedToken);
}
