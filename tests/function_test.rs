mod common;
use common::*;
use postc::lang::ErrorCode;

#[test]
fn test_two_param_function() {
    assert_eq!(run(": add2 2 param + ; 5 3 add2 print"), "8\n");
}

#[test]
fn test_user_function_shadows_builtin_word() {
    assert_eq!(run(": add 2 param + ; 5 3 add print"), "8\n");
    assert_eq!(run("5 3 add print"), "8\n");
}

#[test]
fn test_recursion() {
    let source = "\
: fib 1 param dup 2 < if else dup 1 - fib swap 2 - fib + ; ;
10 fib print";
    assert_eq!(run(source), "55\n");
}

#[test]
fn test_mutual_recursion() {
    let source = "\
: is_even 1 param dup 0 == if drop true else 1 - is_odd ; ;
: is_odd 1 param dup 0 == if drop false else 1 - is_even ; ;
10 is_even print
7 is_even print";
    assert_eq!(run(source), "true\nfalse\n");
}

#[test]
fn test_params_arrive_in_order() {
    assert_eq!(run(": sub2 2 param - ; 10 4 sub2 print"), "6\n");
}

#[test]
fn test_function_locals_do_not_leak() {
    assert_eq!(run(": stash 0 param let y 99 ; y print ; stash"), "99\n");
    let error = run_err(": stash 0 param let y 99 ; ; stash y print");
    assert!(error == ErrorCode::UndefinedReference);
}

#[test]
fn test_function_reads_global() {
    assert_eq!(run("let x 6 ; : scaled 1 param x * ; 7 scaled print"), "42\n");
}

#[test]
fn test_function_assigns_through_to_global() {
    assert_eq!(run("var g 0 ; : setg 0 param 5 g = ; setg g print"), "5\n");
    assert_eq!(run("var g 0 ; : setg 0 param var g 5 ; ; setg g print"), "5\n");
}

#[test]
fn test_function_cannot_rebind_immutable_global() {
    assert!(run_err("let c 1 ; : f 0 param let c 2 ; ; f") == ErrorCode::ImmutableAssignment);
    assert!(run_err("let c 1 ; : f 0 param 2 c = ; f") == ErrorCode::ImmutableAssignment);
}

#[test]
fn test_prelude() {
    assert_eq!(run("5 square print"), "25\n");
    assert_eq!(run("3 cube print"), "27\n");
    assert_eq!(run("0 4 - abs print"), "4\n");
    assert_eq!(run("4 abs print"), "4\n");
    assert_eq!(run("3 9 max print"), "9\n");
    assert_eq!(run("3 9 min print"), "3\n");
}

#[test]
fn test_duplicate_definition_rejected() {
    assert!(run_err(": f 0 param 1 ; : f 0 param 2 ;") == ErrorCode::DuplicateFunction);
    assert!(run_err(": max 2 param drop ;") == ErrorCode::DuplicateFunction);
}

#[test]
fn test_unknown_name_rejected_at_compile_time() {
    assert!(run_err("fibb print") == ErrorCode::UndefinedReference);
}
