//! End-to-end REPL session tests over small multi-line scripts.
//!
//! `src/session.rs` unit-tests individual lines in isolation; this file
//! exercises `ReplSession` the way an interactive user actually drives
//! it -- several lines in a row, sharing one environment.

use yartbml_repl::ReplSession;

fn run(lines: &[&str]) -> String {
    let session = ReplSession::new();
    let mut out = Vec::new();
    for line in lines {
        session.eval_line(line, &mut out).unwrap();
    }
    String::from_utf8(out).unwrap()
}

#[test]
fn recursive_function_defined_across_lines() {
    let output = run(&[
        "let fib = fn(n) { if (n < 2) { n } else { fib(n - 1) + fib(n - 2) } };",
        "fib(10);",
    ]);
    assert_eq!(output, "55\n");
}

#[test]
fn map_helper_defined_then_used_on_a_later_line() {
    let output = run(&[
        r#"let map = fn(arr, f) { let iter = fn(arr, acc) { if (len(arr) == 0) { acc } else { iter(rest(arr), push(acc, f(first(arr)))) } }; iter(arr, []) };"#,
        "map([1, 2, 3], fn(x) { x * 2 });",
    ]);
    assert_eq!(output, "[2, 4, 6]\n");
}

#[test]
fn a_line_that_fails_to_parse_does_not_disturb_later_lines() {
    let output = run(&["let x 5;", "let x = 5;", "x + 1;"]);
    assert!(output.starts_with('\t'), "expected the parse error first, got {output:?}");
    assert!(output.trim_end().ends_with('6'));
}

#[test]
fn a_runtime_error_on_one_line_does_not_poison_the_session_environment() {
    let output = run(&["let x = 5;", "x + true;", "x + 1;"]);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines, vec!["ERROR: type mismatch: INTEGER + BOOLEAN", "6"]);
}

#[test]
fn puts_output_from_an_earlier_line_precedes_a_later_lines_result() {
    let output = run(&[r#"puts("hello");"#, "1 + 1;"]);
    assert_eq!(output, "hello\n2\n");
}
