//! REPL session state management.
//!
//! Unlike a JIT-backed REPL, a tree-walking session needs no wrapper
//! function names or per-line compilation units: the driver contract
//! (§6.1) is "retain one `Environment` across lines, evaluate each line
//! against it." [`ReplSession`] owns exactly that one piece of state.

use std::io::{self, Write};

use yartbml_eval::{eval_program, Environment, Value};
use yartbml_parser::parse;

/// Persistent state for a REPL session: the one `Environment` that
/// accumulates bindings across every line fed to [`ReplSession::eval_line`].
pub struct ReplSession {
    env: Environment,
}

impl ReplSession {
    /// Create a new session with a fresh, empty global environment.
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }

    /// Parse and evaluate one line of input against this session's
    /// environment, per the driver contract (§6.1):
    ///
    /// - A non-empty parser error list suppresses evaluation entirely;
    ///   each error is written to `out` on its own indented line.
    /// - Otherwise the line is evaluated and, unless the result is
    ///   `Value::Null`, its display form is written to `out` followed by
    ///   a newline. `puts` output (if any) is interleaved as it occurs,
    ///   since it shares the same `out` sink.
    pub fn eval_line(&self, line: &str, out: &mut dyn Write) -> io::Result<()> {
        let (program, errors) = parse(line);
        if !errors.is_empty() {
            print_parser_errors(out, &errors)?;
            return Ok(());
        }
        let result = eval_program(&program, &self.env, out);
        if !matches!(result, Value::Null) {
            writeln!(out, "{result}")?;
        }
        Ok(())
    }

    /// Borrow the session's environment, e.g. to inspect bindings after a
    /// batch of lines in a test.
    pub fn environment(&self) -> &Environment {
        &self.env
    }
}

impl Default for ReplSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes each parser error on its own tab-indented line, matching the
/// host REPL's `printParserErrors`.
fn print_parser_errors(out: &mut dyn Write, errors: &[String]) -> io::Result<()> {
    for msg in errors {
        writeln!(out, "\t{msg}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(lines: &[&str]) -> String {
        let session = ReplSession::new();
        let mut out = Vec::new();
        for line in lines {
            session.eval_line(line, &mut out).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn bare_expression_prints_its_display_form() {
        assert_eq!(run(&["5 + 5"]), "10\n");
    }

    #[test]
    fn let_statement_produces_no_output() {
        assert_eq!(run(&["let x = 5;"]), "");
    }

    #[test]
    fn bindings_persist_across_lines() {
        assert_eq!(run(&["let x = 5;", "x + 1"]), "6\n");
    }

    #[test]
    fn closures_defined_in_one_line_still_see_their_captured_environment_later() {
        let output = run(&[
            "let newAdder = fn(x) { fn(y) { x + y } };",
            "let addTwo = newAdder(2);",
            "addTwo(3);",
        ]);
        assert_eq!(output, "5\n");
    }

    #[test]
    fn parse_errors_are_reported_indented_and_suppress_evaluation() {
        let output = run(&["let x 5;"]);
        assert!(output.starts_with('\t'), "expected an indented error line, got {output:?}");
        assert!(output.contains("expected next token to be"));
    }

    #[test]
    fn runtime_error_is_displayed_like_any_other_value() {
        assert_eq!(run(&["5 + true;"]), "ERROR: type mismatch: INTEGER + BOOLEAN\n");
    }

    #[test]
    fn puts_output_is_interleaved_with_the_line_expression_result() {
        // puts itself returns NULL (no trailing value line), but its own
        // writes still land in `out` before the expression statement's
        // own result line would, if there were one here.
        assert_eq!(run(&[r#"puts("hi")"#]), "hi\n");
    }
}
