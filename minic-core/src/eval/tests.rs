use std::io::Write;

use crate::{
    environment::prelude::{EnvironmentError, ValueType},
    eval::prelude::*,
    parser::prelude::parse_module,
    utils::prelude::SrcSpan
};

fn run_with(src: &str, options: Options) -> (Result<i32, EvalError>, String) {
    let module = parse_module(src).expect("program should parse");
    let mut out = Vec::new();

    let result = run(&module.program, &mut out, options);

    (result, String::from_utf8(out).expect("output should be utf8"))
}

fn run_source(src: &str) -> (Result<i32, EvalError>, String) {
    run_with(src, Options::default())
}

fn output_of(body: &str) -> String {
    let (result, output) = run_source(&format!("int main() {{ {body} return 0; }}"));
    assert_eq!(result, Ok(0), "program failed, output so far: {output:?}");

    output
}

#[test]
fn test_return_value() {
    let (result, output) = run_source("int main() { return 2 + 3 * 4; }");

    assert_eq!(result, Ok(14));
    assert!(output.is_empty());
}

#[test]
fn test_missing_return_yields_zero() {
    assert_eq!(run_source("int main() { int x = 5; }").0, Ok(0));
    assert_eq!(run_source("int main() { return; }").0, Ok(0));
    assert_eq!(run_source("int f() { } int main() { return f() + 7; }").0, Ok(7));
}

#[test]
fn test_division_truncates_toward_zero() {
    assert_eq!(output_of("print(7 / 2); print(-7 / 2); print(7 / -2); print(-7 / -2);"), "3\n-3\n-3\n3\n");
}

#[test]
fn test_wraparound() {
    let output = output_of(r#"
        print(2147483647 + 1);
        print(-2147483648);
        print(-2147483648 - 1);
        print(-2147483648 / -1);
        print(65536 * 65536);
        print(--2147483648);
    "#);

    assert_eq!(output, "-2147483648\n-2147483648\n2147483647\n-2147483648\n0\n-2147483648\n");
}

#[test]
fn test_comparisons() {
    let output = output_of("print(1 < 2); print(2 < 1); print(2 <= 2); print(3 >= 4); print(5 > 4); print(1 == 1); print(1 != 1);");

    assert_eq!(output, "1\n0\n1\n0\n1\n1\n0\n");
}

#[test]
fn test_string_equality() {
    let output = output_of(r#"print("abc" == "abc"); print("abc" != "abd"); print("a" == "b");"#);

    assert_eq!(output, "1\n1\n0\n");
}

#[test]
fn test_string_arithmetic_is_type_mismatch() {
    let (result, _) = run_source(r#"int main() { return "a" + 1; }"#);

    assert_eq!(result, Err(EvalError::TypeMismatch {
        expected: "int",
        got: ValueType::String,
        location: SrcSpan::from(20, 23)
    }));

    let (result, _) = run_source(r#"int main() { return 1 == "a"; }"#);
    assert!(matches!(result, Err(EvalError::TypeMismatch { expected: "int", got: ValueType::String, .. })));

    let (result, _) = run_source(r#"int main() { return "a" == 1; }"#);
    assert!(matches!(result, Err(EvalError::TypeMismatch { expected: "string", got: ValueType::Integer, .. })));

    let (result, _) = run_source(r#"int main() { return -"a"; }"#);
    assert!(matches!(result, Err(EvalError::TypeMismatch { got: ValueType::String, .. })));
}

#[test]
fn test_print_strings_verbatim() {
    assert_eq!(output_of(r#"print("hello, world \n not escaped");"#), "hello, world \\n not escaped\n");
}

#[test]
fn test_uninitialised_declaration_is_zero() {
    assert_eq!(output_of("int x; print(x); x = x + 3; print(x);"), "0\n3\n");
}

#[test]
fn test_if_chain_runs_one_branch() {
    let src = r#"
        int classify(int n) {
            if (n < 0) {
                print("negative");
            } else if (n == 0) {
                print("zero");
            } else if (n < 10) {
                print("small");
            } else {
                print("large");
            }

            return n;
        }

        int main() {
            classify(-5);
            classify(0);
            classify(3);
            classify(100);
            return 0;
        }
    "#;

    let (result, output) = run_source(src);

    assert_eq!(result, Ok(0));
    assert_eq!(output, "negative\nzero\nsmall\nlarge\n");
}

#[test]
fn test_while_false_runs_zero_times() {
    assert_eq!(output_of(r#"while (0) { print("never"); } print("after");"#), "after\n");
}

#[test]
fn test_while_loop_and_return_inside() {
    let src = r#"
        int first_multiple(int n, int of) {
            while (1) {
                if (n / of * of == n) {
                    return n;
                }
                n = n + 1;
            }
        }

        int main() {
            int i = 0;
            int sum = 0;
            while (i < 5) {
                sum = sum + i;
                i = i + 1;
            }
            print(sum);
            return first_multiple(11, 4);
        }
    "#;

    let (result, output) = run_source(src);

    assert_eq!(result, Ok(12));
    assert_eq!(output, "10\n");
}

#[test]
fn test_power_with_zero_exponent() {
    let src = r#"
        int power(int base, int exp) {
            int result = 1;
            while (exp > 0) {
                print("iteration");
                result = result * base;
                exp = exp - 1;
            }
            return result;
        }

        int main() {
            return power(7, 0);
        }
    "#;

    let (result, output) = run_source(src);

    assert_eq!(result, Ok(1));
    assert!(output.is_empty());
}

#[test]
fn test_recursion_and_forward_references() {
    let src = r#"
        int main() {
            print(fib(15));
            return fact(10);
        }

        int fact(int n) {
            if (n <= 1) { return 1; }
            return n * fact(n - 1);
        }

        int fib(int n) {
            if (n < 2) { return n; }
            return fib(n - 1) + fib(n - 2);
        }
    "#;

    let (result, output) = run_source(src);

    assert_eq!(result, Ok(3628800));
    assert_eq!(output, "610\n");
}

#[test]
fn test_arguments_evaluated_left_to_right() {
    let src = r#"
        int show(int n) { print(n); return n; }
        int sub(int a, int b) { return a - b; }
        int main() { return sub(show(10), show(3)); }
    "#;

    let (result, output) = run_source(src);

    assert_eq!(result, Ok(7));
    assert_eq!(output, "10\n3\n");
}

#[test]
fn test_arity_mismatch_has_no_side_effects() {
    let src = r#"
        int show(int n) { print(n); return n; }
        int one(int a) { return a; }
        int main() { return one(show(1), show(2)); }
    "#;

    let (result, output) = run_source(src);

    assert_eq!(result, Err(EvalError::ArityMismatch {
        name: "one".into(),
        expected: 1,
        got: 2,
        location: SrcSpan::from(114, 134)
    }));
    assert!(output.is_empty());
}

#[test]
fn test_print_arity() {
    let (result, output) = run_source(r#"int main() { print(1, 2); return 0; }"#);

    assert!(matches!(result, Err(EvalError::ArityMismatch { ref name, expected: 1, got: 2, .. }) if name == "print"));
    assert!(output.is_empty());

    let (result, _) = run_source(r#"int main() { print(); return 0; }"#);
    assert!(matches!(result, Err(EvalError::ArityMismatch { got: 0, .. })));
}

#[test]
fn test_print_result_is_not_a_value() {
    let (result, output) = run_source("int main() { int x = print(1); return x; }");

    assert_eq!(output, "1\n");
    assert_eq!(result, Err(EvalError::TypeMismatch {
        expected: "int or string",
        got: ValueType::Void,
        location: SrcSpan::from(21, 29)
    }));

    let (result, _) = run_source("int main() { return 1 + print(2); }");
    assert!(matches!(result, Err(EvalError::TypeMismatch { got: ValueType::Void, .. })));

    let (result, _) = run_source("int main() { if (print(2)) { } return 0; }");
    assert!(matches!(result, Err(EvalError::TypeMismatch { got: ValueType::Void, .. })));
}

#[test]
fn test_print_as_expression_statement() {
    let (result, output) = run_source(r#"int main() { 1 + 1; (print("ok")); return 0; }"#);

    assert_eq!(result, Ok(0));
    assert_eq!(output, "ok\n");
}

#[test]
fn test_division_by_zero() {
    let (result, output) = run_source("int main() { print(1); return 10 / (5 - 5); }");

    assert_eq!(output, "1\n");
    assert_eq!(result, Err(EvalError::DivisionByZero { location: SrcSpan::from(30, 41) }));
}

#[test]
fn test_stack_overflow() {
    let src = "int f(int n) { return f(n + 1); } int main() { return f(0); }";
    let (result, _) = run_with(src, Options { max_call_depth: 64 });

    assert!(matches!(result, Err(EvalError::StackOverflow { limit: 64, .. })));
}

#[test]
fn test_default_depth_limit_on_small_thread() {
    let handle = std::thread::spawn(|| {
        let (result, _) = run_source("int f(int n) { return f(n + 1); } int main() { return f(0); }");
        result
    });

    let result = handle.join().expect("evaluation should not abort the caller");

    assert!(matches!(result, Err(EvalError::StackOverflow { limit: DEFAULT_MAX_CALL_DEPTH, .. })));
}

#[test]
fn test_deep_recursion_below_default_limit() {
    let src = r#"
        int count(int n) {
            if (n == 0) { return 0; }
            return count(n - 1) + 1;
        }

        int main() { return count(1000); }
    "#;

    let handle = std::thread::spawn(move || run_source(src).0);

    assert_eq!(handle.join().expect("evaluation should not abort the caller"), Ok(1000));
}

#[test]
fn test_stack_size_grows_with_depth() {
    let small = Options { max_call_depth: 8 };

    assert!(Options::default().stack_size() > small.stack_size());
    assert_eq!(Options { max_call_depth: usize::MAX }.stack_size(), usize::MAX);
}

#[test]
fn test_call_depth_counts_main() {
    let src = r#"
        int down(int n) {
            if (n == 0) { return 0; }
            return down(n - 1);
        }

        int main() { return down(1); }
    "#;

    assert_eq!(run_with(src, Options { max_call_depth: 3 }).0, Ok(0));
    assert!(matches!(
        run_with(src, Options { max_call_depth: 2 }).0,
        Err(EvalError::StackOverflow { limit: 2, .. })
    ));
}

#[test]
fn test_block_scoping() {
    assert_eq!(output_of("int x = 1; { int x = 2; print(x); } print(x);"), "2\n1\n");
    assert_eq!(output_of("int x = 1; { x = 5; } print(x);"), "5\n");

    let (result, _) = run_source("int main() { { int y = 1; } return y; }");
    assert!(matches!(
        result,
        Err(EvalError::Environment(EnvironmentError::UndeclaredName { ref name, .. })) if name == "y"
    ));
}

#[test]
fn test_loop_body_scope_is_fresh_each_iteration() {
    assert_eq!(output_of("int i = 0; while (i < 3) { int sq = i * i; print(sq); i = i + 1; }"), "0\n1\n4\n");
}

#[test]
fn test_redeclaration() {
    let (result, _) = run_source("int main() { int x = 1; int x = 2; return x; }");

    assert_eq!(result, Err(EvalError::Environment(EnvironmentError::Redeclaration {
        name: "x".into(),
        first: SrcSpan::from(17, 18),
        second: SrcSpan::from(28, 29)
    })));
}

#[test]
fn test_repeated_parameter() {
    let (result, _) = run_source("int f(int a, int a) { return a; } int main() { return f(1, 2); }");

    assert!(matches!(
        result,
        Err(EvalError::Environment(EnvironmentError::Redeclaration { ref name, .. })) if name == "a"
    ));
}

#[test]
fn test_callee_cannot_see_caller_locals() {
    let (result, _) = run_source("int peek() { return x; } int main() { int x = 1; return peek(); }");

    assert_eq!(result, Err(EvalError::Environment(EnvironmentError::UndeclaredName {
        name: "x".into(),
        location: SrcSpan::from(20, 21)
    })));
}

#[test]
fn test_undeclared_function() {
    let (result, _) = run_source("int main() { return nope(1); }");

    assert_eq!(result, Err(EvalError::Environment(EnvironmentError::UndeclaredFunction {
        name: "nope".into(),
        location: SrcSpan::from(20, 24)
    })));
}

#[test]
fn test_missing_main() {
    let (result, _) = run_source("int helper() { return 1; }");

    assert_eq!(result, Err(EvalError::Environment(EnvironmentError::UndeclaredFunction {
        name: "main".into(),
        location: SrcSpan::from(0, 26)
    })));
}

#[test]
fn test_main_takes_no_parameters() {
    let (result, _) = run_source("int main(int argc) { return 0; }");

    assert!(matches!(result, Err(EvalError::ArityMismatch { expected: 0, got: 1, .. })));
}

#[test]
fn test_main_must_return_int() {
    let (result, output) = run_source(r#"int main() { print("x"); return "done"; }"#);

    assert_eq!(output, "x\n");
    assert!(matches!(result, Err(EvalError::TypeMismatch { expected: "int", got: ValueType::String, .. })));
}

#[test]
fn test_string_condition() {
    let (result, _) = run_source(r#"int main() { while ("yes") { } return 0; }"#);

    assert!(matches!(result, Err(EvalError::TypeMismatch { got: ValueType::String, .. })));
}

#[test]
fn test_duplicate_function_reported_before_running() {
    let (result, output) = run_source(r#"int main() { print("ran"); return 0; } int main() { return 1; }"#);

    assert!(matches!(result, Err(EvalError::Environment(EnvironmentError::DuplicateFunction { .. }))));
    assert!(output.is_empty());
}

struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::ErrorKind::BrokenPipe.into())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_output_failure() {
    let module = parse_module("int main() { print(1); return 0; }").expect("program should parse");

    let result = run(&module.program, BrokenPipe, Options::default());

    assert_eq!(result, Err(EvalError::Output { err: std::io::ErrorKind::BrokenPipe }));
}
