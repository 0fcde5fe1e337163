use std::{path::PathBuf, rc::Rc};

use crate::{
    analyzer::prelude::*,
    parser::prelude::parse_module,
    utils::prelude::{
        Error, ModuleWarningEmitter, SrcSpan, VectorWarningEmitterIO, Warning as Emitted,
        WarningEmitter
    }
};

fn lint(input: &str) -> Vec<Warning> {
    let module = parse_module(input).expect("program should parse");
    let io = VectorWarningEmitterIO::new();

    let emitter = ModuleWarningEmitter::new(
        PathBuf::from("test.c"),
        input.to_string(),
        WarningEmitter::new(Rc::new(io.clone()))
    );

    let _ = ModuleAnalyzer::analyze(module, &emitter);

    io.take()
        .into_iter()
        .map(|Emitted::Lint { warning, .. }| warning)
        .collect()
}

fn errors(input: &str) -> Vec<AnalyzeError> {
    let module = parse_module(input).expect("program should parse");
    let emitter = ModuleWarningEmitter::new(
        PathBuf::from("test.c"),
        input.to_string(),
        WarningEmitter::new(Rc::new(VectorWarningEmitterIO::new()))
    );

    match ModuleAnalyzer::analyze(module, &emitter) {
        Outcome::Ok(_) => vec![],
        Outcome::PartialFailure(_, errors) => errors
    }
}

#[test]
fn test_clean_module() {
    let input = r#"
        int add(int x, int y) {
            return x + y;
        }

        int main() {
            int a = add(2, 3);
            if (a > 4) { print(a); } else { print("small"); }
            while (a > 0) { a = a - 1; }
            return a;
        }
    "#;

    assert_eq!(lint(input), vec![]);
}

#[test]
fn test_unused_variables() {
    let input = "int f(int used, int ignored) { int local = 1; int x = used; return x; }";

    assert_eq!(lint(input), vec![
        Warning::UnusedVariable { name: "ignored".into(), location: SrcSpan::from(20, 27) },
        Warning::UnusedVariable { name: "local".into(), location: SrcSpan::from(35, 40) },
    ]);
}

#[test]
fn test_assignment_is_not_a_read() {
    let input = "int main() { int x = 0; x = 5; return 0; }";

    assert!(matches!(lint(input).as_slice(), [Warning::UnusedVariable { name, .. }] if name == "x"));
}

#[test]
fn test_shadowed_variables_tracked_separately() {
    let input = "int main() { int x = 1; { int x = 2; print(x); } return 0; }";

    assert_eq!(lint(input), vec![
        Warning::UnusedVariable { name: "x".into(), location: SrcSpan::from(17, 18) },
    ]);
}

#[test]
fn test_unreachable_code() {
    let input = "int main() { return 1; print(2); print(3); }";

    assert_eq!(lint(input), vec![
        Warning::UnreachableCode { location: SrcSpan::from(23, 42) },
    ]);
}

#[test]
fn test_code_after_exhaustive_if_is_unreachable() {
    let input = "int f(int n) { if (n) { return 1; } else { return 2; } return 3; }";

    assert_eq!(lint(input), vec![
        Warning::UnreachableCode { location: SrcSpan::from(55, 64) },
    ]);
}

#[test]
fn test_literal_if_conditions() {
    let input = "int main() { if (0) { print(1); } if (1) { print(2); } else { print(3); } return 0; }";

    assert_eq!(lint(input), vec![
        Warning::UnreachableIfClause { location: SrcSpan::from(20, 33) },
        Warning::UnreachableElseClause { location: SrcSpan::from(60, 73) },
    ]);
}

#[test]
fn test_loops() {
    let input = r#"int main() { while (0) { print(1); } while (1) { print(2); } return 0; }"#;

    assert_eq!(lint(input), vec![
        Warning::UnreachableWhileClause { location: SrcSpan::from(23, 36) },
        Warning::InfiniteLoop { location: SrcSpan::from(37, 45) },
    ]);
}

#[test]
fn test_loop_with_return_is_not_infinite() {
    let input = "int main() { while (1) { if (1 == 1) { return 0; } } }";

    assert_eq!(lint(input), vec![]);
}

#[test]
fn test_undeclared_variables() {
    let input = "int main() { int n = 2; if (n > 5) { print(nn); } y = 1; return 0; }";

    assert_eq!(errors(input), vec![
        AnalyzeError::VariableNotDeclared { location: SrcSpan::from(43, 45), variable: "nn".into() },
        AnalyzeError::VariableNotDeclared { location: SrcSpan::from(50, 51), variable: "y".into() },
    ]);
}

#[test]
fn test_block_locals_do_not_escape() {
    let input = "int main() { { int inner = 1; print(inner); } return inner; }";

    assert!(matches!(
        errors(input).as_slice(),
        [AnalyzeError::VariableNotDeclared { variable, .. }] if variable == "inner"
    ));
}

#[test]
fn test_calls_are_checked() {
    let input = "int add(int a, int b) { return a + b; } int main() { return add(1) + missing(2) + print(1, 2); }";

    assert_eq!(errors(input), vec![
        AnalyzeError::ArityMismatch { location: SrcSpan::from(60, 66), function: "add".into(), expected: 2, got: 1 },
        AnalyzeError::FunctionNotDeclared { location: SrcSpan::from(69, 76), function: "missing".into() },
        AnalyzeError::ArityMismatch { location: SrcSpan::from(82, 93), function: "print".into(), expected: 1, got: 2 },
    ]);
}

#[test]
fn test_print_statement_arity() {
    assert!(matches!(
        errors("int main() { print(); return 0; }").as_slice(),
        [AnalyzeError::ArityMismatch { expected: 1, got: 0, .. }]
    ));
}

#[test]
fn test_redeclarations() {
    let input = "int f(int a, int a) { int b = 1; int b = 2; return a + b; } int main() { return f(1, 2); }";

    assert_eq!(errors(input), vec![
        AnalyzeError::VariableRedeclaration {
            location_a: SrcSpan::from(10, 11),
            location_b: SrcSpan::from(17, 18),
            variable: "a".into()
        },
        AnalyzeError::VariableRedeclaration {
            location_a: SrcSpan::from(26, 27),
            location_b: SrcSpan::from(37, 38),
            variable: "b".into()
        },
    ]);
}

#[test]
fn test_function_table_problems() {
    let duplicate = "int f() { return 1; } int f() { return 2; } int main() { return f(); }";
    assert!(matches!(
        errors(duplicate).as_slice(),
        [AnalyzeError::FunctionRedeclaration { function, .. }] if function == "f"
    ));

    let builtin = "int print(int x) { return x; } int main() { return 0; }";
    assert!(matches!(
        errors(builtin).as_slice(),
        [AnalyzeError::BuiltinRedefinition { function, .. }] if function == "print"
    ));
}

#[test]
fn test_forward_references_are_fine() {
    let input = "int main() { return later(2); } int later(int n) { return n * 2; }";

    assert_eq!(errors(input), vec![]);
}

#[test]
fn test_rejected_module_does_not_run() {
    let src = r#"
        int main() {
            print("started");
            int total = 0;
            if (total > 100) {
                print(totl);
            }
            return total;
        }
    "#;

    let result = analyze_source(PathBuf::from("typo.c"), src.into(), Rc::new(VectorWarningEmitterIO::new()));

    let errors = match result {
        Err(Error::Analyze { errors, .. }) => errors,
        other => panic!("expected an analysis failure, got {other:?}")
    };

    assert!(matches!(
        errors.as_slice(),
        [AnalyzeError::VariableNotDeclared { variable, .. }] if variable == "totl"
    ));
}

#[test]
fn test_warning_count_and_rendering() {
    let input = "int main() { int unused = 1; return 0; }".to_string();
    let io = VectorWarningEmitterIO::new();
    let emitter = ModuleWarningEmitter::new(
        PathBuf::from("warn.c"),
        input.clone(),
        WarningEmitter::new(Rc::new(io.clone()))
    );

    let _ = ModuleAnalyzer::analyze(parse_module(&input).expect("program should parse"), &emitter);

    assert_eq!(emitter.count(), 1);

    let warnings = io.take();
    let rendered = warnings[0].pretty_string();

    assert!(rendered.contains("warning: Unused variable"), "{rendered}");
    assert!(rendered.contains("warn.c:1:18"), "{rendered}");
    assert!(io.is_empty());
}

#[test]
fn test_analyze_source_and_execute() {
    let src = "int main() { print(\"hi\"); return 3; }".to_string();
    let analyzed = analyze_source(PathBuf::from("dir/prog.c"), src, Rc::new(VectorWarningEmitterIO::new()))
        .expect("program should analyze");

    assert_eq!(analyzed.module.name, "prog");

    let mut out = Vec::new();
    assert_eq!(analyzed.execute(&mut out, Default::default()), Ok(3));
    assert_eq!(out, b"hi\n");
}

#[test]
fn test_analyze_source_parse_error() {
    let result = analyze_source(PathBuf::from("bad.c"), "int main( {".into(), Rc::new(VectorWarningEmitterIO::new()));

    assert!(matches!(result, Err(Error::Parse { .. })));
}

#[test]
fn test_execute_wraps_runtime_errors() {
    let analyzed = analyze_source(
        PathBuf::from("zero.c"),
        "int main() { return 1 / 0; }".into(),
        Rc::new(VectorWarningEmitterIO::new())
    ).expect("program should analyze");

    let result = analyzed.execute(std::io::sink(), Default::default());

    assert!(matches!(result, Err(Error::Eval { ref path, .. }) if path == &PathBuf::from("zero.c")));
}

#[test]
fn test_missing_file() {
    let path = PathBuf::from("definitely/not/here.c");

    assert!(matches!(analyze(path.clone(), Rc::new(VectorWarningEmitterIO::new())), Err(Error::StdIo { .. })));
    assert!(matches!(analyze_from_stream(path, Rc::new(VectorWarningEmitterIO::new())), Err(Error::StdIo { .. })));
}
