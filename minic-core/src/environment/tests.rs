use crate::{
    environment::prelude::*,
    parser::prelude::{parse_module, ParseError},
    utils::prelude::SrcSpan
};

fn int(value: i32) -> Value {
    Value::Integer { value }
}

#[test]
fn test_declare_and_lookup() -> Result<(), EnvironmentError> {
    let global = Scope::global();
    global.declare("x", int(1), SrcSpan::from(0, 1))?;

    assert!(global.contains("x"));
    assert_eq!(global.lookup("x", SrcSpan::default())?, int(1));

    Ok(())
}

#[test]
fn test_redeclaration_in_same_scope() {
    let scope = Scope::global();
    scope.declare("x", int(1), SrcSpan::from(0, 1)).unwrap();

    let err = scope.declare("x", int(2), SrcSpan::from(10, 11)).unwrap_err();

    assert_eq!(err, EnvironmentError::Redeclaration {
        name: "x".into(),
        first: SrcSpan::from(0, 1),
        second: SrcSpan::from(10, 11)
    });
    assert_eq!(err.location(), SrcSpan::from(10, 11));
}

#[test]
fn test_shadowing_in_child_scope() -> Result<(), EnvironmentError> {
    let global = Scope::global();
    global.declare("x", int(1), SrcSpan::default())?;

    {
        let inner = Scope::child(&global);
        inner.declare("x", int(2), SrcSpan::default())?;

        assert_eq!(inner.lookup("x", SrcSpan::default())?, int(2));
    }

    assert_eq!(global.lookup("x", SrcSpan::default())?, int(1));

    Ok(())
}

#[test]
fn test_assign_walks_outward() -> Result<(), EnvironmentError> {
    let global = Scope::global();
    global.declare("x", int(1), SrcSpan::default())?;

    let middle = Scope::child(&global);
    let inner = Scope::child(&middle);
    inner.assign("x", int(42), SrcSpan::default())?;

    assert!(!inner.contains("x"));
    assert_eq!(global.lookup("x", SrcSpan::default())?, int(42));

    Ok(())
}

#[test]
fn test_undeclared_name() {
    let global = Scope::global();
    let inner = Scope::child(&global);

    let err = inner.lookup("missing", SrcSpan::from(3, 10)).unwrap_err();
    assert_eq!(err, EnvironmentError::UndeclaredName {
        name: "missing".into(),
        location: SrcSpan::from(3, 10)
    });

    let err = inner.assign("missing", int(0), SrcSpan::from(3, 10)).unwrap_err();
    assert!(matches!(err, EnvironmentError::UndeclaredName { .. }));
}

#[test]
fn test_child_bindings_dropped_with_scope() -> Result<(), EnvironmentError> {
    let global = Scope::global();

    {
        let block = Scope::child(&global);
        block.declare("tmp", int(5), SrcSpan::default())?;
    }

    assert!(global.lookup("tmp", SrcSpan::default()).is_err());

    Ok(())
}

#[test]
fn test_global_scope_from_nested() -> Result<(), EnvironmentError> {
    let global = Scope::global();
    global.declare("g", int(7), SrcSpan::default())?;

    let a = Scope::child(&global);
    a.declare("local", int(1), SrcSpan::default())?;
    let b = Scope::child(&a);

    let frame = Scope::child(b.global_scope());

    assert!(std::ptr::eq(b.global_scope(), &global));
    assert_eq!(frame.lookup("g", SrcSpan::default())?, int(7));
    assert!(frame.lookup("local", SrcSpan::default()).is_err());

    Ok(())
}

#[test]
fn test_register_functions() -> Result<(), ParseError> {
    let module = parse_module(r#"
        int main() { return helper(1); }
        int helper(int a) { return a; }
    "#)?;

    let table = FunctionTable::register(&module.program).unwrap();

    assert_eq!(table.resolve("main", SrcSpan::default()).unwrap().arity(), 0);

    let helper = table.resolve("helper", SrcSpan::default()).unwrap();
    assert_eq!(helper.arity(), 1);
    assert_eq!(helper.name.value, "helper");

    let err = table.resolve("nope", SrcSpan::from(1, 5)).unwrap_err();
    assert_eq!(err, EnvironmentError::UndeclaredFunction {
        name: "nope".into(),
        location: SrcSpan::from(1, 5)
    });

    Ok(())
}

#[test]
fn test_duplicate_function() -> Result<(), ParseError> {
    let module = parse_module("int f() { } int f() { }")?;

    let err = FunctionTable::register(&module.program).unwrap_err();

    assert_eq!(err, EnvironmentError::DuplicateFunction {
        name: "f".into(),
        first: SrcSpan::from(4, 5),
        second: SrcSpan::from(16, 17)
    });

    Ok(())
}

#[test]
fn test_print_cannot_be_redefined() -> Result<(), ParseError> {
    let module = parse_module("int print(int x) { return x; }")?;

    let err = FunctionTable::register(&module.program).unwrap_err();

    assert!(matches!(err, EnvironmentError::BuiltinRedefinition { ref name, .. } if name == "print"));

    Ok(())
}

#[test]
fn test_value_display() {
    assert_eq!(int(-15).to_string(), "-15");
    assert_eq!(Value::String { value: "hi there".into() }.to_string(), "hi there");
    assert_eq!(Value::from(true), TRUE);
    assert_eq!(Value::from(false), FALSE);
    assert_eq!(ValueType::String.to_string(), "string");
}
