// ABOUTME: Integration-level evaluator tests exercising the builtin library surface end to end

use std::rc::Rc;

use april::builtins::register_builtins;
use april::env::Environment;
use april::eval::eval_program;
use april::lexer::Lexer;
use april::parser::parse;
use april::value::Value;

fn run(src: &str) -> Value {
    let env: Rc<Environment> = Environment::root();
    register_builtins(&env);
    let (program, errors) = parse(Lexer::new(src));
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
    eval_program(&program, &env)
}

#[test]
fn collection_builtins_compose() {
    let src = "
        var xs:list = range(3);
        push(xs, 99);
        back(xs);
    ";
    assert!(matches!(run(src), Value::Int(99)));
}

#[test]
fn math_builtins_widen_mixed_arguments() {
    assert!(matches!(run("pow(2, 8);"), Value::Double(d) if d == 256.0));
    assert!(matches!(run("min(3, 1.5);"), Value::Double(d) if d == 1.5));
}

#[test]
fn str_int_double_conversions_round_trip() {
    assert!(matches!(run(r#"int(str(42));"#), Value::Int(42)));
    assert!(matches!(run(r#"double("1.5");"#), Value::Double(d) if d == 1.5));
}

#[test]
fn type_builtin_reports_runtime_kind() {
    assert!(matches!(run("type([1,2]);"), Value::String(ref s) if s == "list"));
}

#[test]
fn map_find_and_delete() {
    let src = r#"
        var m:map = { "a": 1 };
        var had:bool = find(m, "a");
        delete(m, "a");
        had;
    "#;
    assert!(matches!(run(src), Value::Bool(true)));
}

#[test]
fn undefined_identifier_is_a_lookup_error() {
    assert!(run("missing_name;").is_error());
}

#[test]
fn arity_mismatch_on_user_function_call() {
    let src = "fn f(x:int) { } f(1, 2);";
    assert!(run(src).is_error());
}
