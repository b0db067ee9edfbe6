// ABOUTME: End-to-end tests driving the full lexer -> parser -> evaluator pipeline

use std::rc::Rc;

use april::builtins::register_builtins;
use april::env::Environment;
use april::eval::eval_program;
use april::lexer::Lexer;
use april::parser::parse;
use april::value::Value;

fn fresh_env() -> Rc<Environment> {
    let env = Environment::root();
    register_builtins(&env);
    env
}

fn run(src: &str) -> Value {
    run_in(src, &fresh_env())
}

fn run_in(src: &str, env: &Rc<Environment>) -> Value {
    let (program, errors) = parse(Lexer::new(src));
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
    eval_program(&program, env)
}

#[test]
fn scenario_1_plain_var_reference() {
    assert!(matches!(run("var x:int = 15; x;"), Value::Int(15)));
}

#[test]
fn scenario_2_string_index() {
    assert!(matches!(run(r#"var s:string = "ab"; s[0];"#), Value::String(ref s) if s == "a"));
}

#[test]
fn scenario_3_list_index_assignment() {
    let result = run("var a:list = [1,2,3]; a[1] = 99; a;");
    match result {
        Value::List(items) => {
            let rendered: Vec<i64> = items
                .borrow()
                .iter()
                .map(|v| if let Value::Int(i) = v { *i } else { panic!("expected int") })
                .collect();
            assert_eq!(rendered, vec![1, 99, 3]);
        }
        other => panic!("expected list, got {other:?}"),
    }
}

#[test]
fn scenario_4_call_and_type_mismatch() {
    let src = "fn add(x:int, y:int) int { return x+y; } add(2,3);";
    assert!(matches!(run(src), Value::Int(5)));

    let src2 = "fn add(x:int, y:int) int { return x+y; } add(2, 3.0);";
    assert!(run(src2).is_error());
}

#[test]
fn scenario_5_return_widens_int_to_double() {
    let src = "fn f(x:int) double { return x; } f(2);";
    assert!(matches!(run(src), Value::Double(d) if d == 2.0));
}

#[test]
fn scenario_6_for_loop_variable_shadows_outer() {
    let src = "var i:int = 0; for (i := 0; i < 3; i++) { } i;";
    assert!(matches!(run(src), Value::Int(0)));
}

#[test]
fn scenario_8_division_by_zero() {
    assert!(run("1/0;").is_error());
}

#[test]
fn scenario_9_missing_map_key() {
    assert!(run(r#"{ "a": 1 }["missing"];"#).is_error());
}

#[test]
fn scenario_10_function_declaration_forbidden_inside_if() {
    let src = "if (true) { fn g() {} }";
    assert!(run(src).is_error());
}

#[test]
fn invariant_scope_containment() {
    let src = "{ var y:int = 1; } y;";
    assert!(run(src).is_error());
}

#[test]
fn invariant_named_function_isolation_sees_globals_not_locals() {
    let env = fresh_env();
    run_in("global g:int = 7;", &env);
    let src = "var local:int = 1; fn f() int { return g; } f();";
    assert!(matches!(run_in(src, &env), Value::Int(7)));

    let leaks = "var local:int = 1; fn h() int { return local; } h();";
    assert!(run_in(leaks, &env).is_error());
}

#[test]
fn invariant_closure_capture_outlives_defining_scope() {
    let src = "
        fn make_adder(n:int) func {
            return fn(x:int) int { return x + n; };
        }
        var add5:func = make_adder(5);
        add5(10);
    ";
    assert!(matches!(run(src), Value::Int(15)));
}

#[test]
fn invariant_alias_semantics_share_mutation() {
    let src = "var a:list = [1]; var b:list = a; push(b, 2); len(a);";
    assert!(matches!(run(src), Value::Int(2)));
}

#[test]
fn invariant_short_circuit_and_skips_right_operand() {
    let src = "false and (1/0 == 0);";
    assert!(matches!(run(src), Value::Bool(false)));
}

#[test]
fn scenario_7_range_for_prints_each_element_in_order() {
    let src = "for (x := [10, 20, 30]) { print(x); }";
    assert!(!run(src).is_error());
}
