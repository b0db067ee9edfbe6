//! Core scalar operations: type conversion, inspection, and `exit`.

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;

fn len(args: &[Value]) -> Value {
    if args.len() != 1 {
        return EvalError::arity_error("len", 1, args.len()).into();
    }
    match &args[0] {
        Value::String(s) => Value::Int(s.chars().count() as i64),
        Value::List(items) => Value::Int(items.borrow().len() as i64),
        Value::Map(entries) => Value::Int(entries.borrow().len() as i64),
        other => EvalError::type_error("len", "string, list or map", other).into(),
    }
}

fn str_of(args: &[Value]) -> Value {
    if args.len() != 1 {
        return EvalError::arity_error("str", 1, args.len()).into();
    }
    match &args[0] {
        Value::Int(i) => Value::String(i.to_string()),
        Value::Double(d) => Value::String(d.to_string()),
        Value::Bool(b) => Value::String(b.to_string()),
        Value::String(s) => Value::String(s.clone()),
        other => EvalError::type_error("str", "int, double, bool or string", other).into(),
    }
}

fn int_of(args: &[Value]) -> Value {
    if args.len() != 1 {
        return EvalError::arity_error("int", 1, args.len()).into();
    }
    match &args[0] {
        Value::Int(i) => Value::Int(*i),
        Value::Double(d) => Value::Int(*d as i64),
        Value::String(s) => match s.trim().parse::<i64>() {
            Ok(i) => Value::Int(i),
            Err(_) => EvalError::Custom(format!("cannot parse '{s}' as int")).into(),
        },
        other => EvalError::type_error("int", "int, double or string", other).into(),
    }
}

fn double_of(args: &[Value]) -> Value {
    if args.len() != 1 {
        return EvalError::arity_error("double", 1, args.len()).into();
    }
    match &args[0] {
        Value::Int(i) => Value::Double(*i as f64),
        Value::Double(d) => Value::Double(*d),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(d) => Value::Double(d),
            Err(_) => EvalError::Custom(format!("cannot parse '{s}' as double")).into(),
        },
        other => EvalError::type_error("double", "int, double or string", other).into(),
    }
}

fn type_of(args: &[Value]) -> Value {
    if args.len() != 1 {
        return EvalError::arity_error("type", 1, args.len()).into();
    }
    Value::String(args[0].type_name().to_string())
}

/// Terminates the process immediately with the given exit code (default 0
/// when called with no arguments). There is no way to intercept this from
/// within the language; `main`'s host loop is the only thing that outlives
/// it, and it doesn't.
fn exit(args: &[Value]) -> Value {
    let code = match args {
        [] => 0,
        [Value::Int(i)] => *i as i32,
        [other] => return EvalError::type_error("exit", "int", other).into(),
        _ => return EvalError::arity_error("exit", 1, args.len()).into(),
    };
    std::process::exit(code);
}

pub fn register(env: &Rc<Environment>) {
    env.save_global("len", Value::Builtin(len));
    env.save_global("str", Value::Builtin(str_of));
    env.save_global("int", Value::Builtin(int_of));
    env.save_global("double", Value::Builtin(double_of));
    env.save_global("type", Value::Builtin(type_of));
    env.save_global("exit", Value::Builtin(exit));
}

pub fn help_entries() -> Vec<(&'static str, &'static str)> {
    vec![
        ("len", "len(x) -> int: length of a string, list or map"),
        ("str", "str(x) -> string: render x as a string"),
        ("int", "int(x) -> int: convert x to an int, truncating doubles"),
        ("double", "double(x) -> double: convert x to a double"),
        ("type", "type(x) -> string: the runtime type name of x"),
        ("exit", "exit(code?) -> never: terminate the process"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_counts_chars_not_bytes() {
        assert!(matches!(len(&[Value::String("ab".into())]), Value::Int(2)));
    }

    #[test]
    fn int_truncates_double() {
        assert!(matches!(int_of(&[Value::Double(3.9)]), Value::Int(3)));
    }

    #[test]
    fn int_rejects_unparseable_string() {
        assert!(int_of(&[Value::String("abc".into())]).is_error());
    }

    #[test]
    fn type_reports_runtime_kind() {
        assert!(matches!(type_of(&[Value::Bool(true)]), Value::String(s) if s == "bool"));
    }
}
