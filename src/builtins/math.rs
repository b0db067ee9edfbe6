//! Numeric built-ins: `abs`, `min`, `max`, `round`, `floor`, `ceil`,
//! `pow`, `sqrt`. Each accepts `int` or `double`, widening mixed pairs
//! to `double` the same way the evaluator's infix arithmetic does.

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;

fn as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Int(i) => Some(*i as f64),
        Value::Double(d) => Some(*d),
        _ => None,
    }
}

fn abs(args: &[Value]) -> Value {
    if args.len() != 1 {
        return EvalError::arity_error("abs", 1, args.len()).into();
    }
    match &args[0] {
        Value::Int(i) => Value::Int(i.abs()),
        Value::Double(d) => Value::Double(d.abs()),
        other => EvalError::type_error("abs", "int or double", other).into(),
    }
}

fn min(args: &[Value]) -> Value {
    if args.len() != 2 {
        return EvalError::arity_error("min", 2, args.len()).into();
    }
    let (Some(a), Some(b)) = (as_f64(&args[0]), as_f64(&args[1])) else {
        let bad = if as_f64(&args[0]).is_none() { &args[0] } else { &args[1] };
        return EvalError::type_error("min", "int or double", bad).into();
    };
    if a <= b {
        args[0].clone()
    } else {
        args[1].clone()
    }
}

fn max(args: &[Value]) -> Value {
    if args.len() != 2 {
        return EvalError::arity_error("max", 2, args.len()).into();
    }
    let (Some(a), Some(b)) = (as_f64(&args[0]), as_f64(&args[1])) else {
        let bad = if as_f64(&args[0]).is_none() { &args[0] } else { &args[1] };
        return EvalError::type_error("max", "int or double", bad).into();
    };
    if a >= b {
        args[0].clone()
    } else {
        args[1].clone()
    }
}

fn round(args: &[Value]) -> Value {
    rounding_op("round", args, f64::round)
}

fn floor(args: &[Value]) -> Value {
    rounding_op("floor", args, f64::floor)
}

fn ceil(args: &[Value]) -> Value {
    rounding_op("ceil", args, f64::ceil)
}

fn rounding_op(name: &str, args: &[Value], f: fn(f64) -> f64) -> Value {
    if args.len() != 1 {
        return EvalError::arity_error(name, 1, args.len()).into();
    }
    match &args[0] {
        Value::Int(i) => Value::Int(*i),
        Value::Double(d) => Value::Int(f(*d) as i64),
        other => EvalError::type_error(name, "int or double", other).into(),
    }
}

fn pow(args: &[Value]) -> Value {
    if args.len() != 2 {
        return EvalError::arity_error("pow", 2, args.len()).into();
    }
    let (Some(base), Some(exp)) = (as_f64(&args[0]), as_f64(&args[1])) else {
        let bad = if as_f64(&args[0]).is_none() { &args[0] } else { &args[1] };
        return EvalError::type_error("pow", "int or double", bad).into();
    };
    Value::Double(base.powf(exp))
}

fn sqrt(args: &[Value]) -> Value {
    if args.len() != 1 {
        return EvalError::arity_error("sqrt", 1, args.len()).into();
    }
    match as_f64(&args[0]) {
        Some(x) => Value::Double(x.sqrt()),
        None => EvalError::type_error("sqrt", "int or double", &args[0]).into(),
    }
}

pub fn register(env: &Rc<Environment>) {
    env.save_global("abs", Value::Builtin(abs));
    env.save_global("min", Value::Builtin(min));
    env.save_global("max", Value::Builtin(max));
    env.save_global("round", Value::Builtin(round));
    env.save_global("floor", Value::Builtin(floor));
    env.save_global("ceil", Value::Builtin(ceil));
    env.save_global("pow", Value::Builtin(pow));
    env.save_global("sqrt", Value::Builtin(sqrt));
}

pub fn help_entries() -> Vec<(&'static str, &'static str)> {
    vec![
        ("abs", "abs(x) -> int|double: absolute value"),
        ("min", "min(a, b) -> int|double: the smaller of two numbers"),
        ("max", "max(a, b) -> int|double: the larger of two numbers"),
        ("round", "round(x) -> int: nearest integer"),
        ("floor", "floor(x) -> int: rounds toward negative infinity"),
        ("ceil", "ceil(x) -> int: rounds toward positive infinity"),
        ("pow", "pow(base, exp) -> double: base raised to exp"),
        ("sqrt", "sqrt(x) -> double: square root"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_preserves_the_winning_operands_kind() {
        assert!(matches!(min(&[Value::Int(3), Value::Double(1.5)]), Value::Double(d) if d == 1.5));
    }

    #[test]
    fn round_floor_ceil_on_double() {
        assert!(matches!(round(&[Value::Double(2.5)]), Value::Int(3)));
        assert!(matches!(floor(&[Value::Double(2.9)]), Value::Int(2)));
        assert!(matches!(ceil(&[Value::Double(2.1)]), Value::Int(3)));
    }

    #[test]
    fn pow_widens_ints_to_double() {
        assert!(matches!(pow(&[Value::Int(2), Value::Int(10)]), Value::Double(d) if d == 1024.0));
    }

    #[test]
    fn sqrt_rejects_non_numeric() {
        assert!(sqrt(&[Value::String("x".into())]).is_error());
    }
}
