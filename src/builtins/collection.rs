//! List and map operations: `front`/`back`/`push`/`pop`/`index`/`range`
//! for lists, `delete`/`find` for maps.

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;

fn as_list<'a>(v: &'a Value, context: &str) -> Result<&'a Rc<std::cell::RefCell<Vec<Value>>>, Value> {
    match v {
        Value::List(items) => Ok(items),
        other => Err(EvalError::type_error(context, "list", other).into()),
    }
}

fn as_map<'a>(
    v: &'a Value,
    context: &str,
) -> Result<&'a Rc<std::cell::RefCell<std::collections::HashMap<crate::value::HashKey, Value>>>, Value>
{
    match v {
        Value::Map(entries) => Ok(entries),
        other => Err(EvalError::type_error(context, "map", other).into()),
    }
}

fn front(args: &[Value]) -> Value {
    if args.len() != 1 {
        return EvalError::arity_error("front", 1, args.len()).into();
    }
    let items = match as_list(&args[0], "front") {
        Ok(items) => items,
        Err(e) => return e,
    };
    match items.borrow().first() {
        Some(v) => v.clone(),
        None => EvalError::Custom("front: list is empty".to_string()).into(),
    }
}

fn back(args: &[Value]) -> Value {
    if args.len() != 1 {
        return EvalError::arity_error("back", 1, args.len()).into();
    }
    let items = match as_list(&args[0], "back") {
        Ok(items) => items,
        Err(e) => return e,
    };
    match items.borrow().last() {
        Some(v) => v.clone(),
        None => EvalError::Custom("back: list is empty".to_string()).into(),
    }
}

fn push(args: &[Value]) -> Value {
    if args.len() != 2 {
        return EvalError::arity_error("push", 2, args.len()).into();
    }
    let items = match as_list(&args[0], "push") {
        Ok(items) => items,
        Err(e) => return e,
    };
    items.borrow_mut().push(args[1].clone());
    Value::Nil
}

fn pop(args: &[Value]) -> Value {
    let items = match args.first().map(|v| as_list(v, "pop")) {
        Some(Ok(items)) => items,
        Some(Err(e)) => return e,
        None => return EvalError::arity_error("pop", 1, 0).into(),
    };
    match args.len() {
        1 => {
            let popped = items.borrow_mut().pop();
            match popped {
                Some(v) => v,
                None => EvalError::Custom("pop: list is empty".to_string()).into(),
            }
        }
        2 => {
            let idx = match &args[1] {
                Value::Int(i) => *i,
                other => return EvalError::type_error("pop", "int", other).into(),
            };
            let len = items.borrow().len();
            if idx < 0 || idx as usize >= len {
                return EvalError::IndexOutOfRange { index: idx, len }.into();
            }
            items.borrow_mut().remove(idx as usize)
        }
        n => EvalError::arity_error("pop", 1, n).into(),
    }
}

fn index(args: &[Value]) -> Value {
    if args.len() != 2 {
        return EvalError::arity_error("index", 2, args.len()).into();
    }
    let items = match as_list(&args[0], "index") {
        Ok(items) => items,
        Err(e) => return e,
    };
    let target = &args[1];
    let found = items.borrow().iter().position(|v| values_equal(v, target));
    match found {
        Some(i) => Value::Int(i as i64),
        None => Value::Nil,
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Double(x), Value::Double(y)) => x == y,
        (Value::Int(x), Value::Double(y)) | (Value::Double(y), Value::Int(x)) => *x as f64 == *y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Nil, Value::Nil) => true,
        _ => false,
    }
}

fn range(args: &[Value]) -> Value {
    let (start, end) = match args {
        [Value::Int(n)] => (0, *n),
        [Value::Int(a), Value::Int(b)] => (*a, *b),
        [other] => return EvalError::type_error("range", "int", other).into(),
        [a, b] => {
            let bad = if matches!(a, Value::Int(_)) { b } else { a };
            return EvalError::type_error("range", "int", bad).into();
        }
        _ => return EvalError::arity_error("range", 1, args.len()).into(),
    };
    let items = (start..end).map(Value::Int).collect();
    Value::List(Rc::new(std::cell::RefCell::new(items)))
}

fn delete(args: &[Value]) -> Value {
    if args.len() != 2 {
        return EvalError::arity_error("delete", 2, args.len()).into();
    }
    let entries = match as_map(&args[0], "delete") {
        Ok(entries) => entries,
        Err(e) => return e,
    };
    let key = match args[1].hash_key() {
        Some(k) => k,
        None => return EvalError::type_error("delete", "hashable key", &args[1]).into(),
    };
    entries.borrow_mut().remove(&key);
    Value::Nil
}

fn find(args: &[Value]) -> Value {
    if args.len() != 2 {
        return EvalError::arity_error("find", 2, args.len()).into();
    }
    let entries = match as_map(&args[0], "find") {
        Ok(entries) => entries,
        Err(e) => return e,
    };
    let key = match args[1].hash_key() {
        Some(k) => k,
        None => return EvalError::type_error("find", "hashable key", &args[1]).into(),
    };
    Value::Bool(entries.borrow().contains_key(&key))
}

pub fn register(env: &Rc<Environment>) {
    env.save_global("front", Value::Builtin(front));
    env.save_global("back", Value::Builtin(back));
    env.save_global("push", Value::Builtin(push));
    env.save_global("pop", Value::Builtin(pop));
    env.save_global("index", Value::Builtin(index));
    env.save_global("range", Value::Builtin(range));
    env.save_global("delete", Value::Builtin(delete));
    env.save_global("find", Value::Builtin(find));
}

pub fn help_entries() -> Vec<(&'static str, &'static str)> {
    vec![
        ("front", "front(list) -> value: first element"),
        ("back", "back(list) -> value: last element"),
        ("push", "push(list, value) -> nil: appends in place"),
        ("pop", "pop(list, index?) -> value: removes and returns an element"),
        ("index", "index(list, value) -> int|nil: first matching position"),
        ("range", "range(n) / range(a, b) -> list: a list of ints [0,n) or [a,b)"),
        ("delete", "delete(map, key) -> nil: removes a key"),
        ("find", "find(map, key) -> bool: whether key is present"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(vs: Vec<Value>) -> Value {
        Value::List(Rc::new(std::cell::RefCell::new(vs)))
    }

    #[test]
    fn front_and_back_on_nonempty_list() {
        let l = list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert!(matches!(front(&[l.clone()]), Value::Int(1)));
        assert!(matches!(back(&[l]), Value::Int(3)));
    }

    #[test]
    fn front_on_empty_list_errors() {
        assert!(front(&[list(vec![])]).is_error());
    }

    #[test]
    fn pop_without_index_removes_last() {
        let l = list(vec![Value::Int(1), Value::Int(2)]);
        let popped = pop(&[l.clone()]);
        assert!(matches!(popped, Value::Int(2)));
        if let Value::List(items) = &l {
            assert_eq!(items.borrow().len(), 1);
        }
    }

    #[test]
    fn range_two_arg_produces_half_open_interval() {
        let r = range(&[Value::Int(2), Value::Int(5)]);
        if let Value::List(items) = r {
            let ints: Vec<i64> = items
                .borrow()
                .iter()
                .map(|v| if let Value::Int(i) = v { *i } else { unreachable!() })
                .collect();
            assert_eq!(ints, vec![2, 3, 4]);
        } else {
            panic!("expected list");
        }
    }

    #[test]
    fn index_returns_nil_when_absent() {
        let l = list(vec![Value::Int(1)]);
        assert!(matches!(index(&[l, Value::Int(9)]), Value::Nil));
    }
}
