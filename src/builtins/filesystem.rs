//! File I/O built-ins over the `Stream` value: `open`, `create`,
//! `read`, `write`, `close`, plus the path operations `rename`/`move`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::{StreamHandle, Value};

fn open(args: &[Value]) -> Value {
    if args.len() != 1 {
        return EvalError::arity_error("open", 1, args.len()).into();
    }
    let path = match &args[0] {
        Value::String(s) => s,
        other => return EvalError::type_error("open", "string", other).into(),
    };
    match std::fs::File::open(path) {
        Ok(file) => Value::Stream(Rc::new(RefCell::new(Some(StreamHandle {
            path: path.clone(),
            file,
        })))),
        Err(e) => EvalError::Custom(format!("open: {e}")).into(),
    }
}

fn create(args: &[Value]) -> Value {
    if args.len() != 1 {
        return EvalError::arity_error("create", 1, args.len()).into();
    }
    let path = match &args[0] {
        Value::String(s) => s,
        other => return EvalError::type_error("create", "string", other).into(),
    };
    match std::fs::File::create(path) {
        Ok(file) => Value::Stream(Rc::new(RefCell::new(Some(StreamHandle {
            path: path.clone(),
            file,
        })))),
        Err(e) => EvalError::Custom(format!("create: {e}")).into(),
    }
}

fn with_open_stream<R>(
    args: &[Value],
    name: &str,
    f: impl FnOnce(&mut StreamHandle) -> Result<R, Value>,
) -> Result<R, Value> {
    let handle = match args.first() {
        Some(Value::Stream(h)) => h,
        Some(other) => return Err(EvalError::type_error(name, "stream", other).into()),
        None => return Err(EvalError::arity_error(name, 1, 0).into()),
    };
    let mut borrow = handle.borrow_mut();
    match borrow.as_mut() {
        Some(h) => f(h),
        None => Err(EvalError::Custom(format!("{name}: stream is closed")).into()),
    }
}

fn read(args: &[Value]) -> Value {
    if args.len() != 1 {
        return EvalError::arity_error("read", 1, args.len()).into();
    }
    use std::io::Read as _;
    let result = with_open_stream(args, "read", |h| {
        let mut contents = String::new();
        h.file
            .read_to_string(&mut contents)
            .map(|_| contents)
            .map_err(|e| EvalError::Custom(format!("read: {e}")).into())
    });
    match result {
        Ok(contents) => Value::String(contents),
        Err(v) => v,
    }
}

fn write(args: &[Value]) -> Value {
    if args.len() != 2 {
        return EvalError::arity_error("write", 2, args.len()).into();
    }
    let content = match &args[1] {
        Value::String(s) => s.clone(),
        other => return EvalError::type_error("write", "string", other).into(),
    };
    use std::io::Write as _;
    let result = with_open_stream(&args[..1], "write", |h| {
        h.file
            .write_all(content.as_bytes())
            .map_err(|e| EvalError::Custom(format!("write: {e}")).into())
    });
    match result {
        Ok(()) => Value::Nil,
        Err(v) => v,
    }
}

fn close(args: &[Value]) -> Value {
    if args.len() != 1 {
        return EvalError::arity_error("close", 1, args.len()).into();
    }
    match &args[0] {
        Value::Stream(handle) => {
            *handle.borrow_mut() = None;
            Value::Nil
        }
        other => EvalError::type_error("close", "stream", other).into(),
    }
}

/// Renames (or moves, on the same filesystem) `args[0]` to `args[1]`.
fn rename(args: &[Value]) -> Value {
    if args.len() != 2 {
        return EvalError::arity_error("rename", 2, args.len()).into();
    }
    let (Value::String(from), Value::String(to)) = (&args[0], &args[1]) else {
        let bad = if matches!(args[0], Value::String(_)) { &args[1] } else { &args[0] };
        return EvalError::type_error("rename", "string", bad).into();
    };
    match std::fs::rename(from, to) {
        Ok(()) => Value::Nil,
        Err(e) => EvalError::Custom(format!("rename: {e}")).into(),
    }
}

pub fn register(env: &Rc<Environment>) {
    env.save_global("open", Value::Builtin(open));
    env.save_global("create", Value::Builtin(create));
    env.save_global("read", Value::Builtin(read));
    env.save_global("write", Value::Builtin(write));
    env.save_global("close", Value::Builtin(close));
    env.save_global("rename", Value::Builtin(rename));
    env.save_global("move", Value::Builtin(rename));
}

pub fn help_entries() -> Vec<(&'static str, &'static str)> {
    vec![
        ("open", "open(path) -> stream: opens a file for reading"),
        ("create", "create(path) -> stream: creates/truncates a file for writing"),
        ("read", "read(stream) -> string: reads the whole file"),
        ("write", "write(stream, text) -> nil: writes text to the file"),
        ("close", "close(stream) -> nil: closes the stream"),
        ("rename", "rename(from, to) -> nil: renames a path"),
        ("move", "move(from, to) -> nil: alias of rename"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_on_closed_stream_errors() {
        let handle = Value::Stream(Rc::new(RefCell::new(None)));
        assert!(read(&[handle]).is_error());
    }

    #[test]
    fn close_nulls_the_handle() {
        let tmp = std::env::temp_dir().join("april_fs_test_close.txt");
        std::fs::write(&tmp, b"x").unwrap();
        let opened = open(&[Value::String(tmp.to_string_lossy().into_owned())]);
        let Value::Stream(handle) = opened.clone() else { panic!("expected stream") };
        assert!(handle.borrow().is_some());
        close(&[opened]);
        assert!(handle.borrow().is_none());
        let _ = std::fs::remove_file(&tmp);
    }
}
