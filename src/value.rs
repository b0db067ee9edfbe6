// ABOUTME: The runtime value universe

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::ast::{Param, Stmt, TypeName};
use crate::env::Environment;

/// A hashable map key. Mirrors the source's key semantics rather than
/// Rust's native `Hash`/`Eq` for `f64`: `Double` truncates to `i64`
/// before hashing (see the Design Note on double hash keys), and
/// `String` uses FNV-1a so key order is independent of `RandomState`.
#[derive(Debug, Clone)]
pub enum HashKey {
    Int(i64),
    Double(f64),
    Bool(bool),
    Str(String),
}

impl PartialEq for HashKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (HashKey::Int(a), HashKey::Int(b)) => a == b,
            (HashKey::Double(a), HashKey::Double(b)) => (*a as i64) == (*b as i64),
            (HashKey::Bool(a), HashKey::Bool(b)) => a == b,
            (HashKey::Str(a), HashKey::Str(b)) => a == b,
            _ => false,
        }
    }
}
impl Eq for HashKey {}

impl Hash for HashKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            HashKey::Int(i) => i.hash(state),
            HashKey::Double(d) => (*d as i64 as u64).hash(state),
            HashKey::Bool(b) => b.hash(state),
            HashKey::Str(s) => fnv1a_64(s.as_bytes()).hash(state),
        }
    }
}

/// 64-bit FNV-1a, matching Go's `hash/fnv` `New64a` used by the source
/// for string map keys.
pub fn fnv1a_64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;
    let mut hash = OFFSET_BASIS;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

impl fmt::Display for HashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashKey::Int(i) => write!(f, "{i}"),
            HashKey::Double(d) => write!(f, "{d}"),
            HashKey::Bool(b) => write!(f, "{b}"),
            HashKey::Str(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Double(f64),
    Bool(bool),
    String(String),
    Nil,
    List(Rc<RefCell<Vec<Value>>>),
    Map(Rc<RefCell<HashMap<HashKey, Value>>>),
    Closure {
        params: Vec<Param>,
        return_type: Option<TypeName>,
        body: Rc<Stmt>,
        captured_env: Rc<Environment>,
    },
    NamedFn {
        name: String,
        params: Vec<Param>,
        return_type: Option<TypeName>,
        body: Rc<Stmt>,
        home_env: Rc<Environment>,
    },
    Stream(Rc<RefCell<Option<StreamHandle>>>),
    Builtin(BuiltinFn),

    // Internal-only control-flow values. Never observable as a final
    // result except `Error`.
    ReturnSignal(Box<Value>),
    BreakSignal,
    Error(String),
}

pub type BuiltinFn = fn(&[Value]) -> Value;

/// An open file handle backing a `Stream` value. Closing a stream sets
/// the outer `Option` to `None`, so subsequent reads/writes through
/// that value see a null handle and raise `Error`.
pub struct StreamHandle {
    pub path: String,
    pub file: std::fs::File,
}

impl fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StreamHandle({})", self.path)
    }
}

impl Value {
    /// The syntactic type name this value satisfies, for declaration
    /// and call-site type checks. `Closure`/`NamedFn` both present as
    /// `func` for type-checking purposes.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::Bool(_) => "bool",
            Value::String(_) => "string",
            Value::Nil => "nil",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Closure { .. } | Value::NamedFn { .. } | Value::Builtin(_) => "func",
            Value::Stream(_) => "stream",
            Value::ReturnSignal(_) => "return",
            Value::BreakSignal => "break",
            Value::Error(_) => "error",
        }
    }

    /// §3.3 Glossary "truthy": not `nil` and not `false`.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// The Glossary's "basic data kind": anything but control signals
    /// and `Error`. Used by `:=` to decide admissibility, and named
    /// functions are excluded too since they aren't values you can bind
    /// via implicit declaration (they live only in the global table).
    pub fn is_basic_data_kind(&self) -> bool {
        !matches!(
            self,
            Value::ReturnSignal(_) | Value::BreakSignal | Value::Error(_) | Value::NamedFn { .. }
        )
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Value::Int(i) => Some(HashKey::Int(*i)),
            Value::Double(d) => Some(HashKey::Double(*d)),
            Value::Bool(b) => Some(HashKey::Bool(*b)),
            Value::String(s) => Some(HashKey::Str(s.clone())),
            _ => None,
        }
    }

    /// Human-facing rendering used by `print` and string-index/inspect
    /// built-ins. Strings render without surrounding quotes (matching
    /// the source's `Inspect`), but see `builtins::console` for the
    /// doubly-quoted form `printf` strips before writing.
    pub fn inspect(&self) -> String {
        match self {
            Value::Int(i) => i.to_string(),
            Value::Double(d) => format!("{d}"),
            Value::Bool(b) => b.to_string(),
            Value::String(s) => s.clone(),
            Value::Nil => "nil".to_string(),
            Value::List(items) => {
                let rendered: Vec<String> =
                    items.borrow().iter().map(|v| v.inspect()).collect();
                format!("[{}]", rendered.join(", "))
            }
            Value::Map(entries) => {
                let rendered: Vec<String> = entries
                    .borrow()
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v.inspect()))
                    .collect();
                format!("{{{}}}", rendered.join(", "))
            }
            Value::Closure { .. } => "<closure>".to_string(),
            Value::NamedFn { name, .. } => format!("<fn {name}>"),
            Value::Stream(handle) => {
                if handle.borrow().is_some() {
                    "<stream>".to_string()
                } else {
                    "<stream:closed>".to_string()
                }
            }
            Value::Builtin(_) => "<builtin>".to_string(),
            Value::ReturnSignal(v) => v.inspect(),
            Value::BreakSignal => "<break>".to_string(),
            Value::Error(msg) => format!("Error: {msg}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inspect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_hash_key_truncates_like_the_source() {
        let a = Value::Double(3.9).hash_key().unwrap();
        let b = Value::Double(3.1).hash_key().unwrap();
        assert_eq!(a, b, "both truncate to 3");
    }

    #[test]
    fn string_hash_uses_fnv1a() {
        // Known FNV-1a 64 test vector for the empty string.
        assert_eq!(fnv1a_64(b""), 0xcbf29ce484222325);
        assert_eq!(fnv1a_64(b"a"), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn truthiness_matches_glossary() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Int(0).is_truthy());
    }

    #[test]
    fn list_alias_shares_mutation() {
        let list = Rc::new(RefCell::new(vec![Value::Int(1)]));
        let a = Value::List(list.clone());
        let b = a.clone();
        if let Value::List(items) = &b {
            items.borrow_mut().push(Value::Int(2));
        }
        if let Value::List(items) = &a {
            assert_eq!(items.borrow().len(), 2);
        }
    }
}
