// ABOUTME: Nested lexical scopes over a shared global function table

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

/// `(local, global_ref, outer_ref, scope_flag)` — see spec §3.4.
///
/// `global_ref` is the same `Rc<RefCell<HashMap<..>>>` across every
/// frame descended from one root, so a `global` declaration or a
/// top-level `fn` is visible everywhere without deep-cloning a map on
/// every scope push.
#[derive(Debug)]
pub struct Environment {
    local: RefCell<HashMap<String, Value>>,
    global_ref: Rc<RefCell<HashMap<String, Value>>>,
    outer_ref: Option<Rc<Environment>>,
    scope_flag: RefCell<bool>,
}

impl Environment {
    /// Root: fresh local and global maps, no outer, `scope_flag = true`.
    pub fn root() -> Rc<Environment> {
        Rc::new(Environment {
            local: RefCell::new(HashMap::new()),
            global_ref: Rc::new(RefCell::new(HashMap::new())),
            outer_ref: None,
            scope_flag: RefCell::new(true),
        })
    }

    /// Enclosed frame (blocks, `for` iterations, `if` branches): new
    /// empty local, inherited `global_ref`, `outer = parent`,
    /// `scope_flag = false`.
    pub fn enclosed(parent: &Rc<Environment>) -> Rc<Environment> {
        Rc::new(Environment {
            local: RefCell::new(HashMap::new()),
            global_ref: parent.global_ref.clone(),
            outer_ref: Some(parent.clone()),
            scope_flag: RefCell::new(false),
        })
    }

    /// Function-call frame: new empty local, inherited `global_ref`,
    /// **no** outer — a closure's lexical capture is supplied
    /// separately by wrapping this frame around the captured env
    /// instead (see `eval::call_closure`); a bare call frame (as used
    /// for `NamedFn`) therefore cannot see any caller locals.
    pub fn call_frame(global_source: &Rc<Environment>) -> Rc<Environment> {
        Rc::new(Environment {
            local: RefCell::new(HashMap::new()),
            global_ref: global_source.global_ref.clone(),
            outer_ref: None,
            scope_flag: RefCell::new(false),
        })
    }

    /// Like `call_frame`, but keeps `outer` so a `Closure`'s captured
    /// environment stays reachable for identifiers the call frame
    /// itself doesn't bind.
    pub fn closure_frame(captured: &Rc<Environment>) -> Rc<Environment> {
        Rc::new(Environment {
            local: RefCell::new(HashMap::new()),
            global_ref: captured.global_ref.clone(),
            outer_ref: Some(captured.clone()),
            scope_flag: RefCell::new(false),
        })
    }

    pub fn scope_flag(&self) -> bool {
        *self.scope_flag.borrow()
    }

    pub fn set_scope_flag(&self, value: bool) {
        *self.scope_flag.borrow_mut() = value;
    }

    /// Lookup order per spec §3.4: `global_ref` first, then `local`,
    /// then recurse into `outer`.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(v) = self.global_ref.borrow().get(name) {
            return Some(v.clone());
        }
        if let Some(v) = self.local.borrow().get(name) {
            return Some(v.clone());
        }
        self.outer_ref.as_ref().and_then(|outer| outer.get(name))
    }

    /// True if `name` is bound anywhere visible from this frame,
    /// local or global — used by declaration/name-collision checks.
    pub fn is_bound(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Walks the same chain as `get`, updating the first frame that
    /// already contains the name. No-op if `name` is unbound anywhere.
    pub fn set(&self, name: &str, value: Value) -> bool {
        if self.global_ref.borrow().contains_key(name) {
            self.global_ref.borrow_mut().insert(name.to_string(), value);
            return true;
        }
        if self.local.borrow().contains_key(name) {
            self.local.borrow_mut().insert(name.to_string(), value);
            return true;
        }
        if let Some(outer) = &self.outer_ref {
            return outer.set(name, value);
        }
        false
    }

    /// Binds `name` in this frame's local map.
    pub fn save(&self, name: &str, value: Value) {
        self.local.borrow_mut().insert(name.to_string(), value);
    }

    /// Binds `name` in the shared global map.
    pub fn save_global(&self, name: &str, value: Value) {
        self.global_ref
            .borrow_mut()
            .insert(name.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enclosed_frame_sees_outer_bindings() {
        let root = Environment::root();
        root.save("x", Value::Int(1));
        let child = Environment::enclosed(&root);
        assert!(matches!(child.get("x"), Some(Value::Int(1))));
    }

    #[test]
    fn call_frame_does_not_see_caller_locals() {
        let root = Environment::root();
        root.save("x", Value::Int(1));
        let frame = Environment::call_frame(&root);
        assert!(frame.get("x").is_none());
    }

    #[test]
    fn call_frame_shares_global_table() {
        let root = Environment::root();
        root.save_global("g", Value::Int(9));
        let frame = Environment::call_frame(&root);
        assert!(matches!(frame.get("g"), Some(Value::Int(9))));
    }

    #[test]
    fn scope_containment_drops_block_local_after_block() {
        let root = Environment::root();
        let block = Environment::enclosed(&root);
        block.save("y", Value::Int(5));
        drop(block);
        assert!(root.get("y").is_none());
    }

    #[test]
    fn set_updates_first_matching_frame_in_chain() {
        let root = Environment::root();
        root.save("x", Value::Int(1));
        let child = Environment::enclosed(&root);
        assert!(child.set("x", Value::Int(2)));
        assert!(matches!(root.get("x"), Some(Value::Int(2))));
    }

    #[test]
    fn scope_flag_true_only_at_root_and_fn_outer_block() {
        let root = Environment::root();
        assert!(root.scope_flag());
        let block = Environment::enclosed(&root);
        assert!(!block.scope_flag());
    }
}
