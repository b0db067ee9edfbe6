//! The `help` built-in and its flat documentation registry.
//!
//! Each category module exposes `help_entries() -> Vec<(name, doc)>`;
//! `mod.rs` gathers them all into one table here rather than carrying
//! a `HelpEntry` struct per entry the way the source's larger surface
//! does — this language has a few dozen built-ins, not a few hundred.

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;

fn all_entries() -> Vec<(&'static str, &'static str)> {
    let mut entries = Vec::new();
    entries.extend(super::core::help_entries());
    entries.extend(super::collection::help_entries());
    entries.extend(super::math::help_entries());
    entries.extend(super::filesystem::help_entries());
    entries.extend(super::console::help_entries());
    entries
}

fn help(args: &[Value]) -> Value {
    let entries = all_entries();
    match args {
        [] => {
            for (name, doc) in &entries {
                println!("{name:<8} {doc}");
            }
            Value::Nil
        }
        [Value::String(name)] => match entries.iter().find(|(n, _)| n == name) {
            Some((_, doc)) => {
                println!("{doc}");
                Value::Nil
            }
            None => EvalError::Custom(format!("help: no such built-in '{name}'")).into(),
        },
        [other] => EvalError::type_error("help", "string", other).into(),
        _ => EvalError::arity_error("help", 1, args.len()).into(),
    }
}

pub fn register(env: &Rc<Environment>) {
    env.save_global("help", Value::Builtin(help));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_reports_unknown_name() {
        assert!(help(&[Value::String("nope".into())]).is_error());
    }

    #[test]
    fn help_finds_a_registered_builtin() {
        assert!(!help(&[Value::String("len".into())]).is_error());
    }
}
