// ABOUTME: Tree-walking evaluator threading control-flow signals as ordinary Values

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::{BlockKind, Expr, Param, Program, Stmt, TypeName};
use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;

/// Evaluates a whole program in `env`. The result is the last
/// top-level statement's value, with any `ReturnSignal` unwrapped; an
/// `Error` surfaces immediately.
pub fn eval_program(program: &Program, env: &Rc<Environment>) -> Value {
    let mut result = Value::Nil;
    for stmt in program {
        result = eval_stmt(stmt, env);
        if result.is_error() {
            return result;
        }
    }
    match result {
        Value::ReturnSignal(inner) => *inner,
        other => other,
    }
}

pub fn eval_stmt(stmt: &Stmt, env: &Rc<Environment>) -> Value {
    match stmt {
        Stmt::Var {
            name,
            declared_type,
            init,
            ..
        } => eval_decl(name, *declared_type, init.as_ref(), env, false),
        Stmt::Global {
            name,
            declared_type,
            init,
            ..
        } => eval_decl(name, *declared_type, init.as_ref(), env, true),
        Stmt::Return { value, .. } => {
            let v = match value {
                Some(expr) => eval_expr(expr, env),
                None => Value::Nil,
            };
            if v.is_error() {
                v
            } else {
                Value::ReturnSignal(Box::new(v))
            }
        }
        Stmt::Break { .. } => Value::BreakSignal,
        Stmt::Block { stmts, kind, .. } => {
            let child = Environment::enclosed(env);
            eval_stmts_seq(stmts, *kind, &child)
        }
        Stmt::For {
            decl,
            cond,
            step,
            body,
            ..
        } => eval_for(decl.as_deref(), cond.as_ref(), step.as_ref(), body, env),
        Stmt::Function {
            name,
            params,
            return_type,
            body,
            ..
        } => eval_function_decl(name, params, *return_type, body, env),
        Stmt::Expr { expr, .. } => eval_expr(expr, env),
    }
}

/// Shared `var`/`global` declaration semantics (§4.3): the declared
/// type is re-checked at evaluation time (not just trusted from
/// parsing) because a non-literal initialiser's kind is only known
/// now, and calls can widen `int` to `double`.
fn eval_decl(
    name: &str,
    declared_type: TypeName,
    init: Option<&Expr>,
    env: &Rc<Environment>,
    is_global: bool,
) -> Value {
    if env.is_bound(name) {
        return EvalError::NameCollision(name.to_string()).into();
    }
    let Some(init_expr) = init else {
        return EvalError::Custom(format!("'{name}' requires an initialiser")).into();
    };
    let value = eval_expr(init_expr, env);
    if value.is_error() {
        return value;
    }
    match widen_to(value.clone(), declared_type) {
        Some(widened) => {
            if is_global {
                env.save_global(name, widened);
            } else {
                env.save(name, widened);
            }
            Value::Nil
        }
        None => EvalError::type_error(
            &format!("declaration of '{name}'"),
            declared_type.as_str(),
            &value,
        )
        .into(),
    }
}

/// `fn NAME(...) ... { ... }`: admissible only when `scope_flag` is
/// set on `env` — true at the top level and a function body's
/// outermost block, false inside `if`/`for` bodies (scenario 10).
fn eval_function_decl(
    name: &str,
    params: &[Param],
    return_type: Option<TypeName>,
    body: &Stmt,
    env: &Rc<Environment>,
) -> Value {
    if !env.scope_flag() {
        return EvalError::Custom(format!(
            "function '{name}' declared in a scope that forbids nested function declarations"
        ))
        .into();
    }
    if env.is_bound(name) {
        return EvalError::NameCollision(name.to_string()).into();
    }
    let fn_value = Value::NamedFn {
        name: name.to_string(),
        params: params.to_vec(),
        return_type,
        body: Rc::new(body.clone()),
        home_env: env.clone(),
    };
    env.save_global(name, fn_value);
    Value::Nil
}

/// Runs a block's statements directly in `env` — `env` is already the
/// frame this block executes in; callers are responsible for deciding
/// whether that frame is a fresh `enclosed` child or, for a function
/// call, the call frame itself (so the body is its "outermost block").
fn eval_block_body(block: &Stmt, env: &Rc<Environment>) -> Value {
    match block {
        Stmt::Block { stmts, kind, .. } => eval_stmts_seq(stmts, *kind, env),
        other => eval_stmt(other, env),
    }
}

fn eval_stmts_seq(stmts: &[Stmt], kind: BlockKind, env: &Rc<Environment>) -> Value {
    let mut result = Value::Nil;
    for stmt in stmts {
        result = eval_stmt(stmt, env);
        match &result {
            Value::Error(_) => return result,
            Value::ReturnSignal(_) => return result,
            Value::BreakSignal if kind == BlockKind::For => return result,
            _ => {}
        }
    }
    result
}

fn eval_for(
    decl: Option<&Stmt>,
    cond: Option<&Expr>,
    step: Option<&Expr>,
    body: &Stmt,
    env: &Rc<Environment>,
) -> Value {
    let loop_frame = Environment::enclosed(env);

    if decl.is_none() && step.is_none() {
        if let Some(Expr::ImplicitDecl { left_ident, right, .. }) = cond {
            return eval_range_for(left_ident, right, body, &loop_frame);
        }
    }

    if let Some(decl_stmt) = decl {
        let d = eval_stmt(decl_stmt, &loop_frame);
        if d.is_error() {
            return d;
        }
    }

    loop {
        if let Some(cond_expr) = cond {
            let c = eval_expr(cond_expr, &loop_frame);
            if c.is_error() {
                return c;
            }
            if !c.is_truthy() {
                break;
            }
        }

        let child = Environment::enclosed(&loop_frame);
        let result = eval_block_body(body, &child);
        match result {
            Value::Error(_) | Value::ReturnSignal(_) => return result,
            Value::BreakSignal => break,
            _ => {}
        }

        if let Some(step_expr) = step {
            let s = eval_expr(step_expr, &loop_frame);
            if s.is_error() {
                return s;
            }
        }
    }

    Value::Nil
}

fn eval_range_for(name: &str, list_expr: &Expr, body: &Stmt, loop_frame: &Rc<Environment>) -> Value {
    let list_value = eval_expr(list_expr, loop_frame);
    if list_value.is_error() {
        return list_value;
    }
    let Value::List(items) = list_value else {
        return EvalError::type_error("for-range source", "list", &list_value).into();
    };

    let elements: Vec<Value> = items.borrow().clone();
    for element in elements {
        let child = Environment::enclosed(loop_frame);
        child.save(name, element);
        let result = eval_block_body(body, &child);
        match result {
            Value::Error(_) | Value::ReturnSignal(_) => return result,
            Value::BreakSignal => break,
            _ => {}
        }
    }
    Value::Nil
}

fn eval_if(cond: &Expr, then_branch: &Stmt, else_branch: Option<&Stmt>, env: &Rc<Environment>) -> Value {
    let c = eval_expr(cond, env);
    if c.is_error() {
        return c;
    }
    if c.is_truthy() {
        let child = Environment::enclosed(env);
        eval_block_body(then_branch, &child)
    } else if let Some(alt) = else_branch {
        let child = Environment::enclosed(env);
        eval_block_body(alt, &child)
    } else {
        Value::Nil
    }
}

pub fn eval_expr(expr: &Expr, env: &Rc<Environment>) -> Value {
    match expr {
        Expr::Identifier { name, .. } => env
            .get(name)
            .unwrap_or_else(|| EvalError::UndefinedSymbol(name.clone()).into_value()),
        Expr::Nil { .. } => Value::Nil,
        Expr::Integer { value, .. } => Value::Int(*value),
        Expr::Double { value, .. } => Value::Double(*value),
        Expr::Boolean { value, .. } => Value::Bool(*value),
        Expr::Str { value, .. } => Value::String(value.clone()),
        Expr::List { elements, .. } => {
            let mut out = Vec::with_capacity(elements.len());
            for e in elements {
                let v = eval_expr(e, env);
                if v.is_error() {
                    return v;
                }
                out.push(v);
            }
            Value::List(Rc::new(RefCell::new(out)))
        }
        Expr::Hash { pairs, .. } => {
            let mut map = HashMap::with_capacity(pairs.len());
            for (k, v) in pairs {
                let kv = eval_expr(k, env);
                if kv.is_error() {
                    return kv;
                }
                let Some(key) = kv.hash_key() else {
                    return EvalError::type_error("hash key", "hashable value", &kv).into();
                };
                let vv = eval_expr(v, env);
                if vv.is_error() {
                    return vv;
                }
                map.insert(key, vv);
            }
            Value::Map(Rc::new(RefCell::new(map)))
        }
        Expr::Prefix { op, right, .. } => eval_prefix(op, right, env),
        Expr::Infix { op, left, right, .. } => eval_infix(op, left, right, env),
        Expr::Postfix { op, left_ident, .. } => eval_postfix(op, left_ident, env),
        Expr::ImplicitDecl { left_ident, right, .. } => eval_implicit_decl(left_ident, right, env),
        Expr::Assign { left, right, .. } => eval_assign(left, right, env),
        Expr::AssignOp {
            left_ident,
            op,
            right,
            ..
        } => eval_assign_op(left_ident, op, right, env),
        Expr::Index { left, index, .. } => eval_index_read(left, index, env),
        Expr::Call { callee, args, .. } => eval_call(callee, args, env),
        Expr::FunctionClosure {
            params,
            return_type,
            body,
            ..
        } => Value::Closure {
            params: params.clone(),
            return_type: *return_type,
            body: Rc::new((**body).clone()),
            captured_env: env.clone(),
        },
        Expr::If {
            cond,
            then_branch,
            else_branch,
            ..
        } => eval_if(cond, then_branch, else_branch.as_deref(), env),
    }
}

fn eval_prefix(op: &str, right: &Expr, env: &Rc<Environment>) -> Value {
    let r = eval_expr(right, env);
    if r.is_error() {
        return r;
    }
    match op {
        "not" => Value::Bool(!r.is_truthy()),
        "-" => match r {
            Value::Int(i) => Value::Int(-i),
            Value::Double(d) => Value::Double(-d),
            other => EvalError::type_error("prefix '-'", "int or double", &other).into(),
        },
        _ => EvalError::Custom(format!("unknown prefix operator '{op}'")).into(),
    }
}

fn eval_infix(op: &str, left: &Expr, right: &Expr, env: &Rc<Environment>) -> Value {
    let l = eval_expr(left, env);
    if l.is_error() {
        return l;
    }
    // `and`/`or` short-circuit: the right operand is not evaluated
    // once the result is already determined by the left.
    if op == "and" && !l.is_truthy() {
        return Value::Bool(false);
    }
    if op == "or" && l.is_truthy() {
        return Value::Bool(true);
    }
    let r = eval_expr(right, env);
    if r.is_error() {
        return r;
    }
    eval_infix_values(op, l, r)
}

fn eval_infix_values(op: &str, l: Value, r: Value) -> Value {
    match (&l, &r) {
        (Value::Int(a), Value::Int(b)) => eval_int_infix(op, *a, *b),
        (Value::Double(a), Value::Double(b)) => eval_double_infix(op, *a, *b),
        (Value::Int(a), Value::Double(b)) => eval_double_infix(op, *a as f64, *b),
        (Value::Double(a), Value::Int(b)) => eval_double_infix(op, *a, *b as f64),
        (Value::String(a), Value::String(b)) => eval_string_infix(op, a, b),
        (Value::Bool(a), Value::Bool(b)) => eval_bool_infix(op, *a, *b),
        (Value::Nil, Value::Nil) => match op {
            "==" => Value::Bool(true),
            "!=" => Value::Bool(false),
            _ => EvalError::Custom(format!("operator '{op}' is not defined for nil")).into(),
        },
        (Value::Nil, _) | (_, Value::Nil) => match op {
            "==" => Value::Bool(false),
            "!=" => Value::Bool(true),
            _ => EvalError::Custom(format!("operator '{op}' is not defined for nil")).into(),
        },
        _ => EvalError::TypeMismatch {
            context: format!("infix '{op}'"),
            expected: l.type_name().to_string(),
            actual: r.type_name().to_string(),
        }
        .into(),
    }
}

fn eval_int_infix(op: &str, a: i64, b: i64) -> Value {
    match op {
        "+" => Value::Int(a + b),
        "-" => Value::Int(a - b),
        "*" => Value::Int(a * b),
        "/" => {
            if b == 0 {
                EvalError::DivisionByZero.into()
            } else {
                Value::Int(a / b)
            }
        }
        "%" => {
            if b == 0 {
                EvalError::DivisionByZero.into()
            } else {
                Value::Int(a % b)
            }
        }
        "<" => Value::Bool(a < b),
        "<=" => Value::Bool(a <= b),
        ">" => Value::Bool(a > b),
        ">=" => Value::Bool(a >= b),
        "==" => Value::Bool(a == b),
        "!=" => Value::Bool(a != b),
        _ => EvalError::Custom(format!("operator '{op}' is not defined for int")).into(),
    }
}

fn eval_double_infix(op: &str, a: f64, b: f64) -> Value {
    match op {
        "+" => Value::Double(a + b),
        "-" => Value::Double(a - b),
        "*" => Value::Double(a * b),
        "/" => {
            if b == 0.0 {
                EvalError::DivisionByZero.into()
            } else {
                Value::Double(a / b)
            }
        }
        "<" => Value::Bool(a < b),
        "<=" => Value::Bool(a <= b),
        ">" => Value::Bool(a > b),
        ">=" => Value::Bool(a >= b),
        "==" => Value::Bool(a == b),
        "!=" => Value::Bool(a != b),
        _ => EvalError::Custom(format!("operator '{op}' is not defined for double")).into(),
    }
}

fn eval_string_infix(op: &str, a: &str, b: &str) -> Value {
    match op {
        "+" => Value::String(format!("{a}{b}")),
        "<" => Value::Bool(a < b),
        "<=" => Value::Bool(a <= b),
        ">" => Value::Bool(a > b),
        ">=" => Value::Bool(a >= b),
        "==" => Value::Bool(a == b),
        "!=" => Value::Bool(a != b),
        _ => EvalError::Custom(format!("operator '{op}' is not defined for string")).into(),
    }
}

fn eval_bool_infix(op: &str, a: bool, b: bool) -> Value {
    match op {
        "==" => Value::Bool(a == b),
        "!=" => Value::Bool(a != b),
        "and" => Value::Bool(a && b),
        "or" => Value::Bool(a || b),
        _ => EvalError::Custom(format!("operator '{op}' is not defined for bool")).into(),
    }
}

/// `x++`/`x--`: requires `x` bound to `int`; rewritten as `x = x ± 1`.
fn eval_postfix(op: &str, name: &str, env: &Rc<Environment>) -> Value {
    let Some(current) = env.get(name) else {
        return EvalError::UndefinedSymbol(name.to_string()).into();
    };
    let Value::Int(i) = current else {
        return EvalError::type_error("postfix operator", "int", &current).into();
    };
    let updated = match op {
        "++" => Value::Int(i + 1),
        "--" => Value::Int(i - 1),
        _ => return EvalError::Custom(format!("unknown postfix operator '{op}'")).into(),
    };
    env.set(name, updated.clone());
    updated
}

/// `x := expr`: `x` must be unbound and not collide with a built-in,
/// and `expr` must evaluate to a "basic data kind" (§Glossary).
fn eval_implicit_decl(name: &str, right: &Expr, env: &Rc<Environment>) -> Value {
    if env.is_bound(name) {
        return EvalError::NameCollision(name.to_string()).into();
    }
    let value = eval_expr(right, env);
    if value.is_error() {
        return value;
    }
    if !value.is_basic_data_kind() {
        return EvalError::TypeMismatch {
            context: format!("implicit declaration of '{name}'"),
            expected: "basic data kind".to_string(),
            actual: value.type_name().to_string(),
        }
        .into();
    }
    env.save(name, value.clone());
    value
}

fn eval_assign(left: &Expr, right: &Expr, env: &Rc<Environment>) -> Value {
    match left {
        Expr::Identifier { name, .. } => {
            let Some(old) = env.get(name) else {
                return EvalError::UndefinedSymbol(name.clone()).into();
            };
            let new_value = eval_expr(right, env);
            if new_value.is_error() {
                return new_value;
            }
            let declared = old.type_name();
            match widen_value_to_kind(new_value.clone(), declared) {
                Some(widened) => {
                    env.set(name, widened.clone());
                    widened
                }
                None => EvalError::TypeMismatch {
                    context: format!("assignment to '{name}'"),
                    expected: declared.to_string(),
                    actual: new_value.type_name().to_string(),
                }
                .into(),
            }
        }
        Expr::Index { left: base, index, .. } => eval_index_assign(base, index, right, env),
        _ => EvalError::Custom("assignment target must be an identifier or index expression".into())
            .into(),
    }
}

fn eval_index_assign(base: &Expr, index: &Expr, right: &Expr, env: &Rc<Environment>) -> Value {
    let base_value = eval_expr(base, env);
    if base_value.is_error() {
        return base_value;
    }
    let index_value = eval_expr(index, env);
    if index_value.is_error() {
        return index_value;
    }
    let rhs = eval_expr(right, env);
    if rhs.is_error() {
        return rhs;
    }
    match &base_value {
        Value::List(items) => {
            let Value::Int(i) = index_value else {
                return EvalError::type_error("list index", "int", &index_value).into();
            };
            let mut items = items.borrow_mut();
            if i < 0 || i as usize >= items.len() {
                return EvalError::IndexOutOfRange {
                    index: i,
                    len: items.len(),
                }
                .into();
            }
            items[i as usize] = rhs.clone();
            rhs
        }
        Value::Map(entries) => {
            let Some(key) = index_value.hash_key() else {
                return EvalError::type_error("map key", "hashable value", &index_value).into();
            };
            entries.borrow_mut().insert(key, rhs.clone());
            rhs
        }
        other => EvalError::type_error("index assignment", "list or map", other).into(),
    }
}

fn eval_assign_op(name: &str, op: &str, right: &Expr, env: &Rc<Environment>) -> Value {
    let Some(old) = env.get(name) else {
        return EvalError::UndefinedSymbol(name.to_string()).into();
    };
    let rhs = eval_expr(right, env);
    if rhs.is_error() {
        return rhs;
    }
    let base_op = &op[..op.len() - 1];
    let combined = eval_infix_values(base_op, old.clone(), rhs);
    if combined.is_error() {
        return combined;
    }
    let declared = old.type_name();
    match widen_value_to_kind(combined.clone(), declared) {
        Some(widened) => {
            env.set(name, widened.clone());
            widened
        }
        None => EvalError::TypeMismatch {
            context: format!("compound assignment to '{name}'"),
            expected: declared.to_string(),
            actual: combined.type_name().to_string(),
        }
        .into(),
    }
}

fn eval_index_read(left: &Expr, index: &Expr, env: &Rc<Environment>) -> Value {
    let base = eval_expr(left, env);
    if base.is_error() {
        return base;
    }
    let idx = eval_expr(index, env);
    if idx.is_error() {
        return idx;
    }
    match &base {
        Value::List(items) => {
            let Value::Int(i) = idx else {
                return EvalError::type_error("list index", "int", &idx).into();
            };
            let items = items.borrow();
            if i < 0 || i as usize >= items.len() {
                EvalError::IndexOutOfRange {
                    index: i,
                    len: items.len(),
                }
                .into()
            } else {
                items[i as usize].clone()
            }
        }
        Value::Map(entries) => {
            let Some(key) = idx.hash_key() else {
                return EvalError::type_error("map key", "hashable value", &idx).into();
            };
            match entries.borrow().get(&key) {
                Some(v) => v.clone(),
                None => EvalError::KeyNotFound(key.to_string()).into(),
            }
        }
        Value::String(s) => {
            let Value::Int(i) = idx else {
                return EvalError::type_error("string index", "int", &idx).into();
            };
            let chars: Vec<char> = s.chars().collect();
            if i < 0 || i as usize >= chars.len() {
                EvalError::IndexOutOfRange {
                    index: i,
                    len: chars.len(),
                }
                .into()
            } else {
                Value::String(chars[i as usize].to_string())
            }
        }
        other => EvalError::type_error("index", "list, map, or string", other).into(),
    }
}

fn eval_call(callee: &Expr, args: &[Expr], env: &Rc<Environment>) -> Value {
    let callee_value = eval_expr(callee, env);
    if callee_value.is_error() {
        return callee_value;
    }

    let mut arg_values = Vec::with_capacity(args.len());
    for arg in args {
        let v = eval_expr(arg, env);
        if v.is_error() {
            return v;
        }
        arg_values.push(v);
    }

    match callee_value {
        Value::Builtin(f) => f(&arg_values),
        Value::Closure {
            params,
            return_type,
            body,
            captured_env,
        } => call_user_fn(
            &params,
            return_type,
            &body,
            &arg_values,
            Environment::closure_frame(&captured_env),
            "<closure>",
        ),
        Value::NamedFn {
            name,
            params,
            return_type,
            body,
            home_env,
        } => call_user_fn(
            &params,
            return_type,
            &body,
            &arg_values,
            Environment::call_frame(&home_env),
            &name,
        ),
        _ => EvalError::NotCallable.into(),
    }
}

/// Shared call semantics for `Closure` and `NamedFn` (§4.3): arity and
/// per-argument type check with `int -> double` widening, then the
/// body runs directly in `frame` — which is the call's outermost
/// block, so `scope_flag` is forced true for its duration.
fn call_user_fn(
    params: &[Param],
    return_type: Option<TypeName>,
    body: &Rc<Stmt>,
    args: &[Value],
    frame: Rc<Environment>,
    label: &str,
) -> Value {
    if params.len() != args.len() {
        return EvalError::arity_error(label, params.len(), args.len()).into();
    }
    for (param, arg) in params.iter().zip(args.iter()) {
        match widen_to(arg.clone(), param.declared_type) {
            Some(v) => frame.save(&param.name, v),
            None => {
                return EvalError::type_error(
                    &format!("{label} argument '{}'", param.name),
                    param.declared_type.as_str(),
                    arg,
                )
                .into()
            }
        }
    }

    frame.set_scope_flag(true);
    let result = eval_block_body(body, &frame);

    match result {
        Value::Error(_) => result,
        Value::ReturnSignal(inner) => {
            let inner = *inner;
            match return_type {
                None => EvalError::Custom(format!(
                    "{label}: function declared without a return type returned a value"
                ))
                .into(),
                Some(rt) => match widen_to(inner.clone(), rt) {
                    Some(v) => v,
                    None => {
                        EvalError::type_error(&format!("{label} return value"), rt.as_str(), &inner)
                            .into()
                    }
                },
            }
        }
        _ => Value::Nil,
    }
}

/// If `value`'s kind already matches `declared`, returns it unchanged;
/// the sole permitted widening is `int -> double`. Used for
/// declarations, call arguments, and return values alike (§4.3).
fn widen_to(value: Value, declared: TypeName) -> Option<Value> {
    if let (Value::Int(i), TypeName::Double) = (&value, declared) {
        return Some(Value::Double(*i as f64));
    }
    if value.type_name() == declared.as_str() {
        return Some(value);
    }
    None
}

/// Like `widen_to`, but against an already-resolved runtime type name
/// (used by assignment, where the "declared type" is whatever the
/// existing binding's value kind is, not a syntactic annotation).
fn widen_value_to_kind(value: Value, kind: &str) -> Option<Value> {
    if kind == "double" {
        if let Value::Int(i) = &value {
            return Some(Value::Double(*i as f64));
        }
    }
    if value.type_name() == kind {
        return Some(value);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::parse;

    fn run(src: &str) -> Value {
        let (program, errors) = parse(Lexer::new(src));
        assert!(errors.is_empty(), "parse errors: {errors:?}");
        let env = Environment::root();
        eval_program(&program, &env)
    }

    #[test]
    fn scenario_1_plain_var_reference() {
        assert!(matches!(run("var x:int = 15; x;"), Value::Int(15)));
    }

    #[test]
    fn scenario_2_string_index() {
        match run(r#"var s:string = "ab"; s[0];"#) {
            Value::String(s) => assert_eq!(s, "a"),
            other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn scenario_3_list_index_assignment() {
        match run("var a:list = [1,2,3]; a[1] = 99; a;") {
            Value::List(items) => {
                let items = items.borrow();
                assert_eq!(items.len(), 3);
                assert!(matches!(items[1], Value::Int(99)));
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn scenario_4_named_function_call_and_arity_type_mismatch() {
        assert!(matches!(
            run("fn add(x:int, y:int) int { return x+y; } add(2,3);"),
            Value::Int(5)
        ));
        assert!(run("fn add(x:int, y:int) int { return x+y; } add(2, 3.0);").is_error());
    }

    #[test]
    fn scenario_5_return_widens_int_to_double() {
        match run("fn f(x:int) double { return x; } f(2);") {
            Value::Double(d) => assert_eq!(d, 2.0),
            other => panic!("expected double, got {other:?}"),
        }
    }

    #[test]
    fn scenario_6_for_loop_variable_shadows_outer() {
        assert!(matches!(
            run("var i:int = 0; for (i := 0; i < 3; i++) { } i;"),
            Value::Int(0)
        ));
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
        assert!(run("if true { fn g() {} }").is_error());
    }

    #[test]
    fn named_function_cannot_see_caller_locals() {
        let src = "var secret:int = 1; fn f() int { return secret; } f();";
        assert!(run(src).is_error());
    }

    #[test]
    fn closure_captures_defining_scope() {
        let src = "var base:int = 10; var f:func = fn(x:int) int { return x + base; }; f(5);";
        assert!(matches!(run(src), Value::Int(15)));
    }

    #[test]
    fn alias_semantics_share_mutation() {
        fn builtin_push(args: &[Value]) -> Value {
            if let [Value::List(items), v] = args {
                items.borrow_mut().push(v.clone());
                Value::Nil
            } else {
                EvalError::Custom("push: bad arguments".into()).into()
            }
        }
        fn builtin_len(args: &[Value]) -> Value {
            match args {
                [Value::List(items)] => Value::Int(items.borrow().len() as i64),
                _ => EvalError::Custom("len: bad arguments".into()).into(),
            }
        }
        let src = "var a:list = [1]; var b:list = a; push(b, 2); len(a);";
        let (program, errors) = parse(Lexer::new(src));
        assert!(errors.is_empty());
        let env = Environment::root();
        env.save_global("push", Value::Builtin(builtin_push));
        env.save_global("len", Value::Builtin(builtin_len));
        assert!(matches!(eval_program(&program, &env), Value::Int(2)));
    }

    #[test]
    fn short_circuit_and_skips_right_operand() {
        let src = "false and (1/0 == 0);";
        assert!(matches!(run(src), Value::Bool(false)));
    }
}
