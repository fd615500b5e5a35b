// ABOUTME: Special forms (LAMBDA/SPECIAL/SETQ/QUOTE/COND/TSETQ/SET)

use crate::error::LispError;
use crate::eval::Evaluator;
use crate::value::Value;

/// Split a raw, unevaluated `(a b . rest)` tail into its first two elements.
fn first_two(ev: &Evaluator, tail: Value) -> Result<(Value, Value), LispError> {
    let idx = match tail {
        Value::Pair(idx) => idx,
        _ => return Err(LispError::bad_argument("special form", "expected two arguments")),
    };
    let first = ev.interp.lists.car(idx);
    let rest = ev.interp.lists.cdr(idx);
    let second_idx = match rest {
        Value::Pair(idx) => idx,
        _ => return Err(LispError::bad_argument("special form", "expected two arguments")),
    };
    Ok((first, ev.interp.lists.car(second_idx)))
}

/// §4.4 assignment-value typing: a named function/special-form handle stores
/// its underlying value; an unnamed one keeps its tag as-is.
fn assignable_value(ev: &Evaluator, v: Value) -> Value {
    match v {
        Value::BuiltinFn(idx) | Value::BuiltinSpecial(idx) | Value::UserFn(idx) | Value::UserSpecial(idx) => {
            ev.interp.atoms.value(idx).unwrap_or(v)
        }
        other => other,
    }
}

fn ordinary_index(name: &str, v: Value) -> Result<u32, LispError> {
    match v {
        Value::Ordinary(idx) => Ok(idx),
        _ => Err(LispError::bad_argument(name, "expected an atom")),
    }
}

pub fn lambda(ev: &mut Evaluator, tail: Value) -> Result<Value, LispError> {
    let (formals, body) = first_two(ev, tail)?;
    match ev.interp.cons(formals, body)? {
        Value::Pair(idx) => Ok(Value::Lambda(idx)),
        _ => unreachable!("cons always returns a Pair"),
    }
}

pub fn special(ev: &mut Evaluator, tail: Value) -> Result<Value, LispError> {
    let (formals, body) = first_two(ev, tail)?;
    match ev.interp.cons(formals, body)? {
        Value::Pair(idx) => Ok(Value::SpecialLambda(idx)),
        _ => unreachable!("cons always returns a Pair"),
    }
}

pub fn quote(ev: &mut Evaluator, tail: Value) -> Result<Value, LispError> {
    match tail {
        Value::Pair(idx) => Ok(ev.interp.lists.car(idx)),
        _ => Err(LispError::bad_argument("QUOTE", "expected one argument")),
    }
}

pub fn setq(ev: &mut Evaluator, tail: Value) -> Result<Value, LispError> {
    let (target, value_expr) = first_two(ev, tail)?;
    let idx = ordinary_index("SETQ", target)?;
    let value = ev.seval(value_expr)?;
    let stored = assignable_value(ev, value);
    ev.interp.atoms.set_value(idx, stored);
    ev.seval(Value::Ordinary(idx))
}

pub fn tsetq(ev: &mut Evaluator, tail: Value) -> Result<Value, LispError> {
    let (target, value_expr) = first_two(ev, tail)?;
    let idx = ordinary_index("TSETQ", target)?;
    let value = ev.seval(value_expr)?;
    let stored = assignable_value(ev, value);
    ev.interp.atoms.set_bottom(idx, stored);
    ev.seval(Value::Ordinary(idx))
}

pub fn set(ev: &mut Evaluator, tail: Value) -> Result<Value, LispError> {
    let (target_expr, value_expr) = first_two(ev, tail)?;
    let target = ev.seval(target_expr)?;
    let idx = ordinary_index("SET", target)?;
    let value = ev.seval(value_expr)?;
    let stored = assignable_value(ev, value);
    ev.interp.atoms.set_value(idx, stored);
    ev.seval(Value::Ordinary(idx))
}

pub fn cond(ev: &mut Evaluator, tail: Value) -> Result<Value, LispError> {
    let nil = ev.interp.nil();
    let mut cur = tail;
    while let Value::Pair(idx) = cur {
        let clause = ev.interp.lists.car(idx);
        let (test, expr) = first_two(ev, clause)?;
        let test_val = ev.seval(test)?;
        if test_val != nil {
            return ev.seval(expr);
        }
        cur = ev.interp.lists.cdr(idx);
    }
    Ok(nil)
}
