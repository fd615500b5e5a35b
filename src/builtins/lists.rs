// ABOUTME: Pair and list builtins (CAR/CDR/CONS/LIST/DO/RPLACA/RPLACD)

use crate::error::LispError;
use crate::eval::Evaluator;
use crate::value::Value;

fn as_pair(name: &str, v: Value) -> Result<u32, LispError> {
    match v {
        Value::Pair(idx) => Ok(idx),
        _ => Err(LispError::bad_argument(name, "expected a pair")),
    }
}

pub fn car(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 1 {
        return Err(LispError::arity("CAR", 1, args.len()));
    }
    let idx = as_pair("CAR", args[0])?;
    Ok(ev.interp.lists.car(idx))
}

pub fn cdr(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 1 {
        return Err(LispError::arity("CDR", 1, args.len()));
    }
    let idx = as_pair("CDR", args[0])?;
    Ok(ev.interp.lists.cdr(idx))
}

pub fn cons(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 2 {
        return Err(LispError::arity("CONS", 2, args.len()));
    }
    for &v in args {
        if !v.is_sexpr() {
            return Err(LispError::bad_argument("CONS", "expected an s-expression"));
        }
    }
    ev.interp.cons(args[0], args[1])
}

pub fn list(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    ev.list_from_slice(args)
}

pub fn do_(_ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    Ok(args.last().copied().unwrap_or(_ev.interp.nil()))
}

pub fn rplaca(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 2 {
        return Err(LispError::arity("RPLACA", 2, args.len()));
    }
    let idx = as_pair("RPLACA", args[0])?;
    ev.interp.lists.set_car(idx, args[1]);
    Ok(args[0])
}

pub fn rplacd(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 2 {
        return Err(LispError::arity("RPLACD", 2, args.len()));
    }
    let idx = as_pair("RPLACD", args[0])?;
    ev.interp.lists.set_cdr(idx, args[1]);
    Ok(args[0])
}
