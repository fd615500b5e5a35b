// ABOUTME: EVAL and BODY

use crate::error::LispError;
use crate::eval::Evaluator;
use crate::value::Value;

pub fn eval(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 1 {
        return Err(LispError::arity("EVAL", 1, args.len()));
    }
    ev.seval(args[0])
}

/// Extract the `(formals . body)` pair underlying a function or special-form
/// value. Builtins have no such pair; this is a bad-argument case for them.
pub fn body(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 1 {
        return Err(LispError::arity("BODY", 1, args.len()));
    }
    match args[0] {
        Value::Lambda(idx) | Value::SpecialLambda(idx) => Ok(Value::Pair(idx)),
        Value::UserFn(idx) | Value::UserSpecial(idx) => match ev.interp.atoms.value(idx) {
            Some(Value::Lambda(p)) | Some(Value::SpecialLambda(p)) => Ok(Value::Pair(p)),
            _ => Err(LispError::bad_argument("BODY", "atom has no function body")),
        },
        _ => Err(LispError::bad_argument("BODY", "expected a function or special form")),
    }
}
