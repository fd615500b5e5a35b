// ABOUTME: AND/OR — fold over an already-evaluated argument vector (no re-evaluation, no short-circuit)

use crate::error::LispError;
use crate::eval::Evaluator;
use crate::value::Value;

pub fn and(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    let nil = ev.interp.nil();
    if args.iter().any(|&v| v == nil) {
        Ok(nil)
    } else {
        Ok(ev.interp.t())
    }
}

pub fn or(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    let nil = ev.interp.nil();
    if args.iter().any(|&v| v != nil) {
        Ok(ev.interp.t())
    } else {
        Ok(nil)
    }
}
