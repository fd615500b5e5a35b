// ABOUTME: Property-list builtins (PUTPLIST/GETPLIST)

use crate::error::LispError;
use crate::eval::Evaluator;
use crate::value::Value;

fn ordinary_index(name: &str, v: Value) -> Result<u32, LispError> {
    match v {
        Value::Ordinary(idx) => Ok(idx),
        _ => Err(LispError::bad_argument(name, "expected an atom")),
    }
}

pub fn putplist(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 2 {
        return Err(LispError::arity("PUTPLIST", 2, args.len()));
    }
    let idx = ordinary_index("PUTPLIST", args[0])?;
    ev.interp.atoms.set_plist(idx, args[1]);
    Ok(args[0])
}

pub fn getplist(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 1 {
        return Err(LispError::arity("GETPLIST", 1, args.len()));
    }
    let idx = ordinary_index("GETPLIST", args[0])?;
    Ok(ev.interp.atoms.plist(idx))
}
