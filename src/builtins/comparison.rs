// ABOUTME: Order, identity, and type-predicate builtins (LESSP/GREATERP/EQ/NUMBERP/NULL/ATOM)

use crate::error::LispError;
use crate::eval::Evaluator;
use crate::value::Value;

fn as_number(ev: &Evaluator, name: &str, v: Value) -> Result<f64, LispError> {
    match v {
        Value::Number(idx) => Ok(ev.interp.numbers.get(idx)),
        _ => Err(LispError::bad_argument(name, "expected a number")),
    }
}

pub fn lessp(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 2 {
        return Err(LispError::arity("LESSP", 2, args.len()));
    }
    let a = as_number(ev, "LESSP", args[0])?;
    let b = as_number(ev, "LESSP", args[1])?;
    Ok(ev.interp.bool_value(a < b))
}

pub fn greaterp(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 2 {
        return Err(LispError::arity("GREATERP", 2, args.len()));
    }
    let a = as_number(ev, "GREATERP", args[0])?;
    let b = as_number(ev, "GREATERP", args[1])?;
    Ok(ev.interp.bool_value(a > b))
}

/// Bit-identical tagged-pointer comparison: same variant and same index.
pub fn eq(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 2 {
        return Err(LispError::arity("EQ", 2, args.len()));
    }
    Ok(ev.interp.bool_value(args[0] == args[1]))
}

pub fn numberp(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 1 {
        return Err(LispError::arity("NUMBERP", 1, args.len()));
    }
    Ok(ev.interp.bool_value(args[0].is_number()))
}

pub fn null(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 1 {
        return Err(LispError::arity("NULL", 1, args.len()));
    }
    Ok(ev.interp.bool_value(args[0] == ev.interp.nil()))
}

pub fn atom(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 1 {
        return Err(LispError::arity("ATOM", 1, args.len()));
    }
    Ok(ev.interp.bool_value(args[0].is_ordinary() || args[0].is_number()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::Interpreter;
    use crate::reader::{CharSource, Reader, TerminalLineSource};

    fn harness() -> (Interpreter, Reader) {
        let interp = Interpreter::new(64, 64, 64);
        let term = TerminalLineSource { read_line: |_: char| -> Option<String> { None } };
        (interp, Reader::new(CharSource::new(term)))
    }

    #[test]
    fn lessp_orders_numbers() {
        let (mut interp, mut reader) = harness();
        let a = interp.numatom(1.0).unwrap();
        let b = interp.numatom(2.0).unwrap();
        let t = interp.t();
        let mut ev = Evaluator::new(&mut interp, &mut reader);
        assert_eq!(lessp(&mut ev, &[a, b]).unwrap(), t);
    }

    #[test]
    fn eq_compares_interned_numbers_as_identical() {
        let (mut interp, mut reader) = harness();
        let a = interp.numatom(3.0).unwrap();
        let b = interp.numatom(3.0).unwrap();
        let t = interp.t();
        let mut ev = Evaluator::new(&mut interp, &mut reader);
        assert_eq!(eq(&mut ev, &[a, b]).unwrap(), t);
    }

    #[test]
    fn null_checks_for_nil() {
        let (mut interp, mut reader) = harness();
        let nil = interp.nil();
        let t = interp.t();
        let mut ev = Evaluator::new(&mut interp, &mut reader);
        assert_eq!(null(&mut ev, &[nil]).unwrap(), t);
    }
}
