// ABOUTME: Binary and n-ary numeric builtins (PLUS/TIMES/DIFFERENCE/QUOTIENT/POWER/FLOOR/MINUS/SUM/PRODUCT)

use crate::error::LispError;
use crate::eval::Evaluator;
use crate::value::Value;

fn as_number(ev: &Evaluator, name: &str, v: Value) -> Result<f64, LispError> {
    match v {
        Value::Number(idx) => Ok(ev.interp.numbers.get(idx)),
        _ => Err(LispError::bad_argument(name, "expected a number")),
    }
}

fn binary(ev: &mut Evaluator, name: &str, args: &[Value], f: impl Fn(f64, f64) -> f64) -> Result<Value, LispError> {
    if args.len() != 2 {
        return Err(LispError::arity(name, 2, args.len()));
    }
    let a = as_number(ev, name, args[0])?;
    let b = as_number(ev, name, args[1])?;
    ev.interp.numatom(f(a, b))
}

pub fn plus(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    binary(ev, "PLUS", args, |a, b| a + b)
}

pub fn times(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    binary(ev, "TIMES", args, |a, b| a * b)
}

pub fn difference(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    binary(ev, "DIFFERENCE", args, |a, b| a - b)
}

pub fn quotient(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    // IEEE-754 division: a zero divisor produces inf/NaN rather than an error.
    binary(ev, "QUOTIENT", args, |a, b| a / b)
}

pub fn power(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    binary(ev, "POWER", args, |a, b| a.powf(b))
}

pub fn floor(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 1 {
        return Err(LispError::arity("FLOOR", 1, args.len()));
    }
    let a = as_number(ev, "FLOOR", args[0])?;
    ev.interp.numatom(a.floor())
}

pub fn minus(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 1 {
        return Err(LispError::arity("MINUS", 1, args.len()));
    }
    let a = as_number(ev, "MINUS", args[0])?;
    ev.interp.numatom(-a)
}

pub fn sum(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    let mut total = 0.0;
    for &v in args {
        total += as_number(ev, "SUM", v)?;
    }
    ev.interp.numatom(total)
}

pub fn product(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    let mut total = 1.0;
    for &v in args {
        total *= as_number(ev, "PRODUCT", v)?;
    }
    ev.interp.numatom(total)
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
    fn plus_adds() {
        let (mut interp, mut reader) = harness();
        let a = interp.numatom(2.0).unwrap();
        let b = interp.numatom(3.0).unwrap();
        let mut ev = Evaluator::new(&mut interp, &mut reader);
        let r = plus(&mut ev, &[a, b]).unwrap();
        match r {
            Value::Number(idx) => assert_eq!(ev.interp.numbers.get(idx), 5.0),
            _ => panic!("expected number"),
        }
    }

    #[test]
    fn quotient_by_zero_is_infinite() {
        let (mut interp, mut reader) = harness();
        let a = interp.numatom(1.0).unwrap();
        let z = interp.numatom(0.0).unwrap();
        let mut ev = Evaluator::new(&mut interp, &mut reader);
        let r = quotient(&mut ev, &[a, z]).unwrap();
        match r {
            Value::Number(idx) => assert!(ev.interp.numbers.get(idx).is_infinite()),
            _ => panic!("expected number"),
        }
    }

    #[test]
    fn wrong_arity_fails() {
        let (mut interp, mut reader) = harness();
        let a = interp.numatom(1.0).unwrap();
        let mut ev = Evaluator::new(&mut interp, &mut reader);
        let err = plus(&mut ev, &[a]).unwrap_err();
        assert!(matches!(err, LispError::Arity { .. }));
    }
}
