// ABOUTME: I/O builtins (READ/PRINT/PRINTCR/MKATOM)

use crate::error::LispError;
use crate::eval::Evaluator;
use crate::printer;
use crate::value::Value;

pub fn read(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    if !args.is_empty() {
        return Err(LispError::arity("READ", 0, args.len()));
    }
    ev.reader.sread_with_prompt(ev.interp, '!')
}

pub fn print(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    if args.is_empty() {
        ev.emit(" ");
    } else {
        for &v in args {
            let text = printer::swrite_string(ev.interp, v);
            ev.emit(&text);
            ev.emit(" ");
        }
    }
    Ok(args.last().copied().unwrap_or(ev.interp.nil()))
}

pub fn printcr(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    for &v in args {
        let text = printer::swrite_string(ev.interp, v);
        ev.emit(&text);
        ev.emit("\n");
    }
    Ok(args.last().copied().unwrap_or(ev.interp.nil()))
}

/// Intern the atom named by concatenating two atom names. The original reads
/// the atom table by whatever index a number argument happens to carry; here
/// both arguments are required to be ordinary atoms and anything else is a
/// reported bad-argument rather than undefined behaviour.
pub fn mkatom(ev: &mut Evaluator, args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 2 {
        return Err(LispError::arity("MKATOM", 2, args.len()));
    }
    let (a, b) = match (args[0], args[1]) {
        (Value::Ordinary(a), Value::Ordinary(b)) => (a, b),
        _ => return Err(LispError::bad_argument("MKATOM", "both arguments must be atoms")),
    };
    let combined = format!("{}{}", ev.interp.atoms.name(a), ev.interp.atoms.name(b));
    ev.interp.ordatom(&combined)
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
    fn mkatom_concatenates_names() {
        let (mut interp, mut reader) = harness();
        let a = interp.ordatom("FOO").unwrap();
        let b = interp.ordatom("BAR").unwrap();
        let mut ev = Evaluator::new(&mut interp, &mut reader);
        let result = mkatom(&mut ev, &[a, b]).unwrap();
        if let Value::Ordinary(idx) = result {
            assert_eq!(ev.interp.atoms.name(idx), "FOOBAR");
        } else {
            panic!("expected an atom");
        }
    }

    #[test]
    fn mkatom_rejects_non_atom_argument() {
        let (mut interp, mut reader) = harness();
        let a = interp.ordatom("FOO").unwrap();
        let n = interp.numatom(1.0).unwrap();
        let mut ev = Evaluator::new(&mut interp, &mut reader);
        let err = mkatom(&mut ev, &[a, n]).unwrap_err();
        assert!(matches!(err, LispError::BadArgument { .. }));
    }
}
