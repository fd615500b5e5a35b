// ABOUTME: Installs and dispatches the 39-entry builtin table

use crate::error::LispError;
use crate::eval::Evaluator;
use crate::interpreter::Interpreter;
use crate::value::Value;

pub mod arithmetic;
pub mod comparison;
pub mod io;
pub mod lists;
pub mod logic;
pub mod misc;
pub mod plist;
pub mod special_forms;

const FUNCTIONS: &[&str] = &[
    "CAR", "CDR", "CONS", "ATOM", "NUMBERP", "LIST", "DO", "PLUS", "TIMES", "DIFFERENCE",
    "QUOTIENT", "POWER", "FLOOR", "MINUS", "LESSP", "GREATERP", "EVAL", "EQ", "AND", "OR", "SUM",
    "PRODUCT", "PUTPLIST", "GETPLIST", "READ", "PRINT", "PRINTCR", "MKATOM", "BODY", "RPLACA",
    "RPLACD", "NULL",
];

const SPECIAL_FORMS: &[&str] = &["LAMBDA", "SPECIAL", "SETQ", "QUOTE", "COND", "TSETQ", "SET"];

/// Install all 39 builtins as self-referential `BuiltinFn`/`BuiltinSpecial`
/// atoms: an atom's stored value carries its own atom-table index, so
/// evaluating a bare reference to e.g. `CAR` needs no separate "named handle"
/// construction step (see `eval::Evaluator::eval_atom`).
pub fn install(interp: &mut Interpreter) -> Result<(), LispError> {
    for &name in FUNCTIONS {
        let atom = interp.ordatom(name)?;
        if let Value::Ordinary(idx) = atom {
            interp.atoms.set_value(idx, Value::BuiltinFn(idx));
        }
    }
    for &name in SPECIAL_FORMS {
        let atom = interp.ordatom(name)?;
        if let Value::Ordinary(idx) = atom {
            interp.atoms.set_value(idx, Value::BuiltinSpecial(idx));
        }
    }
    Ok(())
}

pub fn dispatch_fn(ev: &mut Evaluator, name: &str, args: &[Value]) -> Result<Value, LispError> {
    match name {
        "CAR" => lists::car(ev, args),
        "CDR" => lists::cdr(ev, args),
        "CONS" => lists::cons(ev, args),
        "ATOM" => comparison::atom(ev, args),
        "NUMBERP" => comparison::numberp(ev, args),
        "LIST" => lists::list(ev, args),
        "DO" => lists::do_(ev, args),
        "PLUS" => arithmetic::plus(ev, args),
        "TIMES" => arithmetic::times(ev, args),
        "DIFFERENCE" => arithmetic::difference(ev, args),
        "QUOTIENT" => arithmetic::quotient(ev, args),
        "POWER" => arithmetic::power(ev, args),
        "FLOOR" => arithmetic::floor(ev, args),
        "MINUS" => arithmetic::minus(ev, args),
        "LESSP" => comparison::lessp(ev, args),
        "GREATERP" => comparison::greaterp(ev, args),
        "EVAL" => misc::eval(ev, args),
        "EQ" => comparison::eq(ev, args),
        "AND" => logic::and(ev, args),
        "OR" => logic::or(ev, args),
        "SUM" => arithmetic::sum(ev, args),
        "PRODUCT" => arithmetic::product(ev, args),
        "PUTPLIST" => plist::putplist(ev, args),
        "GETPLIST" => plist::getplist(ev, args),
        "READ" => io::read(ev, args),
        "PRINT" => io::print(ev, args),
        "PRINTCR" => io::printcr(ev, args),
        "MKATOM" => io::mkatom(ev, args),
        "BODY" => misc::body(ev, args),
        "RPLACA" => lists::rplaca(ev, args),
        "RPLACD" => lists::rplacd(ev, args),
        "NULL" => comparison::null(ev, args),
        _ => unreachable!("{name} is not an installed builtin function"),
    }
}

pub fn dispatch_special(ev: &mut Evaluator, name: &str, tail: Value) -> Result<Value, LispError> {
    match name {
        "LAMBDA" => special_forms::lambda(ev, tail),
        "SPECIAL" => special_forms::special(ev, tail),
        "SETQ" => special_forms::setq(ev, tail),
        "QUOTE" => special_forms::quote(ev, tail),
        "COND" => special_forms::cond(ev, tail),
        "TSETQ" => special_forms::tsetq(ev, tail),
        "SET" => special_forms::set(ev, tail),
        _ => unreachable!("{name} is not an installed builtin special form"),
    }
}
