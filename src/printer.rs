// ABOUTME: SWRITE — the recursive printer, dispatching on tag

use std::fmt::Write as _;

use crate::interpreter::Interpreter;
use crate::value::Value;

/// Format a number the way C's default `%g` would: up to 6 significant
/// digits, trailing zeros trimmed, integral values printed without a
/// decimal point. Chosen over Rust's shortest-round-trip `f64::Display`
/// because that would silently change printed output for values such as
/// `1.0 / 3.0` (see the numeric-printing open question).
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NAN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "INF".to_string() } else { "-INF".to_string() };
    }
    if value == value.trunc() && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let formatted = format!("{value:.6}");
    let trimmed = if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        formatted
    };
    trimmed
}

/// Write one value to `out`. SWRITE does not guard against cycles built by
/// RPLACA/RPLACD — a cyclic list will loop forever here, matching the
/// original printer's behaviour.
pub fn swrite(interp: &Interpreter, value: Value, out: &mut String) {
    match value {
        Value::Number(idx) => {
            out.push_str(&format_number(interp.numbers.get(idx)));
        }
        Value::Ordinary(idx) => {
            out.push_str(interp.atoms.name(idx));
        }
        Value::Pair(idx) => {
            out.push('(');
            swrite(interp, interp.lists.car(idx), out);
            let mut rest = interp.lists.cdr(idx);
            loop {
                if rest == interp.nil() {
                    break;
                }
                match rest {
                    Value::Pair(next_idx) => {
                        out.push(' ');
                        swrite(interp, interp.lists.car(next_idx), out);
                        rest = interp.lists.cdr(next_idx);
                    }
                    other => {
                        out.push_str(" . ");
                        swrite(interp, other, out);
                        break;
                    }
                }
            }
            out.push(')');
        }
        Value::BuiltinFn(idx) => {
            let _ = write!(out, "{{builtin function: {}}}", interp.atoms.name(idx));
        }
        Value::BuiltinSpecial(idx) => {
            let _ = write!(out, "{{builtin special form: {}}}", interp.atoms.name(idx));
        }
        Value::UserFn(idx) => {
            let _ = write!(out, "{{function: {}}}", interp.atoms.name(idx));
        }
        Value::UserSpecial(idx) => {
            let _ = write!(out, "{{special form: {}}}", interp.atoms.name(idx));
        }
        Value::Lambda(_) => out.push_str("{unnamed function}"),
        Value::SpecialLambda(_) => out.push_str("{unnamed special form}"),
    }
}

pub fn swrite_string(interp: &Interpreter, value: Value) -> String {
    let mut out = String::new();
    swrite(interp, value, &mut out);
    out
}
