// ABOUTME: SEVAL — the tree-walking evaluator and function/special-form application

use crate::builtins;
use crate::error::LispError;
use crate::interpreter::Interpreter;
use crate::printer;
use crate::reader::Reader;
use crate::value::Value;

/// A resolved callable: either a builtin dispatched by name, or a
/// user-defined function/special-form whose body lives at `pair_idx` as
/// `(formals . body)` in the list area.
pub enum Callable {
    Builtin { name: String },
    User { pair_idx: u32 },
}

pub struct Evaluator<'a> {
    pub interp: &'a mut Interpreter,
    pub reader: &'a mut Reader,
}

impl<'a> Evaluator<'a> {
    pub fn new(interp: &'a mut Interpreter, reader: &'a mut Reader) -> Self {
        Evaluator { interp, reader }
    }

    pub fn emit(&mut self, s: &str) {
        print!("{s}");
        use std::io::Write as _;
        let _ = std::io::stdout().flush();
        self.interp.log_str(s);
    }

    pub fn seval(&mut self, p: Value) -> Result<Value, LispError> {
        self.trace_enter(p);
        let result = self.seval_inner(p);
        self.trace_exit(&result);
        result
    }

    fn seval_inner(&mut self, p: Value) -> Result<Value, LispError> {
        match p {
            Value::Ordinary(idx) => self.eval_atom(idx),
            Value::Pair(idx) => self.eval_cons(idx),
            other => Ok(other),
        }
    }

    /// §4.4 "Non-cons input", ordinary-atom branch. Our builtins are
    /// installed with a self-referential payload (an atom's `BuiltinFn`
    /// value already carries that atom's own index), so unlike the original
    /// bit-packed representation — where a builtin's stored payload was a
    /// separate dispatch index and evaluating a bare reference had to
    /// rebuild a "named handle" — a direct value lookup already produces
    /// the correct printable, callable result. See DESIGN.md.
    fn eval_atom(&mut self, idx: u32) -> Result<Value, LispError> {
        let name = self.interp.atoms.name(idx).to_string();
        if let Some(rest) = name.strip_prefix('!') {
            self.interp.trace = rest == "TRACE" && name == "!TRACE";
            return Err(LispError::TraceToggle);
        }
        self.interp
            .atoms
            .value(idx)
            .ok_or(LispError::UnboundVariable(name))
    }

    fn eval_cons(&mut self, idx: u32) -> Result<Value, LispError> {
        self.interp.current_in.push(Value::Pair(idx));

        let head = self.interp.lists.car(idx);
        self.interp.trace_depth = self.interp.trace_depth.saturating_sub(1);
        let f0 = self.seval(head);
        self.interp.trace_depth += 1;
        let f0 = match f0 {
            Ok(v) => v,
            Err(e) => {
                self.interp.current_in.pop();
                return Err(e);
            }
        };

        if !f0.is_function_form() {
            self.interp.current_in.pop();
            let text = printer::swrite_string(self.interp, f0);
            return Err(LispError::NotAFunction(text));
        }

        let tail = self.interp.lists.cdr(idx);
        if let Some(top) = self.interp.current_in.last_mut() {
            *top = tail;
        }

        let callable = match self.classify(f0) {
            Ok(c) => c,
            Err(e) => {
                self.interp.current_in.pop();
                return Err(e);
            }
        };

        let result = if f0.is_special_form() {
            self.apply_special(&callable, tail)
        } else {
            self.interp.eal.push(Vec::new());
            let r = self.eval_args_then_apply(&callable, tail);
            self.interp.eal.pop();
            r
        };

        self.interp.current_in.pop();
        result
    }

    fn classify(&mut self, f: Value) -> Result<Callable, LispError> {
        match f {
            Value::BuiltinFn(idx) | Value::BuiltinSpecial(idx) => {
                Ok(Callable::Builtin { name: self.interp.atoms.name(idx).to_string() })
            }
            Value::Lambda(idx) | Value::SpecialLambda(idx) => Ok(Callable::User { pair_idx: idx }),
            Value::UserFn(idx) | Value::UserSpecial(idx) => match self.interp.atoms.value(idx) {
                Some(Value::Lambda(p)) | Some(Value::SpecialLambda(p)) => {
                    Ok(Callable::User { pair_idx: p })
                }
                _ => Err(LispError::NotAFunction(self.interp.atoms.name(idx).to_string())),
            },
            _ => {
                let text = printer::swrite_string(self.interp, f);
                Err(LispError::NotAFunction(text))
            }
        }
    }

    fn eval_args_then_apply(&mut self, callable: &Callable, tail: Value) -> Result<Value, LispError> {
        let mut cur = tail;
        while let Value::Pair(cidx) = cur {
            let arg_expr = self.interp.lists.car(cidx);
            let val = self.seval(arg_expr)?;
            if let Some(frame) = self.interp.eal.last_mut() {
                frame.push(val);
            }
            cur = self.interp.lists.cdr(cidx);
        }
        let args = self.interp.eal.last().cloned().unwrap_or_default();
        self.apply_function(callable, &args)
    }

    fn apply_function(&mut self, callable: &Callable, args: &[Value]) -> Result<Value, LispError> {
        match callable {
            Callable::Builtin { name } => builtins::dispatch_fn(self, name, args),
            Callable::User { pair_idx } => {
                let actual_list = self.list_from_slice(args)?;
                self.apply_user(*pair_idx, actual_list)
            }
        }
    }

    fn apply_special(&mut self, callable: &Callable, raw_tail: Value) -> Result<Value, LispError> {
        match callable {
            Callable::Builtin { name } => builtins::dispatch_special(self, name, raw_tail),
            Callable::User { pair_idx } => self.apply_user(*pair_idx, raw_tail),
        }
    }

    /// Shallow-bind formals to actuals, evaluate the single body expression,
    /// and — on the normal return path only — pop the bindings back off.
    /// An error skips the pop entirely: the top-level unwind restores every
    /// atom's bindstack to its bottom frame in one pass (§4.7), so there is
    /// no per-frame cleanup to perform on the error path.
    pub fn apply_user(&mut self, pair_idx: u32, actual_args: Value) -> Result<Value, LispError> {
        let formals = self.interp.lists.car(pair_idx);
        let body = self.interp.lists.cdr(pair_idx);
        let bound = self.bind_formals(formals, actual_args)?;
        let result = self.seval(body)?;
        for &aidx in bound.iter().rev() {
            self.interp.atoms.pop_bind(aidx);
        }
        Ok(result)
    }

    fn list_len(&self, mut v: Value) -> usize {
        let mut n = 0;
        while let Value::Pair(idx) = v {
            n += 1;
            v = self.interp.lists.cdr(idx);
        }
        n
    }

    pub fn list_from_slice(&mut self, items: &[Value]) -> Result<Value, LispError> {
        let mut result = self.interp.nil();
        for &v in items.iter().rev() {
            result = self.interp.cons(v, result)?;
        }
        Ok(result)
    }

    /// Binds formals to actuals per the three shapes in §4.4. Excess actuals
    /// relative to formals fail with *arity*; excess formals are tolerated
    /// (the arity quirk the bundled prelude relies on).
    fn bind_formals(&mut self, formals: Value, actuals: Value) -> Result<Vec<u32>, LispError> {
        let nil = self.interp.nil();

        if let Value::Ordinary(fidx) = formals {
            if formals != nil {
                self.interp.atoms.push_bind(fidx, actuals);
                return Ok(vec![fidx]);
            }
        }

        let nformals = self.list_len(formals);
        let nactuals = self.list_len(actuals);
        if nactuals > nformals {
            return Err(LispError::arity("function", nformals, nactuals));
        }

        let mut bound = Vec::new();
        let mut fa = formals;
        let mut ac = actuals;
        while let Value::Pair(fidx) = fa {
            let formal_atom = self.interp.lists.car(fidx);
            let aidx = match formal_atom {
                Value::Ordinary(i) => i,
                _ => return Err(LispError::bad_argument("LAMBDA", "formal parameter must be an atom")),
            };
            match ac {
                Value::Pair(cidx) => {
                    let actual_val = self.interp.lists.car(cidx);
                    self.interp.atoms.push_bind(aidx, actual_val);
                    bound.push(aidx);
                    ac = self.interp.lists.cdr(cidx);
                }
                _ => {
                    // Fewer actuals than formals: leave this formal's
                    // binding untouched rather than pushing one.
                }
            }
            fa = self.interp.lists.cdr(fidx);
        }
        Ok(bound)
    }

    fn trace_enter(&mut self, p: Value) {
        if self.interp.trace {
            let depth = self.interp.trace_depth;
            let text = printer::swrite_string(self.interp, p);
            self.emit(&format!("{depth} seval: {text}\n"));
        }
        self.interp.trace_depth += 1;
    }

    fn trace_exit(&mut self, result: &Result<Value, LispError>) {
        self.interp.trace_depth = self.interp.trace_depth.saturating_sub(1);
        if self.interp.trace {
            if let Ok(v) = result {
                let depth = self.interp.trace_depth;
                let text = printer::swrite_string(self.interp, *v);
                self.emit(&format!("{depth} result: {text}\n"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{CharSource, Reader, TerminalLineSource};

    fn blank_reader() -> Reader {
        let term = TerminalLineSource { read_line: |_: char| -> Option<String> { None } };
        Reader::new(CharSource::new(term))
    }

    fn eval_text(interp: &mut Interpreter, text: &str) -> Result<Value, LispError> {
        let mut lines = vec![text.to_string()];
        lines.reverse();
        let term = TerminalLineSource { read_line: move |_: char| lines.pop() };
        let mut reader = Reader::new(CharSource::new(term));
        let expr = reader.sread(interp)?;
        let mut ev = Evaluator::new(interp, &mut reader);
        ev.seval(expr)
    }

    fn fresh_interpreter() -> Interpreter {
        let mut interp = Interpreter::new(256, 256, 2048);
        builtins::install(&mut interp).unwrap();
        interp
    }

    #[test]
    fn plus_adds_two_numbers() {
        let mut interp = fresh_interpreter();
        let result = eval_text(&mut interp, "(PLUS 2 3)").unwrap();
        match result {
            Value::Number(idx) => assert_eq!(interp.numbers.get(idx), 5.0),
            _ => panic!("expected a number"),
        }
    }

    #[test]
    fn setq_then_cdr_of_quoted_list() {
        let mut interp = fresh_interpreter();
        eval_text(&mut interp, "(SETQ X (QUOTE (A B C)))").unwrap();
        let result = eval_text(&mut interp, "(CDR X)").unwrap();
        assert_eq!(printer::swrite_string(&interp, result), "(B C)");
    }

    #[test]
    fn recursive_factorial_via_shallow_binding() {
        let mut interp = fresh_interpreter();
        eval_text(
            &mut interp,
            "(SETQ F (LAMBDA (N) (COND ((EQ N 0) 1) (T (TIMES N (F (DIFFERENCE N 1)))))))",
        )
        .unwrap();
        let result = eval_text(&mut interp, "(F 5)").unwrap();
        match result {
            Value::Number(idx) => assert_eq!(interp.numbers.get(idx), 120.0),
            _ => panic!("expected a number"),
        }
    }

    #[test]
    fn shallow_binding_restores_after_call() {
        let mut interp = fresh_interpreter();
        eval_text(&mut interp, "(SETQ X 1)").unwrap();
        eval_text(&mut interp, "(SETQ F (LAMBDA (X) X))").unwrap();
        let inner = eval_text(&mut interp, "(F 2)").unwrap();
        let after = eval_text(&mut interp, "X").unwrap();
        match (inner, after) {
            (Value::Number(i), Value::Number(j)) => {
                assert_eq!(interp.numbers.get(i), 2.0);
                assert_eq!(interp.numbers.get(j), 1.0);
            }
            _ => panic!("expected numbers"),
        }
    }

    #[test]
    fn variadic_single_atom_formal_binds_whole_arglist() {
        let mut interp = fresh_interpreter();
        eval_text(&mut interp, "(SETQ F (LAMBDA L L))").unwrap();
        let result = eval_text(&mut interp, "(F 1 2 3)").unwrap();
        assert_eq!(printer::swrite_string(&interp, result), "(1 2 3)");
    }

    #[test]
    fn unbound_variable_fails() {
        let mut interp = fresh_interpreter();
        let err = eval_text(&mut interp, "ZZZ").unwrap_err();
        assert!(matches!(err, LispError::UnboundVariable(_)));
    }

    #[test]
    fn excess_actuals_fail_with_arity() {
        let mut interp = fresh_interpreter();
        eval_text(&mut interp, "(SETQ F (LAMBDA (X) X))").unwrap();
        let err = eval_text(&mut interp, "(F 1 2)").unwrap_err();
        assert!(matches!(err, LispError::Arity { .. }));
    }

    #[test]
    fn excess_formals_are_tolerated() {
        let mut interp = fresh_interpreter();
        eval_text(&mut interp, "(SETQ Y 9)").unwrap();
        eval_text(&mut interp, "(SETQ F (LAMBDA (X Y) X))").unwrap();
        let result = eval_text(&mut interp, "(F 1)").unwrap();
        match result {
            Value::Number(idx) => assert_eq!(interp.numbers.get(idx), 1.0),
            _ => panic!("expected a number"),
        }
    }
}
