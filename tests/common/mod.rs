// ABOUTME: Shared test harness for feeding scripted input through a fresh interpreter

use govol_lisp::builtins;
use govol_lisp::config;
use govol_lisp::eval::Evaluator;
use govol_lisp::interpreter::Interpreter;
use govol_lisp::printer;
use govol_lisp::reader::{CharSource, Reader, TerminalLineSource};

/// A scripted session: every input line is queued up front, as if typed at
/// the prompt, and every evaluation result (printed form, or `::<message>`
/// on error) is collected in order.
pub struct Session {
    pub interp: Interpreter,
    pub reader: Reader,
}

impl Session {
    /// Fresh interpreter with all 39 builtins installed, no prelude.
    pub fn new(lines: &[&str]) -> Self {
        Self::with_capacities(256, 256, 4096, lines)
    }

    pub fn with_capacities(atoms: usize, numbers: usize, cells: usize, lines: &[&str]) -> Self {
        let mut interp = Interpreter::new(atoms, numbers, cells);
        builtins::install(&mut interp).expect("installing builtins must succeed");
        Self::from_interp(interp, lines)
    }

    /// Same as `new`, but with the bundled prelude loaded first. The prelude
    /// is drained against its own throwaway reader before the scripted lines'
    /// reader is built, so none of the prelude's own results leak into
    /// `run_all`'s output (mirrors `main.rs`'s batch-mode prelude load).
    pub fn with_prelude(lines: &[&str]) -> Self {
        let mut interp = Interpreter::new(256, 256, 4096);
        builtins::install(&mut interp).expect("installing builtins must succeed");
        load_prelude_quietly(&mut interp);
        Self::from_interp(interp, lines)
    }

    fn from_interp(interp: Interpreter, lines: &[&str]) -> Self {
        let mut queued: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        queued.reverse();
        let term = TerminalLineSource { read_line: move |_prompt: char| queued.pop() };
        let reader = Reader::new(CharSource::new(term));
        Session { interp, reader }
    }

    /// Evaluate every remaining queued input line, collecting the printed
    /// result of each (or `::<message>` for an error), matching the REPL's
    /// own transcript format.
    pub fn run_all(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        loop {
            match self.reader.sread_opt(&mut self.interp) {
                Ok(None) => break,
                Ok(Some(expr)) => {
                    let mut ev = Evaluator::new(&mut self.interp, &mut self.reader);
                    match ev.seval(expr) {
                        Ok(value) => out.push(printer::swrite_string(&self.interp, value)),
                        Err(e) if e.is_silent() => self.interp.unwind_to_repl(),
                        Err(e) => {
                            out.push(format!("::{}", e.message()));
                            self.interp.unwind_to_repl();
                        }
                    }
                }
                Err(e) => {
                    out.push(format!("::{}", e.message()));
                    self.interp.unwind_to_repl();
                    break;
                }
            }
        }
        out
    }
}

/// Evaluates the bundled prelude against a reader whose base stream is
/// always-empty, so the prelude's own EOF collapses the reader straight to
/// `Ok(None)` instead of falling through to any real input.
fn load_prelude_quietly(interp: &mut Interpreter) {
    let inert = TerminalLineSource { read_line: |_: char| -> Option<String> { None } };
    let mut reader = Reader::new(CharSource::new(inert));
    reader.source.include_str(config::PRELUDE_SOURCE);
    loop {
        match reader.sread_opt(interp) {
            Ok(None) => return,
            Ok(Some(expr)) => {
                let mut ev = Evaluator::new(interp, &mut reader);
                if ev.seval(expr).is_err() {
                    interp.unwind_to_repl();
                }
            }
            Err(_) => {
                interp.unwind_to_repl();
                return;
            }
        }
    }
}
