// ABOUTME: Owns the three storage tables, the GC root stacks, and evaluator trace state

use std::fs::File;
use std::io::Write;

use crate::atom_table::AtomTable;
use crate::error::LispError;
use crate::gc;
use crate::list_area::ListArea;
use crate::number_table::NumberTable;
use crate::value::Value;

pub struct Interpreter {
    pub atoms: AtomTable,
    pub numbers: NumberTable,
    pub lists: ListArea,

    /// GC root: stack of (function . unevaluated-or-evaluated arguments)
    /// frames currently mid-dispatch in `seval`.
    pub current_in: Vec<Value>,
    /// GC root: stack of argument lists being assembled during evaluation.
    pub eal: Vec<Vec<Value>>,
    /// GC root: stack of partially-constructed reader results.
    pub sreadlist: Vec<Value>,

    pub trace: bool,
    pub trace_depth: u32,

    pub log: Option<File>,
}

impl Interpreter {
    pub fn new(atom_capacity: usize, number_capacity: usize, list_capacity: usize) -> Self {
        Interpreter {
            atoms: AtomTable::new(atom_capacity),
            numbers: NumberTable::new(number_capacity),
            lists: ListArea::new(list_capacity),
            current_in: Vec::new(),
            eal: Vec::new(),
            sreadlist: Vec::new(),
            trace: false,
            trace_depth: 0,
            log: None,
        }
    }

    pub fn nil(&self) -> Value {
        self.atoms.nil
    }

    pub fn t(&self) -> Value {
        self.atoms.t
    }

    pub fn bool_value(&self, b: bool) -> Value {
        if b {
            self.t()
        } else {
            self.nil()
        }
    }

    pub fn is_nil(&self, v: Value) -> bool {
        v == self.nil()
    }

    /// Allocate a cons cell, invoking the collector once on exhaustion.
    pub fn cons(&mut self, car: Value, cdr: Value) -> Result<Value, LispError> {
        if self.lists.is_exhausted() {
            self.gc();
        }
        self.lists.alloc(car, cdr)
    }

    /// Intern a float, invoking the collector once on exhaustion.
    pub fn numatom(&mut self, value: f64) -> Result<Value, LispError> {
        let current_in = &self.current_in;
        let eal = &self.eal;
        let sreadlist = &self.sreadlist;
        let atoms = &self.atoms;
        let lists = &mut self.lists;
        self.numbers.numatom(value, |numbers| {
            gc::mark_and_sweep(atoms, lists, numbers, current_in, eal, sreadlist);
        })
    }

    pub fn ordatom(&mut self, name: &str) -> Result<Value, LispError> {
        self.atoms.ordatom(name)
    }

    /// Run a full mark-sweep pass over the list area and number table.
    pub fn gc(&mut self) {
        gc::mark_and_sweep(
            &self.atoms,
            &mut self.lists,
            &mut self.numbers,
            &self.current_in,
            &self.eal,
            &self.sreadlist,
        );
    }

    pub fn log_str(&mut self, s: &str) {
        if let Some(log) = self.log.as_mut() {
            let _ = log.write_all(s.as_bytes());
            let _ = log.flush();
        }
    }

    /// §4.7 error-unwind step 1–2: clear the root stacks and collapse every
    /// atom's bindstack to its bottom frame.
    pub fn unwind_to_repl(&mut self) {
        self.current_in.clear();
        self.eal.clear();
        self.sreadlist.clear();
        self.atoms.restore_all_bindings();
        self.trace_depth = 0;
    }
}
