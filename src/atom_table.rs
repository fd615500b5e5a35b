// ABOUTME: Fixed-capacity atom interning with shallow-binding (per-atom bindstack)

use std::collections::HashMap;

use crate::error::LispError;
use crate::value::Value;

pub struct AtomRecord {
    pub name: String,
    /// `None` means "undefined" — the atom has never been given a value.
    pub value: Option<Value>,
    /// Shadowed prior values, pushed on function entry and popped on exit
    /// (or on error unwind, down to the bottom frame).
    pub bindstack: Vec<Value>,
    pub plist: Value,
}

pub struct AtomTable {
    records: Vec<AtomRecord>,
    index: HashMap<String, u32>,
    capacity: usize,
    pub nil: Value,
    pub t: Value,
}

impl AtomTable {
    pub fn new(capacity: usize) -> Self {
        let mut table = AtomTable {
            records: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            capacity,
            nil: Value::Ordinary(0),
            t: Value::Ordinary(0),
        };
        let nil = table.ordatom("NIL").expect("atom table capacity must exceed 2");
        let t = table.ordatom("T").expect("atom table capacity must exceed 2");
        if let Value::Ordinary(idx) = nil {
            table.records[idx as usize].value = Some(nil);
        }
        if let Value::Ordinary(idx) = t {
            table.records[idx as usize].value = Some(t);
        }
        table.nil = nil;
        table.t = t;
        table
    }

    /// Intern an atom by printed name (uppercased). Creates a new
    /// "undefined"-valued record on first reference.
    pub fn ordatom(&mut self, name: &str) -> Result<Value, LispError> {
        let name = name.to_uppercase();
        if let Some(&idx) = self.index.get(&name) {
            return Ok(Value::Ordinary(idx));
        }
        if self.records.len() >= self.capacity {
            return Err(LispError::Capacity("atom"));
        }
        let idx = self.records.len() as u32;
        self.records.push(AtomRecord {
            name: name.clone(),
            value: None,
            bindstack: Vec::new(),
            plist: self.nil_or_self_during_init(),
        });
        self.index.insert(name, idx);
        Ok(Value::Ordinary(idx))
    }

    /// During construction, `self.nil` is a placeholder until NIL itself is
    /// interned; every other atom's initial plist is genuinely NIL.
    fn nil_or_self_during_init(&self) -> Value {
        self.nil
    }

    pub fn name(&self, idx: u32) -> &str {
        &self.records[idx as usize].name
    }

    pub fn value(&self, idx: u32) -> Option<Value> {
        self.records[idx as usize].value
    }

    pub fn set_value(&mut self, idx: u32, value: Value) {
        self.records[idx as usize].value = Some(value);
    }

    pub fn plist(&self, idx: u32) -> Value {
        self.records[idx as usize].plist
    }

    pub fn set_plist(&mut self, idx: u32, value: Value) {
        self.records[idx as usize].plist = value;
    }

    /// Push the atom's current value (or "undefined" sentinel) onto its
    /// bindstack and install `new_value` as the current value.
    pub fn push_bind(&mut self, idx: u32, new_value: Value) {
        let record = &mut self.records[idx as usize];
        record.bindstack.push(record.value.unwrap_or(self.nil));
        record.value = Some(new_value);
    }

    /// Pop one shadow frame, restoring the prior value. No-op if the
    /// bindstack is already empty (defensive; callers only pop what they pushed).
    pub fn pop_bind(&mut self, idx: u32) {
        if let Some(prior) = self.records[idx as usize].bindstack.pop() {
            self.records[idx as usize].value = Some(prior);
        }
    }

    pub fn bindstack_depth(&self, idx: u32) -> usize {
        self.records[idx as usize].bindstack.len()
    }

    pub fn bindstack(&self, idx: u32) -> &[Value] {
        &self.records[idx as usize].bindstack
    }

    /// TSETQ: overwrite the bottom of the bindstack (the top-level value)
    /// leaving nested shadow frames untouched; if there is no bindstack,
    /// behaves exactly like a direct assignment.
    pub fn set_bottom(&mut self, idx: u32, new_value: Value) {
        let record = &mut self.records[idx as usize];
        if record.bindstack.is_empty() {
            record.value = Some(new_value);
        } else {
            record.bindstack[0] = new_value;
        }
    }

    /// Error-unwind restoration: for every atom with a non-empty bindstack,
    /// collapse it to the bottom frame's value and clear the stack.
    pub fn restore_all_bindings(&mut self) {
        for record in self.records.iter_mut() {
            if let Some(&bottom) = record.bindstack.first() {
                record.value = Some(bottom);
                record.bindstack.clear();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter_indices(&self) -> impl Iterator<Item = u32> {
        0..self.records.len() as u32
    }
}
