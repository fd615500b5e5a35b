// ABOUTME: Fixed-capacity interned-float storage with a free list and a linear-probed hash index

use crate::error::LispError;
use crate::value::Value;

enum Slot {
    Occupied(f64),
    Free(Option<u32>),
}

pub struct NumberTable {
    slots: Vec<Slot>,
    marks: Vec<bool>,
    /// Open-addressed index: `index[h]` is the slot index whose value hashes
    /// to bucket `h`, probed linearly on collision.
    index: Vec<Option<u32>>,
    free_head: Option<u32>,
    capacity: usize,
}

impl NumberTable {
    pub fn new(capacity: usize) -> Self {
        let mut table = NumberTable {
            slots: Vec::with_capacity(capacity),
            marks: Vec::with_capacity(capacity),
            index: vec![None; capacity],
            free_head: None,
            capacity,
        };
        for i in (0..capacity as u32).rev() {
            table.slots.push(Slot::Free(if i + 1 < capacity as u32 {
                Some(i + 1)
            } else {
                None
            }));
            table.marks.push(false);
        }
        table.slots.reverse();
        table.marks.reverse();
        table.free_head = if capacity > 0 { Some(0) } else { None };
        table
    }

    fn bucket(&self, bits: u64) -> usize {
        (bits as usize) % self.capacity.max(1)
    }

    /// Intern `value`, growing the table via an injected GC callback if the
    /// free list is exhausted on a miss.
    pub fn numatom(&mut self, value: f64, mut run_gc: impl FnMut(&mut Self)) -> Result<Value, LispError> {
        if let Some(existing) = self.probe_find(value) {
            return Ok(Value::Number(existing));
        }
        if self.free_head.is_none() {
            run_gc(self);
        }
        if self.free_head.is_none() {
            return Err(LispError::Capacity("number"));
        }
        self.insert_new(value)
    }

    fn probe_find(&self, value: f64) -> Option<u32> {
        if self.capacity == 0 {
            return None;
        }
        let bits = value.to_bits();
        let start = self.bucket(bits);
        for step in 0..self.capacity {
            let slot = (start + step) % self.capacity;
            match self.index[slot] {
                None => return None,
                Some(cell) => {
                    if let Slot::Occupied(v) = self.slots[cell as usize] {
                        if v.to_bits() == bits {
                            return Some(cell);
                        }
                    }
                }
            }
        }
        None
    }

    fn insert_new(&mut self, value: f64) -> Result<Value, LispError> {
        let idx = self.free_head.expect("checked by caller");
        self.free_head = match self.slots[idx as usize] {
            Slot::Free(next) => next,
            Slot::Occupied(_) => unreachable!("free list always points at free slots"),
        };
        self.slots[idx as usize] = Slot::Occupied(value);
        self.place_in_index(idx, value);
        Ok(Value::Number(idx))
    }

    fn place_in_index(&mut self, cell: u32, value: f64) {
        let bits = value.to_bits();
        let start = self.bucket(bits);
        for step in 0..self.capacity {
            let slot = (start + step) % self.capacity;
            if self.index[slot].is_none() {
                self.index[slot] = Some(cell);
                return;
            }
        }
    }

    pub fn get(&self, idx: u32) -> f64 {
        match self.slots[idx as usize] {
            Slot::Occupied(v) => v,
            Slot::Free(_) => panic!("read of a free number-table cell"),
        }
    }

    pub fn mark(&mut self, idx: u32) {
        self.marks[idx as usize] = true;
    }

    /// Sweep: unmarked cells rejoin the free list; marked cells are
    /// reinserted into a freshly cleared hash index.
    pub fn sweep(&mut self) {
        for slot in self.index.iter_mut() {
            *slot = None;
        }
        self.free_head = None;
        for idx in (0..self.slots.len() as u32).rev() {
            if self.marks[idx as usize] {
                self.marks[idx as usize] = false;
                if let Slot::Occupied(v) = self.slots[idx as usize] {
                    self.place_in_index(idx, v);
                }
            } else {
                let next = self.free_head;
                self.slots[idx as usize] = Slot::Free(next);
                self.free_head = Some(idx);
            }
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.free_head.is_none()
    }
}
