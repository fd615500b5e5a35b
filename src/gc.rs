// ABOUTME: Mark-sweep collector over the list area and number table

use crate::atom_table::AtomTable;
use crate::list_area::ListArea;
use crate::number_table::NumberTable;
use crate::value::Value;

/// Mark everything reachable from `root`, following cons edges. Uses an
/// explicit work stack rather than recursion so cyclic structure (built via
/// RPLACA/RPLACD) terminates on the mark bit instead of overflowing the
/// native stack.
fn mark_value(root: Value, lists: &mut ListArea, numbers: &mut NumberTable) {
    let mut work = vec![root];
    while let Some(v) = work.pop() {
        match v {
            Value::Pair(idx) | Value::Lambda(idx) | Value::SpecialLambda(idx) => {
                if lists.is_marked(idx) {
                    continue;
                }
                lists.mark(idx);
                work.push(lists.car(idx));
                work.push(lists.cdr(idx));
            }
            Value::Number(idx) => {
                numbers.mark(idx);
            }
            // Named callables and the bare ordinary-atom tag chain into the
            // atom table, not the list area; the atom-table walk below marks
            // their target directly.
            Value::Ordinary(_)
            | Value::BuiltinFn(_)
            | Value::BuiltinSpecial(_)
            | Value::UserFn(_)
            | Value::UserSpecial(_) => {}
        }
    }
}

/// Full mark-sweep pass. Marks every atom's value, bindstack, and plist, plus
/// the three runtime-owned GC root stacks, then sweeps both the list area and
/// the number table.
pub fn mark_and_sweep(
    atoms: &AtomTable,
    lists: &mut ListArea,
    numbers: &mut NumberTable,
    current_in: &[Value],
    eal: &[Vec<Value>],
    sreadlist: &[Value],
) {
    for idx in atoms.iter_indices() {
        if let Some(value) = atoms.value(idx) {
            mark_value(value, lists, numbers);
        }
        mark_value(atoms.plist(idx), lists, numbers);
        for &shadowed in atoms.bindstack(idx) {
            mark_value(shadowed, lists, numbers);
        }
    }
    for &v in current_in {
        mark_value(v, lists, numbers);
    }
    for frame in eal {
        for &v in frame {
            mark_value(v, lists, numbers);
        }
    }
    for &v in sreadlist {
        mark_value(v, lists, numbers);
    }

    lists.sweep();
    numbers.sweep();
}
