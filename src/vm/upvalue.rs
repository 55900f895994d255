use std::cell::RefCell;
use std::rc::Rc;

use crate::value::Value;
use crate::vm::register_file::RegisterFile;

/// An upvalue cell starts life open: it aliases a live register in the
/// register file of the activation that declared it, so writes made by
/// either the enclosing function or the closure stay in sync. `CLOSE`
/// (or the activation returning) severs that link by snapshotting the
/// current value, after which the cell is closed and private to every
/// closure sharing it.
enum UpvalueState {
    Open {
        registers: Rc<RefCell<RegisterFile>>,
        index: usize,
    },
    Closed(Value),
}

pub struct UpvalueCell(RefCell<UpvalueState>);

impl UpvalueCell {
    pub fn new_open(registers: Rc<RefCell<RegisterFile>>, index: usize) -> Rc<UpvalueCell> {
        Rc::new(UpvalueCell(RefCell::new(UpvalueState::Open {
            registers,
            index,
        })))
    }

    pub fn new_closed(value: Value) -> Rc<UpvalueCell> {
        Rc::new(UpvalueCell(RefCell::new(UpvalueState::Closed(value))))
    }

    pub fn get(&self) -> Value {
        match &*self.0.borrow() {
            UpvalueState::Open { registers, index } => registers.borrow().get(*index),
            UpvalueState::Closed(v) => v.clone(),
        }
    }

    pub fn set(&self, value: Value) {
        let target = match &*self.0.borrow() {
            UpvalueState::Open { registers, index } => Some((registers.clone(), *index)),
            UpvalueState::Closed(_) => None,
        };
        match target {
            Some((registers, index)) => registers.borrow_mut().set(index, value),
            None => *self.0.borrow_mut() = UpvalueState::Closed(value),
        }
    }

    /// True if this cell is still open and aliases `index` in
    /// `registers`, the test `CLOSE` uses to pick which upvalues a
    /// scope exit must sever.
    pub fn is_open_at(&self, registers: &Rc<RefCell<RegisterFile>>, index: usize) -> bool {
        match &*self.0.borrow() {
            UpvalueState::Open {
                registers: r,
                index: i,
            } => Rc::ptr_eq(r, registers) && *i >= index,
            UpvalueState::Closed(_) => false,
        }
    }

    pub fn close(&self) {
        let value = self.get();
        *self.0.borrow_mut() = UpvalueState::Closed(value);
    }
}
