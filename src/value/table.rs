use std::cell::RefCell;
use std::rc::Rc;

use ahash::AHashMap;
use smol_str::SmolStr;

use crate::value::value::Value;

/// Metamethod names consulted by the arithmetic, comparison, concat and
/// length handlers.
pub const MM_ADD: &str = "__add";
pub const MM_SUB: &str = "__sub";
pub const MM_MUL: &str = "__mul";
pub const MM_DIV: &str = "__div";
pub const MM_MOD: &str = "__mod";
pub const MM_POW: &str = "__pow";
pub const MM_UNM: &str = "__unm";
pub const MM_CONCAT: &str = "__concat";
pub const MM_EQ: &str = "__eq";
pub const MM_LE: &str = "__le";

/// A hashable key for table members. Values are keyed by kind: numbers
/// by bit pattern (so NaN and -0.0 behave consistently, unlike raw
/// `f64` equality), strings by content, tables and callables by
/// reference identity — mirroring the teacher's table, which hashes its
/// collectable keys by GC-object id rather than by structural value.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum TableKey {
    Boolean(bool),
    Number(u64),
    Str(SmolStr),
    Identity(usize),
}

impl TableKey {
    pub fn from_value(v: &Value) -> Option<TableKey> {
        match v {
            Value::Nil => None,
            Value::Boolean(b) => Some(TableKey::Boolean(*b)),
            Value::Number(n) => Some(TableKey::Number(n.to_bits())),
            Value::Str(s) => Some(TableKey::Str(s.clone())),
            Value::Table(_) | Value::Callable(_) => v.identity().map(TableKey::Identity),
        }
    }

    /// The integer index this key represents for the purposes of the
    /// length operator and `SETLIST`, or `None` if it isn't one.
    fn as_array_index(&self) -> Option<i64> {
        match self {
            TableKey::Number(bits) => {
                let n = f64::from_bits(*bits);
                if n.fract() == 0.0 && n >= 1.0 && n <= i64::MAX as f64 {
                    Some(n as i64)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

/// The minimal table type the core needs to exercise metamethod
/// dispatch and indexing: a hashed member map (using `ahash`, as the
/// teacher's table does for its hash part) plus an optional metatable.
/// The full array/hash hybrid storage optimization the teacher's
/// `LuaTable` implements is out of this crate's scope — see SPEC_FULL.md
/// §1.
#[derive(Default)]
pub struct LuaTable {
    members: AHashMap<TableKey, Value>,
    metatable: Option<Rc<RefCell<LuaTable>>>,
}

impl LuaTable {
    pub fn new() -> Self {
        LuaTable {
            members: AHashMap::new(),
            metatable: None,
        }
    }

    pub fn get_member(&self, key: &Value) -> Value {
        match TableKey::from_value(key) {
            Some(k) => self.members.get(&k).cloned().unwrap_or(Value::Nil),
            None => Value::Nil,
        }
    }

    pub fn set_member(&mut self, key: Value, value: Value) {
        let Some(k) = TableKey::from_value(&key) else {
            return;
        };
        if value.is_nil() {
            self.members.remove(&k);
        } else {
            self.members.insert(k, value);
        }
    }

    pub fn metatable(&self) -> Option<Rc<RefCell<LuaTable>>> {
        self.metatable.clone()
    }

    pub fn set_metatable(&mut self, mt: Option<Rc<RefCell<LuaTable>>>) {
        self.metatable = mt;
    }

    pub fn metamethod(&self, name: &str) -> Option<Value> {
        let mt = self.metatable.as_ref()?;
        let v = mt.borrow().get_member(&Value::str(name));
        if v.is_nil() {
            None
        } else {
            Some(v)
        }
    }

    /// The length operator: the highest `k` such that `1..=k` are all
    /// present, counting from 1.
    pub fn length(&self) -> i64 {
        let mut n = 0i64;
        loop {
            let probe = n + 1;
            let present = self
                .members
                .get(&TableKey::Number((probe as f64).to_bits()))
                .is_some();
            if present {
                n = probe;
            } else {
                break;
            }
        }
        n
    }

    /// Used by `SETLIST`: insert `values` at consecutive integer keys
    /// starting at `start` (1-based).
    pub fn set_list(&mut self, start: i64, values: impl IntoIterator<Item = Value>) {
        for (offset, value) in values.into_iter().enumerate() {
            let index = start + offset as i64;
            self.set_member(Value::Number(index as f64), value);
        }
    }

    pub fn array_index(key: &Value) -> Option<i64> {
        TableKey::from_value(key).and_then(|k| k.as_array_index())
    }
}
