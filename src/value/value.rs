use std::fmt;
use std::rc::Rc;

use smol_str::SmolStr;

use crate::value::table::LuaTable;
use crate::vm::callable::Callable;

use std::cell::RefCell;

/// A polymorphic runtime value: nil, boolean, number, string, table or
/// callable. There is no separate integer subtype — numbers are always
/// `f64`, matching the distilled value model this crate implements.
#[derive(Clone)]
pub enum Value {
    Nil,
    Boolean(bool),
    Number(f64),
    Str(SmolStr),
    Table(Rc<RefCell<LuaTable>>),
    Callable(Rc<dyn Callable>),
}

impl Value {
    pub fn str(s: impl Into<SmolStr>) -> Self {
        Value::Str(s.into())
    }

    pub fn table(t: LuaTable) -> Self {
        Value::Table(Rc::new(RefCell::new(t)))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_table(&self) -> Option<&Rc<RefCell<LuaTable>>> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Rc<dyn Callable>> {
        match self {
            Value::Callable(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// A coarse identity used by EQ and table-key hashing for the
    /// reference-typed variants (table, callable): same as Lua's notion
    /// of "same object".
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::Table(t) => Some(Rc::as_ptr(t) as usize),
            Value::Callable(c) => Some(Rc::as_ptr(c) as *const () as usize),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Table(_) => "table",
            Value::Callable(_) => "function",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Table(t) => write!(f, "table: {:p}", Rc::as_ptr(t)),
            Value::Callable(c) => write!(f, "function: {:p}", Rc::as_ptr(c)),
        }
    }
}

/// `truthy(v)`: false iff v is nil or boolean false. Zero and the empty
/// string are truthy — a language quirk preserved intentionally (see
/// SPEC_FULL.md §9 on TEST).
pub fn truthy(v: &Value) -> bool {
    !matches!(v, Value::Nil | Value::Boolean(false))
}

/// Matches the floating point literal grammar numeric strings must
/// satisfy: `^[-+]?[0-9]*\.?([0-9]+([eE][-+]?[0-9]+)?)?$`.
///
/// The grammar's every component is optional, so the empty string and
/// bare signs/dots match it literally; that degenerate case is rejected
/// separately below (see DESIGN.md) since `toNumber` can't produce a
/// number from them anyway.
fn matches_numeric_grammar(s: &str) -> bool {
    let rest = s.strip_prefix(['-', '+']).unwrap_or(s);
    let digit_run = rest.bytes().take_while(u8::is_ascii_digit).count();
    // [0-9]* is greedy but backtracks: try every prefix length from the
    // leading digit run, longest first, until the remainder matches the
    // rest of the pattern.
    (0..=digit_run).rev().any(|k| matches_dot_and_mantissa(&rest[k..]))
}

fn matches_dot_and_mantissa(s: &str) -> bool {
    let s = s.strip_prefix('.').unwrap_or(s);
    s.is_empty() || matches_mantissa_group(s)
}

fn matches_mantissa_group(s: &str) -> bool {
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return false;
    }
    let rest = &s[digits..];
    rest.is_empty() || matches_exponent(rest)
}

fn matches_exponent(s: &str) -> bool {
    let Some(rest) = s.strip_prefix(['e', 'E']) else {
        return false;
    };
    let rest = rest.strip_prefix(['-', '+']).unwrap_or(rest);
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    digits > 0 && digits == rest.len()
}

/// `isNumeric(v)`: true iff v is a number, or a string whose textual
/// form matches the floating-point pattern.
pub fn is_numeric(v: &Value) -> bool {
    match v {
        Value::Number(_) => true,
        Value::Str(s) => is_numeric_str(s.as_str()),
        _ => false,
    }
}

fn is_numeric_str(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii_digit()) && matches_numeric_grammar(s)
}

/// `toNumber(v)`: parses v under the same pattern. Returns `None` when
/// `v` does not satisfy `is_numeric` — callers must check first.
pub fn to_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => Some(*n),
        Value::Str(s) => {
            if is_numeric_str(s.as_str()) {
                s.as_str().parse::<f64>().ok()
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Render a value the way CONCAT needs it: numbers use a compact,
/// round-trippable form (via `itoa` for the common integral case) and
/// strings pass through unchanged.
pub fn to_display_string(v: &Value) -> Option<SmolStr> {
    match v {
        Value::Str(s) => Some(s.clone()),
        Value::Number(n) => Some(number_to_smolstr(*n)),
        _ => None,
    }
}

pub fn number_to_smolstr(n: f64) -> SmolStr {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        let mut buf = itoa::Buffer::new();
        SmolStr::new(buf.format(n as i64))
    } else {
        SmolStr::new(format!("{n}"))
    }
}
