use crate::value::table::MM_LE;
use crate::value::{truthy, Value};
use crate::vm::activation::Activation;
use crate::vm::context::ExecutionContext;
use crate::vm::dispatch::metamethod::{invoke, lookup_binary};
use crate::vm::dispatch::StepOutcome;
use crate::vm::error::{ActivationErrorKind, LuaResult, RuntimeError};
use crate::vm::opcode::Instruction;

fn native_lt(a: &Value, b: &Value) -> Option<bool> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => Some(x < y),
        (Value::Str(x), Value::Str(y)) => Some(x.as_str() < y.as_str()),
        _ => None,
    }
}

fn native_le(a: &Value, b: &Value) -> Option<bool> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => Some(x <= y),
        (Value::Str(x), Value::Str(y)) => Some(x.as_str() <= y.as_str()),
        _ => None,
    }
}

/// Shared by `LT` and `LE`: both fall back to the `__le` metamethod
/// when neither operand is a directly comparable number or string —
/// `LT` never consults `__lt`, a quirk preserved from the original
/// interpreter rather than the real Lua 5.1 behavior.
fn compare(
    activation: &mut Activation,
    instr: &Instruction,
    ctx: &mut ExecutionContext,
    native: fn(&Value, &Value) -> Option<bool>,
) -> LuaResult<StepOutcome> {
    let b = activation.rk(instr.b);
    let c = activation.rk(instr.c);
    let result = match native(&b, &c) {
        Some(r) => r,
        None => match lookup_binary(&b, &c, MM_LE) {
            Some(handler) => truthy(&invoke(handler, vec![b, c], ctx)?),
            None => {
                // No dedicated comparison error kind in the spec's set;
                // the nearest fit is the one numeric comparisons already
                // raise, since LT/LE only ever compare numbers or
                // strings natively.
                return Err(RuntimeError::new(
                    ActivationErrorKind::ArithOnNonNumeric,
                    format!(
                        "attempt to compare {} with {}",
                        b.type_name(),
                        c.type_name()
                    ),
                ))
            }
        },
    };
    if result != (instr.a != 0) {
        activation.set_pc(activation.pc() + 1);
    }
    Ok(StepOutcome::Continue)
}

pub fn lt(a: &mut Activation, i: &Instruction, ctx: &mut ExecutionContext) -> LuaResult<StepOutcome> {
    compare(a, i, ctx, native_lt)
}

pub fn le(a: &mut Activation, i: &Instruction, ctx: &mut ExecutionContext) -> LuaResult<StepOutcome> {
    compare(a, i, ctx, native_le)
}

fn values_equal(a: &Value, b: &Value, ctx: &mut ExecutionContext) -> LuaResult<bool> {
    Ok(match (a, b) {
        (Value::Nil, Value::Nil) => true,
        (Value::Boolean(x), Value::Boolean(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Table(_), Value::Table(_)) | (Value::Callable(_), Value::Callable(_)) => {
            if a.identity() == b.identity() {
                true
            } else if let (Some(ta), Some(_)) = (a.as_table(), b.as_table()) {
                match ta.borrow().metamethod(crate::value::table::MM_EQ) {
                    Some(handler) => truthy(&invoke(handler, vec![a.clone(), b.clone()], ctx)?),
                    None => false,
                }
            } else {
                false
            }
        }
        _ => false,
    })
}

pub fn eq(
    activation: &mut Activation,
    instr: &Instruction,
    ctx: &mut ExecutionContext,
) -> LuaResult<StepOutcome> {
    let b = activation.rk(instr.b);
    let c = activation.rk(instr.c);
    let equal = values_equal(&b, &c, ctx)?;
    if equal != (instr.a != 0) {
        activation.set_pc(activation.pc() + 1);
    }
    Ok(StepOutcome::Continue)
}
