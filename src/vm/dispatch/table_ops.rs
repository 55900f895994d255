use crate::value::{LuaTable, Value};
use crate::vm::activation::Activation;
use crate::vm::context::ExecutionContext;
use crate::vm::dispatch::StepOutcome;
use crate::vm::error::{ActivationErrorKind, LuaResult, RuntimeError};
use crate::vm::opcode::Instruction;

/// Matches the teacher's `LFIELDS_PER_FLUSH` constant for `SETLIST`'s
/// block-numbered batches.
const FIELDS_PER_FLUSH: i64 = 50;

fn index_error(v: &Value) -> RuntimeError {
    RuntimeError::new(
        ActivationErrorKind::IndexNil,
        format!("attempt to index a {} value", v.type_name()),
    )
}

/// Looks `key` up on `receiver`: tables resolve through their own
/// members, strings fall back to the host's string library (so
/// `("x"):upper()`-style calls resolve) and everything else fails. This
/// is not `__index` metamethod chaining — tables never consult a
/// metatable's `__index` here, only their own member map.
fn lookup_member(receiver: &Value, key: &Value, ctx: &ExecutionContext) -> LuaResult<Value> {
    match receiver {
        Value::Table(t) => Ok(t.borrow().get_member(key)),
        Value::Str(_) => {
            let lib = ctx
                .string_library
                .as_ref()
                .ok_or_else(|| index_error(receiver))?;
            let member = lib.borrow().get_member(key);
            if member.is_nil() {
                Err(index_error(receiver))
            } else {
                Ok(member)
            }
        }
        _ => Err(index_error(receiver)),
    }
}

pub fn get_table(
    activation: &mut Activation,
    instr: &Instruction,
    ctx: &ExecutionContext,
) -> LuaResult<StepOutcome> {
    let table_val = activation.get_register(instr.b as usize);
    let key = activation.rk(instr.c);
    let value = lookup_member(&table_val, &key, ctx)?;
    activation.set_register(instr.a as usize, value);
    Ok(StepOutcome::Continue)
}

pub fn set_table(activation: &mut Activation, instr: &Instruction) -> LuaResult<StepOutcome> {
    let table_val = activation.get_register(instr.a as usize);
    let key = activation.rk(instr.b);
    let value = activation.rk(instr.c);
    let table = table_val.as_table().ok_or_else(|| index_error(&table_val))?;
    table.borrow_mut().set_member(key, value);
    Ok(StepOutcome::Continue)
}

pub fn new_table(activation: &mut Activation, instr: &Instruction) -> LuaResult<StepOutcome> {
    activation.set_register(instr.a as usize, Value::table(LuaTable::new()));
    Ok(StepOutcome::Continue)
}

pub fn self_op(
    activation: &mut Activation,
    instr: &Instruction,
    ctx: &ExecutionContext,
) -> LuaResult<StepOutcome> {
    let object = activation.get_register(instr.b as usize);
    let key = activation.rk(instr.c);
    let method = lookup_member(&object, &key, ctx)?;
    let a = instr.a as usize;
    activation.set_register(a + 1, object);
    activation.set_register(a, method);
    Ok(StepOutcome::Continue)
}

pub fn set_list(activation: &mut Activation, instr: &Instruction) -> LuaResult<StepOutcome> {
    let table_val = activation.get_register(instr.a as usize);
    let table = table_val.as_table().ok_or_else(|| index_error(&table_val))?.clone();
    let base = instr.a as usize + 1;
    let count = if instr.b == 0 {
        activation.register_count().saturating_sub(base)
    } else {
        instr.b as usize
    };
    let start = (instr.c as i64 - 1) * FIELDS_PER_FLUSH + 1;
    let values: Vec<Value> = (0..count).map(|i| activation.get_register(base + i)).collect();
    table.borrow_mut().set_list(start, values);
    Ok(StepOutcome::Continue)
}
