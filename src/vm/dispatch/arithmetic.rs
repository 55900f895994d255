use crate::value::{to_display_string, to_number, Value};
use crate::value::table::{MM_ADD, MM_CONCAT, MM_DIV, MM_MOD, MM_MUL, MM_POW, MM_SUB, MM_UNM};
use crate::vm::activation::Activation;
use crate::vm::context::ExecutionContext;
use crate::vm::dispatch::metamethod::{invoke, lookup, lookup_binary};
use crate::vm::dispatch::StepOutcome;
use crate::vm::error::{ActivationErrorKind, LuaResult, RuntimeError};
use crate::vm::opcode::Instruction;

fn binop(
    activation: &mut Activation,
    instr: &Instruction,
    ctx: &mut ExecutionContext,
    mm_name: &str,
    op: fn(f64, f64) -> f64,
) -> LuaResult<StepOutcome> {
    let b = activation.rk(instr.b);
    let c = activation.rk(instr.c);
    let result = match (to_number(&b), to_number(&c)) {
        (Some(x), Some(y)) => Value::Number(op(x, y)),
        _ => match lookup_binary(&b, &c, mm_name) {
            Some(handler) => invoke(handler, vec![b, c], ctx)?,
            None => {
                let offender = if to_number(&b).is_none() { &b } else { &c };
                return Err(RuntimeError::new(
                    ActivationErrorKind::ArithOnNonNumeric,
                    format!(
                        "attempt to perform arithmetic on a {} value",
                        offender.type_name()
                    ),
                ));
            }
        },
    };
    activation.set_register(instr.a as usize, result);
    Ok(StepOutcome::Continue)
}

pub fn add(a: &mut Activation, i: &Instruction, ctx: &mut ExecutionContext) -> LuaResult<StepOutcome> {
    binop(a, i, ctx, MM_ADD, |x, y| x + y)
}

pub fn sub(a: &mut Activation, i: &Instruction, ctx: &mut ExecutionContext) -> LuaResult<StepOutcome> {
    binop(a, i, ctx, MM_SUB, |x, y| x - y)
}

pub fn mul(a: &mut Activation, i: &Instruction, ctx: &mut ExecutionContext) -> LuaResult<StepOutcome> {
    binop(a, i, ctx, MM_MUL, |x, y| x * y)
}

pub fn div(a: &mut Activation, i: &Instruction, ctx: &mut ExecutionContext) -> LuaResult<StepOutcome> {
    binop(a, i, ctx, MM_DIV, |x, y| x / y)
}

pub fn modulo(a: &mut Activation, i: &Instruction, ctx: &mut ExecutionContext) -> LuaResult<StepOutcome> {
    binop(a, i, ctx, MM_MOD, |x, y| x - (x / y).floor() * y)
}

pub fn pow(a: &mut Activation, i: &Instruction, ctx: &mut ExecutionContext) -> LuaResult<StepOutcome> {
    binop(a, i, ctx, MM_POW, f64::powf)
}

pub fn unm(
    activation: &mut Activation,
    instr: &Instruction,
    ctx: &mut ExecutionContext,
) -> LuaResult<StepOutcome> {
    let b = activation.rk(instr.b);
    let result = match to_number(&b) {
        Some(x) => Value::Number(-x),
        None => match lookup(&b, MM_UNM) {
            Some(handler) => invoke(handler, vec![b.clone(), b], ctx)?,
            None => {
                return Err(RuntimeError::new(
                    ActivationErrorKind::ArithOnNonNumeric,
                    format!("attempt to perform arithmetic on a {} value", b.type_name()),
                ))
            }
        },
    };
    activation.set_register(instr.a as usize, result);
    Ok(StepOutcome::Continue)
}

pub fn not(activation: &mut Activation, instr: &Instruction) -> LuaResult<StepOutcome> {
    let b = activation.get_register(instr.b as usize);
    let truthy = crate::value::truthy(&b);
    activation.set_register(instr.a as usize, Value::Boolean(!truthy));
    Ok(StepOutcome::Continue)
}

pub fn len(activation: &mut Activation, instr: &Instruction) -> LuaResult<StepOutcome> {
    let b = activation.get_register(instr.b as usize);
    let result = match &b {
        Value::Str(s) => s.len() as i64,
        Value::Table(t) => t.borrow().length(),
        other => {
            return Err(RuntimeError::new(
                ActivationErrorKind::LengthOfNil,
                format!("attempt to get length of a {} value", other.type_name()),
            ))
        }
    };
    activation.set_register(instr.a as usize, Value::Number(result as f64));
    Ok(StepOutcome::Continue)
}

fn concat_pair(left: Value, right: Value, ctx: &mut ExecutionContext) -> LuaResult<Value> {
    match (to_display_string(&left), to_display_string(&right)) {
        (Some(l), Some(r)) => Ok(Value::str(format!("{l}{r}"))),
        _ => match lookup_binary(&left, &right, MM_CONCAT) {
            Some(handler) => invoke(handler, vec![left, right], ctx),
            None => {
                let offender = if to_display_string(&left).is_none() {
                    &left
                } else {
                    &right
                };
                Err(RuntimeError::new(
                    ActivationErrorKind::ConcatOnNonStringNumber,
                    format!("attempt to concatenate a {} value", offender.type_name()),
                ))
            }
        },
    }
}

pub fn concat(
    activation: &mut Activation,
    instr: &Instruction,
    ctx: &mut ExecutionContext,
) -> LuaResult<StepOutcome> {
    let b = instr.b as usize;
    let c = instr.c as usize;
    let mut acc = activation.get_register(c);
    let mut i = c;
    while i > b {
        i -= 1;
        let left = activation.get_register(i);
        acc = concat_pair(left, acc, ctx)?;
    }
    activation.set_register(instr.a as usize, acc);
    Ok(StepOutcome::Continue)
}
