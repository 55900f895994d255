use std::rc::Rc;

use crate::value::{truthy, Value};
use crate::vm::activation::{Activation, LuaClosure};
use crate::vm::callable::Control;
use crate::vm::context::ExecutionContext;
use crate::vm::dispatch::StepOutcome;
use crate::vm::error::{ActivationErrorKind, LuaResult, RuntimeError};
use crate::vm::opcode::Instruction;
use crate::vm::prototype::UpvalueSource;

pub fn jmp(activation: &mut Activation, instr: &Instruction) -> LuaResult<StepOutcome> {
    let target = activation.pc() as i32 + instr.sbx();
    activation.set_pc(target as usize);
    Ok(StepOutcome::Continue)
}

/// `if truthy(R(A)) != (C != 0) then pc++` — the next instruction, a
/// `JMP`, is skipped when the test fails. Preserved exactly as the
/// original's truthy-skip logic, not the inverted form some later Lua
/// versions use.
pub fn test(activation: &mut Activation, instr: &Instruction) -> LuaResult<StepOutcome> {
    let value = activation.get_register(instr.a as usize);
    if truthy(&value) != (instr.c != 0) {
        activation.set_pc(activation.pc() + 1);
    }
    Ok(StepOutcome::Continue)
}

pub fn test_set(activation: &mut Activation, instr: &Instruction) -> LuaResult<StepOutcome> {
    let value = activation.get_register(instr.b as usize);
    if truthy(&value) == (instr.c != 0) {
        activation.set_register(instr.a as usize, value);
    } else {
        activation.set_pc(activation.pc() + 1);
    }
    Ok(StepOutcome::Continue)
}

fn as_number(activation: &Activation, reg: usize) -> LuaResult<f64> {
    match activation.get_register(reg) {
        Value::Number(n) => Ok(n),
        other => Err(RuntimeError::new(
            ActivationErrorKind::ArithOnNonNumeric,
            format!("'for' value must be a number, got a {} value", other.type_name()),
        )),
    }
}

pub fn for_prep(activation: &mut Activation, instr: &Instruction) -> LuaResult<StepOutcome> {
    let a = instr.a as usize;
    let init = as_number(activation, a)?;
    let step = as_number(activation, a + 2)?;
    activation.set_register(a, Value::Number(init - step));
    let target = activation.pc() as i32 + instr.sbx();
    activation.set_pc(target as usize);
    Ok(StepOutcome::Continue)
}

pub fn for_loop(activation: &mut Activation, instr: &Instruction) -> LuaResult<StepOutcome> {
    let a = instr.a as usize;
    let step = as_number(activation, a + 2)?;
    let limit = as_number(activation, a + 1)?;
    let next = as_number(activation, a)? + step;
    let continues = if step >= 0.0 { next <= limit } else { next >= limit };
    activation.set_register(a, Value::Number(next));
    if continues {
        activation.set_register(a + 3, Value::Number(next));
        let target = activation.pc() as i32 + instr.sbx();
        activation.set_pc(target as usize);
    }
    Ok(StepOutcome::Continue)
}

pub fn tfor_loop(
    activation: &mut Activation,
    instr: &Instruction,
    ctx: &mut ExecutionContext,
) -> LuaResult<StepOutcome> {
    let a = instr.a as usize;
    let iterator = activation.get_register(a);
    let state = activation.get_register(a + 1);
    let control = activation.get_register(a + 2);
    let callable = iterator.as_callable().cloned().ok_or_else(|| {
        RuntimeError::new(
            ActivationErrorKind::CallNonCallable,
            format!("attempt to call a {} value", iterator.type_name()),
        )
    })?;
    let mut results = match callable.invoke_resumable(vec![state, control], ctx)? {
        Control::Return(values) => values,
        Control::Yield(values) => return Ok(StepOutcome::PropagateYield(values)),
        Control::DebugPause => return Ok(StepOutcome::PropagatePause),
    };
    let want = instr.c as usize;
    results.resize(want, Value::Nil);
    for (i, value) in results.into_iter().enumerate() {
        activation.set_register(a + 3 + i, value);
    }
    let first = activation.get_register(a + 3);
    if !first.is_nil() {
        activation.set_register(a + 2, first);
    } else {
        activation.set_pc(activation.pc() + 1);
    }
    Ok(StepOutcome::Continue)
}

fn collect_args(activation: &Activation, base: usize, b: i32) -> Vec<Value> {
    let num_args = if b == 0 {
        activation.register_count().saturating_sub(base)
    } else {
        (b - 1) as usize
    };
    (0..num_args).map(|i| activation.get_register(base + i)).collect()
}

fn store_results(activation: &mut Activation, base: usize, c: i32, mut results: Vec<Value>) {
    if c == 0 {
        activation.truncate_registers(base);
        for (i, value) in results.into_iter().enumerate() {
            activation.set_register(base + i, value);
        }
    } else {
        results.resize((c - 1) as usize, Value::Nil);
        for (i, value) in results.into_iter().enumerate() {
            activation.set_register(base + i, value);
        }
    }
}

pub fn call(
    activation: &mut Activation,
    instr: &Instruction,
    ctx: &mut ExecutionContext,
) -> LuaResult<StepOutcome> {
    let base = instr.a as usize;
    if let Some(resumed) = activation.take_pending_resume() {
        store_results(activation, base, instr.c, resumed);
        return Ok(StepOutcome::Continue);
    }
    let func = activation.get_register(base);
    let callable = func.as_callable().cloned().ok_or_else(|| {
        RuntimeError::new(
            ActivationErrorKind::CallNonCallable,
            format!("attempt to call a {} value", func.type_name()),
        )
    })?;
    let args = collect_args(activation, base + 1, instr.b);
    match callable.invoke_resumable(args, ctx)? {
        Control::Return(results) => {
            store_results(activation, base, instr.c, results);
            Ok(StepOutcome::Continue)
        }
        Control::Yield(values) => Ok(StepOutcome::PropagateYield(values)),
        Control::DebugPause => Ok(StepOutcome::PropagatePause),
    }
}

/// Without the teacher's frame-stack reuse, a tail call is simply a
/// call whose results become this activation's own return values
/// outright — see SPEC_FULL.md's Non-goal excluding constant-stack
/// tail-call optimization.
pub fn tail_call(
    activation: &mut Activation,
    instr: &Instruction,
    ctx: &mut ExecutionContext,
) -> LuaResult<StepOutcome> {
    let base = instr.a as usize;
    if let Some(resumed) = activation.take_pending_resume() {
        return Ok(StepOutcome::Return(resumed));
    }
    let func = activation.get_register(base);
    let callable = func.as_callable().cloned().ok_or_else(|| {
        RuntimeError::new(
            ActivationErrorKind::CallNonCallable,
            format!("attempt to call a {} value", func.type_name()),
        )
    })?;
    let args = collect_args(activation, base + 1, instr.b);
    match callable.invoke_resumable(args, ctx)? {
        Control::Return(results) => Ok(StepOutcome::Return(results)),
        Control::Yield(values) => Ok(StepOutcome::PropagateYield(values)),
        Control::DebugPause => Ok(StepOutcome::PropagatePause),
    }
}

pub fn return_op(activation: &mut Activation, instr: &Instruction) -> LuaResult<StepOutcome> {
    let base = instr.a as usize;
    let values = if instr.b == 0 {
        let top = activation.register_count();
        (base..top).map(|i| activation.get_register(i)).collect()
    } else {
        let n = (instr.b - 1) as usize;
        (0..n).map(|i| activation.get_register(base + i)).collect()
    };
    Ok(StepOutcome::Return(values))
}

pub fn close(activation: &mut Activation, instr: &Instruction) -> LuaResult<StepOutcome> {
    activation.close_upvalues_from(instr.a as usize);
    Ok(StepOutcome::Continue)
}

pub fn closure(activation: &mut Activation, instr: &Instruction) -> LuaResult<StepOutcome> {
    let prototype = activation.prototype().clone();
    let index = instr.bx() as usize;
    let nested_proto = prototype.nested[index].clone();
    let sources = prototype.nested_upvalues[index].clone();
    let mut upvalues = Vec::with_capacity(sources.len());
    for source in sources {
        let cell = match source {
            UpvalueSource::ParentLocal(reg) => activation.open_upvalue_at(reg),
            UpvalueSource::ParentUpvalue(idx) => activation.upvalue_cell(idx),
        };
        upvalues.push(cell);
    }
    let closure = LuaClosure {
        prototype: nested_proto,
        upvalues,
        globals: activation.globals().clone(),
    };
    activation.set_register(instr.a as usize, Value::Callable(Rc::new(closure)));
    Ok(StepOutcome::Continue)
}

pub fn vararg(activation: &mut Activation, instr: &Instruction) -> LuaResult<StepOutcome> {
    let base = instr.a as usize;
    let varargs = activation.varargs().to_vec();
    let count = if instr.b == 0 { varargs.len() } else { (instr.b - 1) as usize };
    if instr.b == 0 {
        activation.truncate_registers(base);
    }
    for i in 0..count {
        activation.set_register(base + i, varargs.get(i).cloned().unwrap_or(Value::Nil));
    }
    if instr.b != 0 {
        activation.truncate_registers(base + count);
    }
    Ok(StepOutcome::Continue)
}
