use crate::value::Value;
use crate::vm::activation::Activation;
use crate::vm::dispatch::StepOutcome;
use crate::vm::error::LuaResult;
use crate::vm::opcode::Instruction;

pub fn r#move(activation: &mut Activation, instr: &Instruction) -> LuaResult<StepOutcome> {
    let value = activation.get_register(instr.b as usize);
    activation.set_register(instr.a as usize, value);
    Ok(StepOutcome::Continue)
}

pub fn load_k(activation: &mut Activation, instr: &Instruction) -> LuaResult<StepOutcome> {
    let value = activation.constant(instr.bx() as usize);
    activation.set_register(instr.a as usize, value);
    Ok(StepOutcome::Continue)
}

pub fn load_bool(activation: &mut Activation, instr: &Instruction) -> LuaResult<StepOutcome> {
    activation.set_register(instr.a as usize, Value::Boolean(instr.b != 0));
    if instr.c != 0 {
        activation.set_pc(activation.pc() + 1);
    }
    Ok(StepOutcome::Continue)
}

pub fn load_nil(activation: &mut Activation, instr: &Instruction) -> LuaResult<StepOutcome> {
    let a = instr.a as usize;
    let b = instr.b as usize;
    for i in a..=b {
        activation.set_register(i, Value::Nil);
    }
    Ok(StepOutcome::Continue)
}

pub fn get_upval(activation: &mut Activation, instr: &Instruction) -> LuaResult<StepOutcome> {
    let value = activation.get_upvalue(instr.b as usize);
    activation.set_register(instr.a as usize, value);
    Ok(StepOutcome::Continue)
}

pub fn set_upval(activation: &mut Activation, instr: &Instruction) -> LuaResult<StepOutcome> {
    let value = activation.get_register(instr.a as usize);
    activation.set_upvalue(instr.b as usize, value);
    Ok(StepOutcome::Continue)
}

pub fn get_global(activation: &mut Activation, instr: &Instruction) -> LuaResult<StepOutcome> {
    let key = activation.constant(instr.bx() as usize);
    let value = if key.as_str() == Some("_G") {
        Value::Table(activation.globals().clone())
    } else {
        activation.globals().borrow().get_member(&key)
    };
    activation.set_register(instr.a as usize, value);
    Ok(StepOutcome::Continue)
}

pub fn set_global(activation: &mut Activation, instr: &Instruction) -> LuaResult<StepOutcome> {
    let key = activation.constant(instr.bx() as usize);
    let value = activation.get_register(instr.a as usize);
    activation.globals().borrow_mut().set_member(key, value);
    Ok(StepOutcome::Continue)
}
