mod arithmetic;
mod comparison;
mod control;
mod load;
mod metamethod;
mod table_ops;

use crate::value::Value;
use crate::vm::activation::Activation;
use crate::vm::context::ExecutionContext;
use crate::vm::error::LuaResult;
use crate::vm::opcode::{Instruction, OpCode};

/// What dispatching one instruction did to the fetch/decode loop: keep
/// going, finish the activation with a return value, or hand a
/// suspending call's yielded values, or a nested debug pause, up to the
/// caller so it can join the relevant suspend cascade (see
/// `Activation::run`).
pub enum StepOutcome {
    Continue,
    Return(Vec<Value>),
    PropagateYield(Vec<Value>),
    PropagatePause,
}

pub fn step(
    activation: &mut Activation,
    instr: &Instruction,
    ctx: &mut ExecutionContext,
) -> LuaResult<StepOutcome> {
    match instr.opcode {
        OpCode::Move => load::r#move(activation, instr),
        OpCode::LoadK => load::load_k(activation, instr),
        OpCode::LoadBool => load::load_bool(activation, instr),
        OpCode::LoadNil => load::load_nil(activation, instr),
        OpCode::GetUpval => load::get_upval(activation, instr),
        OpCode::GetGlobal => load::get_global(activation, instr),
        OpCode::SetGlobal => load::set_global(activation, instr),
        OpCode::SetUpval => load::set_upval(activation, instr),
        OpCode::GetTable => table_ops::get_table(activation, instr, ctx),
        OpCode::SetTable => table_ops::set_table(activation, instr),
        OpCode::NewTable => table_ops::new_table(activation, instr),
        OpCode::SelfOp => table_ops::self_op(activation, instr, ctx),
        OpCode::Add => arithmetic::add(activation, instr, ctx),
        OpCode::Sub => arithmetic::sub(activation, instr, ctx),
        OpCode::Mul => arithmetic::mul(activation, instr, ctx),
        OpCode::Div => arithmetic::div(activation, instr, ctx),
        OpCode::Mod => arithmetic::modulo(activation, instr, ctx),
        OpCode::Pow => arithmetic::pow(activation, instr, ctx),
        OpCode::Unm => arithmetic::unm(activation, instr, ctx),
        OpCode::Not => arithmetic::not(activation, instr),
        OpCode::Len => arithmetic::len(activation, instr),
        OpCode::Concat => arithmetic::concat(activation, instr, ctx),
        OpCode::Jmp => control::jmp(activation, instr),
        OpCode::Eq => comparison::eq(activation, instr, ctx),
        OpCode::Lt => comparison::lt(activation, instr, ctx),
        OpCode::Le => comparison::le(activation, instr, ctx),
        OpCode::Test => control::test(activation, instr),
        OpCode::TestSet => control::test_set(activation, instr),
        OpCode::Call => control::call(activation, instr, ctx),
        OpCode::TailCall => control::tail_call(activation, instr, ctx),
        OpCode::Return => control::return_op(activation, instr),
        OpCode::ForLoop => control::for_loop(activation, instr),
        OpCode::ForPrep => control::for_prep(activation, instr),
        OpCode::TForLoop => control::tfor_loop(activation, instr, ctx),
        OpCode::SetList => table_ops::set_list(activation, instr),
        OpCode::Close => control::close(activation, instr),
        OpCode::Closure => control::closure(activation, instr),
        OpCode::Vararg => control::vararg(activation, instr),
    }
}
