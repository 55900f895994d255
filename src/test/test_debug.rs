use std::cell::RefCell;
use std::rc::Rc;

use crate::value::{LuaTable, Value};
use crate::vm::activation::LuaClosure;
use crate::vm::callable::{Callable, Control, NativeFunction};
use crate::vm::context::ExecutionContext;
use crate::vm::debug;
use crate::vm::opcode::{Instruction, OpCode};

use super::support;

fn number_of(values: &[Value], index: usize) -> f64 {
    match values[index] {
        Value::Number(n) => n,
        _ => panic!("expected number"),
    }
}

#[test]
fn a_requested_step_pauses_after_a_call_and_resume_continues_it() {
    let instrs = vec![
        Instruction::with_bx(OpCode::LoadK, 0, 0), // r0 = answer
        Instruction::new(OpCode::Call, 0, 1, 2),   // r0 = answer()
        Instruction::new(OpCode::Return, 0, 2, 0),
    ];
    let answer = Value::Callable(Rc::new(NativeFunction::new("answer", |_args, _ctx| {
        Ok(vec![Value::Number(42.0)])
    })));
    let constants = vec![answer];
    let proto = support::prototype(instrs, constants, 0);
    let globals = Rc::new(RefCell::new(LuaTable::new()));
    let closure = LuaClosure {
        prototype: proto,
        upvalues: Vec::new(),
        globals,
    };

    let mut ctx = ExecutionContext::new();
    ctx.debug.request_step();
    assert!(!ctx.debug.is_paused());

    let outcome = closure.invoke_resumable(Vec::new(), &mut ctx).unwrap();
    assert!(matches!(outcome, Control::DebugPause));
    assert!(ctx.debug.is_paused());
    // Consumed by the pause, so a further step doesn't re-trigger it.
    assert!(!ctx.debug.should_pause_at_call());

    let outcome = debug::resume(&mut ctx).unwrap();
    let returned = match outcome {
        Control::Return(values) => values,
        _ => panic!("expected a return"),
    };
    assert_eq!(number_of(&returned, 0), 42.0);
    assert!(!ctx.debug.is_paused());
}

#[test]
fn pause_cascades_through_a_nested_call_and_resume_replays_it() {
    let globals = Rc::new(RefCell::new(LuaTable::new()));

    let answer = Value::Callable(Rc::new(NativeFunction::new("answer", |_args, _ctx| {
        Ok(vec![Value::Number(7.0)])
    })));

    let b_instrs = vec![
        Instruction::with_bx(OpCode::LoadK, 0, 0), // r0 = answer
        Instruction::new(OpCode::Call, 0, 1, 2),   // r0 = answer()
        Instruction::new(OpCode::Return, 0, 2, 0),
    ];
    let b_proto = support::prototype(b_instrs, vec![answer], 0);
    let b_closure: Rc<dyn Callable> = Rc::new(LuaClosure {
        prototype: b_proto,
        upvalues: Vec::new(),
        globals: globals.clone(),
    });

    let a_instrs = vec![
        Instruction::with_bx(OpCode::LoadK, 0, 0), // r0 = b
        Instruction::new(OpCode::Call, 0, 1, 2),   // r0 = b()
        Instruction::new(OpCode::Return, 0, 2, 0),
    ];
    let a_constants = vec![Value::Callable(b_closure)];
    let a_proto = support::prototype(a_instrs, a_constants, 0);
    let a_closure = LuaClosure {
        prototype: a_proto,
        upvalues: Vec::new(),
        globals,
    };

    let mut ctx = ExecutionContext::new();
    ctx.debug.request_step();

    let outcome = a_closure.invoke_resumable(Vec::new(), &mut ctx).unwrap();
    assert!(matches!(outcome, Control::DebugPause));

    let outcome = debug::resume(&mut ctx).unwrap();
    let returned = match outcome {
        Control::Return(values) => values,
        _ => panic!("expected a return"),
    };
    assert_eq!(number_of(&returned, 0), 7.0);
}
