use std::cell::RefCell;
use std::rc::Rc;

use crate::value::table::{MM_ADD, MM_EQ, MM_LE};
use crate::value::{LuaTable, Value};
use crate::vm::callable::NativeFunction;
use crate::vm::opcode::{Instruction, OpCode};

use super::support;

fn table_with_metamethod(name: &str, result: Value) -> Value {
    let mt = Rc::new(RefCell::new(LuaTable::new()));
    mt.borrow_mut().set_member(
        Value::str(name),
        Value::Callable(Rc::new(NativeFunction::new("mm", move |_args, _ctx| {
            Ok(vec![result.clone()])
        }))),
    );
    let mut t = LuaTable::new();
    t.set_metatable(Some(mt));
    Value::table(t)
}

/// `r2 = (r0 <op> r1)`, the standard compare+branch idiom: a
/// comparison whose skip-on-match semantics pick between two
/// `LOADBOOL`s, joined by a `JMP` over the "true" case.
fn compare_to_bool(opcode: OpCode) -> Vec<Instruction> {
    vec![
        Instruction::new(OpCode::LoadBool, 2, 0, 0),
        Instruction::new(opcode, 0, 0, 1),
        Instruction::with_sbx(OpCode::Jmp, 0, 1),
        Instruction::new(OpCode::LoadBool, 2, 1, 0),
        Instruction::new(OpCode::Return, 2, 2, 0),
    ]
}

#[test]
fn add_falls_back_to_the_add_metamethod() {
    let instrs = vec![
        Instruction::new(OpCode::Add, 1, 0, 1),
        Instruction::new(OpCode::Return, 1, 2, 0),
    ];
    let proto = support::prototype(instrs, Vec::new(), 2);
    let lhs = table_with_metamethod(MM_ADD, Value::Number(100.0));
    let result = support::run(proto, vec![lhs, Value::Number(1.0)]).unwrap();
    match result[0] {
        Value::Number(n) => assert_eq!(n, 100.0),
        _ => panic!("expected number"),
    }
}

#[test]
fn lt_dispatches_through_le_not_lt() {
    // The metamethod registered under __le fires for LT too; there is
    // no separate __lt lookup.
    let proto = support::prototype(compare_to_bool(OpCode::Lt), Vec::new(), 2);
    let lhs = table_with_metamethod(MM_LE, Value::Boolean(true));
    let result = support::run(proto, vec![lhs, Value::Number(1.0)]).unwrap();
    match result[0] {
        Value::Boolean(b) => assert!(b),
        _ => panic!("expected boolean"),
    }
}

#[test]
fn eq_on_tables_without_eq_metamethod_uses_identity() {
    let proto = support::prototype(compare_to_bool(OpCode::Eq), Vec::new(), 2);
    let a = Value::table(LuaTable::new());
    let b = Value::table(LuaTable::new());
    let result = support::run(proto, vec![a, b]).unwrap();
    match result[0] {
        Value::Boolean(b) => assert!(!b),
        _ => panic!("expected boolean"),
    }
}

#[test]
fn eq_on_tables_consults_eq_metamethod_when_not_identical() {
    let proto = support::prototype(compare_to_bool(OpCode::Eq), Vec::new(), 2);
    let a = table_with_metamethod(MM_EQ, Value::Boolean(true));
    let b = Value::table(LuaTable::new());
    let result = support::run(proto, vec![a, b]).unwrap();
    match result[0] {
        Value::Boolean(b) => assert!(b),
        _ => panic!("expected boolean"),
    }
}
