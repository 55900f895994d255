use crate::value::Value;
use crate::vm::opcode::{Instruction, OpCode, RK_CONST_BIAS};

use super::support;

#[test]
fn add_on_two_registers() {
    let instrs = vec![
        Instruction::new(OpCode::Add, 2, 0, 1),
        Instruction::new(OpCode::Return, 2, 2, 0),
    ];
    let proto = support::prototype(instrs, Vec::new(), 2);
    let result = support::run(proto, vec![Value::Number(4.0), Value::Number(6.0)]).unwrap();
    assert_eq!(result.len(), 1);
    match result[0] {
        Value::Number(n) => assert_eq!(n, 10.0),
        _ => panic!("expected number"),
    }
}

#[test]
fn add_with_a_constant_operand() {
    let instrs = vec![
        Instruction::new(OpCode::Add, 1, 0, RK_CONST_BIAS),
        Instruction::new(OpCode::Return, 1, 2, 0),
    ];
    let proto = support::prototype(instrs, vec![Value::Number(5.0)], 1);
    let result = support::run(proto, vec![Value::Number(10.0)]).unwrap();
    match result[0] {
        Value::Number(n) => assert_eq!(n, 15.0),
        _ => panic!("expected number"),
    }
}

#[test]
fn modulo_follows_floored_division() {
    let instrs = vec![
        Instruction::new(OpCode::Mod, 0, 0, 1),
        Instruction::new(OpCode::Return, 0, 2, 0),
    ];
    let proto = support::prototype(instrs, Vec::new(), 2);
    let result = support::run(proto, vec![Value::Number(-1.0), Value::Number(5.0)]).unwrap();
    match result[0] {
        Value::Number(n) => assert_eq!(n, 4.0),
        _ => panic!("expected number"),
    }
}

#[test]
fn concat_folds_a_register_range_right_to_left() {
    let instrs = vec![
        Instruction::new(OpCode::Concat, 0, 0, 2),
        Instruction::new(OpCode::Return, 0, 2, 0),
    ];
    let proto = support::prototype(instrs, Vec::new(), 3);
    let result = support::run(
        proto,
        vec![Value::str("a"), Value::str("b"), Value::Number(3.0)],
    )
    .unwrap();
    match &result[0] {
        Value::Str(s) => assert_eq!(s.as_str(), "ab3"),
        _ => panic!("expected string"),
    }
}

#[test]
fn adding_a_table_without_a_metamethod_is_an_error() {
    let instrs = vec![
        Instruction::new(OpCode::Add, 1, 0, 1),
        Instruction::new(OpCode::Return, 1, 2, 0),
    ];
    let proto = support::prototype(instrs, Vec::new(), 1);
    let table = Value::table(crate::value::LuaTable::new());
    let err = support::run(proto, vec![table]).unwrap_err();
    assert_eq!(err.kind, crate::vm::error::ActivationErrorKind::ArithOnNonNumeric);
}
