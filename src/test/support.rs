use std::cell::RefCell;
use std::rc::Rc;

use crate::value::{LuaTable, Value};
use crate::vm::activation::LuaClosure;
use crate::vm::callable::Callable;
use crate::vm::context::ExecutionContext;
use crate::vm::error::LuaResult;
use crate::vm::opcode::Instruction;
use crate::vm::prototype::{FunctionPrototype, UpvalueSource};

pub fn prototype(
    instructions: Vec<Instruction>,
    constants: Vec<Value>,
    param_count: usize,
) -> Rc<FunctionPrototype> {
    prototype_with_nested(instructions, constants, param_count, Vec::new(), Vec::new())
}

pub fn prototype_with_nested(
    instructions: Vec<Instruction>,
    constants: Vec<Value>,
    param_count: usize,
    nested: Vec<Rc<FunctionPrototype>>,
    nested_upvalues: Vec<Vec<UpvalueSource>>,
) -> Rc<FunctionPrototype> {
    let line_positions = vec![0; instructions.len()];
    Rc::new(FunctionPrototype {
        instructions,
        constants,
        nested,
        line_positions,
        param_count,
        is_vararg: 0,
        source_name: "support".to_string(),
        nested_upvalues,
    })
}

pub fn run(prototype: Rc<FunctionPrototype>, args: Vec<Value>) -> LuaResult<Vec<Value>> {
    let globals = Rc::new(RefCell::new(LuaTable::new()));
    let closure = LuaClosure {
        prototype,
        upvalues: Vec::new(),
        globals,
    };
    let mut ctx = ExecutionContext::new();
    closure.call(args, &mut ctx)
}

pub fn run_with_globals(
    prototype: Rc<FunctionPrototype>,
    globals: Rc<RefCell<LuaTable>>,
    args: Vec<Value>,
) -> LuaResult<Vec<Value>> {
    let closure = LuaClosure {
        prototype,
        upvalues: Vec::new(),
        globals,
    };
    let mut ctx = ExecutionContext::new();
    closure.call(args, &mut ctx)
}

pub fn run_with_ctx(
    prototype: Rc<FunctionPrototype>,
    args: Vec<Value>,
    ctx: &mut ExecutionContext,
) -> LuaResult<Vec<Value>> {
    let globals = Rc::new(RefCell::new(LuaTable::new()));
    let closure = LuaClosure {
        prototype,
        upvalues: Vec::new(),
        globals,
    };
    closure.call(args, ctx)
}
