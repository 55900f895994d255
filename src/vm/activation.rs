use std::cell::RefCell;
use std::rc::Rc;

use crate::value::{LuaTable, Value};
use crate::vm::callable::{Callable, Control};
use crate::vm::context::ExecutionContext;
use crate::vm::dispatch::{self, StepOutcome};
use crate::vm::error::{ActivationErrorKind, LuaResult, RuntimeError};
use crate::vm::opcode::{decode_rk, Instruction, OpCode, Rk};
use crate::vm::prototype::FunctionPrototype;
use crate::vm::register_file::RegisterFile;
use crate::vm::upvalue::UpvalueCell;

/// A closure: a function prototype paired with the upvalue cells it
/// captured at creation time, analogous to the teacher's `LuaClosure`
/// GC object but holding `Rc<UpvalueCell>` handles rather than raw GC
/// pointers.
pub struct LuaClosure {
    pub prototype: Rc<FunctionPrototype>,
    pub upvalues: Vec<Rc<UpvalueCell>>,
    pub globals: Rc<RefCell<LuaTable>>,
}

impl Callable for LuaClosure {
    fn call(&self, args: Vec<Value>, ctx: &mut ExecutionContext) -> LuaResult<Vec<Value>> {
        match self.invoke_resumable(args, ctx)? {
            Control::Return(values) => Ok(values),
            Control::Yield(_) => Err(RuntimeError::new(
                ActivationErrorKind::HostError,
                "attempt to yield across a call boundary that does not support it",
            )),
            Control::DebugPause => Err(RuntimeError::new(
                ActivationErrorKind::HostError,
                "activation suspended for debugging across a call boundary that does not support it",
            )),
        }
    }

    fn invoke_resumable(&self, args: Vec<Value>, ctx: &mut ExecutionContext) -> LuaResult<Control> {
        let activation = Activation::new(
            self.prototype.clone(),
            self.upvalues.clone(),
            self.globals.clone(),
            args,
        );
        activation.run(ctx)
    }

    fn name(&self) -> &str {
        &self.prototype.source_name
    }
}

/// One in-flight invocation of a `LuaClosure`: its own register file,
/// program counter, and the upvalue cells it has opened onto its own
/// registers so far (closed when a scope exits or the activation
/// returns). Owned by value through `run`/`resume` so it can be moved
/// onto `CoroutineController`'s suspend stack without cloning.
pub struct Activation {
    prototype: Rc<FunctionPrototype>,
    upvalues: Vec<Rc<UpvalueCell>>,
    registers: Rc<RefCell<RegisterFile>>,
    open_upvalues: Vec<Rc<UpvalueCell>>,
    varargs: Vec<Value>,
    pc: usize,
    globals: Rc<RefCell<LuaTable>>,
    pending_resume: Option<Vec<Value>>,
}

impl Activation {
    pub fn new(
        prototype: Rc<FunctionPrototype>,
        upvalues: Vec<Rc<UpvalueCell>>,
        globals: Rc<RefCell<LuaTable>>,
        mut args: Vec<Value>,
    ) -> Self {
        let registers = Rc::new(RefCell::new(RegisterFile::new()));
        let param_count = prototype.param_count;
        let varargs = if args.len() > param_count {
            args.split_off(param_count)
        } else {
            Vec::new()
        };
        {
            let mut file = registers.borrow_mut();
            for (i, arg) in args.into_iter().enumerate() {
                file.set(i, arg);
            }
        }
        if prototype.is_compat_vararg() && !varargs.is_empty() {
            let mut table = LuaTable::new();
            table.set_list(1, varargs.clone());
            table.set_member(Value::str("n"), Value::Number(varargs.len() as f64));
            registers
                .borrow_mut()
                .set(param_count, Value::table(table));
        }
        Activation {
            prototype,
            upvalues,
            registers,
            open_upvalues: Vec::new(),
            varargs,
            pc: 0,
            globals,
            pending_resume: None,
        }
    }

    pub fn set_pending_resume(&mut self, values: Vec<Value>) {
        self.pending_resume = Some(values);
    }

    pub fn take_pending_resume(&mut self) -> Option<Vec<Value>> {
        self.pending_resume.take()
    }

    pub fn prototype(&self) -> &Rc<FunctionPrototype> {
        &self.prototype
    }

    pub fn varargs(&self) -> &[Value] {
        &self.varargs
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn set_pc(&mut self, pc: usize) {
        self.pc = pc;
    }

    pub fn globals(&self) -> &Rc<RefCell<LuaTable>> {
        &self.globals
    }

    pub fn get_register(&self, index: usize) -> Value {
        self.registers.borrow().get(index)
    }

    pub fn set_register(&mut self, index: usize, value: Value) {
        self.registers.borrow_mut().set(index, value);
    }

    pub fn register_count(&self) -> usize {
        self.registers.borrow().len()
    }

    pub fn truncate_registers(&mut self, index: usize) {
        self.registers.borrow_mut().truncate(index);
    }

    pub fn get_upvalue(&self, index: usize) -> Value {
        self.upvalues[index].get()
    }

    pub fn set_upvalue(&self, index: usize, value: Value) {
        self.upvalues[index].set(value);
    }

    pub fn upvalue_cell(&self, index: usize) -> Rc<UpvalueCell> {
        self.upvalues[index].clone()
    }

    pub fn constant(&self, index: usize) -> Value {
        self.prototype.constants[index].clone()
    }

    pub fn rk(&self, x: i32) -> Value {
        match decode_rk(x) {
            Rk::Register(r) => self.get_register(r),
            Rk::Constant(k) => self.constant(k),
        }
    }

    /// Opens (or reuses, if already open) an upvalue cell aliasing
    /// register `index` of this activation, for a nested `CLOSURE` to
    /// capture.
    pub fn open_upvalue_at(&mut self, index: usize) -> Rc<UpvalueCell> {
        for cell in &self.open_upvalues {
            if cell.is_open_at(&self.registers, index) {
                return cell.clone();
            }
        }
        let cell = UpvalueCell::new_open(self.registers.clone(), index);
        self.open_upvalues.push(cell.clone());
        cell
    }

    /// `CLOSE`: severs every open upvalue this activation has handed
    /// out that aliases a register at or past `from`, snapshotting its
    /// current value so the register can go out of scope safely.
    pub fn close_upvalues_from(&mut self, from: usize) {
        self.open_upvalues.retain(|cell| {
            if cell.is_open_at(&self.registers, from) {
                cell.close();
                false
            } else {
                true
            }
        });
    }

    fn close_all_upvalues(&mut self) {
        for cell in self.open_upvalues.drain(..) {
            cell.close();
        }
    }

    fn current_frame_label(&self) -> String {
        format!("{}:{}", self.prototype.source_name, self.prototype.line_for_pc(self.pc))
    }

    fn fetch(&self) -> LuaResult<Instruction> {
        self.prototype
            .instructions
            .get(self.pc)
            .copied()
            .ok_or_else(|| {
                RuntimeError::new(ActivationErrorKind::UnknownOpcode, "program counter out of range")
            })
    }

    /// The fetch/decode/dispatch loop. Consumes `self` so that a
    /// suspending `CALL` can move this activation onto the coroutine's
    /// resume stack without cloning it.
    pub fn run(mut self, ctx: &mut ExecutionContext) -> LuaResult<Control> {
        loop {
            let pc = self.pc;
            let instr = match self.fetch() {
                Ok(i) => i,
                Err(e) => {
                    self.close_all_upvalues();
                    return Err(e.with_frame(self.current_frame_label()));
                }
            };
            let is_call = matches!(instr.opcode, OpCode::Call | OpCode::TailCall);
            self.pc = pc + 1;
            match dispatch::step(&mut self, &instr, ctx) {
                Ok(StepOutcome::Continue) => {
                    if is_call && ctx.debug.should_pause_at_call() {
                        ctx.debug.push_paused(self);
                        return Ok(Control::DebugPause);
                    }
                    continue;
                }
                Ok(StepOutcome::Return(values)) => {
                    self.close_all_upvalues();
                    return Ok(Control::Return(values));
                }
                Ok(StepOutcome::PropagateYield(values)) => {
                    self.pc = pc;
                    ctx.coroutine.push_suspended(self);
                    return Ok(Control::Yield(values));
                }
                Ok(StepOutcome::PropagatePause) => {
                    self.pc = pc;
                    ctx.debug.push_paused(self);
                    return Ok(Control::DebugPause);
                }
                Err(e) => {
                    let frame = self.current_frame_label();
                    self.close_all_upvalues();
                    return Err(e.with_frame(frame));
                }
            }
        }
    }
}
