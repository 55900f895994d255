use crate::value::Value;
use crate::vm::activation::Activation;
use crate::vm::callable::{Callable, Control};
use crate::vm::context::ExecutionContext;
use crate::vm::error::{ActivationErrorKind, LuaResult, RuntimeError};

/// Coroutine lifecycle, mirroring the states the teacher's own
/// coroutine library exposes to scripts (`"suspended"`, `"running"`,
/// `"dead"`), minus `"normal"` — this core only ever tracks a single
/// nested suspend chain rather than a full coroutine table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoroutineStatus {
    Idle,
    Running,
    Suspended,
    Dead,
}

/// Owns the chain of activations suspended by a `CALL` that crossed a
/// yield boundary. Nesting pushes the innermost (deepest-calling)
/// activation first; resuming pops the outermost (entry-point)
/// activation first, so that activation's re-entered `CALL` drives the
/// next pop in turn. See SPEC_FULL.md §5 for the exact ordering
/// invariant this preserves.
pub struct CoroutineController {
    status: CoroutineStatus,
    resume_stack: Vec<Activation>,
}

impl CoroutineController {
    pub fn new() -> Self {
        CoroutineController {
            status: CoroutineStatus::Idle,
            resume_stack: Vec::new(),
        }
    }

    pub fn status(&self) -> CoroutineStatus {
        self.status
    }

    pub fn is_suspended(&self) -> bool {
        self.status == CoroutineStatus::Suspended
    }

    pub fn set_running(&mut self) {
        self.status = CoroutineStatus::Running;
    }

    pub fn set_dead(&mut self) {
        self.status = CoroutineStatus::Dead;
        self.resume_stack.clear();
    }

    /// Records one more activation on the suspend cascade, called
    /// innermost-first as a yield unwinds outward through nested calls.
    pub fn push_suspended(&mut self, activation: Activation) {
        self.resume_stack.push(activation);
        self.status = CoroutineStatus::Suspended;
    }

    /// Pops the next activation to resume, outermost-first. Empty once
    /// the whole cascade has been replayed.
    pub fn pop_for_resume(&mut self) -> Option<Activation> {
        let activation = self.resume_stack.pop();
        if self.resume_stack.is_empty() {
            self.status = CoroutineStatus::Idle;
        }
        activation
    }

    pub fn is_exhausted(&self) -> bool {
        self.resume_stack.is_empty()
    }
}

impl Default for CoroutineController {
    fn default() -> Self {
        CoroutineController::new()
    }
}

/// The values a `yield` carries out, or that a `resume` carries back
/// in; both directions use a plain vector since either side may pass
/// zero, one, or many values.
pub type TransferValues = Vec<Value>;

/// The native function a coroutine body calls to suspend itself.
/// Recognized purely through `invoke_resumable`: reporting
/// `Control::Yield` immediately, with no activation of its own to push,
/// is what makes it the base case of the suspend cascade described on
/// `CoroutineController`.
pub struct YieldCallable;

impl Callable for YieldCallable {
    fn call(&self, _args: Vec<Value>, _ctx: &mut ExecutionContext) -> LuaResult<Vec<Value>> {
        Err(RuntimeError::new(
            ActivationErrorKind::HostError,
            "attempt to yield from outside a coroutine",
        ))
    }

    fn invoke_resumable(&self, args: Vec<Value>, _ctx: &mut ExecutionContext) -> LuaResult<Control> {
        Ok(Control::Yield(args))
    }

    fn name(&self) -> &str {
        "yield"
    }
}

/// Starts a coroutine body running. Equivalent to an ordinary call
/// except it goes through `invoke_resumable` so an immediate yield is
/// reported rather than turned into an error.
pub fn start(
    callable: &dyn Callable,
    args: Vec<Value>,
    ctx: &mut ExecutionContext,
) -> LuaResult<Control> {
    ctx.coroutine.set_running();
    let outcome = callable.invoke_resumable(args, ctx)?;
    if let Control::Return(_) = &outcome {
        ctx.coroutine.set_dead();
    }
    Ok(outcome)
}

/// Resumes a previously suspended coroutine with `values`, replaying
/// the suspend cascade from the outermost activation inward: each
/// activation's re-entered `CALL` either resumes the next, deeper
/// activation still on the stack, or — once the stack bottoms out at
/// the activation that called `yield` directly — splices `values` in
/// as that call's result.
pub fn resume(ctx: &mut ExecutionContext, values: Vec<Value>) -> LuaResult<Control> {
    if !ctx.coroutine.is_suspended() {
        return Err(RuntimeError::new(
            ActivationErrorKind::HostError,
            "cannot resume a coroutine that is not suspended",
        ));
    }
    ctx.coroutine.set_running();
    let outcome = resume_next(ctx, values)?;
    if let Control::Return(_) = &outcome {
        ctx.coroutine.set_dead();
    }
    Ok(outcome)
}

fn resume_next(ctx: &mut ExecutionContext, incoming: Vec<Value>) -> LuaResult<Control> {
    let mut activation = ctx
        .coroutine
        .pop_for_resume()
        .expect("resume_next called with nothing suspended");
    let exhausted = ctx.coroutine.is_exhausted();
    let spliced = if exhausted {
        incoming
    } else {
        match resume_next(ctx, incoming)? {
            Control::Return(vals) => vals,
            Control::Yield(vals) => {
                ctx.coroutine.push_suspended(activation);
                return Ok(Control::Yield(vals));
            }
            Control::DebugPause => {
                ctx.coroutine.push_suspended(activation);
                return Ok(Control::DebugPause);
            }
        }
    };
    activation.set_pending_resume(spliced);
    activation.run(ctx)
}
