use crate::vm::activation::Activation;
use crate::vm::callable::Control;
use crate::vm::context::ExecutionContext;
use crate::vm::error::LuaResult;

/// Owns the chain of activations suspended by a `CALL`/`TAILCALL` that
/// crossed a debugger pause request, mirroring `CoroutineController`'s
/// resume stack: nesting pushes the innermost activation first,
/// resuming pops the outermost first so its re-entered `CALL` drives
/// the next pop in turn.
pub struct DebugController {
    resume_stack: Vec<Activation>,
    step_requested: bool,
}

impl DebugController {
    pub fn new() -> Self {
        DebugController {
            resume_stack: Vec::new(),
            step_requested: false,
        }
    }

    pub fn request_step(&mut self) {
        self.step_requested = true;
    }

    pub fn should_pause_at_call(&self) -> bool {
        self.step_requested
    }

    /// Records one more activation on the pause cascade, called
    /// innermost-first as a pause unwinds outward through nested calls.
    pub fn push_paused(&mut self, activation: Activation) {
        self.step_requested = false;
        self.resume_stack.push(activation);
    }

    /// Pops the next activation to resume, outermost-first. Empty once
    /// the whole cascade has been replayed.
    pub fn pop_for_resume(&mut self) -> Option<Activation> {
        self.resume_stack.pop()
    }

    pub fn is_exhausted(&self) -> bool {
        self.resume_stack.is_empty()
    }

    pub fn is_paused(&self) -> bool {
        !self.resume_stack.is_empty()
    }
}

impl Default for DebugController {
    fn default() -> Self {
        DebugController::new()
    }
}

/// Resumes a previously debug-paused activation chain, replaying it
/// outermost-first: each activation's re-entered `CALL` either resumes
/// the next, deeper activation still on the stack, or — once the stack
/// bottoms out at the activation that was paused directly — simply
/// continues it where it left off, since unlike `coroutine::resume`
/// there are no external values to splice in.
pub fn resume(ctx: &mut ExecutionContext) -> LuaResult<Control> {
    resume_next(ctx)
}

fn resume_next(ctx: &mut ExecutionContext) -> LuaResult<Control> {
    let mut activation = ctx
        .debug
        .pop_for_resume()
        .expect("debug::resume called with nothing paused");
    if ctx.debug.is_exhausted() {
        return activation.run(ctx);
    }
    match resume_next(ctx)? {
        Control::Return(values) => {
            activation.set_pending_resume(values);
            activation.run(ctx)
        }
        Control::Yield(values) => {
            ctx.coroutine.push_suspended(activation);
            Ok(Control::Yield(values))
        }
        Control::DebugPause => {
            ctx.debug.push_paused(activation);
            Ok(Control::DebugPause)
        }
    }
}
