use crate::value::Value;
use crate::vm::context::ExecutionContext;
use crate::vm::error::LuaResult;

/// The result of driving a callable forward one invocation: either it
/// ran to completion, or it suspended partway through by yielding.
/// Plain native functions never produce `Yield`; only `LuaClosure`
/// bodies (directly, or transitively through a nested call) can.
pub enum Control {
    Return(Vec<Value>),
    Yield(Vec<Value>),
    /// A debugger requested a pause at the `CALL`/`TAILCALL` boundary
    /// that just completed; no values are carried since, unlike a
    /// yield, nothing was produced to splice in — resuming simply
    /// continues the paused activation where it left off.
    DebugPause,
}

/// Anything `CALL`/`TAILCALL` can invoke: a closure over this crate's
/// own bytecode (`LuaClosure`, see `activation.rs`) or a host-provided
/// native function. Dispatch goes through this trait rather than an
/// enum so embedders can add their own `Callable` impls without
/// touching this crate, the same seam the teacher's VM exposes through
/// its C-function registration.
pub trait Callable {
    fn call(&self, args: Vec<Value>, ctx: &mut ExecutionContext) -> LuaResult<Vec<Value>>;

    /// The suspension-aware entry point `CALL`/`TAILCALL` actually use.
    /// The default simply wraps `call`'s result; `LuaClosure` overrides
    /// it to run its activation loop directly, which may report
    /// `Control::Yield` instead of finishing.
    fn invoke_resumable(&self, args: Vec<Value>, ctx: &mut ExecutionContext) -> LuaResult<Control> {
        self.call(args, ctx).map(Control::Return)
    }

    fn name(&self) -> &str {
        "?"
    }
}

/// Wraps a host Rust closure as a `Callable`, for library functions
/// that don't need their own named type.
pub struct NativeFunction<F> {
    name: String,
    func: F,
}

impl<F> NativeFunction<F>
where
    F: Fn(Vec<Value>, &mut ExecutionContext) -> LuaResult<Vec<Value>>,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        NativeFunction {
            name: name.into(),
            func,
        }
    }
}

impl<F> Callable for NativeFunction<F>
where
    F: Fn(Vec<Value>, &mut ExecutionContext) -> LuaResult<Vec<Value>>,
{
    fn call(&self, args: Vec<Value>, ctx: &mut ExecutionContext) -> LuaResult<Vec<Value>> {
        (self.func)(args, ctx)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
