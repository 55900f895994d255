use crate::value::Value;
use crate::vm::context::ExecutionContext;
use crate::vm::error::{ActivationErrorKind, LuaResult, RuntimeError};

pub fn lookup(v: &Value, name: &str) -> Option<Value> {
    v.as_table().and_then(|t| t.borrow().metamethod(name))
}

/// Looks on `a` first, then `b` — the order the teacher's own
/// metamethod resolution (`try_unary_tm`/`handle_mmbin`) uses.
pub fn lookup_binary(a: &Value, b: &Value, name: &str) -> Option<Value> {
    lookup(a, name).or_else(|| lookup(b, name))
}

pub fn invoke(handler: Value, args: Vec<Value>, ctx: &mut ExecutionContext) -> LuaResult<Value> {
    let callable = handler.as_callable().ok_or_else(|| {
        RuntimeError::new(ActivationErrorKind::CallNonCallable, "metamethod is not callable")
    })?;
    let mut results = callable.call(args, ctx)?;
    Ok(if results.is_empty() {
        Value::Nil
    } else {
        results.remove(0)
    })
}
