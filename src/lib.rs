//! Register-based bytecode interpreter core: activations, upvalues,
//! metamethod dispatch and cooperative suspension for a dynamically
//! typed scripting language. Bytecode loading, a standard library and
//! a garbage collector are external collaborators this crate does not
//! provide — see DESIGN.md.

pub mod value;
pub mod vm;

pub use value::{is_numeric, to_display_string, to_number, truthy, LuaTable, TableKey, Value};
pub use vm::{
    Activation, ActivationErrorKind, Callable, Control, CoroutineController, CoroutineStatus,
    DebugController, ExecutionContext, FunctionPrototype, Instruction, LuaClosure, LuaResult,
    NativeFunction, OpCode, RegisterFile, RuntimeError, UpvalueCell, UpvalueSource,
};

#[cfg(test)]
mod test;
