pub mod activation;
pub mod callable;
pub mod context;
pub mod coroutine;
pub mod debug;
mod dispatch;
pub mod error;
pub mod opcode;
pub mod prototype;
pub mod register_file;
pub mod upvalue;

pub use activation::{Activation, LuaClosure};
pub use callable::{Callable, Control, NativeFunction};
pub use context::ExecutionContext;
pub use coroutine::{CoroutineController, CoroutineStatus};
pub use debug::DebugController;
pub use error::{ActivationErrorKind, LuaResult, RuntimeError};
pub use opcode::{decode_rk, Instruction, OpCode, Rk};
pub use prototype::{FunctionPrototype, UpvalueSource};
pub use register_file::RegisterFile;
pub use upvalue::UpvalueCell;
