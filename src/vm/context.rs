use std::cell::RefCell;
use std::rc::Rc;

use crate::value::LuaTable;
use crate::vm::coroutine::CoroutineController;
use crate::vm::debug::DebugController;

/// Everything an `Activation` needs that isn't scoped to one call: the
/// coroutine suspend/resume machinery, an optional attached debugger,
/// and the string library table methods like `s:upper()` resolve
/// against. Threaded explicitly through every `invoke`/`resume` call
/// rather than reached via process-wide statics, so multiple
/// independent interpreter instances never share state by accident —
/// see SPEC_FULL.md §9 on replacing the original's global VM table.
pub struct ExecutionContext {
    pub coroutine: CoroutineController,
    pub debug: DebugController,
    pub string_library: Option<Rc<RefCell<LuaTable>>>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        ExecutionContext {
            coroutine: CoroutineController::new(),
            debug: DebugController::new(),
            string_library: None,
        }
    }

    pub fn with_string_library(mut self, library: Rc<RefCell<LuaTable>>) -> Self {
        self.string_library = Some(library);
        self
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        ExecutionContext::new()
    }
}
