use std::fmt;

/// A cheap, `Copy` discriminant for what went wrong, analogous to the
/// teacher's `LuaError` — useful on its own when a caller only needs to
/// branch on the failure kind (e.g. to decide whether a pcall-style
/// boundary should swallow it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationErrorKind {
    IndexNil,
    ArithOnNonNumeric,
    ConcatOnNonStringNumber,
    LengthOfNil,
    CallNonCallable,
    UnknownOpcode,
    HostError,
}

impl fmt::Display for ActivationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActivationErrorKind::IndexNil => "index nil",
            ActivationErrorKind::ArithOnNonNumeric => "arithmetic on non-numeric value",
            ActivationErrorKind::ConcatOnNonStringNumber => "concatenate non-string/number value",
            ActivationErrorKind::LengthOfNil => "length of nil",
            ActivationErrorKind::CallNonCallable => "call a non-callable value",
            ActivationErrorKind::UnknownOpcode => "unknown opcode",
            ActivationErrorKind::HostError => "host error",
        };
        write!(f, "{s}")
    }
}

/// The rich error type activations actually propagate: a kind, a
/// human-readable message, and the stack of source locations the error
/// passed through on its way up, accumulated one frame at a time as it
/// unwinds through nested `CALL`s — mirroring the teacher's
/// `LuaFullError`, which wraps a bare `LuaError` with a message and a
/// traceback.
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub kind: ActivationErrorKind,
    pub message: String,
    pub frames: Vec<String>,
}

impl RuntimeError {
    pub fn new(kind: ActivationErrorKind, message: impl Into<String>) -> Self {
        RuntimeError {
            kind,
            message: message.into(),
            frames: Vec::new(),
        }
    }

    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.frames.push(frame.into());
        self
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        for frame in &self.frames {
            write!(f, "\n\tat {frame}")?;
        }
        Ok(())
    }
}

impl std::error::Error for RuntimeError {}

pub type LuaResult<T> = Result<T, RuntimeError>;
