//! Runtime error types
//!
//! [`RuntimeError`] covers every fault the machine can hit while executing a
//! program, as opposed to lexical errors, which are tokens. All runtime errors
//! are fatal and halt execution. Each variant carries the 1-based source line
//! of the token being executed so the failure can be traced to its statement.

use thiserror::Error;

/// Runtime errors that can occur during execution.
///
/// The message describes the fault; [`RuntimeError::line`] gives the source
/// line for callers that report it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("'{op}' on an empty stack")]
    StackUnderflow { op: &'static str, line: u32 },

    #[error("variable '{name}' read before assignment")]
    UnboundVariable { name: String, line: u32 },

    #[error("no statement on line {target} to jump to")]
    BadJumpTarget { target: i64, line: u32 },

    #[error("ordering comparison requires two integers")]
    IllegalComparison { line: u32 },

    #[error("division by zero")]
    DivisionByZero { line: u32 },

    #[error("'{op}' requires an integer on top of the stack")]
    IntegerRequired { op: &'static str, line: u32 },

    #[error("malformed input value")]
    MalformedRead { line: u32 },

    #[error("input exhausted")]
    InputExhausted { line: u32 },

    #[error("program contains a lexical error")]
    ErrorToken { line: u32 },

    #[error("token references a name of the wrong kind")]
    BadNameReference { line: u32 },

    #[error("i/o failure: {0}")]
    Io(String),
}

impl RuntimeError {
    /// Source line the error occurred on, when it is tied to a statement.
    pub fn line(&self) -> Option<u32> {
        match self {
            RuntimeError::StackUnderflow { line, .. }
            | RuntimeError::UnboundVariable { line, .. }
            | RuntimeError::BadJumpTarget { line, .. }
            | RuntimeError::IllegalComparison { line }
            | RuntimeError::DivisionByZero { line }
            | RuntimeError::IntegerRequired { line, .. }
            | RuntimeError::MalformedRead { line }
            | RuntimeError::InputExhausted { line }
            | RuntimeError::ErrorToken { line }
            | RuntimeError::BadNameReference { line } => Some(*line),
            RuntimeError::Io(_) => None,
        }
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(e: std::io::Error) -> Self {
        RuntimeError::Io(e.to_string())
    }
}
