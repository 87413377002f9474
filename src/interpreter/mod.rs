//! Stack-machine execution engine
//!
//! This module executes a parsed program:
//! - [`value`]: the runtime value model (integers and polynomials)
//! - [`machine`]: the stack machine itself
//! - [`errors`]: runtime error types
//!
//! # Execution Model
//!
//! The machine walks the token sequence one statement at a time, driven by a
//! program counter. `jmp` and `ji` redirect it to the first token of a named
//! source line; `end`, the end-of-file marker, or a runtime error stop it.
//! A program whose token sequence still contains `Error` tokens must not be
//! run at all; reaching one at runtime is itself a fatal error.

pub mod errors;
pub mod machine;
pub mod value;

pub use errors::RuntimeError;
pub use machine::Machine;
pub use value::Value;
