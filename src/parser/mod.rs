//! Parsing pipeline for the stack language
//!
//! Source text goes through a single table-driven pass:
//!
//! 1. [`automaton`] classifies characters and drives the state machine
//! 2. [`names`] interns variables and constants referenced by tokens
//! 3. [`program`] holds the finished token sequence and name table
//!
//! Parsing never fails as a whole. Ill-formed lines become `Error` tokens and
//! the caller decides whether the program may run.

pub mod automaton;
pub mod names;
pub mod program;
pub mod token;

use std::fs;
use std::path::Path;

pub use automaton::scan;
pub use names::{NameEntry, NameTable};
pub use program::ParsedProgram;
pub use token::{ArithOp, Relation, Token, TokenKind};

/// Parse a program from a file. An unreadable file yields the degenerate
/// program whose only token is an `Error` on line 1, so the failure surfaces
/// through the same reporting path as a lexical error.
pub fn parse_file<P: AsRef<Path>>(path: P) -> ParsedProgram {
    let path = path.as_ref();
    let name = path.to_string_lossy();
    match fs::read_to_string(path) {
        Ok(text) => scan(&name, &text),
        Err(_) => ParsedProgram::unreadable(&name),
    }
}
