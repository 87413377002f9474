//! # Introduction
//!
//! Polstack parses and executes a small stack-based language whose values are
//! machine integers and single-variable polynomials with real coefficients.
//! Programs are flat sequences of one-statement lines; control flow jumps to
//! source line numbers.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Automaton → Tokens + NameTable → Reports
//!                                        → Machine
//! ```
//!
//! 1. [`parser`] — a table-driven automaton scans the source into tokens and
//!    interns variables and constants into a name table.
//! 2. [`report`] — listings of the token sequence, the executable tokens with
//!    resolved operands, and the lines holding lexical errors.
//! 3. [`interpreter`] — the stack machine: an operand stack of tagged
//!    [`interpreter::Value`]s, a variable store, and line-number jumps.
//! 4. [`poly`] — sparse polynomial arithmetic: ring operations, Euclidean
//!    division, evaluation, derivatives, and the bracketed literal syntax.
//!
//! ## The language
//!
//! Statements: `push`, `pop`, `jmp`, `ji`, `read`, `write`, `end`, the five
//! arithmetic operators, six relational operators, and the polynomial
//! queries `atpow`, `deg`, `derivative`, `value`. Comments start with `;`.

pub mod interpreter;
pub mod parser;
pub mod poly;
pub mod report;
