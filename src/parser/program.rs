//! The automaton's output: a parsed program
//!
//! A [`ParsedProgram`] owns the token sequence and name table produced by one
//! run of the automaton. It is immutable after parsing; the interpreter and
//! the report printers borrow it read-only.

use super::names::NameTable;
use super::token::{Token, TokenKind};

/// A fully scanned program: source name, token sequence, and name table.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedProgram {
    source_name: String,
    tokens: Vec<Token>,
    names: NameTable,
}

impl ParsedProgram {
    pub fn new(source_name: &str, tokens: Vec<Token>, names: NameTable) -> Self {
        ParsedProgram {
            source_name: source_name.to_string(),
            tokens,
            names,
        }
    }

    /// The degenerate program produced when the source file cannot be
    /// opened: a single `Error` token on line 1 and an empty name table.
    pub fn unreadable(source_name: &str) -> Self {
        ParsedProgram {
            source_name: source_name.to_string(),
            tokens: vec![Token::new(TokenKind::Error, 1)],
            names: NameTable::new(),
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn names(&self) -> &NameTable {
        &self.names
    }

    /// Number of `Error` tokens in the program. Nonzero means the program
    /// must not be executed.
    pub fn error_count(&self) -> usize {
        self.tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Error)
            .count()
    }

    /// Source lines containing lexical errors, in token order. The automaton
    /// emits at most one `Error` token per offending line.
    pub fn error_lines(&self) -> Vec<u32> {
        self.tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Error)
            .map(|t| t.line)
            .collect()
    }
}
