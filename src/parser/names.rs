//! Name table: interned variables and constants
//!
//! Name-referencing tokens carry indices into a per-program [`NameTable`].
//! Interning guarantees at most one entry per distinct variable name and per
//! distinct constant value (by value equality). Lookups are linear scans;
//! programs are small and the table is only built once, during parsing.

use std::fmt;

use crate::poly::Polynomial;

/// A named object referenced from the token stream.
#[derive(Debug, Clone, PartialEq)]
pub enum NameEntry {
    Variable(String),
    IntConst(i64),
    PolConst(Polynomial),
}

impl fmt::Display for NameEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameEntry::Variable(name) => write!(f, "variable: {}", name),
            NameEntry::IntConst(value) => write!(f, "constant: {}", value),
            NameEntry::PolConst(poly) => write!(f, "constant: {}", poly),
        }
    }
}

/// The interned table of variables and constants for one program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameTable {
    entries: Vec<NameEntry>,
}

impl NameTable {
    pub fn new() -> Self {
        NameTable::default()
    }

    pub fn entries(&self) -> &[NameEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&NameEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Intern an integer constant, returning the index of the existing entry
    /// with the same value or of a freshly appended one.
    pub fn intern_int(&mut self, value: i64) -> usize {
        let found = self
            .entries
            .iter()
            .position(|e| matches!(e, NameEntry::IntConst(v) if *v == value));
        match found {
            Some(index) => index,
            None => {
                self.entries.push(NameEntry::IntConst(value));
                self.entries.len() - 1
            }
        }
    }

    /// Intern a variable by name.
    pub fn intern_variable(&mut self, name: &str) -> usize {
        let found = self
            .entries
            .iter()
            .position(|e| matches!(e, NameEntry::Variable(n) if n == name));
        match found {
            Some(index) => index,
            None => {
                self.entries.push(NameEntry::Variable(name.to_string()));
                self.entries.len() - 1
            }
        }
    }

    /// Intern a polynomial constant by value equality, not representation.
    pub fn intern_poly(&mut self, poly: &Polynomial) -> usize {
        let found = self
            .entries
            .iter()
            .position(|e| matches!(e, NameEntry::PolConst(p) if p == poly));
        match found {
            Some(index) => index,
            None => {
                self.entries.push(NameEntry::PolConst(poly.clone()));
                self.entries.len() - 1
            }
        }
    }
}
