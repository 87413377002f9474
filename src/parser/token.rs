//! Token model for the stack language
//!
//! The automaton produces a flat sequence of [`Token`]s. Each token carries a
//! [`TokenKind`] and the 1-based source line it was found on. Name-referencing
//! tokens (`push`, `pop`, `jmp`, `ji`) carry an index into the program's
//! [`NameTable`](super::names::NameTable) rather than the name itself.

use std::fmt;

/// Arithmetic operators of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl ArithOp {
    /// The surface character for this operator.
    pub fn symbol(self) -> char {
        match self {
            ArithOp::Add => '+',
            ArithOp::Sub => '-',
            ArithOp::Mul => '*',
            ArithOp::Div => '/',
            ArithOp::Rem => '%',
        }
    }

    pub fn from_char(c: char) -> Option<ArithOp> {
        match c {
            '+' => Some(ArithOp::Add),
            '-' => Some(ArithOp::Sub),
            '*' => Some(ArithOp::Mul),
            '/' => Some(ArithOp::Div),
            '%' => Some(ArithOp::Rem),
            _ => None,
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Relational operators. `=` doubles as the equality operator; the
/// two-character forms are produced by the automaton combining a one-character
/// relation with a trailing `=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Relation::Equal => "=",
            Relation::NotEqual => "!=",
            Relation::Less => "<",
            Relation::LessOrEqual => "<=",
            Relation::Greater => ">",
            Relation::GreaterOrEqual => ">=",
        };
        write!(f, "{}", text)
    }
}

/// All token variants produced by the automaton.
///
/// The `usize` payloads are name-table indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    Push(usize),
    Pop(usize),
    Jmp(usize),
    Ji(usize),
    Read,
    Write,
    End,
    Arith(ArithOp),
    Cmp(Relation),
    Atpow,
    Deg,
    Derivative,
    Value,
    Comment,
    Error,
    EndOfFile,
}

impl TokenKind {
    /// The name-table index this token references, if any.
    pub fn name_index(&self) -> Option<usize> {
        match self {
            TokenKind::Push(i) | TokenKind::Pop(i) | TokenKind::Jmp(i) | TokenKind::Ji(i) => {
                Some(*i)
            }
            _ => None,
        }
    }

    /// True for tokens the interpreter executes (everything except comments,
    /// errors, and the end-of-file marker).
    pub fn is_executable(&self) -> bool {
        !matches!(
            self,
            TokenKind::Comment | TokenKind::Error | TokenKind::EndOfFile
        )
    }
}

/// One lexical unit of a program, tagged with its 1-based source line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: u32,
}

impl Token {
    pub fn new(kind: TokenKind, line: u32) -> Self {
        Token { kind, line }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<2}: (", self.line)?;
        match self.kind {
            TokenKind::Push(i) => write!(f, "push, {}", i)?,
            TokenKind::Pop(i) => write!(f, "pop, {}", i)?,
            TokenKind::Jmp(i) => write!(f, "jmp, {}", i)?,
            TokenKind::Ji(i) => write!(f, "ji, {}", i)?,
            TokenKind::Read => write!(f, "read")?,
            TokenKind::Write => write!(f, "write")?,
            TokenKind::End => write!(f, "end")?,
            TokenKind::Arith(op) => write!(f, "{}", op)?,
            TokenKind::Cmp(rel) => write!(f, "{}", rel)?,
            TokenKind::Atpow => write!(f, "atpow")?,
            TokenKind::Deg => write!(f, "deg")?,
            TokenKind::Derivative => write!(f, "derivative")?,
            TokenKind::Value => write!(f, "value")?,
            TokenKind::Comment => write!(f, "comment")?,
            TokenKind::Error => write!(f, "error")?,
            TokenKind::EndOfFile => write!(f, "end of file")?,
        }
        write!(f, ")")
    }
}
