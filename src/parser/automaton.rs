//! Table-driven lexer/parser automaton
//!
//! Converts source text into a [`ParsedProgram`] in a single pass. Each input
//! character is first classified into a [`Symbol`]; the pair of the current
//! [`State`] and that symbol selects a transition, which performs its side
//! effects (accumulating registers, emitting a token, interning a name-table
//! entry) and yields the next state. Any pair without an explicit transition
//! falls into the error trap: one `Error` token is emitted for the offending
//! line and the rest of the line is consumed silently.
//!
//! Keyword recognition walks [`KEYWORD_TABLE`], a trie flattened into rows of
//! `(expected letter, sibling row, completion)`. A per-first-letter vector
//! selects the starting row; matching letters advance to the next row until a
//! row completes a keyword, and a mismatch retries the sibling row until the
//! alternatives run out.
//!
//! Polynomial literals (`[±power:coefficient ...]`) are accumulated term by
//! term into a working [`Polynomial`] and interned as a constant when the
//! closing bracket commits the literal. The sign written before the power is
//! the sign of the term's coefficient, matching the printed form.

use crate::poly::Polynomial;

use super::names::NameTable;
use super::program::ParsedProgram;
use super::token::{ArithOp, Relation, Token, TokenKind};

/// Symbolic classification of one input character.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Symbol {
    Letter(char),
    Digit(u8),
    Arith(ArithOp),
    Cmp(CmpChar),
    Space,
    Newline,
    Semicolon,
    LBracket,
    RBracket,
    Dot,
    Colon,
    Other,
    EndOfInput,
}

/// The four characters that can begin a relational operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CmpChar {
    Negation,
    Equal,
    Less,
    Greater,
}

impl CmpChar {
    /// The one-character relation this symbol stands for on its own, if any.
    /// A bare `!` is not a complete operator.
    fn relation(self) -> Option<Relation> {
        match self {
            CmpChar::Negation => None,
            CmpChar::Equal => Some(Relation::Equal),
            CmpChar::Less => Some(Relation::Less),
            CmpChar::Greater => Some(Relation::Greater),
        }
    }
}

fn classify(c: char) -> Symbol {
    match c {
        'a'..='z' | 'A'..='Z' => Symbol::Letter(c),
        '0'..='9' => Symbol::Digit(c as u8 - b'0'),
        '+' | '-' | '*' | '/' | '%' => {
            // from_char cannot fail for these five characters
            match ArithOp::from_char(c) {
                Some(op) => Symbol::Arith(op),
                None => Symbol::Other,
            }
        }
        '=' => Symbol::Cmp(CmpChar::Equal),
        '!' => Symbol::Cmp(CmpChar::Negation),
        '<' => Symbol::Cmp(CmpChar::Less),
        '>' => Symbol::Cmp(CmpChar::Greater),
        ' ' | '\t' | '\r' => Symbol::Space,
        '\n' => Symbol::Newline,
        ';' => Symbol::Semicolon,
        '[' => Symbol::LBracket,
        ']' => Symbol::RBracket,
        '.' => Symbol::Dot,
        ':' => Symbol::Colon,
        _ => Symbol::Other,
    }
}

/// Automaton states. The families mirror the grammar: token search, keyword
/// collection, relational disambiguation, argument collection, numeric and
/// polynomial literal accumulation, comment skipping, and the error trap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Searching for a token before the first statement of the program.
    SeekFirst,
    /// Searching for the next token.
    Seek,
    /// Collecting the letters of a keyword.
    Keyword,
    /// A complete token was emitted; only whitespace, a comment, or the line
    /// end may follow.
    AfterToken,
    /// A relational character was seen; a trailing `=` may extend it.
    CmpPending,
    /// Keyword needing an argument was recognised; a space must follow.
    AfterPush,
    AfterJump,
    AfterPop,
    /// Skipping spaces before the keyword's argument.
    PushArg,
    JumpArg,
    PopArg,
    /// Accumulating an integer constant.
    Number,
    /// Accumulating a variable name.
    Identifier,
    /// Comment on a line with no preceding statement.
    CommentFirst,
    /// Comment following a statement.
    Comment,
    /// Error trap: consuming the rest of an ill-formed line.
    ErrorSkip,
    /// Inside a polynomial literal, between terms.
    PolyTerm,
    /// After a term sign, before the power digits.
    PowerStart,
    /// Accumulating power digits.
    PowerDigits,
    /// After the power, before the colon.
    PowerEnd,
    /// After the colon, before the coefficient digits.
    CoeffStart,
    /// Accumulating the integer part of a coefficient.
    CoeffInt,
    /// Accumulating the fractional part of a coefficient.
    CoeffFrac,
    /// Terminal state; the `EndOfFile` token has been emitted.
    Stop,
}

/// Which argument-taking keyword the current statement started with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingRef {
    Push,
    Pop,
    Jmp,
    Ji,
}

impl PendingRef {
    fn token(self, index: usize) -> TokenKind {
        match self {
            PendingRef::Push => TokenKind::Push(index),
            PendingRef::Pop => TokenKind::Pop(index),
            PendingRef::Jmp => TokenKind::Jmp(index),
            PendingRef::Ji => TokenKind::Ji(index),
        }
    }
}

/// What matching a keyword-table row means.
#[derive(Debug, Clone, Copy)]
enum RowAction {
    /// Letter matched mid-keyword; advance to the next row.
    Advance,
    /// Letter completed a keyword that is a whole token by itself.
    Emit(TokenKind),
    /// Letter completed a keyword that requires an argument.
    Await(PendingRef),
}

/// One row of the flattened keyword trie.
struct KeywordRow {
    letter: char,
    /// Sibling row to try when `letter` does not match, if any.
    alt: Option<usize>,
    action: RowAction,
}

const fn row(letter: char, alt: Option<usize>, action: RowAction) -> KeywordRow {
    KeywordRow { letter, alt, action }
}

/// Starting row in [`KEYWORD_TABLE`] for each lowercase first letter, or
/// `None` when no keyword starts with that letter.
const INIT_VECTOR: [Option<usize>; 26] = {
    let mut v = [None; 26];
    v[(b'a' - b'a') as usize] = Some(17);
    v[(b'd' - b'a') as usize] = Some(21);
    v[(b'e' - b'a') as usize] = Some(0);
    v[(b'j' - b'a') as usize] = Some(2);
    v[(b'p' - b'a') as usize] = Some(5);
    v[(b'r' - b'a') as usize] = Some(10);
    v[(b'v' - b'a') as usize] = Some(31);
    v[(b'w' - b'a') as usize] = Some(13);
    v
};

/// The keyword trie, flattened. Rows for keywords sharing a first letter are
/// chained through `alt`: `ji`/`jmp`, `pop`/`push`, and `deg`/`derivative`.
const KEYWORD_TABLE: [KeywordRow; 35] = [
    // end
    row('n', None, RowAction::Advance),
    row('d', None, RowAction::Emit(TokenKind::End)),
    // ji | jmp
    row('i', Some(3), RowAction::Await(PendingRef::Ji)),
    row('m', None, RowAction::Advance),
    row('p', None, RowAction::Await(PendingRef::Jmp)),
    // pop | push
    row('o', Some(7), RowAction::Advance),
    row('p', None, RowAction::Await(PendingRef::Pop)),
    row('u', None, RowAction::Advance),
    row('s', None, RowAction::Advance),
    row('h', None, RowAction::Await(PendingRef::Push)),
    // read
    row('e', None, RowAction::Advance),
    row('a', None, RowAction::Advance),
    row('d', None, RowAction::Emit(TokenKind::Read)),
    // write
    row('r', None, RowAction::Advance),
    row('i', None, RowAction::Advance),
    row('t', None, RowAction::Advance),
    row('e', None, RowAction::Emit(TokenKind::Write)),
    // atpow
    row('t', None, RowAction::Advance),
    row('p', None, RowAction::Advance),
    row('o', None, RowAction::Advance),
    row('w', None, RowAction::Emit(TokenKind::Atpow)),
    // deg | derivative
    row('e', None, RowAction::Advance),
    row('g', Some(23), RowAction::Emit(TokenKind::Deg)),
    row('r', None, RowAction::Advance),
    row('i', None, RowAction::Advance),
    row('v', None, RowAction::Advance),
    row('a', None, RowAction::Advance),
    row('t', None, RowAction::Advance),
    row('i', None, RowAction::Advance),
    row('v', None, RowAction::Advance),
    row('e', None, RowAction::Emit(TokenKind::Derivative)),
    // value
    row('a', None, RowAction::Advance),
    row('l', None, RowAction::Advance),
    row('u', None, RowAction::Advance),
    row('e', None, RowAction::Emit(TokenKind::Value)),
];

/// The automaton's working registers and output buffers.
struct Automaton {
    tokens: Vec<Token>,
    names: NameTable,
    line: u32,

    /// Which of push/pop/jmp/ji the current statement started with.
    pending_ref: PendingRef,
    /// One-character relation awaiting a possible trailing `=`. `None` means
    /// a bare `!`, which is never a complete operator.
    cmp: Option<Relation>,
    /// Integer accumulator: constants and polynomial term powers.
    number: i64,
    /// Variable-name accumulator.
    ident: String,

    // Polynomial-literal registers, reset per term.
    sign: f64,
    int_part: i64,
    fract_part: f64,
    fract_count: u32,
    poly: Polynomial,

    /// Current row in [`KEYWORD_TABLE`].
    detection_index: usize,
}

/// Scan source text into a parsed program.
pub fn scan(source_name: &str, text: &str) -> ParsedProgram {
    let mut automaton = Automaton::new();
    let mut state = State::SeekFirst;

    for c in text.chars() {
        if state == State::Stop {
            break;
        }
        state = automaton.step(state, classify(c));
    }
    // The end-of-input marker may need one extra step when it lands inside an
    // ill-formed token (error token first, then the end-of-file token).
    while state != State::Stop {
        state = automaton.step(state, Symbol::EndOfInput);
    }

    ParsedProgram::new(source_name, automaton.tokens, automaton.names)
}

impl Automaton {
    fn new() -> Self {
        Automaton {
            tokens: Vec::new(),
            names: NameTable::new(),
            line: 1,
            pending_ref: PendingRef::Push,
            cmp: None,
            number: 0,
            ident: String::new(),
            sign: 1.0,
            int_part: 0,
            fract_part: 0.0,
            fract_count: 0,
            poly: Polynomial::new(),
            detection_index: 0,
        }
    }

    fn emit(&mut self, kind: TokenKind) {
        self.tokens.push(Token::new(kind, self.line));
    }

    /// Error trap entry: one `Error` token for this line, then consume the
    /// remainder of the line.
    fn trap(&mut self) -> State {
        self.emit(TokenKind::Error);
        State::ErrorSkip
    }

    /// Line-end variant of the trap: the newline has already been consumed,
    /// so the error is recorded and scanning resumes on the next line.
    fn trap_at_line_end(&mut self) -> State {
        self.emit(TokenKind::Error);
        self.line += 1;
        State::Seek
    }

    /// Emit the `EndOfFile` marker and halt.
    fn finish(&mut self) -> State {
        self.emit(TokenKind::EndOfFile);
        State::Stop
    }

    /// Intern the accumulated integer constant and emit the pending
    /// name-referencing token.
    fn emit_int_ref(&mut self) {
        let index = self.names.intern_int(self.number);
        self.emit(self.pending_ref.token(index));
    }

    /// Intern the accumulated variable name and emit the pending
    /// name-referencing token.
    fn emit_var_ref(&mut self) {
        let index = self.names.intern_variable(&self.ident);
        self.emit(self.pending_ref.token(index));
    }

    /// Intern the accumulated polynomial literal and emit the pending
    /// name-referencing token.
    fn emit_poly_ref(&mut self) {
        let index = self.names.intern_poly(&self.poly);
        self.emit(self.pending_ref.token(index));
    }

    /// Fold the finished term into the working polynomial.
    fn commit_term(&mut self) {
        let mut fraction = self.fract_part;
        for _ in 0..self.fract_count {
            fraction /= 10.0;
        }
        let coefficient = self.sign * (self.int_part as f64 + fraction);
        self.poly = &self.poly + &Polynomial::term(self.number as u32, coefficient);
    }

    /// First letter of a statement: select the keyword-table row. Uppercase
    /// letters and letters no keyword starts with are trapped.
    fn begin_keyword(&mut self, c: char) -> State {
        if !c.is_ascii_lowercase() {
            return self.trap();
        }
        match INIT_VECTOR[(c as u8 - b'a') as usize] {
            Some(index) => {
                self.detection_index = index;
                State::Keyword
            }
            None => self.trap(),
        }
    }

    /// Subsequent keyword letter: match against the current row, following
    /// sibling rows on mismatch until the alternatives are exhausted.
    fn keyword_step(&mut self, c: char) -> State {
        loop {
            let current = &KEYWORD_TABLE[self.detection_index];
            if current.letter == c {
                return match current.action {
                    RowAction::Advance => {
                        self.detection_index += 1;
                        State::Keyword
                    }
                    RowAction::Emit(kind) => {
                        self.emit(kind);
                        State::AfterToken
                    }
                    RowAction::Await(pending) => {
                        self.pending_ref = pending;
                        match pending {
                            PendingRef::Push => State::AfterPush,
                            PendingRef::Pop => State::AfterPop,
                            PendingRef::Jmp | PendingRef::Ji => State::AfterJump,
                        }
                    }
                };
            }
            match current.alt {
                Some(alt) => self.detection_index = alt,
                None => return self.trap(),
            }
        }
    }

    /// Extend the pending one-character relation with a trailing character.
    /// Only `=` extends, and only `!`, `<`, `>` can be extended.
    fn combine_cmp(&mut self, next: CmpChar) -> State {
        if next != CmpChar::Equal {
            return self.trap();
        }
        let combined = match self.cmp {
            None => Relation::NotEqual,
            Some(Relation::Less) => Relation::LessOrEqual,
            Some(Relation::Greater) => Relation::GreaterOrEqual,
            Some(_) => return self.trap(),
        };
        self.emit(TokenKind::Cmp(combined));
        State::AfterToken
    }

    /// Emit the pending one-character relation, trapping on a bare `!`.
    /// Returns `None` when trapped.
    fn flush_cmp(&mut self) -> Option<()> {
        match self.cmp {
            Some(rel) => {
                self.emit(TokenKind::Cmp(rel));
                Some(())
            }
            None => None,
        }
    }

    fn step(&mut self, state: State, sym: Symbol) -> State {
        match state {
            State::SeekFirst => match sym {
                Symbol::Letter(c) => self.begin_keyword(c),
                Symbol::Arith(op) => {
                    self.emit(TokenKind::Arith(op));
                    State::AfterToken
                }
                Symbol::Cmp(c) => {
                    self.cmp = c.relation();
                    State::CmpPending
                }
                Symbol::Space => State::SeekFirst,
                Symbol::Newline => {
                    self.line += 1;
                    State::SeekFirst
                }
                Symbol::Semicolon => State::CommentFirst,
                Symbol::EndOfInput => self.finish(),
                _ => self.trap(),
            },

            State::Seek => match sym {
                Symbol::Letter(c) => self.begin_keyword(c),
                Symbol::Arith(op) => {
                    self.emit(TokenKind::Arith(op));
                    State::AfterToken
                }
                Symbol::Cmp(c) => {
                    self.cmp = c.relation();
                    State::CmpPending
                }
                Symbol::Space => State::Seek,
                Symbol::Newline => {
                    self.line += 1;
                    State::Seek
                }
                Symbol::Semicolon => State::Comment,
                Symbol::EndOfInput => self.finish(),
                _ => self.trap(),
            },

            State::Keyword => match sym {
                Symbol::Letter(c) => self.keyword_step(c),
                Symbol::Newline => self.trap_at_line_end(),
                _ => self.trap(),
            },

            State::AfterToken => match sym {
                Symbol::Space => State::AfterToken,
                Symbol::Newline => {
                    self.line += 1;
                    State::Seek
                }
                Symbol::Semicolon => State::Comment,
                Symbol::EndOfInput => self.finish(),
                _ => self.trap(),
            },

            State::CmpPending => match sym {
                Symbol::Cmp(c) => self.combine_cmp(c),
                Symbol::Space => match self.flush_cmp() {
                    Some(()) => State::AfterToken,
                    None => self.trap(),
                },
                Symbol::Newline => match self.flush_cmp() {
                    Some(()) => {
                        self.line += 1;
                        State::Seek
                    }
                    None => self.trap(),
                },
                Symbol::Semicolon => match self.flush_cmp() {
                    Some(()) => State::Comment,
                    None => self.trap(),
                },
                Symbol::EndOfInput => match self.flush_cmp() {
                    Some(()) => self.finish(),
                    // error token first, end-of-file on the next step
                    None => self.trap(),
                },
                _ => self.trap(),
            },

            State::AfterPush => match sym {
                Symbol::Space => State::PushArg,
                Symbol::Newline => self.trap_at_line_end(),
                _ => self.trap(),
            },
            State::AfterJump => match sym {
                Symbol::Space => State::JumpArg,
                Symbol::Newline => self.trap_at_line_end(),
                _ => self.trap(),
            },
            State::AfterPop => match sym {
                Symbol::Space => State::PopArg,
                Symbol::Newline => self.trap_at_line_end(),
                _ => self.trap(),
            },

            State::PushArg => match sym {
                Symbol::Space => State::PushArg,
                Symbol::Letter(c) => {
                    self.ident.clear();
                    self.ident.push(c);
                    State::Identifier
                }
                Symbol::Digit(d) => {
                    self.number = i64::from(d);
                    State::Number
                }
                Symbol::LBracket => {
                    self.poly = Polynomial::new();
                    State::PolyTerm
                }
                Symbol::Newline => self.trap_at_line_end(),
                _ => self.trap(),
            },
            // jump targets are integer constants only
            State::JumpArg => match sym {
                Symbol::Space => State::JumpArg,
                Symbol::Digit(d) => {
                    self.number = i64::from(d);
                    State::Number
                }
                Symbol::Newline => self.trap_at_line_end(),
                _ => self.trap(),
            },
            // pop targets are variables only
            State::PopArg => match sym {
                Symbol::Space => State::PopArg,
                Symbol::Letter(c) => {
                    self.ident.clear();
                    self.ident.push(c);
                    State::Identifier
                }
                Symbol::Newline => self.trap_at_line_end(),
                _ => self.trap(),
            },

            State::Number => match sym {
                Symbol::Digit(d) => {
                    self.number = self.number.wrapping_mul(10).wrapping_add(i64::from(d));
                    State::Number
                }
                Symbol::Space => {
                    self.emit_int_ref();
                    State::AfterToken
                }
                Symbol::Newline => {
                    self.emit_int_ref();
                    self.line += 1;
                    State::Seek
                }
                Symbol::Semicolon => {
                    self.emit_int_ref();
                    State::Comment
                }
                Symbol::EndOfInput => {
                    self.emit_int_ref();
                    self.finish()
                }
                _ => self.trap(),
            },

            State::Identifier => match sym {
                Symbol::Letter(c) => {
                    self.ident.push(c);
                    State::Identifier
                }
                Symbol::Digit(d) => {
                    self.ident.push(char::from(b'0' + d));
                    State::Identifier
                }
                Symbol::Space => {
                    self.emit_var_ref();
                    State::AfterToken
                }
                Symbol::Newline => {
                    self.emit_var_ref();
                    self.line += 1;
                    State::Seek
                }
                Symbol::Semicolon => {
                    self.emit_var_ref();
                    State::Comment
                }
                Symbol::EndOfInput => {
                    self.emit_var_ref();
                    self.finish()
                }
                _ => self.trap(),
            },

            State::CommentFirst => match sym {
                Symbol::Newline => {
                    self.emit(TokenKind::Comment);
                    self.line += 1;
                    State::SeekFirst
                }
                Symbol::EndOfInput => {
                    self.emit(TokenKind::Comment);
                    self.finish()
                }
                _ => State::CommentFirst,
            },
            State::Comment => match sym {
                Symbol::Newline => {
                    self.emit(TokenKind::Comment);
                    self.line += 1;
                    State::Seek
                }
                Symbol::EndOfInput => {
                    self.emit(TokenKind::Comment);
                    self.finish()
                }
                _ => State::Comment,
            },

            State::ErrorSkip => match sym {
                Symbol::Newline => {
                    self.line += 1;
                    State::Seek
                }
                Symbol::EndOfInput => self.finish(),
                _ => State::ErrorSkip,
            },

            State::PolyTerm => match sym {
                Symbol::Space => State::PolyTerm,
                Symbol::Arith(ArithOp::Add) => {
                    self.sign = 1.0;
                    State::PowerStart
                }
                Symbol::Arith(ArithOp::Sub) => {
                    self.sign = -1.0;
                    State::PowerStart
                }
                Symbol::RBracket => {
                    self.emit_poly_ref();
                    State::AfterToken
                }
                _ => self.trap(),
            },

            State::PowerStart => match sym {
                Symbol::Space => State::PowerStart,
                Symbol::Digit(d) => {
                    self.number = i64::from(d);
                    State::PowerDigits
                }
                _ => self.trap(),
            },
            State::PowerDigits => match sym {
                Symbol::Digit(d) => {
                    self.number = self.number.wrapping_mul(10).wrapping_add(i64::from(d));
                    State::PowerDigits
                }
                Symbol::Space => State::PowerEnd,
                Symbol::Colon => {
                    self.fract_part = 0.0;
                    self.fract_count = 0;
                    State::CoeffStart
                }
                _ => self.trap(),
            },
            State::PowerEnd => match sym {
                Symbol::Space => State::PowerEnd,
                Symbol::Colon => {
                    self.fract_part = 0.0;
                    self.fract_count = 0;
                    State::CoeffStart
                }
                _ => self.trap(),
            },

            State::CoeffStart => match sym {
                Symbol::Space => State::CoeffStart,
                Symbol::Digit(d) => {
                    self.int_part = i64::from(d);
                    State::CoeffInt
                }
                _ => self.trap(),
            },
            State::CoeffInt => match sym {
                Symbol::Digit(d) => {
                    self.int_part = self.int_part.wrapping_mul(10).wrapping_add(i64::from(d));
                    State::CoeffInt
                }
                Symbol::Dot => State::CoeffFrac,
                Symbol::Space => {
                    self.commit_term();
                    State::PolyTerm
                }
                Symbol::Arith(ArithOp::Add) => {
                    self.commit_term();
                    self.sign = 1.0;
                    State::PowerStart
                }
                Symbol::Arith(ArithOp::Sub) => {
                    self.commit_term();
                    self.sign = -1.0;
                    State::PowerStart
                }
                Symbol::RBracket => {
                    self.commit_term();
                    self.emit_poly_ref();
                    State::AfterToken
                }
                _ => self.trap(),
            },
            State::CoeffFrac => match sym {
                Symbol::Digit(d) => {
                    self.fract_part = self.fract_part * 10.0 + f64::from(d);
                    self.fract_count += 1;
                    State::CoeffFrac
                }
                Symbol::Space => {
                    self.commit_term();
                    State::PolyTerm
                }
                Symbol::Arith(ArithOp::Add) => {
                    self.commit_term();
                    self.sign = 1.0;
                    State::PowerStart
                }
                Symbol::Arith(ArithOp::Sub) => {
                    self.commit_term();
                    self.sign = -1.0;
                    State::PowerStart
                }
                Symbol::RBracket => {
                    self.commit_term();
                    self.emit_poly_ref();
                    State::AfterToken
                }
                _ => self.trap(),
            },

            State::Stop => State::Stop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::names::NameEntry;
    use pretty_assertions::assert_eq;

    fn kinds(text: &str) -> Vec<TokenKind> {
        scan("test", text).tokens().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_without_arguments() {
        assert_eq!(
            kinds("read\nwrite\nend\natpow\ndeg\nderivative\nvalue\n"),
            vec![
                TokenKind::Read,
                TokenKind::Write,
                TokenKind::End,
                TokenKind::Atpow,
                TokenKind::Deg,
                TokenKind::Derivative,
                TokenKind::Value,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn push_integer_constant() {
        let program = scan("test", "push 42\n");
        assert_eq!(
            program.tokens()[0].kind,
            TokenKind::Push(0),
            "{:?}",
            program.tokens()
        );
        assert_eq!(program.names().get(0), Some(&NameEntry::IntConst(42)));
    }

    #[test]
    fn push_and_pop_variable() {
        let program = scan("test", "push x1\npop x1\n");
        assert_eq!(program.tokens()[0].kind, TokenKind::Push(0));
        assert_eq!(program.tokens()[1].kind, TokenKind::Pop(0));
        assert_eq!(
            program.names().get(0),
            Some(&NameEntry::Variable("x1".to_string()))
        );
    }

    #[test]
    fn push_polynomial_literal() {
        let program = scan("test", "push [+0:1 +1:2]\n");
        assert_eq!(program.tokens()[0].kind, TokenKind::Push(0));
        let expected: Polynomial = "[+0:1 +1:2]".parse().unwrap();
        assert_eq!(program.names().get(0), Some(&NameEntry::PolConst(expected)));
    }

    #[test]
    fn polynomial_literal_fractional_and_negative() {
        let program = scan("test", "push [-2:1.25 +0:3]\n");
        let expected: Polynomial = "[+0:3 -2:1.25]".parse().unwrap();
        assert_eq!(program.names().get(0), Some(&NameEntry::PolConst(expected)));
    }

    #[test]
    fn polynomial_literal_spaced_out() {
        let program = scan("test", "push [ + 0 : 1 - 1 : 2 ]\n");
        let expected: Polynomial = "[+0:1 -1:2]".parse().unwrap();
        assert_eq!(program.names().get(0), Some(&NameEntry::PolConst(expected)));
    }

    #[test]
    fn jump_takes_integer_only() {
        let program = scan("test", "jmp 3\nji 4\n");
        assert_eq!(program.tokens()[0].kind, TokenKind::Jmp(0));
        assert_eq!(program.tokens()[1].kind, TokenKind::Ji(1));
        assert_eq!(program.error_count(), 0);

        let bad = scan("test", "jmp x\n");
        assert_eq!(bad.error_lines(), vec![1]);
    }

    #[test]
    fn pop_takes_variable_only() {
        let bad = scan("test", "pop 3\n");
        assert_eq!(bad.error_lines(), vec![1]);
    }

    #[test]
    fn arithmetic_operators() {
        assert_eq!(
            kinds("+\n-\n*\n/\n%\n"),
            vec![
                TokenKind::Arith(ArithOp::Add),
                TokenKind::Arith(ArithOp::Sub),
                TokenKind::Arith(ArithOp::Mul),
                TokenKind::Arith(ArithOp::Div),
                TokenKind::Arith(ArithOp::Rem),
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn one_character_relations() {
        assert_eq!(
            kinds("=\n<\n>\n"),
            vec![
                TokenKind::Cmp(Relation::Equal),
                TokenKind::Cmp(Relation::Less),
                TokenKind::Cmp(Relation::Greater),
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn two_character_relations() {
        assert_eq!(
            kinds("!=\n<=\n>=\n"),
            vec![
                TokenKind::Cmp(Relation::NotEqual),
                TokenKind::Cmp(Relation::LessOrEqual),
                TokenKind::Cmp(Relation::GreaterOrEqual),
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn double_equal_is_an_error() {
        let program = scan("test", "==\n");
        assert_eq!(program.error_lines(), vec![1]);
    }

    #[test]
    fn bare_negation_is_an_error() {
        let program = scan("test", "! \n");
        assert_eq!(program.error_count(), 1);
    }

    #[test]
    fn comments_are_single_tokens() {
        assert_eq!(
            kinds("; a comment with [ ] : . symbols\n"),
            vec![TokenKind::Comment, TokenKind::EndOfFile]
        );
        assert_eq!(
            kinds("push 1 ; trailing\n"),
            vec![TokenKind::Push(0), TokenKind::Comment, TokenKind::EndOfFile]
        );
    }

    #[test]
    fn comment_at_end_of_input() {
        assert_eq!(
            kinds("end\n; no trailing newline"),
            vec![TokenKind::End, TokenKind::Comment, TokenKind::EndOfFile]
        );
    }

    #[test]
    fn one_error_token_per_bad_line() {
        let program = scan("test", "push @@ garbage garbage\nwrite\n?????\n");
        assert_eq!(program.error_lines(), vec![1, 3]);
        assert_eq!(program.tokens()[1].kind, TokenKind::Write);
    }

    #[test]
    fn error_on_line_five_only() {
        let source = "push 1\npush 2\n+\nwrite\nbogus#\nend\n";
        let program = scan("test", source);
        assert_eq!(program.error_lines(), vec![5]);
    }

    #[test]
    fn unknown_keyword_is_trapped() {
        let program = scan("test", "pus 1\n");
        assert_eq!(program.error_lines(), vec![1]);

        let uppercase = scan("test", "Push 1\n");
        assert_eq!(uppercase.error_lines(), vec![1]);
    }

    #[test]
    fn keyword_followed_by_junk_is_trapped() {
        // "endx": `end` completes on the `d`, then `x` is invalid.
        let program = scan("test", "endx\n");
        assert_eq!(program.tokens()[0].kind, TokenKind::End);
        assert_eq!(program.error_lines(), vec![1]);
    }

    #[test]
    fn newline_inside_polynomial_literal_is_trapped() {
        let program = scan("test", "push [+0:1\n+1:2]\n");
        assert!(program.error_count() > 0);
    }

    #[test]
    fn line_numbers_are_recorded() {
        let program = scan("test", "push 1\n\npush 2\n");
        assert_eq!(program.tokens()[0].line, 1);
        assert_eq!(program.tokens()[1].line, 3);
    }

    #[test]
    fn constants_are_interned_once() {
        let program = scan("test", "push 5\npush 5\npush [+0:5]\npush [+0:5]\n");
        assert_eq!(program.tokens()[0].kind, program.tokens()[1].kind);
        assert_eq!(program.tokens()[2].kind, program.tokens()[3].kind);
        assert_eq!(program.names().len(), 2);
    }

    #[test]
    fn oversized_digit_sequences_wrap_without_panicking() {
        let program = scan("test", "push 9999999999999999999999999\nend\n");
        assert_eq!(program.error_count(), 0);
        assert!(matches!(program.tokens()[0].kind, TokenKind::Push(_)));

        let literal = scan("test", "push [+99999999999999999999:12345678901234567890123]\n");
        assert_eq!(literal.error_count(), 0);
    }

    #[test]
    fn empty_source_is_just_end_of_file() {
        assert_eq!(kinds(""), vec![TokenKind::EndOfFile]);
        assert_eq!(kinds("\n  \n"), vec![TokenKind::EndOfFile]);
    }

    #[test]
    fn end_of_file_token_is_always_last() {
        for source in ["", "push 1", "garbage!!!", "; comment", "jmp"] {
            let program = scan("test", source);
            assert_eq!(
                program.tokens().last().map(|t| t.kind),
                Some(TokenKind::EndOfFile),
                "source: {:?}",
                source
            );
        }
    }

    #[test]
    fn relexing_printed_polynomial_matches() {
        let poly: Polynomial = "[+0:1 -1:4.5 +3:2]".parse().unwrap();
        let source = format!("push {}\n", poly);
        let program = scan("test", &source);
        assert_eq!(program.error_count(), 0);
        assert_eq!(program.names().get(0), Some(&NameEntry::PolConst(poly)));
    }
}
