//! Parse-result report printers
//!
//! After parsing, three listings can be produced for a program: the raw token
//! sequence with its name table, the executable tokens with their operands
//! resolved against the name table, and the lines containing lexical errors.
//! Each printer writes to any [`Write`] sink, so the listings land in report
//! files from the driver and in memory buffers from tests.

use std::io::{self, Write};

use crate::parser::{ParsedProgram, TokenKind};

/// Write every token the automaton produced, followed by the name table.
pub fn write_token_listing<W: Write>(program: &ParsedProgram, out: &mut W) -> io::Result<()> {
    writeln!(out, "tokens of {}:", program.source_name())?;
    for token in program.tokens() {
        writeln!(out, "{}", token)?;
    }
    writeln!(out)?;
    writeln!(out, "names:")?;
    for (index, entry) in program.names().entries().iter().enumerate() {
        writeln!(out, "{:<2}: {}", index, entry)?;
    }
    Ok(())
}

/// Write only the tokens the machine would execute, with name-table indices
/// replaced by the entries they resolve to.
pub fn write_executable_listing<W: Write>(program: &ParsedProgram, out: &mut W) -> io::Result<()> {
    writeln!(out, "executable tokens of {}:", program.source_name())?;
    for token in program.tokens() {
        if !token.kind.is_executable() {
            continue;
        }
        match token.kind.name_index() {
            Some(index) => {
                let keyword = match token.kind {
                    TokenKind::Push(_) => "push",
                    TokenKind::Pop(_) => "pop",
                    TokenKind::Jmp(_) => "jmp",
                    _ => "ji",
                };
                match program.names().get(index) {
                    Some(entry) => {
                        writeln!(out, "{:<2}: ({}, {})", token.line, keyword, entry)?
                    }
                    None => writeln!(out, "{:<2}: ({}, ?{})", token.line, keyword, index)?,
                }
            }
            None => writeln!(out, "{}", token)?,
        }
    }
    Ok(())
}

/// Write the source lines containing lexical errors, one per line, and return
/// how many there were.
pub fn write_error_lines<W: Write>(program: &ParsedProgram, out: &mut W) -> io::Result<usize> {
    let lines = program.error_lines();
    writeln!(out, "error lines of {}:", program.source_name())?;
    for line in &lines {
        writeln!(out, "{}", line)?;
    }
    Ok(lines.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::scan;
    use pretty_assertions::assert_eq;

    fn render<F>(source: &str, f: F) -> String
    where
        F: Fn(&ParsedProgram, &mut Vec<u8>) -> io::Result<()>,
    {
        let program = scan("prog", source);
        let mut out = Vec::new();
        f(&program, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn token_listing_includes_names() {
        let text = render("push 3\npop x\n", write_token_listing);
        assert!(text.contains("(push, 0)"), "{}", text);
        assert!(text.contains("(pop, 1)"), "{}", text);
        assert!(text.contains("0 : constant: 3"), "{}", text);
        assert!(text.contains("1 : variable: x"), "{}", text);
    }

    #[test]
    fn executable_listing_resolves_operands() {
        let text = render("push 3\n; note\npop x\nbogus#\n", write_executable_listing);
        assert!(text.contains("(push, constant: 3)"), "{}", text);
        assert!(text.contains("(pop, variable: x)"), "{}", text);
        assert!(!text.contains("comment"), "{}", text);
        assert!(!text.contains("error"), "{}", text);
    }

    #[test]
    fn error_lines_are_counted() {
        let program = scan("prog", "push 1\n???\nwrite\n???\n");
        let mut out = Vec::new();
        let count = write_error_lines(&program, &mut out).unwrap();
        assert_eq!(count, 2);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("2\n4\n"), "{}", text);
    }
}
