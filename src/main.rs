// Polstack: interpreter for a stack language over integers and polynomials

mod interpreter;
mod parser;
mod poly;
mod report;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use interpreter::Machine;
use parser::ParsedProgram;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        let program_name = args.first().map(|s| s.as_str()).unwrap_or("polstack");
        eprintln!("Error: No input file provided");
        eprintln!();
        eprintln!("Usage: {} <program>", program_name);
        eprintln!();
        eprintln!("Parses <program>, writes the listings <program>.tokens,");
        eprintln!("<program>.exe and <program>.errors, and then interprets the");
        eprintln!("program unless it contains lexical errors.");
        std::process::exit(1);
    }

    let source_file = &args[1];

    if !Path::new(source_file).exists() {
        eprintln!("Error: File '{}' not found", source_file);
        eprintln!(
            "Usage: {} <program>",
            args.first().map(|s| s.as_str()).unwrap_or("polstack")
        );
        std::process::exit(1);
    }

    eprintln!("Parsing {}...", source_file);
    let program = parser::parse_file(source_file);

    if let Err(e) = write_reports(&program, source_file) {
        eprintln!("Error: could not write report files: {}", e);
        std::process::exit(1);
    }

    let errors = program.error_count();
    if errors > 0 {
        eprintln!(
            "Found {} line{} with lexical errors (see {}.errors); not executing.",
            errors,
            if errors == 1 { "" } else { "s" },
            source_file
        );
        std::process::exit(1);
    }

    eprintln!("Parsed successfully: {} tokens.", program.tokens().len());
    eprintln!("Executing program...");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut machine = Machine::new(&program, stdin.lock(), stdout.lock());
    match machine.run() {
        Ok(()) => eprintln!("Execution completed successfully."),
        Err(e) => {
            match e.line() {
                Some(line) => eprintln!("Runtime error on line {}: {}", line, e),
                None => eprintln!("Runtime error: {}", e),
            }
            std::process::exit(1);
        }
    }
}

/// Write the three parse listings next to the source file.
fn write_reports(program: &ParsedProgram, source_file: &str) -> io::Result<()> {
    let mut tokens = BufWriter::new(File::create(format!("{}.tokens", source_file))?);
    report::write_token_listing(program, &mut tokens)?;
    tokens.flush()?;

    let mut exe = BufWriter::new(File::create(format!("{}.exe", source_file))?);
    report::write_executable_listing(program, &mut exe)?;
    exe.flush()?;

    let mut errors = BufWriter::new(File::create(format!("{}.errors", source_file))?);
    report::write_error_lines(program, &mut errors)?;
    errors.flush()?;

    Ok(())
}
