//! The stack machine
//!
//! [`Machine`] executes a [`ParsedProgram`] token by token. State is an
//! operand stack, a variable store, and a program counter into the token
//! sequence. Jumps name source lines, not token indices; a jump scans the
//! token sequence for the first token on the target line.
//!
//! The machine is generic over its input and output streams so programs can
//! run against real standard streams or in-memory buffers alike.

use std::io::{BufRead, Write};

use rustc_hash::FxHashMap;

use crate::parser::{NameEntry, ParsedProgram, Token, TokenKind};
use crate::poly::Polynomial;

use super::errors::RuntimeError;
use super::value::Value;

/// What token execution decided about control flow.
enum Flow {
    Next,
    Jump(usize),
    Halt,
}

/// A running program: operand stack, variable store, and program counter.
pub struct Machine<'p, R, W> {
    program: &'p ParsedProgram,
    input: R,
    output: W,
    stack: Vec<Value>,
    variables: FxHashMap<String, Value>,
    pc: usize,
}

impl<'p, R: BufRead, W: Write> Machine<'p, R, W> {
    pub fn new(program: &'p ParsedProgram, input: R, output: W) -> Self {
        Machine {
            program,
            input,
            output,
            stack: Vec::new(),
            variables: FxHashMap::default(),
            pc: 0,
        }
    }

    /// Execute the program from its first token until `end`, the end of the
    /// token sequence, or a runtime error.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        self.pc = 0;
        while self.pc < self.program.tokens().len() {
            let token = self.program.tokens()[self.pc];
            match self.exec(token)? {
                Flow::Next => self.pc += 1,
                Flow::Jump(index) => self.pc = index,
                Flow::Halt => break,
            }
        }
        self.output.flush()?;
        Ok(())
    }

    fn exec(&mut self, token: Token) -> Result<Flow, RuntimeError> {
        let line = token.line;
        match token.kind {
            TokenKind::Push(index) => {
                let value = self.resolve(index, line)?;
                self.stack.push(value);
                Ok(Flow::Next)
            }
            TokenKind::Pop(index) => {
                let name = match self.program.names().get(index) {
                    Some(NameEntry::Variable(name)) => name.clone(),
                    _ => return Err(RuntimeError::BadNameReference { line }),
                };
                let value = self.pop("pop", line)?;
                self.variables.insert(name, value);
                Ok(Flow::Next)
            }
            TokenKind::Jmp(index) => {
                let target = self.jump_target(index, line)?;
                Ok(Flow::Jump(target))
            }
            TokenKind::Ji(index) => {
                let condition = self.pop("ji", line)?;
                if condition.is_truthy() {
                    let target = self.jump_target(index, line)?;
                    Ok(Flow::Jump(target))
                } else {
                    Ok(Flow::Next)
                }
            }
            TokenKind::Read => {
                let value = self.read_value(line)?;
                self.stack.push(value);
                Ok(Flow::Next)
            }
            TokenKind::Write => {
                let value = self.pop("write", line)?;
                writeln!(self.output, "{}", value)?;
                Ok(Flow::Next)
            }
            TokenKind::End => Ok(Flow::Halt),
            TokenKind::Arith(op) => {
                let right = self.pop("arithmetic", line)?;
                let left = self.pop("arithmetic", line)?;
                let result = Value::arith(op, &left, &right, line)?;
                self.stack.push(result);
                Ok(Flow::Next)
            }
            TokenKind::Cmp(rel) => {
                let right = self.pop("comparison", line)?;
                let left = self.pop("comparison", line)?;
                let result = Value::compare(rel, &left, &right, line)?;
                self.stack.push(result);
                Ok(Flow::Next)
            }
            TokenKind::Deg => {
                let value = self.pop("deg", line)?;
                self.stack.push(Value::Int(i64::from(value.to_poly().deg())));
                Ok(Flow::Next)
            }
            TokenKind::Derivative => {
                let value = self.pop("derivative", line)?;
                self.stack.push(Value::Poly(value.to_poly().derivative()));
                Ok(Flow::Next)
            }
            TokenKind::Atpow => {
                let power = self.pop_int("atpow", line)?;
                let value = self.pop("atpow", line)?;
                let coefficient = value.to_poly().coeff(power);
                self.stack.push(Value::Int(coefficient as i64));
                Ok(Flow::Next)
            }
            TokenKind::Value => {
                let point = self.pop_int("value", line)?;
                let value = self.pop("value", line)?;
                let result = value.to_poly().eval(point as f64);
                self.stack.push(Value::Int(result as i64));
                Ok(Flow::Next)
            }
            TokenKind::Comment => Ok(Flow::Next),
            TokenKind::Error => Err(RuntimeError::ErrorToken { line }),
            TokenKind::EndOfFile => Ok(Flow::Halt),
        }
    }

    /// Look up what a `push` operand stands for: constants produce a fresh
    /// copy of their value, variables must already be bound.
    fn resolve(&self, index: usize, line: u32) -> Result<Value, RuntimeError> {
        match self.program.names().get(index) {
            Some(NameEntry::IntConst(n)) => Ok(Value::Int(*n)),
            Some(NameEntry::PolConst(p)) => Ok(Value::Poly(p.clone())),
            Some(NameEntry::Variable(name)) => match self.variables.get(name) {
                Some(value) => Ok(value.clone()),
                None => Err(RuntimeError::UnboundVariable {
                    name: name.clone(),
                    line,
                }),
            },
            None => Err(RuntimeError::BadNameReference { line }),
        }
    }

    /// Resolve a jump operand to a token index: the first token on the named
    /// source line.
    fn jump_target(&self, index: usize, line: u32) -> Result<usize, RuntimeError> {
        let target = match self.program.names().get(index) {
            Some(NameEntry::IntConst(n)) => *n,
            _ => return Err(RuntimeError::BadNameReference { line }),
        };
        if target <= 0 {
            return Err(RuntimeError::BadJumpTarget { target, line });
        }
        self.program
            .tokens()
            .iter()
            .position(|t| i64::from(t.line) == target)
            .ok_or(RuntimeError::BadJumpTarget { target, line })
    }

    fn pop(&mut self, op: &'static str, line: u32) -> Result<Value, RuntimeError> {
        self.stack
            .pop()
            .ok_or(RuntimeError::StackUnderflow { op, line })
    }

    fn pop_int(&mut self, op: &'static str, line: u32) -> Result<i64, RuntimeError> {
        let value = self.pop(op, line)?;
        value
            .as_int()
            .ok_or(RuntimeError::IntegerRequired { op, line })
    }

    /// `read`: skip whitespace, then accept either an unsigned integer or a
    /// bracketed polynomial literal from the input stream.
    fn read_value(&mut self, line: u32) -> Result<Value, RuntimeError> {
        loop {
            match self.peek_byte()? {
                Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') => {
                    self.input.consume(1);
                }
                Some(b) if b.is_ascii_digit() => return self.read_int(),
                Some(b'[') => return self.read_poly(line),
                Some(_) => return Err(RuntimeError::MalformedRead { line }),
                None => return Err(RuntimeError::InputExhausted { line }),
            }
        }
    }

    fn read_int(&mut self) -> Result<Value, RuntimeError> {
        let mut number: i64 = 0;
        while let Some(b) = self.peek_byte()? {
            if !b.is_ascii_digit() {
                break;
            }
            number = number.wrapping_mul(10).wrapping_add(i64::from(b - b'0'));
            self.input.consume(1);
        }
        Ok(Value::Int(number))
    }

    fn read_poly(&mut self, line: u32) -> Result<Value, RuntimeError> {
        let mut literal = String::new();
        loop {
            match self.peek_byte()? {
                Some(b) => {
                    self.input.consume(1);
                    literal.push(char::from(b));
                    if b == b']' {
                        break;
                    }
                }
                None => return Err(RuntimeError::MalformedRead { line }),
            }
        }
        let poly: Polynomial = literal
            .parse()
            .map_err(|_| RuntimeError::MalformedRead { line })?;
        Ok(Value::Poly(poly))
    }

    fn peek_byte(&mut self) -> Result<Option<u8>, RuntimeError> {
        let buffer = self.input.fill_buf()?;
        Ok(buffer.first().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::scan;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn run_program(source: &str, input: &str) -> Result<String, RuntimeError> {
        let program = scan("test", source);
        let mut output = Vec::new();
        let result = {
            let mut machine = Machine::new(&program, Cursor::new(input.as_bytes()), &mut output);
            machine.run()
        };
        result.map(|()| String::from_utf8(output).unwrap_or_default())
    }

    #[test]
    fn adds_two_constants() {
        let out = run_program("push 3\npush 4\n+\nwrite\nend\n", "").unwrap();
        assert_eq!(out, "7\n");
    }

    #[test]
    fn integer_division_truncates() {
        let out = run_program("push 7\npush 2\n/\nwrite\npush 7\npush 2\n%\nwrite\nend\n", "")
            .unwrap();
        assert_eq!(out, "3\n1\n");
    }

    #[test]
    fn variables_round_trip() {
        let out = run_program("push 5\npop x\npush x\npush x\n*\nwrite\nend\n", "").unwrap();
        assert_eq!(out, "25\n");
    }

    #[test]
    fn unbound_variable_is_an_error() {
        let err = run_program("push y\nend\n", "").unwrap_err();
        assert_eq!(
            err,
            RuntimeError::UnboundVariable {
                name: "y".to_string(),
                line: 1
            }
        );
    }

    #[test]
    fn pop_on_empty_stack_underflows() {
        let err = run_program("pop x\n", "").unwrap_err();
        assert_eq!(
            err,
            RuntimeError::StackUnderflow {
                op: "pop",
                line: 1
            }
        );
    }

    #[test]
    fn squaring_a_binomial() {
        let source = "push [+0:1 +1:2]\npop p\npush p\npush p\n*\nwrite\nend\n";
        let out = run_program(source, "").unwrap();
        assert_eq!(out, "[+0:1 +1:4 +2:4]\n");
    }

    #[test]
    fn mixed_arithmetic_promotes_integers() {
        let out = run_program("push [+1:1]\npush 2\n+\nwrite\nend\n", "").unwrap();
        assert_eq!(out, "[+0:2 +1:1]\n");
    }

    #[test]
    fn countdown_loop() {
        // decrement from 3, writing each value until the counter hits zero
        let source = "\
push 3
pop n
push n
write
push n
push 1
-
pop n
push n
ji 3
end
";
        let out = run_program(source, "").unwrap();
        assert_eq!(out, "3\n2\n1\n");
    }

    #[test]
    fn jmp_skips_forward() {
        let out = run_program("jmp 3\npush 1\npush 2\nwrite\nend\n", "").unwrap();
        assert_eq!(out, "2\n");
    }

    #[test]
    fn ji_falls_through_on_zero() {
        let out = run_program("push 0\nji 9\npush 1\nwrite\nend\n", "").unwrap();
        assert_eq!(out, "1\n");
    }

    #[test]
    fn jump_to_missing_line_is_an_error() {
        let err = run_program("jmp 40\nend\n", "").unwrap_err();
        assert_eq!(
            err,
            RuntimeError::BadJumpTarget {
                target: 40,
                line: 1
            }
        );
    }

    #[test]
    fn jump_to_zero_is_an_error() {
        let err = run_program("jmp 0\nend\n", "").unwrap_err();
        assert_eq!(err, RuntimeError::BadJumpTarget { target: 0, line: 1 });
    }

    #[test]
    fn comparisons_yield_zero_or_one() {
        let out = run_program("push 2\npush 3\n<\nwrite\npush 2\npush 3\n>=\nwrite\nend\n", "")
            .unwrap();
        assert_eq!(out, "1\n0\n");
    }

    #[test]
    fn equality_between_int_and_constant_polynomial() {
        let out = run_program("push 5\npush [+0:5]\n=\nwrite\nend\n", "").unwrap();
        assert_eq!(out, "1\n");
    }

    #[test]
    fn ordering_a_polynomial_is_an_error() {
        let err = run_program("push 5\npush [+1:1]\n<\nend\n", "").unwrap_err();
        assert_eq!(err, RuntimeError::IllegalComparison { line: 3 });
    }

    #[test]
    fn deg_and_derivative() {
        let source = "push [+0:1 +3:2]\npop p\npush p\ndeg\nwrite\npush p\nderivative\nwrite\nend\n";
        let out = run_program(source, "").unwrap();
        assert_eq!(out, "3\n[+2:6]\n");
    }

    #[test]
    fn deg_of_an_integer_is_zero() {
        let out = run_program("push 9\ndeg\nwrite\nend\n", "").unwrap();
        assert_eq!(out, "0\n");
    }

    #[test]
    fn atpow_extracts_a_coefficient() {
        let source = "push [+0:1 +2:7]\npush 2\natpow\nwrite\nend\n";
        let out = run_program(source, "").unwrap();
        assert_eq!(out, "7\n");
    }

    #[test]
    fn atpow_of_missing_power_is_zero() {
        let out = run_program("push [+2:7]\npush 5\natpow\nwrite\nend\n", "").unwrap();
        assert_eq!(out, "0\n");
    }

    #[test]
    fn value_evaluates_at_a_point() {
        // p(x) = 1 + 2x at x = 3
        let out = run_program("push [+0:1 +1:2]\npush 3\nvalue\nwrite\nend\n", "").unwrap();
        assert_eq!(out, "7\n");
    }

    #[test]
    fn value_requires_integer_argument() {
        let err =
            run_program("push 3\npush [+0:1]\nvalue\nend\n", "").unwrap_err();
        assert_eq!(
            err,
            RuntimeError::IntegerRequired {
                op: "value",
                line: 3
            }
        );
    }

    #[test]
    fn read_accepts_integers_and_polynomials() {
        let out = run_program("read\nread\n+\nwrite\nend\n", "  5\n[+1:2]\n").unwrap();
        assert_eq!(out, "[+0:5 +1:2]\n");
    }

    #[test]
    fn read_wraps_oversized_integers() {
        let source = "read\npop x\npush 1\nwrite\nend\n";
        let out = run_program(source, "9999999999999999999999999\n").unwrap();
        assert_eq!(out, "1\n");
    }

    #[test]
    fn read_rejects_garbage() {
        let err = run_program("read\nend\n", "oops\n").unwrap_err();
        assert_eq!(err, RuntimeError::MalformedRead { line: 1 });
    }

    #[test]
    fn read_on_empty_input_is_exhausted() {
        let err = run_program("read\nend\n", "").unwrap_err();
        assert_eq!(err, RuntimeError::InputExhausted { line: 1 });
    }

    #[test]
    fn division_by_zero_polynomial() {
        let err = run_program("push [+1:1]\npush [ ]\n/\nend\n", "").unwrap_err();
        assert_eq!(err, RuntimeError::DivisionByZero { line: 3 });
    }

    #[test]
    fn error_token_halts_execution() {
        let err = run_program("garbage!!!\n", "").unwrap_err();
        assert_eq!(err, RuntimeError::ErrorToken { line: 1 });
    }

    #[test]
    fn comments_are_skipped() {
        let out = run_program("; header\npush 1 ; trailing\nwrite\nend\n", "").unwrap();
        assert_eq!(out, "1\n");
    }

    #[test]
    fn end_halts_before_later_statements() {
        let out = run_program("push 1\nwrite\nend\npush 2\nwrite\n", "").unwrap();
        assert_eq!(out, "1\n");
    }
}
