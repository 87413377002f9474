//! Sparse polynomial arithmetic
//!
//! This module provides [`Polynomial`], a single-variable polynomial with real
//! coefficients stored as a sparse term list:
//! - a [`Term`] is a `(power, coefficient)` pair with a nonzero coefficient
//! - no two stored terms share a power
//! - the empty term list denotes the zero polynomial, whose degree is 0 and
//!   whose value at any point is 0
//!
//! # Operations
//!
//! Addition, subtraction, multiplication, Euclidean division (`/` quotient,
//! `%` remainder), formal derivative, evaluation, and coefficient lookup.
//! Evaluation deliberately uses repeated multiplication per term rather than
//! Horner's method so that rounding behaviour matches coefficient-wise
//! arithmetic elsewhere in the engine.
//!
//! # Textual form
//!
//! ```text
//! [+0:1 +1:4 +2:4]        // 1 + 4x + 4x^2
//! ```
//!
//! Terms are printed in increasing power order; the sign ahead of the power is
//! the sign of the coefficient. Parsing accepts arbitrary whitespace between
//! tokens and rejects malformed sign/number/colon sequences.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};
use std::str::FromStr;

use thiserror::Error;

/// One term of a sparse polynomial. Stored terms always have a nonzero
/// coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    pub power: u32,
    pub coefficient: f64,
}

/// A single-variable polynomial with real coefficients.
#[derive(Debug, Clone, Default)]
pub struct Polynomial {
    terms: Vec<Term>,
}

impl Polynomial {
    /// The zero polynomial.
    pub fn new() -> Self {
        Polynomial { terms: Vec::new() }
    }

    /// A degree-0 polynomial with the given value. `constant(0.0)` is the
    /// zero polynomial (no terms are stored for zero coefficients).
    pub fn constant(value: f64) -> Self {
        Polynomial::term(0, value)
    }

    /// A single-term polynomial `coefficient * x^power`, or the zero
    /// polynomial when the coefficient is zero.
    pub fn term(power: u32, coefficient: f64) -> Self {
        if coefficient == 0.0 {
            Polynomial::new()
        } else {
            Polynomial {
                terms: vec![Term { power, coefficient }],
            }
        }
    }

    /// True for the zero polynomial (no stored terms).
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of stored terms.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Degree: the maximum stored power, or 0 for the zero polynomial.
    pub fn deg(&self) -> u32 {
        self.terms.iter().map(|t| t.power).max().unwrap_or(0)
    }

    /// Coefficient at the given power; 0 for powers not present, and always
    /// 0 for negative powers.
    pub fn coeff(&self, power: i64) -> f64 {
        if power < 0 {
            return 0.0;
        }
        self.terms
            .iter()
            .find(|t| i64::from(t.power) == power)
            .map_or(0.0, |t| t.coefficient)
    }

    /// Evaluate the polynomial at `x` by summing `coefficient * x^power`
    /// over the stored terms, each power computed by repeated
    /// multiplication.
    pub fn eval(&self, x: f64) -> f64 {
        let mut total = 0.0;
        for t in &self.terms {
            let mut term_value = t.coefficient;
            for _ in 0..t.power {
                term_value *= x;
            }
            total += term_value;
        }
        total
    }

    /// Formal derivative: each term `(p, c)` with `p > 0` becomes
    /// `(p - 1, c * p)`; the constant term is dropped. The derivative of a
    /// constant (or zero) polynomial is the zero polynomial.
    pub fn derivative(&self) -> Polynomial {
        let terms = self
            .terms
            .iter()
            .filter(|t| t.power > 0)
            .map(|t| Term {
                power: t.power - 1,
                coefficient: t.coefficient * f64::from(t.power),
            })
            .collect();
        Polynomial { terms }
    }

    /// Euclidean long division, returning `(quotient, remainder)`.
    ///
    /// If `deg(self) < deg(divisor)` the quotient is zero and the remainder
    /// is `self`. Division by the zero polynomial is the caller's error; it
    /// yields a zero quotient and `self` as remainder rather than looping.
    ///
    /// The loop runs while the remainder is nonzero and its degree is at
    /// least the divisor's. Floating-point subtraction can leave a tiny
    /// residue at the cancelled leading power, which would stall the
    /// degree-based condition, so that term is removed explicitly after each
    /// step.
    pub fn div_rem(&self, divisor: &Polynomial) -> (Polynomial, Polynomial) {
        if divisor.is_zero() || self.deg() < divisor.deg() {
            return (Polynomial::new(), self.clone());
        }

        let divisor_deg = divisor.deg();
        let lead = divisor.coeff(i64::from(divisor_deg));

        let mut quotient = Polynomial::new();
        let mut remainder = self.clone();

        while !remainder.is_zero() && remainder.deg() >= divisor_deg {
            let remainder_deg = remainder.deg();
            let step = Polynomial::term(
                remainder_deg - divisor_deg,
                remainder.coeff(i64::from(remainder_deg)) / lead,
            );

            quotient = &quotient + &step;
            remainder = &remainder - &(&step * divisor);
            remainder.remove_power(remainder_deg);
        }

        (quotient, remainder)
    }

    /// Drop the stored term at `power`, if any. Used by [`div_rem`] to
    /// discard rounding residue at a power that mathematically cancelled.
    ///
    /// [`div_rem`]: Polynomial::div_rem
    fn remove_power(&mut self, power: u32) {
        self.terms.retain(|t| t.power != power);
    }
}

impl Add for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Polynomial {
        if self.is_zero() {
            return rhs.clone();
        }
        if rhs.is_zero() {
            return self.clone();
        }

        let max_power = self.deg().max(rhs.deg());
        let mut terms = Vec::new();
        for power in 0..=max_power {
            let coefficient = self.coeff(i64::from(power)) + rhs.coeff(i64::from(power));
            if coefficient != 0.0 {
                terms.push(Term { power, coefficient });
            }
        }
        Polynomial { terms }
    }
}

impl Sub for &Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: &Polynomial) -> Polynomial {
        if self.is_zero() {
            return -rhs;
        }
        if rhs.is_zero() {
            return self.clone();
        }

        let max_power = self.deg().max(rhs.deg());
        let mut terms = Vec::new();
        for power in 0..=max_power {
            let coefficient = self.coeff(i64::from(power)) - rhs.coeff(i64::from(power));
            if coefficient != 0.0 {
                terms.push(Term { power, coefficient });
            }
        }
        Polynomial { terms }
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        let terms = self
            .terms
            .iter()
            .map(|t| Term {
                power: t.power,
                coefficient: -t.coefficient,
            })
            .collect();
        Polynomial { terms }
    }
}

impl Mul for &Polynomial {
    type Output = Polynomial;

    /// Convolution: the coefficient at each target power `0..=deg(A)+deg(B)`
    /// is `sum over i of A[i] * B[target - i]`.
    fn mul(self, rhs: &Polynomial) -> Polynomial {
        if self.is_zero() || rhs.is_zero() {
            return Polynomial::new();
        }

        let max_power = self.deg() + rhs.deg();
        let mut terms = Vec::new();
        for power in 0..=max_power {
            let mut coefficient = 0.0;
            for i in 0..=power {
                coefficient +=
                    self.coeff(i64::from(i)) * rhs.coeff(i64::from(power) - i64::from(i));
            }
            if coefficient != 0.0 {
                terms.push(Term { power, coefficient });
            }
        }
        Polynomial { terms }
    }
}

impl Div for &Polynomial {
    type Output = Polynomial;

    fn div(self, rhs: &Polynomial) -> Polynomial {
        self.div_rem(rhs).0
    }
}

impl Rem for &Polynomial {
    type Output = Polynomial;

    fn rem(self, rhs: &Polynomial) -> Polynomial {
        self.div_rem(rhs).1
    }
}

impl PartialEq for Polynomial {
    /// Pointwise comparison over all powers up to the common degree; term
    /// storage order is irrelevant.
    fn eq(&self, other: &Polynomial) -> bool {
        let max_power = self.deg();
        if max_power != other.deg() {
            return false;
        }
        (0..=max_power).all(|p| self.coeff(i64::from(p)) == other.coeff(i64::from(p)))
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;

        let degree = self.deg();
        let mut first = true;
        for power in 0..=degree {
            let coefficient = self.coeff(i64::from(power));
            if coefficient == 0.0 {
                continue;
            }

            if !first {
                write!(f, " ")?;
            }
            first = false;

            let sign = if coefficient > 0.0 { '+' } else { '-' };
            write!(f, "{}{}:{}", sign, power, coefficient.abs())?;
        }

        write!(f, "]")
    }
}

/// Errors produced when parsing the textual polynomial form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolyParseError {
    #[error("expected '[' to open a polynomial literal")]
    MissingOpen,
    #[error("expected '+' or '-' before a term power")]
    BadSign,
    #[error("expected a non-negative power")]
    BadPower,
    #[error("expected ':' between power and coefficient")]
    MissingColon,
    #[error("expected a numeric coefficient")]
    BadCoefficient,
    #[error("unterminated polynomial literal")]
    Unterminated,
}

impl FromStr for Polynomial {
    type Err = PolyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars().peekable();

        skip_whitespace(&mut chars);
        if chars.next() != Some('[') {
            return Err(PolyParseError::MissingOpen);
        }

        let mut poly = Polynomial::new();
        loop {
            skip_whitespace(&mut chars);
            match chars.peek() {
                Some(']') => {
                    chars.next();
                    return Ok(poly);
                }
                None => return Err(PolyParseError::Unterminated),
                Some(_) => {}
            }

            let sign = match chars.next() {
                Some('+') => 1.0,
                Some('-') => -1.0,
                _ => return Err(PolyParseError::BadSign),
            };

            let mut power_digits = String::new();
            while let Some(c) = chars.peek() {
                if c.is_ascii_digit() {
                    power_digits.push(*c);
                    chars.next();
                } else {
                    break;
                }
            }
            let power: u32 = power_digits
                .parse()
                .map_err(|_| PolyParseError::BadPower)?;

            skip_whitespace(&mut chars);
            if chars.next() != Some(':') {
                return Err(PolyParseError::MissingColon);
            }
            skip_whitespace(&mut chars);

            let mut coeff_text = String::new();
            while let Some(c) = chars.peek() {
                if c.is_whitespace() || *c == ']' {
                    break;
                }
                coeff_text.push(*c);
                chars.next();
            }
            let coefficient: f64 = coeff_text
                .parse()
                .map_err(|_| PolyParseError::BadCoefficient)?;

            // Zero terms are never stored; duplicate powers fold together.
            poly = &poly + &Polynomial::term(power, sign * coefficient);
        }
    }
}

fn skip_whitespace(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}
