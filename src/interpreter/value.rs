//! Runtime value model
//!
//! Every value on the operand stack and in the variable store is a [`Value`]:
//! a machine integer or a polynomial. Mixed-operand arithmetic promotes the
//! integer side to a degree-zero polynomial; the promotion is one-way, a
//! polynomial never collapses back to an integer on its own.

use std::fmt;

use crate::parser::{ArithOp, Relation};
use crate::poly::Polynomial;

use super::errors::RuntimeError;

/// A value the machine computes with.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Poly(Polynomial),
}

impl Default for Value {
    fn default() -> Self {
        Value::Int(0)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Poly(p) => write!(f, "{}", p),
        }
    }
}

impl Value {
    /// Conditional jumps branch on nonzero integers and polynomials with at
    /// least one nonzero term.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Poly(p) => p.term_count() != 0,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Poly(_) => None,
        }
    }

    /// Promote to a polynomial: integers become degree-zero constants.
    pub fn to_poly(&self) -> Polynomial {
        match self {
            Value::Int(n) => Polynomial::constant(*n as f64),
            Value::Poly(p) => p.clone(),
        }
    }

    /// Apply an arithmetic operator. Two integers stay in integer arithmetic;
    /// any polynomial operand promotes the other side.
    pub fn arith(op: ArithOp, left: &Value, right: &Value, line: u32) -> Result<Value, RuntimeError> {
        if let (Value::Int(a), Value::Int(b)) = (left, right) {
            let result = match op {
                ArithOp::Add => a.wrapping_add(*b),
                ArithOp::Sub => a.wrapping_sub(*b),
                ArithOp::Mul => a.wrapping_mul(*b),
                ArithOp::Div => {
                    if *b == 0 {
                        return Err(RuntimeError::DivisionByZero { line });
                    }
                    a.wrapping_div(*b)
                }
                ArithOp::Rem => {
                    if *b == 0 {
                        return Err(RuntimeError::DivisionByZero { line });
                    }
                    a.wrapping_rem(*b)
                }
            };
            return Ok(Value::Int(result));
        }

        let a = left.to_poly();
        let b = right.to_poly();
        let result = match op {
            ArithOp::Add => &a + &b,
            ArithOp::Sub => &a - &b,
            ArithOp::Mul => &a * &b,
            ArithOp::Div => {
                if b.is_zero() {
                    return Err(RuntimeError::DivisionByZero { line });
                }
                &a / &b
            }
            ArithOp::Rem => {
                if b.is_zero() {
                    return Err(RuntimeError::DivisionByZero { line });
                }
                &a % &b
            }
        };
        Ok(Value::Poly(result))
    }

    /// Apply a relational operator, yielding integer 0 or 1. Equality and
    /// inequality promote mixed operands; the four ordering relations are
    /// defined for integers only.
    pub fn compare(
        rel: Relation,
        left: &Value,
        right: &Value,
        line: u32,
    ) -> Result<Value, RuntimeError> {
        let holds = match rel {
            Relation::Equal | Relation::NotEqual => {
                let equal = match (left, right) {
                    (Value::Int(a), Value::Int(b)) => a == b,
                    _ => left.to_poly() == right.to_poly(),
                };
                match rel {
                    Relation::Equal => equal,
                    _ => !equal,
                }
            }
            Relation::Less | Relation::LessOrEqual | Relation::Greater | Relation::GreaterOrEqual => {
                match (left, right) {
                    (Value::Int(a), Value::Int(b)) => match rel {
                        Relation::Less => a < b,
                        Relation::LessOrEqual => a <= b,
                        Relation::Greater => a > b,
                        _ => a >= b,
                    },
                    _ => return Err(RuntimeError::IllegalComparison { line }),
                }
            }
        };
        Ok(Value::Int(i64::from(holds)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn integer_arithmetic_stays_integer() {
        let r = Value::arith(ArithOp::Div, &Value::Int(7), &Value::Int(2), 1).unwrap();
        assert_eq!(r, Value::Int(3));
        let r = Value::arith(ArithOp::Rem, &Value::Int(7), &Value::Int(2), 1).unwrap();
        assert_eq!(r, Value::Int(1));
    }

    #[test]
    fn mixed_operands_promote() {
        let p = Value::Poly("[+1:1]".parse().unwrap());
        let r = Value::arith(ArithOp::Add, &Value::Int(2), &p, 1).unwrap();
        assert_eq!(r, Value::Poly("[+0:2 +1:1]".parse().unwrap()));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let err = Value::arith(ArithOp::Div, &Value::Int(1), &Value::Int(0), 3).unwrap_err();
        assert_eq!(err, RuntimeError::DivisionByZero { line: 3 });

        let zero = Value::Poly(Polynomial::new());
        let err = Value::arith(ArithOp::Rem, &Value::Int(1), &zero, 4).unwrap_err();
        assert_eq!(err, RuntimeError::DivisionByZero { line: 4 });
    }

    #[test]
    fn equality_promotes_but_ordering_does_not() {
        let five = Value::Poly(Polynomial::constant(5.0));
        let r = Value::compare(Relation::Equal, &Value::Int(5), &five, 1).unwrap();
        assert_eq!(r, Value::Int(1));
        let r = Value::compare(Relation::NotEqual, &Value::Int(5), &five, 1).unwrap();
        assert_eq!(r, Value::Int(0));

        let err = Value::compare(Relation::Less, &Value::Int(5), &five, 2).unwrap_err();
        assert_eq!(err, RuntimeError::IllegalComparison { line: 2 });
    }

    #[test]
    fn ordering_on_integers() {
        let r = Value::compare(Relation::LessOrEqual, &Value::Int(3), &Value::Int(3), 1).unwrap();
        assert_eq!(r, Value::Int(1));
        let r = Value::compare(Relation::Greater, &Value::Int(3), &Value::Int(3), 1).unwrap();
        assert_eq!(r, Value::Int(0));
    }

    #[test]
    fn truthiness() {
        assert!(Value::Int(-1).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Poly(Polynomial::new()).is_truthy());
        assert!(Value::Poly(Polynomial::constant(0.5)).is_truthy());
    }
}
