//! Numeric values and the arithmetic rules between them
//!
//! Integers stay integers under `+ - *` and non-negative integer powers.
//! Division always produces a float. Mixed operands are promoted to float.

use std::fmt;
use thiserror::Error;

/// Arithmetic failure during evaluation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("float division by zero")]
    FloatDivisionByZero,
    #[error("integer overflow")]
    IntegerOverflow,
    #[error("0.0 cannot be raised to a negative power")]
    ZeroToNegativePower,
    #[error("result is not a real number")]
    NotReal,
    #[error("numerical result out of range")]
    OutOfRange,
}

/// A numeric value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    #[allow(clippy::cast_precision_loss)] // Promotion to float is the intended semantics
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    pub fn neg(self) -> Result<Number, EvalError> {
        match self {
            Number::Int(i) => i.checked_neg().map(Number::Int).ok_or(EvalError::IntegerOverflow),
            Number::Float(f) => Ok(Number::Float(-f)),
        }
    }

    pub fn add(self, rhs: Number) -> Result<Number, EvalError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => {
                a.checked_add(b).map(Number::Int).ok_or(EvalError::IntegerOverflow)
            }
            (a, b) => Ok(Number::Float(a.as_f64() + b.as_f64())),
        }
    }

    pub fn sub(self, rhs: Number) -> Result<Number, EvalError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => {
                a.checked_sub(b).map(Number::Int).ok_or(EvalError::IntegerOverflow)
            }
            (a, b) => Ok(Number::Float(a.as_f64() - b.as_f64())),
        }
    }

    pub fn mul(self, rhs: Number) -> Result<Number, EvalError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => {
                a.checked_mul(b).map(Number::Int).ok_or(EvalError::IntegerOverflow)
            }
            (a, b) => Ok(Number::Float(a.as_f64() * b.as_f64())),
        }
    }

    pub fn div(self, rhs: Number) -> Result<Number, EvalError> {
        match (self, rhs) {
            (Number::Int(_), Number::Int(0)) => Err(EvalError::DivisionByZero),
            (_, Number::Int(0)) => Err(EvalError::FloatDivisionByZero),
            (_, Number::Float(f)) if f == 0.0 => Err(EvalError::FloatDivisionByZero),
            (lhs, rhs) => Ok(Number::Float(lhs.as_f64() / rhs.as_f64())),
        }
    }

    pub fn pow(self, rhs: Number) -> Result<Number, EvalError> {
        match (self, rhs) {
            (Number::Int(base), Number::Int(exp)) if exp >= 0 => int_pow(base, exp),
            (Number::Int(0), Number::Int(_)) => Err(EvalError::ZeroToNegativePower),
            (base, exp) => float_pow(base.as_f64(), exp.as_f64()),
        }
    }
}

fn int_pow(base: i64, exp: i64) -> Result<Number, EvalError> {
    match u32::try_from(exp) {
        Ok(exp) => base
            .checked_pow(exp)
            .map(Number::Int)
            .ok_or(EvalError::IntegerOverflow),
        // Exponent beyond u32: only the trivial bases stay finite
        Err(_) => match base {
            0 | 1 => Ok(Number::Int(base)),
            -1 => Ok(Number::Int(if exp % 2 == 0 { 1 } else { -1 })),
            _ => Err(EvalError::IntegerOverflow),
        },
    }
}

fn float_pow(base: f64, exp: f64) -> Result<Number, EvalError> {
    if base == 0.0 && exp < 0.0 {
        return Err(EvalError::ZeroToNegativePower);
    }
    if base < 0.0 && exp.is_finite() && exp.fract() != 0.0 {
        return Err(EvalError::NotReal);
    }
    let result = base.powf(exp);
    if result.is_infinite() && base.is_finite() && exp.is_finite() {
        return Err(EvalError::OutOfRange);
    }
    Ok(Number::Float(result))
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(x) if x.is_nan() => write!(f, "nan"),
            Number::Float(x) if x.is_infinite() => {
                write!(f, "{}", if *x > 0.0 { "inf" } else { "-inf" })
            }
            Number::Float(x) => f.write_str(&format_float(*x)),
        }
    }
}

/// Shortest round-trip form with a signed, two-digit exponent (`1e+16`, `1e-05`).
///
/// `{:?}` already switches to exponent form below `1e-4` and from `1e16`,
/// and always keeps `.0` on integral values; only the exponent is rewritten.
fn format_float(x: f64) -> String {
    let repr = format!("{x:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}
