//! The exact numeric tower: arbitrary-precision integers, rationals, and floats.
//!
//! Arithmetic between mismatched variants promotes to the least exact common representation:
//! integers and rationals combine exactly, while any operation involving a [`Float`] degrades to
//! a [`Float`]. Rationals are always kept in lowest terms with a non-negative denominator (a
//! guarantee [`rug::Rational`] provides on construction), and a rational whose denominator is 1
//! normalizes to an integer, so every value has exactly one representation.
//!
//! This module **must never** produce non-normal [`Float`]s (such as `NaN` or `Infinity`)!
//! Report any bugs that cause this to happen.

use crate::primitive::{float, int};
use rug::{ops::Pow, Float, Integer, Rational};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An exact or floating-point number.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Num {
    /// An arbitrary-precision integer, such as `2` or `144`.
    Integer(Integer),

    /// An exact fraction, such as `1/2`. Never has a denominator of 1.
    Rational(Rational),

    /// A floating-point number, such as `3.14`.
    Float(Float),
}

impl Eq for Num {}

/// [`Hash`] is implemented manually to allow hashing [`Num::Float`]s, relying on the no-NaN
/// invariant documented at the module level.
impl std::hash::Hash for Num {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Self::Integer(n) => n.hash(state),
            Self::Rational(r) => {
                r.numer().hash(state);
                r.denom().hash(state);
            },
            Self::Float(f) => match f.get_significand() {
                Some(significand) => significand.hash(state),
                None => 0u8.hash(state),
            },
        }
    }
}

impl Num {
    /// The integer zero.
    pub fn zero() -> Self {
        Self::Integer(int(0))
    }

    /// The integer one.
    pub fn one() -> Self {
        Self::Integer(int(1))
    }

    /// Collapses a rational with denominator 1 into an integer, keeping the representation
    /// unique.
    pub fn normalize(self) -> Self {
        match self {
            Self::Rational(r) if *r.denom() == 1 => Self::Integer(r.into_numer_denom().0),
            other => other,
        }
    }

    /// Returns true if this number is exactly zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Integer(n) => *n == 0,
            Self::Rational(r) => *r == 0,
            Self::Float(f) => f.is_zero(),
        }
    }

    /// Returns true if this number is exactly one.
    pub fn is_one(&self) -> bool {
        match self {
            Self::Integer(n) => *n == 1,
            Self::Rational(r) => *r == 1,
            Self::Float(f) => *f == 1,
        }
    }

    /// Returns true if this number is negative.
    pub fn is_negative(&self) -> bool {
        match self {
            Self::Integer(n) => *n < 0,
            Self::Rational(r) => *r < 0,
            Self::Float(f) => f.is_sign_negative() && !f.is_zero(),
        }
    }

    /// If this number is an integer, returns a reference to it.
    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Self::Integer(n) => Some(n),
            _ => None,
        }
    }

    /// Returns true if this number is exactly representable (not a float).
    pub fn is_exact(&self) -> bool {
        !matches!(self, Self::Float(_))
    }

    /// Converts this number to a [`Float`], consuming it.
    pub fn into_float(self) -> Float {
        match self {
            Self::Integer(n) => float(n),
            Self::Rational(r) => float(r),
            Self::Float(f) => f,
        }
    }

    /// Converts this number to a [`Float`] without consuming it.
    pub fn to_float(&self) -> Float {
        self.clone().into_float()
    }

    /// The absolute value of this number.
    pub fn abs(self) -> Self {
        match self {
            Self::Integer(n) => Self::Integer(n.abs()),
            Self::Rational(r) => Self::Rational(r.abs()),
            Self::Float(f) => Self::Float(f.abs()),
        }
    }

    /// Divides this number by another, returning [`None`] if the divisor is an exact zero.
    /// Division by a float zero produces a float infinity and is equally refused.
    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        if rhs.is_zero() {
            return None;
        }

        Some(match (self, rhs) {
            (Self::Integer(a), Self::Integer(b)) => {
                Self::Rational(Rational::from((a, b))).normalize()
            },
            (Self::Rational(a), Self::Rational(b)) => Self::Rational(a / b).normalize(),
            (Self::Integer(a), Self::Rational(b)) => {
                Self::Rational(Rational::from(a) / b).normalize()
            },
            (Self::Rational(a), Self::Integer(b)) => {
                Self::Rational(a / Rational::from(b)).normalize()
            },
            (Self::Float(a), b) => Self::Float(a / b.into_float()),
            (a, Self::Float(b)) => Self::Float(a.into_float() / b),
        })
    }

    /// Raises this number to the given power, exactly where possible.
    ///
    /// Integer and rational bases with integer exponents stay exact (a negative exponent
    /// produces a rational). A float anywhere degrades the result to a float. An **exact** base
    /// with a fractional exponent returns [`None`]: the result is usually irrational, and
    /// folding it to a float would silently destroy exactness, so the caller should leave the
    /// power symbolic.
    pub fn checked_pow(self, rhs: Self) -> Option<Self> {
        match (self, rhs) {
            (Self::Integer(b), Self::Integer(e)) => {
                let exp = e.to_i32()?;
                if exp >= 0 {
                    Some(Self::Integer(b.pow(exp as u32)))
                } else if b == 0 {
                    None
                } else {
                    Some(Self::Rational(Rational::from(b).pow(exp)).normalize())
                }
            },
            (Self::Rational(b), Self::Integer(e)) => {
                let exp = e.to_i32()?;
                if exp < 0 && b == 0 {
                    return None;
                }
                Some(Self::Rational(b.pow(exp)).normalize())
            },
            (Self::Float(b), e) => Some(Self::Float(b.pow(e.into_float()))),
            (b, Self::Float(e)) => Some(Self::Float(b.into_float().pow(e))),
            // exact base, fractional exponent: leave symbolic
            (Self::Integer(_), Self::Rational(_)) | (Self::Rational(_), Self::Rational(_)) => None,
        }
    }

    /// The factorial of this number, defined for non-negative integers.
    pub fn checked_factorial(&self) -> Option<Self> {
        let n = self.as_integer()?.to_u32()?;
        Some(Self::Integer(Integer::from(Integer::factorial(n))))
    }
}

impl From<i32> for Num {
    fn from(n: i32) -> Self {
        Self::Integer(int(n))
    }
}

impl From<Integer> for Num {
    fn from(n: Integer) -> Self {
        Self::Integer(n)
    }
}

impl From<Rational> for Num {
    fn from(r: Rational) -> Self {
        Self::Rational(r).normalize()
    }
}

impl From<Float> for Num {
    fn from(f: Float) -> Self {
        Self::Float(f)
    }
}

impl Add for Num {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Integer(a), Self::Integer(b)) => Self::Integer(a + b),
            (Self::Rational(a), Self::Rational(b)) => Self::Rational(a + b).normalize(),
            (Self::Integer(a), Self::Rational(b)) | (Self::Rational(b), Self::Integer(a)) => {
                Self::Rational(b + Rational::from(a)).normalize()
            },
            (Self::Float(a), b) => Self::Float(a + b.into_float()),
            (a, Self::Float(b)) => Self::Float(a.into_float() + b),
        }
    }
}

impl Sub for Num {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl Mul for Num {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Integer(a), Self::Integer(b)) => Self::Integer(a * b),
            (Self::Rational(a), Self::Rational(b)) => Self::Rational(a * b).normalize(),
            (Self::Integer(a), Self::Rational(b)) | (Self::Rational(b), Self::Integer(a)) => {
                Self::Rational(b * Rational::from(a)).normalize()
            },
            (Self::Float(a), b) => Self::Float(a * b.into_float()),
            (a, Self::Float(b)) => Self::Float(a.into_float() * b),
        }
    }
}

impl Neg for Num {
    type Output = Self;

    fn neg(self) -> Self {
        match self {
            Self::Integer(n) => Self::Integer(-n),
            Self::Rational(r) => Self::Rational(-r),
            Self::Float(f) => Self::Float(-f),
        }
    }
}

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{}", n),
            Self::Rational(r) => write!(f, "{}/{}", r.numer(), r.denom()),
            Self::Float(x) => write!(f, "{}", x.to_f64()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::primitive::rational;
    use super::*;

    #[test]
    fn rational_addition_reduces() {
        // a/b + c/d = (a*d + c*b) / (b*d), reduced to lowest terms
        let sum = Num::Rational(rational(1, 6)) + Num::Rational(rational(1, 3));
        assert_eq!(sum, Num::Rational(rational(1, 2)));
    }

    #[test]
    fn rational_collapses_to_integer() {
        let sum = Num::Rational(rational(1, 2)) + Num::Rational(rational(1, 2));
        assert_eq!(sum, Num::Integer(int(1)));
    }

    #[test]
    fn mixed_exact_stays_exact() {
        let product = Num::from(3) * Num::Rational(rational(2, 9));
        assert_eq!(product, Num::Rational(rational(2, 3)));
    }

    #[test]
    fn float_contaminates() {
        let sum = Num::from(1) + Num::Float(float(0.5));
        assert!(matches!(sum, Num::Float(_)));
    }

    #[test]
    fn division_by_exact_zero() {
        assert_eq!(Num::from(1).checked_div(Num::zero()), None);
        assert_eq!(Num::from(1).checked_div(Num::Float(float(0))), None);
        assert_eq!(
            Num::from(3).checked_div(Num::from(6)),
            Some(Num::Rational(rational(1, 2))),
        );
    }

    #[test]
    fn integer_pow() {
        assert_eq!(Num::from(2).checked_pow(Num::from(10)), Some(Num::from(1024)));
        assert_eq!(
            Num::from(2).checked_pow(Num::from(-2)),
            Some(Num::Rational(rational(1, 4))),
        );
    }

    #[test]
    fn exact_base_fractional_exponent_stays_symbolic() {
        assert_eq!(Num::from(2).checked_pow(Num::Rational(rational(1, 2))), None);
    }

    #[test]
    fn factorial() {
        assert_eq!(Num::from(5).checked_factorial(), Some(Num::from(120)));
        assert_eq!(Num::from(0).checked_factorial(), Some(Num::from(1)));
        assert_eq!(Num::from(-1).checked_factorial(), None);
    }
}
