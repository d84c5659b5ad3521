//! Functions to construct [`Integer`]s, [`Rational`]s, and [`Float`]s from various types.

use rug::{Assign, Float, Integer, Rational};

/// The number of digits of precision to use when computing values.
pub const PRECISION: u32 = 1 << 9;

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates an [`Integer`] from a string slice.
pub fn int_from_str(s: &str) -> Integer {
    Integer::from_str_radix(s, 10).unwrap()
}

/// Creates a [`Rational`] with the given numerator and denominator. The result is automatically
/// reduced to lowest terms with a non-negative denominator.
pub fn rational<N, D>(numer: N, denom: D) -> Rational
where
    Integer: From<N> + From<D>,
{
    Rational::from((Integer::from(numer), Integer::from(denom)))
}

/// Creates a [`Float`] with the given value.
pub fn float<T>(n: T) -> Float
where
    Float: Assign<T>,
{
    Float::with_val(PRECISION, n)
}

/// Creates a [`Float`] from a string slice.
pub fn float_from_str(s: &str) -> Float {
    Float::with_val(PRECISION, Float::parse(s).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rational_reduces() {
        assert_eq!(rational(6, 8), rational(3, 4));
        assert_eq!(rational(2, -4), rational(-1, 2));
        assert_eq!(*rational(2, -4).denom(), int(2));
    }

    #[test]
    fn float_parse() {
        assert_eq!(float_from_str("3.14").to_f64(), 3.14);
    }
}
