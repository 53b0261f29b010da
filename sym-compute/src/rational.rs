//! Exact rational arithmetic over 64-bit integers.
//!
//! [`Rational`] is always stored in lowest terms with the sign on the numerator and a strictly
//! positive denominator. Arithmetic is checked: operations that would overflow an `i64` return
//! [`None`], and callers fall back to floating point.

use std::cmp::Ordering;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Computes the greatest common divisor of two non-negative integers.
fn gcd(mut a: i128, mut b: i128) -> i128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// An exact rational number with a 64-bit numerator and denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rational {
    num: i64,
    den: i64,
}

impl Rational {
    /// Creates a rational in lowest terms. Returns [`None`] if the denominator is zero or the
    /// reduced value does not fit in an `i64`.
    pub fn new(num: i64, den: i64) -> Option<Rational> {
        Self::reduce(num as i128, den as i128)
    }

    /// Creates a rational from an integer.
    pub fn from_integer(num: i64) -> Rational {
        Rational { num, den: 1 }
    }

    /// Reduces a 128-bit numerator/denominator pair to a canonical `Rational`, if it fits.
    fn reduce(num: i128, den: i128) -> Option<Rational> {
        if den == 0 {
            return None;
        }

        let sign = if (num < 0) != (den < 0) { -1 } else { 1 };
        let (num, den) = (num.abs(), den.abs());
        let divisor = gcd(num, den).max(1);

        let num = i64::try_from(sign * num / divisor).ok()?;
        let den = i64::try_from(den / divisor).ok()?;
        Some(Rational { num, den })
    }

    /// The numerator. Carries the sign of the rational.
    pub fn numerator(&self) -> i64 {
        self.num
    }

    /// The denominator. Always positive.
    pub fn denominator(&self) -> i64 {
        self.den
    }

    /// Returns true if the denominator is 1.
    pub fn is_integer(&self) -> bool {
        self.den == 1
    }

    /// Returns true if the rational is zero.
    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    /// Converts the rational to the nearest `f64`.
    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Adds two rationals exactly.
    pub fn checked_add(&self, other: &Rational) -> Option<Rational> {
        Self::reduce(
            self.num as i128 * other.den as i128 + other.num as i128 * self.den as i128,
            self.den as i128 * other.den as i128,
        )
    }

    /// Subtracts two rationals exactly.
    pub fn checked_sub(&self, other: &Rational) -> Option<Rational> {
        Self::reduce(
            self.num as i128 * other.den as i128 - other.num as i128 * self.den as i128,
            self.den as i128 * other.den as i128,
        )
    }

    /// Multiplies two rationals exactly.
    pub fn checked_mul(&self, other: &Rational) -> Option<Rational> {
        Self::reduce(
            self.num as i128 * other.num as i128,
            self.den as i128 * other.den as i128,
        )
    }

    /// Divides two rationals exactly. Returns [`None`] if `other` is zero.
    pub fn checked_div(&self, other: &Rational) -> Option<Rational> {
        if other.num == 0 {
            return None;
        }
        Self::reduce(
            self.num as i128 * other.den as i128,
            self.den as i128 * other.num as i128,
        )
    }

    /// Raises the rational to an integer power by repeated multiplication, staying exact.
    /// Returns [`None`] on overflow or `0^0` / `0^negative`.
    pub fn checked_pow(&self, exponent: i64) -> Option<Rational> {
        if self.num == 0 && exponent <= 0 {
            return None;
        }

        let base = if exponent < 0 {
            Self::reduce(self.den as i128, self.num as i128)?
        } else {
            *self
        };

        let mut result = Rational::from_integer(1);
        for _ in 0..exponent.unsigned_abs() {
            result = result.checked_mul(&base)?;
        }
        Some(result)
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Rational) -> Option<Ordering> {
        // denominators are positive, so cross-multiplication preserves order
        let left = self.num as i128 * other.den as i128;
        let right = other.num as i128 * self.den as i128;
        left.partial_cmp(&right)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn reduction() {
        assert_eq!(Rational::new(6, 4), Rational::new(3, 2));
        assert_eq!(Rational::new(6, 3), Some(Rational::from_integer(2)));
        assert_eq!(Rational::new(0, 5), Some(Rational::from_integer(0)));
    }

    #[test]
    fn sign_on_numerator() {
        let r = Rational::new(3, -6).unwrap();
        assert_eq!(r.numerator(), -1);
        assert_eq!(r.denominator(), 2);

        let r = Rational::new(-3, -6).unwrap();
        assert_eq!(r.numerator(), 1);
        assert_eq!(r.denominator(), 2);
    }

    #[test]
    fn zero_denominator() {
        assert_eq!(Rational::new(1, 0), None);
        assert_eq!(Rational::new(0, 0), None);
    }

    #[test]
    fn arithmetic() {
        let a = Rational::new(1, 3).unwrap();
        let b = Rational::new(1, 6).unwrap();
        assert_eq!(a.checked_add(&b), Rational::new(1, 2));
        assert_eq!(a.checked_sub(&b), Rational::new(1, 6));
        assert_eq!(a.checked_mul(&b), Rational::new(1, 18));
        assert_eq!(a.checked_div(&b), Some(Rational::from_integer(2)));
    }

    #[test]
    fn division_by_zero_is_none() {
        let a = Rational::new(1, 3).unwrap();
        assert_eq!(a.checked_div(&Rational::from_integer(0)), None);
    }

    #[test]
    fn integer_powers() {
        let a = Rational::new(2, 3).unwrap();
        assert_eq!(a.checked_pow(3), Rational::new(8, 27));
        assert_eq!(a.checked_pow(-2), Rational::new(9, 4));
        assert_eq!(a.checked_pow(0), Some(Rational::from_integer(1)));
    }

    #[test]
    fn ordering_is_exact() {
        let a = Rational::new(1, 3).unwrap();
        let b = Rational::new(2, 6).unwrap();
        let c = Rational::new(1, 2).unwrap();
        assert_eq!(a.partial_cmp(&b), Some(Ordering::Equal));
        assert!(a < c);
    }

    #[test]
    fn overflow_returns_none() {
        let big = Rational::from_integer(i64::MAX);
        assert_eq!(big.checked_mul(&big), None);
        assert_eq!(big.checked_add(&Rational::from_integer(1)), None);
    }
}
