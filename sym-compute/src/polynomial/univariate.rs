//! Dense polynomials in one variable.

use crate::error::{kind, Error};
use std::ops::{Add, Mul, Sub};
use super::EPSILON;

/// A polynomial in one variable, stored as coefficients from the constant term upward.
///
/// The coefficient vector never ends in a (near-)zero: construction trims trailing
/// coefficients smaller than [`EPSILON`], so the zero polynomial is the empty vector and
/// `degree` is simply the last index.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    /// Creates a polynomial from coefficients in ascending order of degree.
    pub fn new(coeffs: Vec<f64>) -> Polynomial {
        let mut poly = Polynomial { coeffs };
        poly.trim();
        poly
    }

    /// The zero polynomial.
    pub fn zero() -> Polynomial {
        Polynomial { coeffs: Vec::new() }
    }

    /// A constant polynomial.
    pub fn constant(value: f64) -> Polynomial {
        Polynomial::new(vec![value])
    }

    /// The coefficients, from the constant term upward.
    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// The degree of the polynomial, or `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// The leading coefficient, or zero for the zero polynomial.
    pub fn leading(&self) -> f64 {
        self.coeffs.last().copied().unwrap_or(0.0)
    }

    /// Evaluates the polynomial at the given point, by Horner's rule.
    pub fn eval(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, coeff| acc * x + coeff)
    }

    fn trim(&mut self) {
        while self.coeffs.last().is_some_and(|c| c.abs() < EPSILON) {
            self.coeffs.pop();
        }
    }

    /// Divides with remainder, returning `(quotient, remainder)` where
    /// `self = quotient * divisor + remainder` and the remainder has smaller degree than
    /// the divisor.
    pub fn div_rem(&self, divisor: &Polynomial) -> Result<(Polynomial, Polynomial), Error> {
        let Some(divisor_degree) = divisor.degree() else {
            return Err(Error::new(vec![], kind::ZeroPolynomialDivision));
        };

        let mut remainder = self.clone();
        let mut quotient = vec![0.0; self.coeffs.len().saturating_sub(divisor_degree)];
        while let Some(degree) = remainder.degree().filter(|&d| d >= divisor_degree) {
            let factor = remainder.leading() / divisor.leading();
            let shift = degree - divisor_degree;
            quotient[shift] = factor;
            for (i, coeff) in divisor.coeffs.iter().enumerate() {
                remainder.coeffs[shift + i] -= factor * coeff;
            }
            // the leading term cancels by construction; clear the residue
            remainder.coeffs.truncate(degree);
            remainder.trim();
        }

        Ok((Polynomial::new(quotient), remainder))
    }

    /// The greatest common divisor by the Euclidean algorithm, normalized to be monic.
    pub fn gcd(&self, other: &Polynomial) -> Polynomial {
        let (mut a, mut b) = (self.clone(), other.clone());
        while !b.is_zero() {
            // infallible: b is nonzero here
            let remainder = match a.div_rem(&b) {
                Ok((_, remainder)) => remainder,
                Err(_) => break,
            };
            a = b;
            b = remainder;
        }
        a.into_monic()
    }

    /// Scales the polynomial so its leading coefficient is one.
    fn into_monic(mut self) -> Polynomial {
        let leading = self.leading();
        if leading != 0.0 && leading != 1.0 {
            for coeff in &mut self.coeffs {
                *coeff /= leading;
            }
        }
        self
    }
}

impl Add for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Polynomial {
        let mut coeffs = vec![0.0; self.coeffs.len().max(rhs.coeffs.len())];
        for (i, coeff) in coeffs.iter_mut().enumerate() {
            *coeff = self.coeffs.get(i).unwrap_or(&0.0) + rhs.coeffs.get(i).unwrap_or(&0.0);
        }
        Polynomial::new(coeffs)
    }
}

impl Sub for &Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: &Polynomial) -> Polynomial {
        let mut coeffs = vec![0.0; self.coeffs.len().max(rhs.coeffs.len())];
        for (i, coeff) in coeffs.iter_mut().enumerate() {
            *coeff = self.coeffs.get(i).unwrap_or(&0.0) - rhs.coeffs.get(i).unwrap_or(&0.0);
        }
        Polynomial::new(coeffs)
    }
}

impl Mul for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: &Polynomial) -> Polynomial {
        if self.is_zero() || rhs.is_zero() {
            return Polynomial::zero();
        }
        let mut coeffs = vec![0.0; self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in rhs.coeffs.iter().enumerate() {
                coeffs[i + j] += a * b;
            }
        }
        Polynomial::new(coeffs)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn construction_trims_trailing_zeros() {
        assert_eq!(Polynomial::new(vec![1.0, 2.0, 0.0]).coeffs(), &[1.0, 2.0]);
        assert!(Polynomial::new(vec![0.0, 1e-12]).is_zero());
    }

    #[test]
    fn degree_and_leading() {
        let p = Polynomial::new(vec![-1.0, 0.0, 1.0]);
        assert_eq!(p.degree(), Some(2));
        assert_eq!(p.leading(), 1.0);
        assert_eq!(Polynomial::zero().degree(), None);
    }

    #[test]
    fn arithmetic() {
        let p = Polynomial::new(vec![1.0, 1.0]);
        let q = Polynomial::new(vec![-1.0, 1.0]);
        assert_eq!((&p + &q).coeffs(), &[0.0, 2.0]);
        assert_eq!((&p - &q).coeffs(), &[2.0]);
        // (x + 1)(x - 1) = x^2 - 1
        assert_eq!((&p * &q).coeffs(), &[-1.0, 0.0, 1.0]);
    }

    #[test]
    fn division_with_remainder() {
        // (x^2 + 3x + 5) / (x + 1) = x + 2 remainder 3
        let numerator = Polynomial::new(vec![5.0, 3.0, 1.0]);
        let divisor = Polynomial::new(vec![1.0, 1.0]);
        let (quotient, remainder) = numerator.div_rem(&divisor).unwrap();
        assert_eq!(quotient.coeffs(), &[2.0, 1.0]);
        assert_eq!(remainder.coeffs(), &[3.0]);
    }

    #[test]
    fn division_by_zero_polynomial_fails() {
        let p = Polynomial::new(vec![1.0, 1.0]);
        assert!(p.div_rem(&Polynomial::zero()).is_err());
    }

    #[test]
    fn gcd_is_monic() {
        // gcd(x^2 - 1, x - 1) = x - 1
        let a = Polynomial::new(vec![-1.0, 0.0, 1.0]);
        let b = Polynomial::new(vec![-1.0, 1.0]);
        assert_eq!(a.gcd(&b).coeffs(), &[-1.0, 1.0]);

        // gcd(2x + 2, 4) = 1: constants divide everything
        let c = Polynomial::new(vec![2.0, 2.0]);
        let d = Polynomial::constant(4.0);
        assert_eq!(c.gcd(&d).coeffs(), &[1.0]);
    }

    #[test]
    fn horner_evaluation() {
        let p = Polynomial::new(vec![1.0, 2.0, 1.0]);
        assert_eq!(p.eval(3.0), 16.0);
    }
}
