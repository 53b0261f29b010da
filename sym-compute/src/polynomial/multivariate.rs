//! Sparse polynomials in any number of variables.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::{Add, Mul, Sub};
use super::EPSILON;

/// A monomial: each variable mapped to its (positive) exponent. The empty map is the
/// constant monomial.
pub type Monomial = BTreeMap<String, u32>;

/// A polynomial in several variables, stored as a map from monomial to coefficient.
///
/// Construction and every arithmetic operation pass through [`MultiPolynomial::normalize`],
/// so stored coefficients are never (near-)zero and exponents are never zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiPolynomial {
    terms: BTreeMap<Monomial, f64>,
}

impl MultiPolynomial {
    /// Creates a polynomial from raw terms.
    pub fn new(terms: BTreeMap<Monomial, f64>) -> MultiPolynomial {
        let mut poly = MultiPolynomial { terms };
        poly.normalize();
        poly
    }

    /// The zero polynomial.
    pub fn zero() -> MultiPolynomial {
        MultiPolynomial::default()
    }

    /// A constant polynomial.
    pub fn constant(value: f64) -> MultiPolynomial {
        MultiPolynomial::new(BTreeMap::from([(Monomial::new(), value)]))
    }

    /// The monomial `variable^1`.
    pub fn variable(name: &str) -> MultiPolynomial {
        MultiPolynomial::new(BTreeMap::from([
            (Monomial::from([(name.to_string(), 1)]), 1.0),
        ]))
    }

    /// The terms of the polynomial.
    pub fn terms(&self) -> &BTreeMap<Monomial, f64> {
        &self.terms
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Every variable that appears in the polynomial.
    pub fn variables(&self) -> BTreeSet<String> {
        self.terms
            .keys()
            .flat_map(|monomial| monomial.keys().cloned())
            .collect()
    }

    /// Drops terms with a (near-)zero coefficient and zero exponents within monomials.
    fn normalize(&mut self) {
        self.terms = std::mem::take(&mut self.terms)
            .into_iter()
            .filter(|(_, coeff)| coeff.abs() >= EPSILON)
            .map(|(monomial, coeff)| {
                let monomial: Monomial = monomial
                    .into_iter()
                    .filter(|(_, exponent)| *exponent > 0)
                    .collect();
                (monomial, coeff)
            })
            .collect();
    }

    /// Raises the polynomial to a non-negative integer power.
    pub fn pow(&self, exponent: u32) -> MultiPolynomial {
        let mut result = MultiPolynomial::constant(1.0);
        for _ in 0..exponent {
            result = &result * self;
        }
        result
    }
}

impl Add for &MultiPolynomial {
    type Output = MultiPolynomial;

    fn add(self, rhs: &MultiPolynomial) -> MultiPolynomial {
        let mut terms = self.terms.clone();
        for (monomial, coeff) in &rhs.terms {
            *terms.entry(monomial.clone()).or_insert(0.0) += coeff;
        }
        MultiPolynomial::new(terms)
    }
}

impl Sub for &MultiPolynomial {
    type Output = MultiPolynomial;

    fn sub(self, rhs: &MultiPolynomial) -> MultiPolynomial {
        let mut terms = self.terms.clone();
        for (monomial, coeff) in &rhs.terms {
            *terms.entry(monomial.clone()).or_insert(0.0) -= coeff;
        }
        MultiPolynomial::new(terms)
    }
}

impl Mul for &MultiPolynomial {
    type Output = MultiPolynomial;

    fn mul(self, rhs: &MultiPolynomial) -> MultiPolynomial {
        let mut terms: BTreeMap<Monomial, f64> = BTreeMap::new();
        for (left, a) in &self.terms {
            for (right, b) in &rhs.terms {
                let mut monomial = left.clone();
                for (name, exponent) in right {
                    *monomial.entry(name.clone()).or_insert(0) += exponent;
                }
                *terms.entry(monomial).or_insert(0.0) += a * b;
            }
        }
        MultiPolynomial::new(terms)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn xy() -> (MultiPolynomial, MultiPolynomial) {
        (MultiPolynomial::variable("x"), MultiPolynomial::variable("y"))
    }

    #[test]
    fn cancellation_drops_terms() {
        let (x, _) = xy();
        assert!((&x - &x).is_zero());
    }

    #[test]
    fn product_merges_exponents() {
        let (x, y) = xy();
        // (x + y)(x - y) = x^2 - y^2
        let product = &(&x + &y) * &(&x - &y);
        let expected = MultiPolynomial::new(BTreeMap::from([
            (Monomial::from([("x".to_string(), 2)]), 1.0),
            (Monomial::from([("y".to_string(), 2)]), -1.0),
        ]));
        assert_eq!(product, expected);
    }

    #[test]
    fn variables_are_collected() {
        let (x, y) = xy();
        let p = &x * &y;
        let vars: Vec<_> = p.variables().into_iter().collect();
        assert_eq!(vars, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn pow_repeated_product() {
        let (x, y) = xy();
        let square = (&x + &y).pow(2);
        // x^2 + 2xy + y^2 has three terms
        assert_eq!(square.terms().len(), 3);
    }
}
