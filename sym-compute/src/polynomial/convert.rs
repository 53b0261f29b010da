//! Conversion between [`Expression`] trees and polynomial containers.
//!
//! Only genuinely polynomial shapes convert: numbers, symbols, `Plus`, `Times`, and
//! `Power` with a non-negative integer exponent. Anything else (trig calls, fractional
//! powers, strings) fails with a domain error naming the offending subexpression.

use crate::error::{kind, Error};
use crate::expr::Expression;
use super::{Monomial, MultiPolynomial, Polynomial};

/// Converts an expression to a multivariate polynomial, inferring the variable set from
/// its symbols.
pub fn expr_to_multi(expr: &Expression) -> Result<MultiPolynomial, Error> {
    match expr {
        Expression::Number(n) => Ok(MultiPolynomial::constant(*n)),
        Expression::Rational(r) => Ok(MultiPolynomial::constant(r.to_f64())),
        Expression::Symbol(name) => Ok(MultiPolynomial::variable(name)),
        Expression::Call(head, args) if head == "Plus" => {
            let mut sum = MultiPolynomial::zero();
            for arg in args {
                sum = &sum + &expr_to_multi(arg)?;
            }
            Ok(sum)
        },
        Expression::Call(head, args) if head == "Times" => {
            let mut product = MultiPolynomial::constant(1.0);
            for arg in args {
                product = &product * &expr_to_multi(arg)?;
            }
            Ok(product)
        },
        Expression::Call(head, args) if head == "Power" && args.len() == 2 => {
            match args[1].as_integer() {
                Some(exponent) if exponent >= 0 => {
                    Ok(expr_to_multi(&args[0])?.pow(exponent as u32))
                },
                _ => Err(non_polynomial(expr)),
            }
        },
        _ => Err(non_polynomial(expr)),
    }
}

/// Converts an expression to a univariate polynomial.
///
/// The variable may be supplied by the caller; otherwise it is inferred, which requires the
/// expression to contain at most one distinct symbol.
pub fn expr_to_univariate(
    expr: &Expression,
    variable: Option<&str>,
) -> Result<(Polynomial, String), Error> {
    let multi = expr_to_multi(expr)?;
    let vars = multi.variables();

    let variable = match variable {
        Some(name) => name.to_string(),
        None if vars.len() <= 1 => {
            vars.iter().next().cloned().unwrap_or_else(|| "x".to_string())
        },
        None => {
            return Err(Error::new(vec![], kind::MultivariateUnsupported {
                count: vars.len(),
            }));
        },
    };

    if vars.iter().any(|name| *name != variable) {
        return Err(Error::new(vec![], kind::MultivariateUnsupported { count: vars.len() }));
    }

    let mut coeffs = Vec::new();
    for (monomial, coeff) in multi.terms() {
        let exponent = monomial.get(&variable).copied().unwrap_or(0) as usize;
        if coeffs.len() <= exponent {
            coeffs.resize(exponent + 1, 0.0);
        }
        coeffs[exponent] += coeff;
    }
    Ok((Polynomial::new(coeffs), variable))
}

/// Rebuilds an expression from a univariate polynomial, highest degree first.
pub fn univariate_to_expr(poly: &Polynomial, variable: &str) -> Expression {
    let terms: Vec<Expression> = poly
        .coeffs()
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, coeff)| **coeff != 0.0)
        .map(|(exponent, coeff)| term_expr(*coeff, variable, exponent as u32))
        .collect();
    sum_expr(terms)
}

/// Rebuilds an expression from a multivariate polynomial.
pub fn multi_to_expr(poly: &MultiPolynomial) -> Expression {
    let terms: Vec<Expression> = poly
        .terms()
        .iter()
        .map(|(monomial, coeff)| monomial_expr(*coeff, monomial))
        .collect();
    sum_expr(terms)
}

fn sum_expr(mut terms: Vec<Expression>) -> Expression {
    match terms.len() {
        0 => Expression::Number(0.0),
        1 => terms.remove(0),
        _ => Expression::call("Plus", terms),
    }
}

/// A single `coeff * variable^exponent` term, with the trivial parts left off.
fn term_expr(coeff: f64, variable: &str, exponent: u32) -> Expression {
    let power = match exponent {
        0 => return Expression::Number(coeff),
        1 => Expression::symbol(variable),
        _ => Expression::call("Power", vec![
            Expression::symbol(variable),
            Expression::Number(exponent as f64),
        ]),
    };
    if coeff == 1.0 {
        power
    } else {
        Expression::call("Times", vec![Expression::Number(coeff), power])
    }
}

fn monomial_expr(coeff: f64, monomial: &Monomial) -> Expression {
    let mut factors = Vec::new();
    if coeff != 1.0 || monomial.is_empty() {
        factors.push(Expression::Number(coeff));
    }
    for (name, exponent) in monomial {
        factors.push(match exponent {
            1 => Expression::symbol(name),
            _ => Expression::call("Power", vec![
                Expression::symbol(name),
                Expression::Number(*exponent as f64),
            ]),
        });
    }
    match factors.len() {
        1 => factors.remove(0),
        _ => Expression::call("Times", factors),
    }
}

fn non_polynomial(expr: &Expression) -> Error {
    Error::new(vec![], kind::NonPolynomialExpression { expr: expr.to_string() })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> Expression {
        crate::parse(source).unwrap()
    }

    #[test]
    fn quadratic_round_trip() {
        let (poly, variable) = expr_to_univariate(&parse("x^2 + 2 x + 1"), None).unwrap();
        assert_eq!(poly.coeffs(), &[1.0, 2.0, 1.0]);
        assert_eq!(variable, "x");
        assert_eq!(
            univariate_to_expr(&poly, &variable).to_string(),
            "x^2 + 2 * x + 1",
        );
    }

    #[test]
    fn constant_expression_converts() {
        let (poly, _) = expr_to_univariate(&parse("7"), None).unwrap();
        assert_eq!(poly.coeffs(), &[7.0]);
    }

    #[test]
    fn two_variables_need_an_explicit_choice() {
        let expr = parse("x + y");
        assert!(expr_to_univariate(&expr, None).is_err());
        assert!(expr_to_univariate(&expr, Some("x")).is_err());
    }

    #[test]
    fn non_polynomial_shapes_are_rejected() {
        assert!(expr_to_multi(&parse("Sin[x]")).is_err());
        assert!(expr_to_multi(&parse("x ^ (1 / 2)")).is_err());
    }

    #[test]
    fn multivariate_expression_converts() {
        let poly = expr_to_multi(&parse("x y + 2")).unwrap();
        assert_eq!(poly.terms().len(), 2);
    }
}
