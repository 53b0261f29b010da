//! Polynomial builtins, bridging expressions to the containers in [`crate::polynomial`].

use crate::error::{kind, Error};
use crate::expr::Expression;
use crate::polynomial::convert::{expr_to_univariate, univariate_to_expr};
use crate::simplify;
use super::{fixed_args, unevaluated};

/// Distributes products over sums and squares binomials, then simplifies.
pub fn expand(args: Vec<Expression>) -> Result<Expression, Error> {
    let [arg] = fixed_args("Expand", ["expr"], args)?;
    Ok(simplify::expand(arg))
}

/// Collects like powers of a variable by converting through the univariate polynomial
/// representation.
///
/// The variable may be given as a second argument; otherwise the expression must contain
/// at most one symbol.
pub fn collect(args: Vec<Expression>) -> Result<Expression, Error> {
    if args.len() > 2 {
        return Err(Error::new(vec![], kind::TooManyArguments {
            name: "Collect".to_string(),
            expected: 2,
            given: args.len(),
        }));
    }
    let mut args = args.into_iter();
    let Some(expr) = args.next() else {
        return Err(Error::new(vec![], kind::MissingArgument {
            name: "Collect".to_string(),
            param: "expr".to_string(),
            expected: 2,
            given: 0,
        }));
    };
    let variable = match args.next() {
        Some(Expression::Symbol(name)) => Some(name),
        Some(other) => {
            return Err(Error::new(vec![], kind::TypeMismatch {
                head: "Collect",
                expected: "a symbol",
                found: other.typename(),
            }));
        },
        None => None,
    };

    let (poly, variable) = expr_to_univariate(&expr, variable.as_deref())?;
    Ok(univariate_to_expr(&poly, &variable))
}

/// Normalizes a polynomial expression. No real factorization is performed; expressions
/// that are not single-variable polynomials pass through unchanged.
pub fn factor(args: Vec<Expression>) -> Result<Expression, Error> {
    let [arg] = fixed_args("Factor", ["expr"], args)?;
    match expr_to_univariate(&arg, None) {
        Ok((poly, variable)) => Ok(univariate_to_expr(&poly, &variable)),
        Err(_) => Ok(arg),
    }
}

/// The greatest common divisor: exact for integers, the monic polynomial GCD otherwise.
pub fn gcd(args: Vec<Expression>) -> Result<Expression, Error> {
    let [a, b] = fixed_args("GCD", ["a", "b"], args)?;

    if let (Some(a), Some(b)) = (a.as_integer(), b.as_integer()) {
        return Ok(Expression::Number(integer_gcd(a, b) as f64));
    }

    let variable = common_variable(&a, &b);
    let (left, right) = match (
        expr_to_univariate(&a, variable.as_deref()),
        expr_to_univariate(&b, variable.as_deref()),
    ) {
        (Ok((left, _)), Ok((right, _))) => (left, right),
        // one side is not a polynomial; leave the call symbolic
        _ => return Ok(unevaluated("GCD", vec![a, b])),
    };
    let variable = variable.unwrap_or_else(|| "x".to_string());
    Ok(univariate_to_expr(&left.gcd(&right), &variable))
}

/// The quotient of polynomial division, discarding the remainder. The variable may be
/// given as a third argument.
pub fn polynomial_quotient(args: Vec<Expression>) -> Result<Expression, Error> {
    let (numerator, denominator, variable) = match args.len() {
        3 => {
            let [n, d, v] = fixed_args("PolynomialQuotient", ["a", "b", "var"], args)?;
            let Expression::Symbol(name) = v else {
                return Err(Error::new(vec![], kind::TypeMismatch {
                    head: "PolynomialQuotient",
                    expected: "a symbol",
                    found: v.typename(),
                }));
            };
            (n, d, Some(name))
        },
        _ => {
            let [n, d] = fixed_args("PolynomialQuotient", ["a", "b"], args)?;
            let variable = common_variable(&n, &d);
            (n, d, variable)
        },
    };

    let (left, var) = expr_to_univariate(&numerator, variable.as_deref())?;
    let (right, _) = expr_to_univariate(&denominator, Some(&var))?;
    let (quotient, _) = left.div_rem(&right)?;
    Ok(univariate_to_expr(&quotient, &var))
}

/// The single variable shared by two expressions, when there is exactly one.
fn common_variable(a: &Expression, b: &Expression) -> Option<String> {
    let mut vars = a.free_symbols();
    vars.extend(b.free_symbols());
    if vars.len() == 1 {
        vars.into_iter().next()
    } else {
        None
    }
}

fn integer_gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> Expression {
        crate::parse(source).unwrap()
    }

    #[test]
    fn integer_gcd_fast_path() {
        assert_eq!(
            gcd(vec![Expression::Number(12.0), Expression::Number(18.0)]).unwrap(),
            Expression::Number(6.0),
        );
    }

    #[test]
    fn polynomial_gcd_is_monic() {
        let result = gcd(vec![parse("x^2 - 1"), parse("x - 1")]).unwrap();
        assert_eq!(result.to_string(), "x - 1");
    }

    #[test]
    fn quotient_discards_remainder() {
        let result = polynomial_quotient(vec![
            parse("x^2 + 3 x + 5"),
            parse("x + 1"),
        ]).unwrap();
        assert_eq!(result.to_string(), "x + 2");
    }

    #[test]
    fn collect_combines_like_powers() {
        let result = collect(vec![parse("x + x + x^2")]).unwrap();
        assert_eq!(result.to_string(), "x^2 + 2 * x");
    }

    #[test]
    fn collect_rejects_two_free_variables() {
        assert!(collect(vec![parse("x + y")]).is_err());
    }

    #[test]
    fn factor_passes_non_polynomials_through() {
        let expr = parse("Sin[x]");
        assert_eq!(factor(vec![expr.clone()]).unwrap(), expr);
    }
}
