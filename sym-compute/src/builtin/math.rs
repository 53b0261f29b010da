//! Numeric builtins: elementary functions, rounding, and numeric coercion.

use crate::error::{kind, Error};
use crate::expr::Expression;
use super::{fixed_args, is_symbolic, unevaluated};

/// The numeric value of an expression, if it is real-valued.
fn real_value(expr: &Expression) -> Option<f64> {
    match expr {
        Expression::Number(n) => Some(*n),
        Expression::Rational(r) => Some(r.to_f64()),
        _ => None,
    }
}

/// Applies a real function to a single numeric argument, passing symbolic arguments through
/// unevaluated.
fn unary_real(
    name: &'static str,
    args: Vec<Expression>,
    f: impl Fn(f64) -> f64,
) -> Result<Expression, Error> {
    let [arg] = fixed_args(name, ["x"], args)?;
    match real_value(&arg) {
        Some(value) => Ok(Expression::Number(f(value))),
        None if is_symbolic(&arg) => Ok(unevaluated(name, vec![arg])),
        None => Err(Error::new(vec![], kind::TypeMismatch {
            head: name,
            expected: "a real number",
            found: arg.typename(),
        })),
    }
}

pub fn sin(args: Vec<Expression>) -> Result<Expression, Error> {
    unary_real("Sin", args, f64::sin)
}

pub fn cos(args: Vec<Expression>) -> Result<Expression, Error> {
    unary_real("Cos", args, f64::cos)
}

pub fn tan(args: Vec<Expression>) -> Result<Expression, Error> {
    unary_real("Tan", args, f64::tan)
}

pub fn exp(args: Vec<Expression>) -> Result<Expression, Error> {
    unary_real("Exp", args, f64::exp)
}

/// The natural logarithm.
pub fn log(args: Vec<Expression>) -> Result<Expression, Error> {
    unary_real("Log", args, f64::ln)
}

pub fn floor(args: Vec<Expression>) -> Result<Expression, Error> {
    unary_real("Floor", args, f64::floor)
}

pub fn ceiling(args: Vec<Expression>) -> Result<Expression, Error> {
    unary_real("Ceiling", args, f64::ceil)
}

pub fn round(args: Vec<Expression>) -> Result<Expression, Error> {
    unary_real("Round", args, f64::round)
}

/// The square root. Negative real arguments produce a complex result rather than NaN.
pub fn sqrt(args: Vec<Expression>) -> Result<Expression, Error> {
    let [arg] = fixed_args("Sqrt", ["x"], args)?;
    match (real_value(&arg), &arg) {
        (Some(value), _) if value < 0.0 => Ok(Expression::Complex(0.0, (-value).sqrt())),
        (Some(value), _) => Ok(Expression::Number(value.sqrt())),
        (None, Expression::Complex(re, im)) => {
            // principal square root via the half-angle form
            let (r, theta) = (re.hypot(*im).sqrt(), im.atan2(*re) / 2.0);
            Ok(Expression::Complex(r * theta.cos(), r * theta.sin()))
        },
        (None, _) if is_symbolic(&arg) => Ok(unevaluated("Sqrt", vec![arg])),
        (None, _) => Err(Error::new(vec![], kind::TypeMismatch {
            head: "Sqrt",
            expected: "a number",
            found: arg.typename(),
        })),
    }
}

/// The absolute value. Exact for rationals, the modulus for complex numbers.
pub fn abs(args: Vec<Expression>) -> Result<Expression, Error> {
    let [arg] = fixed_args("Abs", ["x"], args)?;
    match arg {
        Expression::Number(n) => Ok(Expression::Number(n.abs())),
        Expression::Rational(r) => Ok(Expression::rational(
            r.numerator().abs(),
            r.denominator(),
        )),
        Expression::Complex(re, im) => Ok(Expression::Number(re.hypot(im))),
        arg if is_symbolic(&arg) => Ok(unevaluated("Abs", vec![arg])),
        arg => Err(Error::new(vec![], kind::TypeMismatch {
            head: "Abs",
            expected: "a number",
            found: arg.typename(),
        })),
    }
}

/// Boolean negation.
pub fn not(args: Vec<Expression>) -> Result<Expression, Error> {
    let [arg] = fixed_args("Not", ["value"], args)?;
    match arg {
        Expression::Bool(b) => Ok(Expression::Bool(!b)),
        arg if is_symbolic(&arg) => Ok(unevaluated("Not", vec![arg])),
        arg => Err(Error::new(vec![], kind::TypeMismatch {
            head: "Not",
            expected: "a boolean",
            found: arg.typename(),
        })),
    }
}

/// Forces every exact number in the expression to floating point.
pub fn numeric(args: Vec<Expression>) -> Result<Expression, Error> {
    let [arg] = fixed_args("N", ["expr"], args)?;
    Ok(force_numeric(arg))
}

fn force_numeric(expr: Expression) -> Expression {
    match expr {
        Expression::Rational(r) => Expression::Number(r.to_f64()),
        Expression::Call(head, args) => {
            Expression::Call(head, args.into_iter().map(force_numeric).collect())
        },
        Expression::List(items) => {
            Expression::List(items.into_iter().map(force_numeric).collect())
        },
        Expression::Rule(lhs, rhs) => Expression::Rule(
            Box::new(force_numeric(*lhs)),
            Box::new(force_numeric(*rhs)),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn trig_on_numbers() {
        assert_eq!(
            sin(vec![Expression::Number(0.0)]).unwrap(),
            Expression::Number(0.0),
        );
    }

    #[test]
    fn symbolic_arguments_pass_through() {
        assert_eq!(
            sin(vec![Expression::symbol("x")]).unwrap(),
            Expression::call("Sin", vec![Expression::symbol("x")]),
        );
    }

    #[test]
    fn sqrt_of_negative_is_complex() {
        assert_eq!(
            sqrt(vec![Expression::Number(-4.0)]).unwrap(),
            Expression::Complex(0.0, 2.0),
        );
    }

    #[test]
    fn abs_of_rational_is_exact() {
        assert_eq!(
            abs(vec![Expression::rational(-3, 2)]).unwrap(),
            Expression::rational(3, 2),
        );
    }

    #[test]
    fn numeric_converts_rationals_recursively() {
        let expr = Expression::call("Plus", vec![
            Expression::rational(1, 2),
            Expression::symbol("x"),
        ]);
        assert_eq!(
            numeric(vec![expr]).unwrap(),
            Expression::call("Plus", vec![
                Expression::Number(0.5),
                Expression::symbol("x"),
            ]),
        );
    }

    #[test]
    fn wrong_arity_is_reported() {
        assert!(sin(vec![]).is_err());
        assert!(sin(vec![Expression::Number(1.0), Expression::Number(2.0)]).is_err());
    }

    #[test]
    fn string_argument_is_a_type_error() {
        assert!(sin(vec![Expression::Str("hi".into())]).is_err());
    }
}
