//! Arithmetic over evaluated operands: the n-ary `Plus`/`Times` folds, `Divide` and
//! `Power` with their division-by-zero sentinels, and the comparison operators.
//!
//! Numbers live on a small tower: exact rationals at the bottom, floats above them,
//! complex numbers at the top. Integer-valued floats enter the tower as rationals, so
//! `2 / 4` is exactly `1/2` and `3^40` only falls back to floating point when `i64`
//! arithmetic actually overflows.

use crate::error::{kind, Error};
use crate::expr::Expression;
use crate::rational::Rational;
use std::cmp::Ordering;

/// A numeric operand, in increasing order of generality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Num {
    Rational(Rational),
    Float(f64),
    Complex(f64, f64),
}

impl Num {
    /// Interprets an expression as a number, if it is one. Integer-valued floats become
    /// exact rationals.
    pub(super) fn from_expr(expr: &Expression) -> Option<Num> {
        match expr {
            Expression::Number(n) => match n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                true => Some(Num::Rational(Rational::from_integer(*n as i64))),
                false => Some(Num::Float(*n)),
            },
            Expression::Rational(r) => Some(Num::Rational(*r)),
            Expression::Complex(re, im) => Some(Num::Complex(*re, *im)),
            _ => None,
        }
    }

    /// Converts back to an expression, collapsing degenerate forms (integer rationals to
    /// numbers, real complex values to numbers).
    pub(super) fn into_expr(self) -> Expression {
        match self {
            Num::Rational(r) if r.is_integer() => Expression::Number(r.numerator() as f64),
            Num::Rational(r) => Expression::Rational(r),
            Num::Float(n) => Expression::Number(n),
            Num::Complex(re, im) if im == 0.0 => Expression::Number(re),
            Num::Complex(re, im) => Expression::Complex(re, im),
        }
    }

    fn to_f64(self) -> f64 {
        match self {
            Num::Rational(r) => r.to_f64(),
            Num::Float(n) => n,
            Num::Complex(re, _) => re,
        }
    }

    fn to_complex(self) -> (f64, f64) {
        match self {
            Num::Complex(re, im) => (re, im),
            other => (other.to_f64(), 0.0),
        }
    }

    pub(super) fn is_zero(self) -> bool {
        match self {
            Num::Rational(r) => r.is_zero(),
            Num::Float(n) => n == 0.0,
            Num::Complex(re, im) => re == 0.0 && im == 0.0,
        }
    }

    fn is_one(self) -> bool {
        match self {
            Num::Rational(r) => r.is_integer() && r.numerator() == 1,
            Num::Float(n) => n == 1.0,
            Num::Complex(re, im) => re == 1.0 && im == 0.0,
        }
    }

    pub(super) fn add(self, rhs: Num) -> Num {
        match (self, rhs) {
            (Num::Rational(a), Num::Rational(b)) => a
                .checked_add(&b)
                .map(Num::Rational)
                .unwrap_or(Num::Float(a.to_f64() + b.to_f64())),
            (Num::Complex(..), _) | (_, Num::Complex(..)) => {
                let ((ar, ai), (br, bi)) = (self.to_complex(), rhs.to_complex());
                Num::Complex(ar + br, ai + bi)
            },
            _ => Num::Float(self.to_f64() + rhs.to_f64()),
        }
    }

    pub(super) fn mul(self, rhs: Num) -> Num {
        match (self, rhs) {
            (Num::Rational(a), Num::Rational(b)) => a
                .checked_mul(&b)
                .map(Num::Rational)
                .unwrap_or(Num::Float(a.to_f64() * b.to_f64())),
            (Num::Complex(..), _) | (_, Num::Complex(..)) => {
                let ((ar, ai), (br, bi)) = (self.to_complex(), rhs.to_complex());
                Num::Complex(ar * br - ai * bi, ar * bi + ai * br)
            },
            _ => Num::Float(self.to_f64() * rhs.to_f64()),
        }
    }

    /// Division. Returns `None` when the divisor is zero, so the caller can pick the right
    /// sentinel.
    fn div(self, rhs: Num) -> Option<Num> {
        if rhs.is_zero() {
            return None;
        }
        Some(match (self, rhs) {
            (Num::Rational(a), Num::Rational(b)) => a
                .checked_div(&b)
                .map(Num::Rational)
                .unwrap_or(Num::Float(a.to_f64() / b.to_f64())),
            (Num::Complex(..), _) | (_, Num::Complex(..)) => {
                let ((ar, ai), (br, bi)) = (self.to_complex(), rhs.to_complex());
                let norm = br * br + bi * bi;
                Num::Complex((ar * br + ai * bi) / norm, (ai * br - ar * bi) / norm)
            },
            _ => Num::Float(self.to_f64() / rhs.to_f64()),
        })
    }

    /// Exact comparison where both sides are rational, floating point otherwise. `None`
    /// for complex operands, which have no natural order.
    fn partial_cmp(self, rhs: Num) -> Option<Ordering> {
        match (self, rhs) {
            (Num::Rational(a), Num::Rational(b)) => a.partial_cmp(&b),
            (Num::Complex(..), _) | (_, Num::Complex(..)) => None,
            _ => self.to_f64().partial_cmp(&rhs.to_f64()),
        }
    }

    fn eq_num(self, rhs: Num) -> bool {
        match (self, rhs) {
            (Num::Rational(a), Num::Rational(b)) => a == b,
            (Num::Complex(..), _) | (_, Num::Complex(..)) => {
                self.to_complex() == rhs.to_complex()
            },
            _ => self.to_f64() == rhs.to_f64(),
        }
    }
}

/// A type-mismatch error for an operand a numeric operator cannot digest.
fn numeric_mismatch(head: &'static str, found: &Expression) -> Error {
    Error::new(vec![], kind::TypeMismatch {
        head,
        expected: "a number",
        found: found.typename(),
    })
}

/// Splits evaluated operands into a folded numeric part, symbolic residues, and sentinel
/// flags. Nested applications of the same head are flattened along the way.
struct FoldState {
    acc: Option<Num>,
    residues: Vec<Expression>,
    infinity: bool,
    indeterminate: bool,
}

impl FoldState {
    fn fold(
        head: &'static str,
        args: Vec<Expression>,
        combine: impl Fn(Num, Num) -> Num,
    ) -> Result<FoldState, Error> {
        let mut state = FoldState {
            acc: None,
            residues: Vec::new(),
            infinity: false,
            indeterminate: false,
        };
        let mut queue = args;
        queue.reverse();
        while let Some(arg) = queue.pop() {
            match arg {
                Expression::Infinity => state.infinity = true,
                Expression::Indeterminate => state.indeterminate = true,
                Expression::Call(inner, inner_args) if inner == head => {
                    // flatten `Plus[Plus[..], ..]` and the `Times` analogue
                    for inner_arg in inner_args.into_iter().rev() {
                        queue.push(inner_arg);
                    }
                },
                arg => match Num::from_expr(&arg) {
                    Some(num) => {
                        state.acc = Some(match state.acc {
                            Some(acc) => combine(acc, num),
                            None => num,
                        });
                    },
                    None if matches!(arg, Expression::Symbol(_) | Expression::Call(..)) => {
                        state.residues.push(arg);
                    },
                    None => return Err(numeric_mismatch(head, &arg)),
                },
            }
        }
        Ok(state)
    }
}

/// The n-ary sum.
pub fn plus(args: Vec<Expression>) -> Result<Expression, Error> {
    let state = FoldState::fold("Plus", args, Num::add)?;
    if state.indeterminate {
        return Ok(Expression::Indeterminate);
    }
    if state.infinity {
        return Ok(Expression::Infinity);
    }

    let mut terms = state.residues;
    match state.acc {
        Some(num) if !num.is_zero() || terms.is_empty() => terms.push(num.into_expr()),
        _ => {},
    }
    Ok(match terms.len() {
        0 => Expression::Number(0.0),
        1 => terms.remove(0),
        _ => Expression::call("Plus", terms),
    })
}

/// The n-ary product.
pub fn times(args: Vec<Expression>) -> Result<Expression, Error> {
    let state = FoldState::fold("Times", args, Num::mul)?;
    if state.indeterminate {
        return Ok(Expression::Indeterminate);
    }
    let zero = state.acc.is_some_and(Num::is_zero);
    if state.infinity {
        // `0 * Infinity` is the classic indeterminate form
        return Ok(if zero { Expression::Indeterminate } else { Expression::Infinity });
    }
    if zero {
        return Ok(Expression::Number(0.0));
    }

    let mut factors = Vec::new();
    match state.acc {
        Some(num) if !num.is_one() || state.residues.is_empty() => {
            factors.push(num.into_expr());
        },
        _ => {},
    }
    factors.extend(state.residues);
    Ok(match factors.len() {
        0 => Expression::Number(1.0),
        1 => factors.remove(0),
        _ => Expression::call("Times", factors),
    })
}

/// Binary division, with `Infinity`/`Indeterminate` for zero divisors.
pub fn divide(lhs: Expression, rhs: Expression) -> Result<Expression, Error> {
    match (&lhs, &rhs) {
        (Expression::Indeterminate, _) | (_, Expression::Indeterminate) => {
            return Ok(Expression::Indeterminate);
        },
        (Expression::Infinity, Expression::Infinity) => {
            return Ok(Expression::Indeterminate);
        },
        (Expression::Infinity, _) => return Ok(Expression::Infinity),
        (_, Expression::Infinity) => return Ok(Expression::Number(0.0)),
        _ => {},
    }

    if !is_numeric_or_symbolic(&lhs) {
        return Err(numeric_mismatch("Divide", &lhs));
    }
    if !is_numeric_or_symbolic(&rhs) {
        return Err(numeric_mismatch("Divide", &rhs));
    }

    match (Num::from_expr(&lhs), Num::from_expr(&rhs)) {
        (Some(a), Some(b)) => Ok(match a.div(b) {
            Some(quotient) => quotient.into_expr(),
            None if a.is_zero() => Expression::Indeterminate,
            None => Expression::Infinity,
        }),
        _ => Ok(Expression::call("Divide", vec![lhs, rhs])),
    }
}

/// Binary exponentiation.
///
/// Rational bases with integer exponents stay exact; a negative real base with a
/// fractional exponent moves to the complex plane instead of producing NaN.
pub fn power(lhs: Expression, rhs: Expression) -> Result<Expression, Error> {
    match (&lhs, &rhs) {
        (Expression::Indeterminate, _) | (_, Expression::Indeterminate) => {
            return Ok(Expression::Indeterminate);
        },
        (Expression::Infinity, _) | (_, Expression::Infinity) => {
            return Ok(Expression::Infinity);
        },
        _ => {},
    }

    if !is_numeric_or_symbolic(&lhs) {
        return Err(numeric_mismatch("Power", &lhs));
    }
    if !is_numeric_or_symbolic(&rhs) {
        return Err(numeric_mismatch("Power", &rhs));
    }

    let (base, exponent) = (Num::from_expr(&lhs), Num::from_expr(&rhs));
    if let (Some(base), Some(exponent)) = (base, exponent) {
        // 0^0 and 0^negative are division-by-zero in disguise
        if base.is_zero() {
            return Ok(match exponent.partial_cmp(Num::Float(0.0)) {
                Some(Ordering::Greater) => Expression::Number(0.0),
                Some(Ordering::Equal) => Expression::Indeterminate,
                _ => Expression::Infinity,
            });
        }
        return Ok(numeric_power(base, exponent).into_expr());
    }

    // symbolic: `x^1`, `x^0`, and `1^x` collapse, anything else stays put
    if rhs.is_one() {
        return Ok(lhs);
    }
    if exponent.is_some_and(Num::is_zero) || base.is_some_and(Num::is_one) {
        return Ok(Expression::Number(1.0));
    }
    Ok(Expression::call("Power", vec![lhs, rhs]))
}

fn numeric_power(base: Num, exponent: Num) -> Num {
    if let (Num::Rational(b), Num::Rational(e)) = (base, exponent) {
        if e.is_integer() {
            if let Some(result) = b.checked_pow(e.numerator()) {
                return Num::Rational(result);
            }
            return Num::Float(b.to_f64().powf(e.numerator() as f64));
        }
    }

    match (base, exponent) {
        // integer powers of complex numbers stay exact via repeated multiplication
        (Num::Complex(..), Num::Rational(e)) if e.is_integer() => {
            let mut result = Num::Complex(1.0, 0.0);
            for _ in 0..e.numerator().unsigned_abs().min(u32::MAX as u64) {
                result = result.mul(base);
            }
            if e.numerator() < 0 {
                result = Num::Complex(1.0, 0.0).div(result).unwrap_or(Num::Float(f64::INFINITY));
            }
            result
        },
        (Num::Complex(..), _) | (_, Num::Complex(..)) => {
            complex_power(base.to_complex(), exponent.to_complex())
        },
        _ => {
            let (b, e) = (base.to_f64(), exponent.to_f64());
            if b < 0.0 && e.fract() != 0.0 {
                // principal value via the complex exponential
                complex_power((b, 0.0), (e, 0.0))
            } else {
                Num::Float(b.powf(e))
            }
        },
    }
}

/// `(a + bi)^(c + di)` by the principal branch of the complex logarithm.
fn complex_power((ar, ai): (f64, f64), (br, bi): (f64, f64)) -> Num {
    let (r, theta) = (ar.hypot(ai), ai.atan2(ar));
    let ln_r = r.ln();
    let magnitude = (br * ln_r - bi * theta).exp();
    let angle = bi * ln_r + br * theta;
    Num::Complex(magnitude * angle.cos(), magnitude * angle.sin())
}

/// The comparison operators. Rational against rational compares exactly by
/// cross-multiplication; mixed operands compare as floats.
pub fn compare(head: &str, lhs: Expression, rhs: Expression) -> Result<Expression, Error> {
    if is_symbolic_operand(&lhs) || is_symbolic_operand(&rhs) {
        return Ok(Expression::Call(head.to_string(), vec![lhs, rhs]));
    }

    if matches!(head, "Equal" | "Unequal") {
        let equal = match (Num::from_expr(&lhs), Num::from_expr(&rhs)) {
            (Some(a), Some(b)) => a.eq_num(b),
            _ => lhs == rhs,
        };
        return Ok(Expression::Bool(if head == "Equal" { equal } else { !equal }));
    }

    let ordering = match (Num::from_expr(&lhs), Num::from_expr(&rhs)) {
        (Some(a), Some(b)) => a.partial_cmp(b),
        (None, _) => return Err(numeric_mismatch("Less", &lhs)),
        _ => return Err(numeric_mismatch("Less", &rhs)),
    };
    let Some(ordering) = ordering else {
        return Err(Error::new(vec![], kind::TypeMismatch {
            head: "Less",
            expected: "a real number",
            found: "Complex",
        }));
    };

    Ok(Expression::Bool(match head {
        "Less" => ordering == Ordering::Less,
        "LessEqual" => ordering != Ordering::Greater,
        "Greater" => ordering == Ordering::Greater,
        _ => ordering != Ordering::Less,
    }))
}

/// True for operands that should flow through arithmetic unevaluated.
fn is_symbolic_operand(expr: &Expression) -> bool {
    matches!(expr, Expression::Symbol(_) | Expression::Call(..))
}

fn is_numeric_or_symbolic(expr: &Expression) -> bool {
    is_symbolic_operand(expr) || Num::from_expr(expr).is_some()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn n(value: f64) -> Expression {
        Expression::Number(value)
    }

    #[test]
    fn integer_division_stays_exact() {
        assert_eq!(divide(n(2.0), n(4.0)).unwrap(), Expression::rational(1, 2));
        assert_eq!(divide(n(6.0), n(3.0)).unwrap(), n(2.0));
    }

    #[test]
    fn division_by_zero_sentinels() {
        assert_eq!(divide(n(1.0), n(0.0)).unwrap(), Expression::Infinity);
        assert_eq!(divide(n(0.0), n(0.0)).unwrap(), Expression::Indeterminate);
    }

    #[test]
    fn rational_arithmetic_is_exact() {
        // 1/3 + 1/6 = 1/2
        let sum = plus(vec![
            Expression::rational(1, 3),
            Expression::rational(1, 6),
        ]).unwrap();
        assert_eq!(sum, Expression::rational(1, 2));
    }

    #[test]
    fn rational_plus_float_falls_to_float() {
        let sum = plus(vec![Expression::rational(1, 2), n(0.25)]).unwrap();
        assert_eq!(sum, n(0.75));
    }

    #[test]
    fn complex_absorbs() {
        let product = times(vec![Expression::Complex(0.0, 1.0), Expression::Complex(0.0, 1.0)])
            .unwrap();
        assert_eq!(product, n(-1.0));
    }

    #[test]
    fn additive_and_multiplicative_identities() {
        let x = Expression::symbol("x");
        assert_eq!(plus(vec![n(0.0), x.clone()]).unwrap(), x);
        assert_eq!(times(vec![n(1.0), x.clone()]).unwrap(), x);
        assert_eq!(times(vec![n(0.0), x.clone()]).unwrap(), n(0.0));
    }

    #[test]
    fn symbolic_residues_keep_the_call() {
        let x = Expression::symbol("x");
        let sum = plus(vec![n(1.0), x.clone(), n(2.0)]).unwrap();
        assert_eq!(sum, Expression::call("Plus", vec![x, n(3.0)]));
    }

    #[test]
    fn zero_times_infinity_is_indeterminate() {
        let product = times(vec![n(0.0), Expression::Infinity]).unwrap();
        assert_eq!(product, Expression::Indeterminate);
        let sum = plus(vec![n(1.0), Expression::Infinity]).unwrap();
        assert_eq!(sum, Expression::Infinity);
    }

    #[test]
    fn exact_rational_powers() {
        let result = power(Expression::rational(2, 3), n(2.0)).unwrap();
        assert_eq!(result, Expression::rational(4, 9));
        let result = power(Expression::rational(1, 2), n(-2.0)).unwrap();
        assert_eq!(result, n(4.0));
    }

    #[test]
    fn zero_power_sentinels() {
        assert_eq!(power(n(0.0), n(0.0)).unwrap(), Expression::Indeterminate);
        assert_eq!(power(n(0.0), n(-1.0)).unwrap(), Expression::Infinity);
        assert_eq!(power(n(0.0), n(3.0)).unwrap(), n(0.0));
    }

    #[test]
    fn symbolic_power_identities() {
        let x = Expression::symbol("x");
        assert_eq!(power(x.clone(), n(1.0)).unwrap(), x.clone());
        assert_eq!(power(x.clone(), n(0.0)).unwrap(), n(1.0));
        assert_eq!(power(n(1.0), x.clone()).unwrap(), n(1.0));
        assert_eq!(
            power(x.clone(), n(2.0)).unwrap(),
            Expression::call("Power", vec![x, n(2.0)]),
        );
    }

    #[test]
    fn negative_base_fractional_exponent_goes_complex() {
        let result = power(n(-1.0), n(0.5)).unwrap();
        let Expression::Complex(re, im) = result else {
            panic!("expected a complex result, got {result:?}");
        };
        assert!(re.abs() < 1e-12);
        assert!((im - 1.0).abs() < 1e-12);
    }

    #[test]
    fn exact_comparison_of_rationals() {
        // 1/3 < 34/100 even though both round to 0.33 at low precision
        let result = compare(
            "Less",
            Expression::rational(1, 3),
            Expression::rational(34, 100),
        ).unwrap();
        assert_eq!(result, Expression::Bool(true));
    }

    #[test]
    fn equality_across_representations() {
        let result = compare("Equal", Expression::rational(1, 2), n(0.5)).unwrap();
        assert_eq!(result, Expression::Bool(true));
        let result = compare("Unequal", Expression::Str("a".into()), Expression::Str("b".into()))
            .unwrap();
        assert_eq!(result, Expression::Bool(true));
    }

    #[test]
    fn strings_reject_arithmetic() {
        assert!(plus(vec![n(1.0), Expression::Str("x".into())]).is_err());
    }
}
