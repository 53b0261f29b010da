//! Distribution of products over sums.
//!
//! Expansion handles the two shapes that cover the common algebra-class cases: a
//! two-factor product where at least one factor is a two-term sum, and the square of a
//! two-term sum. Anything else passes through untouched. The distributed tree is handed
//! to [`simplify`] so like terms combine and come back in canonical order.

use super::simplify;
use crate::expr::Expression;

/// Expands products over sums, then simplifies the result.
pub fn expand(expr: Expression) -> Expression {
    let expr = expand_node(expr);
    simplify(expr)
}

fn expand_node(expr: Expression) -> Expression {
    let expr = match expr {
        Expression::Call(head, args) => Expression::Call(
            head,
            args.into_iter().map(expand_node).collect(),
        ),
        Expression::List(items) => Expression::List(
            items.into_iter().map(expand_node).collect(),
        ),
        Expression::Rule(lhs, rhs) => Expression::Rule(
            Box::new(expand_node(*lhs)),
            Box::new(expand_node(*rhs)),
        ),
        other => other,
    };

    match expr {
        Expression::Call(head, args) if head == "Times" && args.len() == 2 => {
            match <[Expression; 2]>::try_from(args) {
                Ok([lhs, rhs]) => distribute(lhs, rhs),
                Err(args) => Expression::Call(head, args),
            }
        },
        Expression::Call(head, args) if head == "Power" && args.len() == 2 => {
            match <[Expression; 2]>::try_from(args) {
                Ok([base, exponent]) => binomial_square(base, exponent),
                Err(args) => Expression::Call(head, args),
            }
        },
        other => other,
    }
}

/// A sum with exactly two terms, the only shape distribution applies to.
fn two_terms(expr: &Expression) -> Option<(&Expression, &Expression)> {
    match expr {
        Expression::Call(head, args) if head == "Plus" && args.len() == 2 => {
            Some((&args[0], &args[1]))
        },
        _ => None,
    }
}

/// Distributes a two-factor product when at least one factor is a two-term sum.
fn distribute(lhs: Expression, rhs: Expression) -> Expression {
    match (two_terms(&lhs), two_terms(&rhs)) {
        (Some((a, b)), Some((c, d))) => Expression::call("Plus", vec![
            Expression::call("Times", vec![a.clone(), c.clone()]),
            Expression::call("Times", vec![a.clone(), d.clone()]),
            Expression::call("Times", vec![b.clone(), c.clone()]),
            Expression::call("Times", vec![b.clone(), d.clone()]),
        ]),
        (Some((a, b)), None) => Expression::call("Plus", vec![
            Expression::call("Times", vec![a.clone(), rhs.clone()]),
            Expression::call("Times", vec![b.clone(), rhs]),
        ]),
        (None, Some((c, d))) => Expression::call("Plus", vec![
            Expression::call("Times", vec![lhs.clone(), c.clone()]),
            Expression::call("Times", vec![lhs, d.clone()]),
        ]),
        (None, None) => Expression::call("Times", vec![lhs, rhs]),
    }
}

/// Rewrites `(a + b)^2` as `a^2 + 2 a b + b^2`. Other powers pass through.
fn binomial_square(base: Expression, exponent: Expression) -> Expression {
    let squared = matches!(&exponent, Expression::Number(n) if *n == 2.0);
    match two_terms(&base) {
        Some((a, b)) if squared => Expression::call("Plus", vec![
            Expression::call("Power", vec![a.clone(), Expression::Number(2.0)]),
            Expression::call("Times", vec![
                Expression::Number(2.0),
                a.clone(),
                b.clone(),
            ]),
            Expression::call("Power", vec![b.clone(), Expression::Number(2.0)]),
        ]),
        _ => Expression::call("Power", vec![base, exponent]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Expression {
        crate::parse(source).unwrap()
    }

    #[test]
    fn squared_binomial() {
        assert_eq!(expand(parse("(x + 1)^2")).to_string(), "x^2 + 2 * x + 1");
    }

    #[test]
    fn product_of_two_sums() {
        let expanded = expand(parse("(x + 1) * (y + 2)"));
        assert_eq!(expanded.to_string(), "x * y + 2 * x + y + 2");

        let expanded = expand(parse("(a + b) * (c + d)"));
        assert_eq!(expanded.to_string(), "a * c + a * d + b * c + b * d");
    }

    #[test]
    fn sum_times_atom() {
        assert_eq!(expand(parse("(x + 3) * y")).to_string(), "x * y + 3 * y");
        assert_eq!(expand(parse("y * (x + 3)")).to_string(), "x * y + 3 * y");
    }

    #[test]
    fn untouched_shapes() {
        assert_eq!(expand(parse("(x + 1)^3")).to_string(), "(x + 1)^3");
        assert_eq!(expand(parse("x * y")).to_string(), "x * y");
    }

    #[test]
    fn nested_factors_expand_first() {
        // The inner square expands to a three-term sum, which distribution leaves alone.
        let expanded = expand(parse("((x + 1)^2) * 2"));
        assert_eq!(expanded.to_string(), "2 * (x^2 + 2 * x + 1)");
    }
}
