//! Structural simplification: a pure tree-rewrite pass with no context.
//!
//! Simplification works bottom-up. Products are collected into a numeric coefficient, a
//! lexicographically ordered symbol-to-exponent map, and a tail of uncombinable factors;
//! sums combine like terms into buckets and come back sorted by a degree heuristic. The
//! pass is idempotent: simplifying a simplified expression changes nothing.

pub mod expand;

pub use expand::expand;

use crate::eval::arith;
use crate::expr::Expression;
use std::collections::BTreeMap;

/// Simplifies an expression.
pub fn simplify(expr: Expression) -> Expression {
    let expr = match expr {
        Expression::Call(head, args) => Expression::Call(
            head,
            args.into_iter().map(simplify).collect(),
        ),
        Expression::List(items) => Expression::List(
            items.into_iter().map(simplify).collect(),
        ),
        Expression::Rule(lhs, rhs) => Expression::Rule(
            Box::new(simplify(*lhs)),
            Box::new(simplify(*rhs)),
        ),
        other => other,
    };

    match expr {
        Expression::Call(head, args) if head == "Times" => simplify_times(args),
        Expression::Call(head, args) if head == "Power" && args.len() == 2 => {
            match <[Expression; 2]>::try_from(args) {
                Ok([base, exponent]) => simplify_power(base, exponent),
                Err(args) => Expression::Call(head, args),
            }
        },
        Expression::Call(head, args) if head == "Plus" => simplify_plus(args),
        other => other,
    }
}

/// The numeric value of a factor, if it has one.
fn numeric(expr: &Expression) -> Option<f64> {
    match expr {
        Expression::Number(n) => Some(*n),
        Expression::Rational(r) => Some(r.to_f64()),
        _ => None,
    }
}

/// Collects a product into `coefficient * (symbols ^ exponents) * rest`, merging repeated
/// symbols by adding their exponents, then rebuilds the canonical factor order.
fn simplify_times(args: Vec<Expression>) -> Expression {
    let mut coefficient = 1.0;
    let mut exponents: BTreeMap<String, f64> = BTreeMap::new();
    let mut rest = Vec::new();

    let mut queue = args;
    queue.reverse();
    while let Some(factor) = queue.pop() {
        match factor {
            Expression::Call(head, inner) if head == "Times" => {
                for factor in inner.into_iter().rev() {
                    queue.push(factor);
                }
            },
            Expression::Symbol(name) => {
                *exponents.entry(name).or_insert(0.0) += 1.0;
            },
            Expression::Call(head, inner) if head == "Power" && inner.len() == 2 => {
                match <[Expression; 2]>::try_from(inner) {
                    Ok([Expression::Symbol(name), exp]) if numeric(&exp).is_some() => {
                        *exponents.entry(name).or_insert(0.0) += numeric(&exp).unwrap_or(0.0);
                    },
                    Ok(pair) => rest.push(Expression::call("Power", pair.to_vec())),
                    Err(inner) => rest.push(Expression::Call(head, inner)),
                }
            },
            factor => match numeric(&factor) {
                Some(value) => coefficient *= value,
                None => rest.push(factor),
            },
        }
    }

    if coefficient == 0.0 {
        return Expression::Number(0.0);
    }

    let mut factors = Vec::new();
    for (name, exponent) in exponents {
        if exponent == 0.0 {
            continue;
        }
        factors.push(if exponent == 1.0 {
            Expression::Symbol(name)
        } else {
            Expression::call("Power", vec![
                Expression::Symbol(name),
                Expression::Number(exponent),
            ])
        });
    }
    factors.extend(rest);

    if coefficient != 1.0 || factors.is_empty() {
        factors.insert(0, Expression::Number(coefficient));
    }
    match factors.len() {
        1 => factors.remove(0),
        _ => Expression::call("Times", factors),
    }
}

/// The four power rewrites: `1^n`, `x^1`, numeric folding, and distribution over a
/// product.
fn simplify_power(base: Expression, exponent: Expression) -> Expression {
    if base.is_one() {
        return Expression::Number(1.0);
    }
    if exponent.is_one() {
        return base;
    }

    if numeric(&base).is_some() && numeric(&exponent).is_some() {
        if let Ok(folded) = arith::power(base.clone(), exponent.clone()) {
            return folded;
        }
    }

    if let (Expression::Call(head, factors), Some(_)) = (&base, numeric(&exponent)) {
        if head == "Times" {
            // (a * b)^n distributes to a^n * b^n
            let distributed = factors
                .iter()
                .map(|factor| {
                    Expression::call("Power", vec![factor.clone(), exponent.clone()])
                })
                .collect();
            return simplify(Expression::call("Times", distributed));
        }
    }

    Expression::call("Power", vec![base, exponent])
}

/// A key identifying which bucket of a sum a term belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum TermKey {
    Constant,
    Symbol(String),
}

/// Combines the like terms of a sum and sorts what remains. Unlike products, a sum of one
/// term is kept as a sum.
fn simplify_plus(args: Vec<Expression>) -> Expression {
    let mut buckets: BTreeMap<TermKey, f64> = BTreeMap::new();
    let mut rest = Vec::new();

    let mut queue = args;
    queue.reverse();
    while let Some(term) = queue.pop() {
        match term {
            Expression::Call(head, inner) if head == "Plus" => {
                for term in inner.into_iter().rev() {
                    queue.push(term);
                }
            },
            Expression::Symbol(name) => {
                *buckets.entry(TermKey::Symbol(name)).or_insert(0.0) += 1.0;
            },
            Expression::Call(head, inner) if head == "Times" && inner.len() == 2 => {
                match <[Expression; 2]>::try_from(inner) {
                    Ok([coefficient, Expression::Symbol(name)])
                        if numeric(&coefficient).is_some() =>
                    {
                        *buckets.entry(TermKey::Symbol(name)).or_insert(0.0) +=
                            numeric(&coefficient).unwrap_or(0.0);
                    },
                    Ok(pair) => rest.push(Expression::call("Times", pair.to_vec())),
                    Err(inner) => rest.push(Expression::Call(head, inner)),
                }
            },
            term => match numeric(&term) {
                Some(value) => {
                    *buckets.entry(TermKey::Constant).or_insert(0.0) += value;
                },
                None => rest.push(term),
            },
        }
    }

    let mut terms = rest;
    for (key, coefficient) in buckets {
        if coefficient == 0.0 {
            continue;
        }
        terms.push(match key {
            TermKey::Constant => Expression::Number(coefficient),
            TermKey::Symbol(name) if coefficient == 1.0 => Expression::Symbol(name),
            TermKey::Symbol(name) => Expression::call("Times", vec![
                Expression::Number(coefficient),
                Expression::Symbol(name),
            ]),
        });
    }

    if terms.is_empty() {
        terms.push(Expression::Number(0.0));
    }
    sort_terms(&mut terms);
    Expression::call("Plus", terms)
}

/// Orders the terms of a sum: higher degree first, display string as the tiebreak.
fn sort_terms(terms: &mut [Expression]) {
    let mut keyed: Vec<(f64, String, Expression)> = terms
        .to_vec()
        .into_iter()
        .map(|term| (degree(&term), term.to_string(), term))
        .collect();
    keyed.sort_by(|(da, sa, _), (db, sb, _)| {
        db.partial_cmp(da).unwrap_or(std::cmp::Ordering::Equal).then_with(|| sa.cmp(sb))
    });
    for (slot, (_, _, term)) in terms.iter_mut().zip(keyed) {
        *slot = term;
    }
}

/// A rough polynomial degree used only for display ordering. Terms with no polynomial
/// reading, such as calls to other functions, get degree -1 and sort after the constants.
fn degree(expr: &Expression) -> f64 {
    match expr {
        Expression::Number(_) | Expression::Rational(_) | Expression::Complex(..) => 0.0,
        Expression::Symbol(_) => 1.0,
        Expression::Call(head, args) if head == "Power" && args.len() == 2 => {
            numeric(&args[1]).unwrap_or(1.0)
        },
        Expression::Call(head, args) if head == "Times" => args.iter().map(degree).sum(),
        Expression::Call(head, args) if head == "Plus" => args
            .iter()
            .map(degree)
            .fold(0.0, f64::max),
        _ => -1.0,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> Expression {
        crate::parse(source).unwrap()
    }

    #[test]
    fn products_collect_symbol_exponents() {
        assert_eq!(simplify(parse("x * x")).to_string(), "x^2");
        assert_eq!(simplify(parse("x^2 * x^3")).to_string(), "x^5");
        assert_eq!(simplify(parse("y * 3 * x")).to_string(), "3 * x * y");
    }

    #[test]
    fn product_identities() {
        assert_eq!(simplify(parse("1 * x")), Expression::symbol("x"));
        assert_eq!(simplify(parse("0 * x")), Expression::Number(0.0));
        assert_eq!(simplify(parse("2 * 3")), Expression::Number(6.0));
    }

    #[test]
    fn power_rules() {
        assert_eq!(simplify(parse("x^1")), Expression::symbol("x"));
        assert_eq!(simplify(parse("1^x")), Expression::Number(1.0));
        assert_eq!(simplify(parse("2^3")), Expression::Number(8.0));
        assert_eq!(simplify(parse("(2 x)^2")).to_string(), "4 * x^2");
    }

    #[test]
    fn sums_combine_like_terms() {
        assert_eq!(simplify(parse("x + x")).to_string(), "2 * x");
        assert_eq!(simplify(parse("2 x + 3 x + 1 + 2")).to_string(), "5 * x + 3");
        assert_eq!(simplify(parse("x + 2 - x - 2 + y")).to_string(), "y");
    }

    #[test]
    fn sum_ordering_puts_high_degrees_first() {
        assert_eq!(simplify(parse("1 + x + x^2")).to_string(), "x^2 + x + 1");
    }

    #[test]
    fn unrecognized_terms_sort_after_constants() {
        assert_eq!(simplify(parse("Sin[y] + 2 + x")).to_string(), "x + 2 + Sin[y]");
    }

    #[test]
    fn simplify_is_idempotent() {
        let once = simplify(parse("2 x + x * x + 3 + x"));
        let twice = simplify(once.clone());
        assert_eq!(once, twice);
    }
}
