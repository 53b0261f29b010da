//! The evaluator: reduces an expression as far as the bindings in a [`Ctxt`] allow.
//!
//! Evaluation is recursive and eager, with three exceptions that must see their arguments
//! unevaluated: `And` and `Or` stop at the first determining boolean, and `If` only
//! evaluates the branch its condition selects. Everything the context cannot resolve
//! (unbound symbols, calls to unknown heads) is returned unchanged, so partially symbolic
//! input flows through instead of erroring.

pub mod arith;
mod call;

use crate::ctxt::Ctxt;
use crate::error::{kind, Error};
use crate::expr::{Expression, FuncDef};

/// Evaluates an expression in the given context.
pub fn evaluate(expr: &Expression, ctxt: &mut Ctxt) -> Result<Expression, Error> {
    match expr {
        Expression::Number(_)
        | Expression::Rational(_)
        | Expression::Complex(..)
        | Expression::Str(_)
        | Expression::Bool(_)
        | Expression::Infinity
        | Expression::Indeterminate => Ok(expr.clone()),
        Expression::Symbol(name) => {
            Ok(ctxt.get_var(name).unwrap_or_else(|| expr.clone()))
        },
        Expression::Assign(name, value) => {
            let value = evaluate(value, ctxt)?;
            ctxt.add_var(name, value.clone());
            Ok(value)
        },
        Expression::FuncDef(def) => {
            let def = if def.delayed {
                def.clone()
            } else {
                // `=` captures the current values of free variables right now; `:=`
                // leaves the body alone to be re-resolved on every call
                let params: Vec<&str> = def.params.iter().map(|p| p.name.as_str()).collect();
                FuncDef {
                    body: Box::new(capture(&def.body, ctxt, &params)),
                    ..def.clone()
                }
            };
            ctxt.add_func(def.clone());
            Ok(Expression::FuncDef(def))
        },
        Expression::Rule(lhs, rhs) => Ok(Expression::Rule(
            Box::new(evaluate(lhs, ctxt)?),
            Box::new(evaluate(rhs, ctxt)?),
        )),
        Expression::List(items) => Ok(Expression::List(
            items
                .iter()
                .map(|item| evaluate(item, ctxt))
                .collect::<Result<_, _>>()?,
        )),
        Expression::Call(head, args) => match head.as_str() {
            "And" | "Or" => short_circuit(head, args, ctxt),
            "If" => conditional(args, ctxt),
            _ => {
                let args = args
                    .iter()
                    .map(|arg| evaluate(arg, ctxt))
                    .collect::<Result<Vec<_>, _>>()?;
                call::apply(head.clone(), args, ctxt)
            },
        },
    }
}

/// `And` and `Or`: evaluate operands left to right, stopping at the first one that decides
/// the result. Symbolic operands are kept; later booleans that cannot change the outcome
/// are dropped.
fn short_circuit(
    head: &str,
    args: &[Expression],
    ctxt: &mut Ctxt,
) -> Result<Expression, Error> {
    // `Or` is decided by `True`, `And` by `False`
    let deciding = head == "Or";
    let mut residues = Vec::new();
    for arg in args {
        match evaluate(arg, ctxt)? {
            Expression::Bool(b) if b == deciding => return Ok(Expression::Bool(b)),
            Expression::Bool(_) => {},
            value @ (Expression::Symbol(_) | Expression::Call(..)) => residues.push(value),
            value => {
                return Err(Error::new(vec![], kind::TypeMismatch {
                    head: if deciding { "Or" } else { "And" },
                    expected: "a boolean",
                    found: value.typename(),
                }));
            },
        }
    }
    Ok(match residues.len() {
        0 => Expression::Bool(!deciding),
        1 => residues.remove(0),
        _ => Expression::Call(head.to_string(), residues),
    })
}

/// `If[cond, then, else]`: only the selected branch is evaluated.
fn conditional(args: &[Expression], ctxt: &mut Ctxt) -> Result<Expression, Error> {
    if args.len() > 3 {
        return Err(Error::new(vec![], kind::TooManyArguments {
            name: "If".to_string(),
            expected: 3,
            given: args.len(),
        }));
    }
    let [cond, then, otherwise] = match args {
        [cond, then, otherwise] => [cond, then, otherwise],
        _ => {
            let params = ["cond", "then", "else"];
            return Err(Error::new(vec![], kind::MissingArgument {
                name: "If".to_string(),
                param: params[args.len()].to_string(),
                expected: 3,
                given: args.len(),
            }));
        },
    };

    match evaluate(cond, ctxt)? {
        Expression::Bool(true) => evaluate(then, ctxt),
        Expression::Bool(false) => evaluate(otherwise, ctxt),
        cond @ (Expression::Symbol(_) | Expression::Call(..)) => Ok(Expression::call(
            "If",
            vec![cond, then.clone(), otherwise.clone()],
        )),
        cond => Err(Error::new(vec![], kind::TypeMismatch {
            head: "If",
            expected: "a boolean",
            found: cond.typename(),
        })),
    }
}

/// Substitutes the current values of free variables into a definition body. Parameter
/// names shadow context variables and are left alone.
fn capture(expr: &Expression, ctxt: &Ctxt, params: &[&str]) -> Expression {
    match expr {
        Expression::Symbol(name) if !params.contains(&name.as_str()) => {
            ctxt.get_var(name).unwrap_or_else(|| expr.clone())
        },
        Expression::Call(head, args) => Expression::Call(
            head.clone(),
            args.iter().map(|arg| capture(arg, ctxt, params)).collect(),
        ),
        Expression::List(items) => Expression::List(
            items.iter().map(|item| capture(item, ctxt, params)).collect(),
        ),
        Expression::Rule(lhs, rhs) => Expression::Rule(
            Box::new(capture(lhs, ctxt, params)),
            Box::new(capture(rhs, ctxt, params)),
        ),
        Expression::FuncDef(def) => {
            // an inner definition's parameters shadow as well
            let mut inner: Vec<&str> = params.to_vec();
            inner.extend(def.params.iter().map(|p| p.name.as_str()));
            Expression::FuncDef(FuncDef {
                body: Box::new(capture(&def.body, ctxt, &inner)),
                ..def.clone()
            })
        },
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    /// Evaluates a sequence of inputs in one context and returns the last result.
    fn eval_all(sources: &[&str]) -> Expression {
        let mut ctxt = Ctxt::default();
        let mut last = Expression::Number(0.0);
        for source in sources {
            let expr = crate::parse(source).unwrap();
            last = evaluate(&expr, &mut ctxt).unwrap();
        }
        last
    }

    fn eval_one(source: &str) -> Expression {
        eval_all(&[source])
    }

    #[test]
    fn numeric_arithmetic() {
        assert_eq!(eval_one("1 + 2 * 3"), Expression::Number(7.0));
        assert_eq!(eval_one("2 ^ 10"), Expression::Number(1024.0));
    }

    #[test]
    fn integer_division_produces_rationals() {
        assert_eq!(eval_one("6 / 4"), Expression::rational(3, 2));
        assert_eq!(eval_one("1 / 3 + 1 / 6"), Expression::rational(1, 2));
    }

    #[test]
    fn division_by_zero_sentinels() {
        assert_eq!(eval_one("1 / 0"), Expression::Infinity);
        assert_eq!(eval_one("0 / 0"), Expression::Indeterminate);
        assert_eq!(eval_one("1 / 0 + 5"), Expression::Infinity);
        assert_eq!(eval_one("0 * (1 / 0)"), Expression::Indeterminate);
    }

    #[test]
    fn assignment_returns_and_binds() {
        assert_eq!(eval_one("x = 4"), Expression::Number(4.0));
        assert_eq!(eval_all(&["x = 4", "x ^ 2"]), Expression::Number(16.0));
    }

    #[test]
    fn unbound_symbols_stay_symbolic() {
        assert_eq!(eval_one("x + 0"), Expression::symbol("x"));
        assert_eq!(
            eval_one("Frobnicate[2]"),
            Expression::call("Frobnicate", vec![Expression::Number(2.0)]),
        );
    }

    #[test]
    fn user_function_call() {
        assert_eq!(
            eval_all(&["f[x_] := x ^ 2 + 1", "f[3]"]),
            Expression::Number(10.0),
        );
    }

    #[test]
    fn default_parameters_fill_missing_arguments() {
        let result = eval_all(&["root[x_, n_: 2] := x ^ (1 / n)", "root[27, 3]"]);
        let Expression::Number(value) = result else {
            panic!("expected a number, got {result:?}");
        };
        assert_float_eq::assert_float_absolute_eq!(value, 3.0, 1e-9);
        assert_eq!(
            eval_all(&["root[x_, n_: 2] := x ^ (1 / n)", "root[16]"]),
            Expression::Number(4.0),
        );
    }

    #[test]
    fn immediate_definitions_capture_delayed_ones_resolve() {
        let immediate = eval_all(&[
            "c = 20",
            "f[x_] = x + c",
            "c = 17",
            "f[5]",
        ]);
        assert_eq!(immediate, Expression::Number(25.0));

        let delayed = eval_all(&[
            "c = 20",
            "f[x_] := x + c",
            "c = 17",
            "f[5]",
        ]);
        assert_eq!(delayed, Expression::Number(22.0));
    }

    #[test]
    fn call_scope_does_not_leak() {
        let result = eval_all(&[
            "x = 1",
            "f[y_] := x = y",
            "f[99]",
            "x",
        ]);
        assert_eq!(result, Expression::Number(1.0));
    }

    #[test]
    fn recursion_terminates_with_a_base_case() {
        let result = eval_all(&[
            "factorial[n_] := If[n == 0, 1, n * factorial[n - 1]]",
            "factorial[5]",
        ]);
        assert_eq!(result, Expression::Number(120.0));
    }

    #[test]
    fn runaway_recursion_is_caught() {
        let mut ctxt = Ctxt::default();
        let def = crate::parse("loop[n_] := loop[n + 1]").unwrap();
        evaluate(&def, &mut ctxt).unwrap();
        let call = crate::parse("loop[0]").unwrap();
        assert!(evaluate(&call, &mut ctxt).is_err());
    }

    #[test]
    fn short_circuit_skips_poisoned_operands() {
        // the second operand would be a type error if evaluated
        assert_eq!(eval_one("False && (1 + True)"), Expression::Bool(false));
        assert_eq!(eval_one("True || (1 + True)"), Expression::Bool(true));
        assert!(crate::parse("True && 3")
            .and_then(|expr| evaluate(&expr, &mut Ctxt::default()))
            .is_err());
    }

    #[test]
    fn if_evaluates_only_the_taken_branch() {
        assert_eq!(eval_one("If[2 > 1, 10, 1 / 0]"), Expression::Number(10.0));
        assert_eq!(eval_one("If[2 < 1, 10, 42]"), Expression::Number(42.0));
    }

    #[test]
    fn comparisons_are_exact_for_rationals() {
        assert_eq!(eval_one("1 / 3 < 34 / 100"), Expression::Bool(true));
        assert_eq!(eval_one("2 / 4 == 1 / 2"), Expression::Bool(true));
    }

    #[test]
    fn lists_evaluate_elementwise() {
        assert_eq!(
            eval_one("{1 + 1, 2 * 3}"),
            Expression::List(vec![Expression::Number(2.0), Expression::Number(6.0)]),
        );
    }

    #[test]
    fn complex_arithmetic() {
        assert_eq!(eval_one("(3 + 2 I) * (3 - 2 I)"), Expression::Number(13.0));
        assert_eq!(eval_one("I ^ 2"), Expression::Number(-1.0));
    }

    #[test]
    fn builtin_calls_dispatch() {
        assert_eq!(eval_one("StringLength[\"four\"]"), Expression::Number(4.0));
        assert_eq!(
            eval_one("ToUpperCase[\"abc\" <> \"d\"]"),
            Expression::Str("ABCD".to_string()),
        );
    }
}
