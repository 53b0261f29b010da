//! Conversion from the parser's syntax tree into [`Expression`], followed by structural
//! normalization.
//!
//! The parser is deliberately ignorant of symbolic semantics; this module gives each syntax
//! node its meaning. Binary operators become canonical-head calls (`+` is `Plus`, `^` is
//! `Power`, and so on), recognized symbols become their values (`True`, `I`, `Infinity`),
//! and a handful of head names (`Rational`, `Complex`, `List`, `Rule`) build their dedicated
//! variants directly.
//!
//! [`normalize`] then rewrites the tree into the form the evaluator and simplifier expect:
//! subtraction and negation are eliminated in favor of `Plus` and `Times` with a `-1`
//! coefficient, and the textbook `a + b*I` spelling is folded into a single
//! [`Expression::Complex`].

use crate::expr::{Expression, FuncDef, Param};
use sym_parser::parser::{
    assign::AssignTarget,
    expr::Expr,
    literal::Literal,
    token::op::{BinOpKind, UnaryOpKind},
};

impl From<Expr> for Expression {
    fn from(expr: Expr) -> Self {
        match expr {
            Expr::Literal(literal) => literal.into(),
            Expr::Paren(paren) => (*paren.expr).into(),
            Expr::List(list) => Expression::List(
                list.values.into_iter().map(Expression::from).collect(),
            ),
            Expr::Call(call) => convert_call(
                call.name.name,
                call.args.into_iter().map(Expression::from).collect(),
            ),
            Expr::Unary(unary) => match unary.op.kind {
                UnaryOpKind::Neg => Expression::call("Negate", vec![(*unary.operand).into()]),
            },
            Expr::Binary(binary) => {
                let lhs = Expression::from(*binary.lhs);
                let rhs = Expression::from(*binary.rhs);
                match binary.op.kind {
                    BinOpKind::Rule => Expression::Rule(Box::new(lhs), Box::new(rhs)),
                    BinOpKind::Concat => {
                        // `a <> b <> c` parses as nested pairs; flatten into one call
                        let mut args = match lhs {
                            Expression::Call(head, args) if head == "StringJoin" => args,
                            other => vec![other],
                        };
                        args.push(rhs);
                        Expression::call("StringJoin", args)
                    },
                    kind => Expression::call(binary_head(kind), vec![lhs, rhs]),
                }
            },
            Expr::Assign(assign) => match assign.target {
                AssignTarget::Symbol(name) => Expression::Assign(
                    name.name,
                    Box::new((*assign.value).into()),
                ),
                AssignTarget::Func(header) => Expression::FuncDef(FuncDef {
                    name: header.name.name,
                    params: header.params.into_iter()
                        .map(|param| Param {
                            name: param.name.name,
                            default: param.default.map(Expression::from),
                        })
                        .collect(),
                    body: Box::new((*assign.value).into()),
                    delayed: assign.delayed,
                }),
            },
        }
    }
}

impl From<Literal> for Expression {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Number(num) => Expression::Number(num.value),
            Literal::Symbol(sym) => match &*sym.name {
                "True" => Expression::Bool(true),
                "False" => Expression::Bool(false),
                "I" => Expression::Complex(0.0, 1.0),
                "Infinity" => Expression::Infinity,
                "Indeterminate" => Expression::Indeterminate,
                _ => Expression::Symbol(sym.name),
            },
            Literal::Str(s) => Expression::Str(s.value),
        }
    }
}

/// The canonical head for a binary operator.
fn binary_head(kind: BinOpKind) -> &'static str {
    match kind {
        BinOpKind::Exp => "Power",
        BinOpKind::Mul => "Times",
        BinOpKind::Div => "Divide",
        BinOpKind::Add => "Plus",
        BinOpKind::Sub => "Minus",
        BinOpKind::Greater => "Greater",
        BinOpKind::GreaterEq => "GreaterEqual",
        BinOpKind::Less => "Less",
        BinOpKind::LessEq => "LessEqual",
        BinOpKind::Eq => "Equal",
        BinOpKind::NotEq => "Unequal",
        BinOpKind::And => "And",
        BinOpKind::Or => "Or",
        BinOpKind::Concat | BinOpKind::Rule => unreachable!("handled before head conversion"),
    }
}

/// Converts a bracketed call, giving a few head names structural meaning.
fn convert_call(name: String, args: Vec<Expression>) -> Expression {
    match (&*name, args.as_slice()) {
        ("Rational", [num, den]) => {
            if let (Some(num), Some(den)) = (num.as_integer(), den.as_integer()) {
                return Expression::rational(num, den);
            }
            Expression::Call(name, args)
        },
        ("Complex", [Expression::Number(re), Expression::Number(im)]) => {
            Expression::Complex(*re, *im)
        },
        ("Rule", [lhs, rhs]) => {
            Expression::Rule(Box::new(lhs.clone()), Box::new(rhs.clone()))
        },
        ("List", _) => Expression::List(args),
        _ => Expression::Call(name, args),
    }
}

/// Rewrites an expression into normal form.
///
/// Children are normalized first, then the node itself:
///
/// - `Minus[a, b]` becomes `Plus[a, Times[-1, b]]`
/// - `Negate[n]` folds into the number for numeric `n`, otherwise becomes `Times[-1, x]`
/// - purely imaginary products fold into `Complex`, and `Plus[a, b * I]` with numeric parts
///   folds into `Complex[a, b]`
pub fn normalize(expr: Expression) -> Expression {
    let expr = match expr {
        Expression::Call(head, args) => {
            Expression::Call(head, args.into_iter().map(normalize).collect())
        },
        Expression::List(items) => {
            Expression::List(items.into_iter().map(normalize).collect())
        },
        Expression::Rule(lhs, rhs) => Expression::Rule(
            Box::new(normalize(*lhs)),
            Box::new(normalize(*rhs)),
        ),
        Expression::Assign(name, value) => {
            Expression::Assign(name, Box::new(normalize(*value)))
        },
        Expression::FuncDef(def) => Expression::FuncDef(FuncDef {
            body: Box::new(normalize(*def.body)),
            params: def.params.into_iter()
                .map(|param| Param {
                    default: param.default.map(normalize),
                    ..param
                })
                .collect(),
            ..def
        }),
        other => other,
    };

    match expr {
        Expression::Call(head, args) if head == "Minus" && args.len() == 2 => {
            match <[Expression; 2]>::try_from(args) {
                Ok([lhs, rhs]) => normalize(Expression::call("Plus", vec![
                    lhs,
                    Expression::call("Times", vec![Expression::Number(-1.0), rhs]),
                ])),
                Err(args) => Expression::Call(head, args),
            }
        },
        Expression::Call(head, args) if head == "Negate" && args.len() == 1 => {
            match <[Expression; 1]>::try_from(args) {
                Ok([Expression::Number(n)]) => Expression::Number(-n),
                Ok([Expression::Rational(r)]) => {
                    Expression::rational(-r.numerator(), r.denominator())
                },
                Ok([Expression::Complex(re, im)]) => Expression::Complex(-re, -im),
                // negating an already-negated product is a no-op, so `--x` stays `-x`
                Ok([Expression::Call(inner, factors)])
                    if inner == "Times"
                        && matches!(factors.first(), Some(Expression::Number(n)) if *n == -1.0) =>
                {
                    Expression::Call(inner, factors)
                },
                Ok([other]) => normalize(Expression::call("Times", vec![
                    Expression::Number(-1.0),
                    other,
                ])),
                Err(args) => Expression::Call(head, args),
            }
        },
        Expression::Call(head, args) if head == "Times" => {
            match imaginary_product(&args) {
                Some(im) => Expression::Complex(0.0, im),
                None => Expression::Call(head, args),
            }
        },
        Expression::Call(head, args) if head == "Plus" && args.len() == 2 => {
            match (&args[0], imaginary_coefficient(&args[1])) {
                (Expression::Number(re), Some(im)) => Expression::Complex(*re, im),
                _ => Expression::Call(head, args),
            }
        },
        other => other,
    }
}

/// If the expression is a purely imaginary quantity, returns its imaginary coefficient.
///
/// Recognizes the imaginary unit itself, and products of real numbers with exactly one
/// imaginary factor, at any nesting depth.
fn imaginary_coefficient(expr: &Expression) -> Option<f64> {
    match expr {
        Expression::Complex(re, im) if *re == 0.0 => Some(*im),
        Expression::Call(head, args) if head == "Times" => imaginary_product(args),
        _ => None,
    }
}

/// The imaginary coefficient of a `Times` argument list, if the product is purely imaginary.
fn imaginary_product(args: &[Expression]) -> Option<f64> {
    let mut real = 1.0;
    let mut imaginary = None;
    for arg in args {
        if let Expression::Number(n) = arg {
            real *= n;
        } else if let Some(im) = imaginary_coefficient(arg) {
            // a product with two imaginary factors is real, not imaginary
            if imaginary.is_some() {
                return None;
            }
            imaginary = Some(im);
        } else {
            return None;
        }
    }
    imaginary.map(|im| real * im)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse_normalized(source: &str) -> Expression {
        let expr = sym_parser::parser::Parser::new(source)
            .try_parse_full::<Expr>()
            .unwrap();
        normalize(expr.into())
    }

    #[test]
    fn subtraction_becomes_signed_addition() {
        assert_eq!(
            parse_normalized("x - 3"),
            Expression::call("Plus", vec![
                Expression::symbol("x"),
                Expression::call("Times", vec![
                    Expression::Number(-1.0),
                    Expression::Number(3.0),
                ]),
            ]),
        );
    }

    #[test]
    fn negation_folds_into_numbers() {
        assert_eq!(parse_normalized("-5"), Expression::Number(-5.0));
        assert_eq!(
            parse_normalized("-x"),
            Expression::call("Times", vec![
                Expression::Number(-1.0),
                Expression::symbol("x"),
            ]),
        );
    }

    #[test]
    fn double_negation_does_not_stack() {
        assert_eq!(
            parse_normalized("--x"),
            Expression::call("Times", vec![
                Expression::Number(-1.0),
                Expression::symbol("x"),
            ]),
        );
    }

    #[test]
    fn complex_literal_folds() {
        assert_eq!(parse_normalized("3 + 2 * I"), Expression::Complex(3.0, 2.0));
        assert_eq!(parse_normalized("2 I"), Expression::Complex(0.0, 2.0));
        assert_eq!(parse_normalized("1 - I"), Expression::Complex(1.0, -1.0));
    }

    #[test]
    fn rational_head_builds_exact_values() {
        assert_eq!(
            parse_normalized("Rational[6, 4]"),
            Expression::rational(3, 2),
        );
        assert_eq!(parse_normalized("Rational[1, 0]"), Expression::Infinity);
    }

    #[test]
    fn rule_operator_builds_rule() {
        assert_eq!(
            parse_normalized("x -> 2"),
            Expression::Rule(
                Box::new(Expression::symbol("x")),
                Box::new(Expression::Number(2.0)),
            ),
        );
    }

    #[test]
    fn concat_flattens() {
        assert_eq!(
            parse_normalized(r#""a" <> "b" <> "c""#),
            Expression::call("StringJoin", vec![
                Expression::Str("a".into()),
                Expression::Str("b".into()),
                Expression::Str("c".into()),
            ]),
        );
    }

    #[test]
    fn delayed_definition_is_kept_verbatim() {
        let def = parse_normalized("f[x_, n_: 2] := x ^ n");
        let Expression::FuncDef(def) = def else {
            panic!("expected a function definition, got {def:?}");
        };
        assert_eq!(def.name, "f");
        assert!(def.delayed);
        assert_eq!(def.params.len(), 2);
        assert_eq!(def.params[1].default, Some(Expression::Number(2.0)));
    }
}
