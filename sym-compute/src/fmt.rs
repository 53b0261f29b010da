//! Rendering of expressions: the human-friendly infix form implemented through [`Display`],
//! and the canonical head-and-arguments form produced by [`to_fullform`].
//!
//! Infix output inserts parentheses only where precedence demands them, prints
//! integer-valued floats without a fractional part, and folds negative terms of a sum into
//! `-` for readability (`x - 1`, never `x + -1`).

use crate::expr::{Expression, FuncDef};
use std::fmt::{self, Display, Formatter, Write};

// Binding strengths of the printed operators; stronger binds tighter.
const RULE: u8 = 1;
const COMPARE: u8 = 2;
const OR: u8 = 3;
const AND: u8 = 4;
const CONCAT: u8 = 5;
const PLUS: u8 = 6;
const TIMES: u8 = 7;
const POWER: u8 = 8;
const ATOM: u8 = 9;

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_expr(f, self, 0)
    }
}

/// The infix operator for a comparison or logical head, if any.
fn infix_operator(head: &str) -> Option<(&'static str, u8)> {
    Some(match head {
        "Equal" => ("==", COMPARE),
        "Unequal" => ("!=", COMPARE),
        "Less" => ("<", COMPARE),
        "LessEqual" => ("<=", COMPARE),
        "Greater" => (">", COMPARE),
        "GreaterEqual" => (">=", COMPARE),
        "And" => ("&&", AND),
        "Or" => ("||", OR),
        "StringJoin" => ("<>", CONCAT),
        _ => return None,
    })
}

/// The binding strength of an expression's printed form.
fn precedence(expr: &Expression) -> u8 {
    match expr {
        Expression::Number(n) if *n < 0.0 => PLUS,
        Expression::Rational(r) if r.numerator() < 0 => PLUS,
        Expression::Rational(_) => TIMES,
        Expression::Complex(re, im) => match (*re, *im) {
            (0.0, im) if im == 1.0 || im == -1.0 => ATOM,
            (0.0, _) => TIMES,
            _ => PLUS,
        },
        Expression::Call(head, args) => match (head.as_str(), args.len()) {
            ("Plus", 2..) => PLUS,
            ("Times", 2..) => TIMES,
            ("Divide", 2) => TIMES,
            ("Power", 2) => POWER,
            _ => infix_operator(head).map(|(_, prec)| prec).unwrap_or(ATOM),
        },
        Expression::Rule(..) => RULE,
        Expression::Assign(..) | Expression::FuncDef(_) => 0,
        _ => ATOM,
    }
}

fn write_expr(f: &mut Formatter<'_>, expr: &Expression, parent: u8) -> fmt::Result {
    let prec = precedence(expr);
    if prec < parent {
        f.write_char('(')?;
        write_bare(f, expr)?;
        return f.write_char(')');
    }
    write_bare(f, expr)
}

fn write_bare(f: &mut Formatter<'_>, expr: &Expression) -> fmt::Result {
    match expr {
        Expression::Number(n) => write_number(f, *n),
        Expression::Rational(r) => write!(f, "{r}"),
        Expression::Complex(re, im) => write_complex(f, *re, *im),
        Expression::Symbol(name) => f.write_str(name),
        Expression::Str(s) => write!(f, "{s:?}"),
        Expression::Bool(true) => f.write_str("True"),
        Expression::Bool(false) => f.write_str("False"),
        Expression::Infinity => f.write_str("Infinity"),
        Expression::Indeterminate => f.write_str("Indeterminate"),
        Expression::Call(head, args) => write_call(f, head, args),
        Expression::FuncDef(def) => write_funcdef(f, def),
        Expression::Assign(name, value) => {
            write!(f, "{name} = ")?;
            write_expr(f, value, 0)
        },
        Expression::Rule(lhs, rhs) => {
            // `->` is right-associative
            write_expr(f, lhs, RULE + 1)?;
            f.write_str(" -> ")?;
            write_expr(f, rhs, RULE)
        },
        Expression::List(items) => {
            f.write_char('{')?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_expr(f, item, 0)?;
            }
            f.write_char('}')
        },
    }
}

fn write_call(f: &mut Formatter<'_>, head: &str, args: &[Expression]) -> fmt::Result {
    match (head, args) {
        // singleton sums and products print as their only term
        ("Plus" | "Times", [only]) => write_bare(f, only),
        ("Plus", [first, rest @ ..]) if !rest.is_empty() => {
            write_expr(f, first, PLUS)?;
            for term in rest {
                match negated_term(term) {
                    Some(negated) => {
                        f.write_str(" - ")?;
                        // the sign was absorbed into `-`; tighten to avoid re-splitting
                        write_expr(f, &negated, PLUS + 1)?;
                    },
                    None => {
                        f.write_str(" + ")?;
                        write_expr(f, term, PLUS + 1)?;
                    },
                }
            }
            Ok(())
        },
        ("Times", [first, rest @ ..]) if !rest.is_empty() => {
            // `-1 * x` reads better as `-x`, and `-2 * x` better than `(-2) * x`
            if let Expression::Number(n) = first {
                if *n == -1.0 {
                    f.write_char('-')?;
                    return write_product(f, rest);
                }
                if *n < 0.0 {
                    f.write_char('-')?;
                    write_number(f, -n)?;
                    f.write_str(" * ")?;
                    return write_product(f, rest);
                }
            }
            write_expr(f, first, TIMES)?;
            f.write_str(" * ")?;
            write_product(f, rest)
        },
        ("Divide", [lhs, rhs]) => {
            write_expr(f, lhs, TIMES)?;
            f.write_str(" / ")?;
            write_expr(f, rhs, TIMES + 1)
        },
        ("Power", [base, exponent]) => {
            write_expr(f, base, POWER + 1)?;
            f.write_char('^')?;
            write_expr(f, exponent, POWER)
        },
        _ => match infix_operator(head) {
            Some((op, prec)) if args.len() >= 2 => {
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {op} ")?;
                    }
                    // comparisons and logical operators associate to the left
                    write_expr(f, arg, if i == 0 { prec } else { prec + 1 })?;
                }
                Ok(())
            },
            _ => {
                write!(f, "{head}[")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_expr(f, arg, 0)?;
                }
                f.write_char(']')
            },
        },
    }
}

fn write_product(f: &mut Formatter<'_>, factors: &[Expression]) -> fmt::Result {
    for (i, factor) in factors.iter().enumerate() {
        if i > 0 {
            f.write_str(" * ")?;
        }
        write_expr(f, factor, TIMES + 1)?;
    }
    Ok(())
}

/// If the term of a sum is negative, returns its negation for printing after `-`.
fn negated_term(term: &Expression) -> Option<Expression> {
    match term {
        Expression::Number(n) if *n < 0.0 => Some(Expression::Number(-n)),
        Expression::Rational(r) if r.numerator() < 0 => {
            Some(Expression::rational(-r.numerator(), r.denominator()))
        },
        Expression::Call(head, args) if head == "Times" => match args.first() {
            Some(Expression::Number(n)) if *n == -1.0 && args.len() == 2 => {
                Some(args[1].clone())
            },
            Some(Expression::Number(n)) if *n == -1.0 => {
                Some(Expression::call("Times", args[1..].to_vec()))
            },
            Some(Expression::Number(n)) if *n < 0.0 => {
                let mut args = args.clone();
                args[0] = Expression::Number(-n);
                Some(Expression::call("Times", args))
            },
            _ => None,
        },
        _ => None,
    }
}

fn write_number(f: &mut Formatter<'_>, n: f64) -> fmt::Result {
    if n == n.trunc() && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{n}")
    }
}

fn write_complex(f: &mut Formatter<'_>, re: f64, im: f64) -> fmt::Result {
    let unit = |f: &mut Formatter<'_>, im: f64| -> fmt::Result {
        if im == 1.0 {
            f.write_char('I')
        } else if im == -1.0 {
            f.write_str("-I")
        } else {
            write_number(f, im)?;
            f.write_str(" * I")
        }
    };

    if re == 0.0 {
        return unit(f, im);
    }
    write_number(f, re)?;
    if im < 0.0 {
        f.write_str(" - ")?;
        unit(f, -im)?;
        // sign already folded into the minus
        return Ok(());
    }
    f.write_str(" + ")?;
    unit(f, im)
}

fn write_funcdef(f: &mut Formatter<'_>, def: &FuncDef) -> fmt::Result {
    write!(f, "{}[", def.name)?;
    for (i, param) in def.params.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}_", param.name)?;
        if let Some(default) = &param.default {
            f.write_str(": ")?;
            write_expr(f, default, 0)?;
        }
    }
    write!(f, "] {} ", if def.delayed { ":=" } else { "=" })?;
    write_expr(f, &def.body, 0)
}

/// Renders an expression in its canonical head-and-arguments form, with every operator
/// spelled as a named head (`Plus[x, 1]`, `Rational[3, 2]`, `SetDelayed[...]`).
pub fn to_fullform(expr: &Expression) -> String {
    let mut out = String::new();
    write_fullform(&mut out, expr);
    out
}

fn write_fullform(out: &mut String, expr: &Expression) {
    match expr {
        Expression::Number(n) => {
            if *n == n.trunc() && n.abs() < 1e15 {
                let _ = write!(out, "{}", *n as i64);
            } else {
                let _ = write!(out, "{n}");
            }
        },
        Expression::Rational(r) => {
            let _ = write!(out, "Rational[{}, {}]", r.numerator(), r.denominator());
        },
        Expression::Complex(re, im) => {
            out.push_str("Complex[");
            write_fullform(out, &Expression::Number(*re));
            out.push_str(", ");
            write_fullform(out, &Expression::Number(*im));
            out.push(']');
        },
        Expression::Symbol(name) => out.push_str(name),
        Expression::Str(s) => {
            let _ = write!(out, "{s:?}");
        },
        Expression::Bool(true) => out.push_str("True"),
        Expression::Bool(false) => out.push_str("False"),
        Expression::Infinity => out.push_str("Infinity"),
        Expression::Indeterminate => out.push_str("Indeterminate"),
        Expression::Call(head, args) => write_fullform_call(out, head, args),
        Expression::List(items) => write_fullform_call(out, "List", items),
        Expression::Rule(lhs, rhs) => {
            write_fullform_call(out, "Rule", &[(**lhs).clone(), (**rhs).clone()]);
        },
        Expression::Assign(name, value) => {
            write_fullform_call(out, "Set", &[
                Expression::symbol(name.clone()),
                (**value).clone(),
            ]);
        },
        Expression::FuncDef(def) => {
            let head = if def.delayed { "SetDelayed" } else { "Set" };
            let _ = write!(out, "{head}[{}[", def.name);
            for (i, param) in def.params.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "{}_", param.name);
                if let Some(default) = &param.default {
                    out.push_str(": ");
                    write_fullform(out, default);
                }
            }
            out.push_str("], ");
            write_fullform(out, &def.body);
            out.push(']');
        },
    }
}

fn write_fullform_call(out: &mut String, head: &str, args: &[Expression]) {
    let _ = write!(out, "{head}[");
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_fullform(out, arg);
    }
    out.push(']');
}
