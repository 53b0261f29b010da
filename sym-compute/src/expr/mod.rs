//! The symbolic expression tree at the center of the crate.
//!
//! [`Expression`] is a closed sum type covering every value the interpreter can produce:
//! numbers (floating, exact rational, and complex), symbols, strings, booleans, the
//! division-by-zero sentinels, and the structural nodes (calls, definitions, assignments,
//! rules, and lists). Trees are immutable once built; derived expressions are constructed
//! bottom-up and share nothing with their inputs beyond `Clone`.

use crate::rational::Rational;
use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A parameter of a user-defined function, such as `x_` or `n_: 2`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Param {
    /// The name of the parameter.
    pub name: String,

    /// The default value of the parameter, if any. Defaults are evaluated in the caller's
    /// scope when the corresponding argument is missing.
    pub default: Option<Expression>,
}

/// A user-defined function: name, parameters, body, and the capture mode.
///
/// Immediate definitions (`=`) capture the values of free variables at definition time;
/// delayed definitions (`:=`) store the body verbatim and re-resolve free variables on
/// every call.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FuncDef {
    /// The name of the function.
    pub name: String,

    /// The parameters of the function, in declaration order.
    pub params: Vec<Param>,

    /// The body of the function, stored unevaluated.
    pub body: Box<Expression>,

    /// Whether the definition was written with `:=` instead of `=`.
    pub delayed: bool,
}

/// A symbolic expression.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expression {
    /// An IEEE-754 floating point number. Integer literals are stored here as well, as
    /// integer-valued floats.
    Number(f64),

    /// An exact rational number, always in lowest terms with a positive denominator.
    Rational(Rational),

    /// A complex number with floating point real and imaginary parts.
    Complex(f64, f64),

    /// An identifier, bound or unbound.
    Symbol(String),

    /// A string value.
    Str(String),

    /// A boolean value.
    Bool(bool),

    /// The result of dividing a nonzero quantity by zero.
    Infinity,

    /// The result of dividing zero by zero.
    Indeterminate,

    /// A generic n-ary application: head plus arguments. The head determines the semantics
    /// (`"Plus"`, `"Power"`, a user function name, ...); the tree itself carries no arity
    /// constraints.
    Call(String, Vec<Expression>),

    /// A function definition, stored and echoed unevaluated.
    FuncDef(FuncDef),

    /// An assignment of a value to a variable.
    Assign(String, Box<Expression>),

    /// A rewrite rule, such as `"a" -> "b"` in `StringReplace`.
    Rule(Box<Expression>, Box<Expression>),

    /// A list of expressions.
    List(Vec<Expression>),
}

impl Expression {
    /// Builds a call expression from a head and arguments.
    pub fn call(head: impl Into<String>, args: Vec<Expression>) -> Expression {
        Expression::Call(head.into(), args)
    }

    /// Builds a symbol expression.
    pub fn symbol(name: impl Into<String>) -> Expression {
        Expression::Symbol(name.into())
    }

    /// Builds a rational expression in canonical form.
    ///
    /// Zero denominators are never stored: `n/0` with `n != 0` becomes [`Expression::Infinity`]
    /// and `0/0` becomes [`Expression::Indeterminate`]. A rational that reduces to a unit
    /// denominator collapses to an integer-valued [`Expression::Number`].
    pub fn rational(num: i64, den: i64) -> Expression {
        match Rational::new(num, den) {
            Some(r) if r.is_integer() => Expression::Number(r.numerator() as f64),
            Some(r) => Expression::Rational(r),
            None if num == 0 && den == 0 => Expression::Indeterminate,
            None if den == 0 => Expression::Infinity,
            // reduction overflowed i64; fall back to floating point
            None => Expression::Number(num as f64 / den as f64),
        }
    }

    /// Returns the integer value of an integer-valued number or unit-denominator rational.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Expression::Number(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                Some(*n as i64)
            },
            Expression::Rational(r) if r.is_integer() => Some(r.numerator()),
            _ => None,
        }
    }

    /// Returns true if the expression is the number zero (floating or rational).
    pub fn is_zero(&self) -> bool {
        match self {
            Expression::Number(n) => *n == 0.0,
            Expression::Rational(r) => r.is_zero(),
            _ => false,
        }
    }

    /// Returns true if the expression is the number one (floating or rational).
    pub fn is_one(&self) -> bool {
        match self {
            Expression::Number(n) => *n == 1.0,
            Expression::Rational(r) => r.is_integer() && r.numerator() == 1,
            _ => false,
        }
    }

    /// A short name for the kind of value this expression is, used in error messages.
    pub fn typename(&self) -> &'static str {
        match self {
            Expression::Number(_) => "Number",
            Expression::Rational(_) => "Rational",
            Expression::Complex(..) => "Complex",
            Expression::Symbol(_) => "Symbol",
            Expression::Str(_) => "String",
            Expression::Bool(_) => "Boolean",
            Expression::Infinity => "Infinity",
            Expression::Indeterminate => "Indeterminate",
            Expression::Call(..) => "FunctionCall",
            Expression::FuncDef(_) => "FunctionDefinition",
            Expression::Assign(..) => "Assignment",
            Expression::Rule(..) => "Rule",
            Expression::List(_) => "List",
        }
    }

    /// Collects the names of all symbols appearing in the expression, in sorted order.
    ///
    /// Heads of calls are not symbols; `Sin[x]` contributes only `x`.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut set = BTreeSet::new();
        self.collect_symbols(&mut set);
        set
    }

    fn collect_symbols(&self, set: &mut BTreeSet<String>) {
        match self {
            Expression::Symbol(name) => {
                set.insert(name.clone());
            },
            Expression::Call(_, args) | Expression::List(args) => {
                for arg in args {
                    arg.collect_symbols(set);
                }
            },
            Expression::Rule(lhs, rhs) => {
                lhs.collect_symbols(set);
                rhs.collect_symbols(set);
            },
            Expression::Assign(_, value) => value.collect_symbols(set),
            Expression::FuncDef(def) => def.body.collect_symbols(set),
            _ => {},
        }
    }
}

impl From<f64> for Expression {
    fn from(n: f64) -> Self {
        Expression::Number(n)
    }
}

impl From<bool> for Expression {
    fn from(b: bool) -> Self {
        Expression::Bool(b)
    }
}

impl From<Rational> for Expression {
    fn from(r: Rational) -> Self {
        Expression::Rational(r)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn rational_constructor_sentinels() {
        assert_eq!(Expression::rational(1, 0), Expression::Infinity);
        assert_eq!(Expression::rational(0, 0), Expression::Indeterminate);
        assert_eq!(
            Expression::rational(6, 4),
            Expression::Rational(Rational::new(3, 2).unwrap()),
        );
    }

    #[test]
    fn free_symbols_walks_structure() {
        let expr = Expression::call("Plus", vec![
            Expression::symbol("x"),
            Expression::call("Times", vec![
                Expression::Number(2.0),
                Expression::symbol("y"),
            ]),
        ]);
        let symbols: Vec<_> = expr.free_symbols().into_iter().collect();
        assert_eq!(symbols, vec!["x".to_string(), "y".to_string()]);
    }
}
