//! Native functions available in every default context.
//!
//! Builtins are plain function pointers over already-evaluated arguments. A builtin that
//! receives arguments outside its numeric or string domain (an unbound symbol, a symbolic
//! call) returns the call unevaluated rather than erroring, so expressions like `Sin[x]`
//! flow through the evaluator symbolically.

pub mod math;
pub mod poly;
pub mod string;

use crate::error::{kind, Error};
use crate::expr::Expression;
use std::collections::HashMap;

/// The signature of every native function.
pub type NativeFn = fn(Vec<Expression>) -> Result<Expression, Error>;

/// A builtin function: its canonical name and implementation.
#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    name: &'static str,
    eval: NativeFn,
}

impl Builtin {
    /// Returns the name of the function.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Evaluates the function with the given arguments.
    pub fn eval(&self, args: Vec<Expression>) -> Result<Expression, Error> {
        (self.eval)(args)
    }
}

/// Builds the table of all builtin functions, used to seed a default context.
pub fn all() -> HashMap<&'static str, Builtin> {
    macro_rules! builtins {
        ($($name:literal => $func:expr),* $(,)?) => {
            HashMap::from([
                $(($name, Builtin { name: $name, eval: $func }),)*
            ])
        };
    }

    builtins! {
        "Not" => math::not,
        "Sin" => math::sin,
        "Cos" => math::cos,
        "Tan" => math::tan,
        "Exp" => math::exp,
        "Log" => math::log,
        "Sqrt" => math::sqrt,
        "Abs" => math::abs,
        "Floor" => math::floor,
        "Ceiling" => math::ceiling,
        "Round" => math::round,
        "N" => math::numeric,
        "FullForm" => string::full_form,
        "StringLength" => string::string_length,
        "StringTake" => string::string_take,
        "StringDrop" => string::string_drop,
        "StringJoin" => string::string_join,
        "StringReplace" => string::string_replace,
        "ToUpperCase" => string::to_upper_case,
        "ToLowerCase" => string::to_lower_case,
        "Expand" => poly::expand,
        "Factor" => poly::factor,
        "Collect" => poly::collect,
        "GCD" => poly::gcd,
        "PolynomialQuotient" => poly::polynomial_quotient,
    }
}

/// Checks that exactly `N` arguments were given, reporting the missing parameter by name
/// otherwise.
pub(crate) fn fixed_args<const N: usize>(
    name: &str,
    params: [&'static str; N],
    args: Vec<Expression>,
) -> Result<[Expression; N], Error> {
    if args.len() > N {
        return Err(Error::new(vec![], kind::TooManyArguments {
            name: name.to_string(),
            expected: N,
            given: args.len(),
        }));
    }

    match <[Expression; N]>::try_from(args) {
        Ok(args) => Ok(args),
        Err(args) => Err(Error::new(vec![], kind::MissingArgument {
            name: name.to_string(),
            param: params[args.len()].to_string(),
            expected: N,
            given: args.len(),
        })),
    }
}

/// True if the expression should pass through a builtin untouched, to be retried once its
/// symbols are bound.
pub(crate) fn is_symbolic(expr: &Expression) -> bool {
    matches!(expr, Expression::Symbol(_) | Expression::Call(..))
}

/// Reconstructs an unevaluated call, for builtins applied to symbolic arguments.
pub(crate) fn unevaluated(name: &str, args: Vec<Expression>) -> Expression {
    Expression::Call(name.to_string(), args)
}
