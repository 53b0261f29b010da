use ariadne::Fmt;
use sym_attrs::ErrorKind;
use sym_error::{ErrorKind, EXPR};

/// An operation was applied to a value of the wrong type.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!(
        "`{}` expected {}, but received a value of type `{}`",
        self.head, self.expected, self.found,
    ),
)]
pub struct TypeMismatch {
    /// The head of the operation that rejected the value.
    pub head: &'static str,

    /// What the operation expected, such as "a string" or "a boolean".
    pub expected: &'static str,

    /// The type of the value that was actually received.
    pub found: &'static str,
}

/// Too many arguments were given to a function call.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("too many arguments were given to the `{}` function", self.name),
    help = format!(
        "the `{}` function takes {} argument(s); there are {} argument(s) provided here",
        (&self.name).fg(EXPR),
        self.expected,
        self.given,
    ),
)]
pub struct TooManyArguments {
    /// The name of the function that was called.
    pub name: String,

    /// The number of arguments that were expected.
    pub expected: usize,

    /// The number of arguments that were given.
    pub given: usize,
}

/// A required argument to a function call is missing and has no default.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!(
        "missing the `{}` argument for the `{}` function",
        self.param, self.name,
    ),
    help = format!(
        "the `{}` function takes {} argument(s); there are {} argument(s) provided here",
        (&self.name).fg(EXPR),
        self.expected,
        self.given,
    ),
)]
pub struct MissingArgument {
    /// The name of the function that was called.
    pub name: String,

    /// The name of the parameter that has no value.
    pub param: String,

    /// The number of arguments that were expected.
    pub expected: usize,

    /// The number of arguments that were given.
    pub given: usize,
}

/// Recursion exceeded the maximum evaluation depth.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!(
        "maximum recursion depth reached while evaluating the `{}` function",
        self.name,
    ),
    help = "check that the function's base case is reachable",
)]
pub struct StackOverflow {
    /// The name of the function that was being evaluated.
    pub name: String,
}

/// A string operation was asked for more characters than the string contains.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!(
        "cannot take {} character(s) from a string of length {}",
        self.requested, self.length,
    ),
)]
pub struct StringIndexOutOfRange {
    /// The number of characters requested.
    pub requested: usize,

    /// The length of the string.
    pub length: usize,
}

/// Attempted to divide a polynomial by the zero polynomial.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "cannot divide by the zero polynomial",
)]
pub struct ZeroPolynomialDivision;

/// A polynomial operation that only supports one variable was given several.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!(
        "this operation supports polynomials in one variable, but found {}",
        self.count,
    ),
    help = "collect the expression in a single variable first",
)]
pub struct MultivariateUnsupported {
    /// The number of distinct variables found.
    pub count: usize,
}

/// An expression could not be interpreted as a polynomial.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not a polynomial in the given variable(s)", self.expr),
    help = "only sums of products of numbers and non-negative integer powers are supported",
)]
pub struct NonPolynomialExpression {
    /// The printed form of the offending expression.
    pub expr: String,
}
