//! Expression model, evaluator, simplifier, and polynomial library for SymScript.
//!
//! The quickest way in is [`parse`], which runs the full front half of the pipeline
//! (tokenize, parse, normalize) and hands back an [`Expression`](expr::Expression) ready
//! for [`eval::evaluate`]:
//!
//! ```
//! use sym_compute::ctxt::Ctxt;
//! use sym_compute::eval::evaluate;
//!
//! let expr = sym_compute::parse("1 / 2 + 1 / 3").unwrap();
//! let mut ctxt = Ctxt::default();
//! assert_eq!(evaluate(&expr, &mut ctxt).unwrap().to_string(), "5/6");
//! ```
//!
//! Evaluation is symbolic where it has to be: unbound symbols and unknown function heads
//! survive as themselves, so `x + 1` evaluates to `x + 1` until `x` is assigned.

pub mod builtin;
pub mod ctxt;
pub mod error;
pub mod eval;
pub mod expr;
pub mod fmt;
pub mod normalize;
pub mod polynomial;
pub mod rational;
pub mod simplify;

use error::Error;
use expr::Expression;
use sym_parser::parser::{expr::Expr, Parser};

/// Parses a source string into a normalized [`Expression`].
///
/// Normalization happens here too, so the returned tree is already in the internal form
/// the evaluator expects: `a - b` comes back as `a + -1 * b`, and literal imaginary
/// products fold into [`Expression::Complex`].
pub fn parse(source: &str) -> Result<Expression, Error> {
    let mut parser = Parser::new(source);
    let ast = parser.try_parse_full::<Expr>().map_err(Error::from)?;
    Ok(normalize::normalize(Expression::from(ast)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_normalizes() {
        assert_eq!(parse("a - b").unwrap().to_string(), "a - b");
        assert_eq!(
            parse("a - b").unwrap(),
            Expression::call("Plus", vec![
                Expression::symbol("a"),
                Expression::call("Times", vec![
                    Expression::Number(-1.0),
                    Expression::symbol("b"),
                ]),
            ]),
        );
    }

    #[test]
    fn parse_reports_syntax_errors() {
        assert!(parse("1 +").is_err());
        assert!(parse("f[x_, := 2").is_err());
    }
}
