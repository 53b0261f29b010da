//! String builtins.
//!
//! All of these operate on whole characters, not bytes, so multibyte input behaves sensibly.

use crate::error::{kind, Error};
use crate::expr::Expression;
use crate::fmt::to_fullform;
use super::{fixed_args, is_symbolic, unevaluated};

/// Extracts a string argument, or reports a type mismatch.
fn expect_str(name: &'static str, arg: Expression) -> Result<String, Error> {
    match arg {
        Expression::Str(s) => Ok(s),
        arg => Err(Error::new(vec![], kind::TypeMismatch {
            head: name,
            expected: "a string",
            found: arg.typename(),
        })),
    }
}

/// Extracts an integer count argument.
fn expect_count(name: &'static str, arg: Expression) -> Result<i64, Error> {
    arg.as_integer().ok_or_else(|| Error::new(vec![], kind::TypeMismatch {
        head: name,
        expected: "an integer",
        found: arg.typename(),
    }))
}

/// The number of characters in a string.
pub fn string_length(args: Vec<Expression>) -> Result<Expression, Error> {
    let [arg] = fixed_args("StringLength", ["string"], args)?;
    if is_symbolic(&arg) {
        return Ok(unevaluated("StringLength", vec![arg]));
    }
    let s = expect_str("StringLength", arg)?;
    Ok(Expression::Number(s.chars().count() as f64))
}

/// The first `n` characters of a string; the last `-n` characters when `n` is negative.
pub fn string_take(args: Vec<Expression>) -> Result<Expression, Error> {
    let [string, count] = fixed_args("StringTake", ["string", "n"], args)?;
    if is_symbolic(&string) || is_symbolic(&count) {
        return Ok(unevaluated("StringTake", vec![string, count]));
    }
    let s = expect_str("StringTake", string)?;
    let n = expect_count("StringTake", count)?;
    let (length, requested) = (s.chars().count(), n.unsigned_abs() as usize);
    if requested > length {
        return Err(Error::new(vec![], kind::StringIndexOutOfRange { requested, length }));
    }
    let taken = if n >= 0 {
        s.chars().take(requested).collect()
    } else {
        s.chars().skip(length - requested).collect()
    };
    Ok(Expression::Str(taken))
}

/// A string with its first `n` characters removed; its last `-n` when `n` is negative.
pub fn string_drop(args: Vec<Expression>) -> Result<Expression, Error> {
    let [string, count] = fixed_args("StringDrop", ["string", "n"], args)?;
    if is_symbolic(&string) || is_symbolic(&count) {
        return Ok(unevaluated("StringDrop", vec![string, count]));
    }
    let s = expect_str("StringDrop", string)?;
    let n = expect_count("StringDrop", count)?;
    let (length, requested) = (s.chars().count(), n.unsigned_abs() as usize);
    if requested > length {
        return Err(Error::new(vec![], kind::StringIndexOutOfRange { requested, length }));
    }
    let kept = if n >= 0 {
        s.chars().skip(requested).collect()
    } else {
        s.chars().take(length - requested).collect()
    };
    Ok(Expression::Str(kept))
}

/// Concatenates any number of strings. This is also the target of the `<>` operator.
pub fn string_join(args: Vec<Expression>) -> Result<Expression, Error> {
    if args.iter().any(is_symbolic) {
        return Ok(unevaluated("StringJoin", args));
    }
    let mut joined = String::new();
    for arg in args {
        joined.push_str(&expect_str("StringJoin", arg)?);
    }
    Ok(Expression::Str(joined))
}

/// Replaces every occurrence of a pattern, given as a `"from" -> "to"` rule.
pub fn string_replace(args: Vec<Expression>) -> Result<Expression, Error> {
    let [string, rule] = fixed_args("StringReplace", ["string", "rule"], args)?;
    if is_symbolic(&string) || is_symbolic(&rule) {
        return Ok(unevaluated("StringReplace", vec![string, rule]));
    }
    let s = expect_str("StringReplace", string)?;
    let Expression::Rule(from, to) = rule else {
        return Err(Error::new(vec![], kind::TypeMismatch {
            head: "StringReplace",
            expected: "a string replacement rule",
            found: rule.typename(),
        }));
    };
    let from = expect_str("StringReplace", *from)?;
    let to = expect_str("StringReplace", *to)?;
    Ok(Expression::Str(s.replace(&from, &to)))
}

pub fn to_upper_case(args: Vec<Expression>) -> Result<Expression, Error> {
    let [arg] = fixed_args("ToUpperCase", ["string"], args)?;
    if is_symbolic(&arg) {
        return Ok(unevaluated("ToUpperCase", vec![arg]));
    }
    Ok(Expression::Str(expect_str("ToUpperCase", arg)?.to_uppercase()))
}

pub fn to_lower_case(args: Vec<Expression>) -> Result<Expression, Error> {
    let [arg] = fixed_args("ToLowerCase", ["string"], args)?;
    if is_symbolic(&arg) {
        return Ok(unevaluated("ToLowerCase", vec![arg]));
    }
    Ok(Expression::Str(expect_str("ToLowerCase", arg)?.to_lowercase()))
}

/// The canonical head-and-arguments rendering of an expression, as a string.
pub fn full_form(args: Vec<Expression>) -> Result<Expression, Error> {
    let [arg] = fixed_args("FullForm", ["expr"], args)?;
    Ok(Expression::Str(to_fullform(&arg)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn s(value: &str) -> Expression {
        Expression::Str(value.to_string())
    }

    #[test]
    fn length_counts_characters() {
        assert_eq!(
            string_length(vec![s("héllo")]).unwrap(),
            Expression::Number(5.0),
        );
    }

    #[test]
    fn take_and_drop_from_both_ends() {
        let n = |v: f64| Expression::Number(v);
        assert_eq!(string_take(vec![s("symbol"), n(3.0)]).unwrap(), s("sym"));
        assert_eq!(string_take(vec![s("symbol"), n(-3.0)]).unwrap(), s("bol"));
        assert_eq!(string_drop(vec![s("symbol"), n(3.0)]).unwrap(), s("bol"));
        assert_eq!(string_drop(vec![s("symbol"), n(-3.0)]).unwrap(), s("sym"));
    }

    #[test]
    fn take_past_the_end_is_an_error() {
        assert!(string_take(vec![s("ab"), Expression::Number(3.0)]).is_err());
    }

    #[test]
    fn join_concatenates() {
        assert_eq!(string_join(vec![s("a"), s("b"), s("c")]).unwrap(), s("abc"));
        assert_eq!(string_join(vec![]).unwrap(), s(""));
    }

    #[test]
    fn replace_uses_a_rule() {
        let rule = Expression::Rule(Box::new(s("l")), Box::new(s("r")));
        assert_eq!(
            string_replace(vec![s("hello"), rule]).unwrap(),
            s("herro"),
        );
    }

    #[test]
    fn case_conversions() {
        assert_eq!(to_upper_case(vec![s("abc")]).unwrap(), s("ABC"));
        assert_eq!(to_lower_case(vec![s("ABC")]).unwrap(), s("abc"));
    }
}
