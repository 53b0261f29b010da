use std::ops::Range;
use super::{
    error::{kind, Error},
    token::{Float, Name, Int, Str},
    Parse,
    Parser,
};
use crate::tokenizer::TokenKind;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A number literal. Integers and floating-point numbers are both supported and represented here
/// as `f64`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitNum {
    /// The value of the number literal.
    pub value: f64,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitNum {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let (lexeme, span) = input
            .try_parse::<Int>()
            .map(|num| (num.lexeme, num.span))
            .or_else(|_| input.try_parse::<Float>().map(|num| (num.lexeme, num.span)))?;

        // the tokenizer guarantees the lexeme is a valid number
        let value = lexeme.parse().map_err(|_| Error::new(span.clone(), kind::NonFatal))?;
        Ok(Self { value, span })
    }
}

/// A symbol / identifier literal. Symbols are used to represent variables and functions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitSym {
    /// The name of the symbol.
    pub name: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitSym {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.try_parse::<Name>()?;
        Ok(Self {
            name: token.lexeme,
            span: token.span,
        })
    }
}

/// A string literal, delimited by double quotes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitStr {
    /// The content of the string, with escape sequences resolved.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

/// Resolves the escape sequences in a string literal, stripping the surrounding quotes.
fn unescape(lexeme: &str) -> String {
    let inner = &lexeme[1..lexeme.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => break,
            }
        } else {
            out.push(c);
        }
    }

    out
}

impl Parse for LitStr {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        match token.kind {
            TokenKind::Str => Ok(Self {
                value: unescape(token.lexeme),
                span: token.span,
            }),
            TokenKind::Quote => Err(Error::new_fatal(token.span, kind::UnterminatedString)),
            _ => Err(Error::new(token.span, kind::UnexpectedToken {
                expected: &[TokenKind::Str],
                found: token.kind,
            })),
        }
    }
}

/// Represents a literal value in SymScript.
///
/// A literal is any value that is written directly into the source code, such as the number `3`
/// or the string `"pi"`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Literal {
    /// A number literal. Integers and floating-point numbers are both supported and represented
    /// here as `f64`.
    Number(LitNum),

    /// A symbol / identifier literal. Symbols are used to represent variables and functions.
    Symbol(LitSym),

    /// A string literal, delimited by double quotes.
    Str(LitStr),
}

impl Literal {
    /// Returns the span of the literal.
    pub fn span(&self) -> Range<usize> {
        match self {
            Literal::Number(num) => num.span.clone(),
            Literal::Symbol(name) => name.span.clone(),
            Literal::Str(s) => s.span.clone(),
        }
    }
}

impl Parse for Literal {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        input.try_parse::<LitNum>().map(Literal::Number)
            .or_else(|_| input.try_parse::<LitSym>().map(Literal::Symbol))
            .or_else(|err| match input.try_parse::<LitStr>() {
                Ok(s) => Ok(Literal::Str(s)),
                Err(str_err) if str_err.fatal => Err(str_err),
                Err(_) => Err(err),
            })
    }
}
