use std::ops::Range;
use crate::{
    parser::{
        error::{kind, Error},
        expr::Expr,
        literal::LitSym,
        token::{Blank, CloseBracket, Colon, OpenBracket},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A parameter of a function definition, such as `x_` or `n_: 2` in the definition
/// `root[x_, n_: 2] := x ^ (1 / n)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Param {
    /// The name of the parameter.
    pub name: LitSym,

    /// The default value of the parameter, if any. When a function with a defaulted parameter is
    /// called with too few arguments, the default fills in for the missing argument.
    pub default: Option<Expr>,

    /// The region of the source code that this parameter was parsed from.
    pub span: Range<usize>,
}

impl Parse for Param {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let name = input.try_parse::<LitSym>()?;
        let blank = input.try_parse::<Blank>()?;

        if input.try_parse::<Colon>().is_ok() {
            let default = input.try_parse::<Expr>()?;
            let span = name.span.start..default.span().end;
            Ok(Param { name, default: Some(default), span })
        } else {
            let span = name.span.start..blank.span.end;
            Ok(Param { name, default: None, span })
        }
    }
}

/// A function header, **not including the body**. Functions can have multiple parameters with
/// optional default values, like in `root[x_, n_: 2]`. When a function with this header is
/// called with too few arguments, the default values are used (i.e. `n = 2`), unless the caller
/// provides their own values (`root[27, 3]`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FuncHeader {
    /// The name of the function.
    pub name: LitSym,

    /// The parameters of the function.
    pub params: Vec<Param>,

    /// The region of the source code that this function header was parsed from.
    pub span: Range<usize>,
}

impl FuncHeader {
    /// Returns the span of the function header.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl Parse for FuncHeader {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let name = input.try_parse::<LitSym>()?;
        input.try_parse::<OpenBracket>()?;
        let params = input.try_parse_delimited::<Param>(TokenKind::Comma)
            .unwrap_or_default();
        let close_bracket = input.try_parse::<CloseBracket>()?;

        let span = name.span.start..close_bracket.span.end;
        Ok(Self { name, params, span })
    }
}

/// An assignment target, such as `x` or `f[x_]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AssignTarget {
    /// A symbol, such as `x`.
    Symbol(LitSym),

    /// A function header, such as `f[x_]`.
    Func(FuncHeader),
}

impl AssignTarget {
    /// Returns the span of the assignment target.
    pub fn span(&self) -> Range<usize> {
        match self {
            AssignTarget::Symbol(symbol) => symbol.span.clone(),
            AssignTarget::Func(func) => func.span(),
        }
    }
}

impl Parse for AssignTarget {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        input.try_parse::<FuncHeader>().map(AssignTarget::Func)
            .or_else(|_| input.try_parse::<LitSym>().map(AssignTarget::Symbol))
    }
}

/// An assignment of a variable or function, such as `x = 1` or `f[x_] := x^2`.
///
/// The `=` form evaluates the right-hand side at the time of the definition; the `:=` form
/// stores it verbatim, to be evaluated on every use.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assign {
    /// The target to assign to.
    pub target: AssignTarget,

    /// Whether the assignment was written with `:=` instead of `=`.
    pub delayed: bool,

    /// The expression to assign to the target.
    pub value: Box<Expr>,

    /// The region of the source code that this assignment expression was parsed from.
    pub span: Range<usize>,
}

impl Assign {
    /// Returns the span of the assignment expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl Parse for Assign {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let target = input.try_parse::<AssignTarget>()?;

        let token = input.next_token()?;
        let delayed = match token.kind {
            TokenKind::AssignDelayed => true,
            TokenKind::Assign => false,
            _ => return Err(Error::new(token.span, kind::UnexpectedToken {
                expected: &[TokenKind::Assign, TokenKind::AssignDelayed],
                found: token.kind,
            })),
        };

        let value = input.try_parse::<Expr>()?;

        let span = target.span().start..value.span().end;
        Ok(Self {
            target,
            delayed,
            value: Box::new(value),
            span,
        })
    }
}
