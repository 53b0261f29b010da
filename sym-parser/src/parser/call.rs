use std::ops::Range;
use super::{
    error::{kind, Error},
    expr::Expr,
    literal::LitSym,
    token::{CloseBracket, OpenBracket},
    Parse,
    Parser,
};
use crate::tokenizer::TokenKind;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A function call, such as `Expand[(x + 1) ^ 2]`. The arguments are surrounded by square
/// brackets, and the call can have no arguments at all.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Call {
    /// The name of the function to call.
    pub name: LitSym,

    /// The arguments to the function.
    pub args: Vec<Expr>,

    /// The region of the source code that this function call was parsed from.
    pub span: Range<usize>,

    /// The span of the brackets that surround the arguments.
    pub bracket_span: Range<usize>,
}

impl Call {
    /// Returns the span of the function call.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns a set of two spans, where the first is the span of the function name (with the
    /// opening bracket) and the second is the span of the closing bracket.
    pub fn outer_span(&self) -> [Range<usize>; 2] {
        [
            self.name.span.start..self.bracket_span.start + 1,
            self.bracket_span.end - 1..self.bracket_span.end,
        ]
    }
}

impl Parse for Call {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let name = input.try_parse::<LitSym>()?;
        let open_bracket = input.try_parse::<OpenBracket>()?;
        let args = input.try_parse_delimited::<Expr>(TokenKind::Comma)
            .unwrap_or_default();
        let close_bracket = input.try_parse::<CloseBracket>()
            .map_err(|err| if input.clone().next_token().is_err() {
                Error::new_fatal(open_bracket.span.clone(), kind::UnclosedBracket)
            } else {
                err
            })?;

        let span = name.span.start..close_bracket.span.end;
        Ok(Self {
            name,
            args,
            span,
            bracket_span: open_bracket.span.start..close_bracket.span.end,
        })
    }
}
