use std::ops::Range;
use super::{
    error::{kind, Error},
    expr::Expr,
    token::{CloseBrace, OpenBrace},
    Parse,
    Parser,
};
use crate::tokenizer::TokenKind;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A list literal, such as `{1, x, 3}`. Lists can be empty.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct List {
    /// The elements of the list.
    pub values: Vec<Expr>,

    /// The region of the source code that this list was parsed from.
    pub span: Range<usize>,
}

impl List {
    /// Returns the span of the list.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl Parse for List {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let open_brace = input.try_parse::<OpenBrace>()?;
        let values = input.try_parse_delimited::<Expr>(TokenKind::Comma)
            .unwrap_or_default();
        let close_brace = input.try_parse::<CloseBrace>()
            .map_err(|err| if input.clone().next_token().is_err() {
                Error::new_fatal(open_brace.span.clone(), kind::UnclosedBrace)
            } else {
                err
            })?;

        Ok(Self {
            values,
            span: open_brace.span.start..close_brace.span.end,
        })
    }
}
