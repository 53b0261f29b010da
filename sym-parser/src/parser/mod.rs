pub mod assign;
pub mod binary;
pub mod call;
pub mod error;
pub mod expr;
pub mod list;
pub mod literal;
pub mod paren;
pub mod token;
pub mod unary;

use error::{Error, kind};
use super::tokenizer::{tokenize_complete, Token, TokenKind};
use sym_error::ErrorKind;
use std::ops::Range;

/// Attempts to parse a value from the given stream of tokens, using multiple parsing functions
/// in order. The first function that succeeds is used to parse the value.
///
/// This function can also catch fatal errors and immediately short-circuit the parsing
/// process.
///
/// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
/// value is returned. Otherwise, the stream is left unchanged and the error of the last
/// attempted parsing function is returned.
#[macro_export]
macro_rules! try_parse_catch_fatal {
    ($($expr:expr),+ $(,)?) => {{
        $(
            match $expr {
                Ok(value) => return Ok(value),
                Err(err) if err.fatal => return Err(err),
                // ignore this error and try the next parser, or return it
                err => err,
            }
        )+
    }};
}

/// A high-level parser for the language. This is the type to use to parse an arbitrary piece of
/// code into an abstract syntax tree.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
        }
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(self.span(), kind)
    }

    /// Creates a fatal error that points at the current token, or the end of the source code if
    /// the cursor is at the end of the stream.
    pub fn error_fatal(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new_fatal(self.span(), kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the current token, or the end of the source code if the cursor is at
    /// the end of the stream.
    pub fn span(&self) -> Range<usize> {
        self.tokens
            .get(self.cursor)
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the previous token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the beginning of the stream.
    pub fn prev_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor.checked_sub(1)?)
    }

    /// Returns the current token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the end of the stream.
    pub fn current_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    /// Moves the cursor to the same position as another parser's cursor. This is used to commit
    /// the tokens consumed by a cloned, lookahead parser.
    pub fn set_cursor(&mut self, other: &Parser) {
        self.cursor = other.cursor;
    }

    /// Returns the next token to be parsed, then advances the cursor. Whitespace tokens are
    /// skipped.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        while self.cursor < self.tokens.len() {
            let token = &self.tokens[self.cursor];
            self.cursor += 1;
            if token.is_whitespace() {
                continue;
            } else {
                // cloning is cheap: only Range<_> is cloned
                return Ok(token.clone());
            }
        }

        Err(self.error(kind::UnexpectedEof))
    }

    /// Speculatively parses a value from the given stream of tokens. This function can be used
    /// in the [`Parse::parse`] implementation of a type with the given [`Parser`], as it will
    /// automatically backtrack the cursor position if parsing fails.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse<T: Parse>(&mut self) -> Result<T, Error> {
        self.try_parse_with_fn(T::parse)
    }

    /// Speculatively parses multiple values (at least one) from the given stream of tokens, each
    /// delimited by a certain token. This function can be used in the [`Parse::parse`]
    /// implementation of a type with the given [`Parser`], as it will automatically backtrack the
    /// cursor position if parsing fails.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// values are returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_delimited<T: Parse>(&mut self, delimiter: TokenKind) -> Result<Vec<T>, Error> {
        let start = self.cursor;
        let mut values = Vec::new();

        loop {
            match self.try_parse::<T>() {
                Ok(value) => values.push(value),
                Err(err) => {
                    if values.is_empty() {
                        self.cursor = start;
                        return Err(err);
                    } else {
                        return Ok(values);
                    }
                },
            }

            while self.current_token().is_some_and(|token| token.is_whitespace()) {
                self.cursor += 1;
            }

            match self.current_token() {
                Some(token) if token.kind == delimiter => {
                    self.cursor += 1;
                },
                _ => return Ok(values),
            }
        }
    }

    /// Speculatively parses a value from the given stream of tokens, using a custom parsing
    /// function to parse the value. This function can be used in the [`Parse::parse`]
    /// implementation of a type with the given [`Parser`], as it will automatically backtrack the
    /// cursor position if parsing fails.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_with_fn<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser) -> Result<T, Error>,
    {
        let start = self.cursor;
        match f(self) {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Speculatively parses a value from the given stream of tokens, with a validation predicate.
    /// The value must parse successfully, **and** the predicate must return [`Ok`] for this
    /// function to return successfully.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_then<T: Parse, F>(&mut self, predicate: F) -> Result<T, Error>
    where
        F: FnOnce(&T, &Parser) -> Result<(), Error>,
    {
        let start = self.cursor;

        // closure workaround allows us to use `?` in the closure
        let compute = || {
            let value = T::parse(self)?;
            predicate(&value, self)?;
            Ok(value)
        };

        match compute() {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Attempts to parse a value from the given stream of tokens. All the tokens must be consumed
    /// by the parser; if not, an error is returned.
    pub fn try_parse_full<T: Parse>(&mut self) -> Result<T, Error> {
        let value = T::parse(self)?;
        while self.current_token().is_some_and(|token| token.is_whitespace()) {
            self.cursor += 1;
        }
        if self.cursor == self.tokens.len() {
            Ok(value)
        } else {
            Err(self.error(kind::ExpectedEof))
        }
    }
}

/// Any type that can be parsed from a source of tokens.
pub trait Parse: Sized {
    /// Parses a value from the given stream of tokens, advancing the stream past the consumed
    /// tokens if parsing is successful.
    ///
    /// This function should be used by consumers of the library.
    fn parse(input: &mut Parser) -> Result<Self, Error>;
}

/// The associativity of a binary or unary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Associativity {
    /// The binary operation is left-associative: `a op b op c` is evaluated as `(a op b) op c`.
    Left,

    /// The binary operation is right-associative: `a op b op c` is evaluated as `a op (b op c)`.
    Right,
}

/// The precedence of an operation, in order from lowest precedence (evaluated last) to highest
/// precedence (evaluated first).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Precedence {
    /// Any precedence.
    Any,

    /// Precedence of rule construction (`->`).
    Rule,

    /// Precedence of comparisons (`>`, `>=`, `<`, `<=`, `==`, and `!=`).
    Compare,

    /// Precedence of logical or (`||`).
    Or,

    /// Precedence of logical and (`&&`).
    And,

    /// Precedence of string concatenation (`<>`).
    Concat,

    /// Precedence of addition (`+`) and subtraction (`-`), which separate terms.
    Term,

    /// Precedence of multiplication (`*`) and division (`/`), which separate factors.
    Factor,

    /// Precedence of unary subtraction (`-`).
    Neg,

    /// Precedence of exponentiation (`^`).
    Exp,
}

impl PartialOrd for Precedence {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        let left = *self as u8;
        let right = *other as u8;
        left.partial_cmp(&right)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use assign::{Assign, AssignTarget, FuncHeader, Param};
    use binary::Binary;
    use call::Call;
    use expr::Expr;
    use list::List;
    use literal::{Literal, LitNum, LitStr, LitSym};
    use paren::Paren;
    use token::op::{BinOp, BinOpKind, UnaryOp, UnaryOpKind};
    use unary::Unary;

    /// Shorthand for a number literal expression.
    fn num(value: f64, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Number(LitNum { value, span }))
    }

    /// Shorthand for a symbol literal expression.
    fn sym(name: &str, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Symbol(LitSym { name: name.to_string(), span }))
    }

    /// Shorthand for an explicit binary operator.
    fn op(kind: BinOpKind, span: Range<usize>) -> BinOp {
        BinOp { kind, implicit: false, span }
    }

    #[test]
    fn literal_int() {
        let mut parser = Parser::new("16");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, num(16.0, 0..2));
    }

    #[test]
    fn literal_float() {
        let mut parser = Parser::new("3.14");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, num(3.14, 0..4));
    }

    #[test]
    fn literal_symbol() {
        let mut parser = Parser::new("theta");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, sym("theta", 0..5));
    }

    #[test]
    fn literal_string() {
        let mut parser = Parser::new(r#""hello there""#);
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Literal(Literal::Str(LitStr {
            value: "hello there".to_string(),
            span: 0..13,
        })));
    }

    #[test]
    fn binary_left_associativity() {
        let mut parser = Parser::new("3 * x * 5");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(Expr::Binary(Binary {
                lhs: Box::new(num(3.0, 0..1)),
                op: op(BinOpKind::Mul, 2..3),
                rhs: Box::new(sym("x", 4..5)),
                span: 0..5,
            })),
            op: op(BinOpKind::Mul, 6..7),
            rhs: Box::new(num(5.0, 8..9)),
            span: 0..9,
        }));
    }

    #[test]
    fn binary_left_associativity_mix_precedence() {
        let mut parser = Parser::new("3 + 4 * a + b");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(Expr::Binary(Binary {
                lhs: Box::new(num(3.0, 0..1)),
                op: op(BinOpKind::Add, 2..3),
                rhs: Box::new(Expr::Binary(Binary {
                    lhs: Box::new(num(4.0, 4..5)),
                    op: op(BinOpKind::Mul, 6..7),
                    rhs: Box::new(sym("a", 8..9)),
                    span: 4..9,
                })),
                span: 0..9,
            })),
            op: op(BinOpKind::Add, 10..11),
            rhs: Box::new(sym("b", 12..13)),
            span: 0..13,
        }));
    }

    #[test]
    fn binary_right_associativity() {
        let mut parser = Parser::new("1 ^ 2 ^ 3");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(num(1.0, 0..1)),
            op: op(BinOpKind::Exp, 2..3),
            rhs: Box::new(Expr::Binary(Binary {
                lhs: Box::new(num(2.0, 4..5)),
                op: op(BinOpKind::Exp, 6..7),
                rhs: Box::new(num(3.0, 8..9)),
                span: 4..9,
            })),
            span: 0..9,
        }));
    }

    #[test]
    fn rule_right_associativity() {
        let mut parser = Parser::new("x -> y -> 3");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(sym("x", 0..1)),
            op: op(BinOpKind::Rule, 2..4),
            rhs: Box::new(Expr::Binary(Binary {
                lhs: Box::new(sym("y", 5..6)),
                op: op(BinOpKind::Rule, 7..9),
                rhs: Box::new(num(3.0, 10..11)),
                span: 5..11,
            })),
            span: 0..11,
        }));
    }

    #[test]
    fn rule_binds_looser_than_exp() {
        let mut parser = Parser::new("x ^ 2 -> 4");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(Expr::Binary(Binary {
                lhs: Box::new(sym("x", 0..1)),
                op: op(BinOpKind::Exp, 2..3),
                rhs: Box::new(num(2.0, 4..5)),
                span: 0..5,
            })),
            op: op(BinOpKind::Rule, 6..8),
            rhs: Box::new(num(4.0, 9..10)),
            span: 0..10,
        }));
    }

    #[test]
    fn binary_complicated() {
        let mut parser = Parser::new("1 + 2 * 3 - 4 / 5 ^ 6");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        // 2 * 3
        let mul = Expr::Binary(Binary {
            lhs: Box::new(num(2.0, 4..5)),
            op: op(BinOpKind::Mul, 6..7),
            rhs: Box::new(num(3.0, 8..9)),
            span: 4..9,
        });

        // 1 + 2 * 3
        let add = Expr::Binary(Binary {
            lhs: Box::new(num(1.0, 0..1)),
            op: op(BinOpKind::Add, 2..3),
            rhs: Box::new(mul),
            span: 0..9,
        });

        // 5 ^ 6
        let exp = Expr::Binary(Binary {
            lhs: Box::new(num(5.0, 16..17)),
            op: op(BinOpKind::Exp, 18..19),
            rhs: Box::new(num(6.0, 20..21)),
            span: 16..21,
        });

        // 4 / 5 ^ 6
        let div = Expr::Binary(Binary {
            lhs: Box::new(num(4.0, 12..13)),
            op: op(BinOpKind::Div, 14..15),
            rhs: Box::new(exp),
            span: 12..21,
        });

        // 1 + 2 * 3 - 4 / 5 ^ 6
        let sub = Expr::Binary(Binary {
            lhs: Box::new(add),
            op: op(BinOpKind::Sub, 10..11),
            rhs: Box::new(div),
            span: 0..21,
        });

        assert_eq!(expr, sub);
    }

    #[test]
    fn binary_and_unary() {
        let mut parser = Parser::new("-1 ^ -2 * 3");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(Expr::Unary(Unary {
                operand: Box::new(Expr::Binary(Binary {
                    lhs: Box::new(num(1.0, 1..2)),
                    op: op(BinOpKind::Exp, 3..4),
                    rhs: Box::new(Expr::Unary(Unary {
                        operand: Box::new(num(2.0, 6..7)),
                        op: UnaryOp { kind: UnaryOpKind::Neg, span: 5..6 },
                        span: 5..7,
                    })),
                    span: 1..7,
                })),
                op: UnaryOp { kind: UnaryOpKind::Neg, span: 0..1 },
                span: 0..7,
            })),
            op: op(BinOpKind::Mul, 8..9),
            rhs: Box::new(num(3.0, 10..11)),
            span: 0..11,
        }));
    }

    #[test]
    fn implicit_multiplication() {
        let mut parser = Parser::new("2(3 + 4)");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(num(2.0, 0..1)),
            op: BinOp { kind: BinOpKind::Mul, implicit: true, span: 1..1 },
            rhs: Box::new(Expr::Paren(Paren {
                expr: Box::new(Expr::Binary(Binary {
                    lhs: Box::new(num(3.0, 2..3)),
                    op: op(BinOpKind::Add, 4..5),
                    rhs: Box::new(num(4.0, 6..7)),
                    span: 2..7,
                })),
                span: 1..8,
            })),
            span: 0..8,
        }));
    }

    #[test]
    fn implicit_multiplication_polynomial() {
        let mut parser = Parser::new("4 x^2 + 5 x + 1");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(Expr::Binary(Binary {
                lhs: Box::new(Expr::Binary(Binary {
                    lhs: Box::new(num(4.0, 0..1)),
                    op: BinOp { kind: BinOpKind::Mul, implicit: true, span: 1..2 },
                    rhs: Box::new(Expr::Binary(Binary {
                        lhs: Box::new(sym("x", 2..3)),
                        op: op(BinOpKind::Exp, 3..4),
                        rhs: Box::new(num(2.0, 4..5)),
                        span: 2..5,
                    })),
                    span: 0..5,
                })),
                op: op(BinOpKind::Add, 6..7),
                rhs: Box::new(Expr::Binary(Binary {
                    lhs: Box::new(num(5.0, 8..9)),
                    op: BinOp { kind: BinOpKind::Mul, implicit: true, span: 9..10 },
                    rhs: Box::new(sym("x", 10..11)),
                    span: 8..11,
                })),
                span: 0..11,
            })),
            op: op(BinOpKind::Add, 12..13),
            rhs: Box::new(num(1.0, 14..15)),
            span: 0..15,
        }));
    }

    #[test]
    fn parenthesized() {
        let mut parser = Parser::new("(1 + 2) * x");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(Expr::Paren(Paren {
                expr: Box::new(Expr::Binary(Binary {
                    lhs: Box::new(num(1.0, 1..2)),
                    op: op(BinOpKind::Add, 3..4),
                    rhs: Box::new(num(2.0, 5..6)),
                    span: 1..6,
                })),
                span: 0..7,
            })),
            op: op(BinOpKind::Mul, 8..9),
            rhs: Box::new(sym("x", 10..11)),
            span: 0..11,
        }));
    }

    #[test]
    fn list_literal() {
        let mut parser = Parser::new("{1, x, 3}");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::List(List {
            values: vec![
                num(1.0, 1..2),
                sym("x", 4..5),
                num(3.0, 7..8),
            ],
            span: 0..9,
        }));
    }

    #[test]
    fn empty_list() {
        let mut parser = Parser::new("{}");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::List(List {
            values: vec![],
            span: 0..2,
        }));
    }

    #[test]
    fn assign_to_var() {
        let mut parser = Parser::new("r = 1 / pi");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Assign(Assign {
            target: AssignTarget::Symbol(LitSym {
                name: "r".to_string(),
                span: 0..1,
            }),
            delayed: false,
            value: Box::new(Expr::Binary(Binary {
                lhs: Box::new(num(1.0, 4..5)),
                op: op(BinOpKind::Div, 6..7),
                rhs: Box::new(sym("pi", 8..10)),
                span: 4..10,
            })),
            span: 0..10,
        }));
    }

    #[test]
    fn assign_to_function() {
        let mut parser = Parser::new("f[x_] := x^2");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Assign(Assign {
            target: AssignTarget::Func(FuncHeader {
                name: LitSym {
                    name: "f".to_string(),
                    span: 0..1,
                },
                params: vec![
                    Param {
                        name: LitSym { name: "x".to_string(), span: 2..3 },
                        default: None,
                        span: 2..4,
                    },
                ],
                span: 0..5,
            }),
            delayed: true,
            value: Box::new(Expr::Binary(Binary {
                lhs: Box::new(sym("x", 9..10)),
                op: op(BinOpKind::Exp, 10..11),
                rhs: Box::new(num(2.0, 11..12)),
                span: 9..12,
            })),
            span: 0..12,
        }));
    }

    #[test]
    fn assign_to_function_with_default() {
        let mut parser = Parser::new("root[x_, n_: 2] := x ^ (1 / n)");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        let Expr::Assign(assign) = expr else {
            panic!("expected assignment");
        };
        let AssignTarget::Func(header) = assign.target else {
            panic!("expected function header");
        };

        assert!(assign.delayed);
        assert_eq!(header.name.name, "root");
        assert_eq!(header.params.len(), 2);
        assert_eq!(header.params[0].name.name, "x");
        assert_eq!(header.params[0].default, None);
        assert_eq!(header.params[1].name.name, "n");
        assert_eq!(header.params[1].default, Some(num(2.0, 13..14)));
    }

    #[test]
    fn function_call() {
        let mut parser = Parser::new("f[x]");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Call(Call {
            name: LitSym {
                name: "f".to_string(),
                span: 0..1,
            },
            args: vec![sym("x", 2..3)],
            span: 0..4,
            bracket_span: 1..4,
        }));
    }

    #[test]
    fn nested_call_with_rule() {
        let mut parser = Parser::new("ReplaceAll[x + 1, x -> 2]");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        let Expr::Call(call) = expr else {
            panic!("expected function call");
        };
        assert_eq!(call.name.name, "ReplaceAll");
        assert_eq!(call.args.len(), 2);
        assert_eq!(call.args[1], Expr::Binary(Binary {
            lhs: Box::new(sym("x", 18..19)),
            op: op(BinOpKind::Rule, 20..22),
            rhs: Box::new(num(2.0, 23..24)),
            span: 18..24,
        }));
    }

    #[test]
    fn comparison_chain_is_left_associative() {
        let mut parser = Parser::new("1 < 2 == 3");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(Expr::Binary(Binary {
                lhs: Box::new(num(1.0, 0..1)),
                op: op(BinOpKind::Less, 2..3),
                rhs: Box::new(num(2.0, 4..5)),
                span: 0..5,
            })),
            op: op(BinOpKind::Eq, 6..8),
            rhs: Box::new(num(3.0, 9..10)),
            span: 0..10,
        }));
    }

    #[test]
    fn unclosed_paren_is_fatal() {
        let mut parser = Parser::new("(1 + 2");
        let err = parser.try_parse_full::<Expr>().unwrap_err();
        assert!(err.fatal);
    }

    #[test]
    fn trailing_tokens_are_rejected() {
        let mut parser = Parser::new("1 + 2 ]");
        assert!(parser.try_parse_full::<Expr>().is_err());
    }
}
