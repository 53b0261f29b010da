//! Tokenizer and parser for the SymScript language.
//!
//! The entry point to this crate is the [`Parser`](parser::Parser) struct, which turns a source
//! string into an abstract syntax tree:
//!
//! ```
//! use sym_parser::parser::{expr::Expr, Parser};
//!
//! let mut parser = Parser::new("f[x_] := x ^ 2 + 2 x + 1");
//! let ast = parser.try_parse_full::<Expr>().unwrap();
//! ```

pub mod parser;
pub mod tokenizer;
