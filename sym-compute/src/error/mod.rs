//! Errors raised while evaluating an expression.
//!
//! Evaluation operates on the converted [`Expression`](crate::expr::Expression) tree, which
//! no longer carries source spans, so these errors point at the whole input when reported.

pub mod kind;

pub use sym_error::Error;
