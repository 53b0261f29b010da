//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages.
//!
//! The parser and evaluator crates define one small `struct` per kind of error and derive
//! [`ErrorKind`] for it (see `sym-attrs`), so that each error declares its message, labels, and
//! optional help text right next to its fields. The REPL is the only place reports are actually
//! rendered.

use ariadne::{Color, Report};
use std::{fmt::Debug, ops::Range};

/// The color used to highlight expressions within an error message.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur while parsing or evaluating SymScript.
pub trait ErrorKind: Debug + Send {
    /// Builds the report for this error.
    fn build_report(
        &self,
        src_id: &'static str,
        spans: &[Range<usize>],
    ) -> Report<(&'static str, Range<usize>)>;
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// Creates a new error pointing at a single span.
    pub fn spanned(span: Range<usize>, kind: impl ErrorKind + 'static) -> Self {
        Self::new(vec![span], kind)
    }

    /// Build a report from this error kind.
    pub fn build_report(&self) -> Report<(&'static str, Range<usize>)> {
        self.kind.build_report("input", &self.spans)
    }
}
