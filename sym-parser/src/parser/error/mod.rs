pub mod kind;

use ariadne::Report;
use sym_error::ErrorKind;
use std::ops::Range;

/// A general parsing error.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,

    /// Whether this error is fatal. A fatal error aborts parsing immediately instead of letting
    /// the parser backtrack and try an alternative interpretation of the input.
    pub fatal: bool,
}

impl Error {
    /// Creates a new error with the given span and kind.
    pub fn new(span: Range<usize>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans: vec![span], kind: Box::new(kind), fatal: false }
    }

    /// Creates a new error with multiple spans.
    pub fn new_multi(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind), fatal: false }
    }

    /// Creates a new fatal error with the given span and kind.
    pub fn new_fatal(span: Range<usize>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans: vec![span], kind: Box::new(kind), fatal: true }
    }

    /// Build a report from this error kind.
    pub fn build_report(&self) -> Report<(&'static str, Range<usize>)> {
        self.kind.build_report("input", &self.spans)
    }
}

impl From<Error> for sym_error::Error {
    fn from(err: Error) -> Self {
        Self { spans: err.spans, kind: err.kind }
    }
}
