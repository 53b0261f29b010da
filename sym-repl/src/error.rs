use ariadne::Source;
use sym_error::Error;

/// Report the given error to stderr.
///
/// The `ariadne` crate's [`Report`](ariadne::Report) type actually does not have a `Display`
/// implementation, so we can only use its `eprint` method to print to stderr.
pub fn report_to_stderr(err: &Error, input: &str) {
    let report = err.build_report();
    report.eprint(("input", Source::from(input))).unwrap();
}
