use ariadne::Source;
use sym_attrs::ErrorKind;
use sym_error::{Error, ErrorKind};

/// A derived error kind used to exercise the report plumbing end to end.
#[derive(Debug, ErrorKind)]
#[error(
    message = format!("`{}` is not defined", name),
    labels = ["this variable"],
    help = "define it before using it",
)]
struct UndefinedVariable {
    name: String,
}

#[test]
fn derived_report_renders() {
    let source = "x + y";
    let err = Error::spanned(4..5, UndefinedVariable { name: "y".to_string() });

    let mut buf = Vec::new();
    err.build_report()
        .write(("input", Source::from(source)), &mut buf)
        .unwrap();

    let rendered = String::from_utf8(strip_ansi_escapes::strip(&buf)).unwrap();
    assert!(rendered.contains("`y` is not defined"));
    assert!(rendered.contains("this variable"));
    assert!(rendered.contains("define it before using it"));
}
