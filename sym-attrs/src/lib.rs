mod error_kind;

use error_kind::ErrorKindTarget;
use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;

/// Derives the `ErrorKind` trait for the given struct.
///
/// The information of the error is customized using the `error` attribute:
///
/// ```ignore
/// use sym_attrs::ErrorKind;
/// use sym_error::ErrorKind;
///
/// #[derive(Debug, ErrorKind)]
/// #[error(message = "unexpected end of file", labels = ["add something here"])]
/// pub struct Foo;
/// ```
///
/// The following tags are available:
///
/// | Tag       | Description                                                                  |
/// | --------- | ---------------------------------------------------------------------------- |
/// | `message` | The message displayed at the top of the error when it is displayed.          |
/// | `labels`  | An array of label texts, one per span attached to the error.                 |
/// | `help`    | Optional help text for the error, describing what the user can do to fix it. |
///
/// `message` and `help` accept an expression evaluating to a `String`; `labels` accepts an array
/// of such expressions. For structs with named fields, the expressions are evaluated with the
/// members of the struct in scope, so they can be used directly (tuple structs are not supported).
#[proc_macro_derive(ErrorKind, attributes(error))]
pub fn error_kind(item: TokenStream) -> TokenStream {
    let target = parse_macro_input!(item as ErrorKindTarget);
    let name = &target.name;
    quote! {
        impl ErrorKind for #name {
            #target
        }
    }.into()
}
