mod structures;

use proc_macro::TokenStream;
use quote::quote;
use structures::ErrorKindTarget;
use syn::parse_macro_input;

/// Derives the `ErrorKind` trait for the given struct.
///
/// The information of the error is customized using the `error` attribute by adding the
/// corresponding tags to it:
/// ```ignore
/// use symcore_attrs::ErrorKind;
/// use symcore_error::ErrorKind;
///
/// #[derive(Debug, ErrorKind)]
/// #[error(
///     kind = "parse(unexpected_eof)",
///     message = "unexpected end of input",
///     labels = ["add something here"],
/// )]
/// pub struct Foo;
/// ```
///
/// The following tags are available:
///
/// | Tag         | Description                                                                  |
/// | ----------- | ---------------------------------------------------------------------------- |
/// | `kind`      | The stable machine-readable key identifying this error kind.                 |
/// | `message`   | The message displayed at the top of the error when it is displayed.          |
/// | `labels`    | The labels that point to the spans of the error, one per span.               |
/// | `help`      | Optional help text for the error, describing what the user can do to fix it. |
///
/// `kind` must be a string literal; the other tags accept expressions evaluating to a [`String`]
/// (or an iterable of them, for `labels`). For structs with named fields, the expressions are
/// evaluated with the members of the struct in scope, so they can be used in the expression
/// (tuple structs are not supported).
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
