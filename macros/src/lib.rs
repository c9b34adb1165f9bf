//! Reporting macros for `showcall`.
//!
//! Each macro captures its call site, formats its arguments, and evaluates a
//! second time every sub-expression the runtime template will annotate. The
//! runtime re-reads the call from its source file, so the macro must be
//! invoked by its own name, directly in the file it appears in.

use proc_macro::TokenStream;

mod expand;

use expand::Mode;

/// Print the call's source text with the value of every argument and nested
/// sub-expression. Panics if the report cannot be produced.
///
/// # Example
///
/// ```ignore
/// let x = 42.0;
/// show!(foo(bar(x)), label = x * 2.0);
/// ```
#[proc_macro]
pub fn show(input: TokenStream) -> TokenStream {
    expand_or_error(input, Mode::Print)
}

/// Like [`show!`], but evaluates to `Result<(), showcall::Error>` instead of
/// panicking.
#[proc_macro]
pub fn try_show(input: TokenStream) -> TokenStream {
    expand_or_error(input, Mode::Try)
}

/// Build the report without printing it. Evaluates to
/// `Result<showcall::Report, showcall::Error>`.
#[proc_macro]
pub fn show_report(input: TokenStream) -> TokenStream {
    expand_or_error(input, Mode::Report)
}

fn expand_or_error(input: TokenStream, mode: Mode) -> TokenStream {
    expand::expand(input.into(), mode)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
