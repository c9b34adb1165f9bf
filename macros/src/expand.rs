//! Expansion of the reporting macros.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use showcall_template::collect::{SlotSink, collect_arguments};
use syn::{
    Expr, Ident, Token,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Print, panicking on failure.
    Print,
    /// Print, returning the failure.
    Try,
    /// Return the report.
    Report,
}

impl Mode {
    /// The name the runtime searches the source line for.
    pub fn name(self) -> &'static str {
        match self {
            Self::Print => "show",
            Self::Try => "try_show",
            Self::Report => "show_report",
        }
    }
}

struct ShowInput {
    args: Punctuated<Expr, Token![,]>,
}

impl Parse for ShowInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        Ok(Self {
            args: Punctuated::parse_terminated(input)?,
        })
    }
}

enum Argument<'ast> {
    Positional(&'ast Expr),
    Keyword(&'ast Ident, &'ast Expr),
}

/// What the shared walk asks to capture, in walk order.
#[derive(Default)]
struct Captures<'ast> {
    arguments: Vec<Argument<'ast>>,
    bindings: Vec<(String, &'ast Expr)>,
}

impl<'ast> SlotSink<'ast> for Captures<'ast> {
    fn evaluate(&mut self, expr: &'ast Expr, key: String) {
        self.bindings.push((key, expr));
    }

    fn positional(&mut self, _index: usize, expr: &'ast Expr) {
        self.arguments.push(Argument::Positional(expr));
    }

    fn keyword(&mut self, name: &'ast Ident, value: &'ast Expr) {
        self.arguments.push(Argument::Keyword(name, value));
    }
}

pub fn expand(input: TokenStream, mode: Mode) -> syn::Result<TokenStream> {
    let ShowInput { args } = syn::parse2(input)?;
    let mut captures = Captures::default();
    collect_arguments(&args, &mut captures);

    // Arguments are evaluated once each, in source order.
    let mut evaluations = Vec::with_capacity(captures.arguments.len());
    let mut positional = Vec::new();
    let mut keyword_names = Vec::new();
    let mut keyword_values = Vec::new();
    for (i, argument) in captures.arguments.iter().enumerate() {
        let value = format_ident!("__showcall_arg{}", i);
        let expr = match argument {
            Argument::Positional(expr) => {
                positional.push(value.clone());
                expr
            }
            Argument::Keyword(name, expr) => {
                keyword_names.push(name.to_string());
                keyword_values.push(value.clone());
                expr
            }
        };
        evaluations.push(quote! {
            let #value = (&::showcall::__private::Value(&(#expr))).format_value();
        });
    }

    let positional_len = positional.len();
    let keyword_len = keyword_names.len();
    let binding_len = captures.bindings.len();
    let binding_keys = captures.bindings.iter().map(|(key, _)| key);
    let binding_exprs = captures.bindings.iter().map(|(_, expr)| expr);

    let name = mode.name();
    let finish = match mode {
        Mode::Print => quote!(::showcall::__private::print(__showcall_report)),
        Mode::Try => quote!(::showcall::__private::try_print(__showcall_report)),
        Mode::Report => quote!(__showcall_report),
    };

    Ok(quote! {
        {
            #[allow(unused_imports)]
            use ::showcall::__private::{DebugValue as _, OpaqueValue as _};

            fn __showcall_anchor() {}
            let __showcall_site = ::showcall::CallSite {
                file: ::core::file!(),
                line: ::core::line!(),
                manifest_dir: ::core::option_env!("CARGO_MANIFEST_DIR"),
                function: ::showcall::__private::enclosing_function(
                    ::showcall::__private::type_name_of(&__showcall_anchor),
                ),
                name: #name,
            };

            #(#evaluations)*
            let __showcall_positional: [::std::string::String; #positional_len] =
                [#(#positional),*];
            let __showcall_keywords: [(&'static str, ::std::string::String); #keyword_len] =
                [#((#keyword_names, #keyword_values)),*];
            let __showcall_bindings: [(&'static str, ::std::string::String); #binding_len] = [#(
                (#binding_keys, (&::showcall::__private::Value(&(#binding_exprs))).format_value())
            ),*];

            let __showcall_report = ::showcall::report(
                &__showcall_site,
                &::showcall::Arguments::new(
                    &__showcall_positional,
                    &__showcall_keywords,
                    &__showcall_bindings,
                ),
            );
            #finish
        }
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn expansion(input: &str, mode: Mode) -> String {
        let input: TokenStream = input.parse().unwrap();
        expand(input, mode).unwrap().to_string()
    }

    fn captures(input: &str) -> (Vec<String>, Vec<String>) {
        let ShowInput { args } = syn::parse_str(input).unwrap();
        let mut captures = Captures::default();
        collect_arguments(&args, &mut captures);
        let arguments = captures
            .arguments
            .iter()
            .map(|argument| match argument {
                Argument::Positional(_) => "positional".to_string(),
                Argument::Keyword(name, _) => format!("keyword {name}"),
            })
            .collect();
        let keys = captures.bindings.into_iter().map(|(key, _)| key).collect();
        (arguments, keys)
    }

    #[test]
    fn test_captures_follow_walk_order() {
        let (arguments, keys) = captures("foo(bar(x)), label = baz(y), z");
        assert_eq!(arguments, vec!["positional", "keyword label", "positional"]);
        assert_eq!(keys, vec!["x", "bar(x)"]);
    }

    #[test]
    fn test_binding_keys_are_string_literals() {
        let code = expansion("foo(bar(x))", Mode::Report);
        assert!(code.contains("(\"x\" ,"));
        assert!(code.contains("(\"bar(x)\" ,"));
        assert!(code.contains("name : \"show_report\""));
    }

    #[test]
    fn test_modes_finish_differently() {
        assert!(expansion("x", Mode::Print).contains(":: showcall :: __private :: print"));
        assert!(expansion("x", Mode::Try).contains(":: showcall :: __private :: try_print"));
        let report = expansion("x", Mode::Report);
        assert!(!report.contains("print"));
        assert!(report.trim_end().ends_with("__showcall_report }"));
    }

    #[test]
    fn test_no_arguments() {
        let code = expansion("", Mode::Print);
        assert!(code.contains("[:: std :: string :: String ; 0usize] = []"));
    }

    #[test]
    fn test_invalid_input_is_an_error() {
        assert!(expand(quote!(foo(,)), Mode::Print).is_err());
        assert!(expand(quote!(a b), Mode::Print).is_err());
    }
}
