//! Canonical token text of an expression.
//!
//! The proc macro sees compiler tokens while the runtime builder sees source
//! text re-parsed from disk. Both sides print an expression through the same
//! syntax tree and flatten it here, dropping all spacing except one space
//! between adjacent word-like tokens, so the two keys agree.

use proc_macro2::{Delimiter, TokenStream, TokenTree};
use quote::ToTokens;
use syn::Expr;

/// Canonical key of a parsed expression.
pub fn expr_key(expr: &Expr) -> String {
    tokens_key(expr.to_token_stream())
}

/// Canonical key of a token stream.
pub fn tokens_key(tokens: TokenStream) -> String {
    let mut key = String::new();
    write_tokens(&mut key, tokens);
    key
}

/// Canonical key of source text, if it parses as an expression.
pub fn source_key(source: &str) -> Option<String> {
    syn::parse_str::<Expr>(source).ok().map(|expr| expr_key(&expr))
}

fn write_tokens(out: &mut String, tokens: TokenStream) {
    for tree in tokens {
        match tree {
            TokenTree::Group(group) => {
                let (open, close) = match group.delimiter() {
                    Delimiter::Parenthesis => ("(", ")"),
                    Delimiter::Brace => ("{", "}"),
                    Delimiter::Bracket => ("[", "]"),
                    Delimiter::None => ("", ""),
                };
                out.push_str(open);
                write_tokens(out, group.stream());
                out.push_str(close);
            }
            TokenTree::Ident(ident) => push_word(out, &ident.to_string()),
            TokenTree::Literal(literal) => push_word(out, &literal.to_string()),
            TokenTree::Punct(punct) => out.push(punct.as_char()),
        }
    }
}

fn push_word(out: &mut String, word: &str) {
    let joins = out.chars().next_back().is_some_and(is_word_char)
        && word.chars().next().is_some_and(is_word_char);
    if joins {
        out.push(' ');
    }
    out.push_str(word);
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
