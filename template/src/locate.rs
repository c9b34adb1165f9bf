//! Finding and re-parsing the source text of a reporting call.

use std::{
    fs,
    ops::Range,
    path::{Path, PathBuf},
};

use proc_macro2::{TokenStream, TokenTree};
use syn::{Expr, ExprCall};

use crate::{
    error::{Error, Result},
    position::SourceText,
};

/// Number of spaces a tab expands to in parsed call text.
pub const TAB_WIDTH: usize = 4;

/// Resolve a `file!()` path to a readable file.
///
/// `file!()` is relative to the directory the compiler ran in, which for
/// cargo is the workspace root rather than the package directory. Tries the
/// path as given, then relative to every ancestor of the manifest directory.
pub fn resolve_source_path(file: &str, manifest_dir: Option<&str>) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() || path.exists() {
        return path.to_path_buf();
    }
    manifest_dir
        .into_iter()
        .flat_map(|dir| Path::new(dir).ancestors())
        .map(|ancestor| ancestor.join(path))
        .find(|candidate| candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

/// Read a source file. The handle is closed before this returns.
pub fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })
}

/// Where a reporting call starts on its line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallStart {
    /// Everything up to and including the opening parenthesis, rewritten so it
    /// parses on its own while keeping every column where it was: the text
    /// before the name and the `!` become spaces.
    pub prefix: String,
    /// Byte offset in the source just after the opening parenthesis.
    pub rest: usize,
}

/// Find `name` followed by `!` and `(` on the 1-based `line` of `source`.
pub fn locate_call(source: &str, line: usize, name: &str, path: &Path) -> Result<CallStart> {
    let not_found = || Error::CallNotFound {
        name: name.to_string(),
        line,
        path: path.to_path_buf(),
    };

    let line_start = match line {
        0 => return Err(not_found()),
        1 => 0,
        _ => source
            .match_indices('\n')
            .nth(line - 2)
            .map(|(i, _)| i + 1)
            .ok_or_else(not_found)?,
    };
    let line_text = source[line_start..].split('\n').next().unwrap_or_default();

    for (at, _) in line_text.match_indices(name) {
        let at_boundary = !line_text[..at].chars().next_back().is_some_and(is_ident_char);
        if !at_boundary {
            continue;
        }
        let after = at + name.len();
        if let Some(gap) = macro_gap(&line_text[after..]) {
            let mut prefix = " ".repeat(blank_width(&line_text[..at]));
            prefix.push_str(name);
            prefix.push_str(&" ".repeat(blank_width(&line_text[after..after + gap])));
            prefix.push('(');
            return Ok(CallStart {
                prefix,
                rest: line_start + after + gap + 1,
            });
        }
    }
    Err(not_found())
}

/// Length of `\s* ! \s*` before an opening parenthesis at the start of `text`.
fn macro_gap(text: &str) -> Option<usize> {
    let bang = text.len() - text.trim_start().len();
    let text_after_bang = text[bang..].strip_prefix('!')?;
    let paren = text_after_bang.len() - text_after_bang.trim_start().len();
    text_after_bang[paren..]
        .starts_with('(')
        .then_some(bang + 1 + paren)
}

fn blank_width(text: &str) -> usize {
    text.chars()
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// The call text that first parses as a complete expression.
#[derive(Debug)]
pub struct ParsedCall {
    pub code: String,
    pub call: ExprCall,
}

/// Grow the call text one character at a time until it parses.
///
/// `\r\n` folds to `\n`. Once the call parses, tabs outside literals expand
/// to [`TAB_WIDTH`] spaces. The grammar decides where the call ends, so nested
/// parentheses, strings and comments need no special handling here.
pub fn parse_incrementally(
    source: &str,
    start: &CallStart,
    line: usize,
    name: &str,
    path: &Path,
) -> Result<ParsedCall> {
    let unparsable = || Error::Unparsable {
        name: name.to_string(),
        line,
        path: path.to_path_buf(),
    };

    let mut code = start.prefix.clone();
    let mut chars = source[start.rest..].chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' && chars.peek() == Some(&'\n') {
            continue;
        }
        code.push(c);
        // A call expression can only end at a closing parenthesis.
        if c != ')' || syn::parse_str::<Expr>(&code).is_err() {
            continue;
        }
        let code = expand_tabs(&code);
        let expr = syn::parse_str::<Expr>(&code).map_err(|_| unparsable())?;
        let call = expect_call(expr, line, name, path)?;
        return Ok(ParsedCall { code, call });
    }
    Err(unparsable())
}

/// Expand tabs to [`TAB_WIDTH`] spaces everywhere but inside literals, which
/// keep their exact text.
fn expand_tabs(code: &str) -> String {
    if !code.contains('\t') {
        return code.to_string();
    }
    let mut literals = Vec::new();
    if let Ok(tokens) = code.parse::<TokenStream>() {
        literal_ranges(tokens, &SourceText::new(code), &mut literals);
    }

    let mut literals = literals.into_iter().peekable();
    let mut expanded = String::with_capacity(code.len());
    for (at, c) in code.char_indices() {
        while literals.next_if(|literal| literal.end <= at).is_some() {}
        let in_literal = literals.peek().is_some_and(|literal| literal.contains(&at));
        if c == '\t' && !in_literal {
            expanded.push_str(&" ".repeat(TAB_WIDTH));
        } else {
            expanded.push(c);
        }
    }
    expanded
}

/// Byte ranges of every literal token, in source order.
fn literal_ranges(tokens: TokenStream, text: &SourceText<'_>, ranges: &mut Vec<Range<usize>>) {
    for tree in tokens {
        match tree {
            TokenTree::Group(group) => literal_ranges(group.stream(), text, ranges),
            TokenTree::Literal(literal) => {
                ranges.push(text.start(literal.span())..text.end(literal.span()));
            }
            TokenTree::Ident(_) | TokenTree::Punct(_) => {}
        }
    }
}

/// Unwrap a parsed expression that must be a call to `name`.
pub fn expect_call(expr: Expr, line: usize, name: &str, path: &Path) -> Result<ExprCall> {
    match expr {
        Expr::Call(call) if matches!(&*call.func, Expr::Path(callee) if callee.path.is_ident(name)) => {
            Ok(call)
        }
        _ => Err(Error::StructuralMismatch {
            name: name.to_string(),
            line,
            path: path.to_path_buf(),
        }),
    }
}
