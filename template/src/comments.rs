//! Comment removal for parsed call text.
//!
//! Every gap between two tokens holds only whitespace and comments, so the
//! token spans tell us exactly where comments may be without lexing string
//! or character literals ourselves.

use proc_macro2::{Delimiter, TokenStream, TokenTree};

use crate::position::SourceText;

/// Remove comments from `code`, keeping every token byte-for-byte.
///
/// A line that held nothing but a comment is dropped entirely. Text that does
/// not tokenize is returned unchanged.
pub fn strip_comments(code: &str) -> String {
    let Ok(tokens) = code.parse::<TokenStream>() else {
        return code.to_string();
    };

    let text = SourceText::new(code);
    let mut ranges = Vec::new();
    token_ranges(&text, tokens, &mut ranges);

    let mut out = String::with_capacity(code.len());
    let mut cursor = 0;
    for (start, end) in ranges {
        if start > cursor {
            out.push_str(&clean_gap(&code[cursor..start]));
            cursor = start;
        }
        if end > cursor {
            out.push_str(&code[cursor..end]);
            cursor = end;
        }
    }
    out.push_str(&clean_gap(&code[cursor..]));
    out
}

fn token_ranges(text: &SourceText, tokens: TokenStream, ranges: &mut Vec<(usize, usize)>) {
    for tree in tokens {
        match tree {
            TokenTree::Group(group) => {
                let delimited = group.delimiter() != Delimiter::None;
                if delimited {
                    let open = group.span_open();
                    ranges.push((text.start(open), text.end(open)));
                }
                token_ranges(text, group.stream(), ranges);
                if delimited {
                    let close = group.span_close();
                    ranges.push((text.start(close), text.end(close)));
                }
            }
            other => {
                let span = other.span();
                ranges.push((text.start(span), text.end(span)));
            }
        }
    }
}

/// One line of a gap, with its comments already removed.
struct GapLine {
    text: String,
    had_comment: bool,
    ends_line: bool,
}

fn clean_gap(gap: &str) -> String {
    if !gap.contains("//") && !gap.contains("/*") {
        return gap.to_string();
    }

    let mut lines = Vec::new();
    let mut current = GapLine::empty();
    let mut rest = gap;
    while let Some(c) = rest.chars().next() {
        if rest.starts_with("//") {
            let end = rest.find('\n').unwrap_or(rest.len());
            current.had_comment = true;
            rest = &rest[end..];
        } else if rest.starts_with("/*") {
            let end = block_comment_len(rest);
            current.had_comment = true;
            // Line breaks inside a block comment still end lines.
            for _ in rest[..end].matches('\n') {
                current.ends_line = true;
                lines.push(std::mem::replace(&mut current, GapLine::commented()));
            }
            rest = &rest[end..];
        } else {
            rest = &rest[c.len_utf8()..];
            if c == '\n' {
                current.ends_line = true;
                lines.push(std::mem::replace(&mut current, GapLine::empty()));
            } else {
                current.text.push(c);
            }
        }
    }
    lines.push(current);

    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        let begins_line = i > 0;
        if !line.had_comment {
            out.push_str(&line.text);
        } else if line.ends_line {
            let body = line.text.trim_end();
            if begins_line && body.is_empty() {
                continue;
            }
            out.push_str(body);
        } else {
            out.push_str(&line.text);
        }
        if line.ends_line {
            out.push('\n');
        }
    }

    // Tokens separated by nothing but a comment must stay separate.
    if out.is_empty() {
        out.push(' ');
    }
    out
}

impl GapLine {
    fn empty() -> Self {
        Self {
            text: String::new(),
            had_comment: false,
            ends_line: false,
        }
    }

    fn commented() -> Self {
        Self {
            had_comment: true,
            ..Self::empty()
        }
    }
}

/// Length of the block comment at the start of `text`, honouring nesting.
fn block_comment_len(text: &str) -> usize {
    let mut depth = 0usize;
    let mut i = 0;
    let bytes = text.as_bytes();
    while i < bytes.len() {
        if bytes[i..].starts_with(b"/*") {
            depth += 1;
            i += 2;
        } else if bytes[i..].starts_with(b"*/") {
            depth -= 1;
            i += 2;
            if depth == 0 {
                return i;
            }
        } else {
            i += 1;
        }
    }
    text.len()
}
