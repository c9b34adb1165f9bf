//! Template construction from the source of a reporting call.

use std::path::Path;

use proc_macro2::Span;
use syn::{Expr, Ident, spanned::Spanned};

use crate::{
    collect::{SlotSink, collect_arguments},
    comments::strip_comments,
    error::{Error, Result},
    locate::{expect_call, locate_call, parse_incrementally, read_source},
    normalize::normalize,
    position::SourceText,
    segment::{Segment, Template},
};

/// Build the template for the call to `name` on `line` of the file at `path`.
pub fn build_template(path: &Path, line: usize, name: &str) -> Result<Template> {
    let source = read_source(path)?;
    build_template_from_source(&source, path, line, name)
}

/// Build the template for the call to `name` on `line` of `source`.
///
/// `path` is only used in error messages.
pub fn build_template_from_source(
    source: &str,
    path: &Path,
    line: usize,
    name: &str,
) -> Result<Template> {
    let start = locate_call(source, line, name, path)?;
    let parsed = parse_incrementally(source, &start, line, name, path)?;

    let code = strip_comments(&parsed.code);
    let expr = syn::parse_str::<Expr>(&code).map_err(|_| Error::Unparsable {
        name: name.to_string(),
        line,
        path: path.to_path_buf(),
    })?;
    let call = expect_call(expr, line, name, path)?;

    let text = SourceText::new(&code);
    let mut builder = TemplateBuilder {
        text: &text,
        segments: Vec::new(),
        cursor: 0,
    };
    collect_arguments(&call.args, &mut builder);
    builder.copy_to_end(call.span());

    let mut segments = builder.segments;
    blank_prefix(&mut segments, &start.prefix);
    drop_closing_paren(&mut segments);
    Ok(Template::new(normalize(segments)))
}

/// Lays out verbatim text between the slots the walk reports.
struct TemplateBuilder<'a> {
    text: &'a SourceText<'a>,
    segments: Vec<Segment>,
    /// Byte offset up to which source text has been copied or skipped.
    cursor: usize,
}

impl TemplateBuilder<'_> {
    fn copy(&mut self, to: usize) {
        if to > self.cursor {
            let text = &self.text.code()[self.cursor..to];
            self.segments.push(Segment::verbatim(text));
            self.cursor = to;
        }
    }

    fn skip(&mut self, to: usize) {
        self.cursor = self.cursor.max(to);
    }
}

impl<'ast> SlotSink<'ast> for TemplateBuilder<'_> {
    fn copy_to_start(&mut self, span: Span) {
        self.copy(self.text.start(span));
    }

    fn copy_to_end(&mut self, span: Span) {
        self.copy(self.text.end(span));
    }

    fn evaluate(&mut self, expr: &'ast Expr, key: String) {
        self.segments.push(Segment::Evaluate {
            source: self.text.slice(expr.span()).to_string(),
            key,
        });
    }

    fn positional(&mut self, index: usize, _expr: &'ast Expr) {
        self.segments.push(Segment::Positional { index });
    }

    fn keyword(&mut self, name: &'ast Ident, value: &'ast Expr) {
        let name = name.to_string();
        self.segments.push(Segment::verbatim(name.as_str()));
        self.skip(self.text.end(value.span()));
        self.segments.push(Segment::Keyword { name });
    }
}

/// Replace the call's own `name(` prefix with padding of the same width.
fn blank_prefix(segments: &mut [Segment], prefix: &str) {
    if let Some(Segment::Verbatim { text }) = segments.first_mut()
        && let Some(rest) = text.get(prefix.len()..)
    {
        *text = " ".repeat(prefix.chars().count()) + rest;
    }
}

/// Drop the call's closing parenthesis from the last segment.
fn drop_closing_paren(segments: &mut [Segment]) {
    if let Some(Segment::Verbatim { text }) = segments.last_mut()
        && text.ends_with(')')
    {
        text.pop();
    }
}
