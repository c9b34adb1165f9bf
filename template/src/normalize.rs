//! Whitespace normalization of a freshly walked template.

use crate::segment::Segment;

/// Normalize layout so the call renders flush-left with no blank edges.
///
/// Verbatim runs are merged and re-split so each holds at most one line
/// break, at its end. Blank leading and trailing segments go, the last line
/// loses trailing whitespace, and the indentation common to every line is
/// removed.
pub fn normalize(segments: Vec<Segment>) -> Vec<Segment> {
    let mut segments = split_lines(segments);
    trim_blank_edges(&mut segments);
    trim_trailing_whitespace(&mut segments);
    dedent(&mut segments);
    segments
}

fn split_lines(segments: Vec<Segment>) -> Vec<Segment> {
    let mut out = Vec::with_capacity(segments.len());
    let mut pending = String::new();
    for segment in segments {
        match segment {
            Segment::Verbatim { text } => pending.push_str(&text),
            slot => {
                push_lines(&mut out, &std::mem::take(&mut pending));
                out.push(slot);
            }
        }
    }
    push_lines(&mut out, &pending);
    out
}

fn push_lines(out: &mut Vec<Segment>, text: &str) {
    let mut rest = text;
    while let Some(i) = rest.find('\n') {
        out.push(Segment::verbatim(&rest[..=i]));
        rest = &rest[i + 1..];
    }
    if !rest.is_empty() {
        out.push(Segment::verbatim(rest));
    }
}

fn is_blank(segment: &Segment) -> bool {
    segment
        .as_verbatim()
        .is_some_and(|text| text.chars().all(char::is_whitespace))
}

fn trim_blank_edges(segments: &mut Vec<Segment>) {
    let leading = segments.iter().take_while(|s| is_blank(s)).count();
    segments.drain(..leading);
    while segments.last().is_some_and(is_blank) {
        segments.pop();
    }
}

fn trim_trailing_whitespace(segments: &mut [Segment]) {
    if let Some(Segment::Verbatim { text }) = segments.last_mut() {
        text.truncate(text.trim_end().len());
    }
}

/// Width of the leading whitespace of a line, or `None` for a blank line.
fn indentation(line: &str) -> Option<usize> {
    let content = line.trim_end_matches('\n');
    let width = content.chars().take_while(|c| c.is_whitespace()).count();
    (width < content.chars().count()).then_some(width)
}

fn dedent(segments: &mut [Segment]) {
    let mut indent = None::<usize>;
    let mut at_line_start = true;
    for segment in segments.iter() {
        let Some(text) = segment.as_verbatim() else {
            continue;
        };
        if at_line_start && let Some(width) = indentation(text) {
            indent = Some(indent.map_or(width, |indent| indent.min(width)));
        }
        at_line_start = text.ends_with('\n');
    }

    let Some(indent) = indent.filter(|&indent| indent > 0) else {
        return;
    };
    let mut at_line_start = true;
    for segment in segments.iter_mut() {
        let Segment::Verbatim { text } = segment else {
            continue;
        };
        if at_line_start {
            let strip = text
                .char_indices()
                .take_while(|(_, c)| *c != '\n' && c.is_whitespace())
                .take(indent)
                .last()
                .map_or(0, |(i, c)| i + c.len_utf8());
            text.drain(..strip);
        }
        at_line_start = text.ends_with('\n');
    }
}
