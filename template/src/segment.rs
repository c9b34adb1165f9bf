//! Template data model.
//!
//! A [`Template`] is the cached layout of one call site: literal source text
//! interleaved with slots that are filled in on every invocation.

use std::fmt;

use serde::Serialize;

/// One atomic piece of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Segment {
    /// Literal text. Holds at most one line break, and only as its last character.
    Verbatim { text: String },
    /// A sub-expression that is evaluated again at render time.
    ///
    /// `key` is the canonical token text of `source`, used to find the value
    /// captured for it at the call site.
    Evaluate { source: String, key: String },
    /// The i-th positional argument of the reporting call, taken by value.
    Positional { index: usize },
    /// A named argument of the reporting call, labelled by its name only.
    Keyword { name: String },
}

impl Segment {
    pub fn verbatim(text: impl Into<String>) -> Self {
        Self::Verbatim { text: text.into() }
    }

    /// Returns the text of a verbatim segment.
    pub fn as_verbatim(&self) -> Option<&str> {
        match self {
            Self::Verbatim { text } => Some(text),
            _ => None,
        }
    }

    /// True for segments that are resolved at render time.
    pub fn is_slot(&self) -> bool {
        !matches!(self, Self::Verbatim { .. })
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verbatim { text } => write!(f, "verbatim {:?}", text),
            Self::Evaluate { source, .. } => write!(f, "evaluate {}", source),
            Self::Positional { index } => write!(f, "positional {}", index),
            Self::Keyword { name } => write!(f, "keyword {}", name),
        }
    }
}

/// The annotated layout of one call site. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// A call without arguments yields an empty template.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn slots(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|segment| segment.is_slot())
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            writeln!(f, "{}", segment)?;
        }
        Ok(())
    }
}
