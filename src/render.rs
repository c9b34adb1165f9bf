//! Rendering a cached template with the values of one invocation.

use std::fmt;

use colored::Colorize;
use showcall_template::{Error, Result, Segment, Template};

use crate::{cache::Cache, site::CallSite};

/// Formatted values supplied by one invocation of a reporting macro.
#[derive(Debug, Clone, Copy)]
pub struct Arguments<'a> {
    positional: &'a [String],
    keywords: &'a [(&'static str, String)],
    /// Values of captured sub-expressions, by canonical key.
    bindings: &'a [(&'static str, String)],
}

impl<'a> Arguments<'a> {
    pub fn new(
        positional: &'a [String],
        keywords: &'a [(&'static str, String)],
        bindings: &'a [(&'static str, String)],
    ) -> Self {
        Self {
            positional,
            keywords,
            bindings,
        }
    }

    pub fn positional(&self, index: usize) -> Option<&'a str> {
        self.positional.get(index).map(String::as_str)
    }

    pub fn keyword(&self, name: &str) -> Option<&'a str> {
        lookup(self.keywords, name)
    }

    pub fn binding(&self, key: &str) -> Option<&'a str> {
        lookup(self.bindings, key)
    }
}

fn lookup<'a>(pairs: &'a [(&'static str, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, value)| value.as_str())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text(String),
    Value(String),
}

/// The rendered body of a report: source text with values after each slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    parts: Vec<Part>,
}

impl Body {
    /// The body without colors.
    pub fn plain(&self) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                Part::Text(text) => text.clone(),
                Part::Value(value) => format!(" = {}", value),
            })
            .collect()
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            match part {
                Part::Text(text) => f.write_str(text)?,
                Part::Value(value) => write!(f, "{}{}", " = ".dimmed(), value.bold().yellow())?,
            }
        }
        Ok(())
    }
}

/// Resolve every slot of `template` against `arguments`.
pub fn render(template: &Template, arguments: &Arguments<'_>) -> Result<Body> {
    let parts = template
        .segments()
        .iter()
        .map(|segment| match segment {
            Segment::Verbatim { text } => Ok(Part::Text(text.clone())),
            Segment::Evaluate { source, key } => value(arguments.binding(key), source),
            Segment::Positional { index } => {
                value(arguments.positional(*index), &format!("argument {}", index))
            }
            Segment::Keyword { name } => value(arguments.keyword(name), name),
        })
        .collect::<Result<_>>()?;
    Ok(Body { parts })
}

fn value(found: Option<&str>, snippet: &str) -> Result<Part> {
    found
        .map(|value| Part::Value(value.to_string()))
        .ok_or_else(|| Error::Evaluation {
            snippet: snippet.to_string(),
        })
}

/// A report ready to print: a header naming the call site and, when the call
/// has arguments, the annotated body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    site: CallSite,
    body: Option<Body>,
}

impl Report {
    pub fn new(site: CallSite, body: Option<Body>) -> Self {
        Self { site, body }
    }

    pub fn site(&self) -> &CallSite {
        &self.site
    }

    /// `<file>[<function>:<line>]:` without colors.
    pub fn header(&self) -> String {
        self.site.header()
    }

    /// The body without colors, if the call has arguments.
    pub fn body(&self) -> Option<String> {
        self.body.as_ref().map(Body::plain)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}:{}{}",
            self.site.file.cyan(),
            "[".cyan(),
            self.site.function.yellow(),
            self.site.line.to_string().yellow(),
            "]:".cyan()
        )?;
        if let Some(body) = &self.body {
            write!(f, "\n{}", body)?;
        }
        Ok(())
    }
}

/// Build the report of `site` through the process-wide template cache.
pub fn report(site: &CallSite, arguments: &Arguments<'_>) -> Result<Report> {
    Cache::global().report(site, arguments)
}

/// Print a report to stdout. Failures are fatal.
pub fn print(report: Result<Report>) {
    match report {
        Ok(report) => println!("{}", report),
        Err(err) => panic!("showcall: {}", err),
    }
}

/// Print a report to stdout, returning any failure.
pub fn try_print(report: Result<Report>) -> Result<()> {
    println!("{}", report?);
    Ok(())
}
