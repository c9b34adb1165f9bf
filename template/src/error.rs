use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while building or rendering a call template.
///
/// None of these are recoverable: a report cannot be produced without its own
/// source, so every variant propagates to the caller of the reporting macro.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read source file {}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not find call to {name} on line {line} in {}", path.display())]
    CallNotFound {
        name: String,
        line: usize,
        path: PathBuf,
    },

    #[error("call to {name} on line {line} in {} never parses as a complete expression", path.display())]
    Unparsable {
        name: String,
        line: usize,
        path: PathBuf,
    },

    #[error("source on line {line} in {} is not a single call to {name}", path.display())]
    StructuralMismatch {
        name: String,
        line: usize,
        path: PathBuf,
    },

    #[error("failed to evaluate `{snippet}`: no value was captured for it at the call site")]
    Evaluation { snippet: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
