pub mod check;
pub mod template;

use std::path::Path;

use showcall_template::Error;

use super::exit_status::ExitStatus;

/// A reporting call whose template could not be built.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CallIssue {
    pub path: String,
    pub line: usize,
    /// 1-based column of the macro name.
    pub col: usize,
    pub source_line: Option<String>,
    pub message: String,
}

impl CallIssue {
    pub fn new(path: &Path, source: &str, line: usize, col: usize, err: &Error) -> Self {
        Self {
            path: path.display().to_string(),
            line,
            col,
            source_line: source.lines().nth(line.saturating_sub(1)).map(str::to_string),
            message: err.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct CheckSummary {
    pub files_checked: usize,
    pub calls_checked: usize,
    /// Paths that could not be walked or read.
    pub skipped_count: usize,
}

#[derive(Debug)]
pub enum CommandSummary {
    Check(CheckSummary),
    /// The printed template, absent when it could not be built.
    Template(Option<String>),
}

/// Result of running a showcall command.
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    pub issues: Vec<CallIssue>,
}

impl CommandResult {
    pub fn exit_status(&self) -> ExitStatus {
        if self.issues.is_empty() {
            ExitStatus::Success
        } else {
            ExitStatus::Failure
        }
    }
}
