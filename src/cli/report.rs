//! Report formatting and printing utilities.
//!
//! Failures are displayed cargo-style: message, clickable location, and the
//! source line with a caret under the macro name.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{CallIssue, CheckSummary, CommandResult, CommandSummary};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print a command result: template output and summaries to stdout, warnings
/// to stderr.
pub fn print(result: &CommandResult, verbose: bool) {
    print_to(result, &mut io::stdout().lock());
    if let CommandSummary::Check(summary) = &result.summary {
        print_skipped_warning_to(summary.skipped_count, verbose, &mut io::stderr().lock());
    }
}

pub fn print_to<W: Write>(result: &CommandResult, writer: &mut W) {
    if let CommandSummary::Template(Some(output)) = &result.summary {
        let _ = writeln!(writer, "{}", output.trim_end());
    }

    report_to(&result.issues, writer);

    if let CommandSummary::Check(summary) = &result.summary
        && result.issues.is_empty()
    {
        print_success_to(summary, writer);
    }
}

/// Print issues followed by a one-line summary.
pub fn report_to<W: Write>(issues: &[CallIssue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let max_line_width = calculate_max_line_width(issues);
    for issue in issues {
        print_issue(issue, writer, max_line_width);
    }

    let _ = writeln!(
        writer,
        "{} {}",
        FAILURE_MARK.red(),
        format!(
            "{} reporting {} could not be templated",
            issues.len(),
            if issues.len() == 1 { "call" } else { "calls" }
        )
        .red()
    );
}

pub fn print_success_to<W: Write>(summary: &CheckSummary, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Checked {} reporting {} in {} {} - no issues found",
            summary.calls_checked,
            if summary.calls_checked == 1 { "call" } else { "calls" },
            summary.files_checked,
            if summary.files_checked == 1 { "file" } else { "files" }
        )
        .green()
    );
}

/// Print a warning about paths that could not be read.
pub fn print_skipped_warning_to<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} path(s) could not be read (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}

fn calculate_max_line_width(issues: &[CallIssue]) -> usize {
    issues
        .iter()
        .map(|issue| issue.line.to_string().len())
        .max()
        .unwrap_or(1)
}

fn print_issue<W: Write>(issue: &CallIssue, writer: &mut W, max_line_width: usize) {
    let _ = writeln!(writer, "{}: {}", "error".bold().red(), issue.message.bold());
    let _ = writeln!(
        writer,
        "{:>width$}{} {}:{}:{}",
        "",
        "-->".blue(),
        issue.path,
        issue.line,
        issue.col,
        width = max_line_width
    );

    let Some(source_line) = &issue.source_line else {
        return;
    };
    let _ = writeln!(
        writer,
        "{:>width$} {}",
        "",
        "|".blue(),
        width = max_line_width
    );
    let _ = writeln!(
        writer,
        "{:>width$} {} {}",
        issue.line.to_string().blue(),
        "|".blue(),
        source_line,
        width = max_line_width
    );

    // Caret under the macro name (col is 1-based)
    let prefix: String = source_line.chars().take(issue.col.saturating_sub(1)).collect();
    let caret_padding = UnicodeWidthStr::width(prefix.as_str());
    let _ = writeln!(
        writer,
        "{:>width$} {} {:>padding$}{}",
        "",
        "|".blue(),
        "",
        "^".red(),
        width = max_line_width,
        padding = caret_padding
    );
    let _ = writeln!(writer);
}
