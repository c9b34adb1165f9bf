use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Result;
use colored::Colorize;
use rayon::prelude::*;
use showcall_template::build_template_from_source;

use super::{CallIssue, CheckSummary, CommandResult, CommandSummary};
use crate::{
    cli::args::CheckCommand,
    config::{CONFIG_FILE_NAME, ConfigLoadResult, load_config},
    scanner::{CallFinder, scan_files},
};

pub fn check(cmd: CheckCommand) -> Result<CommandResult> {
    let CheckCommand {
        path,
        names,
        ignores,
        verbose,
    } = cmd;
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let config_dir = if path.is_dir() {
        path.clone()
    } else {
        path.parent().map(Path::to_path_buf).unwrap_or_default()
    };
    let ConfigLoadResult {
        mut config,
        from_file,
    } = load_config(&config_dir)?;
    if verbose && from_file {
        eprintln!("{} using {}", "note:".bold(), CONFIG_FILE_NAME);
    }
    config.extend(names, ignores);
    config.validate()?;

    let scan = scan_files(&path, &config.ignores, verbose);
    let finder = CallFinder::new(&config.names)?;

    // Each file is parsed on its own thread; nothing is shared but the finder.
    let checked: Vec<Option<FileCheck>> = scan
        .files
        .par_iter()
        .map(|file| check_file(file, &finder, verbose))
        .collect();

    let mut summary = CheckSummary {
        files_checked: 0,
        calls_checked: 0,
        skipped_count: scan.skipped_count,
    };
    let mut issues = Vec::new();
    for file in checked {
        match file {
            Some(file) => {
                summary.files_checked += 1;
                summary.calls_checked += file.calls;
                issues.extend(file.issues);
            }
            None => summary.skipped_count += 1,
        }
    }
    issues.sort();

    Ok(CommandResult {
        summary: CommandSummary::Check(summary),
        issues,
    })
}

struct FileCheck {
    calls: usize,
    issues: Vec<CallIssue>,
}

fn check_file(file: &Path, finder: &CallFinder, verbose: bool) -> Option<FileCheck> {
    let source = match fs::read_to_string(file) {
        Ok(source) => source,
        Err(e) => {
            if verbose {
                eprintln!(
                    "{} Cannot read {}: {}",
                    "warning:".bold().yellow(),
                    file.display(),
                    e
                );
            }
            return None;
        }
    };

    let path = display_path(file);
    let candidates = finder.find(&source);
    let issues = candidates
        .iter()
        .filter_map(|call| {
            build_template_from_source(&source, &path, call.line, &call.name)
                .err()
                .map(|err| CallIssue::new(&path, &source, call.line, call.col, &err))
        })
        .collect();

    Some(FileCheck {
        calls: candidates.len(),
        issues,
    })
}

/// The path as the user wrote it, without a leading `./`.
fn display_path(file: &Path) -> PathBuf {
    file.strip_prefix(".").unwrap_or(file).to_path_buf()
}
