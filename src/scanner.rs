use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use glob::Pattern;
use regex::Regex;
use walkdir::WalkDir;

use crate::config::SKIPPED_DIRS;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning files.
pub struct ScanResult {
    /// Rust source files, sorted.
    pub files: Vec<PathBuf>,
    pub skipped_count: usize,
}

/// Collect the `.rs` files under `root`, which may also be a single file.
pub fn scan_files(root: &Path, ignore_patterns: &[String], verbose: bool) -> ScanResult {
    let mut files = Vec::new();
    let mut skipped_count = 0;

    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();
    for p in ignore_patterns {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => {
                    if verbose {
                        eprintln!(
                            "{} Invalid ignore pattern '{}': {}",
                            "warning:".bold().yellow(),
                            p,
                            e
                        );
                    }
                }
            }
        } else {
            literal_ignore_paths.push(root.join(p));
        }
    }

    let walker = WalkDir::new(root).sort_by_file_name().into_iter().filter_entry(|entry| {
        entry.depth() == 0
            || !(entry.file_type().is_dir()
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| SKIPPED_DIRS.contains(&name)))
    });

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                skipped_count += 1;
                if verbose {
                    eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                }
                continue;
            }
        };
        let path = entry.path();
        let path_str = path.to_string_lossy();

        if literal_ignore_paths
            .iter()
            .any(|ignore_path| path.starts_with(ignore_path))
        {
            continue;
        }

        if glob_patterns.iter().any(|p| p.matches(&path_str)) {
            continue;
        }

        if entry.file_type().is_file() && is_rust_file(path) {
            files.push(path.to_path_buf());
        }
    }

    ScanResult {
        files,
        skipped_count,
    }
}

fn is_rust_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("rs")
}

/// A line that looks like it invokes a reporting macro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallCandidate {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column of the macro name, in characters.
    pub col: usize,
    pub name: String,
}

/// Finds reporting macro invocations by name, line by line.
pub struct CallFinder {
    pattern: Regex,
}

impl CallFinder {
    pub fn new(names: &[String]) -> Result<Self> {
        let alternatives = names
            .iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"\b({})\s*!\s*\(", alternatives))
            .context("Failed to build call pattern")?;
        Ok(Self { pattern })
    }

    /// Every invocation in `source`, skipping line comments. Only the first
    /// invocation of each name on a line is reported, since that is the one
    /// the runtime locates.
    pub fn find(&self, source: &str) -> Vec<CallCandidate> {
        let mut candidates = Vec::new();
        for (index, line_text) in source.lines().enumerate() {
            if line_text.trim_start().starts_with("//") {
                continue;
            }
            let mut names_on_line: Vec<&str> = Vec::new();
            for captures in self.pattern.captures_iter(line_text) {
                let Some(name) = captures.get(1) else {
                    continue;
                };
                if names_on_line.contains(&name.as_str()) {
                    continue;
                }
                names_on_line.push(name.as_str());
                candidates.push(CallCandidate {
                    line: index + 1,
                    col: line_text[..name.start()].chars().count() + 1,
                    name: name.as_str().to_string(),
                });
            }
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn names() -> Vec<String> {
        vec!["show".to_string(), "show_report".to_string()]
    }

    #[test]
    fn test_scan_rust_files() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("main.rs")).unwrap();
        File::create(dir.path().join("Cargo.toml")).unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        File::create(dir.path().join("src/lib.rs")).unwrap();

        let result = scan_files(dir.path(), &[], false);

        assert_eq!(
            result.files,
            vec![dir.path().join("main.rs"), dir.path().join("src/lib.rs")]
        );
        assert_eq!(result.skipped_count, 0);
    }

    #[test]
    fn test_scan_skips_target() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("target/debug/build")).unwrap();
        File::create(dir.path().join("target/debug/build/out.rs")).unwrap();
        File::create(dir.path().join("lib.rs")).unwrap();

        let result = scan_files(dir.path(), &[], false);

        assert_eq!(result.files, vec![dir.path().join("lib.rs")]);
    }

    #[test]
    fn test_scan_ignores() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("tests/fixtures")).unwrap();
        fs::create_dir_all(dir.path().join("vendor")).unwrap();
        File::create(dir.path().join("tests/fixtures/bad.rs")).unwrap();
        File::create(dir.path().join("vendor/dep.rs")).unwrap();
        File::create(dir.path().join("lib.rs")).unwrap();

        let ignores = vec!["**/fixtures/**".to_string(), "vendor".to_string()];
        let result = scan_files(dir.path(), &ignores, false);

        assert_eq!(result.files, vec![dir.path().join("lib.rs")]);
    }

    #[test]
    fn test_scan_single_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("main.rs");
        File::create(&file).unwrap();

        let result = scan_files(&file, &[], false);

        assert_eq!(result.files, vec![file]);
    }

    #[test]
    fn test_find_calls() {
        let finder = CallFinder::new(&names()).unwrap();
        let source = "fn main() {\n    show!(x);\n    let r = show_report! (y);\n}\n";
        assert_eq!(
            finder.find(source),
            vec![
                CallCandidate {
                    line: 2,
                    col: 5,
                    name: "show".to_string()
                },
                CallCandidate {
                    line: 3,
                    col: 13,
                    name: "show_report".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_find_skips_comments_and_other_macros() {
        let finder = CallFinder::new(&names()).unwrap();
        let source = "// show!(x)\nreshow!(x);\nshow(x);\nshow!(a); show!(b);\n";
        assert_eq!(
            finder.find(source),
            vec![CallCandidate {
                line: 4,
                col: 1,
                name: "show".to_string()
            }]
        );
    }
}
