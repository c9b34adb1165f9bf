//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `check`: Build the template of every reporting call under a path
//! - `template`: Print the template of one reporting call

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Check(cmd)) => cmd.verbose,
            Some(Command::Template(_)) | None => false,
        }
    }
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Directory or file to check
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Reporting macro name to look for, in addition to the configured ones
    /// Can be specified multiple times: --name trace --name dump
    #[arg(long = "name", value_name = "NAME")]
    pub names: Vec<String>,

    /// Path or glob to skip, in addition to the configured ones
    #[arg(long = "ignore", value_name = "GLOB")]
    pub ignores: Vec<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TemplateFormat {
    /// One segment per line
    #[default]
    Text,
    /// The segments as a JSON array
    Json,
}

#[derive(Debug, Args)]
pub struct TemplateCommand {
    /// Source file containing the call
    pub file: PathBuf,

    /// 1-based line the macro name is on
    pub line: usize,

    /// Reporting macro name
    #[arg(long, default_value = "show")]
    pub name: String,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: TemplateFormat,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that every reporting call can be located and parsed
    Check(CheckCommand),
    /// Print the template built for one reporting call
    Template(TemplateCommand),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        Arguments::command().debug_assert();
    }

    #[test]
    fn parse_check_flags() {
        let args = Arguments::parse_from([
            "showcall", "check", "src", "--name", "trace", "--ignore", "**/gen/**", "-v",
        ]);
        let Some(Command::Check(cmd)) = args.command else {
            panic!("expected check command");
        };
        assert_eq!(cmd.path, PathBuf::from("src"));
        assert_eq!(cmd.names, vec!["trace"]);
        assert_eq!(cmd.ignores, vec!["**/gen/**"]);
        assert!(cmd.verbose);
    }

    #[test]
    fn parse_template_defaults() {
        let args = Arguments::parse_from(["showcall", "template", "src/main.rs", "12"]);
        let Some(Command::Template(cmd)) = args.command else {
            panic!("expected template command");
        };
        assert_eq!(cmd.line, 12);
        assert_eq!(cmd.name, "show");
        assert_eq!(cmd.format, TemplateFormat::Text);
    }
}
