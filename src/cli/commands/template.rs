use std::fs;

use anyhow::{Context, Result};
use showcall_template::build_template_from_source;

use super::{CallIssue, CommandResult, CommandSummary};
use crate::cli::args::{TemplateCommand, TemplateFormat};

pub fn template(cmd: TemplateCommand) -> Result<CommandResult> {
    let TemplateCommand {
        file,
        line,
        name,
        format,
    } = cmd;
    let source = fs::read_to_string(&file)
        .with_context(|| format!("Failed to read source file: {}", file.display()))?;

    match build_template_from_source(&source, &file, line, &name) {
        Ok(template) => {
            let output = match format {
                TemplateFormat::Text => template.to_string(),
                TemplateFormat::Json => serde_json::to_string_pretty(&template)
                    .context("Failed to serialize template")?,
            };
            Ok(CommandResult {
                summary: CommandSummary::Template(Some(output)),
                issues: Vec::new(),
            })
        }
        Err(err) => {
            let col = source
                .lines()
                .nth(line.saturating_sub(1))
                .and_then(|text| text.find(name.as_str()).map(|at| text[..at].chars().count() + 1))
                .unwrap_or(1);
            Ok(CommandResult {
                summary: CommandSummary::Template(None),
                issues: vec![CallIssue::new(&file, &source, line, col, &err)],
            })
        }
    }
}
