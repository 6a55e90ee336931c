//! Parse command

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};

use super::app::EXIT_BLOCKED;
use super::output::Output;
use crate::document::{parse_document, to_json_document, Source};

/// Parses a checklist and prints the task document
pub fn run(output: &Output, file: &Path) -> Result<ExitCode> {
    let source = Source::from_arg(file);
    output.verbose_ctx("parse", &format!("Reading {}", source.label()));

    let content = source
        .read()
        .with_context(|| format!("Failed to read task document: {}", source.label()))?;
    let result = parse_document(&content);

    output.verbose_ctx(
        "parse",
        &format!(
            "Parsed {} sections, {} tasks, {} errors, {} warnings",
            result.sections.len(),
            result.task_count(),
            result.errors.len(),
            result.warnings.len()
        ),
    );

    if output.is_json() {
        output.data(&result);
        return Ok(exit_for(result.is_ok()));
    }

    if !result.is_ok() {
        output.problems("❌ Parsing errors:", &result.errors);
        return Ok(ExitCode::from(EXIT_BLOCKED));
    }

    output.list("Warnings:", &result.warnings);
    output.status(&format!(
        "Parsed {} sections, {} tasks",
        result.sections.len(),
        result.task_count()
    ));
    output.data(&to_json_document(&result));

    Ok(ExitCode::SUCCESS)
}

fn exit_for(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_BLOCKED)
    }
}
