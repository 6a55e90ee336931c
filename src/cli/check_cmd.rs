//! Document structure commands (check, hook)

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::app::EXIT_BLOCKED;
use super::output::Output;
use crate::document::{check_document, read_file, DocumentKind, FormatReport, Source};

/// Only paths containing this marker are checked by the hook
const HOOK_PATH_MARKER: &str = "openspec";

/// Tool event delivered to the hook on stdin
#[derive(Debug, Default, Deserialize)]
struct HookEvent {
    #[serde(default)]
    tool_input: HookToolInput,
}

#[derive(Debug, Default, Deserialize)]
struct HookToolInput {
    file_path: Option<String>,
}

/// Checks one planning document
pub fn check(output: &Output, file: &Path) -> Result<ExitCode> {
    let content = read_file(file).context("Failed to read document")?;
    let kind = DocumentKind::from_path(file);
    output.verbose_ctx("check", &format!("{} is a {:?} document", file.display(), kind));

    let report = check_document(kind, &content);
    Ok(print_report(output, file, kind, &report))
}

/// Hook entry point
///
/// Anything that is not a checkable openspec document passes silently.
pub fn hook(output: &Output) -> Result<ExitCode> {
    let input = Source::Stdin.read()?;

    let event: HookEvent = match serde_json::from_str(&input) {
        Ok(event) => event,
        Err(e) => {
            output.verbose_ctx("hook", &format!("Ignoring non-JSON input: {}", e));
            return Ok(ExitCode::SUCCESS);
        }
    };

    let Some(file_path) = event.tool_input.file_path.filter(|p| !p.is_empty()) else {
        output.verbose_ctx("hook", "No file_path in event");
        return Ok(ExitCode::SUCCESS);
    };

    let path = PathBuf::from(&file_path);
    if !file_path.contains(HOOK_PATH_MARKER) || !path.exists() {
        output.verbose_ctx("hook", &format!("Skipping {}", file_path));
        return Ok(ExitCode::SUCCESS);
    }

    let content = read_file(&path).context("Failed to read document")?;
    let kind = DocumentKind::from_path(&path);
    output.verbose_ctx("hook", &format!("{} is a {:?} document", file_path, kind));

    let report = check_document(kind, &content);
    Ok(print_report(output, &path, kind, &report))
}

fn print_report(output: &Output, path: &Path, kind: DocumentKind, report: &FormatReport) -> ExitCode {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let code = if report.is_blocking() {
        ExitCode::from(EXIT_BLOCKED)
    } else {
        ExitCode::SUCCESS
    };

    if output.is_json() {
        output.data(&serde_json::json!({
            "file": name,
            "kind": kind,
            "valid": !report.is_blocking(),
            "errors": report.errors,
            "suggestions": report.suggestions,
        }));
        return code;
    }

    if kind == DocumentKind::Design {
        output.list(&format!("💡 Suggestions for {}:", name), &report.suggestions);
        return code;
    }

    if report.is_blocking() {
        output.problems(&format!("❌ Spec format issues in {}:", name), &report.errors);
    } else {
        println!("✅ {} format valid", name);
    }

    code
}
