//! Infer command, plus document loading shared with the graph commands

use std::process::ExitCode;

use anyhow::{Context, Result};

use super::app::{InferenceArgs, EXIT_BLOCKED};
use super::output::Output;
use crate::document::{parse_document, parse_json_document, Source};
use crate::domain::ParseResult;
use crate::inference::{InferenceEngine, InferenceResult};

/// Reads tasks from a checklist or task JSON
///
/// Returns `None` after reporting parse errors; such documents never reach
/// inference.
pub(super) fn load_tasks(output: &Output, args: &InferenceArgs) -> Result<Option<ParseResult>> {
    let source = Source::from_arg(&args.file);
    output.verbose_ctx("load", &format!("Reading {}", source.label()));

    let content = source
        .read()
        .with_context(|| format!("Failed to read task document: {}", source.label()))?;

    if args.json_input || source.is_json() {
        output.verbose_ctx("load", "Decoding task JSON");
        let parsed = parse_json_document(&content, &source.label())?;
        output.verbose_ctx(
            "load",
            &format!("Loaded {} sections, {} tasks", parsed.sections.len(), parsed.task_count()),
        );
        return Ok(Some(parsed));
    }

    let parsed = parse_document(&content);
    output.verbose_ctx(
        "load",
        &format!("Parsed {} sections, {} tasks", parsed.sections.len(), parsed.task_count()),
    );

    if !parsed.is_ok() {
        output.problems("❌ Parsing errors:", &parsed.errors);
        return Ok(None);
    }

    Ok(Some(parsed))
}

/// Runs the engine, logging each strategy's candidate count
pub(super) fn run_inference(output: &Output, parsed: &ParseResult, threshold: u8) -> InferenceResult {
    let engine = InferenceEngine::new(threshold);
    let outputs = engine.candidates(parsed);

    for candidate in &outputs {
        output.verbose_ctx(
            "infer",
            &format!("{}: {} candidate edges", candidate.strategy, candidate.edges.len()),
        );
    }

    let result = engine.resolve(outputs);
    output.verbose_ctx(
        "infer",
        &format!("{} edges after merge (threshold {})", result.len(), engine.threshold()),
    );
    result
}

/// Infers dependencies and prints the split result
pub fn run(output: &Output, args: &InferenceArgs, threshold: u8) -> Result<ExitCode> {
    let Some(parsed) = load_tasks(output, args)? else {
        return Ok(ExitCode::from(EXIT_BLOCKED));
    };

    let result = run_inference(output, &parsed, threshold);

    output.status(&format!(
        "✓ Inferred {} high-confidence dependencies",
        result.auto_apply.len()
    ));
    output.status(&format!("⚠ {} dependencies need review", result.pending_review.len()));
    output.data(&result);

    Ok(ExitCode::SUCCESS)
}
