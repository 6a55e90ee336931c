//! Graph commands (ready, blocked, order)
//!
//! These build a dependency graph from inferred edges; the checklist's
//! checkboxes decide what counts as done.

use std::collections::HashMap;
use std::process::ExitCode;

use anyhow::Result;

use super::app::{InferenceArgs, EXIT_BLOCKED};
use super::infer_cmd::{load_tasks, run_inference};
use super::output::Output;
use crate::domain::{DependencyGraph, ParseResult};

/// Tasks plus the graph built over them
struct Loaded {
    parsed: ParseResult,
    graph: DependencyGraph,
}

impl Loaded {
    fn completed(&self) -> HashMap<String, bool> {
        self.parsed
            .tasks()
            .map(|t| (t.id.clone(), t.completed))
            .collect()
    }

    fn description(&self, id: &str) -> &str {
        self.parsed
            .task(id)
            .map(|t| t.description.as_str())
            .unwrap_or_default()
    }
}

/// Parses, infers and builds the graph
///
/// Returns `None` after reporting problems. Edges that would form a cycle or
/// reference unknown tasks are reported, never dropped silently.
fn load_graph(
    output: &Output,
    args: &InferenceArgs,
    threshold: u8,
    include_pending: bool,
) -> Result<Option<Loaded>> {
    let Some(parsed) = load_tasks(output, args)? else {
        return Ok(None);
    };

    let result = run_inference(output, &parsed, threshold);

    let edges: Vec<_> = if include_pending {
        result.edges().collect()
    } else {
        result.auto_apply.iter().collect()
    };

    let (graph, errors) = DependencyGraph::build(parsed.tasks(), edges);
    let errors: Vec<String> = errors.iter().map(|e| e.to_string()).collect();

    output.verbose_ctx(
        "graph",
        &format!("{} tasks, {} edges", graph.len(), graph.edge_count()),
    );

    if !errors.is_empty() {
        output.problems("❌ Dependency graph errors:", &errors);
        return Ok(None);
    }

    Ok(Some(Loaded { parsed, graph }))
}

/// Show tasks ready to work on
pub fn ready(
    output: &Output,
    args: &InferenceArgs,
    threshold: u8,
    include_pending: bool,
) -> Result<ExitCode> {
    let Some(loaded) = load_graph(output, args, threshold, include_pending)? else {
        return Ok(ExitCode::from(EXIT_BLOCKED));
    };

    let ready = loaded.graph.ready_tasks(&loaded.completed());
    output.verbose_ctx("ready", &format!("Found {} ready tasks", ready.len()));

    if output.is_json() {
        let items: Vec<_> = ready
            .iter()
            .map(|id| {
                serde_json::json!({
                    "id": id,
                    "description": loaded.description(id),
                })
            })
            .collect();
        output.data(&items);
    } else if ready.is_empty() {
        println!("No tasks ready to work on.");
    } else {
        println!("Ready tasks ({}):", ready.len());
        println!("{:<12} DESCRIPTION", "ID");
        println!("{}", "-".repeat(60));
        for id in &ready {
            println!("{:<12} {}", id, loaded.description(id));
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Show blocked tasks
pub fn blocked(
    output: &Output,
    args: &InferenceArgs,
    threshold: u8,
    include_pending: bool,
) -> Result<ExitCode> {
    let Some(loaded) = load_graph(output, args, threshold, include_pending)? else {
        return Ok(ExitCode::from(EXIT_BLOCKED));
    };

    let blocked = loaded.graph.blocked_tasks(&loaded.completed());
    output.verbose_ctx("blocked", &format!("Found {} blocked tasks", blocked.len()));

    if output.is_json() {
        let items: Vec<_> = blocked
            .iter()
            .map(|(id, blockers)| {
                serde_json::json!({
                    "id": id,
                    "description": loaded.description(id),
                    "blocked_by": blockers,
                })
            })
            .collect();
        output.data(&items);
    } else if blocked.is_empty() {
        println!("No blocked tasks.");
    } else {
        println!("Blocked tasks ({}):", blocked.len());
        println!("{:<12} {:<40} BLOCKED BY", "ID", "DESCRIPTION");
        println!("{}", "-".repeat(80));
        for (id, blockers) in &blocked {
            println!(
                "{:<12} {:<40} {}",
                id,
                loaded.description(id),
                blockers.join(", ")
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Print tasks in dependency order
pub fn order(
    output: &Output,
    args: &InferenceArgs,
    threshold: u8,
    include_pending: bool,
) -> Result<ExitCode> {
    let Some(loaded) = load_graph(output, args, threshold, include_pending)? else {
        return Ok(ExitCode::from(EXIT_BLOCKED));
    };

    let order = match loaded.graph.topological_order() {
        Ok(order) => order,
        Err(e) => {
            output.problems("❌ Dependency graph errors:", &[e.to_string()]);
            return Ok(ExitCode::from(EXIT_BLOCKED));
        }
    };

    if output.is_json() {
        let items: Vec<_> = order
            .iter()
            .map(|id| {
                serde_json::json!({
                    "id": id,
                    "description": loaded.description(id),
                    "depends_on": loaded.graph.dependencies(id),
                    "unblocks": loaded.graph.dependents(id),
                })
            })
            .collect();
        output.data(&items);
    } else if order.is_empty() {
        println!("No tasks.");
    } else {
        println!("Task order ({}):", order.len());
        println!("{:<5} {:<12} {:<40} AFTER", "#", "ID", "DESCRIPTION");
        println!("{}", "-".repeat(80));
        for (i, id) in order.iter().enumerate() {
            println!(
                "{:<5} {:<12} {:<40} {}",
                i + 1,
                id,
                loaded.description(id),
                loaded.graph.dependencies(id).join(", ")
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}
