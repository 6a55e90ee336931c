//! CLI integration tests for taskdeps
//!
//! These tests run the binary end to end: parsing checklists, inferring
//! dependencies, graph views and document checks.

use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get a command instance for the taskdeps binary
fn taskdeps_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("taskdeps"));
    cmd.env_remove("TASKDEPS_THRESHOLD").env_remove("TASKDEPS_CONFIG");
    cmd
}

const TASKS: &str = "\
# Profile feature

## 1. Setup
- [x] 1.1 Add user schema (files: schema.ts)
- [ ] 1.2 Add user mutation (files: mutation.ts)

## 2. UI
- [ ] 2.1 Build profile page (files: profile.tsx)
";

/// Create a temporary directory holding `name` with `content`
fn setup_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    (dir, path)
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).unwrap()
}

fn ids(json: &serde_json::Value) -> Vec<String> {
    json.as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Parse Tests
// =============================================================================

#[test]
fn test_parse_prints_summary_and_document() {
    let (dir, path) = setup_file("tasks.md", TASKS);

    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("parse")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Parsed 2 sections, 3 tasks"))
        .stdout(predicate::str::contains("\"agent_type\": null"))
        .stdout(predicate::str::contains("\"complexity\": \"medium\""));
}

#[test]
fn test_parse_json_format() {
    let (dir, path) = setup_file("tasks.md", TASKS);

    let output = taskdeps_cmd()
        .current_dir(dir.path())
        .args(["--format", "json", "parse"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);

    assert_eq!(json["sections"].as_array().unwrap().len(), 2);
    assert_eq!(json["sections"][0]["tasks"][0]["id"], "1.1");
    assert_eq!(json["sections"][0]["tasks"][0]["completed"], true);
    assert_eq!(json["sections"][0]["tasks"][0]["files"][0], "schema.ts");
    assert!(json["errors"].as_array().unwrap().is_empty());
}

#[test]
fn test_parse_reads_stdin() {
    let dir = TempDir::new().unwrap();

    taskdeps_cmd()
        .current_dir(dir.path())
        .args(["parse", "-"])
        .write_stdin(TASKS)
        .assert()
        .success()
        .stdout(predicate::str::contains("Parsed 2 sections, 3 tasks"));
}

#[test]
fn test_parse_reports_warnings() {
    let (dir, path) = setup_file(
        "tasks.md",
        "## 1. Setup\n- [ ] 1.1 Add schema (complexity: huge)\n## 2. Empty\n",
    );

    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("parse")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Warnings:"))
        .stdout(predicate::str::contains(
            "Task 1.1 missing (files: ...) annotation",
        ))
        .stdout(predicate::str::contains(
            "Task 1.1 has invalid complexity 'huge', using 'medium'",
        ))
        .stdout(predicate::str::contains("Section 2 'Empty' has no tasks"));
}

#[test]
fn test_parse_errors_exit_2() {
    let (dir, path) = setup_file(
        "tasks.md",
        "## 1. Setup\n- [ ] 2.1 Wrong section (files: a.ts) (depends: 1.9)\n",
    );

    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("parse")
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("❌ Parsing errors:"))
        .stderr(predicate::str::contains(
            "Task 2.1 in section 1 should start with '1.'",
        ))
        .stderr(predicate::str::contains(
            "Task 2.1 depends on unknown task '1.9'",
        ));
}

#[test]
fn test_parse_without_sections_exit_2() {
    let (dir, path) = setup_file("tasks.md", "Just some notes\n- [ ] 1.1 Orphan\n");

    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("parse")
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No sections found"));
}

#[test]
fn test_parse_missing_file_fails() {
    let dir = TempDir::new().unwrap();

    taskdeps_cmd()
        .current_dir(dir.path())
        .args(["parse", "missing.md"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("File not found"));
}

// =============================================================================
// Infer Tests
// =============================================================================

#[test]
fn test_infer_prints_counts() {
    let (dir, path) = setup_file("tasks.md", TASKS);

    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("infer")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "✓ Inferred 1 high-confidence dependencies",
        ))
        .stdout(predicate::str::contains("⚠ 1 dependencies need review"))
        .stdout(predicate::str::contains(
            "subsection order: sequential within 1",
        ));
}

#[test]
fn test_infer_json_edges() {
    let (dir, path) = setup_file("tasks.md", TASKS);

    let output = taskdeps_cmd()
        .current_dir(dir.path())
        .args(["-f", "json", "infer"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);

    let auto = json["auto_apply"].as_array().unwrap();
    assert_eq!(auto.len(), 1);
    assert_eq!(auto[0]["from"], "1.2");
    assert_eq!(auto[0]["to"], "1.1");
    assert_eq!(auto[0]["confidence"], 90);

    let pending = json["pending_review"].as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["from"], "2.1");
    assert_eq!(pending[0]["to"], "1.2");
    assert_eq!(pending[0]["confidence"], 50);
    assert_eq!(
        pending[0]["reason"],
        "keyword: 'component' typically depends on 'mutation'"
    );
}

#[test]
fn test_infer_threshold_flag() {
    let (dir, path) = setup_file("tasks.md", TASKS);

    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("infer")
        .arg(&path)
        .args(["--threshold", "40"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "✓ Inferred 2 high-confidence dependencies",
        ))
        .stdout(predicate::str::contains("⚠ 0 dependencies need review"));
}

#[test]
fn test_infer_threshold_from_env() {
    let (dir, path) = setup_file("tasks.md", TASKS);

    taskdeps_cmd()
        .current_dir(dir.path())
        .env("TASKDEPS_THRESHOLD", "95")
        .arg("infer")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "✓ Inferred 0 high-confidence dependencies",
        ));
}

#[test]
fn test_infer_rejects_out_of_range_threshold() {
    let (dir, path) = setup_file("tasks.md", TASKS);

    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("infer")
        .arg(&path)
        .args(["--threshold", "150"])
        .assert()
        .failure();
}

#[test]
fn test_infer_from_parsed_json() {
    let (dir, path) = setup_file("tasks.md", TASKS);

    let parsed = taskdeps_cmd()
        .current_dir(dir.path())
        .args(["-f", "json", "parse"])
        .arg(&path)
        .output()
        .unwrap();
    let json_path = dir.path().join("parsed.json");
    fs::write(&json_path, &parsed.stdout).unwrap();

    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("infer")
        .arg(&json_path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "✓ Inferred 1 high-confidence dependencies",
        ));
}

#[test]
fn test_infer_json_input_from_stdin() {
    let dir = TempDir::new().unwrap();
    let input = r#"{"sections": [{"number": 1, "name": "One", "tasks": [
        {"id": "1.1", "description": "first"},
        {"id": "1.2", "description": "second"}
    ]}]}"#;

    taskdeps_cmd()
        .current_dir(dir.path())
        .args(["infer", "-", "--json-input"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "✓ Inferred 1 high-confidence dependencies",
        ));
}

#[test]
fn test_infer_invalid_json_fails() {
    let (dir, path) = setup_file("parsed.json", "{not json");

    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("infer")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid task JSON"));
}

#[test]
fn test_infer_skips_documents_with_errors() {
    let (dir, path) = setup_file("tasks.md", "## 1. Setup\n- [ ] 3.1 Misplaced\n");

    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("infer")
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("❌ Parsing errors:"))
        .stdout(predicate::str::contains("Inferred").not());
}

// =============================================================================
// Configuration Tests
// =============================================================================

#[test]
fn test_project_config_threshold() {
    let (dir, path) = setup_file("tasks.md", TASKS);
    fs::write(dir.path().join("taskdeps.toml"), "[inference]\nthreshold = 40\n").unwrap();

    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("infer")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "✓ Inferred 2 high-confidence dependencies",
        ));
}

#[test]
fn test_flag_overrides_project_config() {
    let (dir, path) = setup_file("tasks.md", TASKS);
    fs::write(dir.path().join("taskdeps.toml"), "[inference]\nthreshold = 40\n").unwrap();

    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("infer")
        .arg(&path)
        .args(["--threshold", "70"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "✓ Inferred 1 high-confidence dependencies",
        ));
}

#[test]
fn test_project_config_default_format() {
    let (dir, path) = setup_file("tasks.md", TASKS);
    fs::write(
        dir.path().join("taskdeps.toml"),
        "[output]\ndefault_format = \"json\"\n",
    )
    .unwrap();

    let output = taskdeps_cmd()
        .current_dir(dir.path())
        .arg("infer")
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["auto_apply"].as_array().unwrap().len(), 1);
}

#[test]
fn test_explicit_config_file() {
    let (dir, path) = setup_file("tasks.md", TASKS);
    let config = dir.path().join("custom.toml");
    fs::write(&config, "[inference]\nthreshold = 40\n").unwrap();

    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("infer")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "✓ Inferred 2 high-confidence dependencies",
        ));
}

#[test]
fn test_invalid_config_fails() {
    let (dir, path) = setup_file("tasks.md", TASKS);
    fs::write(dir.path().join("taskdeps.toml"), "[inference]\nthreshold = 101\n").unwrap();

    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("infer")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid configuration"));
}

// =============================================================================
// Graph Tests
// =============================================================================

#[test]
fn test_ready_lists_unblocked_tasks() {
    let (dir, path) = setup_file("tasks.md", TASKS);

    let output = taskdeps_cmd()
        .current_dir(dir.path())
        .args(["-f", "json", "ready"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(ids(&stdout_json(&output)), vec!["1.2", "2.1"]);
}

#[test]
fn test_ready_text_output() {
    let (dir, path) = setup_file("tasks.md", TASKS);

    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("ready")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ready tasks (2):"))
        .stdout(predicate::str::contains("Build profile page"));
}

#[test]
fn test_ready_with_pending_edges() {
    let (dir, path) = setup_file("tasks.md", TASKS);

    let output = taskdeps_cmd()
        .current_dir(dir.path())
        .args(["-f", "json", "ready", "--include-pending"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(ids(&stdout_json(&output)), vec!["1.2"]);
}

#[test]
fn test_blocked_without_pending_edges() {
    let (dir, path) = setup_file("tasks.md", TASKS);

    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("blocked")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No blocked tasks."));
}

#[test]
fn test_blocked_with_pending_edges() {
    let (dir, path) = setup_file("tasks.md", TASKS);

    let output = taskdeps_cmd()
        .current_dir(dir.path())
        .args(["-f", "json", "blocked", "--include-pending"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(ids(&json), vec!["2.1"]);
    assert_eq!(json[0]["blocked_by"][0], "1.2");
}

#[test]
fn test_order_puts_blockers_first() {
    let (dir, path) = setup_file("tasks.md", TASKS);

    let output = taskdeps_cmd()
        .current_dir(dir.path())
        .args(["-f", "json", "order", "--include-pending"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    let order = ids(&json);
    let pos = |id: &str| order.iter().position(|x| x == id).unwrap();

    assert_eq!(order.len(), 3);
    assert!(pos("1.1") < pos("1.2"));
    assert!(pos("1.2") < pos("2.1"));

    let entry = &json[pos("1.2")];
    assert_eq!(entry["depends_on"], serde_json::json!(["1.1"]));
    assert_eq!(entry["unblocks"], serde_json::json!(["2.1"]));
}

#[test]
fn test_graph_reports_cycles() {
    // Section order points 1.1 at 1.2 while subsection order points 1.2 at 1.1
    let input = r#"{"sections": [
        {"number": 1, "name": "One", "tasks": [{"id": "1.2", "description": "second"}]},
        {"number": 2, "name": "Two", "tasks": [{"id": "1.1", "description": "first"}]}
    ]}"#;
    let (dir, path) = setup_file("parsed.json", input);

    taskdeps_cmd()
        .current_dir(dir.path())
        .args(["order", "--include-pending"])
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cycle"));
}

// =============================================================================
// Check and Hook Tests
// =============================================================================

const GOOD_PROPOSAL: &str = "\
## Problem
Users cannot tell which tasks block each other.

## Solution
Infer dependencies from the checklist structure.

## Impact
Planning tools get a usable dependency graph.
";

#[test]
fn test_check_valid_proposal() {
    let (dir, path) = setup_file("proposal.md", GOOD_PROPOSAL);

    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ proposal.md format valid"));
}

#[test]
fn test_check_invalid_proposal() {
    let (dir, path) = setup_file("proposal.md", "## Problem\nToo short\n");

    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("check")
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("❌ Spec format issues in proposal.md:"))
        .stderr(predicate::str::contains("Missing required section: Solution"))
        .stderr(predicate::str::contains(
            "Section 'Problem' is too short (< 20 chars)",
        ));
}

#[test]
fn test_check_tasks_without_checkboxes() {
    let (dir, path) = setup_file("tasks.md", "## 1. Setup\nNothing here yet\n");

    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("check")
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "Section 'Setup' has no task checkboxes",
        ));
}

#[test]
fn test_check_design_suggestions_do_not_block() {
    let (dir, path) = setup_file("design.md", "# Design\nThe architecture is simple.\n");

    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("💡 Suggestions for design.md:"))
        .stdout(predicate::str::contains("Consider discussing: component"))
        .stdout(predicate::str::contains("Consider discussing: architecture").not());
}

#[test]
fn test_check_json_format() {
    let (dir, path) = setup_file("proposal.md", "## Problem\nToo short\n");

    let output = taskdeps_cmd()
        .current_dir(dir.path())
        .args(["-f", "json", "check"])
        .arg(&path)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let json = stdout_json(&output);
    assert_eq!(json["kind"], "proposal");
    assert_eq!(json["valid"], false);
    assert!(!json["errors"].as_array().unwrap().is_empty());
}

fn hook_event(path: &std::path::Path) -> String {
    serde_json::json!({ "tool_input": { "file_path": path } }).to_string()
}

#[test]
fn test_hook_blocks_invalid_openspec_document() {
    let (dir, path) = setup_file("openspec/changes/profile/proposal.md", "## Problem\nShort\n");

    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("hook")
        .write_stdin(hook_event(&path))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("❌ Spec format issues in proposal.md:"));
}

#[test]
fn test_hook_accepts_valid_openspec_document() {
    let (dir, path) = setup_file("openspec/changes/profile/proposal.md", GOOD_PROPOSAL);

    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("hook")
        .write_stdin(hook_event(&path))
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ proposal.md format valid"));
}

#[test]
fn test_hook_ignores_paths_outside_openspec() {
    let (dir, path) = setup_file("docs/proposal.md", "## Problem\nShort\n");

    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("hook")
        .write_stdin(hook_event(&path))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_document_checks_ignore_broken_config() {
    let (dir, path) = setup_file("openspec/changes/profile/proposal.md", "## Problem\nShort\n");
    fs::write(dir.path().join("taskdeps.toml"), "[inference\nthreshold = ").unwrap();

    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("hook")
        .write_stdin(hook_event(&path))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("❌ Spec format issues in proposal.md:"));

    let (_valid_dir, valid) = setup_file("proposal.md", GOOD_PROPOSAL);
    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("check")
        .arg(&valid)
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ proposal.md format valid"));
}

#[test]
fn test_hook_passes_on_unusable_input() {
    let dir = TempDir::new().unwrap();

    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("hook")
        .write_stdin("not json at all")
        .assert()
        .success();

    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("hook")
        .write_stdin(r#"{"tool_input": {}}"#)
        .assert()
        .success();

    let missing = dir.path().join("openspec/changes/x/proposal.md");
    taskdeps_cmd()
        .current_dir(dir.path())
        .arg("hook")
        .write_stdin(hook_event(&missing))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_verbose_logs_to_stderr() {
    let (dir, path) = setup_file("tasks.md", TASKS);

    taskdeps_cmd()
        .current_dir(dir.path())
        .args(["--verbose", "infer"])
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("[verbose:infer] subsection:"))
        .stderr(predicate::str::contains("[verbose:load] Parsed 2 sections, 3 tasks"));
}
