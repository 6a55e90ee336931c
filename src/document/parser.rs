//! Checklist parser
//!
//! Turns a `tasks.md` style document into sections and tasks:
//!
//! ```text
//! ## 1. Setup
//! - [ ] 1.1 Add schema (files: schema.ts)
//! - [x] 1.2 Add mutation (files: mutation.ts) (depends: 1.1) (agent: backend) (complexity: high)
//! ```
//!
//! Problems are accumulated rather than returned early, so that one pass
//! reports everything wrong with a document. Lines that do not match the task
//! grammar are ignored without a diagnostic.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{Complexity, ParseResult, Section, Task};

static SECTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^## ([0-9]+)\. (.+)$").expect("section header pattern"));

static TASK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^- \[([ x])\] ([0-9]+\.[0-9]+(?:\.[0-9]+)?[a-z]?) (.+?)",
        r"(?:\s*\(files?:\s*([^)]+)\))?",
        r"(?:\s*\(depends?:\s*([^)]+)\))?",
        r"(?:\s*\(agent:\s*([^)]+)\))?",
        r"(?:\s*\(complexity:\s*([^)]+)\))?$",
    ))
    .expect("task line pattern")
});

/// Header line plus the lines up to the next header
struct RawSection<'a> {
    number: u64,
    name: &'a str,
    lines: Vec<&'a str>,
}

/// Splits a document into raw sections; text before the first header is dropped
///
/// A header whose number does not fit in a `u64` is reported and its lines are
/// dropped with it.
fn split_sections<'a>(content: &'a str, errors: &mut Vec<String>) -> Vec<RawSection<'a>> {
    let mut sections: Vec<RawSection<'a>> = Vec::new();
    let mut in_section = false;

    for line in content.lines() {
        let Some(caps) = SECTION_HEADER.captures(line) else {
            if let (true, Some(current)) = (in_section, sections.last_mut()) {
                current.lines.push(line);
            }
            continue;
        };

        let digits = caps.get(1).map_or("", |m| m.as_str());
        let name = caps.get(2).map_or("", |m| m.as_str());
        match digits.parse::<u64>() {
            Ok(number) => {
                sections.push(RawSection {
                    number,
                    name: name.trim(),
                    lines: Vec::new(),
                });
                in_section = true;
            }
            Err(_) => {
                errors.push(format!(
                    "Section number {} in '{}' is out of range",
                    digits,
                    line.trim_end()
                ));
                in_section = false;
            }
        }
    }

    sections
}

/// Section number an identifier claims, from its text before the first dot
///
/// `None` when that text is not a number that fits in a `u64`.
fn claimed_section(id: &str) -> Option<u64> {
    id.split('.').next()?.parse().ok()
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',').map(|item| item.trim().to_string()).collect()
}

/// Parses one line into a task, recording diagnostics against `section_number`
fn parse_task_line(
    line: &str,
    section_number: u64,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) -> Option<Task> {
    let caps = TASK_LINE.captures(line)?;

    let completed = &caps[1] == "x";
    let id = caps[2].to_string();
    let description = caps[3].trim().to_string();

    if claimed_section(&id) != Some(section_number) {
        errors.push(format!(
            "Task {} in section {} should start with '{}.'",
            id, section_number, section_number
        ));
    }

    let files = match caps.get(4) {
        Some(m) => split_list(m.as_str()),
        None => {
            warnings.push(format!(
                "Task {} missing (files: ...) annotation - agent routing may be less accurate",
                id
            ));
            Vec::new()
        }
    };

    let depends_on = caps
        .get(5)
        .map(|m| split_list(m.as_str()))
        .unwrap_or_default();

    let agent_type = caps.get(6).map(|m| m.as_str().trim().to_string());

    let complexity = match caps.get(7) {
        Some(m) => {
            let value = m.as_str().trim().to_lowercase();
            value.parse::<Complexity>().unwrap_or_else(|_| {
                warnings.push(format!(
                    "Task {} has invalid complexity '{}', using 'medium'",
                    id, value
                ));
                Complexity::Medium
            })
        }
        None => Complexity::Medium,
    };

    Some(Task {
        id,
        description,
        files,
        depends_on,
        agent_type,
        complexity,
        completed,
    })
}

/// Parses checklist content into sections and tasks
///
/// Does not check `depends_on` references; see [`validate_dependencies`].
pub fn parse_tasks_md(content: &str) -> ParseResult {
    let mut result = ParseResult::default();

    let raw_sections = split_sections(content, &mut result.errors);
    if raw_sections.is_empty() {
        result
            .errors
            .push("No sections found. Expected format: '## 1. Section Name'".to_string());
        return result;
    }

    for raw in raw_sections {
        let mut section = Section::new(raw.number, raw.name);

        for line in raw.lines {
            if let Some(task) =
                parse_task_line(line, raw.number, &mut result.errors, &mut result.warnings)
            {
                section.tasks.push(task);
            }
        }

        if section.tasks.is_empty() {
            result.warnings.push(format!(
                "Section {} '{}' has no tasks",
                section.number, section.name
            ));
        }

        result.sections.push(section);
    }

    result
}

/// Checks every declared dependency against the full set of task IDs
pub fn validate_dependencies(sections: &[Section]) -> Vec<String> {
    let known: HashSet<&str> = sections
        .iter()
        .flat_map(|s| s.tasks.iter())
        .map(|t| t.id.as_str())
        .collect();

    sections
        .iter()
        .flat_map(|s| s.tasks.iter())
        .flat_map(|task| {
            task.depends_on
                .iter()
                .filter(|dep| !known.contains(dep.as_str()))
                .map(move |dep| format!("Task {} depends on unknown task '{}'", task.id, dep))
        })
        .collect()
}

/// Parses content and appends dependency validation errors
pub fn parse_document(content: &str) -> ParseResult {
    let mut result = parse_tasks_md(content);
    let dep_errors = validate_dependencies(&result.sections);
    result.errors.extend(dep_errors);
    result
}
