//! Document structure checks
//!
//! Lightweight string checks for the planning documents that sit next to a
//! checklist. `proposal.md` and `tasks.md` problems block; `design.md` only
//! produces suggestions. Any other file passes untouched.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static SECTION_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^## ").expect("section split pattern"));

static NUMBERED_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^## [0-9]+\.").expect("numbered section pattern"));

static CHECKBOX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^- \[[ x]\]").expect("checkbox pattern"));

const PROPOSAL_SECTIONS: &[&str] = &["## Problem", "## Solution", "## Impact"];

const MIN_SECTION_BODY: usize = 20;

const DESIGN_TOPICS: &[&str] = &["architecture", "component", "data"];

/// Kind of planning document, chosen by file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Proposal,
    Tasks,
    Design,
    Unknown,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Self {
        match path.file_name().and_then(|n| n.to_str()) {
            Some("proposal.md") => DocumentKind::Proposal,
            Some("tasks.md") => DocumentKind::Tasks,
            Some("design.md") => DocumentKind::Design,
            _ => DocumentKind::Unknown,
        }
    }
}

/// Result of checking one document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormatReport {
    /// Problems that block the document
    pub errors: Vec<String>,

    /// Suggestions that never block
    pub suggestions: Vec<String>,
}

impl FormatReport {
    pub fn is_blocking(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Checks a document according to its kind
pub fn check_document(kind: DocumentKind, content: &str) -> FormatReport {
    match kind {
        DocumentKind::Proposal => FormatReport {
            errors: validate_proposal(content),
            ..FormatReport::default()
        },
        DocumentKind::Tasks => FormatReport {
            errors: validate_tasks(content),
            ..FormatReport::default()
        },
        DocumentKind::Design => FormatReport {
            suggestions: validate_design(content),
            ..FormatReport::default()
        },
        DocumentKind::Unknown => FormatReport::default(),
    }
}

/// Requires the proposal sections and a minimum body for every section
pub fn validate_proposal(content: &str) -> Vec<String> {
    let mut errors: Vec<String> = PROPOSAL_SECTIONS
        .iter()
        .filter(|section| !content.contains(*section))
        .map(|section| {
            format!(
                "Missing required section: {}",
                section.trim_start_matches("## ")
            )
        })
        .collect();

    for chunk in SECTION_SPLIT.split(content).skip(1) {
        let chunk = chunk.trim();
        let (header, body) = chunk.split_once('\n').unwrap_or((chunk, ""));
        if body.trim().chars().count() < MIN_SECTION_BODY {
            errors.push(format!(
                "Section '{}' is too short (< {} chars)",
                header.trim(),
                MIN_SECTION_BODY
            ));
        }
    }

    errors
}

/// Requires numbered sections, each with at least one checkbox line
pub fn validate_tasks(content: &str) -> Vec<String> {
    if !NUMBERED_SECTION.is_match(content) {
        return vec!["No numbered sections found (expected '## 1. Section Name')".to_string()];
    }

    NUMBERED_SECTION
        .split(content)
        .enumerate()
        .skip(1)
        .filter(|(_, section)| !CHECKBOX.is_match(section))
        .map(|(i, section)| {
            let name = if section.trim().is_empty() {
                format!("Section {}", i)
            } else {
                section.split('\n').next().unwrap_or_default().trim().to_string()
            };
            format!("Section '{}' has no task checkboxes", name)
        })
        .collect()
}

/// Suggests design topics that the document never mentions
pub fn validate_design(content: &str) -> Vec<String> {
    let lower = content.to_lowercase();
    DESIGN_TOPICS
        .iter()
        .filter(|topic| !lower.contains(*topic))
        .map(|topic| format!("Consider discussing: {}", topic))
        .collect()
}
